use crate::pipeline::{BootstrapContext, Stage, StageEnv};
use anyhow::Result;
use async_trait::async_trait;
use colored::Colorize;
use workshop_aws::ProfileStore;
use workshop_common::constants::{ACCESS_KEY_ID_VAR, SECRET_ACCESS_KEY_VAR};
use workshop_common::success_message;

/// Programs the key pair, region and output format into the AWS CLI profile.
pub struct ConfigureCredentials;

#[async_trait]
impl Stage for ConfigureCredentials {
    fn name(&self) -> &'static str {
        "Credential Configurator"
    }

    async fn run(&self, env: &StageEnv<'_>, ctx: &mut BootstrapContext) -> Result<()> {
        let config = env.config;
        let access_key_id = ctx.require(ACCESS_KEY_ID_VAR)?;
        let secret_access_key = ctx.require(SECRET_ACCESS_KEY_VAR)?;

        let store = ProfileStore::from_env(config.profile_name())?;
        store.set("aws_access_key_id", &access_key_id)?;
        store.set("aws_secret_access_key", &secret_access_key)?;
        store.set("region", &config.aws_region)?;
        store.set("output", &config.aws_output)?;

        tracing::info!(
            "Configured profile '{}' in {:?} and {:?}",
            store.profile(),
            store.credentials_file(),
            store.config_file()
        );
        success_message!(
            "AWS profile '{}' configured for {}",
            store.profile(),
            config.aws_region
        );
        Ok(())
    }
}
