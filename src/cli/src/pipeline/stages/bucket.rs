use crate::pipeline::{BootstrapContext, Stage, StageEnv};
use anyhow::{bail, Result};
use async_trait::async_trait;
use colored::Colorize;
use workshop_aws::CreateOutcome;
use workshop_common::constants::BUCKET_NAME_VAR;
use workshop_common::resource_name::{current_login, ResourceName};
use workshop_common::{info_message, success_message};

/// Derives the per-user bucket name, records it and creates the bucket.
pub struct ProvisionBucket;

#[async_trait]
impl Stage for ProvisionBucket {
    fn name(&self) -> &'static str {
        "Bucket Provisioner"
    }

    async fn run(&self, env: &StageEnv<'_>, ctx: &mut BootstrapContext) -> Result<()> {
        let config = env.config;
        let login = config.login.clone().unwrap_or_else(current_login);
        let name = ResourceName::derive(&login, &config.bucket_suffix, config.name_delimiter()?)?;
        info_message!("Bucket name for '{}': {}", login, name);

        // recorded before the bucket exists, as the name is what later stages need
        ctx.record
            .append(BUCKET_NAME_VAR, &name.uri(&config.storage_scheme))?;
        ctx.bucket = Some(name.clone());

        let store = env
            .connector
            .object_store(&config.aws_init_type, &config.aws_region)
            .await?;

        match store.create_bucket(name.as_str()).await? {
            CreateOutcome::Created => {
                success_message!("Created bucket {} in {}", name, config.aws_region);
            }
            CreateOutcome::AlreadyOwned => {
                info_message!("Bucket {} already belongs to you, reusing it", name);
            }
        }

        let matching: Vec<String> = store
            .list_buckets()
            .await?
            .into_iter()
            .filter(|bucket| bucket.contains(name.as_str()))
            .collect();
        if matching.is_empty() {
            bail!("Bucket {} was not found when listing buckets", name);
        }
        for bucket in &matching {
            println!("{}", bucket);
        }

        Ok(())
    }
}
