use crate::pipeline::{BootstrapContext, Stage, StageEnv};
use anyhow::Result;
use async_trait::async_trait;
use colored::Colorize;
use workshop_common::env_record::EnvRecord;
use workshop_common::success_message;

pub struct ResetEnvironment;

#[async_trait]
impl Stage for ResetEnvironment {
    fn name(&self) -> &'static str {
        "Environment Reset"
    }

    async fn run(&self, env: &StageEnv<'_>, ctx: &mut BootstrapContext) -> Result<()> {
        let config = env.config;
        ctx.record = EnvRecord::reset(&config.env_file, &config.env_template)?;
        ctx.bucket = None;
        ctx.descriptor = None;

        success_message!(
            "{:?} recreated from {:?}",
            config.env_file,
            config.env_template
        );
        Ok(())
    }
}
