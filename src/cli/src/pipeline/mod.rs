//! The setup pipeline: an ordered list of stages sharing one [`BootstrapContext`].
//!
//! Stages run strictly one after another and the first failure stops the run. Nothing is rolled
//! back, so a bucket created before a later stage fails stays in place.

mod context;
pub mod stages;

pub use context::BootstrapContext;

use crate::config::WorkshopConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::Colorize;
use stages::{
    BuildConnection, ConfigureCredentials, ProvisionBucket, ReloadEnvironment, ResetEnvironment,
    VerifyQuery,
};
use workshop_aws::Connector;
use workshop_common::{stage_message, success_message};

/// What every stage gets to work with besides the context.
pub struct StageEnv<'a> {
    pub config: &'a WorkshopConfig,
    pub connector: &'a dyn Connector,
}

#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;
    async fn run(&self, env: &StageEnv<'_>, ctx: &mut BootstrapContext) -> Result<()>;
}

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// The full workshop setup, in order.
    pub fn standard() -> Self {
        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(ResetEnvironment),
            Box::new(ReloadEnvironment),
            Box::new(ConfigureCredentials),
            Box::new(ProvisionBucket),
            Box::new(ReloadEnvironment),
            Box::new(BuildConnection),
            Box::new(ReloadEnvironment),
            Box::new(VerifyQuery::default()),
        ];

        Self { stages }
    }

    pub fn single(stage: Box<dyn Stage>) -> Self {
        Self {
            stages: vec![stage],
        }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub async fn run(&self, env: &StageEnv<'_>, ctx: &mut BootstrapContext) -> Result<()> {
        let total = self.stages.len();

        for (index, stage) in self.stages.iter().enumerate() {
            stage_message!(index + 1, total, "{}", stage.name());
            tracing::info!("Starting stage {}/{}: {}", index + 1, total, stage.name());

            stage
                .run(env, ctx)
                .await
                .with_context(|| format!("{} failed", stage.name()))?;

            tracing::info!("Finished stage {}", stage.name());
        }

        success_message!("{} step(s) completed", total);
        Ok(())
    }
}
