use crate::pipeline::{BootstrapContext, Stage, StageEnv};
use anyhow::Result;
use async_trait::async_trait;

/// Makes everything appended so far visible to plain environment lookups.
pub struct ReloadEnvironment;

#[async_trait]
impl Stage for ReloadEnvironment {
    fn name(&self) -> &'static str {
        "Environment Reload"
    }

    async fn run(&self, _env: &StageEnv<'_>, ctx: &mut BootstrapContext) -> Result<()> {
        ctx.record.reload_into_process()?;
        ctx.record.refresh()?;
        tracing::debug!("Environment now defines {:?}", ctx.record.keys());
        Ok(())
    }
}
