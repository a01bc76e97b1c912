use crate::pipeline::{BootstrapContext, Stage, StageEnv};
use anyhow::Result;
use async_trait::async_trait;
use colored::Colorize;
use workshop_common::connection::ConnectionDescriptor;
use workshop_common::constants::{
    ACCESS_KEY_ID_VAR, BUCKET_NAME_VAR, DATABASE_URL_VAR, SECRET_ACCESS_KEY_VAR,
};
use workshop_common::success_message;

/// Formats the Athena connection string and records it. No network access.
pub struct BuildConnection;

#[async_trait]
impl Stage for BuildConnection {
    fn name(&self) -> &'static str {
        "Connection Builder"
    }

    async fn run(&self, env: &StageEnv<'_>, ctx: &mut BootstrapContext) -> Result<()> {
        let config = env.config;

        let staging_dir = match &ctx.bucket {
            Some(bucket) => bucket.uri(&config.storage_scheme),
            None => ctx.require(BUCKET_NAME_VAR)?,
        };

        let descriptor = ConnectionDescriptor {
            access_key_id: ctx.require(ACCESS_KEY_ID_VAR)?,
            secret_access_key: ctx.require(SECRET_ACCESS_KEY_VAR)?,
            region: config.aws_region.clone(),
            schema: config.schema_name.clone(),
            staging_dir,
        };

        ctx.record.append(DATABASE_URL_VAR, &descriptor.to_url())?;
        tracing::info!("Recorded connection {:?}", descriptor);
        success_message!(
            "{} written for schema '{}' staging to {}",
            DATABASE_URL_VAR,
            descriptor.schema,
            descriptor.staging_dir
        );

        ctx.descriptor = Some(descriptor);
        Ok(())
    }
}
