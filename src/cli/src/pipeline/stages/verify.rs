use crate::pipeline::{BootstrapContext, Stage, StageEnv};
use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::Colorize;
use workshop_common::connection::ConnectionDescriptor;
use workshop_common::constants::DATABASE_URL_VAR;
use workshop_common::{success_message, warning_message};

/// Opens the recorded connection and runs one statement through it.
///
/// Without an explicit statement the configured verification query is used.
#[derive(Default)]
pub struct VerifyQuery {
    sql: Option<String>,
}

impl VerifyQuery {
    pub fn with_sql(sql: impl Into<String>) -> Self {
        Self {
            sql: Some(sql.into()),
        }
    }
}

#[async_trait]
impl Stage for VerifyQuery {
    fn name(&self) -> &'static str {
        "Query Verifier"
    }

    async fn run(&self, env: &StageEnv<'_>, ctx: &mut BootstrapContext) -> Result<()> {
        let descriptor = match &ctx.descriptor {
            Some(descriptor) => descriptor.clone(),
            None => ctx
                .require(DATABASE_URL_VAR)?
                .parse::<ConnectionDescriptor>()
                .with_context(|| format!("{} is not an Athena connection string", DATABASE_URL_VAR))?,
        };
        let sql = self.sql.as_deref().unwrap_or(&env.config.verify_query);

        let service = env.connector.query_service(&descriptor).await?;
        tracing::debug!("Executing: {}", sql);
        let result = service.execute(sql).await?;

        println!("{}", result);
        if result.is_empty() {
            warning_message!("Query succeeded but returned no rows");
        } else {
            success_message!(
                "Query returned {} row(s) from schema '{}'",
                result.rows.len(),
                descriptor.schema
            );
        }

        ctx.last_result = Some(result);
        Ok(())
    }
}
