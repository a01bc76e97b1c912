use super::WorkshopConfig;
use anyhow::{Context, Result};
use config::{Config as RConfig, Environment, File, FileFormat};
use std::path::{Path, PathBuf};
use workshop_aws::AwsConfig;
use workshop_common::constants::{
    AWS_OUTPUT_FORMAT, AWS_PROFILE, AWS_REGION, ATHENA_SCHEMA, BUCKET_NAME_DELIMITER,
    BUCKET_SUFFIX, ENV_FILE_NAME, ENV_TEMPLATE_PATH, QUERY_POLL_INTERVAL_MS, STORAGE_SCHEME,
    VERIFY_QUERY,
};

const ENV_PREFIX: &str = "WORKSHOP";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Values given on the command line. They win over every other source.
#[derive(Clone, Debug, Default)]
pub struct CliOverrides {
    pub env_file: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub login: Option<String>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    fn default_env_file() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(ENV_FILE_NAME)
    }

    /// Defaults, then the optional TOML file, then `WORKSHOP_*` variables, then `overrides`.
    pub fn load_config(config_file: Option<&Path>, overrides: &CliOverrides) -> Result<WorkshopConfig> {
        let mut builder = RConfig::builder();

        builder = builder
            .set_default(
                "env_file",
                Self::default_env_file().to_string_lossy().to_string(),
            )?
            .set_default("env_template", ENV_TEMPLATE_PATH)?
            .set_default("aws_init_type", AwsConfig::Profile(AWS_PROFILE.to_string()))?
            .set_default("aws_region", AWS_REGION)?
            .set_default("aws_output", AWS_OUTPUT_FORMAT)?
            .set_default("bucket_suffix", BUCKET_SUFFIX)?
            .set_default("bucket_name_delimiter", BUCKET_NAME_DELIMITER.to_string())?
            .set_default("storage_scheme", STORAGE_SCHEME)?
            .set_default("schema_name", ATHENA_SCHEMA)?
            .set_default("verify_query", VERIFY_QUERY)?
            .set_default("query_poll_interval_ms", QUERY_POLL_INTERVAL_MS)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        builder = builder
            .set_override_option(
                "env_file",
                overrides
                    .env_file
                    .as_ref()
                    .map(|p| p.to_string_lossy().to_string()),
            )?
            .set_override_option(
                "env_template",
                overrides
                    .template
                    .as_ref()
                    .map(|p| p.to_string_lossy().to_string()),
            )?
            .set_override_option("login", overrides.login.clone())?;

        let config: WorkshopConfig = builder
            .build()?
            .try_deserialize()
            .context("failed to parse configuration")?;

        config.name_delimiter()?;
        tracing::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    pub fn load_default_config() -> Result<WorkshopConfig> {
        Self::load_config(None, &CliOverrides::default())
    }
}
