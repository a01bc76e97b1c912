mod config_loader;

pub use config_loader::{CliOverrides, ConfigLoader};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use workshop_aws::AwsConfig;
use workshop_common::constants::AWS_PROFILE;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct WorkshopConfig {
    pub env_file: PathBuf,
    pub env_template: PathBuf,

    pub aws_init_type: AwsConfig,
    pub aws_region: String,
    pub aws_output: String,

    pub bucket_suffix: String,
    pub bucket_name_delimiter: String,
    pub storage_scheme: String,
    #[serde(default)]
    pub login: Option<String>,

    pub schema_name: String,
    pub verify_query: String,
    pub query_poll_interval_ms: u64,

    pub log_level: String,
}

impl WorkshopConfig {
    /// Profile the CLI credentials are written to and read back from.
    pub fn profile_name(&self) -> &str {
        match &self.aws_init_type {
            AwsConfig::Profile(profile) => profile,
            AwsConfig::Env => AWS_PROFILE,
        }
    }

    pub fn name_delimiter(&self) -> Result<char> {
        let mut chars = self.bucket_name_delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(delimiter), None) => Ok(delimiter),
            _ => bail!(
                "bucket_name_delimiter must be a single character, got '{}'",
                self.bucket_name_delimiter
            ),
        }
    }

    pub fn query_poll_interval(&self) -> Duration {
        Duration::from_millis(self.query_poll_interval_ms)
    }
}
