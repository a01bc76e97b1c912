use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_credential_types::Credentials;
use config::{Value, ValueKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

const CREDENTIALS_PROVIDER_NAME: &str = "workshop-env";

/// Where the SDK should look for credentials.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AwsConfig {
    Profile(String),
    Env,
}

impl fmt::Display for AwsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AwsConfig::Profile(profile) => write!(f, "profile:{}", profile),
            AwsConfig::Env => write!(f, "env"),
        }
    }
}

impl From<AwsConfig> for ValueKind {
    fn from(value: AwsConfig) -> Self {
        match value {
            AwsConfig::Profile(profile) => {
                let mut table = HashMap::new();
                table.insert(
                    "profile".to_string(),
                    Value::new(None, Self::String(profile.to_owned())),
                );
                Self::Table(table)
            }
            AwsConfig::Env => Self::String("env".to_string()),
        }
    }
}

/// Loads an SDK config and checks that it can actually produce credentials.
pub async fn get_initialized_aws_conf(
    initialization_conf: AwsConfig,
    region: impl Into<String>,
) -> Option<SdkConfig> {
    let config_loader = aws_config::defaults(BehaviorVersion::latest());
    let loader = match initialization_conf {
        AwsConfig::Profile(profile) => {
            tracing::debug!("Trying to load AWS config using profile '{}'", profile);
            config_loader.profile_name(profile)
        }
        AwsConfig::Env => {
            tracing::debug!("Trying to load AWS config from environment");
            config_loader
        }
    };

    let config = loader.region(Region::new(region.into())).load().await;
    verify_credentials(config).await
}

/// Profile first, then the default environment chain.
pub async fn resolve_available_aws_config(profile: AwsConfig, region: &str) -> Option<SdkConfig> {
    if let AwsConfig::Profile(profile_name) = &profile {
        let profile_conf = get_initialized_aws_conf(profile.clone(), region).await;
        if profile_conf.is_some() {
            tracing::info!("Resolved AWS credentials using profile '{}'", profile_name);
            return profile_conf;
        } else {
            tracing::warn!(
                "Failed to resolve credentials using profile '{}'",
                profile_name
            );
        }
    }

    let env_conf = get_initialized_aws_conf(AwsConfig::Env, region).await;
    if env_conf.is_some() {
        tracing::info!("Resolved AWS credentials using environment.");
        return env_conf;
    }

    tracing::warn!("Could not resolve AWS credentials from profile or environment.");
    None
}

/// SDK config pinned to an explicit key pair, bypassing profiles and the environment.
pub async fn get_static_aws_conf(
    access_key_id: &str,
    secret_access_key: &str,
    region: impl Into<String>,
) -> SdkConfig {
    let credentials = Credentials::new(
        access_key_id,
        secret_access_key,
        None,
        None,
        CREDENTIALS_PROVIDER_NAME,
    );

    aws_config::defaults(BehaviorVersion::latest())
        .credentials_provider(credentials)
        .region(Region::new(region.into()))
        .load()
        .await
}

async fn verify_credentials(config: SdkConfig) -> Option<SdkConfig> {
    let credentials_provider = config.credentials_provider()?;

    match credentials_provider.provide_credentials().await {
        Ok(_) => {
            tracing::debug!("Successfully retrieved AWS credentials");
            Some(config)
        }
        Err(err) => {
            tracing::warn!("Failed to get AWS credentials: {:?}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_source() {
        assert_eq!(
            AwsConfig::Profile("default".to_string()).to_string(),
            "profile:default"
        );
        assert_eq!(AwsConfig::Env.to_string(), "env");
    }

    #[test]
    fn converts_to_config_value() {
        match ValueKind::from(AwsConfig::Profile("me".to_string())) {
            ValueKind::Table(table) => {
                assert_eq!(table["profile"].clone().into_string().unwrap(), "me")
            }
            other => panic!("unexpected value {:?}", other),
        }
        assert!(matches!(ValueKind::from(AwsConfig::Env), ValueKind::String(s) if s == "env"));
    }

    #[tokio::test]
    async fn static_config_uses_given_keys() {
        let config = get_static_aws_conf("AKID", "SECRET", "us-east-1").await;

        assert_eq!(config.region().map(|r| r.as_ref()), Some("us-east-1"));
        let credentials = config
            .credentials_provider()
            .unwrap()
            .provide_credentials()
            .await
            .unwrap();
        assert_eq!(credentials.access_key_id(), "AKID");
        assert_eq!(credentials.secret_access_key(), "SECRET");
    }
}
