use crate::config::{resolve_available_aws_config, AwsConfig};
use crate::store::ObjectStore;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use std::str::FromStr;
use thiserror::Error;

/// S3 rejects an explicit location constraint for its default region.
const DEFAULT_S3_REGION: &str = "us-east-1";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyOwned,
}

#[derive(Debug, Error)]
pub enum BucketError {
    #[error("bucket name '{0}' is already taken by another account")]
    NameTaken(String),
    #[error("invalid region '{0}' for bucket creation")]
    InvalidRegion(String),
    #[error("failed to create bucket '{name}': {message}")]
    Create { name: String, message: String },
}

pub struct S3Client {
    pub client: aws_sdk_s3::Client,
    region: String,
}

impl S3Client {
    pub async fn new(initialization_conf: AwsConfig, region: &str) -> anyhow::Result<Self> {
        let source = initialization_conf.to_string();
        let config = resolve_available_aws_config(initialization_conf, region)
            .await
            .ok_or_else(|| anyhow!("No usable AWS credentials found (tried {} and env)", source))?;

        Ok(Self::new_with_config(&config, region))
    }

    pub fn new_with_config(config: &SdkConfig, region: &str) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(config),
            region: region.to_string(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn create_bucket(&self, bucket_name: &str) -> Result<CreateOutcome, BucketError> {
        let bucket_config = bucket_configuration(&self.region)?;

        let result = self
            .client
            .create_bucket()
            .bucket(bucket_name)
            .set_create_bucket_configuration(bucket_config)
            .send()
            .await;

        match result {
            Ok(_) => {
                tracing::info!("Created bucket '{}' in {}", bucket_name, self.region);
                Ok(CreateOutcome::Created)
            }
            Err(create_err) => {
                if let Some(service_error) = create_err.as_service_error() {
                    if service_error.is_bucket_already_owned_by_you() {
                        tracing::info!("Bucket '{}' already owned by you, reusing it", bucket_name);
                        return Ok(CreateOutcome::AlreadyOwned);
                    }
                    if service_error.is_bucket_already_exists() {
                        tracing::error!("Bucket name '{}' is taken", bucket_name);
                        return Err(BucketError::NameTaken(bucket_name.to_string()));
                    }
                }
                tracing::error!("Error creating bucket: {:?}", create_err);
                Err(BucketError::Create {
                    name: bucket_name.to_string(),
                    message: format!("{create_err:?}"),
                })
            }
        }
    }

    async fn list_buckets(&self) -> anyhow::Result<Vec<String>> {
        let mut processed_buckets = Vec::new();
        let mut buckets = self.client.list_buckets().into_paginator().send();

        while let Some(output) = buckets.next().await {
            let output = output.context("Failed to list buckets")?;
            for bucket in output.buckets() {
                processed_buckets.push(bucket.name().unwrap_or_default().to_string());
            }
        }
        tracing::debug!("Buckets {:?}", processed_buckets);
        Ok(processed_buckets)
    }
}

pub(crate) fn bucket_configuration(
    region: &str,
) -> Result<Option<CreateBucketConfiguration>, BucketError> {
    if region.trim().is_empty() {
        return Err(BucketError::InvalidRegion(region.to_string()));
    }
    if region == DEFAULT_S3_REGION {
        return Ok(None);
    }

    let constraint = BucketLocationConstraint::from_str(region)
        .map_err(|_| BucketError::InvalidRegion(region.to_string()))?;
    Ok(Some(
        CreateBucketConfiguration::builder()
            .location_constraint(constraint)
            .build(),
    ))
}
