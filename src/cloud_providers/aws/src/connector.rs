use crate::athena::AthenaClient;
use crate::config::AwsConfig;
use crate::s3::S3Client;
use crate::store::{ObjectStore, QueryService};
use async_trait::async_trait;
use std::time::Duration;
use workshop_common::connection::ConnectionDescriptor;

/// Opens connections to the cloud services when a stage first needs them.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn object_store(
        &self,
        source: &AwsConfig,
        region: &str,
    ) -> anyhow::Result<Box<dyn ObjectStore>>;

    async fn query_service(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> anyhow::Result<Box<dyn QueryService>>;
}

pub struct AwsConnector {
    poll_interval: Duration,
}

impl AwsConnector {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }
}

#[async_trait]
impl Connector for AwsConnector {
    async fn object_store(
        &self,
        source: &AwsConfig,
        region: &str,
    ) -> anyhow::Result<Box<dyn ObjectStore>> {
        let client = S3Client::new(source.clone(), region).await?;
        Ok(Box::new(client))
    }

    async fn query_service(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> anyhow::Result<Box<dyn QueryService>> {
        let client = AthenaClient::connect(descriptor, self.poll_interval).await;
        Ok(Box::new(client))
    }
}
