//! Seams between the setup stages and the cloud services they drive.

use crate::athena::QueryResult;
use crate::s3::{BucketError, CreateOutcome};
use async_trait::async_trait;
use mockall::automock;

#[automock]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Creates `name` in the store's region. A bucket the caller already owns is reused.
    async fn create_bucket(&self, name: &str) -> Result<CreateOutcome, BucketError>;

    async fn list_buckets(&self) -> anyhow::Result<Vec<String>>;
}

#[automock]
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Runs `sql` to completion and returns its first page of results.
    async fn execute(&self, sql: &str) -> anyhow::Result<QueryResult>;
}
