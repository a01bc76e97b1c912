pub mod athena;
pub mod config;
pub mod connector;
pub mod profile;
pub mod s3;
pub mod store;

pub use athena::{AthenaClient, QueryResult};
pub use config::AwsConfig;
pub use connector::{AwsConnector, Connector};
pub use profile::ProfileStore;
pub use s3::{BucketError, CreateOutcome, S3Client};
pub use store::{ObjectStore, QueryService};
