use anyhow::{anyhow, Result};
use std::path::Path;
use workshop_aws::QueryResult;
use workshop_common::connection::ConnectionDescriptor;
use workshop_common::env_record::EnvRecord;
use workshop_common::resource_name::ResourceName;

/// State handed from one stage to the next.
///
/// The environment record is the persisted copy; the other fields carry what earlier stages
/// derived so later ones do not have to find it again by variable name.
#[derive(Debug)]
pub struct BootstrapContext {
    pub record: EnvRecord,
    pub bucket: Option<ResourceName>,
    pub descriptor: Option<ConnectionDescriptor>,
    pub last_result: Option<QueryResult>,
}

impl BootstrapContext {
    /// A context for a run that starts by resetting the environment file.
    pub fn new(env_file: impl AsRef<Path>) -> Self {
        Self::with_record(EnvRecord::unloaded(env_file.as_ref()))
    }

    /// A context picking up an environment file left by an earlier run.
    pub fn load(env_file: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_record(EnvRecord::load(env_file)?))
    }

    fn with_record(record: EnvRecord) -> Self {
        Self {
            record,
            bucket: None,
            descriptor: None,
            last_result: None,
        }
    }

    /// The process environment's value for `key`, falling back to the record. Empty values
    /// count as unset.
    pub fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .filter(|value| !value.is_empty())
            .or_else(|| {
                self.record
                    .get(key)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
            })
    }

    pub fn require(&self, key: &str) -> Result<String> {
        self.lookup(key).ok_or_else(|| {
            anyhow!(
                "{} is not set in {:?} or in the environment",
                key,
                self.record.path()
            )
        })
    }
}
