use crate::constants::CONNECTION_SCHEME;
use crate::env_record::mask;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const STAGING_PARAM: &str = "s3_staging_dir";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("connection string must start with 'awsathena+rest://'")]
    Scheme,
    #[error("connection string is missing the '{0}' part")]
    Missing(&'static str),
    #[error("connection host '{0}' is not an Athena endpoint")]
    Host(String),
}

/// Everything needed to reach the query service, as one value.
///
/// Serialises to a SQLAlchemy-style `awsathena+rest://` URL. Values are inserted verbatim.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub schema: String,
    pub staging_dir: String,
}

impl ConnectionDescriptor {
    pub fn to_url(&self) -> String {
        format!(
            "{scheme}://{access_key}:{secret_key}@athena.{region}.amazonaws.com/{schema}?{param}={staging}/",
            scheme = CONNECTION_SCHEME,
            access_key = self.access_key_id,
            secret_key = self.secret_access_key,
            region = self.region,
            schema = self.schema,
            param = STAGING_PARAM,
            staging = self.staging_dir,
        )
    }

    /// Where query results are written. Always ends with `/`.
    pub fn output_location(&self) -> String {
        if self.staging_dir.ends_with('/') {
            self.staging_dir.clone()
        } else {
            format!("{}/", self.staging_dir)
        }
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &mask(&self.secret_access_key))
            .field("region", &self.region)
            .field("schema", &self.schema)
            .field("staging_dir", &self.staging_dir)
            .finish()
    }
}

impl FromStr for ConnectionDescriptor {
    type Err = DescriptorError;

    fn from_str(url: &str) -> Result<Self, Self::Err> {
        let rest = url
            .trim()
            .strip_prefix(CONNECTION_SCHEME)
            .and_then(|rest| rest.strip_prefix("://"))
            .ok_or(DescriptorError::Scheme)?;

        // secret keys may contain '/', so split credentials off at the last '@'
        let (credentials, location) = rest
            .rsplit_once('@')
            .ok_or(DescriptorError::Missing("credentials"))?;
        let (access_key_id, secret_access_key) = credentials
            .split_once(':')
            .ok_or(DescriptorError::Missing("secret key"))?;

        let (host, path) = location
            .split_once('/')
            .ok_or(DescriptorError::Missing("schema"))?;
        let region = host
            .strip_prefix("athena.")
            .and_then(|h| h.strip_suffix(".amazonaws.com"))
            .filter(|r| !r.is_empty())
            .ok_or_else(|| DescriptorError::Host(host.to_string()))?;

        let (schema, query) = path
            .split_once('?')
            .ok_or(DescriptorError::Missing(STAGING_PARAM))?;
        let staging = query
            .split('&')
            .find_map(|pair| pair.strip_prefix(STAGING_PARAM)?.strip_prefix('='))
            .ok_or(DescriptorError::Missing(STAGING_PARAM))?;
        let staging_dir = staging.strip_suffix('/').unwrap_or(staging);

        if access_key_id.is_empty() {
            return Err(DescriptorError::Missing("access key"));
        }
        if schema.is_empty() {
            return Err(DescriptorError::Missing("schema"));
        }
        if staging_dir.is_empty() {
            return Err(DescriptorError::Missing(STAGING_PARAM));
        }

        Ok(Self {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
            region: region.to_string(),
            schema: schema.to_string(),
            staging_dir: staging_dir.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> ConnectionDescriptor {
        ConnectionDescriptor {
            access_key_id: "AK".to_string(),
            secret_access_key: "SK".to_string(),
            region: "us-east-1".to_string(),
            schema: "sra".to_string(),
            staging_dir: "s3://bucket".to_string(),
        }
    }

    #[test]
    fn formats_connection_string() {
        assert_eq!(
            descriptor().to_url(),
            "awsathena+rest://AK:SK@athena.us-east-1.amazonaws.com/sra?s3_staging_dir=s3://bucket/"
        );
    }

    #[test]
    fn parses_its_own_output() {
        let mut original = descriptor();
        original.secret_access_key = "wJalr/XUtn+FEMI".to_string();

        let parsed: ConnectionDescriptor = original.to_url().parse().unwrap();

        assert_eq!(parsed, original);
    }

    #[test]
    fn output_location_has_trailing_slash() {
        let mut d = descriptor();
        assert_eq!(d.output_location(), "s3://bucket/");
        d.staging_dir = "s3://bucket/results/".to_string();
        assert_eq!(d.output_location(), "s3://bucket/results/");
    }

    #[test]
    fn rejects_malformed_urls() {
        assert_eq!(
            "postgres://a:b@localhost/db".parse::<ConnectionDescriptor>(),
            Err(DescriptorError::Scheme)
        );
        assert_eq!(
            "awsathena+rest://AK:SK@localhost/sra?s3_staging_dir=s3://b/"
                .parse::<ConnectionDescriptor>(),
            Err(DescriptorError::Host("localhost".to_string()))
        );
        assert_eq!(
            "awsathena+rest://AK:SK@athena.us-east-1.amazonaws.com/sra"
                .parse::<ConnectionDescriptor>(),
            Err(DescriptorError::Missing("s3_staging_dir"))
        );
        assert_eq!(
            "awsathena+rest://AK:SK@athena.us-east-1.amazonaws.com/sra?s3_staging_dir=/"
                .parse::<ConnectionDescriptor>(),
            Err(DescriptorError::Missing("s3_staging_dir"))
        );
    }

    #[test]
    fn debug_masks_secret() {
        let mut d = descriptor();
        d.secret_access_key = "wJalrXUtnFEMI/K7MDENG".to_string();
        let printed = format!("{:?}", d);
        assert!(!printed.contains("wJalrXUtnFEMI"));
        assert!(printed.contains("********DENG"));
    }
}
