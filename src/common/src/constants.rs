pub const ENV_FILE_NAME: &str = ".env";
pub const ENV_TEMPLATE_PATH: &str = "/etc/skel/.env";

// keys read from or written to the environment record
pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
pub const BUCKET_NAME_VAR: &str = "BUCKETNAME";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

pub const LOGIN_ENV_VAR: &str = "USER";

pub const AWS_PROFILE: &str = "default";
pub const AWS_REGION: &str = "us-east-1";
pub const AWS_OUTPUT_FORMAT: &str = "text";

pub const BUCKET_SUFFIX: &str = "-sql-workshop";
pub const BUCKET_NAME_DELIMITER: char = '-';
pub const STORAGE_SCHEME: &str = "s3";

pub const CONNECTION_SCHEME: &str = "awsathena+rest";
pub const ATHENA_SCHEMA: &str = "sra";
pub const VERIFY_QUERY: &str = "SELECT acc, librarysource, bioproject, geo_loc_name_country_calc \
FROM sra.metadata \
WHERE organism = 'Homo sapiens' \
LIMIT 5";
pub const QUERY_POLL_INTERVAL_MS: u64 = 500;

pub const WORKING_DIR: &str = "/tmp/workshop-setup";
pub const LOG_FILE_NAME: &str = "setup.log";
