mod bucket;
mod connection;
mod credentials;
mod reload;
mod reset;
mod verify;

pub use bucket::ProvisionBucket;
pub use connection::BuildConnection;
pub use credentials::ConfigureCredentials;
pub use reload::ReloadEnvironment;
pub use reset::ResetEnvironment;
pub use verify::VerifyQuery;
