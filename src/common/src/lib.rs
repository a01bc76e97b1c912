mod message;

pub mod connection;
pub mod constants;
pub mod env_record;
pub mod resource_name;

// re-export for convenient use with `message`
pub use colored::Colorize;
