use crate::workdir::WORKSHOP_WORK_DIR;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

fn footer_message() -> String {
    format!(
        "Working Directory: {:?}\nSetup log: {:?}\n",
        &WORKSHOP_WORK_DIR.path, &WORKSHOP_WORK_DIR.log_file
    )
}

#[derive(Parser, Clone, Debug)]
#[clap(
    name = "workshop-setup",
    about = "Prepares AWS credentials, a staging bucket and an Athena connection for the SQL workshop",
    version,
    after_help = footer_message()
)]
pub struct Cli {
    /// TOML file with configuration overrides
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Environment file to create and append to (default: ~/.env)
    #[clap(long, global = true, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Template the environment file is copied from (default: /etc/skel/.env)
    #[clap(long, global = true, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Login name used to derive the bucket name (default: $USER)
    #[clap(long, global = true)]
    pub login: Option<String>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run every setup step in order
    Run,

    /// Recreate the environment file from the template
    Reset,

    /// Check that the environment file parses
    ///
    /// The variables are loaded into this process only and are gone when it exits; `run` reloads
    /// between steps on its own.
    Reload,

    /// Write the access key pair, region and output format into the AWS CLI profile
    Configure,

    /// Create the staging bucket and record its name
    Provision,

    /// Build the Athena connection string and record it
    Connect,

    /// Run the verification query through the recorded connection
    Verify,

    /// Run a SQL statement through the recorded connection
    Query {
        /// The statement to execute
        sql: String,
    },

    /// Show the environment file with secrets masked
    Info {
        /// Output information in JSON format
        #[clap(long)]
        json: bool,
    },
}
