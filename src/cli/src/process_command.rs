use crate::commands::{Cli, Command};
use crate::config::{CliOverrides, ConfigLoader, WorkshopConfig};
use crate::handlers::print_info;
use crate::logging::setup_logging;
use crate::pipeline::stages::{
    BuildConnection, ConfigureCredentials, ProvisionBucket, ReloadEnvironment, ResetEnvironment,
    VerifyQuery,
};
use crate::pipeline::{BootstrapContext, Pipeline, StageEnv};
use crate::workdir::WORKSHOP_WORK_DIR;
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use workshop_aws::AwsConnector;
use workshop_common::{error_message, warning_message};

/// Parses the command line, runs the command and returns the process exit code.
pub fn process_command() -> i32 {
    let cli = Cli::parse();

    match process_cli(cli) {
        Ok(()) => 0,
        Err(err) => {
            tracing::error!("Setup failed: {:?}", err);
            error_message!("{:#}", err);
            1
        }
    }
}

pub fn process_cli(cli: Cli) -> Result<()> {
    let overrides = CliOverrides {
        env_file: cli.env_file.clone(),
        template: cli.template.clone(),
        login: cli.login.clone(),
    };
    let config = ConfigLoader::load_config(cli.config.as_deref(), &overrides)?;

    if let Err(err) = setup_logging(&WORKSHOP_WORK_DIR, &config.log_level) {
        warning_message!("Logging to {:?} is disabled: {:#}", WORKSHOP_WORK_DIR.log_file, err);
    }

    // a run that starts with the reset stage must not read the old file first
    let fresh = matches!(cli.command, Command::Run | Command::Reset);

    let pipeline = match cli.command {
        Command::Info { json } => {
            let ctx = BootstrapContext::load(&config.env_file)?;
            return print_info(&config, &ctx, json);
        }
        Command::Run => Pipeline::standard(),
        Command::Reset => Pipeline::single(Box::new(ResetEnvironment)),
        Command::Reload => Pipeline::single(Box::new(ReloadEnvironment)),
        Command::Configure => Pipeline::single(Box::new(ConfigureCredentials)),
        Command::Provision => Pipeline::single(Box::new(ProvisionBucket)),
        Command::Connect => Pipeline::single(Box::new(BuildConnection)),
        Command::Verify => Pipeline::single(Box::new(VerifyQuery::default())),
        Command::Query { sql } => Pipeline::single(Box::new(VerifyQuery::with_sql(sql))),
    };
    tracing::info!("Running stages {:?}", pipeline.stage_names());

    let mut ctx = if fresh {
        BootstrapContext::new(&config.env_file)
    } else {
        BootstrapContext::load(&config.env_file)?
    };

    run_pipeline(&pipeline, &config, &mut ctx)
}

fn run_pipeline(
    pipeline: &Pipeline,
    config: &WorkshopConfig,
    ctx: &mut BootstrapContext,
) -> Result<()> {
    let connector = AwsConnector::new(config.query_poll_interval());
    let env = StageEnv {
        config,
        connector: &connector,
    };

    tokio::runtime::Runtime::new()?.block_on(pipeline.run(&env, ctx))
}
