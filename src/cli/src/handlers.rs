use crate::config::WorkshopConfig;
use crate::pipeline::BootstrapContext;
use crate::workdir::WORKSHOP_WORK_DIR;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct InfoReport {
    env_file: PathBuf,
    env_template: PathBuf,
    aws_profile: String,
    aws_region: String,
    schema: String,
    log_file: PathBuf,
    entries: Vec<InfoEntry>,
}

#[derive(Debug, Serialize)]
struct InfoEntry {
    key: String,
    value: String,
}

impl InfoReport {
    fn new(config: &WorkshopConfig, ctx: &BootstrapContext) -> Self {
        Self {
            env_file: config.env_file.clone(),
            env_template: config.env_template.clone(),
            aws_profile: config.profile_name().to_string(),
            aws_region: config.aws_region.clone(),
            schema: config.schema_name.clone(),
            log_file: WORKSHOP_WORK_DIR.log_file.clone(),
            entries: ctx
                .record
                .masked_entries()
                .into_iter()
                .map(|(key, value)| InfoEntry { key, value })
                .collect(),
        }
    }
}

/// Prints the environment file and the settings that shape the setup. Secrets are masked.
pub fn print_info(config: &WorkshopConfig, ctx: &BootstrapContext, json: bool) -> Result<()> {
    let report = InfoReport::new(config, ctx);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut output = String::new();
    let total_header_width = 80;

    writeln!(
        &mut output,
        "\n┌{:─^width$}┐",
        " WORKSHOP SETUP INFO ",
        width = total_header_width
    )?;
    writeln!(
        &mut output,
        "│ Environment file:         │ {:?}  ",
        report.env_file
    )?;
    writeln!(
        &mut output,
        "│ Template:                 │ {:?}  ",
        report.env_template
    )?;
    writeln!(
        &mut output,
        "│ AWS profile:              │ {}  ",
        report.aws_profile
    )?;
    writeln!(
        &mut output,
        "│ AWS region:               │ {}  ",
        report.aws_region
    )?;
    writeln!(
        &mut output,
        "│ Athena schema:            │ {}  ",
        report.schema
    )?;
    writeln!(
        &mut output,
        "│ Setup log:                │ {:?}  ",
        report.log_file
    )?;

    match report.entries.split_first() {
        Some((first, rest)) => {
            writeln!(
                &mut output,
                "│ Variables:                │ {}={}  ",
                first.key.cyan(),
                first.value
            )?;
            for entry in rest {
                writeln!(
                    &mut output,
                    "│                           │ {}={}  ",
                    entry.key.cyan(),
                    entry.value
                )?;
            }
        }
        None => {
            writeln!(
                &mut output,
                "│ Variables:                │ {}  ",
                "none recorded yet".yellow()
            )?;
        }
    }

    writeln!(&mut output, "└{:─^width$}┘", "", width = total_header_width)?;

    println!("{}", output);
    Ok(())
}
