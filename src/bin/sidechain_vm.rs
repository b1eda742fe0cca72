//! Runs a hex-encoded script against an empty chain and prints the outcome.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use sidechain_config::VmSettings;
use sidechain_rs::logging::{self, LogFormat};
use sidechain_rs::runner::{report, run_script};
use sidechain_vm::VMState;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "sidechain-vm",
    version = env!("CARGO_PKG_VERSION"),
    about = "Execute a contract script against an in-memory store"
)]
struct Args {
    /// The script to run, hex encoded (an optional 0x prefix is ignored)
    #[arg(value_name = "SCRIPT")]
    script: String,

    /// Settings file (TOML) overriding the engine limits
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Gas budget in fixed-point units; overrides the settings file
    #[arg(long = "gas-limit", value_name = "UNITS")]
    gas_limit: Option<i64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long = "log", value_name = "FILTER", default_value = "warn")]
    log: String,

    /// Log output format
    #[arg(long = "log-format", value_enum, default_value = "text")]
    log_format: Format,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn load_settings(args: &Args) -> Result<VmSettings> {
    let mut settings = match &args.config {
        Some(path) => VmSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => VmSettings::default(),
    };
    if let Some(gas_limit) = args.gas_limit {
        settings.gas_limit = gas_limit;
        settings.validate()?;
    }
    Ok(settings)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let format = match args.log_format {
        Format::Text => LogFormat::Text,
        Format::Json => LogFormat::Json,
    };
    logging::init(&args.log, format)?;

    let settings = load_settings(&args)?;
    let script = hex::decode(args.script.trim().trim_start_matches("0x"))
        .context("script is not valid hex")?;
    info!(script_len = script.len(), gas_limit = settings.gas_limit, "running script");

    let engine = run_script(&script, &settings)?;
    print!("{}", report(&engine));

    Ok(if engine.state() == VMState::HALT {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
