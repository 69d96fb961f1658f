//! evioctl - evdev device inspection CLI
//!
//! Shows identity and capabilities of `/dev/input/eventN` nodes, streams
//! their events, finds devices by kind and drives force feedback and key
//! repeat.

#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod config;
mod error;
mod output;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::Commands;

#[derive(Parser, Debug)]
#[command(name = "evioctl")]
#[command(about = "Inspect and drive Linux evdev input devices")]
#[command(version)]
#[command(long_about = "
evioctl talks to evdev character devices (/dev/input/eventN) directly.
Most commands need read and write access to the node, which usually means
membership of the 'input' group or root.

Use --json for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(long, global = true, help = "Output in JSON format for machine parsing")]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Engine configuration file (JSON or YAML)
    #[arg(long, global = true, env = "EVIOCTL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("evioctl={log_level},evio_device={log_level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            error::exit_code(&e)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = config::load(cli.config.as_deref())?;
    commands::execute(&cli.command, cli.json, &config)
}
