//! Discovery command

use anyhow::Result;
use colored::Colorize;
use evio_device::{DeviceKind, EngineConfig, find_in};
use std::path::Path;

use crate::commands;
use crate::commands::info::Summary;
use crate::error::CliError;
use crate::output;

pub fn find(dir: &Path, kind: DeviceKind, json: bool, config: &EngineConfig) -> Result<()> {
    let devices = find_in(dir, kind, config).map_err(|e| CliError::from_device(dir, e))?;
    let summaries: Vec<Summary> = devices.iter().map(Summary::collect).collect();
    for device in devices {
        commands::close(device)?;
    }

    if json {
        output::print_json("devices", &summaries);
    } else if summaries.is_empty() {
        println!("{}", format!("No {kind} devices found").yellow());
    } else {
        for summary in &summaries {
            summary.print_human();
        }
    }
    Ok(())
}
