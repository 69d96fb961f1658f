//! Force-feedback commands

use anyhow::Result;
use evio_device::codes::FF_RUMBLE;
use evio_device::{Device, Domain, Effect, EngineConfig};
use serde_json::json;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::warn;

use crate::commands;
use crate::error::CliError;
use crate::output;

/// Upload a rumble effect, play it for its length, then erase it.
pub fn rumble(
    node: &Path,
    strong: u16,
    weak: u16,
    ms: u16,
    json: bool,
    config: &EngineConfig,
) -> Result<()> {
    let device = commands::open(node, config)?;
    if !Device::supports(&device.capabilities(Domain::ForceFeedback), &[FF_RUMBLE]) {
        commands::close(device)?;
        return Err(CliError::Unsupported(format!("{} has no rumble motor", node.display())).into());
    }

    let mut effect = Effect::rumble(strong, weak, ms);
    device.upload_effect(&mut effect)?;
    let played = device
        .play_effect(effect.id)
        .map(|()| thread::sleep(Duration::from_millis(u64::from(ms))))
        .and_then(|()| device.stop_effect(effect.id));
    if let Err(e) = device.remove_effect(effect.id) {
        warn!(id = effect.id, error = %e, "failed to erase effect");
    }
    played?;
    commands::close(device)?;

    if json {
        let summary = json!({ "id": effect.id, "strong": strong, "weak": weak, "ms": ms });
        output::print_json("effect", &summary);
    } else {
        println!("Played rumble effect {} for {ms} ms", effect.id);
    }
    Ok(())
}
