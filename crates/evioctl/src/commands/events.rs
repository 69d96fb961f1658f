//! Event streaming command

use anyhow::Result;
use evio_device::EngineConfig;
use std::path::Path;
use tracing::{info, warn};

use crate::commands;
use crate::output;

/// Print incoming events until `count` is reached or the stream ends.
pub fn listen(
    node: &Path,
    grab: bool,
    count: Option<usize>,
    json: bool,
    config: &EngineConfig,
) -> Result<()> {
    let device = commands::open(node, config)?;
    if grab {
        device.grab()?;
    }
    if !json {
        println!("Listening on {} ({})", node.display(), device.name());
    }

    let limit = count.unwrap_or(usize::MAX);
    let mut seen = 0usize;
    for event in device.incoming().iter().take(limit) {
        seen += 1;
        if json {
            output::print_event_json(&event);
        } else {
            println!("{event}");
        }
    }

    for diagnostic in device.diagnostics().try_iter() {
        warn!(%diagnostic, "event loop reported");
    }
    info!(events = seen, "listen finished");
    commands::close(device)
}
