//! Device identity and capability commands

use anyhow::Result;
use colored::Colorize;
use evio_device::codes::{bus_name, event_type_name};
use evio_device::{Device, DeviceKind, Domain, EngineConfig, InputId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::commands;
use crate::output;

/// What `info` and `find` report about one device.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub path: String,
    pub name: String,
    pub phys: String,
    pub serial: String,
    pub driver_version: String,
    pub id: InputId,
    pub event_types: Vec<String>,
    pub kinds: Vec<DeviceKind>,
}

impl Summary {
    pub fn collect(device: &Device) -> Self {
        let event_types = device
            .event_types()
            .iter_ones()
            .map(|code| {
                u16::try_from(code)
                    .ok()
                    .and_then(event_type_name)
                    .map_or_else(|| format!("{code:#04x}"), str::to_string)
            })
            .collect();
        Self {
            path: device.path().display().to_string(),
            name: device.name(),
            phys: device.phys(),
            serial: device.serial(),
            driver_version: device.version().to_string(),
            id: device.id(),
            event_types,
            kinds: device.kinds(),
        }
    }

    pub fn print_human(&self) {
        println!("{} {}", self.path.bold(), self.name);
        output::field("Phys", &self.phys);
        if !self.serial.is_empty() {
            output::field("Serial", &self.serial);
        }
        output::field("Driver", &self.driver_version);
        let bus = bus_name(self.id.bus_type).unwrap_or("unknown");
        output::field(
            "Id",
            format!(
                "bus {bus} vendor {:04x} product {:04x} version {:04x}",
                self.id.vendor, self.id.product, self.id.version
            ),
        );
        output::field("Events", self.event_types.join(" "));
        if !self.kinds.is_empty() {
            let kinds: Vec<String> = self.kinds.iter().map(ToString::to_string).collect();
            output::field("Kind", kinds.join(", "));
        }
    }
}

pub fn info(node: &Path, json: bool, config: &EngineConfig) -> Result<()> {
    let device = commands::open(node, config)?;
    let summary = Summary::collect(&device);
    commands::close(device)?;

    if json {
        output::print_json("device", &summary);
    } else {
        summary.print_human();
    }
    Ok(())
}

pub fn caps(node: &Path, json: bool, config: &EngineConfig) -> Result<()> {
    let device = commands::open(node, config)?;
    let masks: Vec<_> = Domain::ALL
        .into_iter()
        .map(|domain| (domain, device.capabilities(domain)))
        .collect();
    let (effects, _) = device.force_feedback_caps();
    commands::close(device)?;

    if json {
        let codes: BTreeMap<&str, Vec<usize>> = masks
            .iter()
            .map(|(domain, mask)| (domain.name(), mask.iter_ones().collect()))
            .collect();
        output::print_json(
            "capabilities",
            &serde_json::json!({ "masks": codes, "simultaneous_effects": effects }),
        );
    } else {
        println!("{}", node.display().to_string().bold());
        for (domain, mask) in &masks {
            output::field(domain.name(), output::format_mask(*domain, mask));
        }
        if effects > 0 {
            output::field("ff slots", effects);
        }
    }
    Ok(())
}
