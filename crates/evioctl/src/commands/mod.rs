//! Command implementations for evioctl

pub mod events;
pub mod ff;
pub mod find;
pub mod info;
pub mod keys;

use crate::error::CliError;
use clap::Subcommand;
use evio_device::{Device, DeviceKind, EngineConfig};
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show name, physical path, identity and event types
    Info {
        /// Device node, e.g. /dev/input/event3
        node: PathBuf,
    },

    /// List every capability mask as set codes
    Caps {
        /// Device node
        node: PathBuf,
    },

    /// Print events as they arrive
    Listen {
        /// Device node
        node: PathBuf,
        /// Take exclusive access while listening
        #[arg(short, long)]
        grab: bool,
        /// Stop after this many events
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Open every device of a kind
    Find {
        /// Device kind
        #[arg(value_parser = parse_kind)]
        kind: DeviceKind,
        /// Directory holding the event nodes
        #[arg(
            long,
            env = "EVIOCTL_INPUT_DIR",
            default_value = evio_device::discovery::INPUT_DIR,
            hide = true
        )]
        input_dir: PathBuf,
    },

    /// Play a rumble effect
    Rumble {
        /// Device node
        node: PathBuf,
        /// Strong (low-frequency) motor magnitude
        #[arg(long, default_value_t = 0xc000)]
        strong: u16,
        /// Weak (high-frequency) motor magnitude
        #[arg(long, default_value_t = 0x4000)]
        weak: u16,
        /// Duration in milliseconds
        #[arg(long, default_value_t = 500)]
        ms: u16,
    },

    /// Show or change the key repeat rate
    Repeat {
        /// Device node
        node: PathBuf,
        /// Delay before repeating, in milliseconds
        #[arg(long)]
        delay: Option<u32>,
        /// Interval between repeats, in milliseconds
        #[arg(long)]
        period: Option<u32>,
    },
}

fn parse_kind(s: &str) -> Result<DeviceKind, String> {
    s.parse()
}

/// Open a device node, classifying open failures for exit codes.
pub fn open(node: &Path, config: &EngineConfig) -> anyhow::Result<Device> {
    Device::open_with(node, config).map_err(|e| CliError::from_device(node, e))
}

/// Close a device, classifying shutdown failures.
pub fn close(device: Device) -> anyhow::Result<()> {
    let path = device.path().to_path_buf();
    device.close().map_err(|e| CliError::from_device(&path, e))
}

/// Execute a command
pub fn execute(cmd: &Commands, json: bool, config: &EngineConfig) -> anyhow::Result<()> {
    match cmd {
        Commands::Info { node } => info::info(node, json, config),
        Commands::Caps { node } => info::caps(node, json, config),
        Commands::Listen { node, grab, count } => events::listen(node, *grab, *count, json, config),
        Commands::Find { kind, input_dir } => find::find(input_dir, *kind, json, config),
        Commands::Rumble {
            node,
            strong,
            weak,
            ms,
        } => ff::rumble(node, *strong, *weak, *ms, json, config),
        Commands::Repeat {
            node,
            delay,
            period,
        } => keys::repeat(node, *delay, *period, json, config),
    }
}
