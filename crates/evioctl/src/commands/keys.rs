//! Keyboard commands

use anyhow::Result;
use evio_device::{EngineConfig, RepeatSettings};
use std::path::Path;

use crate::commands;
use crate::output;

/// Show the repeat rate, changing it first if `delay` or `period` is given.
///
/// A value that is not given keeps its current setting.
pub fn repeat(
    node: &Path,
    delay: Option<u32>,
    period: Option<u32>,
    json: bool,
    config: &EngineConfig,
) -> Result<()> {
    let device = commands::open(node, config)?;
    let mut settings = device.repeat()?;
    if delay.is_some() || period.is_some() {
        settings = merge(settings, delay, period);
        device.set_repeat(settings)?;
        settings = device.repeat()?;
    }
    commands::close(device)?;

    if json {
        output::print_json("repeat", &settings);
    } else {
        println!("delay {} ms, period {} ms", settings.delay_ms, settings.period_ms);
    }
    Ok(())
}

fn merge(current: RepeatSettings, delay: Option<u32>, period: Option<u32>) -> RepeatSettings {
    RepeatSettings {
        delay_ms: delay.unwrap_or(current.delay_ms),
        period_ms: period.unwrap_or(current.period_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unspecified_values() {
        let current = RepeatSettings {
            delay_ms: 250,
            period_ms: 33,
        };
        assert_eq!(merge(current, Some(500), None).period_ms, 33);
        assert_eq!(merge(current, None, Some(20)).delay_ms, 250);
        assert_eq!(merge(current, None, None), current);
    }
}
