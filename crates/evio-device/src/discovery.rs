//! Device classification and discovery.

use crate::capability;
use crate::codes::{EV_ABS, EV_KEY, EV_LED, EV_REL};
use crate::config::EngineConfig;
use crate::device::Device;
use evio_bitset::Bitset;
use evio_errors::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Directory holding the evdev nodes.
pub const INPUT_DIR: &str = "/dev/input";

/// Coarse device class, judged from the supported event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Keys and LEDs
    Keyboard,
    /// Keys (buttons) and relative axes
    Mouse,
    /// Keys (buttons) and absolute axes
    Joystick,
}

impl DeviceKind {
    /// Every kind.
    pub const ALL: [DeviceKind; 3] =
        [DeviceKind::Keyboard, DeviceKind::Mouse, DeviceKind::Joystick];

    /// Event types a device must support to be of this kind.
    pub const fn required_event_types(self) -> [u16; 2] {
        match self {
            DeviceKind::Keyboard => [EV_KEY, EV_LED],
            DeviceKind::Mouse => [EV_KEY, EV_REL],
            DeviceKind::Joystick => [EV_KEY, EV_ABS],
        }
    }

    /// Tests an event-type mask against this kind.
    pub fn matches(self, event_types: &Bitset) -> bool {
        capability::supports(event_types, &self.required_event_types())
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeviceKind::Keyboard => "keyboard",
            DeviceKind::Mouse => "mouse",
            DeviceKind::Joystick => "joystick",
        })
    }
}

impl std::str::FromStr for DeviceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keyboard" => Ok(DeviceKind::Keyboard),
            "mouse" => Ok(DeviceKind::Mouse),
            "joystick" => Ok(DeviceKind::Joystick),
            other => Err(format!("unknown device kind '{other}'")),
        }
    }
}

impl Device {
    /// Whether the device's event types classify it as `kind`.
    ///
    /// A failed event-type query classifies as nothing.
    pub fn is_kind(&self, kind: DeviceKind) -> bool {
        kind.matches(&self.event_types())
    }

    /// Every kind this device classifies as.
    pub fn kinds(&self) -> Vec<DeviceKind> {
        let types = self.event_types();
        DeviceKind::ALL
            .into_iter()
            .filter(|kind| kind.matches(&types))
            .collect()
    }
}

/// Opens every device of `kind` under [`INPUT_DIR`].
///
/// # Errors
///
/// See [`find_in`].
pub fn find(kind: DeviceKind) -> Result<Vec<Device>> {
    find_in(INPUT_DIR, kind, &EngineConfig::default())
}

/// Opens every device of `kind` among `dir/event0`, `dir/event1`, ...
///
/// Scanning stops at the first missing node. Devices that do not match are
/// closed again.
///
/// # Errors
///
/// Any open failure other than a missing node (typically permission denied)
/// aborts the scan; devices already opened are closed when the returned
/// error drops them.
pub fn find_in(
    dir: impl AsRef<Path>,
    kind: DeviceKind,
    config: &EngineConfig,
) -> Result<Vec<Device>> {
    let dir = dir.as_ref();
    let mut found = Vec::new();
    for index in 0usize.. {
        let path = dir.join(format!("event{index}"));
        let device = match Device::open_with(&path, config) {
            Ok(device) => device,
            Err(e) if e.is_not_found() => break,
            Err(e) => return Err(e),
        };
        if device.is_kind(kind) {
            debug!(path = %path.display(), %kind, "device matches");
            found.push(device);
        } else if let Err(e) = device.close() {
            warn!(path = %path.display(), error = %e, "failed to close non-matching device");
        }
    }
    info!(%kind, count = found.len(), dir = %dir.display(), "discovery finished");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        let keyboard = Bitset::with_bits(32, [usize::from(EV_KEY), usize::from(EV_LED)]);
        assert!(DeviceKind::Keyboard.matches(&keyboard));
        assert!(!DeviceKind::Mouse.matches(&keyboard));
        assert!(!DeviceKind::Joystick.matches(&keyboard));

        let gamepad = Bitset::with_bits(32, [usize::from(EV_KEY), usize::from(EV_ABS)]);
        assert!(DeviceKind::Joystick.matches(&gamepad));
        assert!(!DeviceKind::Keyboard.matches(&gamepad));

        assert!(!DeviceKind::Mouse.matches(&Bitset::new(32)));
    }

    #[test]
    fn test_kind_parse_and_display() -> std::result::Result<(), String> {
        for kind in DeviceKind::ALL {
            assert_eq!(kind.to_string().parse::<DeviceKind>()?, kind);
        }
        assert_eq!("Mouse".parse::<DeviceKind>()?, DeviceKind::Mouse);
        assert!("tablet".parse::<DeviceKind>().is_err());
        Ok(())
    }
}
