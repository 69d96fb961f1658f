//! Fixed records returned by identity and axis queries.

use crate::codes::bus_name;
use evio_ioctl::requests::{ABS_INFO_SIZE, INPUT_ID_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calibration of one absolute axis (`struct input_absinfo`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbsInfo {
    /// Latest reported value
    pub value: i32,
    /// Minimum value
    pub minimum: i32,
    /// Maximum value
    pub maximum: i32,
    /// Noise filter threshold
    pub fuzz: i32,
    /// Dead zone around the center
    pub flat: i32,
    /// Units per millimeter (or per radian for rotational axes)
    pub resolution: i32,
}

impl AbsInfo {
    /// Parses the kernel record.
    pub fn from_bytes(bytes: &[u8; ABS_INFO_SIZE]) -> Self {
        let mut fields = bytes
            .chunks_exact(4)
            .map(|c| c.try_into().map(i32::from_ne_bytes).unwrap_or_default());
        let mut next = || fields.next().unwrap_or_default();
        Self {
            value: next(),
            minimum: next(),
            maximum: next(),
            fuzz: next(),
            flat: next(),
            resolution: next(),
        }
    }

    /// Serializes to the kernel record.
    pub fn to_bytes(&self) -> [u8; ABS_INFO_SIZE] {
        let fields = [
            self.value,
            self.minimum,
            self.maximum,
            self.fuzz,
            self.flat,
            self.resolution,
        ];
        let mut out = [0u8; ABS_INFO_SIZE];
        for (dst, field) in out.chunks_exact_mut(4).zip(fields) {
            dst.copy_from_slice(&field.to_ne_bytes());
        }
        out
    }
}

/// Device identity (`struct input_id`).
///
/// Only buses with real enumeration data (USB, Bluetooth) report meaningful
/// vendor and product numbers; legacy buses often report zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputId {
    /// Bus type (`BUS_*`)
    pub bus_type: u16,
    /// Vendor id
    pub vendor: u16,
    /// Product id
    pub product: u16,
    /// Product version
    pub version: u16,
}

impl InputId {
    /// Parses the kernel record.
    pub fn from_bytes(bytes: &[u8; INPUT_ID_SIZE]) -> Self {
        let [b0, b1, v0, v1, p0, p1, r0, r1] = *bytes;
        Self {
            bus_type: u16::from_ne_bytes([b0, b1]),
            vendor: u16::from_ne_bytes([v0, v1]),
            product: u16::from_ne_bytes([p0, p1]),
            version: u16::from_ne_bytes([r0, r1]),
        }
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match bus_name(self.bus_type) {
            Some(bus) => write!(f, "{bus}")?,
            None => write!(f, "bus {:#06x}", self.bus_type)?,
        }
        write!(
            f,
            " {:04x}:{:04x} v{:04x}",
            self.vendor, self.product, self.version
        )
    }
}

/// Driver protocol version as `(major, minor, revision)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DriverVersion {
    /// Major number
    pub major: u16,
    /// Minor number
    pub minor: u8,
    /// Revision
    pub revision: u8,
}

impl DriverVersion {
    /// Decodes the packed `EVIOCGVERSION` value.
    pub fn from_packed(raw: u32) -> Self {
        let [revision, minor, lo, hi] = raw.to_le_bytes();
        Self {
            major: u16::from_le_bytes([lo, hi]),
            minor,
            revision,
        }
    }
}

impl fmt::Display for DriverVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

/// Decodes a NUL-terminated string from a kernel-filled buffer.
///
/// Bytes after the first NUL are ignored; invalid UTF-8 is replaced.
pub fn decode_c_string(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(buf.get(..end).unwrap_or_default()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::BUS_USB;

    #[test]
    fn test_abs_info_round_trip() {
        let info = AbsInfo {
            value: 512,
            minimum: 0,
            maximum: 1023,
            fuzz: 4,
            flat: 16,
            resolution: -1,
        };
        assert_eq!(AbsInfo::from_bytes(&info.to_bytes()), info);
    }

    #[test]
    fn test_input_id_fields_in_order() {
        let mut raw = [0u8; INPUT_ID_SIZE];
        for (dst, v) in raw.chunks_exact_mut(2).zip([BUS_USB, 0x046d, 0xc52b, 0x0111]) {
            dst.copy_from_slice(&v.to_ne_bytes());
        }
        let id = InputId::from_bytes(&raw);
        assert_eq!(id.bus_type, BUS_USB);
        assert_eq!(id.vendor, 0x046d);
        assert_eq!(id.product, 0xc52b);
        assert_eq!(id.version, 0x0111);
        assert_eq!(id.to_string(), "usb 046d:c52b v0111");
    }

    #[test]
    fn test_version_decoding() {
        let v = DriverVersion::from_packed(0x0001_0001);
        assert_eq!((v.major, v.minor, v.revision), (1, 0, 1));
        let v = DriverVersion::from_packed(0x1234_5678);
        assert_eq!((v.major, v.minor, v.revision), (0x1234, 0x56, 0x78));
        assert_eq!(DriverVersion::default().to_string(), "0.0.0");
    }

    #[test]
    fn test_c_string_stops_at_nul() {
        assert_eq!(decode_c_string(b"Logitech G29\0garbage"), "Logitech G29");
        assert_eq!(decode_c_string(&[0u8; 256]), "");
        assert_eq!(decode_c_string(b"no terminator"), "no terminator");
    }
}
