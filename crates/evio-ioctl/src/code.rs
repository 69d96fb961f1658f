//! Request number packing and unpacking.

use core::fmt;

const IOC_NRBITS: u32 = 8;
const IOC_TYPEBITS: u32 = 8;
const IOC_SIZEBITS: u32 = 14;
const IOC_DIRBITS: u32 = 2;

const IOC_NRSHIFT: u32 = 0;
const IOC_TYPESHIFT: u32 = IOC_NRSHIFT + IOC_NRBITS;
const IOC_SIZESHIFT: u32 = IOC_TYPESHIFT + IOC_TYPEBITS;
const IOC_DIRSHIFT: u32 = IOC_SIZESHIFT + IOC_SIZEBITS;

const IOC_NRMASK: u32 = (1 << IOC_NRBITS) - 1;
const IOC_TYPEMASK: u32 = (1 << IOC_TYPEBITS) - 1;
const IOC_SIZEMASK: u32 = (1 << IOC_SIZEBITS) - 1;
const IOC_DIRMASK: u32 = (1 << IOC_DIRBITS) - 1;

/// Largest payload size a request can describe.
pub const MAX_SIZE: usize = IOC_SIZEMASK as usize;

/// Data transfer direction, seen from user space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    /// No payload.
    None = 0,
    /// User space writes, the driver reads.
    Write = 1,
    /// The driver writes, user space reads.
    Read = 2,
    /// Both.
    ReadWrite = 3,
}

impl Direction {
    /// Decodes the two direction bits.
    pub const fn from_bits(bits: u32) -> Self {
        match bits & IOC_DIRMASK {
            0 => Direction::None,
            1 => Direction::Write,
            2 => Direction::Read,
            _ => Direction::ReadWrite,
        }
    }

    const fn bits(self) -> u32 {
        self as u32
    }
}

/// Errors from the checked encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The payload does not fit the 14-bit size field.
    #[error("ioctl payload of {size} bytes exceeds the {max}-byte limit", max = MAX_SIZE)]
    SizeTooLarge {
        /// Requested payload size
        size: usize,
    },

    /// A request parameter (axis, event type) is outside its domain.
    #[error("request parameter {value:#x} exceeds {max:#x}")]
    ParamOutOfRange {
        /// Supplied parameter
        value: u16,
        /// Largest accepted parameter
        max: u16,
    },
}

/// A packed ioctl request number.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlCode(u32);

impl ControlCode {
    /// Packs the four fields. `size` is masked to 14 bits.
    pub const fn encode(direction: Direction, group: u8, number: u8, size: usize) -> Self {
        Self(
            (direction.bits() << IOC_DIRSHIFT)
                | ((group as u32) << IOC_TYPESHIFT)
                | ((number as u32) << IOC_NRSHIFT)
                | (((size as u32) & IOC_SIZEMASK) << IOC_SIZESHIFT),
        )
    }

    /// Wraps an already packed request number.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The packed value.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// The packed value in the width `ioctl(2)` expects.
    pub const fn as_raw(self) -> libc::c_ulong {
        self.0 as libc::c_ulong
    }

    /// Transfer direction.
    pub const fn direction(self) -> Direction {
        Direction::from_bits(self.0 >> IOC_DIRSHIFT)
    }

    /// Group (type) identifier, e.g. `b'E'` for evdev.
    pub const fn group(self) -> u8 {
        ((self.0 >> IOC_TYPESHIFT) & IOC_TYPEMASK) as u8
    }

    /// Command number within the group.
    pub const fn number(self) -> u8 {
        ((self.0 >> IOC_NRSHIFT) & IOC_NRMASK) as u8
    }

    /// Payload size in bytes.
    pub const fn size(self) -> usize {
        ((self.0 >> IOC_SIZESHIFT) & IOC_SIZEMASK) as usize
    }

    /// Same request with a different payload size.
    pub const fn with_size(self, size: usize) -> Self {
        Self::encode(self.direction(), self.group(), self.number(), size)
    }
}

impl fmt::Debug for ControlCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlCode")
            .field("raw", &format_args!("{:#010x}", self.0))
            .field("direction", &self.direction())
            .field("group", &char::from(self.group()))
            .field("number", &format_args!("{:#04x}", self.number()))
            .field("size", &self.size())
            .finish()
    }
}

impl fmt::Display for ControlCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Checked variant of [`ControlCode::encode`].
///
/// # Errors
///
/// Returns [`EncodeError::SizeTooLarge`] when `size` exceeds [`MAX_SIZE`].
pub const fn try_encode(
    direction: Direction,
    group: u8,
    number: u8,
    size: usize,
) -> Result<ControlCode, EncodeError> {
    if size > MAX_SIZE {
        return Err(EncodeError::SizeTooLarge { size });
    }
    Ok(ControlCode::encode(direction, group, number, size))
}

/// `_IO`: no payload.
pub const fn io(group: u8, number: u8) -> ControlCode {
    ControlCode::encode(Direction::None, group, number, 0)
}

/// `_IOR` with an explicit size.
pub const fn ior(group: u8, number: u8, size: usize) -> ControlCode {
    ControlCode::encode(Direction::Read, group, number, size)
}

/// `_IOW` with an explicit size.
pub const fn iow(group: u8, number: u8, size: usize) -> ControlCode {
    ControlCode::encode(Direction::Write, group, number, size)
}

/// `_IOWR` with an explicit size.
pub const fn iowr(group: u8, number: u8, size: usize) -> ControlCode {
    ControlCode::encode(Direction::ReadWrite, group, number, size)
}

/// `_IOR` sized by `T`.
pub const fn ior_of<T>(group: u8, number: u8) -> ControlCode {
    ior(group, number, core::mem::size_of::<T>())
}

/// `_IOW` sized by `T`.
pub const fn iow_of<T>(group: u8, number: u8) -> ControlCode {
    iow(group, number, core::mem::size_of::<T>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_positions() {
        let code = ControlCode::encode(Direction::Read, b'E', 0x06, 256);
        assert_eq!(code.bits(), 0x8100_4506);
    }

    #[test]
    fn test_round_trip_name_request() {
        let code = ControlCode::encode(Direction::Read, b'E', 0x06, 256);
        assert_eq!(code.direction(), Direction::Read);
        assert_eq!(code.group(), b'E');
        assert_eq!(code.number(), 0x06);
        assert_eq!(code.size(), 256);
    }

    #[test]
    fn test_direction_bits() {
        assert_eq!(io(b'E', 1).bits() >> 30, 0);
        assert_eq!(iow(b'E', 1, 4).bits() >> 30, 1);
        assert_eq!(ior(b'E', 1, 4).bits() >> 30, 2);
        assert_eq!(iowr(b'E', 1, 4).bits() >> 30, 3);
    }

    #[test]
    fn test_size_is_masked() {
        let code = ControlCode::encode(Direction::Read, b'E', 1, MAX_SIZE + 1);
        assert_eq!(code.size(), 0);
        assert_eq!(code.direction(), Direction::Read);
    }

    #[test]
    fn test_try_encode_rejects_oversize() {
        assert_eq!(
            try_encode(Direction::Read, b'E', 1, MAX_SIZE + 1),
            Err(EncodeError::SizeTooLarge { size: MAX_SIZE + 1 })
        );
        assert!(try_encode(Direction::Read, b'E', 1, MAX_SIZE).is_ok());
    }

    #[test]
    fn test_sized_by_type() {
        assert_eq!(ior_of::<u32>(b'E', 1).size(), 4);
        assert_eq!(iow_of::<[u32; 2]>(b'E', 3).size(), 8);
    }

    #[test]
    fn test_with_size_keeps_other_fields() {
        let code = ior(b'E', 0x18, 96).with_size(8);
        assert_eq!(code, ior(b'E', 0x18, 8));
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(ior(b'E', 0x01, 4).to_string(), "0x80044501");
    }
}
