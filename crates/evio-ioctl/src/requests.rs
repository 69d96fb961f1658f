//! evdev request table (`<linux/input.h>`).
//!
//! Requests whose payload is a fixed record are plain constants. Requests that
//! transfer a caller-sized buffer take the buffer length and must be encoded
//! with the length actually passed to the kernel.

use crate::code::{ControlCode, EncodeError, ior, iow};

/// ioctl group for evdev.
pub const EVDEV_GROUP: u8 = b'E';

const INT: usize = core::mem::size_of::<libc::c_int>();

/// Size of `struct input_id` (four `u16`).
pub const INPUT_ID_SIZE: usize = 8;

/// Size of `struct input_absinfo` (six `i32`).
pub const ABS_INFO_SIZE: usize = 24;

/// `EVIOCGVERSION`: driver version.
pub const EVIOCGVERSION: ControlCode = ior(EVDEV_GROUP, 0x01, INT);
/// `EVIOCGID`: device identity.
pub const EVIOCGID: ControlCode = ior(EVDEV_GROUP, 0x02, INPUT_ID_SIZE);
/// `EVIOCGREP`: repeat settings (delay, period).
pub const EVIOCGREP: ControlCode = ior(EVDEV_GROUP, 0x03, 2 * INT);
/// `EVIOCSREP`: set repeat settings.
pub const EVIOCSREP: ControlCode = iow(EVDEV_GROUP, 0x03, 2 * INT);
/// `EVIOCGKEYCODE`: keycode for a scancode.
pub const EVIOCGKEYCODE: ControlCode = ior(EVDEV_GROUP, 0x04, 2 * INT);
/// `EVIOCSKEYCODE`: remap a scancode.
pub const EVIOCSKEYCODE: ControlCode = iow(EVDEV_GROUP, 0x04, 2 * INT);
/// `EVIOCRMFF`: erase a force-feedback effect (id passed by value).
pub const EVIOCRMFF: ControlCode = iow(EVDEV_GROUP, 0x81, INT);
/// `EVIOCGEFFECTS`: number of effects playable at once.
pub const EVIOCGEFFECTS: ControlCode = ior(EVDEV_GROUP, 0x84, INT);
/// `EVIOCGRAB`: grab or release the device (flag passed by value).
pub const EVIOCGRAB: ControlCode = iow(EVDEV_GROUP, 0x90, INT);
/// `EVIOCREVOKE`: revoke access to the device.
pub const EVIOCREVOKE: ControlCode = iow(EVDEV_GROUP, 0x91, INT);
/// `EVIOCSCLOCKID`: clock used for event timestamps.
pub const EVIOCSCLOCKID: ControlCode = iow(EVDEV_GROUP, 0xa0, INT);

/// `EVIOCGNAME(len)`: device name.
pub const fn eviocgname(len: usize) -> ControlCode {
    ior(EVDEV_GROUP, 0x06, len)
}

/// `EVIOCGPHYS(len)`: physical location.
pub const fn eviocgphys(len: usize) -> ControlCode {
    ior(EVDEV_GROUP, 0x07, len)
}

/// `EVIOCGUNIQ(len)`: unique identifier (serial).
pub const fn eviocguniq(len: usize) -> ControlCode {
    ior(EVDEV_GROUP, 0x08, len)
}

/// `EVIOCGPROP(len)`: input property mask.
pub const fn eviocgprop(len: usize) -> ControlCode {
    ior(EVDEV_GROUP, 0x09, len)
}

/// `EVIOCGKEY(len)`: global key state.
pub const fn eviocgkey(len: usize) -> ControlCode {
    ior(EVDEV_GROUP, 0x18, len)
}

/// `EVIOCGLED(len)`: LED state.
pub const fn eviocgled(len: usize) -> ControlCode {
    ior(EVDEV_GROUP, 0x19, len)
}

/// `EVIOCGSND(len)`: sound state.
pub const fn eviocgsnd(len: usize) -> ControlCode {
    ior(EVDEV_GROUP, 0x1a, len)
}

/// `EVIOCGSW(len)`: switch state.
pub const fn eviocgsw(len: usize) -> ControlCode {
    ior(EVDEV_GROUP, 0x1b, len)
}

/// `EVIOCGBIT(ev, len)`: capability mask for event type `ev`
/// (`ev == 0` asks for the supported event types themselves).
pub const fn eviocgbit(ev: u8, len: usize) -> ControlCode {
    ior(EVDEV_GROUP, 0x20u8.wrapping_add(ev), len)
}

/// `EVIOCGABS(abs)`: calibration of one absolute axis.
pub const fn eviocgabs(abs: u8) -> ControlCode {
    ior(EVDEV_GROUP, 0x40u8.wrapping_add(abs), ABS_INFO_SIZE)
}

/// `EVIOCSABS(abs)`: set calibration of one absolute axis.
pub const fn eviocsabs(abs: u8) -> ControlCode {
    iow(EVDEV_GROUP, 0xc0u8.wrapping_add(abs), ABS_INFO_SIZE)
}

/// Largest absolute axis code (`ABS_MAX`).
pub const ABS_AXIS_MAX: u16 = 0x3f;

/// Checked `EVIOCGABS`: rejects axes above [`ABS_AXIS_MAX`], whose numbers
/// would alias the `EVIOCSABS` range.
///
/// # Errors
///
/// Returns [`EncodeError::ParamOutOfRange`] for an unknown axis.
pub fn try_eviocgabs(abs: u16) -> Result<ControlCode, EncodeError> {
    checked_axis(abs).map(eviocgabs)
}

/// Checked `EVIOCSABS`, see [`try_eviocgabs`].
///
/// # Errors
///
/// Returns [`EncodeError::ParamOutOfRange`] for an unknown axis.
pub fn try_eviocsabs(abs: u16) -> Result<ControlCode, EncodeError> {
    checked_axis(abs).map(eviocsabs)
}

fn checked_axis(abs: u16) -> Result<u8, EncodeError> {
    u8::try_from(abs)
        .ok()
        .filter(|_| abs <= ABS_AXIS_MAX)
        .ok_or(EncodeError::ParamOutOfRange {
            value: abs,
            max: ABS_AXIS_MAX,
        })
}

/// `EVIOCSFF`: upload a force-feedback effect of `size` bytes
/// (`sizeof(struct ff_effect)` on the running platform).
pub const fn eviocsff(size: usize) -> ControlCode {
    iow(EVDEV_GROUP, 0x80, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Direction;

    // Values as produced by the C macros on x86_64.
    #[test]
    fn test_fixed_requests_match_kernel_values() {
        assert_eq!(EVIOCGVERSION.bits(), 0x8004_4501);
        assert_eq!(EVIOCGID.bits(), 0x8008_4502);
        assert_eq!(EVIOCGREP.bits(), 0x8008_4503);
        assert_eq!(EVIOCSREP.bits(), 0x4008_4503);
        assert_eq!(EVIOCGKEYCODE.bits(), 0x8008_4504);
        assert_eq!(EVIOCSKEYCODE.bits(), 0x4008_4504);
        assert_eq!(EVIOCRMFF.bits(), 0x4004_4581);
        assert_eq!(EVIOCGEFFECTS.bits(), 0x8004_4584);
        assert_eq!(EVIOCGRAB.bits(), 0x4004_4590);
        assert_eq!(EVIOCREVOKE.bits(), 0x4004_4591);
        assert_eq!(EVIOCSCLOCKID.bits(), 0x4004_45a0);
    }

    #[test]
    fn test_sized_requests_match_kernel_values() {
        assert_eq!(eviocgname(256).bits(), 0x8100_4506);
        assert_eq!(eviocgphys(256).bits(), 0x8100_4507);
        assert_eq!(eviocguniq(256).bits(), 0x8100_4508);
        assert_eq!(eviocgkey(96).bits(), 0x8060_4518);
        assert_eq!(eviocgbit(0, 8).bits(), 0x8008_4520);
        assert_eq!(eviocgbit(0x03, 8).bits(), 0x8008_4523);
        assert_eq!(eviocgabs(0x01).bits(), 0x8018_4541);
        assert_eq!(eviocsabs(0x01).bits(), 0x4018_45c1);
        assert_eq!(eviocsff(48).bits(), 0x4030_4580);
    }

    #[test]
    fn test_checked_axis_requests() {
        assert_eq!(try_eviocgabs(0x3f), Ok(eviocgabs(0x3f)));
        assert_eq!(try_eviocsabs(0x00), Ok(eviocsabs(0x00)));
        assert_eq!(
            try_eviocgabs(0x40),
            Err(EncodeError::ParamOutOfRange {
                value: 0x40,
                max: ABS_AXIS_MAX
            })
        );
        assert!(try_eviocsabs(0x1ff).is_err());
    }

    #[test]
    fn test_bit_request_number_follows_event_type() {
        for ev in 0u8..0x20 {
            let code = eviocgbit(ev, 16);
            assert_eq!(code.number(), 0x20 + ev);
            assert_eq!(code.direction(), Direction::Read);
            assert_eq!(code.size(), 16);
        }
    }
}
