//! Event records and their wire codec.
//!
//! The kernel exchanges `struct input_event` in native byte order:
//!
//! ```text
//! time_t       seconds
//! suseconds_t  microseconds
//! u16          type
//! u16          code
//! i32          value
//! ```
//!
//! The timestamp fields are platform width, so the record is 24 bytes on
//! 64-bit targets and 16 bytes on 32-bit ones. [`EVENT_SIZE`] is the size
//! for the target the crate is compiled for.

use crate::codes::{EV_FF, EV_SYN, SYN_REPORT, event_type_name};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem::size_of;

const SEC: usize = size_of::<libc::time_t>();
const USEC: usize = size_of::<libc::suseconds_t>();
const TYPE_AT: usize = SEC + USEC;
const CODE_AT: usize = TYPE_AT + 2;
const VALUE_AT: usize = CODE_AT + 2;

/// Size in bytes of one event record on the wire.
pub const EVENT_SIZE: usize = VALUE_AT + 4;

/// Event timestamp as reported by the kernel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Whole seconds
    pub seconds: libc::time_t,
    /// Microseconds within the second
    pub micros: libc::suseconds_t,
}

/// One input event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    /// Kernel timestamp (zero for events built in user space)
    pub time: Timestamp,
    /// Event type (`EV_*`)
    #[serde(rename = "type")]
    pub kind: u16,
    /// Type-specific code
    pub code: u16,
    /// Type-specific value
    pub value: i32,
}

impl Event {
    /// Creates an event with a zero timestamp.
    ///
    /// The kernel ignores the timestamp of events written to a device.
    pub const fn new(kind: u16, code: u16, value: i32) -> Self {
        Self {
            time: Timestamp {
                seconds: 0,
                micros: 0,
            },
            kind,
            code,
            value,
        }
    }

    /// `SYN_REPORT` marker closing a group of events.
    pub const fn sync() -> Self {
        Self::new(EV_SYN, SYN_REPORT, 0)
    }

    /// Force-feedback event: `code` is an effect id or a property code.
    pub const fn force_feedback(code: u16, value: i32) -> Self {
        Self::new(EV_FF, code, value)
    }

    /// Serializes the event to its wire record.
    pub fn encode(&self) -> [u8; EVENT_SIZE] {
        let mut out = [0u8; EVENT_SIZE];
        put(&mut out, 0, &self.time.seconds.to_ne_bytes());
        put(&mut out, SEC, &self.time.micros.to_ne_bytes());
        put(&mut out, TYPE_AT, &self.kind.to_ne_bytes());
        put(&mut out, CODE_AT, &self.code.to_ne_bytes());
        put(&mut out, VALUE_AT, &self.value.to_ne_bytes());
        out
    }

    /// Parses one wire record from the start of `bytes`.
    ///
    /// Returns `None` if fewer than [`EVENT_SIZE`] bytes are available.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        Some(Self {
            time: Timestamp {
                seconds: libc::time_t::from_ne_bytes(field(bytes, 0)?),
                micros: libc::suseconds_t::from_ne_bytes(field(bytes, SEC)?),
            },
            kind: u16::from_ne_bytes(field(bytes, TYPE_AT)?),
            code: u16::from_ne_bytes(field(bytes, CODE_AT)?),
            value: i32::from_ne_bytes(field(bytes, VALUE_AT)?),
        })
    }

    /// Whether this is a synchronization event.
    pub fn is_sync(&self) -> bool {
        self.kind == EV_SYN
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06} ", self.time.seconds, self.time.micros)?;
        match event_type_name(self.kind) {
            Some(name) => write!(f, "{name:<9}")?,
            None => write!(f, "{:#06x}   ", self.kind)?,
        }
        write!(f, " code {:#06x} value {}", self.code, self.value)
    }
}

/// Splits a buffer into whole event records.
///
/// The second element is the number of trailing bytes that do not form a
/// complete record; those bytes are never decoded.
pub fn frame(bytes: &[u8]) -> (impl Iterator<Item = Event> + '_, usize) {
    let chunks = bytes.chunks_exact(EVENT_SIZE);
    let trailing = chunks.remainder().len();
    (chunks.filter_map(Event::decode), trailing)
}

fn put(out: &mut [u8], at: usize, bytes: &[u8]) {
    if let Some(dst) = out.get_mut(at..at + bytes.len()) {
        dst.copy_from_slice(bytes);
    }
}

fn field<const N: usize>(bytes: &[u8], at: usize) -> Option<[u8; N]> {
    bytes.get(at..at + N)?.try_into().ok()
}
