//! Linux ioctl request encoding
//!
//! Every evdev query or command is addressed by a 32-bit request number that
//! packs four fields, low bits first:
//!
//! | field     | bits | shift |
//! |-----------|------|-------|
//! | number    | 8    | 0     |
//! | group     | 8    | 8     |
//! | size      | 14   | 16    |
//! | direction | 2    | 30    |
//!
//! The widths and order are those of the kernel's `_IOC` macro family and
//! must not change; a request with a different payload size is a different
//! request as far as the driver is concerned.
//!
//! The [`requests`] module holds the evdev request table: fixed requests as
//! `const` values and length-parameterised ones as `const fn`.

#![deny(clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod code;
pub mod requests;

pub use code::{
    ControlCode, Direction, EncodeError, MAX_SIZE, io, ior, ior_of, iow, iow_of, iowr, try_encode,
};
