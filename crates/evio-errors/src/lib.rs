//! Error types for evio
//!
//! Failures are split by how far they reach:
//!
//! - [`ControlError`]: one control call was rejected; the handle stays usable.
//! - [`DeviceError`]: failures that concern the handle itself (open, closed
//!   queues, worker threads) plus wrapped control failures.
//! - [`ConfigError`]: invalid engine configuration.
//!
//! Stream termination on the inbound path is not an error value at all: it is
//! reported by the incoming queue disconnecting.
//!
//! # Example
//!
//! ```
//! use evio_errors::{ControlError, DeviceError};
//! use evio_ioctl::requests::EVIOCGRAB;
//!
//! let err: DeviceError = ControlError::rejected(EVIOCGRAB, libc::EBUSY).into();
//! assert!(err.is_control());
//! assert!(!err.is_closed());
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod control;
pub mod device;

pub use config::ConfigError;
pub use control::ControlError;
pub use device::DeviceError;

/// A specialized `Result` type for device operations.
pub type Result<T, E = DeviceError> = std::result::Result<T, E>;

