//! Linux evdev device handles
//!
//! A [`Device`] owns one open `/dev/input/eventN` node. Opening it starts two
//! event loops on their own threads:
//!
//! - the inbound loop reads raw records, frames them into [`Event`]s and
//!   delivers them in kernel order on a bounded incoming queue;
//! - the outbound loop drains a bounded outgoing queue and writes each event
//!   as one fixed-size record.
//!
//! Capability masks, identity strings, axis calibration, key maps and
//! force-feedback effects are handled through synchronous control calls on
//! the same handle, independent of the loops.
//!
//! All device I/O goes through the [`Transport`] trait. [`EvdevNode`] is the
//! real character device; [`mock::MockTransport`] scripts reads and control
//! responses for tests.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use evio_device::{Device, EngineConfig, Event, codes::EV_KEY, mock::MockTransport};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mock = Arc::new(MockTransport::new());
//! mock.push_read(Event::new(EV_KEY, 30, 1).encode());
//!
//! let device = Device::from_transport(mock, "mock0", &EngineConfig::default())?;
//! let event = device.incoming().recv()?;
//! assert_eq!((event.kind, event.code, event.value), (EV_KEY, 30, 1));
//! device.close()?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod capability;
pub mod codes;
pub mod config;
pub mod device;
pub mod discovery;
pub mod effects;
pub mod event;
pub mod info;
pub mod mock;
pub mod transport;

mod engine;
mod sys;

pub use capability::Domain;
pub use config::EngineConfig;
pub use device::{Device, RepeatSettings, scale_percent};
pub use discovery::{DeviceKind, find, find_in};
pub use effects::{Effect, EffectKind, EffectPayload};
pub use engine::Diagnostic;
pub use event::{EVENT_SIZE, Event, Timestamp};
pub use info::{AbsInfo, DriverVersion, InputId};
pub use transport::{CallArg, EvdevNode, Transport};

pub use evio_bitset::Bitset;
pub use evio_errors::{ConfigError, ControlError, DeviceError, Result};
