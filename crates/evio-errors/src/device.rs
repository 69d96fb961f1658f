//! Device-level errors.

use crate::{ConfigError, ControlError};
use std::io;
use std::path::PathBuf;

/// Failure concerning an open device handle.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The device node could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        /// Path that was opened
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The engine has stopped; its queues are disconnected.
    #[error("device is closed")]
    Closed,

    /// A control call failed.
    #[error(transparent)]
    Control(#[from] ControlError),

    /// A worker thread could not be started.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        /// Thread name
        name: &'static str,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A worker thread panicked.
    #[error("{name} thread panicked")]
    ThreadPanicked {
        /// Thread name
        name: &'static str,
    },

    /// The effect has not been uploaded (negative id).
    #[error("effect id {id} does not refer to an uploaded effect")]
    InvalidEffectId {
        /// Offending id
        id: i16,
    },

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DeviceError {
    /// Create an open error.
    pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DeviceError::Open {
            path: path.into(),
            source,
        }
    }

    /// Check if this is a closed-handle error.
    pub fn is_closed(&self) -> bool {
        matches!(self, DeviceError::Closed)
    }

    /// Check if this wraps a control failure.
    pub fn is_control(&self) -> bool {
        matches!(self, DeviceError::Control(_))
    }

    /// Check if the node does not exist.
    ///
    /// Discovery uses this to stop scanning `/dev/input/eventN`.
    pub fn is_not_found(&self) -> bool {
        match self {
            DeviceError::Open { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Check if access to the node was refused.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            DeviceError::Open { source, .. } => {
                source.kind() == io::ErrorKind::PermissionDenied
            }
            DeviceError::Control(err) => {
                matches!(err.errno(), Some(libc::EACCES) | Some(libc::EPERM))
            }
            _ => false,
        }
    }

    /// The control failure this error wraps, if any.
    pub fn as_control(&self) -> Option<&ControlError> {
        match self {
            DeviceError::Control(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evio_ioctl::requests::EVIOCGRAB;

    #[test]
    fn test_open_not_found() {
        let err = DeviceError::open(
            "/dev/input/event99",
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(err.is_not_found());
        assert!(!err.is_permission_denied());
        assert!(err.to_string().contains("/dev/input/event99"));
    }

    #[test]
    fn test_open_permission_denied() {
        let err = DeviceError::open(
            "/dev/input/event0",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(err.is_permission_denied());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_control_conversion() {
        let err: DeviceError = ControlError::rejected(EVIOCGRAB, libc::EPERM).into();
        assert!(err.is_control());
        assert!(err.is_permission_denied());
        assert_eq!(err.as_control().and_then(ControlError::errno), Some(libc::EPERM));
    }

    #[test]
    fn test_thread_errors_name_the_thread() {
        let err = DeviceError::ThreadPanicked {
            name: "evio-inbound",
        };
        assert_eq!(err.to_string(), "evio-inbound thread panicked");
        assert!(!err.is_closed());
        assert!(DeviceError::Closed.is_closed());
    }
}
