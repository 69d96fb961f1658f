//! Error types for evioctl

use evio_errors::{ControlError, DeviceError};
use std::path::Path;
use std::process::ExitCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not supported by device: {0}")]
    Unsupported(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl CliError {
    /// Classifies a device failure for `path`, keeping unclassified errors
    /// as they are.
    pub fn from_device(path: &Path, err: DeviceError) -> anyhow::Error {
        let target = path.display().to_string();
        if err.is_not_found() {
            CliError::DeviceNotFound(target).into()
        } else if err.is_permission_denied() {
            CliError::PermissionDenied(target).into()
        } else if err.as_control().is_some_and(ControlError::is_unsupported) {
            CliError::Unsupported(err.to_string()).into()
        } else if let DeviceError::Config(config) = err {
            CliError::InvalidConfiguration(config.to_string()).into()
        } else {
            anyhow::Error::new(err).context(format!("device {target}"))
        }
    }
}

/// Process exit status for a failed command.
pub fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<CliError>() {
        Some(CliError::DeviceNotFound(_)) => 2,
        Some(CliError::InvalidConfiguration(_))
        | Some(CliError::JsonError(_))
        | Some(CliError::YamlError(_)) => 4,
        Some(CliError::Unsupported(_)) => 5,
        Some(CliError::PermissionDenied(_)) => 6,
        _ => 1,
    }
}

/// [`exit_status`] as an [`ExitCode`].
pub fn exit_code(err: &anyhow::Error) -> ExitCode {
    ExitCode::from(exit_status(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_missing_node_maps_to_device_not_found() {
        let err = CliError::from_device(
            Path::new("/dev/input/event42"),
            DeviceError::open("/dev/input/event42", io::Error::from(io::ErrorKind::NotFound)),
        );
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::DeviceNotFound(path)) if path == "/dev/input/event42"
        ));
        assert_eq!(exit_status(&err), 2);
    }

    #[test]
    fn test_access_refused_maps_to_permission_denied() {
        let err = CliError::from_device(
            Path::new("/dev/input/event0"),
            DeviceError::open(
                "/dev/input/event0",
                io::Error::from(io::ErrorKind::PermissionDenied),
            ),
        );
        assert_eq!(exit_status(&err), 6);
    }

    #[test]
    fn test_unclassified_errors_exit_with_one() {
        let err = CliError::from_device(Path::new("/dev/input/event0"), DeviceError::Closed);
        assert_eq!(exit_status(&err), 1);
        assert!(format!("{err:#}").contains("device is closed"));
    }
}
