//! Control-call failures.
//!
//! A control call is a single request/response against the open descriptor.
//! Its failure never affects the lifecycle of the handle.

use evio_ioctl::{ControlCode, EncodeError};
use std::io;

/// Failure of one control call, or of a batch of them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    /// The driver rejected the request.
    #[error("request {request} rejected: {}", io::Error::from_raw_os_error(*errno))]
    Rejected {
        /// Request that failed
        request: ControlCode,
        /// OS error number
        errno: i32,
    },

    /// The buffer handed to the call does not fit the encoded payload size.
    #[error("request {request} expects {expected} bytes, buffer holds {actual}")]
    BufferMismatch {
        /// Request that was not issued
        request: ControlCode,
        /// Size encoded in the request
        expected: usize,
        /// Size of the supplied buffer
        actual: usize,
    },

    /// Item `index` of a batch failed; earlier items stay applied.
    #[error("batch stopped at item {index}: {source}")]
    Batch {
        /// Zero-based index of the rejected item
        index: usize,
        /// Failure of that item
        #[source]
        source: Box<ControlError>,
    },

    /// The request could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl ControlError {
    /// Create a rejection error.
    pub fn rejected(request: ControlCode, errno: i32) -> Self {
        ControlError::Rejected { request, errno }
    }

    /// Create a rejection error from an I/O error.
    ///
    /// Errors without an OS code are reported as `EIO`.
    pub fn from_io(request: ControlCode, err: &io::Error) -> Self {
        Self::rejected(request, err.raw_os_error().unwrap_or(libc::EIO))
    }

    /// Wrap a failure as item `index` of a batch.
    pub fn batch(index: usize, source: ControlError) -> Self {
        ControlError::Batch {
            index,
            source: Box::new(source),
        }
    }

    /// OS error number of the underlying rejection, if any.
    pub fn errno(&self) -> Option<i32> {
        match self {
            ControlError::Rejected { errno, .. } => Some(*errno),
            ControlError::Batch { source, .. } => source.errno(),
            ControlError::BufferMismatch { .. } | ControlError::Encode(_) => None,
        }
    }

    /// Check if the device or driver does not implement the request.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self.errno(),
            Some(libc::ENOTTY) | Some(libc::EINVAL) | Some(libc::ENOSYS)
        )
    }

    /// Index of the failed item for batch failures.
    pub fn failed_index(&self) -> Option<usize> {
        match self {
            ControlError::Batch { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Request that failed, when known.
    pub fn request(&self) -> Option<ControlCode> {
        match self {
            ControlError::Rejected { request, .. }
            | ControlError::BufferMismatch { request, .. } => Some(*request),
            ControlError::Batch { source, .. } => source.request(),
            ControlError::Encode(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evio_ioctl::requests::{EVIOCGRAB, EVIOCRMFF};

    #[test]
    fn test_rejected_display_names_request() {
        let err = ControlError::rejected(EVIOCGRAB, libc::EBUSY);
        let msg = err.to_string();
        assert!(msg.contains("0x40044590"), "{msg}");
    }

    #[test]
    fn test_from_io_keeps_errno() {
        let io_err = io::Error::from_raw_os_error(libc::ENOTTY);
        let err = ControlError::from_io(EVIOCGRAB, &io_err);
        assert_eq!(err.errno(), Some(libc::ENOTTY));
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_from_io_without_os_code() {
        let io_err = io::Error::other("mock");
        let err = ControlError::from_io(EVIOCGRAB, &io_err);
        assert_eq!(err.errno(), Some(libc::EIO));
        assert!(!err.is_unsupported());
    }

    #[test]
    fn test_batch_exposes_index_and_source() {
        let err = ControlError::batch(1, ControlError::rejected(EVIOCRMFF, libc::EINVAL));
        assert_eq!(err.failed_index(), Some(1));
        assert_eq!(err.errno(), Some(libc::EINVAL));
        assert_eq!(err.request(), Some(EVIOCRMFF));
        let source = std::error::Error::source(&err);
        assert!(source.is_some());
    }

    #[test]
    fn test_buffer_mismatch_has_no_errno() {
        let err = ControlError::BufferMismatch {
            request: EVIOCGRAB,
            expected: 4,
            actual: 2,
        };
        assert_eq!(err.errno(), None);
        assert!(err.to_string().contains("expects 4 bytes"));
    }
}
