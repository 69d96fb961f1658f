//! Descriptor access behind a trait.
//!
//! [`Transport`] is everything the handle and its loops need from an open
//! device node: blocking reads, writes, control calls, and a way to unblock
//! a pending read when the handle closes. [`EvdevNode`] is the production
//! implementation; [`crate::mock::MockTransport`] is used by tests.

use crate::sys;
use evio_errors::ControlError;
use evio_ioctl::ControlCode;
use std::fs::{File, OpenOptions};
use std::io::{self, PipeReader, PipeWriter, Read, Write};
use std::os::fd::AsFd;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

/// Argument of a control call.
///
/// The variant selects how the argument is passed to the driver.
#[derive(Debug)]
pub enum CallArg<'a> {
    /// Passed by value (grab flag, revoke flag, effect id).
    Scalar(libc::c_int),
    /// Record whose size is exactly the size encoded in the request.
    Fixed(&'a mut [u8]),
    /// Caller-sized buffer, at least as large as the encoded size.
    Sized(&'a mut [u8]),
}

impl CallArg<'_> {
    /// Checks the buffer against the payload size encoded in `code`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::BufferMismatch`] if a `Fixed` buffer differs
    /// from the encoded size or a `Sized` buffer is smaller than it.
    pub fn check(&self, code: ControlCode) -> Result<(), ControlError> {
        let expected = code.size();
        let fits = match self {
            CallArg::Scalar(_) => true,
            CallArg::Fixed(buf) => buf.len() == expected,
            CallArg::Sized(buf) => buf.len() >= expected,
        };
        if fits {
            Ok(())
        } else {
            Err(ControlError::BufferMismatch {
                request: code,
                expected,
                actual: self.len(),
            })
        }
    }

    /// Buffer length, or zero for scalars.
    pub fn len(&self) -> usize {
        match self {
            CallArg::Scalar(_) => 0,
            CallArg::Fixed(buf) | CallArg::Sized(buf) => buf.len(),
        }
    }

    /// Whether the argument carries no buffer bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An open device node.
///
/// Implementations are shared between the handle and both I/O loops, so
/// every method takes `&self`. The inbound loop is the only reader and the
/// outbound loop the only writer.
pub trait Transport: Send + Sync + 'static {
    /// Blocks until bytes are available and reads them into `buf`.
    ///
    /// Returns `Ok(0)` at end of stream, including after [`interrupt`].
    ///
    /// [`interrupt`]: Transport::interrupt
    ///
    /// # Errors
    ///
    /// Returns the OS error of a failed read.
    fn read(&self, buf: &mut [u8]) -> io::Result<usize>;

    /// Writes `buf`, returning the number of bytes accepted.
    ///
    /// # Errors
    ///
    /// Returns the OS error of a failed write.
    fn write(&self, buf: &[u8]) -> io::Result<usize>;

    /// Issues one control call. The argument has already been checked.
    ///
    /// # Errors
    ///
    /// Returns the OS error reported by the driver.
    fn control(&self, code: ControlCode, arg: CallArg<'_>) -> io::Result<i32>;

    /// Makes pending and future reads return end of stream.
    fn interrupt(&self);
}

/// Production transport over `/dev/input/eventN`.
#[derive(Debug)]
pub struct EvdevNode {
    path: PathBuf,
    file: File,
    wake_rx: PipeReader,
    wake_tx: PipeWriter,
    interrupted: AtomicBool,
}

impl EvdevNode {
    /// Opens `path` for reading and writing.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the node cannot be opened or the wake pipe
    /// cannot be created.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let (wake_rx, wake_tx) = io::pipe()?;
        debug!(path = %path.display(), "opened device node");
        Ok(Self {
            path: path.to_path_buf(),
            file,
            wake_rx,
            wake_tx,
            interrupted: AtomicBool::new(false),
        })
    }

    /// Path the node was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Transport for EvdevNode {
    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            if self.interrupted.load(Ordering::Acquire) {
                return Ok(0);
            }
            match sys::wait_readable(self.file.as_fd(), self.wake_rx.as_fd())? {
                sys::Ready::Woken => return Ok(0),
                sys::Ready::Device => match (&self.file).read(buf) {
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    other => return other,
                },
            }
        }
    }

    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        loop {
            match (&self.file).write(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }

    fn control(&self, code: ControlCode, arg: CallArg<'_>) -> io::Result<i32> {
        let fd = self.file.as_fd();
        match arg {
            CallArg::Scalar(value) => sys::ioctl_value(fd, code, value),
            CallArg::Fixed(buf) | CallArg::Sized(buf) => sys::ioctl_buffer(fd, code, buf),
        }
    }

    fn interrupt(&self) {
        if self.interrupted.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Err(e) = (&self.wake_tx).write(&[1]) {
            trace!(error = %e, "wake pipe write failed");
        }
    }
}
