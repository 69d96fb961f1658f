//! In-memory transport for tests.
//!
//! Reads are served from a script of byte chunks and block while the script
//! is empty, like a quiet device. Writes and control calls are recorded.
//! Control responses are produced by handlers installed with
//! [`MockTransport::on_control`] and its shorthands.

use crate::transport::{CallArg, Transport};
use evio_ioctl::ControlCode;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::io;

type Handler = Box<dyn FnMut(ControlCode, &mut CallArg<'_>) -> Option<io::Result<i32>> + Send>;

/// A recorded control call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlRecord {
    /// Request issued
    pub code: ControlCode,
    /// Argument as passed in, before the handler ran
    pub arg: RecordedArg,
}

/// Snapshot of a control-call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedArg {
    /// Value passed by value
    Scalar(i32),
    /// Buffer contents passed by reference
    Buffer(Vec<u8>),
}

#[derive(Default)]
struct State {
    reads: VecDeque<io::Result<Vec<u8>>>,
    ended: bool,
    interrupted: bool,
    written: Vec<Vec<u8>>,
    write_limit: Option<usize>,
    write_error: Option<i32>,
    controls: Vec<ControlRecord>,
    handlers: Vec<Handler>,
}

/// Scriptable [`Transport`].
#[derive(Default)]
pub struct MockTransport {
    state: Mutex<State>,
    readable: Condvar,
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockTransport")
            .field("pending_reads", &state.reads.len())
            .field("written", &state.written.len())
            .field("controls", &state.controls.len())
            .field("interrupted", &state.interrupted)
            .finish()
    }
}

impl MockTransport {
    /// Creates a mock with an empty read script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues bytes to be returned by one read.
    ///
    /// A chunk larger than the reader's buffer is split across reads.
    pub fn push_read(&self, bytes: impl Into<Vec<u8>>) {
        self.state.lock().reads.push_back(Ok(bytes.into()));
        self.readable.notify_all();
    }

    /// Queues a read failure with the given OS error.
    pub fn push_read_error(&self, errno: i32) {
        self.state
            .lock()
            .reads
            .push_back(Err(io::Error::from_raw_os_error(errno)));
        self.readable.notify_all();
    }

    /// Ends the stream once the queued reads are consumed.
    pub fn end_stream(&self) {
        self.state.lock().ended = true;
        self.readable.notify_all();
    }

    /// Accept at most `limit` bytes per write.
    pub fn limit_writes(&self, limit: usize) {
        self.state.lock().write_limit = Some(limit);
    }

    /// Fail every subsequent write with `errno`.
    pub fn fail_writes(&self, errno: i32) {
        self.state.lock().write_error = Some(errno);
    }

    /// Bytes passed to each successful write, in order.
    pub fn written(&self) -> Vec<Vec<u8>> {
        self.state.lock().written.clone()
    }

    /// Control calls issued so far, in order.
    pub fn controls(&self) -> Vec<ControlRecord> {
        self.state.lock().controls.clone()
    }

    /// Whether [`Transport::interrupt`] has been called.
    pub fn is_interrupted(&self) -> bool {
        self.state.lock().interrupted
    }

    /// Installs a control handler.
    ///
    /// Handlers run in installation order; the first one returning `Some`
    /// decides the outcome. Calls no handler claims succeed with `Ok(0)`.
    pub fn on_control<F>(&self, handler: F)
    where
        F: FnMut(ControlCode, &mut CallArg<'_>) -> Option<io::Result<i32>> + Send + 'static,
    {
        self.state.lock().handlers.push(Box::new(handler));
    }

    /// Answers `code` by copying `bytes` into the caller's buffer.
    pub fn respond(&self, code: ControlCode, bytes: impl Into<Vec<u8>>) {
        let bytes = bytes.into();
        self.on_control(move |c, arg| {
            if c != code {
                return None;
            }
            if let CallArg::Fixed(buf) | CallArg::Sized(buf) = arg {
                buf.iter_mut().zip(&bytes).for_each(|(d, s)| *d = *s);
            }
            Some(Ok(0))
        });
    }

    /// Rejects every call to `code` with `errno`.
    pub fn reject(&self, code: ControlCode, errno: i32) {
        self.on_control(move |c, _| (c == code).then(|| Err(io::Error::from_raw_os_error(errno))));
    }

    /// Rejects the `n`th (zero-based) call to `code` with `errno`.
    pub fn reject_nth(&self, code: ControlCode, n: usize, errno: i32) {
        let mut seen = 0usize;
        self.on_control(move |c, _| {
            if c != code {
                return None;
            }
            let this = seen;
            seen += 1;
            (this == n).then(|| Err(io::Error::from_raw_os_error(errno)))
        });
    }

    /// Assigns sequential effect ids to uploads that carry id `-1`.
    ///
    /// `upload_code` is the `EVIOCSFF` request for the platform record size.
    pub fn assign_effect_ids(&self, upload_code: ControlCode) {
        let mut next = 0i16;
        self.on_control(move |c, arg| {
            if c != upload_code {
                return None;
            }
            if let CallArg::Fixed(buf) = arg {
                if let Some(id) = buf.get_mut(2..4) {
                    if *id == (-1i16).to_ne_bytes() {
                        id.copy_from_slice(&next.to_ne_bytes());
                        next = next.wrapping_add(1);
                    }
                }
            }
            None
        });
    }
}

impl Transport for MockTransport {
    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state.lock();
        loop {
            if state.interrupted {
                return Ok(0);
            }
            match state.reads.pop_front() {
                Some(Ok(mut chunk)) => {
                    let n = chunk.len().min(buf.len());
                    let rest = chunk.split_off(n);
                    if let Some(dst) = buf.get_mut(..n) {
                        dst.copy_from_slice(&chunk);
                    }
                    if !rest.is_empty() {
                        state.reads.push_front(Ok(rest));
                    }
                    return Ok(n);
                }
                Some(Err(e)) => return Err(e),
                None if state.ended => return Ok(0),
                None => self.readable.wait(&mut state),
            }
        }
    }

    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock();
        if let Some(errno) = state.write_error {
            return Err(io::Error::from_raw_os_error(errno));
        }
        let n = state.write_limit.map_or(buf.len(), |limit| limit.min(buf.len()));
        state.written.push(buf.get(..n).unwrap_or_default().to_vec());
        Ok(n)
    }

    fn control(&self, code: ControlCode, mut arg: CallArg<'_>) -> io::Result<i32> {
        let mut state = self.state.lock();
        let recorded = match &arg {
            CallArg::Scalar(v) => RecordedArg::Scalar(*v),
            CallArg::Fixed(buf) | CallArg::Sized(buf) => RecordedArg::Buffer(buf.to_vec()),
        };
        state.controls.push(ControlRecord {
            code,
            arg: recorded,
        });
        for handler in state.handlers.iter_mut() {
            if let Some(result) = handler(code, &mut arg) {
                return result;
            }
        }
        Ok(0)
    }

    fn interrupt(&self) {
        self.state.lock().interrupted = true;
        self.readable.notify_all();
    }
}
