//! Event I/O engine: the inbound and outbound loops of one device.
//!
//! Each loop runs on its own named thread and blocks in exactly one place:
//! the inbound loop in [`Transport::read`], the outbound loop on the
//! outgoing queue. Both also watch a zero-capacity shutdown channel whose
//! sender is dropped on stop, so neither a full incoming queue nor an idle
//! outgoing queue can keep a loop alive. The inbound read itself is
//! unblocked by [`Transport::interrupt`].
//!
//! Stream termination is not an error: the inbound loop simply returns,
//! dropping its sender, and consumers observe the incoming queue
//! disconnecting. Short writes and loop failures are reported on the
//! diagnostics channel and logged.

use crate::config::EngineConfig;
use crate::event::{EVENT_SIZE, Event, frame};
use crate::transport::Transport;
use crossbeam::channel::{Receiver, Sender, bounded};
use crossbeam::select;
use evio_errors::DeviceError;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, trace, warn};

pub(crate) const READER_THREAD: &str = "evio-inbound";
pub(crate) const WRITER_THREAD: &str = "evio-outbound";

/// Condition reported by a loop without stopping the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    /// The device accepted fewer bytes than one record. The event is not
    /// retried.
    #[error("short write: {written} of {expected} bytes")]
    ShortWrite {
        /// Bytes accepted
        written: usize,
        /// Record size
        expected: usize,
    },

    /// A read ended with bytes that do not form a whole record. They were
    /// discarded.
    #[error("discarded {count} trailing bytes")]
    TrailingBytes {
        /// Number of bytes discarded
        count: usize,
    },

    /// A read failed; the inbound loop has stopped.
    #[error("read failed: {message}")]
    ReadFailed {
        /// Error kind
        kind: io::ErrorKind,
        /// Error text
        message: String,
    },

    /// A write failed; the outbound loop has stopped.
    #[error("write failed: {message}")]
    WriteFailed {
        /// Error kind
        kind: io::ErrorKind,
        /// Error text
        message: String,
    },
}

impl Diagnostic {
    fn read_failed(err: &io::Error) -> Self {
        Diagnostic::ReadFailed {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    fn write_failed(err: &io::Error) -> Self {
        Diagnostic::WriteFailed {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    /// Whether the reporting loop stopped.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Diagnostic::ReadFailed { .. } | Diagnostic::WriteFailed { .. }
        )
    }
}

/// Threads and queues of one open device.
pub(crate) struct Engine {
    incoming: Receiver<Event>,
    outgoing: Option<Sender<Event>>,
    diagnostics: Receiver<Diagnostic>,
    shutdown: Option<Sender<()>>,
    reader: Option<JoinHandle<()>>,
    writer: Option<JoinHandle<()>>,
}

impl Engine {
    /// Starts both loops over `transport`.
    pub(crate) fn start(
        transport: &Arc<dyn Transport>,
        config: &EngineConfig,
    ) -> Result<Self, DeviceError> {
        config.validate()?;

        let (incoming_tx, incoming) = bounded(config.incoming_capacity);
        let (outgoing, outgoing_rx) = bounded(config.outgoing_capacity);
        let (diagnostics_tx, diagnostics) = bounded(config.diagnostics_capacity);
        let (shutdown, shutdown_rx) = bounded::<()>(0);

        let mut engine = Self {
            incoming,
            outgoing: Some(outgoing),
            diagnostics,
            shutdown: Some(shutdown),
            reader: None,
            writer: None,
        };

        let inbound = Inbound {
            transport: Arc::clone(transport),
            events: incoming_tx,
            shutdown: shutdown_rx.clone(),
            diagnostics: diagnostics_tx.clone(),
            batch: config.read_batch,
        };
        engine.reader = Some(spawn(READER_THREAD, move || inbound.run(), transport, &mut engine)?);

        let outbound = Outbound {
            transport: Arc::clone(transport),
            events: outgoing_rx,
            shutdown: shutdown_rx,
            diagnostics: diagnostics_tx,
        };
        engine.writer = Some(spawn(WRITER_THREAD, move || outbound.run(), transport, &mut engine)?);

        debug!(
            incoming = config.incoming_capacity,
            outgoing = config.outgoing_capacity,
            batch = config.read_batch,
            "event engine started"
        );
        Ok(engine)
    }

    pub(crate) fn incoming(&self) -> &Receiver<Event> {
        &self.incoming
    }

    pub(crate) fn outgoing(&self) -> Option<&Sender<Event>> {
        self.outgoing.as_ref()
    }

    pub(crate) fn diagnostics(&self) -> &Receiver<Diagnostic> {
        &self.diagnostics
    }

    pub(crate) fn is_running(&self) -> bool {
        self.shutdown.is_some()
    }

    /// Stops both loops and waits for them. Idempotent.
    ///
    /// Interrupts the transport, disconnects the shutdown channel and the
    /// outgoing sender, then joins the inbound and outbound threads. After
    /// this returns no loop touches the transport.
    pub(crate) fn stop(&mut self, transport: &dyn Transport) -> Result<(), DeviceError> {
        if self.shutdown.is_none() && self.reader.is_none() && self.writer.is_none() {
            return Ok(());
        }

        transport.interrupt();
        self.shutdown = None;
        self.outgoing = None;

        let reader = join(READER_THREAD, self.reader.take());
        let writer = join(WRITER_THREAD, self.writer.take());
        debug!("event engine stopped");
        reader.and(writer)
    }
}

fn spawn<F>(
    name: &'static str,
    body: F,
    transport: &Arc<dyn Transport>,
    engine: &mut Engine,
) -> Result<JoinHandle<()>, DeviceError>
where
    F: FnOnce() + Send + 'static,
{
    match thread::Builder::new().name(name.to_string()).spawn(body) {
        Ok(handle) => Ok(handle),
        Err(source) => {
            error!(thread = name, error = %source, "failed to spawn engine thread");
            // Stop the loop that is already running.
            if let Err(e) = engine.stop(transport.as_ref()) {
                warn!(error = %e, "cleanup after spawn failure failed");
            }
            Err(DeviceError::Spawn { name, source })
        }
    }
}

fn join(name: &'static str, handle: Option<JoinHandle<()>>) -> Result<(), DeviceError> {
    match handle.map(JoinHandle::join) {
        None | Some(Ok(())) => Ok(()),
        Some(Err(_)) => {
            error!(thread = name, "engine thread panicked");
            Err(DeviceError::ThreadPanicked { name })
        }
    }
}

fn report(diagnostics: &Sender<Diagnostic>, diagnostic: Diagnostic) {
    warn!(%diagnostic, terminal = diagnostic.is_terminal(), "event loop diagnostic");
    if diagnostics.try_send(diagnostic).is_err() {
        trace!("diagnostics channel full, dropping report");
    }
}

struct Inbound {
    transport: Arc<dyn Transport>,
    events: Sender<Event>,
    shutdown: Receiver<()>,
    diagnostics: Sender<Diagnostic>,
    batch: usize,
}

impl Inbound {
    fn run(self) {
        debug!(batch = self.batch, "inbound loop started");
        let mut buf = vec![0u8; self.batch * EVENT_SIZE];
        loop {
            let n = match self.transport.read(&mut buf) {
                Ok(0) => {
                    debug!("end of stream");
                    break;
                }
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    report(&self.diagnostics, Diagnostic::read_failed(&e));
                    break;
                }
            };

            let (records, trailing) = frame(buf.get(..n).unwrap_or_default());
            for event in records {
                if !self.deliver(event) {
                    debug!("inbound loop stopped while delivering");
                    return;
                }
            }
            if trailing != 0 {
                report(
                    &self.diagnostics,
                    Diagnostic::TrailingBytes { count: trailing },
                );
            }
        }
        debug!("inbound loop stopped");
    }

    /// Blocks until the event is queued; `false` once the engine stops.
    fn deliver(&self, event: Event) -> bool {
        select! {
            send(self.events, event) -> sent => sent.is_ok(),
            recv(self.shutdown) -> _ => false,
        }
    }
}

struct Outbound {
    transport: Arc<dyn Transport>,
    events: Receiver<Event>,
    shutdown: Receiver<()>,
    diagnostics: Sender<Diagnostic>,
}

impl Outbound {
    fn run(self) {
        debug!("outbound loop started");
        loop {
            let event = select! {
                recv(self.events) -> event => match event {
                    Ok(event) => event,
                    Err(_) => break,
                },
                recv(self.shutdown) -> _ => break,
            };

            let record = event.encode();
            match self.transport.write(&record) {
                Ok(n) if n == record.len() => {
                    trace!(
                        kind = event.kind,
                        code = event.code,
                        value = event.value,
                        "event written"
                    );
                }
                Ok(n) => report(
                    &self.diagnostics,
                    Diagnostic::ShortWrite {
                        written: n,
                        expected: record.len(),
                    },
                ),
                Err(e) => {
                    report(&self.diagnostics, Diagnostic::write_failed(&e));
                    break;
                }
            }
        }
        debug!("outbound loop stopped");
    }
}
