//! Device handle: one open node, its queries, and its event engine.

use crate::capability::{self, Domain};
use crate::codes::{FF_AUTOCENTER, FF_FULL_SCALE, FF_GAIN, KEY_MAX, LED_MAX, SND_MAX, SW_MAX};
use crate::config::EngineConfig;
use crate::effects::{Effect, FF_EFFECT_SIZE};
use crate::engine::{Diagnostic, Engine};
use crate::event::Event;
use crate::info::{AbsInfo, DriverVersion, InputId, decode_c_string};
use crate::transport::{CallArg, EvdevNode, Transport};
use crossbeam::channel::{Receiver, SendError, Sender};
use evio_bitset::Bitset;
use evio_errors::{ControlError, DeviceError, Result};
use evio_ioctl::ControlCode;
use evio_ioctl::requests::{
    ABS_INFO_SIZE, EVIOCGEFFECTS, EVIOCGID, EVIOCGKEYCODE, EVIOCGRAB, EVIOCGREP, EVIOCGVERSION,
    EVIOCREVOKE, EVIOCRMFF, EVIOCSCLOCKID, EVIOCSKEYCODE, EVIOCSREP, INPUT_ID_SIZE, eviocgkey,
    eviocgled, eviocgname, eviocgphys, eviocgsnd, eviocgsw, eviocguniq, eviocsff, try_eviocgabs,
    try_eviocsabs,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Size of the buffers used for name, physical path and serial queries.
pub const STRING_BUF_SIZE: usize = 256;

/// Key repeat settings in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatSettings {
    /// Delay before the first repeat
    pub delay_ms: u32,
    /// Interval between subsequent repeats
    pub period_ms: u32,
}

/// Scales a percentage to the full range of `FF_GAIN` / `FF_AUTOCENTER`.
///
/// The percentage is clamped to `0..=100` first.
pub fn scale_percent(percent: i32) -> i32 {
    FF_FULL_SCALE * percent.clamp(0, 100) / 100
}

/// An open input device.
///
/// Opening starts the inbound and outbound event loops. Events read from
/// the device arrive on [`incoming`](Device::incoming); events sent with
/// [`send`](Device::send) are written in order. Queries and commands are
/// synchronous control calls, independent of the loops.
///
/// Queries that return masks, strings or identity records treat a failed
/// call like an absent capability and return an empty value (the failure is
/// logged at debug level). Commands return a [`ControlError`].
///
/// [`close`](Device::close) or dropping the handle releases a held grab,
/// stops both loops and waits for them before the descriptor is closed.
pub struct Device {
    path: PathBuf,
    transport: Arc<dyn Transport>,
    engine: Engine,
    grabbed: AtomicBool,
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("path", &self.path)
            .field("grabbed", &self.is_grabbed())
            .field("running", &self.engine.is_running())
            .finish_non_exhaustive()
    }
}

impl Device {
    /// Opens a device node with the default engine configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Open`] if the node cannot be opened for
    /// reading and writing, or an engine start-up error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &EngineConfig::default())
    }

    /// Opens a device node with the given engine configuration.
    ///
    /// # Errors
    ///
    /// See [`Device::open`]; also fails on an invalid configuration.
    pub fn open_with(path: impl AsRef<Path>, config: &EngineConfig) -> Result<Self> {
        let path = path.as_ref();
        let node = EvdevNode::open(path).map_err(|source| DeviceError::open(path, source))?;
        Self::from_transport(Arc::new(node), path, config)
    }

    /// Wraps an already open transport and starts the event loops.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration or if a loop thread
    /// cannot be spawned.
    pub fn from_transport(
        transport: Arc<dyn Transport>,
        path: impl Into<PathBuf>,
        config: &EngineConfig,
    ) -> Result<Self> {
        let path = path.into();
        let engine = Engine::start(&transport, config)?;
        info!(path = %path.display(), "device opened");
        Ok(Self {
            path,
            transport,
            engine,
            grabbed: AtomicBool::new(false),
        })
    }

    /// Path the device was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Closes the device.
    ///
    /// Releases a grab held through this handle, stops both loops and joins
    /// them. The incoming queue disconnects once drained and further sends
    /// fail. The descriptor is closed when this returns.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::ThreadPanicked`] if a loop panicked. The
    /// device is closed regardless.
    pub fn close(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        if self.grabbed.swap(false, Ordering::AcqRel) {
            if let Err(e) = self.call(EVIOCGRAB, CallArg::Scalar(0)) {
                warn!(path = %self.path.display(), error = %e, "failed to release grab on close");
            }
        }
        let result = self.engine.stop(self.transport.as_ref());
        info!(path = %self.path.display(), "device closed");
        result
    }

    // ------------------------------------------------------------------
    // Event queues
    // ------------------------------------------------------------------

    /// Events read from the device, in kernel order.
    ///
    /// The queue disconnects when the stream ends, a read fails, or the
    /// device is closed.
    pub fn incoming(&self) -> &Receiver<Event> {
        self.engine.incoming()
    }

    /// A sender onto the outgoing queue.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Closed`] once the engine has stopped.
    pub fn outgoing(&self) -> Result<Sender<Event>> {
        self.engine.outgoing().cloned().ok_or(DeviceError::Closed)
    }

    /// Queues an event for writing, blocking while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Closed`] if the outbound loop has stopped.
    pub fn send(&self, event: Event) -> Result<()> {
        let sender = self.engine.outgoing().ok_or(DeviceError::Closed)?;
        match sender.send(event) {
            Ok(()) => Ok(()),
            Err(SendError(event)) => {
                debug!(?event, "outgoing queue closed");
                Err(DeviceError::Closed)
            }
        }
    }

    /// Short writes and loop failures reported by the engine.
    pub fn diagnostics(&self) -> &Receiver<Diagnostic> {
        self.engine.diagnostics()
    }

    // ------------------------------------------------------------------
    // Control calls
    // ------------------------------------------------------------------

    fn call(&self, code: ControlCode, arg: CallArg<'_>) -> Result<i32, ControlError> {
        arg.check(code)?;
        self.transport.control(code, arg).map_err(|e| {
            debug!(
                path = %self.path.display(),
                request = %code,
                error = %e,
                "control call rejected"
            );
            ControlError::from_io(code, &e)
        })
    }

    fn read_mask(
        &self,
        mut mask: Bitset,
        request: impl FnOnce(usize) -> ControlCode,
    ) -> Result<Bitset, ControlError> {
        let code = request(mask.as_bytes().len());
        self.call(code, CallArg::Sized(mask.as_bytes_mut()))?;
        Ok(mask)
    }

    fn mask_or_empty(
        &self,
        what: &'static str,
        result: Result<Bitset, ControlError>,
        empty: Bitset,
    ) -> Bitset {
        result.unwrap_or_else(|e| {
            debug!(
                path = %self.path.display(),
                query = what,
                error = %e,
                "query failed, reporting empty mask"
            );
            empty
        })
    }

    /// Capability mask of `domain`.
    ///
    /// # Errors
    ///
    /// Returns the rejection of the control call.
    pub fn try_capabilities(&self, domain: Domain) -> Result<Bitset, ControlError> {
        self.read_mask(domain.empty_mask(), |len| domain.request(len))
    }

    /// Capability mask of `domain`; empty if the query fails.
    pub fn capabilities(&self, domain: Domain) -> Bitset {
        self.mask_or_empty(domain.name(), self.try_capabilities(domain), domain.empty_mask())
    }

    /// Supported event types.
    pub fn event_types(&self) -> Bitset {
        self.capabilities(Domain::EventTypes)
    }

    /// Input properties.
    pub fn properties(&self) -> Bitset {
        self.capabilities(Domain::Properties)
    }

    fn state(&self, what: &'static str, max: u16, request: fn(usize) -> ControlCode) -> Bitset {
        let empty = Bitset::new(usize::from(max) + 1);
        self.mask_or_empty(what, self.read_mask(empty.clone(), request), empty)
    }

    /// Keys and buttons currently pressed.
    pub fn key_state(&self) -> Bitset {
        self.state("key_state", KEY_MAX, eviocgkey)
    }

    /// LEDs currently lit.
    pub fn led_state(&self) -> Bitset {
        self.state("led_state", LED_MAX, eviocgled)
    }

    /// Sounds currently playing.
    pub fn sound_state(&self) -> Bitset {
        self.state("sound_state", SND_MAX, eviocgsnd)
    }

    /// Switches currently on.
    pub fn switch_state(&self) -> Bitset {
        self.state("switch_state", SW_MAX, eviocgsw)
    }

    /// Returns `true` if every code in `codes` is set in `mask`.
    ///
    /// Pure predicate over a previously fetched mask; no I/O.
    pub fn supports(mask: &Bitset, codes: &[u16]) -> bool {
        capability::supports(mask, codes)
    }

    fn string(&self, what: &'static str, request: fn(usize) -> ControlCode) -> String {
        let mut buf = [0u8; STRING_BUF_SIZE];
        match self.call(request(buf.len()), CallArg::Sized(&mut buf)) {
            Ok(_) => decode_c_string(&buf),
            Err(e) => {
                debug!(
                    path = %self.path.display(),
                    query = what,
                    error = %e,
                    "query failed, reporting empty string"
                );
                String::new()
            }
        }
    }

    /// Device name.
    pub fn name(&self) -> String {
        self.string("name", eviocgname)
    }

    /// Physical location, e.g. `usb-0000:00:14.0-2/input0`.
    pub fn phys(&self) -> String {
        self.string("phys", eviocgphys)
    }

    /// Unique identifier. Most devices have none.
    pub fn serial(&self) -> String {
        self.string("serial", eviocguniq)
    }

    /// Driver protocol version; `0.0.0` if the query fails.
    pub fn version(&self) -> DriverVersion {
        let mut buf = [0u8; 4];
        match self.call(EVIOCGVERSION, CallArg::Fixed(&mut buf)) {
            Ok(_) => DriverVersion::from_packed(u32::from_ne_bytes(buf)),
            Err(_) => DriverVersion::default(),
        }
    }

    /// Identity record; zeroed if the query fails.
    pub fn id(&self) -> InputId {
        let mut buf = [0u8; INPUT_ID_SIZE];
        match self.call(EVIOCGID, CallArg::Fixed(&mut buf)) {
            Ok(_) => InputId::from_bytes(&buf),
            Err(_) => InputId::default(),
        }
    }

    /// Keycode currently mapped to `scancode`.
    ///
    /// # Errors
    ///
    /// Returns the rejection of the control call.
    pub fn key_map(&self, scancode: u32) -> Result<u32, ControlError> {
        let mut pair = pack_pair(scancode, 0);
        self.call(EVIOCGKEYCODE, CallArg::Fixed(&mut pair))?;
        Ok(unpack_pair(&pair).1)
    }

    /// Maps `scancode` to `keycode`.
    ///
    /// # Errors
    ///
    /// Returns the rejection of the control call.
    pub fn set_key_map(&self, scancode: u32, keycode: u32) -> Result<(), ControlError> {
        let mut pair = pack_pair(scancode, keycode);
        self.call(EVIOCSKEYCODE, CallArg::Fixed(&mut pair))?;
        Ok(())
    }

    /// Key repeat settings.
    ///
    /// # Errors
    ///
    /// Returns the rejection of the control call.
    pub fn repeat(&self) -> Result<RepeatSettings, ControlError> {
        let mut pair = pack_pair(0, 0);
        self.call(EVIOCGREP, CallArg::Fixed(&mut pair))?;
        let (delay_ms, period_ms) = unpack_pair(&pair);
        Ok(RepeatSettings { delay_ms, period_ms })
    }

    /// Changes the key repeat settings.
    ///
    /// # Errors
    ///
    /// Returns the rejection of the control call.
    pub fn set_repeat(&self, settings: RepeatSettings) -> Result<(), ControlError> {
        let mut pair = pack_pair(settings.delay_ms, settings.period_ms);
        self.call(EVIOCSREP, CallArg::Fixed(&mut pair))?;
        Ok(())
    }

    /// Takes exclusive access: other readers stop receiving events.
    ///
    /// Grabbing twice is decided by the driver (it usually rejects the
    /// second call with `EBUSY`).
    ///
    /// # Errors
    ///
    /// Returns the rejection of the control call.
    pub fn grab(&self) -> Result<(), ControlError> {
        self.call(EVIOCGRAB, CallArg::Scalar(1))?;
        self.grabbed.store(true, Ordering::Release);
        info!(path = %self.path.display(), "device grabbed");
        Ok(())
    }

    /// Gives up exclusive access.
    ///
    /// # Errors
    ///
    /// Returns the rejection of the control call.
    pub fn release(&self) -> Result<(), ControlError> {
        self.call(EVIOCGRAB, CallArg::Scalar(0))?;
        self.grabbed.store(false, Ordering::Release);
        info!(path = %self.path.display(), "device released");
        Ok(())
    }

    /// Whether this handle holds a grab.
    pub fn is_grabbed(&self) -> bool {
        self.grabbed.load(Ordering::Acquire)
    }

    /// Revokes access through this descriptor; later reads fail with
    /// `ENODEV`.
    ///
    /// # Errors
    ///
    /// Returns the rejection of the control call.
    pub fn revoke(&self) -> Result<(), ControlError> {
        self.call(EVIOCREVOKE, CallArg::Scalar(0))?;
        Ok(())
    }

    /// Selects the clock used for event timestamps (`CLOCK_*`).
    ///
    /// # Errors
    ///
    /// Returns the rejection of the control call.
    pub fn set_clock_id(&self, clock: libc::clockid_t) -> Result<(), ControlError> {
        let mut buf = clock.to_ne_bytes();
        self.call(EVIOCSCLOCKID, CallArg::Fixed(&mut buf))?;
        Ok(())
    }

    /// Calibration of absolute axis `axis`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Encode`] for an axis beyond `ABS_MAX`, or the
    /// rejection of the control call.
    pub fn absolute_info(&self, axis: u16) -> Result<AbsInfo, ControlError> {
        let code = try_eviocgabs(axis)?;
        let mut buf = [0u8; ABS_INFO_SIZE];
        self.call(code, CallArg::Fixed(&mut buf))?;
        Ok(AbsInfo::from_bytes(&buf))
    }

    /// Changes the calibration of absolute axis `axis`.
    ///
    /// # Errors
    ///
    /// See [`Device::absolute_info`].
    pub fn set_absolute_info(&self, axis: u16, info: &AbsInfo) -> Result<(), ControlError> {
        let code = try_eviocsabs(axis)?;
        let mut buf = info.to_bytes();
        self.call(code, CallArg::Fixed(&mut buf))?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Force feedback
    // ------------------------------------------------------------------

    /// Number of effects the device can play at once.
    ///
    /// # Errors
    ///
    /// Returns the rejection of the control call.
    pub fn effect_count(&self) -> Result<usize, ControlError> {
        let mut buf = [0u8; 4];
        self.call(EVIOCGEFFECTS, CallArg::Fixed(&mut buf))?;
        Ok(usize::try_from(i32::from_ne_bytes(buf)).unwrap_or(0))
    }

    /// Simultaneous effect count and supported effect kinds.
    ///
    /// A failed count query reports zero; a failed mask query an empty mask.
    pub fn force_feedback_caps(&self) -> (usize, Bitset) {
        let count = self.effect_count().unwrap_or_else(|e| {
            debug!(path = %self.path.display(), error = %e, "effect count query failed");
            0
        });
        (count, self.capabilities(Domain::ForceFeedback))
    }

    /// Uploads one effect and stores the id the driver assigned.
    ///
    /// Uploading an effect that already has an id updates it in place.
    ///
    /// # Errors
    ///
    /// Returns the rejection of the control call.
    pub fn upload_effect(&self, effect: &mut Effect) -> Result<(), ControlError> {
        let mut image = effect.encode();
        self.call(eviocsff(FF_EFFECT_SIZE), CallArg::Fixed(&mut image))?;
        if let Some(id) = Effect::assigned_id(&image) {
            effect.id = id;
        }
        debug!(id = effect.id, kind = effect.kind_code(), "effect uploaded");
        Ok(())
    }

    /// Uploads effects in order, stopping at the first rejection.
    ///
    /// Effects before the rejected one stay uploaded; there is no rollback.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Batch`] with the index of the rejected effect.
    pub fn upload_effects(&self, effects: &mut [Effect]) -> Result<(), ControlError> {
        for (index, effect) in effects.iter_mut().enumerate() {
            self.upload_effect(effect).map_err(|e| {
                warn!(index, error = %e, "effect upload rejected, stopping batch");
                ControlError::batch(index, e)
            })?;
        }
        Ok(())
    }

    /// Erases an uploaded effect, stopping it if it plays.
    ///
    /// # Errors
    ///
    /// Returns the rejection of the control call.
    pub fn remove_effect(&self, id: i16) -> Result<(), ControlError> {
        self.call(EVIOCRMFF, CallArg::Scalar(libc::c_int::from(id)))?;
        debug!(id, "effect removed");
        Ok(())
    }

    /// Erases effects in order, stopping at the first rejection.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Batch`] with the index of the rejected effect.
    pub fn remove_effects(&self, effects: &[Effect]) -> Result<(), ControlError> {
        for (index, effect) in effects.iter().enumerate() {
            self.remove_effect(effect.id).map_err(|e| {
                warn!(index, error = %e, "effect removal rejected, stopping batch");
                ControlError::batch(index, e)
            })?;
        }
        Ok(())
    }

    /// Starts playing an uploaded effect.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::InvalidEffectId`] for a negative id and
    /// [`DeviceError::Closed`] if the outbound loop has stopped.
    pub fn play_effect(&self, id: i16) -> Result<()> {
        self.toggle_effect(id, true)
    }

    /// Stops an effect.
    ///
    /// # Errors
    ///
    /// See [`Device::play_effect`].
    pub fn stop_effect(&self, id: i16) -> Result<()> {
        self.toggle_effect(id, false)
    }

    fn toggle_effect(&self, id: i16, play: bool) -> Result<()> {
        let code = u16::try_from(id).ok().ok_or(DeviceError::InvalidEffectId { id })?;
        self.send(Event::force_feedback(code, i32::from(play)))
    }

    /// Sets the force-feedback gain in percent (clamped to `0..=100`).
    ///
    /// Delivered as an event through the outgoing queue.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Closed`] if the outbound loop has stopped.
    pub fn set_gain(&self, percent: i32) -> Result<()> {
        self.send(Event::force_feedback(FF_GAIN, scale_percent(percent)))
    }

    /// Sets the auto-center strength in percent (clamped to `0..=100`);
    /// zero disables it.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Closed`] if the outbound loop has stopped.
    pub fn set_auto_center(&self, percent: i32) -> Result<()> {
        self.send(Event::force_feedback(FF_AUTOCENTER, scale_percent(percent)))
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        if self.engine.is_running() {
            if let Err(e) = self.shutdown() {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "error while closing dropped device"
                );
            }
        }
    }
}

fn pack_pair(a: u32, b: u32) -> [u8; 8] {
    let mut out = [0u8; 8];
    let (lo, hi) = out.split_at_mut(4);
    lo.copy_from_slice(&a.to_ne_bytes());
    hi.copy_from_slice(&b.to_ne_bytes());
    out
}

fn unpack_pair(bytes: &[u8; 8]) -> (u32, u32) {
    let [a0, a1, a2, a3, b0, b1, b2, b3] = *bytes;
    (
        u32::from_ne_bytes([a0, a1, a2, a3]),
        u32::from_ne_bytes([b0, b1, b2, b3]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_percent_clamps() {
        assert_eq!(scale_percent(150), 0xffff);
        assert_eq!(scale_percent(100), 0xffff);
        assert_eq!(scale_percent(50), 0x7fff);
        assert_eq!(scale_percent(0), 0);
        assert_eq!(scale_percent(-20), 0);
    }

    #[test]
    fn test_pair_packing() {
        let pair = pack_pair(250, 33);
        assert_eq!(unpack_pair(&pair), (250, 33));
    }
}
