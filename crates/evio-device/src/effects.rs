//! Force-feedback effects and their kernel encoding.
//!
//! An [`Effect`] carries a typed [`EffectPayload`]; [`Effect::encode`]
//! produces the `struct ff_effect` image that `EVIOCSFF` expects. The image
//! has a 16-byte header followed by the payload union:
//!
//! ```text
//!  0  u16 type          6  u16 trigger.button    10  u16 replay.length
//!  2  i16 id            8  u16 trigger.interval  12  u16 replay.delay
//!  4  u16 direction    14  (padding)             16  union
//! ```
//!
//! Durations are milliseconds; values above `0x7fff` have unspecified
//! results on most drivers.

#![expect(missing_docs, reason = "payload fields mirror the kernel structs")]

use crate::codes::{
    FF_CONSTANT, FF_CUSTOM, FF_DAMPER, FF_FRICTION, FF_INERTIA, FF_PERIODIC, FF_RAMP, FF_RUMBLE,
    FF_SAW_DOWN, FF_SAW_UP, FF_SINE, FF_SPRING, FF_SQUARE, FF_TRIANGLE,
};
use serde::{Deserialize, Serialize};
use std::mem::size_of;

const UNION_AT: usize = 16;
const ID_AT: usize = 2;

/// Size of `struct ff_effect` on the target platform.
pub const FF_EFFECT_SIZE: usize = UNION_AT + 24 + size_of::<usize>();

/// Effect kinds understood by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Rumble,
    Periodic,
    Constant,
    Spring,
    Friction,
    Damper,
    Inertia,
    Ramp,
}

impl EffectKind {
    /// Protocol code (`FF_*`).
    pub const fn code(self) -> u16 {
        match self {
            EffectKind::Rumble => FF_RUMBLE,
            EffectKind::Periodic => FF_PERIODIC,
            EffectKind::Constant => FF_CONSTANT,
            EffectKind::Spring => FF_SPRING,
            EffectKind::Friction => FF_FRICTION,
            EffectKind::Damper => FF_DAMPER,
            EffectKind::Inertia => FF_INERTIA,
            EffectKind::Ramp => FF_RAMP,
        }
    }

    /// Looks up a kind by protocol code.
    pub const fn from_code(code: u16) -> Option<Self> {
        Some(match code {
            FF_RUMBLE => EffectKind::Rumble,
            FF_PERIODIC => EffectKind::Periodic,
            FF_CONSTANT => EffectKind::Constant,
            FF_SPRING => EffectKind::Spring,
            FF_FRICTION => EffectKind::Friction,
            FF_DAMPER => EffectKind::Damper,
            FF_INERTIA => EffectKind::Inertia,
            FF_RAMP => EffectKind::Ramp,
            _ => return None,
        })
    }
}

/// Kinds rendered from a pair of [`ConditionEffect`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    Spring,
    Friction,
    Damper,
    Inertia,
}

impl From<ConditionKind> for EffectKind {
    fn from(kind: ConditionKind) -> Self {
        match kind {
            ConditionKind::Spring => EffectKind::Spring,
            ConditionKind::Friction => EffectKind::Friction,
            ConditionKind::Damper => EffectKind::Damper,
            ConditionKind::Inertia => EffectKind::Inertia,
        }
    }
}

/// Button that starts the effect, and the minimum delay between restarts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub button: u16,
    pub interval: u16,
}

/// Playback length and start delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay {
    pub length: u16,
    pub delay: u16,
}

/// Attack and fade shaping applied to an effect's magnitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub attack_length: u16,
    pub attack_level: u16,
    pub fade_length: u16,
    pub fade_level: u16,
}

/// Constant force.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantEffect {
    pub level: i16,
    pub envelope: Envelope,
}

/// Force ramping linearly from `start_level` to `end_level`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RampEffect {
    pub start_level: i16,
    pub end_level: i16,
    pub envelope: Envelope,
}

/// One axis of a spring, friction, damper or inertia effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionEffect {
    pub right_saturation: u16,
    pub left_saturation: u16,
    pub right_coeff: i16,
    pub left_coeff: i16,
    pub deadband: u16,
    pub center: i16,
}

/// Waveform of a periodic effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    Square,
    Triangle,
    Sine,
    SawUp,
    SawDown,
    /// Driver-defined sample layout.
    Custom(Vec<i16>),
}

impl Waveform {
    /// Protocol code (`FF_SQUARE` .. `FF_CUSTOM`).
    pub fn code(&self) -> u16 {
        match self {
            Waveform::Square => FF_SQUARE,
            Waveform::Triangle => FF_TRIANGLE,
            Waveform::Sine => FF_SINE,
            Waveform::SawUp => FF_SAW_UP,
            Waveform::SawDown => FF_SAW_DOWN,
            Waveform::Custom(_) => FF_CUSTOM,
        }
    }
}

/// Periodic force.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicEffect {
    pub waveform: Waveform,
    pub period: u16,
    pub magnitude: i16,
    pub offset: i16,
    pub phase: u16,
    pub envelope: Envelope,
}

/// Two-motor vibration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RumbleEffect {
    pub strong_magnitude: u16,
    pub weak_magnitude: u16,
}

/// Payload of an effect, one variant per kernel union member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectPayload {
    Constant(ConstantEffect),
    Ramp(RampEffect),
    Periodic(PeriodicEffect),
    Condition {
        kind: ConditionKind,
        axes: [ConditionEffect; 2],
    },
    Rumble(RumbleEffect),
    /// Kind code with an opaque union image, for kinds this crate does not
    /// model. The image is truncated or zero-padded to the union size.
    Raw { kind: u16, data: Vec<u8> },
}

impl EffectPayload {
    /// Protocol kind code carried in the effect header.
    pub fn kind_code(&self) -> u16 {
        match self {
            EffectPayload::Constant(_) => FF_CONSTANT,
            EffectPayload::Ramp(_) => FF_RAMP,
            EffectPayload::Periodic(_) => FF_PERIODIC,
            EffectPayload::Condition { kind, .. } => EffectKind::from(*kind).code(),
            EffectPayload::Rumble(_) => FF_RUMBLE,
            EffectPayload::Raw { kind, .. } => *kind,
        }
    }

    fn write_union(&self, image: &mut Image) {
        match self {
            EffectPayload::Constant(c) => {
                image.i16(c.level).envelope(&c.envelope);
            }
            EffectPayload::Ramp(r) => {
                image.i16(r.start_level).i16(r.end_level).envelope(&r.envelope);
            }
            EffectPayload::Periodic(p) => {
                image
                    .u16(p.waveform.code())
                    .u16(p.period)
                    .i16(p.magnitude)
                    .i16(p.offset)
                    .u16(p.phase)
                    .envelope(&p.envelope);
                if let Waveform::Custom(samples) = &p.waveform {
                    // The kernel copies `custom_len` samples from this address
                    // during the upload call.
                    let ptr = if samples.is_empty() {
                        0
                    } else {
                        samples.as_ptr() as usize
                    };
                    image
                        .pad_to(UNION_AT + 20)
                        .u32(u32::try_from(samples.len()).unwrap_or(u32::MAX))
                        .pad_to(UNION_AT + 24)
                        .usize(ptr);
                }
            }
            EffectPayload::Condition { axes, .. } => {
                for axis in axes {
                    image
                        .u16(axis.right_saturation)
                        .u16(axis.left_saturation)
                        .i16(axis.right_coeff)
                        .i16(axis.left_coeff)
                        .u16(axis.deadband)
                        .i16(axis.center);
                }
            }
            EffectPayload::Rumble(r) => {
                image.u16(r.strong_magnitude).u16(r.weak_magnitude);
            }
            EffectPayload::Raw { data, .. } => {
                image.bytes(data);
            }
        }
    }
}

/// A force-feedback effect.
///
/// `id` is `-1` for an effect that has not been uploaded yet; a successful
/// upload stores the id assigned by the driver. Re-uploading an effect with
/// its assigned id updates it in place, even while it plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub id: i16,
    /// Direction as a fraction of a full turn (`DIR_*`).
    pub direction: u16,
    pub trigger: Trigger,
    pub replay: Replay,
    pub payload: EffectPayload,
}

impl Effect {
    /// Creates a not-yet-uploaded effect with the given payload.
    pub fn new(payload: EffectPayload) -> Self {
        Self {
            id: -1,
            direction: 0,
            trigger: Trigger::default(),
            replay: Replay::default(),
            payload,
        }
    }

    /// Rumble effect lasting `length_ms`.
    pub fn rumble(strong: u16, weak: u16, length_ms: u16) -> Self {
        Self::new(EffectPayload::Rumble(RumbleEffect {
            strong_magnitude: strong,
            weak_magnitude: weak,
        }))
        .with_replay(length_ms, 0)
    }

    /// Sets the direction.
    pub fn with_direction(mut self, direction: u16) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the replay length and delay.
    pub fn with_replay(mut self, length_ms: u16, delay_ms: u16) -> Self {
        self.replay = Replay {
            length: length_ms,
            delay: delay_ms,
        };
        self
    }

    /// Sets the trigger.
    pub fn with_trigger(mut self, button: u16, interval_ms: u16) -> Self {
        self.trigger = Trigger {
            button,
            interval: interval_ms,
        };
        self
    }

    /// Kind code carried in the header.
    pub fn kind_code(&self) -> u16 {
        self.payload.kind_code()
    }

    /// Builds the `struct ff_effect` image ([`FF_EFFECT_SIZE`] bytes).
    ///
    /// For custom periodic waveforms the image embeds the address of the
    /// sample buffer, so it is only valid while `self` is borrowed.
    pub fn encode(&self) -> Vec<u8> {
        let mut image = Image(Vec::with_capacity(FF_EFFECT_SIZE));
        image
            .u16(self.kind_code())
            .i16(self.id)
            .u16(self.direction)
            .u16(self.trigger.button)
            .u16(self.trigger.interval)
            .u16(self.replay.length)
            .u16(self.replay.delay)
            .pad_to(UNION_AT);
        self.payload.write_union(&mut image);
        let mut bytes = image.0;
        bytes.resize(FF_EFFECT_SIZE, 0);
        bytes
    }

    /// Reads the id the driver wrote back into an uploaded image.
    pub fn assigned_id(image: &[u8]) -> Option<i16> {
        let bytes = image.get(ID_AT..ID_AT + 2)?;
        Some(i16::from_ne_bytes(bytes.try_into().ok()?))
    }
}

/// Sequential writer for native-endian fields.
struct Image(Vec<u8>);

impl Image {
    fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.0.extend_from_slice(bytes);
        self
    }

    fn u16(&mut self, v: u16) -> &mut Self {
        self.bytes(&v.to_ne_bytes())
    }

    fn i16(&mut self, v: i16) -> &mut Self {
        self.bytes(&v.to_ne_bytes())
    }

    fn u32(&mut self, v: u32) -> &mut Self {
        self.bytes(&v.to_ne_bytes())
    }

    fn usize(&mut self, v: usize) -> &mut Self {
        self.bytes(&v.to_ne_bytes())
    }

    fn envelope(&mut self, e: &Envelope) -> &mut Self {
        self.u16(e.attack_length)
            .u16(e.attack_level)
            .u16(e.fade_length)
            .u16(e.fade_level)
    }

    fn pad_to(&mut self, at: usize) -> &mut Self {
        if self.0.len() < at {
            self.0.resize(at, 0);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::DIR_LEFT;

    fn word(image: &[u8], at: usize) -> u16 {
        image
            .get(at..at + 2)
            .and_then(|b| b.try_into().ok())
            .map(u16::from_ne_bytes)
            .unwrap_or_default()
    }

    #[test]
    fn test_effect_size_matches_platform() {
        #[cfg(target_pointer_width = "64")]
        assert_eq!(FF_EFFECT_SIZE, 48);
        #[cfg(target_pointer_width = "32")]
        assert_eq!(FF_EFFECT_SIZE, 44);
    }

    #[test]
    fn test_header_layout() {
        let effect = Effect::rumble(0x8000, 0x4000, 500)
            .with_direction(DIR_LEFT)
            .with_trigger(3, 100);
        let image = effect.encode();
        assert_eq!(word(&image, 0), FF_RUMBLE);
        assert_eq!(Effect::assigned_id(&image), Some(-1));
        assert_eq!(word(&image, 4), DIR_LEFT);
        assert_eq!(word(&image, 6), 3);
        assert_eq!(word(&image, 8), 100);
        assert_eq!(word(&image, 10), 500);
        assert_eq!(word(&image, 12), 0);
        assert_eq!(word(&image, UNION_AT), 0x8000);
        assert_eq!(word(&image, UNION_AT + 2), 0x4000);
    }

    #[test]
    fn test_condition_axes_are_twelve_bytes_apart() {
        let axis = |center| ConditionEffect {
            right_saturation: 0xffff,
            left_saturation: 0xffff,
            right_coeff: 0x2000,
            left_coeff: -0x2000,
            deadband: 0,
            center,
        };
        let effect = Effect::new(EffectPayload::Condition {
            kind: ConditionKind::Damper,
            axes: [axis(10), axis(-10)],
        });
        let image = effect.encode();
        assert_eq!(word(&image, 0), FF_DAMPER);
        assert_eq!(word(&image, UNION_AT + 6), (-0x2000i16) as u16);
        assert_eq!(word(&image, UNION_AT + 10), 10);
        assert_eq!(word(&image, UNION_AT + 22), (-10i16) as u16);
    }

    #[test]
    fn test_periodic_custom_samples() {
        let samples = vec![1i16, -1, 2, -2];
        let effect = Effect::new(EffectPayload::Periodic(PeriodicEffect {
            waveform: Waveform::Custom(samples),
            period: 20,
            magnitude: 0x7fff,
            offset: 0,
            phase: 0,
            envelope: Envelope::default(),
        }));
        let image = effect.encode();
        assert_eq!(word(&image, UNION_AT), FF_CUSTOM);
        assert_eq!(word(&image, UNION_AT + 2), 20);

        let len = image
            .get(UNION_AT + 20..UNION_AT + 24)
            .and_then(|b| b.try_into().ok())
            .map(u32::from_ne_bytes);
        assert_eq!(len, Some(4));

        let ptr = image
            .get(UNION_AT + 24..UNION_AT + 24 + size_of::<usize>())
            .and_then(|b| b.try_into().ok())
            .map(usize::from_ne_bytes);
        let expected = match &effect.payload {
            EffectPayload::Periodic(PeriodicEffect {
                waveform: Waveform::Custom(s),
                ..
            }) => s.as_ptr() as usize,
            _ => 0,
        };
        assert_eq!(ptr, Some(expected));
    }

    #[test]
    fn test_raw_payload_is_truncated_to_union() {
        let effect = Effect::new(EffectPayload::Raw {
            kind: 0x5f,
            data: vec![0xab; 100],
        });
        let image = effect.encode();
        assert_eq!(word(&image, 0), 0x5f);
        assert!(image.get(UNION_AT..).is_some_and(|u| u.iter().all(|b| *b == 0xab)));
    }

    #[test]
    fn test_kind_codes_round_trip() {
        for code in FF_RUMBLE..=FF_RAMP {
            let kind = EffectKind::from_code(code);
            assert_eq!(kind.map(EffectKind::code), Some(code));
        }
        assert_eq!(EffectKind::from_code(FF_SQUARE), None);
    }
}
