//! Property-based tests for the event codec, capability predicate and
//! percentage scaling.

use evio_device::capability::supports;
use evio_device::effects::{Effect, FF_EFFECT_SIZE};
use evio_device::event::frame;
use evio_device::{Bitset, EVENT_SIZE, Event, Timestamp, scale_percent};
use proptest::prelude::*;

fn any_event() -> impl Strategy<Value = Event> {
    (any::<i32>(), 0i32..1_000_000, any::<u16>(), any::<u16>(), any::<i32>()).prop_map(
        |(seconds, micros, kind, code, value)| Event {
            time: Timestamp {
                seconds: libc::time_t::from(seconds),
                micros: libc::suseconds_t::from(micros),
            },
            kind,
            code,
            value,
        },
    )
}

proptest! {
    #[test]
    fn decode_inverts_encode(event in any_event()) {
        prop_assert_eq!(Event::decode(&event.encode()), Some(event));
    }

    #[test]
    fn framing_yields_whole_records_and_remainder(
        events in prop::collection::vec(any_event(), 0..16),
        extra in 0usize..EVENT_SIZE,
    ) {
        let mut bytes: Vec<u8> = events.iter().flat_map(Event::encode).collect();
        bytes.extend(std::iter::repeat_n(0xee, extra));

        let (framed, trailing) = frame(&bytes);
        prop_assert_eq!(framed.collect::<Vec<_>>(), events);
        prop_assert_eq!(trailing, extra);
    }

    #[test]
    fn empty_code_list_is_always_supported(bits in prop::collection::vec(0usize..768, 0..32)) {
        let mask = Bitset::with_bits(768, bits);
        prop_assert!(supports(&mask, &[]));
    }

    #[test]
    fn supports_iff_every_code_is_set(
        set in prop::collection::vec(0u16..768, 0..32),
        asked in prop::collection::vec(0u16..800, 0..8),
    ) {
        let mask = Bitset::with_bits(768, set.iter().map(|&c| usize::from(c)));
        let expected = asked.iter().all(|c| set.contains(c));
        prop_assert_eq!(supports(&mask, &asked), expected);
    }

    #[test]
    fn scaled_percent_stays_in_range_and_is_monotonic(a in any::<i32>(), b in any::<i32>()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!((0..=0xffff).contains(&scale_percent(lo)));
        prop_assert!(scale_percent(lo) <= scale_percent(hi));
    }

    #[test]
    fn effect_image_has_fixed_size_and_carries_id(id in -1i16..64, strong in any::<u16>()) {
        let mut effect = Effect::rumble(strong, 0, 100);
        effect.id = id;
        let image = effect.encode();
        prop_assert_eq!(image.len(), FF_EFFECT_SIZE);
        prop_assert_eq!(Effect::assigned_id(&image), Some(id));
    }
}
