//! Property-based tests for request encoding.

use evio_ioctl::{ControlCode, Direction, MAX_SIZE, try_encode};
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::None),
        Just(Direction::Write),
        Just(Direction::Read),
        Just(Direction::ReadWrite),
    ]
}

proptest! {
    #[test]
    fn encode_decode_round_trip(
        dir in direction(),
        group in any::<u8>(),
        number in any::<u8>(),
        size in 0usize..=MAX_SIZE,
    ) {
        let code = ControlCode::encode(dir, group, number, size);
        prop_assert_eq!(code.direction(), dir);
        prop_assert_eq!(code.group(), group);
        prop_assert_eq!(code.number(), number);
        prop_assert_eq!(code.size(), size);
        prop_assert_eq!(ControlCode::from_raw(code.bits()), code);
    }

    #[test]
    fn checked_encoder_agrees_in_range(
        dir in direction(),
        group in any::<u8>(),
        number in any::<u8>(),
        size in 0usize..=MAX_SIZE,
    ) {
        prop_assert_eq!(
            try_encode(dir, group, number, size),
            Ok(ControlCode::encode(dir, group, number, size))
        );
    }

    #[test]
    fn checked_encoder_rejects_out_of_range(size in (MAX_SIZE + 1)..usize::MAX) {
        prop_assert!(try_encode(Direction::Read, b'E', 0, size).is_err());
    }

    #[test]
    fn raw_value_matches_packed_bits(number in any::<u8>(), size in 0usize..=MAX_SIZE) {
        let code = ControlCode::encode(Direction::Read, b'E', number, size);
        prop_assert_eq!(code.as_raw(), libc::c_ulong::from(code.bits()));
    }
}

#[test]
fn name_query_round_trip() {
    let code = ControlCode::encode(Direction::Read, b'E', 0x06, 256);
    assert_eq!(
        (code.direction(), code.group(), code.number(), code.size()),
        (Direction::Read, b'E', 0x06, 256)
    );
}
