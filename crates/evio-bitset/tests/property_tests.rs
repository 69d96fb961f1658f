//! Property-based tests for bitset addressing laws.

use evio_bitset::{Bitset, WORD_BITS};
use proptest::prelude::*;

proptest! {
    #[test]
    fn length_is_word_multiple_and_covers_request(bits in 0usize..4096) {
        let bs = Bitset::new(bits);
        prop_assert_eq!(bs.len() % WORD_BITS, 0);
        prop_assert!(bs.len() >= bits);
        prop_assert!(bs.len() < bits + WORD_BITS);
    }

    #[test]
    fn set_then_test_is_true(bits in 1usize..2048, seed in any::<usize>()) {
        let mut bs = Bitset::new(bits);
        let i = seed % bs.len();
        bs.set(i);
        prop_assert!(bs.test(i));
        bs.unset(i);
        prop_assert!(!bs.test(i));
    }

    #[test]
    fn beyond_length_always_false(bits in 0usize..1024, extra in 0usize..10_000) {
        let mut bs = Bitset::new(bits);
        let i = bs.len() + extra;
        bs.set(i);
        prop_assert!(!bs.test(i));
        prop_assert!(bs.is_empty());
    }

    #[test]
    fn set_touches_exactly_one_bit(bits in 1usize..512, seed in any::<usize>()) {
        let mut bs = Bitset::new(bits);
        let i = seed % bs.len();
        bs.set(i);
        prop_assert_eq!(bs.count_ones(), 1);
        prop_assert_eq!(bs.iter_ones().next(), Some(i));
    }

    #[test]
    fn byte_view_matches_word_layout(indices in proptest::collection::vec(0usize..256, 0..32)) {
        let bs = Bitset::with_bits(256, indices.iter().copied());
        for (w, word) in bs.words().enumerate() {
            for bit in 0..WORD_BITS {
                let i = w * WORD_BITS + bit;
                prop_assert_eq!((word >> bit) & 1 == 1, bs.test(i));
            }
        }
        let copy = Bitset::from_bytes(bs.as_bytes());
        prop_assert_eq!(copy, bs);
    }
}
