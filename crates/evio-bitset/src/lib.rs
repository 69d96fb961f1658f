//! Packed bitsets over 64-bit words
//!
//! The kernel reports capability and state masks as arrays of machine words
//! where bit `i` lives in word `i / 64` at position `i % 64`. [`Bitset`] keeps
//! that layout as a little-endian byte image, so the same storage can be
//! handed to a control call as a destination buffer and then be tested bit by
//! bit without any copy.
//!
//! # Out-of-range access
//!
//! Masks are sized to the largest code of their domain and callers routinely
//! probe past that size (e.g. iterating `0..max` over a smaller mask).
//! Reading a bit outside the allocated words yields `false` and writing one is
//! silently ignored.
//!
//! # Example
//!
//! ```
//! use evio_bitset::Bitset;
//!
//! let mut bits = Bitset::new(80);
//! assert_eq!(bits.len(), 128);
//!
//! bits.set(76);
//! assert!(bits.test(76));
//! assert!(!bits.test(1000));
//!
//! // The byte view is the backing storage.
//! assert_eq!(bits.as_bytes()[9], 0b0001_0000);
//! ```

#![deny(clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

use core::fmt;

/// Number of bits in one storage word.
pub const WORD_BITS: usize = 64;

/// Number of bytes in one storage word.
pub const WORD_BYTES: usize = WORD_BITS / 8;

/// A fixed-size set of bits backed by 64-bit words.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Bitset {
    bytes: Vec<u8>,
}

impl Bitset {
    /// Creates a zeroed bitset able to hold at least `bits` bits.
    ///
    /// The allocation is rounded up to a whole number of words.
    pub fn new(bits: usize) -> Self {
        let words = bits.div_ceil(WORD_BITS);
        Self {
            bytes: vec![0u8; words * WORD_BYTES],
        }
    }

    /// Creates a bitset from a raw byte image.
    ///
    /// The image is zero-padded to a whole number of words.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut set = Self::new(bytes.len() * 8);
        set.bytes
            .iter_mut()
            .zip(bytes)
            .for_each(|(dst, src)| *dst = *src);
        set
    }

    /// Creates a bitset of at least `bits` bits with the given indices set.
    ///
    /// Indices outside the allocation are ignored, as with [`Bitset::set`].
    pub fn with_bits<I>(bits: usize, indices: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut set = Self::new(bits);
        for i in indices {
            set.set(i);
        }
        set
    }

    #[inline]
    fn locate(i: usize) -> (usize, u8) {
        (i / 8, 1u8 << (i % 8))
    }

    /// Sets bit `i`. Out-of-range indices are ignored.
    #[inline]
    pub fn set(&mut self, i: usize) {
        let (byte, mask) = Self::locate(i);
        if let Some(b) = self.bytes.get_mut(byte) {
            *b |= mask;
        }
    }

    /// Clears bit `i`. Out-of-range indices are ignored.
    #[inline]
    pub fn unset(&mut self, i: usize) {
        let (byte, mask) = Self::locate(i);
        if let Some(b) = self.bytes.get_mut(byte) {
            *b &= !mask;
        }
    }

    /// Returns whether bit `i` is set; `false` for out-of-range indices.
    #[inline]
    pub fn test(&self, i: usize) -> bool {
        let (byte, mask) = Self::locate(i);
        self.bytes.get(byte).is_some_and(|b| b & mask != 0)
    }

    /// Total number of addressable bits (always a multiple of [`WORD_BITS`]).
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len() * 8
    }

    /// Returns `true` when no bit is set.
    pub fn is_empty(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }

    /// Number of storage words.
    #[inline]
    pub fn word_count(&self) -> usize {
        self.bytes.len() / WORD_BYTES
    }

    /// Iterates over the logical 64-bit words.
    pub fn words(&self) -> impl Iterator<Item = u64> + '_ {
        self.bytes.chunks_exact(WORD_BYTES).map(|chunk| {
            let mut word = [0u8; WORD_BYTES];
            word.copy_from_slice(chunk);
            u64::from_le_bytes(word)
        })
    }

    /// Clears every bit.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Iterates over the indices of set bits in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bytes.iter().enumerate().flat_map(|(n, byte)| {
            let byte = *byte;
            (0..8usize)
                .filter(move |bit| byte & (1u8 << bit) != 0)
                .map(move |bit| n * 8 + bit)
        })
    }

    /// Byte view over the backing storage (little-endian word layout).
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable byte view over the backing storage.
    ///
    /// Writes through this view are visible to [`Bitset::test`].
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl fmt::Debug for Bitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter_ones()).finish()
    }
}

impl fmt::Binary for Bitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Most significant word first, words separated by `_`.
        let words: Vec<u64> = self.words().collect();
        for (n, word) in words.iter().rev().enumerate() {
            if n != 0 {
                f.write_str("_")?;
            }
            write!(f, "{word:064b}")?;
        }
        Ok(())
    }
}
