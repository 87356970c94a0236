//! Growable bit sequence backed by a vector of `u64` words.
//!
//! [`BitSeq`] is a logical sequence of bits of arbitrary length. Storage is an
//! owned `Vec<u64>`, word 0 first, bit 0 in the least-significant position of
//! word 0. All indexed, field, and bulk operations are built on the
//! primitives in [`crate::word`].
//!
//! # Invariants
//!
//! Two structural invariants hold after every mutator returns:
//!
//! - **garbage-zero**: every bit position at or above `bit_length()` within
//!   the last occupied word is zero. Equality, `is_zero`, `count`, `reverse`,
//!   and `iter_ones` all rely on this to treat words uniformly with no tail
//!   special case.
//! - **exact storage**: the word count is exactly `bit_length().div_ceil(64)`;
//!   no spare trailing word is kept allocated.
//!
//! # Canonical layout
//!
//! The serialized form of a sequence is its words in storage order, each word
//! encoded little-endian ([`BitSeq::to_le_bytes`] / [`BitSeq::from_le_bytes`]).
//!
//! # Field packing
//!
//! Binary records are built by calling [`BitSeq::push_value`] once per field
//! in a fixed order; decoding issues [`BitSeq::get_value`] at the same
//! cumulative bit offsets. Fields may straddle word boundaries.

use core::ops::{BitAndAssign, ShlAssign, ShrAssign};

use crate::word::{self, WORD_BITS, Word};

/// A variable-length sequence of bits packed into `u64` words.
///
/// Mutation is in-place and requires `&mut self`; the sequence has a single
/// owner and no internal locking. All preconditions (index bounds, field
/// widths, operand lengths) are enforced with `assert!` and violating them is
/// a programming defect, not a recoverable condition.
///
/// # Examples
/// ```
/// use bitseq::BitSeq;
///
/// let mut bits = BitSeq::new();
/// bits.push_value(0b1011, 4);
/// assert_eq!(bits.bit_length(), 4);
/// assert_eq!(bits.get_value(0, 4), 11);
/// assert_eq!(bits.iter_ones().collect::<Vec<_>>(), vec![0, 1, 3]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct BitSeq {
    bit_len: usize,
    words: Vec<Word>,
}

impl BitSeq {
    /// Creates an empty sequence.
    #[inline]
    pub fn new() -> Self {
        Self::empty(0)
    }

    /// Creates a sequence of `bit_len` zero bits.
    pub fn empty(bit_len: usize) -> Self {
        Self {
            bit_len,
            words: vec![0; bit_len.div_ceil(WORD_BITS)],
        }
    }

    /// Adopts a word vector whole; the length is 64 bits per word.
    pub fn from_words(words: Vec<Word>) -> Self {
        Self {
            bit_len: words.len() * WORD_BITS,
            words,
        }
    }

    /// Number of meaningful bits.
    #[inline]
    pub fn bit_length(&self) -> usize {
        self.bit_len
    }

    /// Returns `true` when the sequence holds no bits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    /// Number of storage words.
    #[inline]
    pub fn word_len(&self) -> usize {
        self.words.len()
    }

    /// The backing words in storage order, word 0 first. Garbage bits in the
    /// last word are zero by invariant.
    #[inline]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Number of meaningful bits in the last word, in `[1, 64]`.
    ///
    /// Panics if the sequence is empty.
    #[inline]
    pub fn last_word_bits(&self) -> usize {
        assert!(self.bit_len > 0, "empty sequence has no last word");
        let result = self.bit_len % WORD_BITS;
        if result == 0 { WORD_BITS } else { result }
    }

    /// Number of garbage bit positions in the last word; zero for an empty
    /// sequence.
    #[inline]
    pub fn garbage_bits(&self) -> usize {
        if self.bit_len > 0 {
            WORD_BITS - self.last_word_bits()
        } else {
            0
        }
    }

    #[inline]
    fn words_needed(&self) -> usize {
        self.bit_len.div_ceil(WORD_BITS)
    }

    // Re-establishes garbage-zero after a mutation that may have written
    // beyond the logical length.
    fn zero_out_garbage(&mut self) {
        if self.bit_len > 0 {
            let last = self.words.len() - 1;
            self.words[last] &= word::lower_mask(self.last_word_bits());
        }
    }

    fn assert_invariants(&self) {
        assert_eq!(self.words.len(), self.words_needed());
        if self.bit_len > 0 {
            let last = self.words[self.words.len() - 1];
            assert_eq!(
                last & word::upper_mask(self.last_word_bits()),
                0,
                "garbage bits must be zero"
            );
        }
    }

    /// Returns bit `i`.
    ///
    /// Panics if `i >= bit_length()`.
    #[inline]
    pub fn is_set(&self, i: usize) -> bool {
        assert!(i < self.bit_len, "bit index out of bounds");
        word::get(self.words[i / WORD_BITS], i % WORD_BITS)
    }

    /// Sets bit `i` to `value`.
    ///
    /// Panics if `i >= bit_length()`.
    #[inline]
    pub fn assign(&mut self, i: usize, value: bool) {
        assert!(i < self.bit_len, "bit index out of bounds");
        let word = &mut self.words[i / WORD_BITS];
        *word = word::set(*word, i % WORD_BITS, value);
    }

    /// Sets bit `i`.
    #[inline]
    pub fn set(&mut self, i: usize) {
        self.assign(i, true);
    }

    /// Clears bit `i`.
    #[inline]
    pub fn unset(&mut self, i: usize) {
        self.assign(i, false);
    }

    /// Appends one bit. Storage grows by exactly one word only when the new
    /// bit does not fit in the existing words.
    pub fn push(&mut self, value: bool) {
        self.bit_len += 1;
        if self.words.len() < self.words_needed() {
            self.words.push(0);
        }
        self.assign(self.bit_len - 1, value);
        self.assert_invariants();
    }

    /// Removes the last bit. The last word is dropped iff it held exactly one
    /// meaningful bit.
    ///
    /// Panics if the sequence is empty.
    pub fn remove_last(&mut self) {
        assert!(self.bit_len > 0, "remove_last on an empty sequence");
        if self.last_word_bits() == 1 {
            self.words.pop();
        }
        self.bit_len -= 1;
        self.zero_out_garbage();
        self.assert_invariants();
    }

    /// Extracts the `n`-bit field starting at bit `i`, right-aligned.
    ///
    /// The field may span several words; word-aligned sub-ranges are combined
    /// with an accumulating shift.
    ///
    /// Panics unless `1 <= n <= 64` and `i + n <= bit_length()`.
    pub fn get_value(&self, i: usize, n: usize) -> Word {
        assert!(n >= 1 && n <= WORD_BITS, "field width out of range");
        assert!(i + n <= self.bit_len, "field overruns the sequence");

        let mut result = 0;
        let mut word_index = i / WORD_BITS;
        let mut bit = i % WORD_BITS;
        let mut shift = 0;
        let mut remaining = n;
        while remaining > 0 {
            let m = remaining.min(WORD_BITS - bit);
            result |= word::get_value(self.words[word_index], bit, m) << shift;
            word_index += 1;
            bit = 0;
            shift += m;
            remaining -= m;
        }
        result
    }

    /// Replaces the `n`-bit field starting at bit `i` with the low `n` bits
    /// of `value`. Bits outside the field are unchanged.
    ///
    /// Panics unless `1 <= n <= 64` and `i + n <= bit_length()`.
    pub fn set_value(&mut self, value: Word, i: usize, n: usize) {
        assert!(n >= 1 && n <= WORD_BITS, "field width out of range");
        assert!(i + n <= self.bit_len, "field overruns the sequence");

        let mut word_index = i / WORD_BITS;
        let mut bit = i % WORD_BITS;
        let mut shift = 0;
        let mut remaining = n;
        while remaining > 0 {
            let m = remaining.min(WORD_BITS - bit);
            let word = &mut self.words[word_index];
            *word = word::set_value(*word, value >> shift, bit, m);
            word_index += 1;
            bit = 0;
            shift += m;
            remaining -= m;
        }
        self.assert_invariants();
    }

    /// Appends the low `n` bits of `value`, growing storage as needed.
    ///
    /// Panics unless `1 <= n <= 64`.
    pub fn push_value(&mut self, value: Word, n: usize) {
        assert!(n >= 1 && n <= WORD_BITS, "field width out of range");
        let start = self.bit_len;
        self.bit_len += n;
        while self.words.len() < self.words_needed() {
            self.words.push(0);
        }
        self.set_value(value, start, n);
    }

    /// Appends every bit of `other`, word by word. Storage is trimmed so the
    /// final word count is exactly `bit_length().div_ceil(64)`.
    pub fn push_bits(&mut self, other: &BitSeq) {
        if other.bit_len == 0 {
            return;
        }
        // Append whole words; other's garbage bits are zero by invariant, so
        // the overshoot appends only zeros, then the length is pulled back.
        for &word in &other.words {
            self.push_value(word, WORD_BITS);
        }
        self.bit_len -= WORD_BITS - other.last_word_bits();
        if self.words.len() > self.words_needed() {
            self.words.pop();
        }
        self.assert_invariants();
    }

    /// Reverses the sequence in place: bit `i` of the result is bit
    /// `bit_length() - 1 - i` of the original.
    ///
    /// The sequence is padded to a whole number of words, shifted up so the
    /// data lands at the low end once word order flips, then each word is
    /// bit-reversed.
    pub fn reverse(&mut self) {
        if self.bit_len == 0 {
            return;
        }
        let pad = self.garbage_bits();
        self.bit_len += pad;
        if pad > 0 {
            *self <<= pad;
        }
        self.words.reverse();
        for word in &mut self.words {
            *word = word::reverse_bits(*word);
        }
        self.bit_len -= pad;
        self.zero_out_garbage();
        self.assert_invariants();
    }

    /// Complements every bit.
    pub fn flip(&mut self) {
        for word in &mut self.words {
            *word = !*word;
        }
        self.zero_out_garbage();
        self.assert_invariants();
    }

    /// Sets every bit to `value`.
    pub fn set_all(&mut self, value: bool) {
        let fill = if value { Word::MAX } else { 0 };
        for word in &mut self.words {
            *word = fill;
        }
        self.zero_out_garbage();
        self.assert_invariants();
    }

    /// Returns `true` iff every word is zero.
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Counts set bits.
    pub fn count(&self) -> usize {
        self.words
            .iter()
            .map(|&word| word::pop_count(word) as usize)
            .sum()
    }

    /// Iterates over the indices of set bits in ascending order.
    ///
    /// Garbage-zero is what lets the iterator run word by word with no
    /// special case for the last word.
    pub fn iter_ones(&self) -> IterOnes<'_> {
        IterOnes {
            words: &self.words,
            word_index: 0,
            current_word: self.words.first().copied().unwrap_or(0),
        }
    }

    /// Encodes the canonical layout: words in storage order, word 0 first,
    /// each word little-endian.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.words.len() * word::WORD_BYTES);
        for word in &self.words {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    /// Decodes the canonical layout produced by [`BitSeq::to_le_bytes`].
    ///
    /// Panics if `bytes` is not exactly `bit_len.div_ceil(64) * 8` bytes long
    /// or if any garbage bit position is nonzero.
    pub fn from_le_bytes(bytes: &[u8], bit_len: usize) -> Self {
        assert_eq!(
            bytes.len(),
            bit_len.div_ceil(WORD_BITS) * word::WORD_BYTES,
            "byte length does not match bit length"
        );
        let words = bytes
            .chunks_exact(word::WORD_BYTES)
            .map(|chunk| Word::from_le_bytes(chunk.try_into().unwrap()))
            .collect();
        let seq = Self { bit_len, words };
        seq.assert_invariants();
        seq
    }
}

/// Word-by-word equality.
///
/// Comparing sequences of different lengths is a contract violation and
/// panics; it is never silently `false`.
impl PartialEq for BitSeq {
    fn eq(&self, other: &Self) -> bool {
        assert_eq!(
            self.bit_len, other.bit_len,
            "comparing sequences of different lengths"
        );
        self.words == other.words
    }
}

impl Eq for BitSeq {}

/// Word-by-word AND. Operand lengths must be equal.
impl BitAndAssign<&BitSeq> for BitSeq {
    fn bitand_assign(&mut self, rhs: &BitSeq) {
        assert_eq!(self.bit_len, rhs.bit_len, "operand lengths differ");
        for (word, &other) in self.words.iter_mut().zip(&rhs.words) {
            *word &= other;
        }
        self.assert_invariants();
    }
}

/// Left shift with zero fill: bit `i` moves to `i + shift`, bits shifted past
/// the end are lost. The amount is taken modulo the length.
///
/// Panics on a nonzero shift of an empty sequence.
impl ShlAssign<usize> for BitSeq {
    fn shl_assign(&mut self, shift: usize) {
        if shift == 0 {
            return;
        }
        assert!(self.bit_len > 0, "shift on an empty sequence");
        let shift = shift % self.bit_len;
        let word_shift = shift / WORD_BITS;
        let bit_shift = shift % WORD_BITS;
        let words = self.words.len();

        if word_shift > 0 {
            for i in (word_shift..words).rev() {
                self.words[i] = self.words[i - word_shift];
            }
            for i in 0..word_shift {
                self.words[i] = 0;
            }
        }
        if bit_shift > 0 {
            // Each word's top bits carry into the next word up.
            let mut carry = 0;
            for i in word_shift..words {
                let carry_out = self.words[i] >> (WORD_BITS - bit_shift);
                self.words[i] = (self.words[i] << bit_shift) | carry;
                carry = carry_out;
            }
        }
        self.zero_out_garbage();
        self.assert_invariants();
    }
}

/// Right shift with zero fill: bit `i` moves to `i - shift`, the low bits of
/// the input are lost. The amount is taken modulo the length.
///
/// Panics on a nonzero shift of an empty sequence.
impl ShrAssign<usize> for BitSeq {
    fn shr_assign(&mut self, shift: usize) {
        if shift == 0 {
            return;
        }
        assert!(self.bit_len > 0, "shift on an empty sequence");
        let shift = shift % self.bit_len;
        let word_shift = shift / WORD_BITS;
        let bit_shift = shift % WORD_BITS;
        let words = self.words.len();

        if word_shift > 0 {
            for i in 0..words - word_shift {
                self.words[i] = self.words[i + word_shift];
            }
            for i in words - word_shift..words {
                self.words[i] = 0;
            }
        }
        if bit_shift > 0 {
            // Each word's low bits carry into the next word down.
            let mut carry = 0;
            for i in (0..words - word_shift).rev() {
                let carry_out = self.words[i] << (WORD_BITS - bit_shift);
                self.words[i] = (self.words[i] >> bit_shift) | carry;
                carry = carry_out;
            }
        }
        self.assert_invariants();
    }
}

/// Iterator over set bit indices in ascending order, produced by
/// [`BitSeq::iter_ones`].
pub struct IterOnes<'a> {
    words: &'a [Word],
    word_index: usize,
    current_word: Word,
}

impl Iterator for IterOnes<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current_word != 0 {
                let bit = self.current_word.trailing_zeros() as usize;
                // Clear the lowest set bit.
                self.current_word &= self.current_word.wrapping_sub(1);
                return Some(self.word_index * WORD_BITS + bit);
            }
            self.word_index += 1;
            if self.word_index >= self.words.len() {
                return None;
            }
            self.current_word = self.words[self.word_index];
        }
    }
}
