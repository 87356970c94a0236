//! Word-level bit manipulation primitives.
//!
//! Everything in this module operates on a single fixed-width unsigned word
//! ([`Word`] = `u64`). The only state is two 256-entry lookup tables
//! (population count per byte, bit-reversed byte), built at compile time and
//! shared read-only process-wide.
//!
//! Bit positions are 0-indexed from the least-significant end. A "field" is a
//! contiguous run of `n` bits starting at position `i`, read or written as a
//! right-aligned unsigned value.
//!
//! # Preconditions
//!
//! All positions and widths are checked with `assert!`. Passing an
//! out-of-range position or width is a programming defect and panics; none of
//! these functions return errors.

/// The word type used for bit storage and manipulation.
///
/// Using `u64` fixes the width all masking and shift arguments are expressed
/// against. Signed types are unusable here; the unsigned requirement is
/// enforced by the type itself.
pub type Word = u64;

/// Number of bits in a [`Word`].
pub const WORD_BITS: usize = Word::BITS as usize;

/// Number of bytes in a [`Word`].
pub const WORD_BYTES: usize = WORD_BITS / 8;

/// Number of distinct byte values; the size of both lookup tables.
const TABLE_SIZE: usize = 256;

const _: () = assert!(WORD_BITS == 64);
const _: () = assert!(WORD_BYTES == 8);

// =============================================================================
// Lookup tables
// =============================================================================

/// Set-bit count for every byte value. Built once at compile time, immutable
/// afterward, safe to share across threads without synchronization.
static POP_COUNT_8: [u8; TABLE_SIZE] = build_pop_count_table();

/// Bit-reversed value for every byte value. Same construction discipline as
/// [`POP_COUNT_8`].
static REVERSE_BITS_8: [u8; TABLE_SIZE] = build_reverse_bits_table();

const fn pop_count_byte(x: u8) -> u8 {
    let mut x = x;
    let mut count = 0;
    while x != 0 {
        count += x & 1;
        x >>= 1;
    }
    count
}

const fn reverse_bits_byte(x: u8) -> u8 {
    let mut x = x;
    let mut result = 0;
    let mut i = 0;
    while i < 8 {
        result = (result << 1) | (x & 1);
        x >>= 1;
        i += 1;
    }
    result
}

const fn build_pop_count_table() -> [u8; TABLE_SIZE] {
    let mut table = [0u8; TABLE_SIZE];
    let mut i = 0;
    while i < TABLE_SIZE {
        table[i] = pop_count_byte(i as u8);
        i += 1;
    }
    table
}

const fn build_reverse_bits_table() -> [u8; TABLE_SIZE] {
    let mut table = [0u8; TABLE_SIZE];
    let mut i = 0;
    while i < TABLE_SIZE {
        table[i] = reverse_bits_byte(i as u8);
        i += 1;
    }
    table
}

// Pin known table entries at compile time.
const _: () = {
    let pop = build_pop_count_table();
    assert!(pop[0x00] == 0);
    assert!(pop[0x01] == 1);
    assert!(pop[0b1011] == 3);
    assert!(pop[0xFF] == 8);

    let rev = build_reverse_bits_table();
    assert!(rev[0x00] == 0x00);
    assert!(rev[0x01] == 0x80);
    assert!(rev[0x80] == 0x01);
    assert!(rev[0xF0] == 0x0F);
    assert!(rev[0xFF] == 0xFF);
};

// =============================================================================
// Power-of-two arithmetic
// =============================================================================

/// Returns `2^x` as a word.
///
/// Panics if `x >= 64`.
#[inline]
pub const fn two_power(x: usize) -> Word {
    assert!(x < WORD_BITS, "exponent out of word range");
    1 << x
}

/// Returns whether `x` is a power of two. Zero is not a power of two.
#[inline]
pub const fn is_power_of_two(x: Word) -> bool {
    x != 0 && x & (x - 1) == 0
}

/// Floor of the binary logarithm: the position of the highest set bit.
///
/// Panics if `x == 0`.
#[inline]
pub const fn lg_floor(x: Word) -> u32 {
    assert!(x > 0, "lg of zero");
    Word::BITS - 1 - x.leading_zeros()
}

/// Ceiling of the binary logarithm: the smallest `k` with `2^k >= x`.
///
/// Panics if `x == 0`.
#[inline]
pub const fn lg_ceiling(x: Word) -> u32 {
    assert!(x > 0, "lg of zero");
    lg_floor(x) + !is_power_of_two(x) as u32
}

/// The smallest power of two `>= x`.
///
/// Panics if `x == 0` or the result does not fit in a word.
#[inline]
pub const fn next_power_of_two(x: Word) -> Word {
    assert!(x > 0, "no power of two >= 0");
    if is_power_of_two(x) {
        x
    } else {
        two_power(lg_ceiling(x) as usize)
    }
}

// =============================================================================
// Single-bit access
// =============================================================================

/// Returns bit `i` of `word`.
///
/// Panics if `i >= 64`.
#[inline]
pub const fn get(word: Word, i: usize) -> bool {
    assert!(i < WORD_BITS, "bit index out of word range");
    word & (1 << i) != 0
}

/// Returns `word` with bit `i` set to `value`.
///
/// Panics if `i >= 64`.
#[inline]
pub const fn set(word: Word, i: usize, value: bool) -> Word {
    assert!(i < WORD_BITS, "bit index out of word range");
    let mask = 1 << i;
    // Branchless: clear the bit, then OR in the new value.
    (word & !mask) | ((value as Word) << i)
}

/// Returns `word` with bit `i` toggled.
///
/// Panics if `i >= 64`.
#[inline]
pub const fn flip(word: Word, i: usize) -> Word {
    assert!(i < WORD_BITS, "bit index out of word range");
    word ^ (1 << i)
}

// =============================================================================
// Masks and fields
// =============================================================================

/// Mask with bits `[n, 64)` set: `upper_mask(0)` is all ones, `upper_mask(64)`
/// is zero.
///
/// A shift by the full word width is not portable, so `n == 64` is an explicit
/// branch rather than a shift.
#[inline]
pub const fn upper_mask(n: usize) -> Word {
    assert!(n <= WORD_BITS, "mask width out of word range");
    if n == WORD_BITS { 0 } else { Word::MAX << n }
}

/// Mask with bits `[0, n)` set: `lower_mask(0)` is zero, `lower_mask(64)` is
/// all ones.
#[inline]
pub const fn lower_mask(n: usize) -> Word {
    assert!(n <= WORD_BITS, "mask width out of word range");
    !upper_mask(n)
}

/// Mask with `n` bits starting at position `i` set.
///
/// Panics if the range `[i, i + n)` overruns the word.
#[inline]
pub const fn middle_mask(i: usize, n: usize) -> Word {
    assert!(i <= WORD_BITS && n <= WORD_BITS - i, "mask range out of word range");
    if n == 0 { 0 } else { lower_mask(n) << i }
}

/// Extracts the `n`-bit field at position `i`, right-aligned in the result.
///
/// Panics if the field overruns the word.
#[inline]
pub const fn get_value(word: Word, i: usize, n: usize) -> Word {
    assert!(i <= WORD_BITS && n <= WORD_BITS - i, "field out of word range");
    if i == WORD_BITS { 0 } else { (word >> i) & lower_mask(n) }
}

/// Returns `word` with the `n`-bit field at position `i` replaced by the low
/// `n` bits of `value`. All bits outside the field are unchanged.
///
/// The field is cleared first, then the masked value is OR-ed in; the two
/// steps use the same mask so bits of `value` above the field width cannot
/// leak into neighboring positions.
///
/// Panics if the field overruns the word.
#[inline]
pub const fn set_value(word: Word, value: Word, i: usize, n: usize) -> Word {
    assert!(i <= WORD_BITS && n <= WORD_BITS - i, "field out of word range");
    if n == 0 {
        return word;
    }
    let mask = middle_mask(i, n);
    (word & !mask) | ((value << i) & mask)
}

// =============================================================================
// Population count and reversal
// =============================================================================

/// Counts the set bits of `word` by summing per-byte table lookups.
#[inline]
pub fn pop_count(word: Word) -> u32 {
    let mut x = word;
    let mut sum = 0u32;
    for _ in 0..WORD_BYTES {
        sum += POP_COUNT_8[(x & 0xFF) as usize] as u32;
        x >>= 8;
    }
    sum
}

/// Counts consecutive zero bits starting from bit 0. Returns 64 for zero.
#[inline]
pub fn rightmost_zero_count(x: Word) -> u32 {
    pop_count(!x & x.wrapping_sub(1))
}

/// Reverses all 64 bits of `word`: bit `i` of the input becomes bit `63 - i`
/// of the result.
///
/// Implemented as a byte-order reversal that substitutes each byte with its
/// table-looked-up bit-reversed value.
#[inline]
pub fn reverse_bits(word: Word) -> Word {
    let mut x = word;
    let mut result = 0;
    for _ in 0..WORD_BYTES {
        result = (result << 8) | REVERSE_BITS_8[(x & 0xFF) as usize] as Word;
        x >>= 8;
    }
    result
}

/// Reverses the low `n` bits of `word` and right-aligns the result; bits at
/// and above position `n` are discarded.
///
/// Panics if `n` is not in `[1, 64]`.
#[inline]
pub fn reverse_bits_low(word: Word, n: usize) -> Word {
    assert!(n >= 1 && n <= WORD_BITS, "reversal width out of word range");
    reverse_bits(word & lower_mask(n)) >> (WORD_BITS - n)
}
