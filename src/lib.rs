//! Variable-length, word-packed bit sequences.
//!
//! Two modules, consumed bottom-up:
//!
//! - [`word`]: pure bit-manipulation primitives on a single `u64` word
//!   (masks, field extraction/insertion, table-driven population count and
//!   bit reversal).
//! - [`seq`]: [`BitSeq`], a growable sequence of bits backed by `Vec<u64>`,
//!   built entirely on the `word` primitives.
//!
//! Every precondition in this crate is a programmer contract enforced by
//! `assert!`; there is no recoverable-error surface.

pub mod seq;
pub mod word;

pub use seq::BitSeq;
pub use word::{WORD_BITS, Word};
