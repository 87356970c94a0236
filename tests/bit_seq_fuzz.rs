//! Model-based fuzz: random operation sequences applied to both a `BitSeq`
//! and a `Vec<bool>` reference model, with full-state comparison after every
//! step.

use bitseq::{BitSeq, word};
use proptest::prelude::*;

#[derive(Clone)]
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        let seed = if seed == 0 {
            0xDEAD_BEEF_DEAD_BEEFu64
        } else {
            seed
        };
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn range_inclusive_usize(&mut self, min: usize, max: usize) -> usize {
        assert!(min <= max);
        let span = max - min + 1;
        min + (self.next_u64() as usize % span)
    }

    fn boolean(&mut self) -> bool {
        (self.next_u64() & 1) != 0
    }
}

#[derive(Clone, Copy, Debug)]
enum BitSeqEvent {
    Push,
    RemoveLast,
    Assign,
    SetValue,
    PushValue,
    GetValueCheck,
    PushBits,
    Reverse,
    Flip,
    ShiftLeft,
    ShiftRight,
    SetAll,
}

fn weighted_choice(rng: &mut XorShift64, weights: &[(BitSeqEvent, u64)]) -> BitSeqEvent {
    let total: u64 = weights.iter().map(|(_, w)| *w).sum();
    assert!(total > 0);

    let mut roll = rng.next_u64() % total;
    for (event, weight) in weights {
        if roll < *weight {
            return *event;
        }
        roll -= *weight;
    }
    weights[0].0
}

/// Reference model: one `bool` per bit, index 0 first.
struct BitSeqModel {
    bits: Vec<bool>,
}

impl BitSeqModel {
    fn new() -> Self {
        Self { bits: Vec::new() }
    }

    fn len(&self) -> usize {
        self.bits.len()
    }

    fn set_value(&mut self, value: u64, i: usize, n: usize) {
        for k in 0..n {
            self.bits[i + k] = value >> k & 1 != 0;
        }
    }

    fn get_value(&self, i: usize, n: usize) -> u64 {
        let mut value = 0u64;
        for k in 0..n {
            value |= (self.bits[i + k] as u64) << k;
        }
        value
    }

    fn push_value(&mut self, value: u64, n: usize) {
        for k in 0..n {
            self.bits.push(value >> k & 1 != 0);
        }
    }

    fn shift_left(&mut self, shift: usize) {
        if self.bits.is_empty() || shift == 0 {
            return;
        }
        let k = shift % self.bits.len();
        let shifted: Vec<bool> = (0..self.bits.len())
            .map(|i| i >= k && self.bits[i - k])
            .collect();
        self.bits = shifted;
    }

    fn shift_right(&mut self, shift: usize) {
        if self.bits.is_empty() || shift == 0 {
            return;
        }
        let k = shift % self.bits.len();
        let shifted: Vec<bool> = (0..self.bits.len())
            .map(|i| i + k < self.bits.len() && self.bits[i + k])
            .collect();
        self.bits = shifted;
    }
}

fn check_agreement(seq: &BitSeq, model: &BitSeqModel) {
    assert_eq!(seq.bit_length(), model.len());
    assert_eq!(seq.word_len(), model.len().div_ceil(64));
    assert_eq!(seq.count(), model.bits.iter().filter(|&&bit| bit).count());
    assert_eq!(seq.is_zero(), model.bits.iter().all(|&bit| !bit));

    for (i, &bit) in model.bits.iter().enumerate() {
        assert_eq!(seq.is_set(i), bit, "bit {i} disagrees");
    }

    let expected_ones: Vec<usize> = model
        .bits
        .iter()
        .enumerate()
        .filter_map(|(i, &bit)| bit.then_some(i))
        .collect();
    assert_eq!(seq.iter_ones().collect::<Vec<_>>(), expected_ones);

    // Garbage-zero, observed through the raw words.
    if seq.bit_length() > 0 {
        let last = seq.words()[seq.word_len() - 1];
        assert_eq!(last & word::upper_mask(seq.last_word_bits()), 0);
    }
}

fn events_max() -> usize {
    std::env::var("BIT_SEQ_FUZZ_EVENTS_MAX")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(500)
        .max(1)
}

fn run_fuzz(seed: u64) {
    let mut rng = XorShift64::new(seed);
    let events_count = rng.range_inclusive_usize(1, events_max());

    let weights = [
        (BitSeqEvent::Push, 100),
        (BitSeqEvent::RemoveLast, 60),
        (BitSeqEvent::Assign, 100),
        (BitSeqEvent::SetValue, 50),
        (BitSeqEvent::PushValue, 50),
        (BitSeqEvent::GetValueCheck, 50),
        (BitSeqEvent::PushBits, 10),
        (BitSeqEvent::Reverse, 20),
        (BitSeqEvent::Flip, 20),
        (BitSeqEvent::ShiftLeft, 20),
        (BitSeqEvent::ShiftRight, 20),
        (BitSeqEvent::SetAll, 5),
    ];

    let mut seq = BitSeq::new();
    let mut model = BitSeqModel::new();

    for _ in 0..events_count {
        match weighted_choice(&mut rng, &weights) {
            BitSeqEvent::Push => {
                let bit = rng.boolean();
                seq.push(bit);
                model.bits.push(bit);
            }
            BitSeqEvent::RemoveLast => {
                if model.len() == 0 {
                    continue;
                }
                seq.remove_last();
                model.bits.pop();
            }
            BitSeqEvent::Assign => {
                if model.len() == 0 {
                    continue;
                }
                let i = rng.range_inclusive_usize(0, model.len() - 1);
                let bit = rng.boolean();
                seq.assign(i, bit);
                model.bits[i] = bit;
            }
            BitSeqEvent::SetValue => {
                if model.len() == 0 {
                    continue;
                }
                let n = rng.range_inclusive_usize(1, model.len().min(64));
                let i = rng.range_inclusive_usize(0, model.len() - n);
                let value = rng.next_u64();
                seq.set_value(value, i, n);
                model.set_value(value, i, n);
            }
            BitSeqEvent::PushValue => {
                let n = rng.range_inclusive_usize(1, 64);
                let value = rng.next_u64();
                seq.push_value(value, n);
                model.push_value(value & word::lower_mask(n), n);
            }
            BitSeqEvent::GetValueCheck => {
                if model.len() == 0 {
                    continue;
                }
                let n = rng.range_inclusive_usize(1, model.len().min(64));
                let i = rng.range_inclusive_usize(0, model.len() - n);
                assert_eq!(seq.get_value(i, n), model.get_value(i, n));
            }
            BitSeqEvent::PushBits => {
                let extra = rng.range_inclusive_usize(0, 150);
                let mut other = BitSeq::new();
                for _ in 0..extra {
                    let bit = rng.boolean();
                    other.push(bit);
                    model.bits.push(bit);
                }
                seq.push_bits(&other);
            }
            BitSeqEvent::Reverse => {
                seq.reverse();
                model.bits.reverse();
            }
            BitSeqEvent::Flip => {
                seq.flip();
                for bit in &mut model.bits {
                    *bit = !*bit;
                }
            }
            BitSeqEvent::ShiftLeft => {
                if model.len() == 0 {
                    continue;
                }
                let shift = rng.range_inclusive_usize(0, 2 * model.len());
                seq <<= shift;
                model.shift_left(shift);
            }
            BitSeqEvent::ShiftRight => {
                if model.len() == 0 {
                    continue;
                }
                let shift = rng.range_inclusive_usize(0, 2 * model.len());
                seq >>= shift;
                model.shift_right(shift);
            }
            BitSeqEvent::SetAll => {
                let value = rng.boolean();
                seq.set_all(value);
                for bit in &mut model.bits {
                    *bit = value;
                }
            }
        }

        check_agreement(&seq, &model);
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 16, ..ProptestConfig::default() })]
    #[test]
    fn fuzz_bit_seq_matches_model(seed in any::<u64>()) {
        run_fuzz(seed);
    }
}
