//! Timing-safe byte comparison
//!
//! Once lengths are known to be equal, every byte pair is visited and the
//! XOR differences are OR-ed into an accumulator; the result is read only at
//! the end. Execution time therefore does not depend on the position of the
//! first mismatch.
//!
//! Inputs of different length return `false` immediately. That short circuit
//! reveals only the length, which is public for fixed-size HMAC outputs.

use std::hint::black_box;

/// Compare two byte sequences without an early exit on the first difference
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    accumulate_difference(a, b, |_| {}) == 0
}

/// Fold `a[i] ^ b[i]` over all indices. `visit` observes each comparison and
/// exists so tests can count them.
#[inline]
fn accumulate_difference(a: &[u8], b: &[u8], mut visit: impl FnMut(usize)) -> u8 {
    let mut acc = 0u8;
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        visit(i);
        acc = black_box(acc | (x ^ y));
    }
    acc
}

/// Object form of [`constant_time_eq`], for call sites that hold a comparator
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantTimeComparator;

impl ConstantTimeComparator {
    #[must_use]
    pub fn equals(&self, a: &[u8], b: &[u8]) -> bool {
        constant_time_eq(a, b)
    }
}
