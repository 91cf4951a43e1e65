//! Randomness for paint texture
//!
//! Marks are scattered with small random offsets so a stroke reads as paint
//! rather than a row of identical stamps. The source is a trait so tests can
//! drive the brush with a fixed sequence.

use tracing::warn;

/// Source of uniform values in `[0, 1)`
pub trait JitterSource {
    /// Next uniform value in `[0, 1)`
    fn next_unit(&mut self) -> f32;

    /// Uniform value in `[-1, 1)`
    fn next_signed(&mut self) -> f32 {
        self.next_unit() * 2.0 - 1.0
    }

    /// Uniform value in `[lo, hi)`
    fn next_range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_unit()
    }

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.next_unit() < p
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        ((self.next_unit() * len as f32) as usize).min(len - 1)
    }
}

/// xorshift64 generator
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Seed used when the platform has no entropy source
    pub const FALLBACK_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

    pub fn new(seed: u64) -> Self {
        // Zero is a fixed point of xorshift
        let state = if seed == 0 { Self::FALLBACK_SEED } else { seed };
        Self { state }
    }

    /// Seed from the OS (or `crypto.getRandomValues` in the browser)
    pub fn from_entropy() -> Self {
        let mut bytes = [0u8; 8];
        match getrandom::fill(&mut bytes) {
            Ok(()) => Self::new(u64::from_le_bytes(bytes)),
            Err(e) => {
                warn!("No entropy source ({}), using fixed jitter seed", e);
                Self::new(Self::FALLBACK_SEED)
            }
        }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl JitterSource for XorShift64 {
    fn next_unit(&mut self) -> f32 {
        // Top 24 bits fill an f32 mantissa exactly
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }
}

/// Replays a fixed list of values, cycling when exhausted
#[derive(Debug, Clone)]
pub struct SequenceJitter {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceJitter {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Always returns `value`
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl JitterSource for SequenceJitter {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.5;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value.clamp(0.0, 0.999_999)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xorshift_unit_range() {
        let mut rng = XorShift64::new(42);
        for _ in 0..10_000 {
            let v = rng.next_unit();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_xorshift_is_deterministic() {
        let mut a = XorShift64::new(7);
        let mut b = XorShift64::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_zero_seed_does_not_stall() {
        let mut rng = XorShift64::new(0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn test_next_index_bounds() {
        let mut rng = SequenceJitter::new(vec![0.0, 0.5, 0.999_999]);
        assert_eq!(rng.next_index(6), 0);
        assert_eq!(rng.next_index(6), 3);
        assert_eq!(rng.next_index(6), 5);
    }

    #[test]
    fn test_signed_range() {
        let mut rng = SequenceJitter::new(vec![0.0, 0.5]);
        assert_eq!(rng.next_signed(), -1.0);
        assert_eq!(rng.next_signed(), 0.0);
    }
}
