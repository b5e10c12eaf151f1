//! Deterministic seeded pseudo-random generator.
//!
//! Every widget that needs reproducible randomness (blob outlines, horoscope
//! readings, dice) draws from a [`Generator`] built here. The same [`Seed`]
//! always yields the same stream of floats on every platform.
//!
//! ## Stability
//!
//! The hash and step constants below are part of the public contract. Any
//! change to them alters the output for every existing seed, so a blob or
//! reading a user saved under a seed would silently change shape.
//!
//! ```
//! use tidbit::seed::{Generator, Seed};
//!
//! let mut a = Generator::new(Seed::from_text("hello"));
//! let mut b = Generator::new(Seed::from_text("hello"));
//! assert_eq!(a.next_f64(), b.next_f64());
//! ```

use std::fmt;
use std::str::FromStr;

/// Initial accumulator for [`derive_seed`], xored with the input length.
const HASH_INIT: u32 = 1_779_033_703;
/// Per-code-unit multiplier for [`derive_seed`].
const HASH_MUL: u32 = 3_432_918_353;
/// Finalizer multipliers for [`derive_seed`].
const AVALANCHE_MUL_1: u32 = 2_246_822_507;
const AVALANCHE_MUL_2: u32 = 3_266_489_909;

/// Additive step applied to the generator state on every draw.
const STEP: u32 = 0x6D2B_79F5;

/// 2^32, the divisor mapping a `u32` into [0, 1).
const U32_RANGE: f64 = 4_294_967_296.0;

/// A 32-bit seed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Seed(pub u32);

impl Seed {
    /// Derive a seed by hashing arbitrary text. See [`derive_seed`].
    pub fn from_text(text: &str) -> Self {
        derive_seed(text)
    }

    /// Interpret a host-supplied seed string.
    ///
    /// Decimal integers that fit in 32 bits are used directly; anything else
    /// (including the empty string) is hashed with [`derive_seed`].
    ///
    /// ```
    /// use tidbit::seed::Seed;
    ///
    /// assert_eq!(Seed::parse("42"), Seed(42));
    /// assert_eq!(Seed::parse("forty-two"), Seed::from_text("forty-two"));
    /// ```
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<u32>() {
            Ok(n) if !trimmed.starts_with('+') => Seed(n),
            _ => derive_seed(input),
        }
    }
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Seed(value)
    }
}

impl FromStr for Seed {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Seed::parse(s))
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hash text into a [`Seed`].
///
/// Mixes each UTF-16 code unit into a 32-bit accumulator with a
/// multiply-and-rotate step, then finishes with an xor-shift/multiply
/// avalanche. Code units (not bytes or chars) are hashed so that seeds agree
/// with the browser hosts, which see strings as UTF-16.
///
/// Never fails; the empty string has a well-defined seed.
pub fn derive_seed(text: &str) -> Seed {
    let len = text.encode_utf16().count() as u32;
    let mut h = HASH_INIT ^ len;
    for unit in text.encode_utf16() {
        h = (h ^ u32::from(unit)).wrapping_mul(HASH_MUL);
        h = h.rotate_left(13);
    }

    h = (h ^ (h >> 16)).wrapping_mul(AVALANCHE_MUL_1);
    h = (h ^ (h >> 13)).wrapping_mul(AVALANCHE_MUL_2);
    h ^= h >> 16;
    Seed(h)
}

/// Reproducible pseudo-random stream over one 32-bit word of state.
///
/// A generator is owned by whoever created it. Two logical draws (two blobs,
/// two readings) must each build their own generator; interleaving calls on
/// a shared one changes both outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    state: u32,
}

impl Generator {
    /// Create a generator whose initial state is the seed.
    pub fn new(seed: impl Into<Seed>) -> Self {
        Self {
            state: seed.into().0,
        }
    }

    /// Advance the state and return the next raw 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(STEP);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next float in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / U32_RANGE
    }

    /// Next float in [lo, hi). Consumes exactly one draw.
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Next integer in `lo..=hi`. Consumes exactly one draw.
    ///
    /// Returns `lo` when `hi < lo`.
    pub fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        let u = self.next_f64();
        if hi <= lo {
            return lo;
        }
        let span = f64::from(hi - lo) + 1.0;
        lo + (u * span) as u32
    }

    /// Pick one element uniformly. Consumes one draw even when empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        let u = self.next_f64();
        items.get((u * items.len() as f64) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn first_draws(seed: u32, n: usize) -> Vec<f64> {
        let mut g = Generator::new(seed);
        (0..n).map(|_| g.next_f64()).collect()
    }

    #[test]
    fn test_same_seed_same_stream() {
        assert_eq!(first_draws(7, 32), first_draws(7, 32));
    }

    #[test]
    fn test_adjacent_seeds_differ() {
        for seed in [0u32, 1, 41, 1_000, u32::MAX - 1] {
            assert_ne!(first_draws(seed, 10), first_draws(seed.wrapping_add(1), 10));
        }
    }

    #[test]
    fn test_range_bound_100k_draws() {
        let mut g = Generator::new(derive_seed("range"));
        for _ in 0..100_000 {
            let x = g.next_f64();
            assert!((0.0..1.0).contains(&x), "draw out of range: {x}");
        }
    }

    #[test]
    fn test_known_values_are_stable() {
        // Pinned outputs; these must never change.
        let mut g = Generator::new(Seed(0));
        assert_eq!(g.next_u32(), 1_144_304_738);
        assert_eq!(g.next_u32(), 1_416_247);
    }

    #[test]
    fn test_derive_seed_pinned() {
        assert_eq!(derive_seed(""), Seed(167_010_153));
        assert_eq!(derive_seed("hello"), Seed(3_588_693_721));
        assert_ne!(derive_seed(""), derive_seed(" "));
    }

    #[test]
    fn test_derive_seed_order_sensitive() {
        assert_ne!(derive_seed("ab"), derive_seed("ba"));
    }

    #[test]
    fn test_derive_seed_uses_utf16_units() {
        // Astral characters are two code units; must still hash deterministically.
        assert_eq!(derive_seed("🎲"), derive_seed("🎲"));
        assert_ne!(derive_seed("🎲"), derive_seed("🎳"));
    }

    #[test]
    fn test_seed_parse() {
        assert_eq!(Seed::parse("123"), Seed(123));
        assert_eq!(Seed::parse(" 9 "), Seed(9));
        assert_eq!(Seed::parse("4294967296"), derive_seed("4294967296"));
        assert_eq!(Seed::parse("-1"), derive_seed("-1"));
        assert_eq!(Seed::parse("+1"), derive_seed("+1"));
        assert_eq!(Seed::parse(""), derive_seed(""));
    }

    #[test]
    fn test_clone_forks_stream() {
        let mut a = Generator::new(5u32);
        a.next_f64();
        let mut b = a.clone();
        assert_eq!(a.next_f64(), b.next_f64());
    }

    #[test]
    fn test_range_u32_inclusive() {
        let mut g = Generator::new(3u32);
        let mut seen = [false; 6];
        for _ in 0..1_000 {
            let v = g.range_u32(1, 6);
            assert!((1..=6).contains(&v));
            seen[(v - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(g.range_u32(4, 2), 4);
    }

    #[test]
    fn test_pick_empty() {
        let mut g = Generator::new(1u32);
        let empty: [u8; 0] = [];
        assert_eq!(g.pick(&empty), None);
        assert_eq!(g.pick(&[9]), Some(&9));
    }

    proptest! {
        #[test]
        fn prop_next_in_unit_interval(seed in any::<u32>()) {
            let mut g = Generator::new(seed);
            for _ in 0..256 {
                let x = g.next_f64();
                prop_assert!((0.0..1.0).contains(&x));
            }
        }

        #[test]
        fn prop_text_seed_reproducible(text in ".*") {
            prop_assert_eq!(derive_seed(&text), derive_seed(&text));
        }
    }
}
