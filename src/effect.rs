//! Screen-wide transitions and the shared fizzle permutation.

use std::sync::OnceLock;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::bitmap::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    FadeIn,
    FadeOut,
    FizzleOut,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    pub color: Color,
    pub duration: f64,
    pub time: f64,
}

impl Effect {
    pub fn new(kind: EffectKind, color: Color, duration: f64) -> Self {
        Self {
            kind,
            color,
            duration,
            time: 0.0,
        }
    }

    /// Fraction of the effect played so far, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.time / self.duration).min(1.0)
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.time >= self.duration
    }
}

pub const FIZZLE_CELLS: usize = 10_000;
pub const DEFAULT_FIZZLE_SEED: u64 = 0x5eed_f122;

static FIZZLE: OnceLock<FizzleTable> = OnceLock::new();

/// A fixed random permutation of cell indices. A cell dissolves once the
/// effect's progress passes its position in the permutation, so the pattern
/// is stable from frame to frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FizzleTable {
    order: Vec<usize>,
}

impl FizzleTable {
    pub fn new(seed: u64) -> Self {
        let mut order: Vec<usize> = (0..FIZZLE_CELLS).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);
        Self { order }
    }

    /// Initializes the process-wide table. Only the first call's seed is
    /// used; later calls return the existing table.
    pub fn install(seed: u64) -> &'static FizzleTable {
        FIZZLE.get_or_init(|| {
            tracing::debug!(seed, "fizzle table initialized");
            FizzleTable::new(seed)
        })
    }

    pub fn global() -> &'static FizzleTable {
        Self::install(DEFAULT_FIZZLE_SEED)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    pub fn threshold_of(&self, cell: usize) -> usize {
        self.order[cell % self.order.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped() {
        let mut effect = Effect::new(EffectKind::FadeIn, Color::RED, 2.0);
        assert_eq!(effect.progress(), 0.0);
        effect.time = 1.0;
        assert_eq!(effect.progress(), 0.5);
        effect.time = 5.0;
        assert_eq!(effect.progress(), 1.0);
        assert!(effect.is_completed());
    }

    #[test]
    fn fizzle_table_is_a_seeded_permutation() {
        let a = FizzleTable::new(7);
        let b = FizzleTable::new(7);
        assert_eq!(a, b);
        let mut sorted = a.order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..FIZZLE_CELLS).collect::<Vec<_>>());
        assert_ne!(a, FizzleTable::new(8));
    }
}
