//! Geometric level generator.

use rand::prelude::*;
use thiserror::Error;

use crate::level_generator::{DEFAULT_MAX_LEVEL, DEFAULT_P, LevelGenerator};

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating a [`Geometric`] level generator.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum GeometricError {
    /// The maximum level must be non-zero.
    #[error("max level must be non-zero.")]
    ZeroMax,
    /// The maximum level must be less than `i32::MAX`.
    #[error("max level must be less than i32::MAX.")]
    MaxTooLarge,
    /// The probability `$p$` must be in the range `$(0, 1)$`.
    #[error("p must be in (0, 1).")]
    InvalidProbability,
}

/// A level generator using a geometric distribution.
///
/// Every new node starts at level 0 and is promoted one level at a time, each
/// promotion succeeding independently with probability `$p$`. Promotion stops
/// at the first failed trial or once the node reaches `max_level`, so
/// `$P(\text{level} \geq k) = p^k$` for `$k \leq \text{max\_level}$`.
#[derive(Debug)]
pub struct Geometric {
    /// The highest level that can be generated.
    max_level: usize,
    /// The probability that a node is present in the next level.
    p: f64,
    /// The random number generator.
    rng: SmallRng,
}

impl Geometric {
    /// Create a new geometric level generator producing levels in
    /// `[0, max_level]`, and `p` as the probability that a given node is
    /// present in the next level.
    ///
    /// The generator is seeded from the thread-local RNG; see
    /// [`seeded`][Geometric::seeded] for a reproducible sequence.
    ///
    /// # Errors
    ///
    /// `p` must be strictly between 0 and 1, and `max_level` must be at least
    /// 1.
    #[inline]
    pub fn new(max_level: usize, p: f64) -> Result<Self, GeometricError> {
        Self::validate(max_level, p)?;
        Ok(Self::from_parts(
            max_level,
            p,
            SmallRng::from_rng(&mut rand::rng()),
        ))
    }

    /// Create a new geometric level generator whose sequence of levels is
    /// fully determined by `seed`.
    ///
    /// # Errors
    ///
    /// Same as [`new`][Geometric::new].
    #[inline]
    pub fn seeded(max_level: usize, p: f64, seed: u64) -> Result<Self, GeometricError> {
        Self::validate(max_level, p)?;
        Ok(Self::from_parts(max_level, p, SmallRng::seed_from_u64(seed)))
    }

    /// The highest level that can be generated.
    #[inline]
    #[must_use]
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// The probability that a node is promoted to the next level.
    #[inline]
    #[must_use]
    pub fn p(&self) -> f64 {
        self.p
    }

    fn validate(max_level: usize, p: f64) -> Result<(), GeometricError> {
        if max_level == 0 {
            return Err(GeometricError::ZeroMax);
        }
        if i32::try_from(max_level).is_err() {
            return Err(GeometricError::MaxTooLarge);
        }
        // Also rejects NaN.
        if !(0.0 < p && p < 1.0) {
            return Err(GeometricError::InvalidProbability);
        }
        Ok(())
    }

    fn from_parts(max_level: usize, p: f64, rng: SmallRng) -> Self {
        Geometric { max_level, p, rng }
    }
}

impl Default for Geometric {
    #[inline]
    fn default() -> Self {
        Self::from_parts(
            DEFAULT_MAX_LEVEL,
            DEFAULT_P,
            SmallRng::from_rng(&mut rand::rng()),
        )
    }
}

impl LevelGenerator for Geometric {
    #[inline]
    fn total(&self) -> usize {
        self.max_level + 1
    }

    #[inline]
    fn level(&mut self) -> usize {
        let mut level = 0;
        while level < self.max_level && self.rng.random::<f64>() < self.p {
            level += 1;
        }
        level
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, bail};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{Geometric, GeometricError, LevelGenerator};

    #[test]
    fn invalid_max() {
        assert_eq!(Geometric::new(0, 0.5).err(), Some(GeometricError::ZeroMax));
        assert_eq!(
            Geometric::seeded(0, 0.5, 1).err(),
            Some(GeometricError::ZeroMax)
        );
    }

    #[test]
    fn max_too_large() {
        let max = usize::try_from(i32::MAX).unwrap_or(usize::MAX) + 1;
        assert_eq!(
            Geometric::new(max, 0.5).err(),
            Some(GeometricError::MaxTooLarge)
        );
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(-0.5)]
    #[case(1.5)]
    #[case(f64::NAN)]
    fn invalid_p(#[case] p: f64) {
        assert_eq!(
            Geometric::new(1, p).err(),
            Some(GeometricError::InvalidProbability)
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            GeometricError::ZeroMax.to_string(),
            "max level must be non-zero."
        );
        assert_eq!(
            GeometricError::InvalidProbability.to_string(),
            "p must be in (0, 1)."
        );
    }

    #[test]
    fn default() {
        let generator = Geometric::default();
        assert_eq!(generator.max_level(), 16);
        assert_eq!(generator.total(), 17);
        assert_eq!(generator.p(), 0.5);
    }

    #[rstest]
    fn new(
        #[values(1, 2, 16, 128)] max_level: usize,
        #[values(0.1, 0.5, 0.99)] p: f64,
    ) -> Result<()> {
        let mut generator = Geometric::new(max_level, p)?;
        assert_eq!(generator.max_level(), max_level);
        assert_eq!(generator.total(), max_level + 1);
        for _ in 0..100_000 {
            let level = generator.level();
            assert!((0..=max_level).contains(&level));
        }

        // Make sure that we can produce at least one level-0 node.
        let mut found = false;
        for _ in 0..100_000 {
            if generator.level() == 0 {
                found = true;
                break;
            }
        }
        if !found {
            bail!("Failed to generate a level-0 node.");
        }

        Ok(())
    }

    #[test]
    fn reaches_max_level() -> Result<()> {
        let mut generator = Geometric::seeded(3, 0.9, 7)?;
        if !(0..100_000).any(|_| generator.level() == 3) {
            bail!("Failed to generate a level-3 node.");
        }
        Ok(())
    }

    #[test]
    fn seeded_is_reproducible() -> Result<()> {
        let mut a = Geometric::seeded(16, 0.5, 0x1234_abcd)?;
        let mut b = Geometric::seeded(16, 0.5, 0x1234_abcd)?;
        let a: Vec<_> = (0..1000).map(|_| a.level()).collect();
        let b: Vec<_> = (0..1000).map(|_| b.level()).collect();
        assert_eq!(a, b);
        Ok(())
    }

    #[rstest]
    #[case(0.25)]
    #[case(0.5)]
    #[case(0.75)]
    fn promotion_rate(#[case] p: f64) -> Result<()> {
        let samples = 200_000;
        let mut generator = Geometric::seeded(16, p, 42)?;
        let promoted = (0..samples).filter(|_| generator.level() >= 1).count();

        #[expect(
            clippy::as_conversions,
            clippy::cast_precision_loss,
            reason = "Sample counts are far below f64 precision"
        )]
        let rate = promoted as f64 / samples as f64;
        assert!((rate - p).abs() < 0.01, "rate {rate} too far from {p}");
        Ok(())
    }
}
