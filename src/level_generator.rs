//! Skiplists use a probabilistic distribution of nodes over the internal
//! levels, whereby the lowest level (level 0) contains all the nodes, and each
//! level $n > 0$ will contain a random subset of the nodes on level `n - 1`.
//!
//! The default policy is a coin flip repeated per level: a node reaching level
//! $n$ is promoted to level $n + 1$ with probability $p$, so the chance that a
//! node occupies level $n$ is $p^n$, truncated at the maximum level.
//!
//! Custom level generators can be implemented, which is mostly useful to make
//! the shape of a list fully deterministic in tests.

pub mod geometric;

pub use geometric::{Geometric, GeometricError};

/// Default highest level a node may be assigned.
pub const DEFAULT_MAX_LEVEL: usize = 16;

/// Default probability that a node is promoted to the next level.
pub const DEFAULT_P: f64 = 0.5;

/// Upon the insertion of a new node in the list, the node is replicated to high
/// levels with a certain probability as determined by a [`LevelGenerator`].
pub trait LevelGenerator {
    /// The total number of levels that are assumed to exist.
    ///
    /// This is one more than the highest level which can be generated.
    #[must_use]
    fn total(&self) -> usize;

    /// Generate a random level for a new node in the range `[0, total)`.
    ///
    /// This function should _never_ return a level greater or equal to
    /// [`total`][LevelGenerator::total].
    #[must_use]
    fn level(&mut self) -> usize;
}

