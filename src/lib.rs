//! A skiplist is a way of storing elements in such a way that elements can be efficiently
//! searched, inserted and removed, all in `O(log(n))` on average.
//!
//! Conceptually, a skiplist resembles something like:
//!
//! ```text
//! <head> ----------> [2] --------------------------------------------------> [9] ---------->
//! <head> ----------> [2] ------------------------------------[7] ----------> [9] ---------->
//! <head> ----------> [2] ----------> [4] ------------------> [7] ----------> [9] --> [10] ->
//! <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10] ->
//! ```
//!
//! where we each node `[x]` has references to nodes further down the list, allowing the algorithm
//! to effectively skip ahead.
//!
//! This crate provides [`SkipSet`], an ordered set of unique `i64` keys. The height of each node
//! is drawn when it is inserted by a [`LevelGenerator`]; the default [`Geometric`] generator
//! promotes a node one level at a time with probability $p$, up to a maximum level.
//!
//! ```
//! use skipset::SkipSet;
//!
//! let mut skipset = SkipSet::new();
//! skipset.extend([3, 6, 7, 9, 12, 19, 17, 26, 21, 25]);
//! assert!(skipset.search(19));
//! assert!(!skipset.search(15));
//!
//! skipset.delete(17);
//! assert_eq!(
//!     skipset.iter().collect::<Vec<_>>(),
//!     vec![3, 6, 7, 9, 12, 19, 21, 25, 26],
//! );
//! ```

pub mod level_generator;
mod skipnode;
pub mod skipset;

pub use level_generator::{
    DEFAULT_MAX_LEVEL, DEFAULT_P, Geometric, GeometricError, LevelGenerator,
};
pub use skipset::{InvariantError, Iter, SkipSet};
