//! An ordered set of integer keys stored in a skiplist.

use std::{fmt, hash, hash::Hash, iter};

use thiserror::Error;
use tracing::trace;

use crate::{
    level_generator::{Geometric, GeometricError, LevelGenerator},
    skipnode::{HEAD, SkipNode},
};

// ////////////////////////////////////////////////////////////////////////////
// SkipSet
// ////////////////////////////////////////////////////////////////////////////

/// SkipSet stores unique `i64` keys in ascending order and provides `O(log n)`
/// expected-time search, insertion and deletion.
///
/// All nodes live in an arena owned by the set. Level 0 links every key in
/// order; each higher level links a random subset of the level below it, as
/// decided by the set's [`LevelGenerator`] when a key is inserted.
///
/// The set has no internal synchronisation: mutation takes `&mut self`, and
/// callers sharing one across threads must wrap it in a lock.
pub struct SkipSet<G = Geometric> {
    // Arena of nodes; `nodes[HEAD]` is the header and is never freed.
    nodes: Vec<SkipNode>,
    // Arena slots released by `delete`, reused by later insertions.
    free: Vec<usize>,
    // Highest level with at least one node, or 0 when empty.
    level: usize,
    len: usize,
    level_generator: G,
}

/// A structural invariant of a [`SkipSet`] that [`SkipSet::check`] found to be
/// violated.
#[derive(Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvariantError {
    /// Keys along a level are not strictly ascending.
    #[error("level {level} is not strictly ascending: {prev} is followed by {next}.")]
    Unsorted {
        /// The offending level.
        level: usize,
        /// The earlier key.
        prev: i64,
        /// The key following it.
        next: i64,
    },
    /// A node is linked at a level above its own height.
    #[error("key {key} is linked at level {level} but only reaches level {height}.")]
    TooShort {
        /// The offending key.
        key: i64,
        /// The level it was found on.
        level: usize,
        /// The node's own level.
        height: usize,
    },
    /// A node present at some level is missing from the level below.
    #[error("key {key} is linked at level {level} but not at level {below}.")]
    NotMonotone {
        /// The offending key.
        key: i64,
        /// The level it was found on.
        level: usize,
        /// The lower level it is missing from.
        below: usize,
    },
    /// A level does not terminate.
    #[error("level {level} contains a cycle.")]
    Cycle {
        /// The offending level.
        level: usize,
    },
    /// The active level disagrees with the highest populated level.
    #[error("active level is {level} but the highest populated level is {populated}.")]
    StaleLevel {
        /// The recorded active level.
        level: usize,
        /// The highest level with at least one node.
        populated: usize,
    },
    /// The recorded length disagrees with the number of keys on level 0.
    #[error("length is {len} but level 0 holds {counted} keys.")]
    LengthMismatch {
        /// The recorded length.
        len: usize,
        /// The number of keys on level 0.
        counted: usize,
    },
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl SkipSet<Geometric> {
    /// Create a new skipset with the default maximum level of 16 and a
    /// promotion probability of 0.5.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let skipset = SkipSet::new();
    /// assert!(skipset.is_empty());
    /// assert_eq!(skipset.max_level(), 16);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_level_generator(Geometric::default())
    }

    /// Create a new skipset whose nodes reach at most `max_level`, each node
    /// being promoted to the next level with probability `p`.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_level` is zero or if `p` is not strictly
    /// between 0 and 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::{GeometricError, SkipSet};
    ///
    /// let skipset = SkipSet::with_config(8, 0.25).unwrap();
    /// assert_eq!(skipset.max_level(), 8);
    ///
    /// assert_eq!(SkipSet::with_config(0, 0.5).err(), Some(GeometricError::ZeroMax));
    /// ```
    #[inline]
    pub fn with_config(max_level: usize, p: f64) -> Result<Self, GeometricError> {
        Ok(Self::with_level_generator(Geometric::new(max_level, p)?))
    }

    /// Same as [`with_config`][SkipSet::with_config], but the levels assigned
    /// to new nodes are fully determined by `seed`.
    ///
    /// # Errors
    ///
    /// Same as [`with_config`][SkipSet::with_config].
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut a = SkipSet::seeded(16, 0.5, 7).unwrap();
    /// let mut b = SkipSet::seeded(16, 0.5, 7).unwrap();
    /// a.extend(0..100);
    /// b.extend(0..100);
    /// assert_eq!(a.display(), b.display());
    /// ```
    #[inline]
    pub fn seeded(max_level: usize, p: f64, seed: u64) -> Result<Self, GeometricError> {
        Ok(Self::with_level_generator(Geometric::seeded(
            max_level, p, seed,
        )?))
    }
}

impl<G: LevelGenerator> SkipSet<G> {
    /// Create a new skipset which uses `level_generator` to assign levels to
    /// new nodes.
    ///
    /// The header spans [`LevelGenerator::total`] levels. Levels generated
    /// beyond that are capped to the highest level.
    #[inline]
    pub fn with_level_generator(level_generator: G) -> Self {
        let total = level_generator.total().max(1);
        SkipSet {
            nodes: vec![SkipNode::head(total)],
            free: Vec::new(),
            level: 0,
            len: 0,
            level_generator,
        }
    }

    /// Insert `key` into the skipset.
    ///
    /// Returns `true` if the key was not present before. Inserting a key which
    /// is already present leaves the skipset untouched and returns `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut skipset = SkipSet::new();
    /// assert!(skipset.insert(3));
    /// assert!(!skipset.insert(3));
    /// assert_eq!(skipset.len(), 1);
    /// ```
    pub fn insert(&mut self, key: i64) -> bool {
        // Entries above the active level already point at the header, which is
        // the predecessor for any level a taller node newly activates.
        let update = self.predecessors(key);
        if self.next_key(update[0], 0) == Some(key) {
            return false;
        }

        let new_level = self.level_generator.level().min(self.max_level());
        if new_level > self.level {
            trace!(from = self.level, to = new_level, key, "raising active level");
            self.level = new_level;
        }

        let index = self.allocate(SkipNode::new(key, new_level));
        for (lvl, &pred) in update.iter().enumerate().take(new_level + 1) {
            self.nodes[index].forward[lvl] = self.nodes[pred].forward[lvl];
            self.nodes[pred].forward[lvl] = Some(index);
        }
        self.len += 1;
        true
    }

    /// Remove `key` from the skipset.
    ///
    /// Returns `true` if the key was present. Removing an absent key is a
    /// no-op and returns `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut skipset: SkipSet = (0..10).collect();
    /// assert!(skipset.delete(4));
    /// assert!(!skipset.delete(4));
    /// assert!(!skipset.search(4));
    /// assert_eq!(skipset.len(), 9);
    /// ```
    pub fn delete(&mut self, key: i64) -> bool {
        let update = self.predecessors(key);
        let Some(target) = self.nodes[update[0]].forward[0].filter(|&n| self.nodes[n].key == key)
        else {
            return false;
        };

        // The target occupies levels 0..=height contiguously, so the first
        // predecessor not pointing at it means no higher level does either.
        // This relies on no other mutation interleaving with the walk above.
        for (lvl, &pred) in update.iter().enumerate().take(self.level + 1) {
            if self.nodes[pred].forward[lvl] != Some(target) {
                break;
            }
            self.nodes[pred].forward[lvl] = self.nodes[target].forward[lvl];
        }
        self.release(target);
        self.len -= 1;

        let before = self.level;
        while self.level > 0 && self.nodes[HEAD].forward[self.level].is_none() {
            self.level -= 1;
        }
        if self.level != before {
            trace!(from = before, to = self.level, key, "lowering active level");
        }
        true
    }
}

impl<G> SkipSet<G> {
    /// Returns `true` if the skipset contains `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let skipset: SkipSet = [3, 6, 7, 9, 12, 19, 17, 26, 21, 25].into_iter().collect();
    /// assert!(skipset.search(19));
    /// assert!(!skipset.search(15));
    /// ```
    #[must_use]
    pub fn search(&self, key: i64) -> bool {
        let mut current = HEAD;
        for lvl in (0..=self.level).rev() {
            current = self.advance(current, lvl, key);
        }
        self.next_key(current, 0) == Some(key)
    }

    /// Returns `true` if the skipset contains `key`.
    ///
    /// Same as [`search`][SkipSet::search], spelt the way the standard
    /// collections spell it.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &i64) -> bool {
        self.search(*key)
    }

    /// Returns the keys of every active level, from the highest level down to
    /// level 0.
    ///
    /// Level 0 always holds every key in ascending order; an empty skipset
    /// yields a single, empty level 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut skipset = SkipSet::new();
    /// assert_eq!(skipset.display(), vec![(0, vec![])]);
    ///
    /// skipset.extend([3, 1, 2]);
    /// let levels = skipset.display();
    /// assert_eq!(levels.last(), Some(&(0, vec![1, 2, 3])));
    /// ```
    #[must_use]
    pub fn display(&self) -> Vec<(usize, Vec<i64>)> {
        (0..=self.level)
            .rev()
            .map(|lvl| (lvl, self.level_keys(lvl).collect()))
            .collect()
    }

    /// Returns the number of keys in the skipset.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the skipset contains no keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut skipset = SkipSet::new();
    /// assert!(skipset.is_empty());
    ///
    /// skipset.insert(1);
    /// assert!(!skipset.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes[HEAD].forward[0].is_none()
    }

    /// The highest level which currently holds at least one node, or 0 if the
    /// skipset is empty.
    #[inline]
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// The highest level any node can be assigned.
    #[inline]
    #[must_use]
    pub fn max_level(&self) -> usize {
        self.nodes[HEAD].level()
    }

    /// Returns the smallest key, or `None` if the skipset is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut skipset = SkipSet::new();
    /// assert_eq!(skipset.first(), None);
    /// skipset.extend([5, 2, 9]);
    /// assert_eq!(skipset.first(), Some(2));
    /// ```
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<i64> {
        self.next_key(HEAD, 0)
    }

    /// Returns the largest key, or `None` if the skipset is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut skipset = SkipSet::new();
    /// assert_eq!(skipset.last(), None);
    /// skipset.extend([5, 2, 9]);
    /// assert_eq!(skipset.last(), Some(9));
    /// ```
    #[must_use]
    pub fn last(&self) -> Option<i64> {
        let mut current = HEAD;
        for lvl in (0..=self.level).rev() {
            while let Some(next) = self.nodes[current].forward[lvl] {
                current = next;
            }
        }
        (current != HEAD).then(|| self.nodes[current].key)
    }

    /// Removes every key from the skipset.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut skipset: SkipSet = (0..10).collect();
    /// skipset.clear();
    /// assert!(skipset.is_empty());
    /// assert_eq!(skipset.level(), 0);
    /// ```
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[HEAD].forward.fill(None);
        self.free.clear();
        self.level = 0;
        self.len = 0;
    }

    /// Creates an iterator over the keys of the skipset, in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let skipset: SkipSet = [3, 1, 2].into_iter().collect();
    /// assert_eq!(skipset.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            nodes: &self.nodes,
            next: self.nodes[HEAD].forward[0],
            remaining: self.len,
        }
    }

    /// Checks the structural invariants of the skipset.
    ///
    /// Every level must be strictly ascending and terminate, every node linked
    /// at a level must also be linked at all levels below it, the active level
    /// must be the highest populated level, and the length must match the
    /// number of keys on level 0.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant found.
    pub fn check(&self) -> Result<(), InvariantError> {
        let mut below: Option<Vec<usize>> = None;
        let mut populated = 0;

        for lvl in 0..=self.max_level() {
            let mut members = Vec::new();
            let mut current = HEAD;
            while let Some(next) = self.nodes[current].forward[lvl] {
                if members.len() >= self.nodes.len() {
                    return Err(InvariantError::Cycle { level: lvl });
                }
                let node = &self.nodes[next];
                if node.forward.len() <= lvl {
                    return Err(InvariantError::TooShort {
                        key: node.key,
                        level: lvl,
                        height: node.level(),
                    });
                }
                if current != HEAD && self.nodes[current].key >= node.key {
                    return Err(InvariantError::Unsorted {
                        level: lvl,
                        prev: self.nodes[current].key,
                        next: node.key,
                    });
                }
                members.push(next);
                current = next;
            }

            match &below {
                None => {
                    if members.len() != self.len {
                        return Err(InvariantError::LengthMismatch {
                            len: self.len,
                            counted: members.len(),
                        });
                    }
                }
                Some(lower) => {
                    // Both levels are sorted, so containment is a merge walk.
                    let mut lower_iter = lower.iter().peekable();
                    for &member in &members {
                        let key = self.nodes[member].key;
                        while lower_iter
                            .next_if(|&&n| n != member && self.nodes[n].key < key)
                            .is_some()
                        {}
                        if lower_iter.next_if_eq(&&member).is_none() {
                            return Err(InvariantError::NotMonotone {
                                key,
                                level: lvl,
                                below: lvl - 1,
                            });
                        }
                    }
                }
            }

            if !members.is_empty() {
                populated = lvl;
            }
            below = Some(members);
        }

        if populated != self.level {
            return Err(InvariantError::StaleLevel {
                level: self.level,
                populated,
            });
        }
        Ok(())
    }
}

// ///////////////////////////////////////////////
// Internal methods
// ///////////////////////////////////////////////

impl<G> SkipSet<G> {
    /// Starting from `current`, moves along level `lvl` for as long as the
    /// next key is strictly less than `key`, and returns the last node
    /// reached.
    #[inline]
    fn advance(&self, mut current: usize, lvl: usize, key: i64) -> usize {
        while let Some(next) = self.nodes[current].forward[lvl] {
            if self.nodes[next].key < key {
                current = next;
            } else {
                break;
            }
        }
        current
    }

    /// Walks down from the active level towards `key`, recording for each
    /// level the last node whose key is less than `key`.
    ///
    /// The result spans every level of the header; levels above the active
    /// level are recorded as the header.
    fn predecessors(&self, key: i64) -> Vec<usize> {
        let mut update = vec![HEAD; self.nodes[HEAD].forward.len()];
        let mut current = HEAD;
        for lvl in (0..=self.level).rev() {
            current = self.advance(current, lvl, key);
            update[lvl] = current;
        }
        update
    }

    /// The key following `node` on level `lvl`.
    #[inline]
    fn next_key(&self, node: usize, lvl: usize) -> Option<i64> {
        self.nodes[node].forward[lvl].map(|next| self.nodes[next].key)
    }

    /// The keys linked on level `lvl`, in order.
    fn level_keys(&self, lvl: usize) -> impl Iterator<Item = i64> + '_ {
        iter::successors(self.nodes[HEAD].forward[lvl], move |&n| {
            self.nodes[n].forward.get(lvl).copied().flatten()
        })
        .map(|n| self.nodes[n].key)
    }

    /// Stores `node` in the arena, reusing a released slot when available.
    fn allocate(&mut self, node: SkipNode) -> usize {
        if let Some(index) = self.free.pop() {
            self.nodes[index] = node;
            index
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    /// Returns the slot of an unlinked node to the arena.
    fn release(&mut self, index: usize) {
        if self.len == 1 {
            // Last key: nothing else is referenced, so drop every slot.
            self.nodes.truncate(1);
            self.free.clear();
        } else {
            self.nodes[index].forward = Vec::new();
            self.free.push(index);
        }
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl Default for SkipSet<Geometric> {
    #[inline]
    fn default() -> Self {
        SkipSet::new()
    }
}

/// Two skipsets are equal if they hold the same keys, regardless of the shape
/// of their levels.
impl<A, B> PartialEq<SkipSet<B>> for SkipSet<A> {
    #[inline]
    fn eq(&self, other: &SkipSet<B>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<G> Eq for SkipSet<G> {}

impl<G> Hash for SkipSet<G> {
    #[inline]
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        for key in self {
            key.hash(state);
        }
    }
}

impl<G: LevelGenerator> Extend<i64> for SkipSet<G> {
    #[inline]
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iterable: I) {
        for key in iterable {
            self.insert(key);
        }
    }
}

impl FromIterator<i64> for SkipSet<Geometric> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut skipset = SkipSet::new();
        skipset.extend(iter);
        skipset
    }
}

impl<'a, G> IntoIterator for &'a SkipSet<G> {
    type Item = i64;
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl<G> fmt::Debug for SkipSet<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Draws every active level, from the highest down to level 0, one per line:
///
/// ```text
/// Level 1: 6 -> 19 -> None
/// Level 0: 3 -> 6 -> 7 -> 19 -> None
/// ```
impl<G> fmt::Display for SkipSet<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (lvl, keys)) in self.display().into_iter().enumerate() {
            if i != 0 {
                writeln!(f)?;
            }
            write!(f, "Level {lvl}: ")?;
            for key in keys {
                write!(f, "{key} -> ")?;
            }
            write!(f, "None")?;
        }
        Ok(())
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Iterator
// ////////////////////////////////////////////////////////////////////////////

/// An iterator over the keys of a [`SkipSet`], in ascending order.
#[derive(Clone)]
pub struct Iter<'a> {
    nodes: &'a [SkipNode],
    next: Option<usize>,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = i64;

    #[inline]
    fn next(&mut self) -> Option<i64> {
        let node = &self.nodes[self.next?];
        self.next = node.forward[0];
        self.remaining -= 1;
        Some(node.key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl iter::FusedIterator for Iter<'_> {}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////
