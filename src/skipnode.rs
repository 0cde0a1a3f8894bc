// ////////////////////////////////////////////////////////////////////////////
// SkipNode
// ////////////////////////////////////////////////////////////////////////////

/// Index of the header node within the arena.
pub(crate) const HEAD: usize = 0;

/// SkipNodes make up the SkipSet. All nodes live in an arena owned by the
/// set, with the header (which holds no key) at index [`HEAD`].
///
/// The node has a level which corresponds to how 'high' the node reaches. A
/// node of level n has (n + 1) links to next nodes, stored as arena indices in
/// `forward`. A link of `None` marks the end of that level.
///
/// Links are non-owning: removing a node only requires rewriting the links of
/// its predecessors and returning its slot to the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SkipNode {
    // Meaningless for the header node, which is never compared.
    pub key: i64,
    // Vector of links to the next node at the respective level.  This vector
    // *must* be of length `level + 1` and is never resized once linked.
    pub forward: Vec<Option<usize>>,
}

impl SkipNode {
    /// Create a new header node spanning `total_levels` levels.
    pub fn head(total_levels: usize) -> Self {
        SkipNode {
            key: i64::MIN,
            forward: vec![None; total_levels],
        }
    }

    /// Create a new unlinked node holding `key` and reaching up to `level`.
    pub fn new(key: i64, level: usize) -> Self {
        SkipNode {
            key,
            forward: vec![None; level + 1],
        }
    }

    /// The highest level this node participates in.
    #[inline]
    pub fn level(&self) -> usize {
        self.forward.len().saturating_sub(1)
    }
}
