//! Node shapes of a priority search pennant.
//!
//! A pennant is a [`Winner`]: the entry with the smallest priority in its
//! subtree, a link to the remaining entries (the losers) and the largest key
//! of the subtree. The losers form a weight-balanced search tree whose
//! internal nodes carry `split` keys: keys `<= split` live on the left, keys
//! `> split` on the right.

use super::super::ReferenceCounter;

/// Shared, optional link to a loser subtree.
pub(crate) type Link<K, P> = Option<ReferenceCounter<Loser<K, P>>>;

/// Root of a pennant.
#[derive(Clone)]
pub(crate) struct Winner<K, P> {
    pub(crate) key: K,
    pub(crate) priority: P,
    pub(crate) losers: Link<K, P>,
    /// Largest key of the pennant, winner included.
    pub(crate) ubound: K,
}

impl<K: Clone, P> Winner<K, P> {
    /// A pennant holding one entry.
    pub(crate) fn singleton(key: K, priority: P) -> Self {
        Self {
            ubound: key.clone(),
            key,
            priority,
            losers: None,
        }
    }
}

impl<K, P> Winner<K, P> {
    /// Number of entries in the pennant.
    pub(crate) fn count(&self) -> usize {
        size(self.losers.as_ref()) + 1
    }
}

/// An entry that lost a priority comparison, kept in key order.
pub(crate) struct Loser<K, P> {
    pub(crate) key: K,
    pub(crate) priority: P,
    pub(crate) left: Link<K, P>,
    pub(crate) split: K,
    pub(crate) right: Link<K, P>,
    pub(crate) size: usize,
}

impl<K, P> Loser<K, P> {
    /// Allocates a loser node, deriving its size from its children.
    pub(crate) fn new(
        key: K,
        priority: P,
        left: Link<K, P>,
        split: K,
        right: Link<K, P>,
    ) -> ReferenceCounter<Self> {
        let size = 1 + size(left.as_ref()) + size(right.as_ref());
        ReferenceCounter::new(Self {
            key,
            priority,
            left,
            split,
            right,
            size,
        })
    }
}

/// Size of an optional loser subtree.
#[inline]
pub(crate) fn size<K, P>(link: Option<&ReferenceCounter<Loser<K, P>>>) -> usize {
    link.map_or(0, |loser| loser.size)
}
