//! Lazy, pruned traversals in key order.
//!
//! Every key-ordered walk of the queue is a [`BoundedIterator`]: a stack of
//! pending pennants, a direction, an optional priority ceiling and a pair of
//! key bounds. A pennant is discarded as a whole when its winner fails the
//! ceiling or when its key range misses the bounds, so a query touching `k`
//! matching entries costs `O(log n + k)` rather than a full scan.
//!
//! Pennants are visited as borrowed [`View`]s: unplaying a view only decides
//! which of two entries owns each half, so no node is cloned or allocated.

use super::Orders;
use super::node::{Loser, Winner};
use crate::order::{Comparator, NaturalOrder};
use smallvec::SmallVec;
use std::iter::FusedIterator;
use std::ops::Bound;

/// Inline capacity of the pending stack; enough for a few million entries.
const INLINE_PENDING: usize = 32;

/// Order in which keys are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Ascending,
    Descending,
}

/// Upper limit on the priorities a traversal yields.
#[derive(Debug, Clone)]
pub(crate) struct PriorityCeiling<P> {
    pub(crate) priority: P,
    /// `true` admits priorities equal to the ceiling (`<=`), `false` only
    /// strictly smaller ones (`<`).
    pub(crate) inclusive: bool,
}

/// A pennant seen through references into the tree.
struct View<'a, K, P> {
    key: &'a K,
    priority: &'a P,
    losers: Option<&'a Loser<K, P>>,
}

impl<'a, K, P> View<'a, K, P> {
    fn of(winner: &'a Winner<K, P>) -> Self {
        Self {
            key: &winner.key,
            priority: &winner.priority,
            losers: winner.losers.as_deref(),
        }
    }

    fn count(&self) -> usize {
        self.losers.map_or(1, |loser| loser.size + 1)
    }
}

/// A lazy iterator over the entries of a
/// [`PersistentPrioritySearchQueue`](super::PersistentPrioritySearchQueue)
/// in key order, optionally restricted by a priority ceiling and a key
/// range.
///
/// Returned by [`iter`](super::PersistentPrioritySearchQueue::iter),
/// [`range`](super::PersistentPrioritySearchQueue::range),
/// [`at_most`](super::PersistentPrioritySearchQueue::at_most),
/// [`below`](super::PersistentPrioritySearchQueue::below) and their ranged
/// and reversed variants.
pub struct BoundedIterator<'a, K, P, KC = NaturalOrder, PC = NaturalOrder> {
    orders: &'a Orders<KC, PC>,
    pending: SmallVec<[View<'a, K, P>; INLINE_PENDING]>,
    /// Number of entries held by the pending pennants.
    upper: usize,
    direction: Direction,
    ceiling: Option<PriorityCeiling<P>>,
    low: Bound<K>,
    high: Bound<K>,
}

impl<'a, K, P, KC, PC> BoundedIterator<'a, K, P, KC, PC>
where
    KC: Comparator<K>,
    PC: Comparator<P>,
{
    pub(crate) fn new(
        orders: &'a Orders<KC, PC>,
        root: Option<&'a Winner<K, P>>,
        direction: Direction,
        ceiling: Option<PriorityCeiling<P>>,
        (low, high): (Bound<K>, Bound<K>),
    ) -> Self {
        let mut pending = SmallVec::new();
        let mut upper = 0;
        if let Some(root) = root {
            let view = View::of(root);
            upper = view.count();
            pending.push(view);
        }
        Self {
            orders,
            pending,
            upper,
            direction,
            ceiling,
            low,
            high,
        }
    }

    fn admits(&self, priority: &P) -> bool {
        self.ceiling.as_ref().is_none_or(|ceiling| {
            if ceiling.inclusive {
                self.orders
                    .priorities
                    .less_or_equal(priority, &ceiling.priority)
            } else {
                self.orders.priorities.less(priority, &ceiling.priority)
            }
        })
    }

    /// Whether every key `<= ubound` lies below the low bound.
    fn entirely_below(&self, ubound: &K) -> bool {
        match &self.low {
            Bound::Included(low) => self.orders.keys.less(ubound, low),
            Bound::Excluded(low) => self.orders.keys.less_or_equal(ubound, low),
            Bound::Unbounded => false,
        }
    }

    /// Whether every key `> split` lies above the high bound.
    fn entirely_above(&self, split: &K) -> bool {
        match &self.high {
            Bound::Included(high) | Bound::Excluded(high) => {
                self.orders.keys.less_or_equal(high, split)
            }
            Bound::Unbounded => false,
        }
    }

    fn contains(&self, key: &K) -> bool {
        let above_low = match &self.low {
            Bound::Included(low) => self.orders.keys.less_or_equal(low, key),
            Bound::Excluded(low) => self.orders.keys.less(low, key),
            Bound::Unbounded => true,
        };
        above_low
            && match &self.high {
                Bound::Included(high) => self.orders.keys.less_or_equal(key, high),
                Bound::Excluded(high) => self.orders.keys.less(key, high),
                Bound::Unbounded => true,
            }
    }

    fn is_unrestricted(&self) -> bool {
        self.ceiling.is_none()
            && matches!(self.low, Bound::Unbounded)
            && matches!(self.high, Bound::Unbounded)
    }

    fn push(&mut self, view: View<'a, K, P>) {
        self.upper += view.count();
        self.pending.push(view);
    }
}

impl<'a, K, P, KC, PC> Iterator for BoundedIterator<'a, K, P, KC, PC>
where
    KC: Comparator<K>,
    PC: Comparator<P>,
{
    type Item = (&'a K, &'a P);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(view) = self.pending.pop() {
            self.upper -= view.count();
            if !self.admits(view.priority) {
                continue;
            }
            let Some(loser) = view.losers else {
                if self.contains(view.key) {
                    return Some((view.key, view.priority));
                }
                continue;
            };

            let own = (&loser.key, &loser.priority);
            let champion = (view.key, view.priority);
            let ((left_key, left_priority), (right_key, right_priority)) =
                if self.orders.keys.less_or_equal(&loser.key, &loser.split) {
                    (own, champion)
                } else {
                    (champion, own)
                };
            let left = (!self.entirely_below(&loser.split)).then(|| View {
                key: left_key,
                priority: left_priority,
                losers: loser.left.as_deref(),
            });
            let right = (!self.entirely_above(&loser.split)).then(|| View {
                key: right_key,
                priority: right_priority,
                losers: loser.right.as_deref(),
            });

            let (first, second) = match self.direction {
                Direction::Ascending => (left, right),
                Direction::Descending => (right, left),
            };
            if let Some(second) = second {
                self.push(second);
            }
            if let Some(first) = first {
                self.push(first);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.is_unrestricted() {
            (self.upper, Some(self.upper))
        } else {
            (0, Some(self.upper))
        }
    }
}

impl<K, P, KC, PC> FusedIterator for BoundedIterator<'_, K, P, KC, PC>
where
    KC: Comparator<K>,
    PC: Comparator<P>,
{
}

impl<K, P, KC, PC> std::fmt::Debug for BoundedIterator<'_, K, P, KC, PC>
where
    K: std::fmt::Debug,
    P: std::fmt::Debug,
{
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("BoundedIterator")
            .field("direction", &self.direction)
            .field("ceiling", &self.ceiling)
            .field("low", &self.low)
            .field("high", &self.high)
            .field("pending", &self.pending.len())
            .field("upper", &self.upper)
            .finish()
    }
}
