//! Persistent (immutable) priority search queue based on priority search
//! pennants.
//!
//! This module provides [`PersistentPrioritySearchQueue`], an immutable
//! container that is at once an ordered map from keys to priorities and a
//! min-priority queue over the same entries.
//!
//! # Overview
//!
//! The queue is a weight-balanced search tree on keys whose nodes also form
//! a tournament on priorities. The root ("winner") holds the entry with the
//! smallest priority; every other entry is stored in the loser tree, at the
//! node where it lost its match.
//!
//! - O(1) `len`, `is_empty` and `peek_min`
//! - O(log N) `get`, `insert`, `remove`, `pop_min`
//! - O(log N) `rank`, `get_index`, `nearest_left`, `nearest_right`
//! - O(log² N) `split_by_key`
//! - O(log N + k) priority and key bounded queries returning k entries
//!
//! All operations return new queues without modifying the original, and
//! structural sharing ensures memory efficiency.
//!
//! # Examples
//!
//! ```rust
//! use pennant::persistent::PersistentPrioritySearchQueue;
//!
//! let tasks = PersistentPrioritySearchQueue::new()
//!     .insert("compile", 3)
//!     .insert("deploy", 9)
//!     .insert("lint", 1)
//!     .insert("test", 5);
//!
//! // The most urgent task
//! assert_eq!(tasks.peek_min(), Some((&"lint", &1)));
//!
//! // Tasks with priority <= 5 whose name sorts before "t"
//! let urgent: Vec<&str> = tasks
//!     .at_most_range(.."t", 5)
//!     .map(|(name, _)| *name)
//!     .collect();
//! assert_eq!(urgent, vec!["compile", "lint"]);
//! ```
//!
//! # Comparator contract
//!
//! Keys and priorities are ordered by the comparators passed to
//! [`PersistentPrioritySearchQueue::with_comparators`]. Both must be total
//! orders; anything else yields unspecified (but memory safe) results.

mod balance;
mod error;
#[cfg(test)]
mod invariants;
mod map;
mod node;
mod partition;
mod priority;
mod statistics;
mod tournament;
mod traversal;

pub use error::PrioritySearchQueueError;
pub use priority::PriorityIterator;
pub use traversal::BoundedIterator;

use super::ReferenceCounter;
use crate::order::{Comparator, NaturalOrder};
use map::Deletion;
use node::Winner;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::ops::RangeBounds;
use traversal::{Direction, PriorityCeiling};

// =============================================================================
// Orders
// =============================================================================

/// The key and priority comparators shared by every version of a queue.
pub(crate) struct Orders<KC, PC> {
    pub(crate) keys: KC,
    pub(crate) priorities: PC,
}

// =============================================================================
// PersistentPrioritySearchQueue Definition
// =============================================================================

/// A persistent (immutable) priority search queue.
///
/// Every entry is a `(key, priority)` pair. Keys are unique and ordered by
/// `KC`; priorities are ordered by `PC` and may repeat. Both default to
/// [`NaturalOrder`].
///
/// # Time Complexity
///
/// | Operation           | Complexity   |
/// |---------------------|--------------|
/// | `new`               | O(1)         |
/// | `get`               | O(log N)     |
/// | `insert`            | O(log N)     |
/// | `remove`            | O(log N)     |
/// | `peek_min`          | O(1)         |
/// | `pop_min`           | O(log N)     |
/// | `rank`, `get_index` | O(log N)     |
/// | `split_by_key`      | O(log² N)    |
/// | bounded traversals  | O(log N + k) |
/// | `len`               | O(1)         |
///
/// # Examples
///
/// ```rust
/// use pennant::persistent::PersistentPrioritySearchQueue;
///
/// let queue = PersistentPrioritySearchQueue::new()
///     .insert('b', 20)
///     .insert('a', 30)
///     .insert('c', 10);
///
/// let (rest, cheapest) = queue.pop_min().unwrap();
/// assert_eq!(cheapest, ('c', 10));
/// assert_eq!(rest.len(), 2);
/// assert_eq!(queue.len(), 3); // Original unchanged
/// ```
pub struct PersistentPrioritySearchQueue<K, P, KC = NaturalOrder, PC = NaturalOrder> {
    /// Root pennant, `None` when empty
    root: Option<Winner<K, P>>,
    /// Number of entries
    length: usize,
    orders: ReferenceCounter<Orders<KC, PC>>,
}

impl<K: Clone, P: Clone, KC, PC> Clone for PersistentPrioritySearchQueue<K, P, KC, PC> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            length: self.length,
            orders: ReferenceCounter::clone(&self.orders),
        }
    }
}

impl<K, P> PersistentPrioritySearchQueue<K, P> {
    /// Creates a new empty queue ordered by [`NaturalOrder`] on both keys
    /// and priorities.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::persistent::PersistentPrioritySearchQueue;
    ///
    /// let queue: PersistentPrioritySearchQueue<String, u32> = PersistentPrioritySearchQueue::new();
    /// assert!(queue.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparators(NaturalOrder, NaturalOrder)
    }
}

impl<K: Clone + Ord, P: Clone + Ord> PersistentPrioritySearchQueue<K, P> {
    /// Creates a queue containing a single entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::persistent::PersistentPrioritySearchQueue;
    ///
    /// let queue = PersistentPrioritySearchQueue::singleton("answer", 42);
    /// assert_eq!(queue.len(), 1);
    /// assert_eq!(queue.get(&"answer"), Some(&42));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(key: K, priority: P) -> Self {
        Self::new().insert(key, priority)
    }
}

impl<T: Clone + Ord> PersistentPrioritySearchQueue<T, T> {
    /// Builds a queue from a flat sequence alternating keys and priorities:
    /// `[key0, priority0, key1, priority1, ...]`.
    ///
    /// Later occurrences of a key overwrite earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`PrioritySearchQueueError::MissingPriority`] when the
    /// sequence has odd length, i.e. its last key has no priority.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::persistent::PersistentPrioritySearchQueue;
    ///
    /// let queue = PersistentPrioritySearchQueue::try_from_alternating([3, 30, 1, 10]).unwrap();
    /// assert_eq!(queue.get(&1), Some(&10));
    /// assert_eq!(queue.peek_min(), Some((&1, &10)));
    /// ```
    pub fn try_from_alternating<I>(values: I) -> Result<Self, PrioritySearchQueueError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut values = values.into_iter();
        let mut queue = Self::new();
        let mut position = 0;
        while let Some(key) = values.next() {
            let Some(priority) = values.next() else {
                tracing::debug!(
                    key_position = position,
                    "rejected alternating input with a dangling key"
                );
                return Err(PrioritySearchQueueError::MissingPriority {
                    key_position: position,
                });
            };
            queue = queue.insert(key, priority);
            position += 2;
        }
        Ok(queue)
    }
}

impl<K, P, KC, PC> PersistentPrioritySearchQueue<K, P, KC, PC> {
    /// Creates a new empty queue with custom key and priority orders.
    ///
    /// Every queue derived from the result shares both comparators.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::order::{NaturalOrder, ReverseOrder};
    /// use pennant::persistent::PersistentPrioritySearchQueue;
    ///
    /// // Largest priority first
    /// let queue = PersistentPrioritySearchQueue::with_comparators(NaturalOrder, ReverseOrder(NaturalOrder))
    ///     .insert("low", 1)
    ///     .insert("high", 9);
    /// assert_eq!(queue.peek_min(), Some((&"high", &9)));
    /// ```
    #[must_use]
    pub fn with_comparators(key_order: KC, priority_order: PC) -> Self {
        Self {
            root: None,
            length: 0,
            orders: ReferenceCounter::new(Orders {
                keys: key_order,
                priorities: priority_order,
            }),
        }
    }

    /// Returns the number of entries in the queue.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the queue contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the comparator ordering the keys.
    #[inline]
    #[must_use]
    pub fn key_order(&self) -> &KC {
        &self.orders.keys
    }

    /// Returns the comparator ordering the priorities.
    #[inline]
    #[must_use]
    pub fn priority_order(&self) -> &PC {
        &self.orders.priorities
    }

    /// Returns the entry with the smallest priority.
    ///
    /// When several entries share the smallest priority, which one is
    /// returned depends only on the queue's contents, not on insertion
    /// order.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::persistent::PersistentPrioritySearchQueue;
    ///
    /// let queue = PersistentPrioritySearchQueue::new().insert(1, 'z').insert(2, 'a');
    /// assert_eq!(queue.peek_min(), Some((&2, &'a')));
    /// ```
    #[inline]
    #[must_use]
    pub fn peek_min(&self) -> Option<(&K, &P)> {
        self.root
            .as_ref()
            .map(|winner| (&winner.key, &winner.priority))
    }

    /// A new version with the given root, sharing this queue's orders.
    fn derive(&self, root: Option<Winner<K, P>>, length: usize) -> Self {
        Self {
            root,
            length,
            orders: ReferenceCounter::clone(&self.orders),
        }
    }
}

impl<K, P, KC, PC> PersistentPrioritySearchQueue<K, P, KC, PC>
where
    K: Clone,
    P: Clone,
    KC: Comparator<K>,
    PC: Comparator<P>,
{
    // =========================================================================
    // Map view
    // =========================================================================

    /// Returns the priority stored under `key`.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::persistent::PersistentPrioritySearchQueue;
    ///
    /// let queue = PersistentPrioritySearchQueue::new().insert("a", 1);
    /// assert_eq!(queue.get(&"a"), Some(&1));
    /// assert_eq!(queue.get(&"b"), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&P> {
        self.entry(key).map(|(_, priority)| priority)
    }

    /// Returns the priority stored under `key`, or `default` when absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::persistent::PersistentPrioritySearchQueue;
    ///
    /// let queue = PersistentPrioritySearchQueue::new().insert("a", 1);
    /// assert_eq!(queue.get_or(&"b", &0), &0);
    /// ```
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &K, default: &'a P) -> &'a P {
        self.get(key).unwrap_or(default)
    }

    /// Returns the stored key and priority for `key`.
    #[must_use]
    pub fn entry(&self, key: &K) -> Option<(&K, &P)> {
        self.root
            .as_ref()
            .and_then(|root| self.orders.lookup(key, root))
    }

    /// Returns `true` if the queue contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entry(key).is_some()
    }

    /// Inserts an entry, returning a new queue.
    ///
    /// If the key already exists its priority is replaced and the length is
    /// unchanged.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::persistent::PersistentPrioritySearchQueue;
    ///
    /// let queue = PersistentPrioritySearchQueue::new().insert(1, 10);
    /// let updated = queue.insert(1, 5);
    ///
    /// assert_eq!(queue.get(&1), Some(&10)); // Original unchanged
    /// assert_eq!(updated.get(&1), Some(&5));
    /// assert_eq!(updated.len(), 1);
    /// ```
    #[must_use]
    pub fn insert(&self, key: K, priority: P) -> Self {
        match &self.root {
            None => self.derive(Some(Winner::singleton(key, priority)), 1),
            Some(root) => {
                let (root, found) = self.orders.insert(key, priority, root.clone());
                let length = if found {
                    self.length
                } else {
                    self.length + 1
                };
                self.derive(Some(root), length)
            }
        }
    }

    /// Inserts an entry whose key must not be present yet.
    ///
    /// # Errors
    ///
    /// Returns [`PrioritySearchQueueError::KeyAlreadyPresent`] if `key` is
    /// already in the queue.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::persistent::{PersistentPrioritySearchQueue, PrioritySearchQueueError};
    ///
    /// let queue = PersistentPrioritySearchQueue::new().insert(1, 10);
    /// assert!(queue.insert_new(2, 20).is_ok());
    /// assert_eq!(
    ///     queue.insert_new(1, 0).unwrap_err(),
    ///     PrioritySearchQueueError::KeyAlreadyPresent
    /// );
    /// ```
    pub fn insert_new(&self, key: K, priority: P) -> Result<Self, PrioritySearchQueueError> {
        if self.contains_key(&key) {
            tracing::debug!(length = self.length, "insert_new rejected an existing key");
            return Err(PrioritySearchQueueError::KeyAlreadyPresent);
        }
        Ok(self.insert(key, priority))
    }

    /// Removes `key`, returning a new queue.
    ///
    /// Removing an absent key returns a queue sharing this one's root.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::persistent::PersistentPrioritySearchQueue;
    ///
    /// let queue = PersistentPrioritySearchQueue::new().insert(1, 10).insert(2, 20);
    /// let removed = queue.remove(&1);
    ///
    /// assert_eq!(queue.len(), 2); // Original unchanged
    /// assert_eq!(removed.len(), 1);
    /// assert!(!removed.contains_key(&1));
    /// ```
    #[must_use]
    pub fn remove(&self, key: &K) -> Self {
        let Some(root) = &self.root else {
            return self.clone();
        };
        if self.orders.lookup(key, root).is_none() {
            return self.clone();
        }
        match self.orders.delete(key, root.clone()) {
            Deletion::NotFound => self.clone(),
            Deletion::Deleted(root) => self.derive(root, self.length - 1),
        }
    }

    /// Returns the entry with the greatest key below `key`, or at `key`
    /// when `inclusive`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::persistent::PersistentPrioritySearchQueue;
    ///
    /// let queue: PersistentPrioritySearchQueue<i32, i32> = [(10, 0), (20, 0), (30, 0)].into_iter().collect();
    /// assert_eq!(queue.nearest_left(&25, false), Some((&20, &0)));
    /// assert_eq!(queue.nearest_left(&20, false), Some((&10, &0)));
    /// assert_eq!(queue.nearest_left(&20, true), Some((&20, &0)));
    /// assert_eq!(queue.nearest_left(&10, false), None);
    /// ```
    #[must_use]
    pub fn nearest_left(&self, key: &K, inclusive: bool) -> Option<(&K, &P)> {
        self.root
            .as_ref()
            .and_then(|root| self.orders.nearest_left(key, inclusive, root))
    }

    /// Returns the entry with the least key above `key`, or at `key` when
    /// `inclusive`.
    #[must_use]
    pub fn nearest_right(&self, key: &K, inclusive: bool) -> Option<(&K, &P)> {
        self.root
            .as_ref()
            .and_then(|root| self.orders.nearest_right(key, inclusive, root))
    }

    /// Returns the entry with the smallest key.
    #[must_use]
    pub fn first(&self) -> Option<(&K, &P)> {
        self.get_index(0)
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn last(&self) -> Option<(&K, &P)> {
        self.root
            .as_ref()
            .and_then(|root| self.orders.lookup(&root.ubound, root))
    }

    // =========================================================================
    // Priority queue view
    // =========================================================================

    /// Removes the entry with the smallest priority.
    ///
    /// Returns `None` if the queue is empty, otherwise the remaining queue
    /// and the removed entry.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::persistent::PersistentPrioritySearchQueue;
    ///
    /// let queue = PersistentPrioritySearchQueue::new().insert("x", 2).insert("y", 1);
    /// let (rest, (key, priority)) = queue.pop_min().unwrap();
    /// assert_eq!((key, priority), ("y", 1));
    /// assert_eq!(rest.peek_min(), Some((&"x", &2)));
    ///
    /// let empty: PersistentPrioritySearchQueue<i32, i32> = PersistentPrioritySearchQueue::new();
    /// assert!(empty.pop_min().is_none());
    /// ```
    #[must_use]
    pub fn pop_min(&self) -> Option<(Self, (K, P))> {
        let root = self.root.as_ref()?;
        let rest = self.orders.second_best(root.losers.as_ref(), &root.ubound);
        tracing::trace!(length = self.length, "popped minimum priority entry");
        Some((
            self.derive(rest, self.length - 1),
            (root.key.clone(), root.priority.clone()),
        ))
    }

    /// Returns an iterator over all entries in non-decreasing priority
    /// order.
    ///
    /// The iterator is lazy: each step costs O(log N).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::persistent::PersistentPrioritySearchQueue;
    ///
    /// let queue: PersistentPrioritySearchQueue<char, u8> =
    ///     [('a', 3), ('b', 1), ('c', 2)].into_iter().collect();
    /// let order: Vec<char> = queue.iter_by_priority().map(|(key, _)| key).collect();
    /// assert_eq!(order, vec!['b', 'c', 'a']);
    /// ```
    #[must_use]
    pub fn iter_by_priority(&self) -> PriorityIterator<K, P, KC, PC> {
        PriorityIterator::new(
            ReferenceCounter::clone(&self.orders),
            self.root.clone(),
            self.length,
        )
    }

    // =========================================================================
    // Order statistics
    // =========================================================================

    /// Returns the zero-based position of `key` in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::persistent::PersistentPrioritySearchQueue;
    ///
    /// let queue: PersistentPrioritySearchQueue<i32, i32> = [(5, 0), (1, 0), (3, 0)].into_iter().collect();
    /// assert_eq!(queue.rank(&5), Some(2));
    /// assert_eq!(queue.rank(&4), None);
    /// ```
    #[must_use]
    pub fn rank(&self, key: &K) -> Option<usize> {
        self.root
            .as_ref()
            .and_then(|root| self.orders.rank(key, root))
    }

    /// Returns the entry at zero-based position `index` in ascending key
    /// order, or `None` when `index >= len()`.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&K, &P)> {
        self.root
            .as_ref()
            .and_then(|root| self.orders.get_index(index, root))
    }

    /// Returns the entry at zero-based position `index` in ascending key
    /// order.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`. Use [`get_index`](Self::get_index) for a
    /// non-panicking variant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::persistent::PersistentPrioritySearchQueue;
    ///
    /// let queue: PersistentPrioritySearchQueue<i32, i32> = [(5, 50), (1, 10)].into_iter().collect();
    /// assert_eq!(queue.select(1), (&5, &50));
    /// ```
    #[must_use]
    pub fn select(&self, index: usize) -> (&K, &P) {
        match self.get_index(index) {
            Some(entry) => entry,
            None => panic!(
                "{}",
                PrioritySearchQueueError::IndexOutOfBounds {
                    index,
                    length: self.length,
                }
            ),
        }
    }

    // =========================================================================
    // Partition
    // =========================================================================

    /// Splits the queue around `key`.
    ///
    /// Returns the queue of entries with smaller keys, the entry stored
    /// under `key` (if any) and the queue of entries with larger keys. Both
    /// halves keep this queue's comparators.
    ///
    /// # Complexity
    ///
    /// O(log² N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::persistent::PersistentPrioritySearchQueue;
    ///
    /// let queue: PersistentPrioritySearchQueue<i32, i32> =
    ///     [(5, 10), (3, 7), (8, 2), (1, 9)].into_iter().collect();
    /// let (below, found, above) = queue.split_by_key(&5);
    ///
    /// assert_eq!(below.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    /// assert_eq!(found, Some((5, 10)));
    /// assert_eq!(above.keys().copied().collect::<Vec<_>>(), vec![8]);
    /// ```
    #[must_use]
    pub fn split_by_key(&self, key: &K) -> (Self, Option<(K, P)>, Self) {
        let Some(root) = &self.root else {
            return (self.clone(), None, self.clone());
        };
        let partition = self.orders.partition(key, root.clone());
        let below_length = partition.below.as_ref().map_or(0, Winner::count);
        let found_length = usize::from(partition.found.is_some());
        let above_length = self.length - below_length - found_length;
        tracing::trace!(
            length = self.length,
            below = below_length,
            above = above_length,
            found = partition.found.is_some(),
            "split queue by key"
        );
        (
            self.derive(partition.below, below_length),
            partition.found,
            self.derive(partition.above, above_length),
        )
    }

    // =========================================================================
    // Key-ordered traversals
    // =========================================================================

    fn traverse<R>(
        &self,
        direction: Direction,
        ceiling: Option<PriorityCeiling<P>>,
        range: &R,
    ) -> BoundedIterator<'_, K, P, KC, PC>
    where
        R: RangeBounds<K>,
    {
        BoundedIterator::new(
            &self.orders,
            self.root.as_ref(),
            direction,
            ceiling,
            (range.start_bound().cloned(), range.end_bound().cloned()),
        )
    }

    /// Returns an iterator over all entries in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::persistent::PersistentPrioritySearchQueue;
    ///
    /// let queue = PersistentPrioritySearchQueue::new().insert(2, 'b').insert(1, 'a');
    /// let entries: Vec<(&i32, &char)> = queue.iter().collect();
    /// assert_eq!(entries, vec![(&1, &'a'), (&2, &'b')]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> BoundedIterator<'_, K, P, KC, PC> {
        self.traverse(Direction::Ascending, None, &..)
    }

    /// Returns an iterator over all entries in descending key order.
    #[must_use]
    pub fn rev_iter(&self) -> BoundedIterator<'_, K, P, KC, PC> {
        self.traverse(Direction::Descending, None, &..)
    }

    /// Returns an iterator over the keys in ascending order.
    #[must_use]
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the priorities in ascending key order.
    #[must_use]
    pub fn priorities(&self) -> impl Iterator<Item = &P> {
        self.iter().map(|(_, priority)| priority)
    }

    /// Returns an iterator over the entries whose keys fall in `range`, in
    /// ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::persistent::PersistentPrioritySearchQueue;
    ///
    /// let queue: PersistentPrioritySearchQueue<i32, i32> = (0..10).map(|key| (key, -key)).collect();
    /// let keys: Vec<i32> = queue.range(3..6).map(|(key, _)| *key).collect();
    /// assert_eq!(keys, vec![3, 4, 5]);
    /// ```
    #[must_use]
    pub fn range<R>(&self, range: R) -> BoundedIterator<'_, K, P, KC, PC>
    where
        R: RangeBounds<K>,
    {
        self.traverse(Direction::Ascending, None, &range)
    }

    /// Like [`range`](Self::range), in descending key order.
    #[must_use]
    pub fn rev_range<R>(&self, range: R) -> BoundedIterator<'_, K, P, KC, PC>
    where
        R: RangeBounds<K>,
    {
        self.traverse(Direction::Descending, None, &range)
    }

    // =========================================================================
    // Priority-bounded traversals
    // =========================================================================

    /// Returns an iterator, in ascending key order, over the entries whose
    /// priority is at most `priority`.
    ///
    /// Subtrees whose best priority exceeds the bound are skipped without
    /// being visited.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::persistent::PersistentPrioritySearchQueue;
    ///
    /// let queue: PersistentPrioritySearchQueue<i32, i32> =
    ///     [(5, 10), (3, 7), (8, 2), (1, 9)].into_iter().collect();
    /// let cheap: Vec<(&i32, &i32)> = queue.at_most(9).collect();
    /// assert_eq!(cheap, vec![(&1, &9), (&3, &7), (&8, &2)]);
    /// ```
    #[must_use]
    pub fn at_most(&self, priority: P) -> BoundedIterator<'_, K, P, KC, PC> {
        self.traverse(Direction::Ascending, Some(Self::ceiling(priority, true)), &..)
    }

    /// Like [`at_most`](Self::at_most), with a strict bound: priority `<`
    /// `priority`.
    #[must_use]
    pub fn below(&self, priority: P) -> BoundedIterator<'_, K, P, KC, PC> {
        self.traverse(Direction::Ascending, Some(Self::ceiling(priority, false)), &..)
    }

    /// Like [`at_most`](Self::at_most), in descending key order.
    #[must_use]
    pub fn rev_at_most(&self, priority: P) -> BoundedIterator<'_, K, P, KC, PC> {
        self.traverse(Direction::Descending, Some(Self::ceiling(priority, true)), &..)
    }

    /// Like [`below`](Self::below), in descending key order.
    #[must_use]
    pub fn rev_below(&self, priority: P) -> BoundedIterator<'_, K, P, KC, PC> {
        self.traverse(Direction::Descending, Some(Self::ceiling(priority, false)), &..)
    }

    /// Returns an iterator, in ascending key order, over the entries whose
    /// key falls in `range` and whose priority is at most `priority`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pennant::persistent::PersistentPrioritySearchQueue;
    ///
    /// let queue: PersistentPrioritySearchQueue<i32, i32> = (0..20).map(|key| (key, key % 5)).collect();
    /// let found: Vec<i32> = queue.at_most_range(3..=12, 1).map(|(key, _)| *key).collect();
    /// assert_eq!(found, vec![5, 6, 10, 11]);
    /// ```
    #[must_use]
    pub fn at_most_range<R>(&self, range: R, priority: P) -> BoundedIterator<'_, K, P, KC, PC>
    where
        R: RangeBounds<K>,
    {
        self.traverse(
            Direction::Ascending,
            Some(Self::ceiling(priority, true)),
            &range,
        )
    }

    /// Like [`at_most_range`](Self::at_most_range), with a strict priority
    /// bound.
    #[must_use]
    pub fn below_range<R>(&self, range: R, priority: P) -> BoundedIterator<'_, K, P, KC, PC>
    where
        R: RangeBounds<K>,
    {
        self.traverse(
            Direction::Ascending,
            Some(Self::ceiling(priority, false)),
            &range,
        )
    }

    /// Like [`at_most_range`](Self::at_most_range), in descending key order.
    #[must_use]
    pub fn rev_at_most_range<R>(
        &self,
        range: R,
        priority: P,
    ) -> BoundedIterator<'_, K, P, KC, PC>
    where
        R: RangeBounds<K>,
    {
        self.traverse(
            Direction::Descending,
            Some(Self::ceiling(priority, true)),
            &range,
        )
    }

    /// Like [`below_range`](Self::below_range), in descending key order.
    #[must_use]
    pub fn rev_below_range<R>(&self, range: R, priority: P) -> BoundedIterator<'_, K, P, KC, PC>
    where
        R: RangeBounds<K>,
    {
        self.traverse(
            Direction::Descending,
            Some(Self::ceiling(priority, false)),
            &range,
        )
    }

    const fn ceiling(priority: P, inclusive: bool) -> PriorityCeiling<P> {
        PriorityCeiling {
            priority,
            inclusive,
        }
    }
}

// =============================================================================
// Owning Iterator
// =============================================================================

/// An owning iterator over the entries of a [`PersistentPrioritySearchQueue`]
/// in ascending key order.
pub struct PersistentPrioritySearchQueueIntoIterator<K, P> {
    entries: std::vec::IntoIter<(K, P)>,
}

impl<K, P> Iterator for PersistentPrioritySearchQueueIntoIterator<K, P> {
    type Item = (K, P);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, P> DoubleEndedIterator for PersistentPrioritySearchQueueIntoIterator<K, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<K, P> ExactSizeIterator for PersistentPrioritySearchQueueIntoIterator<K, P> {
    fn len(&self) -> usize {
        self.entries.len()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, P, KC: Default, PC: Default> Default for PersistentPrioritySearchQueue<K, P, KC, PC> {
    #[inline]
    fn default() -> Self {
        Self::with_comparators(KC::default(), PC::default())
    }
}

impl<K, P, KC, PC> FromIterator<(K, P)> for PersistentPrioritySearchQueue<K, P, KC, PC>
where
    K: Clone,
    P: Clone,
    KC: Comparator<K> + Default,
    PC: Comparator<P> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        let mut queue = Self::default();
        for (key, priority) in iter {
            queue = queue.insert(key, priority);
        }
        queue
    }
}

impl<K, P, KC, PC> Extend<(K, P)> for PersistentPrioritySearchQueue<K, P, KC, PC>
where
    K: Clone,
    P: Clone,
    KC: Comparator<K>,
    PC: Comparator<P>,
{
    fn extend<I: IntoIterator<Item = (K, P)>>(&mut self, iter: I) {
        for (key, priority) in iter {
            *self = self.insert(key, priority);
        }
    }
}

impl<K, P, KC, PC> IntoIterator for PersistentPrioritySearchQueue<K, P, KC, PC>
where
    K: Clone,
    P: Clone,
    KC: Comparator<K>,
    PC: Comparator<P>,
{
    type Item = (K, P);
    type IntoIter = PersistentPrioritySearchQueueIntoIterator<K, P>;

    fn into_iter(self) -> Self::IntoIter {
        let entries: Vec<(K, P)> = self
            .iter()
            .map(|(key, priority)| (key.clone(), priority.clone()))
            .collect();
        PersistentPrioritySearchQueueIntoIterator {
            entries: entries.into_iter(),
        }
    }
}

impl<'a, K, P, KC, PC> IntoIterator for &'a PersistentPrioritySearchQueue<K, P, KC, PC>
where
    K: Clone,
    P: Clone,
    KC: Comparator<K>,
    PC: Comparator<P>,
{
    type Item = (&'a K, &'a P);
    type IntoIter = BoundedIterator<'a, K, P, KC, PC>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Two queues are equal when they hold equal entries in the same key order.
///
/// The comparators themselves are not compared.
impl<K, P, KC, PC> PartialEq for PersistentPrioritySearchQueue<K, P, KC, PC>
where
    K: Clone + PartialEq,
    P: Clone + PartialEq,
    KC: Comparator<K>,
    PC: Comparator<P>,
{
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<K, P, KC, PC> Eq for PersistentPrioritySearchQueue<K, P, KC, PC>
where
    K: Clone + Eq,
    P: Clone + Eq,
    KC: Comparator<K>,
    PC: Comparator<P>,
{
}

/// Hashes the length, then every entry in key order, consistently with
/// [`PartialEq`].
///
/// # Examples
///
/// ```rust
/// use pennant::persistent::PersistentPrioritySearchQueue;
/// use std::collections::HashSet;
///
/// let first = PersistentPrioritySearchQueue::new().insert(1, 'a').insert(2, 'b');
/// let second = PersistentPrioritySearchQueue::new().insert(2, 'b').insert(1, 'a');
///
/// let mut seen = HashSet::new();
/// seen.insert(first);
/// assert!(seen.contains(&second));
/// ```
impl<K, P, KC, PC> Hash for PersistentPrioritySearchQueue<K, P, KC, PC>
where
    K: Clone + Hash,
    P: Clone + Hash,
    KC: Comparator<K>,
    PC: Comparator<P>,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for (key, priority) in self {
            key.hash(state);
            priority.hash(state);
        }
    }
}

impl<K, P, KC, PC> fmt::Debug for PersistentPrioritySearchQueue<K, P, KC, PC>
where
    K: Clone + fmt::Debug,
    P: Clone + fmt::Debug,
    KC: Comparator<K>,
    PC: Comparator<P>,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K, P, KC, PC> fmt::Display for PersistentPrioritySearchQueue<K, P, KC, PC>
where
    K: Clone + fmt::Display,
    P: Clone + fmt::Display,
    KC: Comparator<K>,
    PC: Comparator<P>,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, priority) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {priority}")?;
        }
        write!(formatter, "}}")
    }
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentPrioritySearchQueue<String, u64>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, P, KC, PC> serde::Serialize for PersistentPrioritySearchQueue<K, P, KC, PC>
where
    K: serde::Serialize + Clone,
    P: serde::Serialize + Clone,
    KC: Comparator<K>,
    PC: Comparator<P>,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, priority) in self {
            map.serialize_entry(key, priority)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentPrioritySearchQueueVisitor<K, P, KC, PC> {
    marker: std::marker::PhantomData<fn() -> (K, P, KC, PC)>,
}

#[cfg(feature = "serde")]
impl<K, P, KC, PC> PersistentPrioritySearchQueueVisitor<K, P, KC, PC> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, K, P, KC, PC> serde::de::Visitor<'de> for PersistentPrioritySearchQueueVisitor<K, P, KC, PC>
where
    K: serde::Deserialize<'de> + Clone,
    P: serde::Deserialize<'de> + Clone,
    KC: Comparator<K> + Default,
    PC: Comparator<P> + Default,
{
    type Value = PersistentPrioritySearchQueue<K, P, KC, PC>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map from keys to priorities")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut queue = PersistentPrioritySearchQueue::default();
        while let Some((key, priority)) = access.next_entry()? {
            queue = queue.insert(key, priority);
        }
        Ok(queue)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, P, KC, PC> serde::Deserialize<'de> for PersistentPrioritySearchQueue<K, P, KC, PC>
where
    K: serde::Deserialize<'de> + Clone,
    P: serde::Deserialize<'de> + Clone,
    KC: Comparator<K> + Default,
    PC: Comparator<P> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(PersistentPrioritySearchQueueVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================
