//! Sorted-map operations: insert, delete, lookup and nearest keys.
//!
//! Updates `unplay` the pennant, recurse into the half whose key range
//! contains the key (keys `<=` the left half's `ubound` go left) and `play`
//! the halves back together. The half that is not visited is reused as is.

use super::Orders;
use super::node::{Loser, Winner};
use super::tournament::Unplayed;
use crate::order::Comparator;
use std::cmp::Ordering;

/// Outcome of deleting a key from a pennant.
pub(crate) enum Deletion<K, P> {
    /// The key is not present; the pennant is unchanged.
    NotFound,
    /// The key was removed; `None` when the pennant became empty.
    Deleted(Option<Winner<K, P>>),
}

impl<KC, PC> Orders<KC, PC> {
    /// Inserts or overwrites an entry.
    ///
    /// Returns the new pennant and whether the key was already present.
    pub(crate) fn insert<K, P>(
        &self,
        key: K,
        priority: P,
        winner: Winner<K, P>,
    ) -> (Winner<K, P>, bool)
    where
        K: Clone,
        P: Clone,
        KC: Comparator<K>,
        PC: Comparator<P>,
    {
        match self.unplay(winner) {
            Unplayed::Single(existing) => match self.keys.compare(&key, &existing.key) {
                Ordering::Less => (self.play(Winner::singleton(key, priority), existing), false),
                Ordering::Equal => (Winner::singleton(key, priority), true),
                Ordering::Greater => (self.play(existing, Winner::singleton(key, priority)), false),
            },
            Unplayed::Pair(left, right) => {
                if self.keys.less_or_equal(&key, &left.ubound) {
                    let (left, found) = self.insert(key, priority, left);
                    (self.play(left, right), found)
                } else {
                    let (right, found) = self.insert(key, priority, right);
                    (self.play(left, right), found)
                }
            }
        }
    }

    /// Removes `key` from the pennant.
    ///
    /// Consumes the pennant; on [`Deletion::NotFound`] it is dropped, so
    /// callers holding a shared root should check membership first.
    pub(crate) fn delete<K, P>(&self, key: &K, winner: Winner<K, P>) -> Deletion<K, P>
    where
        K: Clone,
        P: Clone,
        KC: Comparator<K>,
        PC: Comparator<P>,
    {
        match self.unplay(winner) {
            Unplayed::Single(single) => {
                if self.keys.equivalent(key, &single.key) {
                    Deletion::Deleted(None)
                } else {
                    Deletion::NotFound
                }
            }
            Unplayed::Pair(left, right) => {
                if self.keys.less_or_equal(key, &left.ubound) {
                    match self.delete(key, left) {
                        Deletion::NotFound => Deletion::NotFound,
                        Deletion::Deleted(left) => {
                            Deletion::Deleted(self.play_options(left, Some(right)))
                        }
                    }
                } else {
                    match self.delete(key, right) {
                        Deletion::NotFound => Deletion::NotFound,
                        Deletion::Deleted(right) => {
                            Deletion::Deleted(self.play_options(Some(left), right))
                        }
                    }
                }
            }
        }
    }

    /// Finds the entry stored under `key`.
    pub(crate) fn lookup<'a, K, P>(
        &self,
        key: &K,
        winner: &'a Winner<K, P>,
    ) -> Option<(&'a K, &'a P)>
    where
        KC: Comparator<K>,
    {
        if self.keys.equivalent(key, &winner.key) {
            return Some((&winner.key, &winner.priority));
        }
        let mut cursor: Option<&'a Loser<K, P>> = winner.losers.as_deref();
        while let Some(loser) = cursor {
            if self.keys.equivalent(key, &loser.key) {
                return Some((&loser.key, &loser.priority));
            }
            cursor = if self.keys.less_or_equal(key, &loser.split) {
                loser.left.as_deref()
            } else {
                loser.right.as_deref()
            };
        }
        None
    }

    /// Greatest entry whose key is below `key` (or equal, when `inclusive`).
    pub(crate) fn nearest_left<'a, K, P>(
        &self,
        key: &K,
        inclusive: bool,
        winner: &'a Winner<K, P>,
    ) -> Option<(&'a K, &'a P)>
    where
        KC: Comparator<K>,
    {
        match self.keys.compare(key, &winner.ubound) {
            Ordering::Greater => return self.lookup(&winner.ubound, winner),
            Ordering::Equal if inclusive => return self.lookup(key, winner),
            Ordering::Equal => {
                // The largest split is the second largest key.
                let mut loser = winner.losers.as_deref()?;
                while let Some(right) = loser.right.as_deref() {
                    loser = right;
                }
                return self.lookup(&loser.split, winner);
            }
            Ordering::Less => {}
        }

        let mut best: Option<&'a K> = None;
        let mut cursor: Option<&'a Loser<K, P>> = winner.losers.as_deref();
        while let Some(loser) = cursor {
            match self.keys.compare(key, &loser.split) {
                Ordering::Equal if inclusive => return self.lookup(key, winner),
                Ordering::Equal | Ordering::Less => cursor = loser.left.as_deref(),
                Ordering::Greater => {
                    best = Some(&loser.split);
                    cursor = loser.right.as_deref();
                }
            }
        }
        best.and_then(|split| self.lookup(split, winner))
    }

    /// Least entry whose key is above `key` (or equal, when `inclusive`).
    pub(crate) fn nearest_right<'a, K, P>(
        &self,
        key: &K,
        inclusive: bool,
        winner: &'a Winner<K, P>,
    ) -> Option<(&'a K, &'a P)>
    where
        KC: Comparator<K>,
    {
        match self.keys.compare(key, &winner.ubound) {
            Ordering::Greater => return None,
            Ordering::Equal if inclusive => return self.lookup(key, winner),
            Ordering::Equal => return None,
            Ordering::Less => {}
        }

        let mut best: &'a K = &winner.ubound;
        let mut cursor: Option<&'a Loser<K, P>> = winner.losers.as_deref();
        while let Some(loser) = cursor {
            match self.keys.compare(key, &loser.split) {
                Ordering::Equal if inclusive => return self.lookup(key, winner),
                Ordering::Equal | Ordering::Greater => cursor = loser.right.as_deref(),
                Ordering::Less => {
                    best = &loser.split;
                    cursor = loser.left.as_deref();
                }
            }
        }
        self.lookup(best, winner)
    }
}
