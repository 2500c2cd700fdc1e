//! Tournament merge (`play`) and split (`unplay`).
//!
//! `play` fuses two pennants whose key ranges are adjacent (every key of the
//! left one is `<=` every key of the right one) by letting their winners
//! compete: the entry with the smaller priority becomes the new winner, the
//! other one is recorded as a loser. `unplay` undoes exactly one `play`.

use super::Orders;
use super::node::Winner;
use crate::order::Comparator;

/// Result of undoing one tournament match.
pub(crate) enum Unplayed<K, P> {
    /// The pennant held a single entry.
    Single(Winner<K, P>),
    /// The two pennants that were fused, in key order.
    Pair(Winner<K, P>, Winner<K, P>),
}

impl<KC, PC> Orders<KC, PC> {
    /// Fuses two adjacent pennants. Priority ties favour the left winner.
    pub(crate) fn play<K, P>(&self, left: Winner<K, P>, right: Winner<K, P>) -> Winner<K, P>
    where
        K: Clone,
        P: Clone,
        KC: Comparator<K>,
        PC: Comparator<P>,
    {
        if self
            .priorities
            .less_or_equal(&left.priority, &right.priority)
        {
            Winner {
                key: left.key,
                priority: left.priority,
                losers: Some(self.balance(
                    right.key,
                    right.priority,
                    left.losers,
                    left.ubound,
                    right.losers,
                )),
                ubound: right.ubound,
            }
        } else {
            Winner {
                key: right.key,
                priority: right.priority,
                losers: Some(self.balance(
                    left.key,
                    left.priority,
                    left.losers,
                    left.ubound,
                    right.losers,
                )),
                ubound: right.ubound,
            }
        }
    }

    /// [`play`](Self::play) where either side may be empty.
    pub(crate) fn play_options<K, P>(
        &self,
        left: Option<Winner<K, P>>,
        right: Option<Winner<K, P>>,
    ) -> Option<Winner<K, P>>
    where
        K: Clone,
        P: Clone,
        KC: Comparator<K>,
        PC: Comparator<P>,
    {
        match (left, right) {
            (Some(left), Some(right)) => Some(self.play(left, right)),
            (left, None) => left,
            (None, right) => right,
        }
    }

    /// Splits a pennant into the two pennants it was played from.
    pub(crate) fn unplay<K, P>(&self, winner: Winner<K, P>) -> Unplayed<K, P>
    where
        K: Clone,
        P: Clone,
        KC: Comparator<K>,
    {
        let loser = match winner.losers {
            Some(loser) => loser,
            None => return Unplayed::Single(winner),
        };
        let left_losers = loser.left.clone();
        let right_losers = loser.right.clone();
        if self.keys.less_or_equal(&loser.key, &loser.split) {
            Unplayed::Pair(
                Winner {
                    key: loser.key.clone(),
                    priority: loser.priority.clone(),
                    losers: left_losers,
                    ubound: loser.split.clone(),
                },
                Winner {
                    key: winner.key,
                    priority: winner.priority,
                    losers: right_losers,
                    ubound: winner.ubound,
                },
            )
        } else {
            Unplayed::Pair(
                Winner {
                    key: winner.key,
                    priority: winner.priority,
                    losers: left_losers,
                    ubound: loser.split.clone(),
                },
                Winner {
                    key: loser.key.clone(),
                    priority: loser.priority.clone(),
                    losers: right_losers,
                    ubound: winner.ubound,
                },
            )
        }
    }
}
