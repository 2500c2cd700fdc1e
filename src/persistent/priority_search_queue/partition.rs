//! Splitting a pennant around a key.

use super::Orders;
use super::node::Winner;
use super::tournament::Unplayed;
use crate::order::Comparator;
use std::cmp::Ordering;

/// The three parts of a pennant split around a key.
pub(crate) struct Partition<K, P> {
    /// Entries with keys below the split key.
    pub(crate) below: Option<Winner<K, P>>,
    /// The entry stored under the split key, if any.
    pub(crate) found: Option<(K, P)>,
    /// Entries with keys above the split key.
    pub(crate) above: Option<Winner<K, P>>,
}

impl<K, P> Partition<K, P> {
    const fn empty() -> Self {
        Self {
            below: None,
            found: None,
            above: None,
        }
    }
}

impl<KC, PC> Orders<KC, PC> {
    pub(crate) fn partition<K, P>(&self, key: &K, winner: Winner<K, P>) -> Partition<K, P>
    where
        K: Clone,
        P: Clone,
        KC: Comparator<K>,
        PC: Comparator<P>,
    {
        if self.keys.equivalent(key, &winner.key) {
            let rest = self.second_best(winner.losers.as_ref(), &winner.ubound);
            let mut partition = match rest {
                Some(rest) => self.partition(key, rest),
                None => Partition::empty(),
            };
            partition.found = Some((winner.key, winner.priority));
            return partition;
        }

        match self.unplay(winner) {
            Unplayed::Single(single) => match self.keys.compare(key, &single.key) {
                Ordering::Less => Partition {
                    below: None,
                    found: None,
                    above: Some(single),
                },
                Ordering::Equal => Partition {
                    below: None,
                    found: Some((single.key, single.priority)),
                    above: None,
                },
                Ordering::Greater => Partition {
                    below: Some(single),
                    found: None,
                    above: None,
                },
            },
            Unplayed::Pair(left, right) => {
                if self.keys.less_or_equal(key, &left.ubound) {
                    let partition = self.partition(key, left);
                    Partition {
                        above: self.play_options(partition.above, Some(right)),
                        ..partition
                    }
                } else {
                    let partition = self.partition(key, right);
                    Partition {
                        below: self.play_options(Some(left), partition.below),
                        ..partition
                    }
                }
            }
        }
    }
}
