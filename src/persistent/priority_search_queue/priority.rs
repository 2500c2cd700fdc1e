//! Priority-queue operations.
//!
//! Removing the winner of a pennant means replaying the tournament among
//! its losers. `second_best` does this along a single root-to-leaf path:
//! at every loser it knows which half the departed winner came from,
//! rebuilds that half recursively and plays it against the other half.

use super::super::ReferenceCounter;
use super::Orders;
use super::node::{Loser, Winner};
use crate::order::{Comparator, NaturalOrder};
use std::iter::FusedIterator;

impl<KC, PC> Orders<KC, PC> {
    /// The pennant left over once the winner owning `losers` is removed.
    pub(crate) fn second_best<K, P>(
        &self,
        losers: Option<&ReferenceCounter<Loser<K, P>>>,
        ubound: &K,
    ) -> Option<Winner<K, P>>
    where
        K: Clone,
        P: Clone,
        KC: Comparator<K>,
        PC: Comparator<P>,
    {
        let loser = losers?;
        if self.keys.less_or_equal(&loser.key, &loser.split) {
            // The loser won the left half; the departed winner owned the right half.
            let left = Winner {
                key: loser.key.clone(),
                priority: loser.priority.clone(),
                losers: loser.left.clone(),
                ubound: loser.split.clone(),
            };
            let right = self.second_best(loser.right.as_ref(), ubound);
            self.play_options(Some(left), right)
        } else {
            let left = self.second_best(loser.left.as_ref(), &loser.split);
            let right = Winner {
                key: loser.key.clone(),
                priority: loser.priority.clone(),
                losers: loser.right.clone(),
                ubound: ubound.clone(),
            };
            self.play_options(left, Some(right))
        }
    }
}

/// A lazy iterator over the entries of a
/// [`PersistentPrioritySearchQueue`](super::PersistentPrioritySearchQueue)
/// in non-decreasing priority order.
///
/// Each step removes the current winner from a private pennant, which costs
/// O(log N); entries that are never pulled are never ordered.
pub struct PriorityIterator<K, P, KC = NaturalOrder, PC = NaturalOrder> {
    orders: ReferenceCounter<Orders<KC, PC>>,
    next: Option<Winner<K, P>>,
    remaining: usize,
}

impl<K, P, KC, PC> PriorityIterator<K, P, KC, PC> {
    pub(crate) const fn new(
        orders: ReferenceCounter<Orders<KC, PC>>,
        root: Option<Winner<K, P>>,
        length: usize,
    ) -> Self {
        Self {
            orders,
            next: root,
            remaining: length,
        }
    }
}

impl<K, P, KC, PC> Iterator for PriorityIterator<K, P, KC, PC>
where
    K: Clone,
    P: Clone,
    KC: Comparator<K>,
    PC: Comparator<P>,
{
    type Item = (K, P);

    fn next(&mut self) -> Option<Self::Item> {
        let winner = self.next.take()?;
        self.next = self
            .orders
            .second_best(winner.losers.as_ref(), &winner.ubound);
        self.remaining = self.remaining.saturating_sub(1);
        Some((winner.key, winner.priority))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, P, KC, PC> ExactSizeIterator for PriorityIterator<K, P, KC, PC>
where
    K: Clone,
    P: Clone,
    KC: Comparator<K>,
    PC: Comparator<P>,
{
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, P, KC, PC> FusedIterator for PriorityIterator<K, P, KC, PC>
where
    K: Clone,
    P: Clone,
    KC: Comparator<K>,
    PC: Comparator<P>,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn orders() -> Orders<NaturalOrder, NaturalOrder> {
        Orders {
            keys: NaturalOrder,
            priorities: NaturalOrder,
        }
    }

    #[rstest]
    fn test_second_best_of_singleton_is_empty() {
        let winner = Winner::singleton(1, 1);
        assert!(
            orders()
                .second_best(winner.losers.as_ref(), &winner.ubound)
                .is_none()
        );
    }

    #[rstest]
    fn test_second_best_finds_runner_up() {
        let orders = orders();
        let winner = [(5, 10), (3, 7), (8, 2), (1, 9)].into_iter().fold(
            Winner::singleton(4, 4),
            |winner, (key, priority)| orders.insert(key, priority, winner).0,
        );
        assert_eq!((winner.key, winner.priority), (8, 2));
        let runner_up = orders
            .second_best(winner.losers.as_ref(), &winner.ubound)
            .expect("five entries leave four");
        assert_eq!((runner_up.key, runner_up.priority), (4, 4));
        assert_eq!(runner_up.count(), 4);
        assert_eq!(runner_up.ubound, 5);
    }

    #[rstest]
    fn test_priority_iterator_drains_in_order() {
        let orders = ReferenceCounter::new(orders());
        let winner = [(2, 20), (9, 5), (4, 5), (7, 1)].into_iter().fold(
            Winner::singleton(1, 3),
            |winner, (key, priority)| orders.insert(key, priority, winner).0,
        );
        let iterator = PriorityIterator::new(ReferenceCounter::clone(&orders), Some(winner), 5);
        assert_eq!(iterator.len(), 5);
        let priorities: Vec<i32> = iterator.map(|(_, priority)| priority).collect();
        assert_eq!(priorities, vec![1, 3, 5, 5, 20]);
    }
}
