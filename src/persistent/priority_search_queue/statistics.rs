//! Order statistics over the `size` augmentation.
//!
//! Unplaying a pennant at a loser always yields a left half of
//! `size(loser.left) + 1` entries: the loser subtree plus whichever of the
//! two competing entries came from the left. Both walks below follow that
//! decomposition without allocating, tracking only which entry currently
//! owns the visited range.

use super::Orders;
use super::node::{Loser, Winner, size};
use crate::order::Comparator;

/// The entry currently owning a visited range.
type Champion<'a, K, P> = (&'a K, &'a P);

/// Owners of the two halves below `loser` when `champion` owns the whole.
fn halves<'a, K, P, KC>(
    keys: &KC,
    champion: Champion<'a, K, P>,
    loser: &'a Loser<K, P>,
) -> (Champion<'a, K, P>, Champion<'a, K, P>)
where
    KC: Comparator<K>,
{
    let own = (&loser.key, &loser.priority);
    if keys.less_or_equal(&loser.key, &loser.split) {
        (own, champion)
    } else {
        (champion, own)
    }
}

impl<KC, PC> Orders<KC, PC> {
    /// Zero-based position of `key` in ascending key order.
    pub(crate) fn rank<K, P>(&self, key: &K, winner: &Winner<K, P>) -> Option<usize>
    where
        KC: Comparator<K>,
    {
        if self.keys.equivalent(key, &winner.ubound) {
            return Some(winner.count() - 1);
        }
        if self.keys.less(&winner.ubound, key) {
            return None;
        }

        let mut offset = 0;
        let mut champion: Champion<'_, K, P> = (&winner.key, &winner.priority);
        let mut cursor: Option<&Loser<K, P>> = winner.losers.as_deref();
        while let Some(loser) = cursor {
            let (left, right) = halves(&self.keys, champion, loser);
            if self.keys.less_or_equal(key, &loser.split) {
                champion = left;
                cursor = loser.left.as_deref();
            } else {
                offset += size(loser.left.as_ref()) + 1;
                champion = right;
                cursor = loser.right.as_deref();
            }
        }
        self.keys.equivalent(key, champion.0).then_some(offset)
    }

    /// Entry at zero-based position `index` in ascending key order.
    pub(crate) fn get_index<'a, K, P>(
        &self,
        index: usize,
        winner: &'a Winner<K, P>,
    ) -> Option<(&'a K, &'a P)>
    where
        KC: Comparator<K>,
    {
        if index >= winner.count() {
            return None;
        }

        let mut index = index;
        let mut champion: Champion<'a, K, P> = (&winner.key, &winner.priority);
        let mut cursor: Option<&'a Loser<K, P>> = winner.losers.as_deref();
        while let Some(loser) = cursor {
            let left_count = size(loser.left.as_ref()) + 1;
            let (left, right) = halves(&self.keys, champion, loser);
            if index < left_count {
                champion = left;
                cursor = loser.left.as_deref();
            } else {
                index -= left_count;
                champion = right;
                cursor = loser.right.as_deref();
            }
        }
        Some(champion)
    }
}
