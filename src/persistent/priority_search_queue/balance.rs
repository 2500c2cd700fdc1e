//! Weight-based rebalancing of the loser tree.
//!
//! Sibling subtrees may differ in size by at most a factor of [`OMEGA`]
//! (nodes whose children hold fewer than two entries in total are exempt).
//!
//! [`Orders::balance`] joins two balanced loser trees of arbitrary sizes
//! under a new node: while one side is too heavy it descends that side's
//! inner spine, builds the inner node recursively and finishes every level
//! with one rotation step. Rotations are priority aware: when two losers
//! trade places, the one that stays on top must be the one that lost the
//! higher-up match, otherwise the heap order between winners and losers
//! would break.

use super::Orders;
use super::node::{Link, Loser, size};
use crate::order::Comparator;
use crate::persistent::ReferenceCounter;

/// Balance factor: a subtree may be at most `OMEGA` times its sibling.
pub(crate) const OMEGA: usize = 4;

#[inline]
const fn weight(size: usize) -> usize {
    OMEGA * size
}

/// Whether two sibling sizes satisfy the weight-balance invariant.
#[inline]
pub(crate) const fn balanced(left_size: usize, right_size: usize) -> bool {
    left_size + right_size < 2 || (left_size <= weight(right_size) && right_size <= weight(left_size))
}

type Entry<K, P> = (K, P);

impl<KC, PC> Orders<KC, PC> {
    /// Builds a loser node over `left` and `right`, balanced at every level.
    ///
    /// `left` and `right` must each be balanced; their sizes are arbitrary.
    pub(crate) fn balance<K, P>(
        &self,
        key: K,
        priority: P,
        left: Link<K, P>,
        split: K,
        right: Link<K, P>,
    ) -> ReferenceCounter<Loser<K, P>>
    where
        K: Clone,
        P: Clone,
        KC: Comparator<K>,
        PC: Comparator<P>,
    {
        let left_size = size(left.as_ref());
        let right_size = size(right.as_ref());

        if balanced(left_size, right_size) {
            return Loser::new(key, priority, left, split, right);
        }
        if right_size > weight(left_size)
            && let Some(heavy) = &right
        {
            let (outer, inner) = self.arrange_left((key, priority), heavy);
            let inner = self.balance(inner.0, inner.1, left, split, heavy.left.clone());
            return self.rotate(
                outer.0,
                outer.1,
                Some(inner),
                heavy.split.clone(),
                heavy.right.clone(),
            );
        }
        if let Some(heavy) = &left {
            let (outer, inner) = self.arrange_right((key, priority), heavy);
            let inner = self.balance(inner.0, inner.1, heavy.right.clone(), split, right);
            return self.rotate(
                outer.0,
                outer.1,
                heavy.left.clone(),
                heavy.split.clone(),
                Some(inner),
            );
        }
        Loser::new(key, priority, left, split, right)
    }

    /// Decides which entry stays on top when `heavy` (a right child) moves up.
    ///
    /// Returns `(outer, inner)`.
    fn arrange_left<K, P>(
        &self,
        entry: Entry<K, P>,
        heavy: &Loser<K, P>,
    ) -> (Entry<K, P>, Entry<K, P>)
    where
        K: Clone,
        P: Clone,
        KC: Comparator<K>,
        PC: Comparator<P>,
    {
        let child = (heavy.key.clone(), heavy.priority.clone());
        // The child came from the left half and we beat it: we stay on top.
        if self.keys.less_or_equal(&heavy.key, &heavy.split)
            && self.priorities.less_or_equal(&entry.1, &heavy.priority)
        {
            (entry, child)
        } else {
            (child, entry)
        }
    }

    /// Mirror of [`arrange_left`](Self::arrange_left) for a left child.
    fn arrange_right<K, P>(
        &self,
        entry: Entry<K, P>,
        heavy: &Loser<K, P>,
    ) -> (Entry<K, P>, Entry<K, P>)
    where
        K: Clone,
        P: Clone,
        KC: Comparator<K>,
        PC: Comparator<P>,
    {
        let child = (heavy.key.clone(), heavy.priority.clone());
        if !self.keys.less_or_equal(&heavy.key, &heavy.split)
            && self.priorities.less_or_equal(&entry.1, &heavy.priority)
        {
            (entry, child)
        } else {
            (child, entry)
        }
    }

    /// One rebalancing step: at most a single or a double rotation.
    ///
    /// Of the two rotations, the one whose new nodes all come out balanced
    /// is taken; when both do, the inner/outer size ratio of the heavy child
    /// decides.
    fn rotate<K, P>(
        &self,
        key: K,
        priority: P,
        left: Link<K, P>,
        split: K,
        right: Link<K, P>,
    ) -> ReferenceCounter<Loser<K, P>>
    where
        K: Clone,
        P: Clone,
        KC: Comparator<K>,
        PC: Comparator<P>,
    {
        let left_size = size(left.as_ref());
        let right_size = size(right.as_ref());

        if balanced(left_size, right_size) {
            return Loser::new(key, priority, left, split, right);
        }
        if right_size > weight(left_size)
            && let Some(heavy) = &right
        {
            let prefer_single = size(heavy.left.as_ref()) < size(heavy.right.as_ref());
            let single = single_left_balances(left_size, heavy);
            let double = double_left_balances(left_size, heavy);
            return if choose_single(prefer_single, single, double) {
                self.single_left(key, priority, left, split, heavy)
            } else {
                self.double_left(key, priority, left, split, heavy)
            };
        }
        if let Some(heavy) = &left {
            let prefer_single = size(heavy.right.as_ref()) < size(heavy.left.as_ref());
            let single = single_right_balances(heavy, right_size);
            let double = double_right_balances(heavy, right_size);
            return if choose_single(prefer_single, single, double) {
                self.single_right(key, priority, heavy, split, right)
            } else {
                self.double_right(key, priority, heavy, split, right)
            };
        }
        Loser::new(key, priority, left, split, right)
    }

    fn single_left<K, P>(
        &self,
        key: K,
        priority: P,
        left: Link<K, P>,
        split: K,
        right: &ReferenceCounter<Loser<K, P>>,
    ) -> ReferenceCounter<Loser<K, P>>
    where
        K: Clone,
        P: Clone,
        KC: Comparator<K>,
        PC: Comparator<P>,
    {
        let (outer, inner) = self.arrange_left((key, priority), right);
        let inner = Loser::new(inner.0, inner.1, left, split, right.left.clone());
        Loser::new(
            outer.0,
            outer.1,
            Some(inner),
            right.split.clone(),
            right.right.clone(),
        )
    }

    fn single_right<K, P>(
        &self,
        key: K,
        priority: P,
        left: &ReferenceCounter<Loser<K, P>>,
        split: K,
        right: Link<K, P>,
    ) -> ReferenceCounter<Loser<K, P>>
    where
        K: Clone,
        P: Clone,
        KC: Comparator<K>,
        PC: Comparator<P>,
    {
        let (outer, inner) = self.arrange_right((key, priority), left);
        let inner = Loser::new(inner.0, inner.1, left.right.clone(), split, right);
        Loser::new(
            outer.0,
            outer.1,
            left.left.clone(),
            left.split.clone(),
            Some(inner),
        )
    }

    fn double_left<K, P>(
        &self,
        key: K,
        priority: P,
        left: Link<K, P>,
        split: K,
        right: &ReferenceCounter<Loser<K, P>>,
    ) -> ReferenceCounter<Loser<K, P>>
    where
        K: Clone,
        P: Clone,
        KC: Comparator<K>,
        PC: Comparator<P>,
    {
        let rotated = match &right.left {
            Some(inner) => self.single_right(
                right.key.clone(),
                right.priority.clone(),
                inner,
                right.split.clone(),
                right.right.clone(),
            ),
            None => ReferenceCounter::clone(right),
        };
        self.single_left(key, priority, left, split, &rotated)
    }

    fn double_right<K, P>(
        &self,
        key: K,
        priority: P,
        left: &ReferenceCounter<Loser<K, P>>,
        split: K,
        right: Link<K, P>,
    ) -> ReferenceCounter<Loser<K, P>>
    where
        K: Clone,
        P: Clone,
        KC: Comparator<K>,
        PC: Comparator<P>,
    {
        let rotated = match &left.right {
            Some(inner) => self.single_left(
                left.key.clone(),
                left.priority.clone(),
                left.left.clone(),
                left.split.clone(),
                inner,
            ),
            None => ReferenceCounter::clone(left),
        };
        self.single_right(key, priority, &rotated, split, right)
    }
}

const fn choose_single(prefer_single: bool, single: bool, double: bool) -> bool {
    if prefer_single {
        single || !double
    } else {
        single && !double
    }
}

fn single_left_balances<K, P>(left_size: usize, heavy: &Loser<K, P>) -> bool {
    let inner_left = size(heavy.left.as_ref());
    balanced(left_size, inner_left)
        && balanced(left_size + inner_left + 1, size(heavy.right.as_ref()))
}

fn double_left_balances<K, P>(left_size: usize, heavy: &Loser<K, P>) -> bool {
    let Some(middle) = &heavy.left else {
        return false;
    };
    let outer_right = size(heavy.right.as_ref());
    let middle_left = size(middle.left.as_ref());
    let middle_right = size(middle.right.as_ref());
    balanced(left_size, middle_left)
        && balanced(middle_right, outer_right)
        && balanced(left_size + middle_left + 1, middle_right + outer_right + 1)
}

fn single_right_balances<K, P>(heavy: &Loser<K, P>, right_size: usize) -> bool {
    let inner_right = size(heavy.right.as_ref());
    balanced(inner_right, right_size)
        && balanced(size(heavy.left.as_ref()), inner_right + right_size + 1)
}

fn double_right_balances<K, P>(heavy: &Loser<K, P>, right_size: usize) -> bool {
    let Some(middle) = &heavy.right else {
        return false;
    };
    let outer_left = size(heavy.left.as_ref());
    let middle_left = size(middle.left.as_ref());
    let middle_right = size(middle.right.as_ref());
    balanced(outer_left, middle_left)
        && balanced(middle_right, right_size)
        && balanced(outer_left + middle_left + 1, middle_right + right_size + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::NaturalOrder;
    use rstest::rstest;

    fn orders() -> Orders<NaturalOrder, NaturalOrder> {
        Orders {
            keys: NaturalOrder,
            priorities: NaturalOrder,
        }
    }

    fn assert_balanced(link: Option<&ReferenceCounter<Loser<i32, i32>>>) {
        if let Some(loser) = link {
            let left_size = size(loser.left.as_ref());
            let right_size = size(loser.right.as_ref());
            assert!(
                balanced(left_size, right_size),
                "unbalanced node: {left_size} vs {right_size}"
            );
            assert_eq!(loser.size, left_size + right_size + 1);
            assert_balanced(loser.left.as_ref());
            assert_balanced(loser.right.as_ref());
        }
    }

    #[rstest]
    #[case(0, 0, true)]
    #[case(1, 0, true)]
    #[case(2, 0, false)]
    #[case(4, 1, true)]
    #[case(5, 1, false)]
    #[case(1, 5, false)]
    #[case(8, 2, true)]
    fn test_balanced(#[case] left: usize, #[case] right: usize, #[case] expected: bool) {
        assert_eq!(balanced(left, right), expected);
    }

    #[rstest]
    fn test_balance_small_nodes_untouched() {
        let leaf = Some(Loser::new(1, 6, None, 1, None));
        let node = orders().balance(2, 5, leaf, 1, None);
        assert_eq!(node.key, 2);
        assert_eq!(node.size, 2);
        assert_eq!(node.split, 1);
    }

    #[rstest]
    fn test_balance_rotates_heavy_right_side() {
        let orders = orders();
        let mut right: Link<i32, i32> = None;
        for key in (2..8).rev() {
            right = Some(orders.balance(key, key * 10, None, key, right));
        }
        let node = orders.balance(1, 100, None, 1, right);
        assert_eq!(node.size, 7);
        assert_balanced(Some(&node));
    }

    #[rstest]
    fn test_balance_joins_very_different_sizes() {
        let orders = orders();
        let mut heavy: Link<i32, i32> = None;
        for key in (1..200).rev() {
            heavy = Some(orders.balance(key, key, None, key, heavy));
        }
        assert_balanced(heavy.as_ref());
        let node = orders.balance(0, 0, None, 0, heavy);
        assert_eq!(node.size, 200);
        assert_balanced(Some(&node));
    }
}
