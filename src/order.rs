//! Pluggable total orders for keys and priorities.
//!
//! A [`PersistentPrioritySearchQueue`](crate::persistent::PersistentPrioritySearchQueue)
//! is parameterized by two independent order relations: one over keys and
//! one over priorities. Both are expressed through the [`Comparator`] trait,
//! which has a single `compare` operation.
//!
//! - [`NaturalOrder`]: delegates to [`Ord`] (the default for both orders)
//! - [`ReverseOrder`]: reverses another comparator
//! - Any `Fn(&T, &T) -> Ordering` closure
//!
//! # Contract
//!
//! A comparator must be a valid total order (reflexive, antisymmetric,
//! transitive, total) and must not change its answers over the lifetime of
//! a queue. Violations are not detected at runtime; they silently produce
//! incorrect query results.
//!
//! # Examples
//!
//! ```rust
//! use pennant::order::{Comparator, NaturalOrder, ReverseOrder};
//! use std::cmp::Ordering;
//!
//! assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
//! assert_eq!(ReverseOrder(NaturalOrder).compare(&1, &2), Ordering::Greater);
//!
//! let by_length = |left: &&str, right: &&str| left.len().cmp(&right.len());
//! assert_eq!(by_length.compare(&"abc", &"de"), Ordering::Greater);
//! ```

use std::cmp::Ordering;

/// A total order over values of type `T`.
pub trait Comparator<T: ?Sized> {
    /// Compares two values.
    fn compare(&self, left: &T, right: &T) -> Ordering;

    /// Returns `true` if `left` orders strictly before `right`.
    #[inline]
    fn less(&self, left: &T, right: &T) -> bool {
        self.compare(left, right) == Ordering::Less
    }

    /// Returns `true` if `left` orders before or equal to `right`.
    #[inline]
    fn less_or_equal(&self, left: &T, right: &T) -> bool {
        self.compare(left, right) != Ordering::Greater
    }

    /// Returns `true` if `left` and `right` are equivalent under this order.
    #[inline]
    fn equivalent(&self, left: &T, right: &T) -> bool {
        self.compare(left, right) == Ordering::Equal
    }
}

/// The order given by the type's [`Ord`] implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, left: &T, right: &T) -> Ordering {
        left.cmp(right)
    }
}

/// The reverse of another comparator.
///
/// Using `ReverseOrder(NaturalOrder)` as the priority order turns a queue
/// into a max-priority queue.
///
/// # Examples
///
/// ```rust
/// use pennant::order::{NaturalOrder, ReverseOrder};
/// use pennant::persistent::PersistentPrioritySearchQueue;
///
/// let queue = PersistentPrioritySearchQueue::with_comparators(
///     NaturalOrder,
///     ReverseOrder(NaturalOrder),
/// )
/// .insert("low", 1)
/// .insert("high", 9);
///
/// assert_eq!(queue.peek_min(), Some((&"high", &9)));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReverseOrder<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for ReverseOrder<C> {
    #[inline]
    fn compare(&self, left: &T, right: &T) -> Ordering {
        self.0.compare(right, left)
    }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, left: &T, right: &T) -> Ordering {
        self(left, right)
    }
}
