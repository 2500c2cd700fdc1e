//! Persistent (immutable) data structures.
//!
//! This module provides [`PersistentPrioritySearchQueue`], an immutable
//! container that is at the same time a sorted map over keys and a priority
//! queue over priorities. It uses structural sharing to minimize copying:
//! every operation that changes content returns a new version which shares
//! all untouched subtrees with the version it was derived from.
//!
//! # Examples
//!
//! ```rust
//! use pennant::persistent::PersistentPrioritySearchQueue;
//!
//! let queue = PersistentPrioritySearchQueue::new()
//!     .insert(5, 10)
//!     .insert(3, 7)
//!     .insert(8, 2)
//!     .insert(1, 9);
//!
//! // Priority queue view
//! assert_eq!(queue.peek_min(), Some((&8, &2)));
//!
//! // Sorted map view
//! let keys: Vec<&i32> = queue.keys().collect();
//! assert_eq!(keys, vec![&1, &3, &5, &8]);
//!
//! // Both at once: entries with priority <= 9, in key order
//! let cheap: Vec<(&i32, &i32)> = queue.at_most(9).collect();
//! assert_eq!(cheap, vec![(&1, &9), (&3, &7), (&8, &2)]);
//!
//! // Structural sharing: the original queue is preserved
//! let updated = queue.insert(5, 0);
//! assert_eq!(queue.get(&5), Some(&10));  // Original unchanged
//! assert_eq!(updated.get(&5), Some(&0)); // New version
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled (default), this is `std::sync::Arc`,
/// which makes every queue version shareable across threads.
///
/// When the `arc` feature is disabled, this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod priority_search_queue;

pub use priority_search_queue::BoundedIterator;
pub use priority_search_queue::PersistentPrioritySearchQueue;
pub use priority_search_queue::PersistentPrioritySearchQueueIntoIterator;
pub use priority_search_queue::PriorityIterator;
pub use priority_search_queue::PrioritySearchQueueError;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod reference_counter_tests {
    use super::ReferenceCounter;
    use rstest::rstest;

    #[rstest]
    fn test_reference_counter_clone() {
        let reference_counter: ReferenceCounter<i32> = ReferenceCounter::new(42);
        let reference_counter_clone = reference_counter.clone();
        assert_eq!(*reference_counter, *reference_counter_clone);
    }

    #[rstest]
    fn test_reference_counter_strong_count() {
        let reference_counter: ReferenceCounter<i32> = ReferenceCounter::new(42);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
        let reference_counter_clone = reference_counter.clone();
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 2);
        drop(reference_counter_clone);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
    }
}
