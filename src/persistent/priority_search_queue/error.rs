//! Error type for fallible queue operations.

use thiserror::Error;

/// Errors reported by [`PersistentPrioritySearchQueue`](super::PersistentPrioritySearchQueue).
///
/// Absence (a missing key, an empty queue) is never an error; those cases
/// return `Option`.
///
/// # Examples
///
/// ```rust
/// use pennant::persistent::{PersistentPrioritySearchQueue, PrioritySearchQueueError};
///
/// let result = PersistentPrioritySearchQueue::<i32, i32>::try_from_alternating([1, 10, 2]);
/// assert_eq!(
///     result.unwrap_err(),
///     PrioritySearchQueueError::MissingPriority { key_position: 2 }
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum PrioritySearchQueueError {
    /// An alternating key/priority sequence ended with a dangling key.
    #[error("key at position {key_position} has no priority")]
    MissingPriority {
        /// Zero-based position of the dangling key in the input sequence.
        key_position: usize,
    },

    /// The key is already present in the queue.
    #[error("key already present")]
    KeyAlreadyPresent,

    /// An index was outside `0..length`.
    #[error("index {index} out of bounds for length {length}")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// Number of entries in the queue.
        length: usize,
    },
}
