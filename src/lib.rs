//! # pennant
//!
//! A persistent priority search queue for Rust: one immutable container
//! that is both a sorted map over keys and a min-priority queue over the
//! same entries.
//!
//! ## Overview
//!
//! Every entry is a `(key, priority)` pair. The queue answers map queries
//! (lookup, rank, predecessor and successor, key ranges), priority queries
//! (minimum, pop, priority order) and the combination of the two: "every
//! entry whose priority is at most `p` and whose key lies in `lo..=hi`",
//! in key order and without scanning entries that cannot match.
//!
//! Updates return new versions. Old versions stay valid and share every
//! untouched subtree with the versions derived from them.
//!
//! ## Modules
//!
//! - [`persistent`]: [`PersistentPrioritySearchQueue`](persistent::PersistentPrioritySearchQueue)
//!   and its iterators
//! - [`order`]: the [`Comparator`](order::Comparator) trait for custom key
//!   and priority orders
//!
//! ## Feature Flags
//!
//! - `arc` (default): share nodes through `Arc`, making queues `Send + Sync`;
//!   without it nodes are shared through `Rc`
//! - `serde`: `Serialize` / `Deserialize` as a key to priority map
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use pennant::prelude::*;
//!
//! let timers = PersistentPrioritySearchQueue::new()
//!     .insert("heartbeat", 30)
//!     .insert("retry", 5)
//!     .insert("flush", 12);
//!
//! let (pending, (name, deadline)) = timers.pop_min().unwrap();
//! assert_eq!((name, deadline), ("retry", 5));
//! assert_eq!(pending.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the queue, its iterators and the comparators.
///
/// # Usage
///
/// ```rust
/// use pennant::prelude::*;
/// ```
pub mod prelude {
    pub use crate::order::*;
    pub use crate::persistent::*;
}

pub mod order;
pub mod persistent;
