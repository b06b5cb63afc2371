//! # zskiplist
//!
//! An in-memory ordered index: a rank-aware skip list keyed by a
//! composite (score: `f64`, value: `String`) pair, kept permanently
//! sorted. Expected O(log n) insertion, deletion, rank lookup,
//! value-by-rank lookup, and inclusive range queries/deletions —
//! the structure that backs a sorted-set primitive in a storage
//! engine.
//!
//! Keys are assumed unique by the caller; inserting the same
//! (score, value) pair twice silently creates a second entry. The
//! list performs no internal synchronization: wrap it in a lock for
//! concurrent access.
//!
//! ```
//! use zskiplist::{ScoreRange, SkipList};
//!
//! let mut list = SkipList::with_seed(42);
//! list.insert(3.0, "hello");
//! list.insert(9.0, "java");
//! list.insert(10.0, "golang");
//!
//! assert_eq!(list.rank(9.0, "java"), Ok(2));
//! assert_eq!(list.value_by_rank(3), Ok("golang"));
//! assert_eq!(list.first_in_range(&ScoreRange::new(4.0, 20.0)), Ok((9.0, "java")));
//! ```

/// Operation errors: `NotFound` and the crate-wide result alias.
pub mod error;
/// The rank-aware skip list: node/arena model, core operations,
/// score ranges, invariant validation.
pub mod skiplist;

pub use error::{SkipListError, SkipListResult};
pub use skiplist::{
    Iter, RangeIter, RevIter, ScoreRange, SkipList, SkipListStatistics, ValidationError, MAX_LEVEL,
};
