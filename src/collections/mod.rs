//! Backing data structures for the records core.
//!
//! Deliberately simple, single-threaded containers sized for
//! student-scale datasets:
//!
//! - [`SubjectSet`]: singly-linked, insertion-ordered, duplicate-free
//!   set of subject codes (O(n) membership)
//! - [`Stack`]: LIFO used for grade undo history
//! - [`Queue`]: FIFO used for deferred attendance ingest
//! - [`IndexTree`]: unbalanced binary search tree, the primary
//!   student-ID index
//!
//! None of these are internally synchronized; callers serialize access.

mod linked_set;
mod queue;
mod stack;
mod tree;

pub use linked_set::SubjectSet;
pub(crate) use linked_set::normalize_code;
pub use queue::Queue;
pub use stack::Stack;
pub use tree::IndexTree;
