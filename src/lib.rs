//! This crate provides a queue of owned strings, built on a cyclic
//! doubly-linked list with a ghost (sentinel) node.
//!
//! The [`Queue`] inserts and removes at either end in constant time, and
//! offers a set of classic in-place list algorithms: middle deletion,
//! duplicate pruning, pairwise swapping, (group) reversal, monotonic pruning,
//! merge sort and k-way merging.
//!
//! Here is a quick example showing how the queue works.
//!
//! ```
//! use list_queue::Queue;
//!
//! let mut queue = Queue::new();
//! queue.insert_tail("a").unwrap();
//! queue.insert_tail("b").unwrap();
//! queue.insert_tail("c").unwrap();
//!
//! let element = queue.remove_head(None).unwrap();
//! assert_eq!(element.value(), "a");
//! assert_eq!(queue.size(), 2);
//!
//! queue.insert_head("d").unwrap();
//! queue.sort(false);
//! assert_eq!(queue.iter().collect::<Vec<_>>(), ["b", "c", "d"]);
//! ```
//!
//! # Memory Layout
//!
//! Nodes are kept in an arena and link to each other by index. The memory
//! layout of the queue is like the following graph:
//! ```text
//!          ┌─────────────────────────────────────────────────────────────────────┐
//!          ↓                                                      (Ghost) Slot 0 │
//!    ╔═══════════╗           ╔═══════════╗                        ┌───────────┐  │
//!    ║   next    ║ ────────→ ║   next    ║ ────────→ ┄┄ ────────→ │   next    │ ─┘
//!    ╟───────────╢           ╟───────────╢   Elements 2, 3, ...   ├───────────┤
//! ┌─ ║   prev    ║ ←──────── ║   prev    ║ ←──────── ┄┄ ←──────── │   prev    │
//! │  ╟───────────╢           ╟───────────╢                        ├───────────┤
//! │  ║  String   ║           ║  String   ║                        ┊ No value  ┊
//! │  ╚═══════════╝           ╚═══════════╝                        └╌╌╌╌╌╌╌╌╌╌╌┘
//! │   Element 0               Element 1                               ↑
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Initially, the ghost node links to itself. As elements are inserted,
//! `ghost.next` is the first element and `ghost.prev` the last one. Every
//! element owns its own copy of the inserted string.
//!
//! # Ownership
//!
//! [`Queue::remove_head`] and [`Queue::remove_tail`] hand the unlinked
//! [`Element`] to the caller. Structural operations such as
//! [`Queue::delete_mid`] or [`Queue::delete_dup`] release what they delete
//! themselves. Dropping the queue releases every remaining element.
//!
//! # Allocation Failure
//!
//! Insertion and merging report allocation failure as [`AllocError`] instead
//! of aborting, and leave the queue exactly as it was.
//!
//! # Logging
//!
//! Operations emit [`tracing`] events (`trace` for restructuring, `debug`
//! for merges, `warn` for allocation failures). No subscriber is installed
//! by the crate.

#[doc(inline)]
pub use error::{AllocError, InvariantError};
#[doc(inline)]
pub use queue::iterator::{IntoIter, Iter};
#[doc(inline)]
pub use queue::{merge, Element, Queue};

pub mod error;
pub mod queue;
