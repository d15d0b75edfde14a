//! Errors reported by the queue.
//!
//! Allocation failure is the only way a mutating call can fail. Everything
//! else (an empty queue, a group size below two) is a no-op reported through
//! `bool` or `Option` results.

use std::collections::TryReserveError;
use thiserror::Error;

/// Returned when the queue cannot allocate storage for a new element.
///
/// The queue is left exactly as it was before the failing call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocError {
    /// No arena slot could be reserved for the node.
    #[error("failed to allocate a queue node")]
    Node(#[source] TryReserveError),
    /// The owned copy of a value of `len` bytes could not be allocated.
    #[error("failed to allocate {len} bytes for an element value")]
    Value {
        len: usize,
        #[source]
        source: TryReserveError,
    },
}

/// Returned by [`Queue::check_invariants`](crate::Queue::check_invariants)
/// when the ring structure is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    pub fn message(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reserve_error() -> TryReserveError {
        Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err()
    }

    #[test]
    fn alloc_error_display() {
        assert_eq!(
            AllocError::Node(reserve_error()).to_string(),
            "failed to allocate a queue node"
        );
        let err = AllocError::Value {
            len: 12,
            source: reserve_error(),
        };
        assert_eq!(err.to_string(), "failed to allocate 12 bytes for an element value");
    }

    #[test]
    fn alloc_error_has_source() {
        use std::error::Error;
        assert!(AllocError::Node(reserve_error()).source().is_some());
    }

    #[test]
    fn invariant_error_message() {
        let err = InvariantError::new("broken prev link");
        assert_eq!(err.message(), "broken prev link");
        assert_eq!(err.to_string(), "broken prev link");
    }
}
