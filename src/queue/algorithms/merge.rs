//! Merging sorted queues.

use crate::error::AllocError;
use crate::queue::{Queue, GHOST};
use tracing::{debug, warn};

/// Merge every queue in `queues` into the first one.
///
/// Each queue must already be sorted in the order selected by `descend`. The
/// first queue ends up holding all elements in that order, and every other
/// queue ends up empty. Equal values keep the order of the queues they came
/// from. Returns the size of the merged queue.
///
/// Values are moved, never copied. Room for the incoming nodes is reserved
/// up front, so on `Err` no queue has been modified.
///
/// # Complexity
///
/// This operation should compute in *O*(*k* * *n*) time for *k* queues
/// holding *n* elements in total.
///
/// # Examples
///
/// ```
/// use list_queue::{merge, Queue};
///
/// let mut queues = [
///     Queue::try_from_iter(["1", "3", "5"]).unwrap(),
///     Queue::try_from_iter(["2", "4"]).unwrap(),
/// ];
///
/// assert_eq!(merge(&mut queues, false).unwrap(), 5);
/// assert_eq!(queues[0].iter().collect::<Vec<_>>(), ["1", "2", "3", "4", "5"]);
/// assert!(queues[1].is_empty());
/// ```
pub fn merge(queues: &mut [Queue], descend: bool) -> Result<usize, AllocError> {
    match queues.split_first_mut() {
        Some((primary, rest)) => primary.merge_from(rest, descend),
        None => Ok(0),
    }
}

impl Queue {
    /// Merge the sorted queues `others` into this sorted queue, draining them.
    ///
    /// See [`merge`] for details.
    pub fn merge_from(&mut self, others: &mut [Queue], descend: bool) -> Result<usize, AllocError> {
        let incoming: usize = others.iter().map(Queue::len).sum();
        self.merge_reserving(others, descend, incoming)
    }

    /// Reserve room for `reserve` nodes, then merge. Nothing is touched if
    /// the reservation fails.
    fn merge_reserving(
        &mut self,
        others: &mut [Queue],
        descend: bool,
        reserve: usize,
    ) -> Result<usize, AllocError> {
        self.reserve(reserve)
            .inspect_err(|err| warn!(error = %err, incoming = reserve, "merge failed"))?;
        let incoming: usize = others.iter().map(Queue::len).sum();
        for other in others.iter_mut() {
            self.merge_one(other, descend);
        }
        debug!(
            queues = others.len() + 1,
            merged = incoming,
            len = self.len(),
            "merge"
        );
        Ok(self.len())
    }

    /// Move every element of `other` into place, walking a single cursor
    /// forward through `self`. Nodes already in `self` win ties.
    fn merge_one(&mut self, other: &mut Queue, descend: bool) {
        let mut cursor = self.front_node();
        while let Some(element) = other.remove_head(None) {
            let value = element.into_value();
            while cursor != GHOST && !precedes(&value, self.value(cursor), descend) {
                cursor = self.next(cursor);
            }
            let node = self.place(value);
            self.attach_node(self.prev(cursor), cursor, node);
        }
        other.clear();
    }
}

fn precedes(a: &str, b: &str, descend: bool) -> bool {
    if descend {
        a > b
    } else {
        a < b
    }
}
