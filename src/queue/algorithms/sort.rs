use crate::queue::{connect, value_of, Node, Queue, GHOST};
use tracing::trace;

const INSERTION_SORT_THRESHOLD: usize = 8;

impl Queue {
    /// Sort the queue in ascending order, or descending order if `descend`
    /// is set, by byte-wise string comparison.
    ///
    /// This sort is stable (i.e., does not reorder equal elements) and
    /// relinks the nodes instead of moving values.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time and *O*(log(*n*))
    /// memory for the recursion.
    ///
    /// # Current Implementation
    ///
    /// The range is split at its midpoint, both halves are sorted recursively
    /// and then merged in place. Ranges of up to eight nodes are
    /// insertion-sorted.
    ///
    /// # Examples
    ///
    /// ```
    /// use list_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_iter(["3", "1", "2"]).unwrap();
    ///
    /// queue.sort(true);
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["3", "2", "1"]);
    ///
    /// queue.sort(false);
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["1", "2", "3"]);
    /// ```
    pub fn sort(&mut self, descend: bool) {
        if descend {
            merge_sort(self, |a, b| a > b);
        } else {
            merge_sort(self, |a, b| a < b);
        }
    }
}

fn merge_sort<F>(queue: &mut Queue, mut less: F)
where
    F: FnMut(&str, &str) -> bool,
{
    let len = queue.len();
    if len < 2 {
        return;
    }
    let start = queue.front_node();
    merge_sort_range(&mut queue.nodes, start, GHOST, &mut less);
    trace!(len = len, "sort");
}

fn mid_of_range(nodes: &[Node], mut start: usize, end: usize) -> (usize, usize) {
    let mut mid = start;
    let mut len = 0;
    while start != end {
        len += 1;
        start = nodes[start].next;
        if start != end {
            len += 1;
            start = nodes[start].next;
            mid = nodes[mid].next;
        }
    }
    (mid, len)
}

/// Sort the non-empty range `start..end` and return its new first node.
fn merge_sort_range<F>(nodes: &mut [Node], mut start: usize, end: usize, less: &mut F) -> usize
where
    F: FnMut(&str, &str) -> bool,
{
    let (mut mid, len) = mid_of_range(nodes, start, end);
    if len <= INSERTION_SORT_THRESHOLD {
        return insertion_sort_range(nodes, start, end, less);
    }

    // Both halves are non-empty here, and sorting one half never moves the
    // node that bounds it.
    start = merge_sort_range(nodes, start, mid, less);
    mid = merge_sort_range(nodes, mid, end, less);
    merge_range(nodes, start, mid, end, less)
}

/// Merge the sorted ranges `start..mid` and `mid..end` and return the new
/// first node of `start..end`.
fn merge_range<F>(
    nodes: &mut [Node],
    mut start: usize,
    mid: usize,
    end: usize,
    less: &mut F,
) -> usize
where
    F: FnMut(&str, &str) -> bool,
{
    // The range is logically partitioned into two sub-ranges, both of
    // which are internally sorted:
    // - merged range: `start..mid`,
    // - unmerged range: `mid..end`.
    //
    // Runs of the unmerged range are then moved one by one in front of
    // the first merged node they precede.
    let (mut merged, merged_back, mut to_merge) = (start, nodes[mid].prev, mid);
    // If the back of merged range <= the front of unmerged range,
    // it is fully sorted already.
    while to_merge != end && less(value_of(nodes, to_merge), value_of(nodes, merged_back)) {
        // Find the first `merged` whose value the node to merge precedes.
        while merged != to_merge && !less(value_of(nodes, to_merge), value_of(nodes, merged)) {
            merged = nodes[merged].next;
        }
        if merged == to_merge {
            break;
        }

        // Extend to the run `to_merge..next_to_merge` of nodes that all
        // precede `merged`.
        let mut next_to_merge = nodes[to_merge].next;
        while next_to_merge != end && less(value_of(nodes, next_to_merge), value_of(nodes, merged)) {
            next_to_merge = nodes[next_to_merge].next;
        }
        if merged == start {
            start = to_merge;
        }
        let run_back = nodes[next_to_merge].prev;
        move_nodes(nodes, to_merge, run_back, merged);
        to_merge = next_to_merge;
    }
    start
}

/// Insertion-sort the non-empty range `start..end` and return its new first
/// node.
fn insertion_sort_range<F>(nodes: &mut [Node], mut start: usize, end: usize, less: &mut F) -> usize
where
    F: FnMut(&str, &str) -> bool,
{
    let (mut sorted_back, mut to_sort) = (start, nodes[start].next);
    loop {
        // Skip over nodes that are already in order.
        while to_sort != end && !less(value_of(nodes, to_sort), value_of(nodes, sorted_back)) {
            sorted_back = to_sort;
            to_sort = nodes[to_sort].next;
        }
        if to_sort == end {
            break;
        }
        // Find the first `sorted` whose value the node to sort precedes.
        let mut sorted = start;
        while sorted != to_sort && !less(value_of(nodes, to_sort), value_of(nodes, sorted)) {
            sorted = nodes[sorted].next;
        }
        if sorted == start {
            start = to_sort;
        }
        let next = nodes[to_sort].next;
        move_nodes(nodes, to_sort, to_sort, sorted);
        to_sort = next;
    }
    start
}

/// Move the closed range `from_front..=from_back` in front of `to`.
fn move_nodes(nodes: &mut [Node], from_front: usize, from_back: usize, to: usize) {
    let (before, after) = (nodes[from_front].prev, nodes[from_back].next);
    connect(nodes, before, after);
    let to_prev = nodes[to].prev;
    connect(nodes, to_prev, from_front);
    connect(nodes, from_back, to);
}
