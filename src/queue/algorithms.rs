use crate::queue::{Queue, GHOST};
use std::hash::{Hash, Hasher};
use tracing::trace;

pub(crate) mod merge;
mod sort;

impl PartialEq for Queue {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other)
    }
}

impl Eq for Queue {}

impl Hash for Queue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut len = 0_usize;
        for elt in self {
            elt.hash(state);
            len += 1;
        }
        len.hash(state);
    }
}

impl Queue {
    /// Delete the middle element, the one at index ⌊*n* / 2⌋, and return
    /// `true`, or return `false` if the queue is empty.
    ///
    /// The middle is found with a slow and a fast pointer, both starting at
    /// the first element.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use list_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_iter(["a", "b", "c", "d"]).unwrap();
    /// assert!(queue.delete_mid());
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["a", "b", "d"]);
    /// ```
    pub fn delete_mid(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        let (mut slow, mut fast) = (self.front_node(), self.front_node());
        while fast != GHOST && self.next(fast) != GHOST {
            slow = self.next(slow);
            fast = self.next(self.next(fast));
        }
        self.delete_node(slow);
        trace!(remaining = self.len(), "delete_mid");
        true
    }

    /// Delete every element that belongs to a run of two or more adjacent
    /// equal values, keeping only values that were unique among their
    /// neighbors. Returns `false` if the queue is empty.
    ///
    /// The queue is expected to be sorted. On unsorted input only adjacent
    /// runs are removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use list_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_iter(["1", "2", "2", "3"]).unwrap();
    /// assert!(queue.delete_dup());
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["1", "3"]);
    /// ```
    pub fn delete_dup(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        let mut in_run = false;
        let mut removed = 0_usize;
        let mut current = self.front_node();
        while current != GHOST {
            let next = self.next(current);
            if next != GHOST && self.value(current) == self.value(next) {
                in_run = true;
                self.delete_node(current);
                removed += 1;
            } else if in_run {
                // last member of the run
                in_run = false;
                self.delete_node(current);
                removed += 1;
            }
            current = next;
        }
        trace!(removed = removed, "delete_dup");
        true
    }

    /// Exchange the values of every two adjacent elements. A trailing
    /// unpaired element is left alone.
    ///
    /// Values are moved between nodes; the links are not touched.
    pub fn swap(&mut self) {
        let mut first = self.front_node();
        while first != GHOST {
            let second = self.next(first);
            if second == GHOST {
                break;
            }
            self.swap_elements(first, second);
            first = self.next(second);
        }
    }

    /// Reverse the order of the values.
    ///
    /// # Examples
    ///
    /// ```
    /// use list_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_iter(["1", "2", "3"]).unwrap();
    /// queue.reverse();
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["3", "2", "1"]);
    /// ```
    pub fn reverse(&mut self) {
        if !self.is_empty() {
            self.reverse_range(self.front_node(), self.back_node());
        }
    }

    /// Reverse the values in each consecutive block of `k` elements.
    ///
    /// A trailing block shorter than `k` is left as is. If the whole queue is
    /// shorter than `k` it is reversed as a single block. `k < 2` does
    /// nothing.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use list_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_iter(["1", "2", "3", "4", "5"]).unwrap();
    /// queue.reverse_k(2);
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["2", "1", "4", "3", "5"]);
    /// ```
    pub fn reverse_k(&mut self, k: usize) {
        if k < 2 {
            return;
        }
        let mut front = self.front_node();
        while front != GHOST {
            match self.block_back(front, k) {
                Some(back) => {
                    let next = self.next(back);
                    self.reverse_range(front, back);
                    front = next;
                }
                None => {
                    if front == self.front_node() {
                        self.reverse();
                    }
                    break;
                }
            }
        }
    }

    /// Delete every element that has a strictly smaller value somewhere after
    /// it. Returns the number of elements left.
    ///
    /// # Examples
    ///
    /// ```
    /// use list_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_iter(["1", "5", "2", "3"]).unwrap();
    /// assert_eq!(queue.ascend(), 3);
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["1", "2", "3"]);
    /// ```
    pub fn ascend(&mut self) -> usize {
        self.prune_monotonic(|top, current| top > current)
    }

    /// Delete every element that has a strictly greater value somewhere after
    /// it. Returns the number of elements left.
    ///
    /// # Examples
    ///
    /// ```
    /// use list_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_iter(["5", "2", "6", "1"]).unwrap();
    /// assert_eq!(queue.descend(), 2);
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["6", "1"]);
    /// ```
    pub fn descend(&mut self) -> usize {
        self.prune_monotonic(|top, current| top < current)
    }

    /// The kept prefix `front..current` acts as a monotonic stack whose top is
    /// `current.prev`. Each new element pops the tops it dominates, so every
    /// element is deleted at most once.
    fn prune_monotonic<F>(&mut self, dominated: F) -> usize
    where
        F: Fn(&str, &str) -> bool,
    {
        let mut kept = 0_usize;
        let mut removed = 0_usize;
        let mut current = self.front_node();
        while current != GHOST {
            let mut top = self.prev(current);
            while top != GHOST && dominated(self.value(top), self.value(current)) {
                self.delete_node(top);
                kept -= 1;
                removed += 1;
                top = self.prev(current);
            }
            kept += 1;
            current = self.next(current);
        }
        trace!(kept = kept, removed = removed, "prune_monotonic");
        kept
    }

    /// Reverse the values of the closed range `front..=back` by walking two
    /// pointers inward.
    fn reverse_range(&mut self, mut front: usize, mut back: usize) {
        while front != back {
            self.swap_elements(front, back);
            if self.next(front) == back {
                break;
            }
            front = self.next(front);
            back = self.prev(back);
        }
    }

    /// The last node of the block of `k` nodes starting at `front`, or `None`
    /// if fewer than `k` nodes remain.
    fn block_back(&self, front: usize, k: usize) -> Option<usize> {
        let mut back = front;
        for _ in 1..k {
            back = self.next(back);
            if back == GHOST {
                return None;
            }
        }
        Some(back)
    }
}
