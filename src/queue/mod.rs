use std::fmt::{self, Debug, Display, Formatter};
use std::ops::Deref;

use tracing::{trace, warn};

use crate::error::{AllocError, InvariantError};
use crate::{IntoIter, Iter};

pub mod iterator;

mod algorithms;

pub use algorithms::merge::merge;

/// Arena index of the ghost node.
pub(crate) const GHOST: usize = 0;

/// The `Queue` is a queue of owned strings, backed by a cyclic doubly-linked
/// list with a ghost (sentinel) node.
///
/// Nodes live in an arena and link to each other by index. The ghost node is
/// always at index 0 and carries no payload; the queue is empty iff the ghost
/// links to itself.
///
/// The `Queue` contains:
/// - the node arena, with vacant slots recycled through a free list;
/// - a length field `len` indicating the length of the queue. It can be disabled by
///   disabling the `length` feature in your `Cargo.toml`:
/// ```text
/// [dependencies]
/// list_queue = { default-features = false }
/// ```
///
/// # Naming Conventions
///
/// - `front..=back`: a closed range of queue nodes, both inclusive;
/// - `start..end`: a half-open range of queue nodes, left inclusive and right
///   exclusive (probably the ghost node).
pub struct Queue {
    nodes: Vec<Node>,
    /// vacant slots; its capacity always covers every non-ghost slot so that
    /// releasing a node never reallocates
    free: Vec<usize>,
    #[cfg(feature = "length")]
    /// the length of the queue
    len: usize,
}

#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) next: usize,
    pub(crate) prev: usize,
    /// `None` for the ghost node and vacant slots.
    pub(crate) element: Option<String>,
}

/// An element unlinked from a [`Queue`] by [`Queue::remove_head`] or
/// [`Queue::remove_tail`].
///
/// The caller owns it; dropping it releases the value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Element {
    value: String,
}

impl Element {
    /// The value carried by the element.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Take the value out of the element.
    pub fn into_value(self) -> String {
        self.value
    }
}

impl Deref for Element {
    type Target = str;

    fn deref(&self) -> &str {
        &self.value
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

pub(crate) fn connect(nodes: &mut [Node], prev: usize, next: usize) {
    nodes[prev].next = next;
    nodes[next].prev = prev;
}

pub(crate) fn value_of(nodes: &[Node], node: usize) -> &str {
    nodes[node].element.as_deref().unwrap_or("")
}

// private methods
impl Queue {
    pub(crate) fn front_node(&self) -> usize {
        self.nodes[GHOST].next
    }
    pub(crate) fn back_node(&self) -> usize {
        self.nodes[GHOST].prev
    }
    pub(crate) fn next(&self, node: usize) -> usize {
        self.nodes[node].next
    }
    pub(crate) fn prev(&self, node: usize) -> usize {
        self.nodes[node].prev
    }
    pub(crate) fn value(&self, node: usize) -> &str {
        value_of(&self.nodes, node)
    }

    /// Make sure `additional` nodes can be placed without reallocating.
    pub(crate) fn reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        let grow = additional.saturating_sub(self.free.len());
        if grow == 0 {
            return Ok(());
        }
        self.nodes.try_reserve(grow).map_err(AllocError::Node)?;
        self.free
            .try_reserve(self.nodes.len() + grow - self.free.len())
            .map_err(AllocError::Node)
    }

    /// Put `value` into a vacant slot and return its index. The node is
    /// not linked yet.
    ///
    /// Must be preceded by a successful [`Queue::reserve`].
    pub(crate) fn place(&mut self, value: String) -> usize {
        match self.free.pop() {
            Some(node) => {
                self.nodes[node].element = Some(value);
                node
            }
            None => {
                let node = self.nodes.len();
                self.nodes.push(Node {
                    next: node,
                    prev: node,
                    element: Some(value),
                });
                node
            }
        }
    }

    /// Attach a single placed node `node` between the adjacent nodes `prev`
    /// and `next`.
    pub(crate) fn attach_node(&mut self, prev: usize, next: usize, node: usize) {
        debug_assert_eq!(self.nodes[prev].next, next);
        debug_assert_eq!(self.nodes[next].prev, prev);
        connect(&mut self.nodes, prev, node);
        connect(&mut self.nodes, node, next);
        #[cfg(feature = "length")]
        {
            self.len += 1;
        }
    }

    /// Detach the non-ghost node `node`, release its slot and move its value
    /// out.
    pub(crate) fn detach_node(&mut self, node: usize) -> String {
        debug_assert_ne!(node, GHOST, "the ghost node is never detached");
        let (prev, next) = (self.prev(node), self.next(node));
        connect(&mut self.nodes, prev, next);
        #[cfg(feature = "length")]
        {
            self.len -= 1;
        }
        let slot = &mut self.nodes[node];
        slot.next = node;
        slot.prev = node;
        let value = slot.element.take().unwrap_or_default();
        self.free.push(node);
        value
    }

    /// Unlink `node` and release its value inside the queue.
    pub(crate) fn delete_node(&mut self, node: usize) {
        drop(self.detach_node(node));
    }

    /// Exchange the values of two nodes, leaving the links untouched.
    pub(crate) fn swap_elements(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let first = self.nodes[a].element.take();
        let second = std::mem::replace(&mut self.nodes[b].element, first);
        self.nodes[a].element = second;
    }

    fn insert_before(&mut self, next: usize, s: &str) -> Result<(), AllocError> {
        self.reserve(1)?;
        let value = duplicate(s)?;
        let node = self.place(value);
        self.attach_node(self.prev(next), next, node);
        Ok(())
    }
}

/// Take an owned copy of `s`, reporting allocation failure instead of
/// aborting.
fn duplicate(s: &str) -> Result<String, AllocError> {
    let mut value = String::new();
    value
        .try_reserve_exact(s.len())
        .map_err(|source| AllocError::Value {
            len: s.len(),
            source,
        })?;
    value.push_str(s);
    Ok(value)
}

fn copy_truncated(value: &str, buf: &mut [u8]) {
    if let Some(capacity) = buf.len().checked_sub(1) {
        let n = value.len().min(capacity);
        buf[..n].copy_from_slice(&value.as_bytes()[..n]);
        buf[n] = 0;
    }
}

impl Queue {
    /// Create an empty `Queue`.
    ///
    /// # Examples
    /// ```
    /// use list_queue::Queue;
    /// let queue = Queue::new();
    /// assert!(queue.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty `Queue` with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.saturating_add(1));
        nodes.push(Node {
            next: GHOST,
            prev: GHOST,
            element: None,
        });
        Self {
            nodes,
            free: Vec::with_capacity(capacity),
            #[cfg(feature = "length")]
            len: 0,
        }
    }

    /// Create an empty `Queue`, or return `Err` if the ghost node cannot be
    /// allocated.
    pub fn try_new() -> Result<Self, AllocError> {
        let mut nodes = Vec::new();
        nodes.try_reserve(1).map_err(AllocError::Node)?;
        nodes.push(Node {
            next: GHOST,
            prev: GHOST,
            element: None,
        });
        Ok(Self {
            nodes,
            free: Vec::new(),
            #[cfg(feature = "length")]
            len: 0,
        })
    }

    /// Build a queue holding owned copies of `values`, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use list_queue::Queue;
    ///
    /// let queue = Queue::try_from_iter(["a", "b", "c"]).unwrap();
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["a", "b", "c"]);
    /// ```
    pub fn try_from_iter<I, S>(values: I) -> Result<Self, AllocError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut queue = Self::new();
        for value in values {
            queue.insert_tail(value.as_ref())?;
        }
        Ok(queue)
    }

    /// Returns `true` if the `Queue` is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.front_node() == GHOST
    }

    /// Returns the length of the `Queue`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time, or *O*(*n*) time if the
    /// `length` feature is disabled.
    #[cfg(feature = "length")]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[cfg(not(feature = "length"))]
    pub fn len(&self) -> usize {
        self.size()
    }

    /// Count the elements by walking the ring from the ghost node back to
    /// itself.
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
    /// let mut queue = Queue::new();
    /// assert_eq!(queue.size(), 0);
    /// queue.insert_tail("a").unwrap();
    /// queue.insert_head("b").unwrap();
    /// assert_eq!(queue.size(), 2);
    /// ```
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut node = self.front_node();
        while node != GHOST {
            count += 1;
            node = self.next(node);
        }
        count
    }

    /// Provides the first value, or `None` if the queue is empty.
    pub fn front(&self) -> Option<&str> {
        self.nodes[self.front_node()].element.as_deref()
    }

    /// Provides the last value, or `None` if the queue is empty.
    pub fn back(&self) -> Option<&str> {
        self.nodes[self.back_node()].element.as_deref()
    }

    /// Insert an owned copy of `s` at the head of the queue.
    ///
    /// On allocation failure the queue is left unchanged.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use list_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_head("b").unwrap();
    /// queue.insert_head("a").unwrap();
    /// assert_eq!(queue.front(), Some("a"));
    /// assert_eq!(queue.back(), Some("b"));
    /// ```
    pub fn insert_head(&mut self, s: &str) -> Result<(), AllocError> {
        self.insert_before(self.front_node(), s)
            .inspect_err(|err| warn!(error = %err, "insert_head failed"))
    }

    /// Insert an owned copy of `s` at the tail of the queue.
    ///
    /// On allocation failure the queue is left unchanged.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    pub fn insert_tail(&mut self, s: &str) -> Result<(), AllocError> {
        self.insert_before(GHOST, s)
            .inspect_err(|err| warn!(error = %err, "insert_tail failed"))
    }

    /// Unlink the first element and hand it to the caller, or return `None`
    /// if the queue is empty.
    ///
    /// If `buf` is given and non-empty, up to `buf.len() - 1` bytes of the
    /// value are copied into it, followed by a NUL byte. Longer values are
    /// silently truncated.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use list_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_iter(["hello", "world"]).unwrap();
    /// let mut buf = [0xffu8; 4];
    ///
    /// let element = queue.remove_head(Some(&mut buf[..])).unwrap();
    /// assert_eq!(element.value(), "hello");
    /// assert_eq!(&buf, b"hel\0");
    /// assert_eq!(queue.size(), 1);
    /// ```
    pub fn remove_head(&mut self, buf: Option<&mut [u8]>) -> Option<Element> {
        if self.is_empty() {
            return None;
        }
        Some(self.remove_node(self.front_node(), buf))
    }

    /// Unlink the last element and hand it to the caller, or return `None`
    /// if the queue is empty.
    ///
    /// `buf` is filled the same way as in [`Queue::remove_head`].
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    pub fn remove_tail(&mut self, buf: Option<&mut [u8]>) -> Option<Element> {
        if self.is_empty() {
            return None;
        }
        Some(self.remove_node(self.back_node(), buf))
    }

    fn remove_node(&mut self, node: usize, buf: Option<&mut [u8]>) -> Element {
        let value = self.detach_node(node);
        if let Some(buf) = buf {
            copy_truncated(&value, buf);
        }
        Element { value }
    }

    /// Release every element, walking from the first element to the ghost
    /// node. The queue stays usable.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    pub fn clear(&mut self) {
        let mut node = self.front_node();
        let mut released = 0_usize;
        while node != GHOST {
            let next = self.next(node);
            drop(self.nodes[node].element.take());
            released += 1;
            node = next;
        }
        self.nodes.truncate(1);
        self.free.clear();
        connect(&mut self.nodes, GHOST, GHOST);
        #[cfg(feature = "length")]
        {
            self.len = 0;
        }
        if released > 0 {
            trace!(released = released, "clear");
        }
    }

    /// Provides a forward iterator over the values.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Walk the whole ring and verify its structure.
    ///
    /// Checks that following `next` from the ghost node returns to it, that
    /// `prev` does the same in reverse with the same count, that every link is
    /// mirrored, that every element carries a value, and that the arena
    /// bookkeeping agrees with the walk.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.nodes[GHOST].element.is_some() {
            return Err(InvariantError::new("ghost node carries a value"));
        }
        let limit = self.nodes.len();

        let mut forward = 0;
        let mut node = GHOST;
        loop {
            let next = self.next(node);
            if next >= limit {
                return Err(InvariantError::new(format!(
                    "node {} links to out-of-bounds node {}",
                    node, next
                )));
            }
            if self.prev(next) != node {
                return Err(InvariantError::new(format!(
                    "node {} links to {}, which does not link back",
                    node, next
                )));
            }
            if next == GHOST {
                break;
            }
            if self.nodes[next].element.is_none() {
                return Err(InvariantError::new(format!("node {} has no value", next)));
            }
            forward += 1;
            if forward >= limit {
                return Err(InvariantError::new("ring does not return to the ghost node"));
            }
            node = next;
        }

        let mut backward = 0;
        let mut node = self.back_node();
        while node != GHOST {
            backward += 1;
            if backward > forward {
                return Err(InvariantError::new("backward walk is longer than forward walk"));
            }
            node = self.prev(node);
        }
        if backward != forward {
            return Err(InvariantError::new(format!(
                "forward walk visits {} nodes, backward walk {}",
                forward, backward
            )));
        }

        #[cfg(feature = "length")]
        if self.len != forward {
            return Err(InvariantError::new(format!(
                "length is {}, but the ring holds {} nodes",
                self.len, forward
            )));
        }
        if forward + self.free.len() + 1 != self.nodes.len() {
            return Err(InvariantError::new(format!(
                "{} linked and {} free nodes do not account for {} slots",
                forward,
                self.free.len(),
                self.nodes.len()
            )));
        }
        if let Some(&slot) = self
            .free
            .iter()
            .find(|&&slot| slot == GHOST || self.nodes[slot].element.is_some())
        {
            return Err(InvariantError::new(format!("free slot {} is in use", slot)));
        }
        Ok(())
    }
}

impl Debug for Queue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Queue {
    fn clone(&self) -> Self {
        let mut free = Vec::with_capacity(self.nodes.len());
        free.extend_from_slice(&self.free);
        Self {
            nodes: self.nodes.clone(),
            free,
            #[cfg(feature = "length")]
            len: self.len,
        }
    }
}

impl IntoIterator for Queue {
    type Item = String;
    type IntoIter = IntoIter;

    fn into_iter(self) -> IntoIter {
        IntoIter::new(self)
    }
}

impl<'a> IntoIterator for &'a Queue {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use crate::error::AllocError;
    use crate::queue::{Queue, GHOST};

    fn values(queue: &Queue) -> Vec<&str> {
        queue.iter().collect()
    }

    #[test]
    fn queue_create() {
        let mut queue = Queue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.size(), 0);
        queue.insert_tail("1").unwrap();
        assert!(!queue.is_empty());
        assert_eq!(queue.remove_tail(None).unwrap().value(), "1");
        assert!(queue.is_empty());
        queue.check_invariants().unwrap();

        let queue = Queue::try_new().unwrap();
        assert!(queue.is_empty());
        queue.check_invariants().unwrap();
    }

    #[test]
    fn queue_insert_and_remove() {
        let mut queue = Queue::new();
        assert!(queue.remove_head(None).is_none());
        assert!(queue.remove_tail(None).is_none());

        queue.insert_tail("a").unwrap();
        queue.insert_tail("b").unwrap();
        queue.insert_tail("c").unwrap();
        assert_eq!(queue.remove_head(None).unwrap().into_value(), "a");
        assert_eq!(queue.size(), 2);

        queue.insert_head("z").unwrap();
        assert_eq!(values(&queue), ["z", "b", "c"]);
        assert_eq!(queue.front(), Some("z"));
        assert_eq!(queue.back(), Some("c"));
        assert_eq!(&*queue.remove_tail(None).unwrap(), "c");
        assert_eq!(values(&queue), ["z", "b"]);
        queue.check_invariants().unwrap();
    }

    #[test]
    fn remove_copies_into_buffer() {
        let mut queue = Queue::try_from_iter(["abcdef", "xy", "q"]).unwrap();

        let mut buf = [0xffu8; 4];
        assert_eq!(queue.remove_head(Some(&mut buf[..])).unwrap().value(), "abcdef");
        assert_eq!(&buf, b"abc\0");

        let mut buf = [0xffu8; 8];
        assert_eq!(queue.remove_tail(Some(&mut buf[..])).unwrap().value(), "q");
        assert_eq!(&buf[..2], b"q\0");

        // an empty buffer has no room for the terminator and is left alone
        let mut buf: [u8; 0] = [];
        assert_eq!(queue.remove_head(Some(&mut buf[..])).unwrap().value(), "xy");

        let mut buf = [0xffu8; 1];
        assert!(queue.remove_head(Some(&mut buf[..])).is_none());
        assert_eq!(buf, [0xff]);
    }

    #[test]
    fn slots_are_recycled() {
        let mut queue = Queue::new();
        for round in 0..4 {
            queue.insert_tail(&round.to_string()).unwrap();
            queue.insert_head("h").unwrap();
            queue.remove_head(None).unwrap();
            queue.remove_tail(None).unwrap();
        }
        assert!(queue.is_empty());
        assert_eq!(queue.nodes.len(), 3);
        queue.check_invariants().unwrap();
    }

    #[test]
    fn queue_clear() {
        let mut queue = Queue::try_from_iter(["1", "2", "3"]).unwrap();
        queue.remove_head(None).unwrap();
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.size(), 0);
        assert_eq!(queue.nodes.len(), 1);
        assert_eq!(queue.front_node(), GHOST);
        queue.check_invariants().unwrap();

        queue.insert_tail("4").unwrap();
        assert_eq!(values(&queue), ["4"]);
    }

    #[test]
    fn failed_reserve_leaves_queue_unchanged() {
        let mut queue = Queue::try_from_iter(["a", "b", "c"]).unwrap();
        queue.remove_head(None).unwrap();
        let slots = queue.nodes.len();
        let free = queue.free.len();

        assert!(matches!(queue.reserve(usize::MAX), Err(AllocError::Node(_))));
        assert_eq!(values(&queue), ["b", "c"]);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.nodes.len(), slots);
        assert_eq!(queue.free.len(), free);
        queue.check_invariants().unwrap();

        // the queue keeps working afterwards
        queue.insert_tail("d").unwrap();
        assert_eq!(values(&queue), ["b", "c", "d"]);
    }

    #[test]
    fn values_are_owned_copies() {
        let mut source = String::from("shared");
        let mut queue = Queue::new();
        queue.insert_tail(&source).unwrap();
        source.push_str("-changed");
        assert_eq!(queue.front(), Some("shared"));
    }

    #[test]
    fn broken_links_are_reported() {
        let mut queue = Queue::try_from_iter(["a", "b", "c"]).unwrap();
        let second = queue.next(queue.front_node());
        queue.nodes[second].prev = GHOST;
        assert!(queue.check_invariants().is_err());
        // repair before dropping
        queue.nodes[second].prev = queue.front_node();
        queue.check_invariants().unwrap();
    }

    #[cfg(feature = "length")]
    #[test]
    fn queue_len() {
        let mut queue = Queue::new();
        assert_eq!(queue.len(), 0);
        queue.insert_tail("1").unwrap();
        queue.insert_head("0").unwrap();
        assert_eq!(queue.len(), 2);
        queue.remove_tail(None);
        assert_eq!(queue.len(), 1);
        queue.clear();
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn queue_clone_is_independent() {
        let queue = Queue::try_from_iter(["a", "b"]).unwrap();
        let mut cloned = queue.clone();
        cloned.insert_tail("c").unwrap();
        assert_eq!(values(&queue), ["a", "b"]);
        assert_eq!(values(&cloned), ["a", "b", "c"]);
        cloned.check_invariants().unwrap();
    }

    #[test]
    fn queue_debug() {
        let queue = Queue::try_from_iter(["a", "b"]).unwrap();
        assert_eq!(format!("{:?}", queue), r#"["a", "b"]"#);
    }
}
