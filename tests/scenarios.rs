use list_queue::{merge, Queue};
use proptest::prelude::*;

fn queue_of(values: &[&str]) -> Queue {
    Queue::try_from_iter(values).unwrap()
}

fn values(queue: &Queue) -> Vec<&str> {
    queue.iter().collect()
}

/// Read a NUL-terminated value back out of a removal buffer.
fn c_str(buf: &[u8]) -> &str {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    std::str::from_utf8(&buf[..end]).unwrap()
}

#[test]
fn remove_head_after_tail_inserts() {
    let mut queue = Queue::new();
    queue.insert_tail("a").unwrap();
    queue.insert_tail("b").unwrap();
    queue.insert_tail("c").unwrap();
    assert_eq!(queue.remove_head(None).unwrap().value(), "a");
    assert_eq!(queue.size(), 2);
}

#[test]
fn delete_dup_on_sorted_input() {
    let mut queue = queue_of(&["1", "2", "2", "3"]);
    queue.delete_dup();
    assert_eq!(values(&queue), ["1", "3"]);
}

#[test]
fn sort_descending() {
    let mut queue = queue_of(&["3", "1", "2"]);
    queue.sort(true);
    assert_eq!(values(&queue), ["3", "2", "1"]);
}

#[test]
fn merge_two_sorted_queues() {
    let mut queues = vec![queue_of(&["1", "3", "5"]), queue_of(&["2", "4"])];
    merge(&mut queues, false).unwrap();
    assert_eq!(values(&queues[0]), ["1", "2", "3", "4", "5"]);
    assert!(queues[1].is_empty());
}

#[test]
fn descend_keeps_unbeaten_values() {
    let mut queue = queue_of(&["5", "2", "6", "1"]);
    queue.descend();
    assert_eq!(values(&queue), ["6", "1"]);
}

#[test]
fn every_operation_tolerates_an_empty_queue() {
    let mut queue = Queue::new();
    assert!(queue.remove_head(None).is_none());
    assert!(queue.remove_tail(None).is_none());
    assert!(!queue.delete_mid());
    assert!(!queue.delete_dup());
    queue.swap();
    queue.reverse();
    queue.reverse_k(3);
    assert_eq!(queue.ascend(), 0);
    assert_eq!(queue.descend(), 0);
    queue.sort(false);
    assert_eq!(queue.size(), 0);
    queue.check_invariants().unwrap();
}

#[test]
fn reverse_k_boundaries() {
    let input = ["a", "b", "c", "d"];

    let mut queue = queue_of(&input);
    queue.reverse_k(1);
    assert_eq!(values(&queue), input);

    for k in 4..7 {
        let mut grouped = queue_of(&input);
        grouped.reverse_k(k);
        let mut reversed = queue_of(&input);
        reversed.reverse();
        assert_eq!(grouped, reversed);
    }
}

proptest! {
    /// Property: insert then remove at the same end returns the value, truncated to the buffer
    #[test]
    fn prop_ownership_round_trip(
        existing in prop::collection::vec("[a-z]{0,4}", 0..5),
        value in "[a-z0-9]{0,16}",
        capacity in 1usize..20,
        at_head in any::<bool>()
    ) {
        let mut queue = Queue::try_from_iter(&existing).unwrap();
        let mut buf = vec![0xffu8; capacity];
        let element = if at_head {
            queue.insert_head(&value).unwrap();
            queue.remove_head(Some(&mut buf[..])).unwrap()
        } else {
            queue.insert_tail(&value).unwrap();
            queue.remove_tail(Some(&mut buf[..])).unwrap()
        };
        prop_assert_eq!(element.value(), value.as_str());
        let kept = value.len().min(capacity - 1);
        prop_assert_eq!(c_str(&buf), &value[..kept]);
        prop_assert_eq!(queue.into_iter().collect::<Vec<_>>(), existing);
    }

    /// Property: size matches a full traversal in both directions after any mix of operations
    #[test]
    fn prop_size_matches_traversal(ops in prop::collection::vec((0u8..12, "[a-c]{1,2}"), 0..60)) {
        let mut queue = Queue::new();
        let mut others = vec![Queue::new()];
        for (op, value) in ops {
            match op {
                0 => queue.insert_head(&value).unwrap(),
                1 => queue.insert_tail(&value).unwrap(),
                2 => {
                    queue.remove_head(None);
                }
                3 => {
                    queue.remove_tail(None);
                }
                4 => {
                    queue.delete_mid();
                }
                5 => {
                    queue.delete_dup();
                }
                6 => queue.swap(),
                7 => queue.reverse_k(value.len() + 1),
                8 => {
                    queue.ascend();
                }
                9 => {
                    queue.descend();
                }
                10 => queue.sort(value.len() == 2),
                _ => {
                    others[0].insert_tail(&value).unwrap();
                    queue.sort(false);
                    queue.merge_from(&mut others, false).unwrap();
                }
            }
            queue.check_invariants().unwrap();
            prop_assert_eq!(queue.size(), queue.iter().count());
            prop_assert_eq!(queue.size(), queue.iter().rev().count());
        }
    }
}
