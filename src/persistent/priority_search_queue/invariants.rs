//! Structural checks over the pennant, driven by random operation
//! sequences.

use super::balance::balanced;
use super::node::{Loser, Winner, size};
use super::PersistentPrioritySearchQueue;
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Collects every entry stored in a loser subtree.
fn loser_entries(link: Option<&Loser<i32, i32>>, entries: &mut Vec<(i32, i32)>) {
    if let Some(loser) = link {
        entries.push((loser.key, loser.priority));
        loser_entries(loser.left.as_deref(), entries);
        loser_entries(loser.right.as_deref(), entries);
    }
}

/// Checks one loser subtree whose keys lie in `(low, high]`.
fn check_loser(loser: &Loser<i32, i32>, low: Option<i32>, high: i32) {
    let left_size = size(loser.left.as_ref());
    let right_size = size(loser.right.as_ref());
    assert!(
        balanced(left_size, right_size),
        "unbalanced loser {}: {left_size} vs {right_size}",
        loser.key
    );
    assert_eq!(loser.size, left_size + right_size + 1, "stale size");
    assert!(low.is_none_or(|low| low < loser.split) && loser.split < high);
    assert!(low.is_none_or(|low| low < loser.key) && loser.key <= high);

    let mut left = Vec::new();
    let mut right = Vec::new();
    loser_entries(loser.left.as_deref(), &mut left);
    loser_entries(loser.right.as_deref(), &mut right);
    assert!(left.iter().all(|(key, _)| *key <= loser.split));
    assert!(right.iter().all(|(key, _)| *key > loser.split));

    // A loser beat every entry of the half it came from.
    let origin = if loser.key <= loser.split { &left } else { &right };
    assert!(
        origin.iter().all(|(_, priority)| loser.priority <= *priority),
        "heap order broken below loser {}",
        loser.key
    );

    if let Some(child) = loser.left.as_deref() {
        check_loser(child, low, loser.split);
    }
    if let Some(child) = loser.right.as_deref() {
        check_loser(child, Some(loser.split), high);
    }
}

/// Checks a whole pennant and returns its entries.
pub(crate) fn check_winner(winner: &Winner<i32, i32>) -> BTreeMap<i32, i32> {
    let mut entries = vec![(winner.key, winner.priority)];
    loser_entries(winner.losers.as_deref(), &mut entries);

    let keys: Vec<i32> = entries.iter().map(|(key, _)| *key).collect();
    assert_eq!(keys.iter().max(), Some(&winner.ubound), "ubound is not the maximum");
    assert!(
        entries.iter().all(|(_, priority)| winner.priority <= *priority),
        "winner is not the minimum"
    );
    if let Some(loser) = winner.losers.as_deref() {
        check_loser(loser, None, winner.ubound);
    }

    // Splits are exactly the keys other than the maximum.
    let mut splits = Vec::new();
    let mut stack: Vec<&Loser<i32, i32>> = winner.losers.as_deref().into_iter().collect();
    while let Some(loser) = stack.pop() {
        splits.push(loser.split);
        stack.extend(loser.left.as_deref());
        stack.extend(loser.right.as_deref());
    }
    splits.sort_unstable();
    let mut expected: Vec<i32> = keys.into_iter().filter(|key| *key != winner.ubound).collect();
    expected.sort_unstable();
    assert_eq!(splits, expected, "split keys out of sync");

    entries.into_iter().collect()
}

fn check_queue(queue: &PersistentPrioritySearchQueue<i32, i32>) -> BTreeMap<i32, i32> {
    let entries = queue.root.as_ref().map(check_winner).unwrap_or_default();
    assert_eq!(entries.len(), queue.len());
    entries
}

#[derive(Debug, Clone)]
enum Operation {
    Insert(i32, i32),
    Remove(i32),
    PopMin,
    SplitBelow(i32),
    SplitAbove(i32),
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        6 => (0..200i32, 0..50i32).prop_map(|(key, priority)| Operation::Insert(key, priority)),
        3 => (0..200i32).prop_map(Operation::Remove),
        1 => Just(Operation::PopMin),
        1 => (0..200i32).prop_map(Operation::SplitBelow),
        1 => (0..200i32).prop_map(Operation::SplitAbove),
    ]
}

proptest! {
    #[test]
    fn prop_operations_preserve_invariants(
        operations in prop::collection::vec(operation(), 1..300)
    ) {
        let mut queue = PersistentPrioritySearchQueue::new();
        let mut model: BTreeMap<i32, i32> = BTreeMap::new();
        for operation in operations {
            match operation {
                Operation::Insert(key, priority) => {
                    queue = queue.insert(key, priority);
                    model.insert(key, priority);
                }
                Operation::Remove(key) => {
                    queue = queue.remove(&key);
                    model.remove(&key);
                }
                Operation::PopMin => {
                    if let Some((rest, (key, priority))) = queue.pop_min() {
                        prop_assert_eq!(Some(&priority), model.values().min());
                        prop_assert_eq!(model.remove(&key), Some(priority));
                        queue = rest;
                    }
                }
                Operation::SplitBelow(key) => {
                    let (below, _, _) = queue.split_by_key(&key);
                    queue = below;
                    model.retain(|candidate, _| *candidate < key);
                }
                Operation::SplitAbove(key) => {
                    let (_, _, above) = queue.split_by_key(&key);
                    queue = above;
                    model.retain(|candidate, _| *candidate > key);
                }
            }
            prop_assert_eq!(check_queue(&queue), model.clone());
        }
    }

    #[test]
    fn prop_sequential_keys_stay_balanced(length in 1..600i32, descending in any::<bool>()) {
        let keys: Vec<i32> = if descending {
            (0..length).rev().collect()
        } else {
            (0..length).collect()
        };
        let queue: PersistentPrioritySearchQueue<i32, i32> =
            keys.iter().map(|key| (*key, key % 13)).collect();
        let entries = check_queue(&queue);
        prop_assert_eq!(entries.len(), usize::try_from(length).unwrap_or_default());
    }
}
