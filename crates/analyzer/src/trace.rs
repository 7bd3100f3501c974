//! Generic traversal over simulation call traces.
//!
//! Traces come from the simulation backend and are attacker-influenced:
//! depth and width are unbounded, and any field may be missing or garbage.
//! Traversal therefore uses an explicit worklist instead of recursion and
//! treats malformed nodes as ordinary non-matching nodes.

use alloy_primitives::{Address, U256};
use warden_core::CallRecord;

/// Collects every node for which `predicate` holds, visiting the tree
/// depth-first in pre-order. Each node is visited exactly once.
pub fn walk_matching<'a, F>(root: &'a CallRecord, mut predicate: F) -> Vec<&'a CallRecord>
where
    F: FnMut(&CallRecord) -> bool,
{
    let mut matches = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if predicate(node) {
            matches.push(node);
        }
        // Reverse so siblings pop in document order.
        for child in node.children().iter().rev() {
            stack.push(child);
        }
    }

    matches
}

/// All calls whose `to` parses to one of `targets`. Records without a
/// usable `to` never match.
pub fn calls_to<'a>(root: &'a CallRecord, targets: &[Address]) -> Vec<&'a CallRecord> {
    walk_matching(root, |node| {
        node.to_address().is_some_and(|to| targets.contains(&to))
    })
}

/// A positive-value internal transfer observed in the trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueTransfer {
    pub from: Address,
    pub to: Address,
    pub value: U256,
}

/// Every call edge carrying native value, in trace order.
pub fn value_transfers(root: &CallRecord) -> Vec<ValueTransfer> {
    walk_matching(root, |node| node.value_wei() > U256::ZERO)
        .into_iter()
        .filter_map(|node| {
            Some(ValueTransfer {
                from: node.from_address()?,
                to: node.to_address()?,
                value: node.value_wei(),
            })
        })
        .collect()
}
