use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::foundation::error::BandtreeResult;

/// Deepest exploration recorded for each node.
///
/// A node explored to depth `d` covers every request for depth `<= d`, so it is never expanded
/// again for those.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExplorationLedger {
    depths: BTreeMap<String, u32>,
}

impl ExplorationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn explored_depth(&self, id: &str) -> Option<u32> {
        self.depths.get(id).copied()
    }

    pub fn needs_expansion(&self, id: &str, depth: u32) -> bool {
        self.explored_depth(id).is_none_or(|d| d < depth)
    }

    /// Record `id` as explored to `depth`. A shallower record never lowers a deeper one.
    pub fn record(&mut self, id: &str, depth: u32) {
        let entry = self.depths.entry(id.to_string()).or_insert(depth);
        *entry = (*entry).max(depth);
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}

/// Breadth-first, depth-bounded expansion from `root`.
///
/// `fetch` is called once per node that still needs expanding and returns its neighbours. A node
/// reached with `remaining` hops left is recorded at that depth; neighbours are queued with one
/// hop less. Returns the ids fetched, in order.
pub fn expand<F>(
    ledger: &mut ExplorationLedger,
    root: &str,
    max_depth: u32,
    mut fetch: F,
) -> BandtreeResult<Vec<String>>
where
    F: FnMut(&str) -> BandtreeResult<Vec<String>>,
{
    let mut fetched = Vec::new();
    let mut queued = BTreeSet::from([root.to_string()]);
    let mut queue = VecDeque::from([(root.to_string(), max_depth)]);

    while let Some((id, remaining)) = queue.pop_front() {
        if !ledger.needs_expansion(&id, remaining) {
            tracing::debug!(node = %id, remaining, "already explored deep enough");
            continue;
        }
        let neighbours = fetch(&id)?;
        fetched.push(id.clone());
        ledger.record(&id, remaining);
        if remaining == 0 {
            continue;
        }
        for n in neighbours {
            if queued.insert(n.clone()) {
                queue.push_back((n, remaining - 1));
            }
        }
    }

    tracing::debug!(root, max_depth, fetched = fetched.len(), "expansion finished");
    Ok(fetched)
}

#[cfg(test)]
#[path = "../../tests/unit/harvest/expansion.rs"]
mod tests;
