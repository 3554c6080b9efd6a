//! Keyspace size aggregation
//!
//! Walks a key store depth-first from a start key and records one `NodeInfo`
//! per key. Leaf sizes are rolled up into their parent directory as each leaf
//! is visited, and a directory's total is rolled into its own parent once all
//! of its descendants have been visited.

use std::collections::HashMap;

use serde::Serialize;

use crate::store::{FetchError, KeyStore, normalize_key, parent_key};

/// Size information for a single key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeInfo {
    pub key: String,
    pub is_dir: bool,
    /// Value length for a leaf; total size of all leaf descendants for a directory
    pub size: u64,
    /// Number of direct leaf children (directories only)
    pub children: usize,
}

impl NodeInfo {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            is_dir: false,
            size: 0,
            children: 0,
        }
    }
}

/// Aggregation state for one traversal.
///
/// `nodes` holds entries in first-discovery order and `seen` maps each key to
/// its index, so every key is recorded at most once.
#[derive(Debug, Default)]
pub struct Traversal {
    seen: HashMap<String, usize>,
    nodes: Vec<NodeInfo>,
}

impl Traversal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the subtree rooted at `start` and record every node in it.
    ///
    /// The first fetch error aborts the walk and is returned as-is.
    pub fn run<S: KeyStore + ?Sized>(&mut self, store: &S, start: &str) -> Result<(), FetchError> {
        let start = normalize_key(start);
        self.examine(store, &start, &start)?;
        tracing::debug!(
            start = %start,
            nodes = self.nodes.len(),
            "traversal finished"
        );
        Ok(())
    }

    fn examine<S: KeyStore + ?Sized>(
        &mut self,
        store: &S,
        key: &str,
        start: &str,
    ) -> Result<(), FetchError> {
        let node = store.fetch(key)?;
        tracing::trace!(key, dir = node.dir, "fetched");

        let idx = self.lookup_or_insert(key);

        if node.dir {
            self.nodes[idx].is_dir = true;
            for child in &node.nodes {
                self.examine(store, &child.key, start)?;
            }
        } else {
            self.nodes[idx].size = node.value.len() as u64;
        }

        if key != start {
            self.contribute_to_parent(idx);
        }
        Ok(())
    }

    fn lookup_or_insert(&mut self, key: &str) -> usize {
        if let Some(&idx) = self.seen.get(key) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(NodeInfo::new(key));
        self.seen.insert(key.to_string(), idx);
        idx
    }

    /// Add the size of `nodes[idx]` to its parent. Only leaves count as children.
    fn contribute_to_parent(&mut self, idx: usize) {
        let child = &self.nodes[idx];
        let Some(parent) = parent_key(&child.key) else {
            return;
        };
        let (size, is_leaf) = (child.size, !child.is_dir);

        match self.seen.get(parent) {
            Some(&pidx) => {
                let parent = &mut self.nodes[pidx];
                parent.size += size;
                if is_leaf {
                    parent.children += 1;
                }
            }
            None => {
                tracing::warn!(parent, key = %self.nodes[idx].key, "couldn't find parent");
            }
        }
    }

    /// Recorded nodes in discovery order.
    pub fn nodes(&self) -> &[NodeInfo] {
        &self.nodes
    }

    /// Look up the entry for `key`, if it has been visited.
    pub fn get(&self, key: &str) -> Option<&NodeInfo> {
        self.seen.get(key).map(|&idx| &self.nodes[idx])
    }

    pub fn into_nodes(self) -> Vec<NodeInfo> {
        self.nodes
    }
}

/// Traverse `store` from `start` and return every node found, in discovery order.
pub fn collect<S: KeyStore + ?Sized>(store: &S, start: &str) -> Result<Vec<NodeInfo>, FetchError> {
    let mut traversal = Traversal::new();
    traversal.run(store, start)?;
    Ok(traversal.into_nodes())
}
