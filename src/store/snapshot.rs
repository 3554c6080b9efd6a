//! Offline store backed by a saved recursive GET response
//!
//! A snapshot is the body of `GET /v2/keys/?recursive=true` (or any subtree),
//! saved to a file. It lets a keyspace be analyzed away from the cluster.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::wire::{KeysResponse, RawNode};
use super::{FetchError, KeyStore, Node};

/// Accept either the full API reply or a bare node object.
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Reply(KeysResponse),
    Bare(RawNode),
}

/// A key store serving nodes from a snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    nodes: HashMap<String, Node>,
}

impl SnapshotStore {
    /// Load a snapshot from `path`.
    pub fn open(path: &Path) -> Result<Self, FetchError> {
        let content = fs::read_to_string(path).map_err(|e| FetchError::Snapshot {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&content).map_err(|e| match e {
            FetchError::Decode { message, .. } => FetchError::Snapshot {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Parse a snapshot from its JSON text.
    pub fn from_json(content: &str) -> Result<Self, FetchError> {
        let parsed: SnapshotFile =
            serde_json::from_str(content).map_err(|e| FetchError::Decode {
                key: "/".to_string(),
                message: e.to_string(),
            })?;
        let root = match parsed {
            SnapshotFile::Reply(reply) => reply.node,
            SnapshotFile::Bare(node) => node,
        };

        let mut nodes = HashMap::new();
        flatten(&root, &mut nodes);
        tracing::debug!(keys = nodes.len(), "loaded snapshot");
        Ok(Self { nodes })
    }

    /// Number of keys in the snapshot.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn flatten(raw: &RawNode, out: &mut HashMap<String, Node>) {
    out.insert(raw.key_or_root().to_string(), raw.to_node());
    for child in &raw.nodes {
        flatten(child, out);
    }
}

impl KeyStore for SnapshotStore {
    fn fetch(&self, key: &str) -> Result<Node, FetchError> {
        self.nodes
            .get(key)
            .cloned()
            .ok_or_else(|| FetchError::KeyNotFound {
                key: key.to_string(),
            })
    }
}
