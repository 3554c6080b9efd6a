//! Test utilities for building keyspace snapshots on disk.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

use crate::store::{KeyStore, MemoryStore};

/// A keyspace that can be written out as an etcd v2 snapshot file.
///
/// The file lives in a temporary directory that is removed on drop.
pub struct TestSnapshot {
    dir: TempDir,
    store: MemoryStore,
}

impl TestSnapshot {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            dir,
            store: MemoryStore::new(),
        }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a leaf, creating parent directories as needed.
    pub fn add_leaf(&mut self, key: &str, value: &str) -> &mut Self {
        self.store.insert(key, value);
        self
    }

    /// Add an empty directory.
    pub fn add_dir(&mut self, key: &str) -> &mut Self {
        self.store.insert_dir(key);
        self
    }

    /// The in-memory store backing this snapshot.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Render the keyspace as a recursive GET reply.
    pub fn to_json(&self) -> String {
        let reply = json!({
            "action": "get",
            "node": self.node_json("/"),
        });
        serde_json::to_string_pretty(&reply).expect("Failed to serialize snapshot")
    }

    fn node_json(&self, key: &str) -> Value {
        let node = self.store.fetch(key).expect("Snapshot key vanished");
        if node.dir {
            let children: Vec<Value> = node.nodes.iter().map(|c| self.node_json(&c.key)).collect();
            if key == "/" {
                json!({ "dir": true, "nodes": children })
            } else {
                json!({ "key": key, "dir": true, "nodes": children })
            }
        } else {
            json!({
                "key": key,
                "value": String::from_utf8_lossy(&node.value),
                "modifiedIndex": 1,
                "createdIndex": 1,
            })
        }
    }

    /// Write the snapshot to `snapshot.json` in the temp directory.
    pub fn write(&self) -> PathBuf {
        self.write_as("snapshot.json", &self.to_json())
    }

    /// Write arbitrary content to a file in the temp directory.
    pub fn write_as(&self, name: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(name);
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }
}

impl Default for TestSnapshot {
    fn default() -> Self {
        Self::new()
    }
}
