//! In-memory key store

use std::collections::HashMap;

use super::{ChildRef, FetchError, KeyStore, Node, normalize_key, parent_key};

#[derive(Debug, Clone)]
enum Entry {
    Leaf(Vec<u8>),
    Dir(Vec<String>),
}

/// A key store held entirely in memory.
///
/// Directories are created implicitly when a leaf is inserted below them and
/// list their children in insertion order, like etcd does for a fresh keyspace.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Entry>,
}

impl MemoryStore {
    /// Create a store containing only the empty root directory.
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert("/".to_string(), Entry::Dir(Vec::new()));
        Self { entries }
    }

    /// Insert a leaf at `key`, creating missing parent directories.
    ///
    /// Re-inserting an existing leaf replaces its value. Inserting over an
    /// existing directory is ignored.
    pub fn insert(&mut self, key: &str, value: impl Into<Vec<u8>>) -> &mut Self {
        let key = normalize_key(key);
        match self.entries.get_mut(&key) {
            Some(Entry::Dir(_)) => return self,
            Some(Entry::Leaf(existing)) => {
                *existing = value.into();
                return self;
            }
            None => {}
        }
        self.link(&key);
        self.entries.insert(key, Entry::Leaf(value.into()));
        self
    }

    /// Insert an empty directory at `key`, creating missing parents.
    pub fn insert_dir(&mut self, key: &str) -> &mut Self {
        let key = normalize_key(key);
        if self.entries.contains_key(&key) {
            return self;
        }
        self.link(&key);
        self.entries.insert(key, Entry::Dir(Vec::new()));
        self
    }

    /// Builder-style variant of [`MemoryStore::insert`].
    pub fn with_leaf(mut self, key: &str, value: impl Into<Vec<u8>>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style variant of [`MemoryStore::insert_dir`].
    pub fn with_dir(mut self, key: &str) -> Self {
        self.insert_dir(key);
        self
    }

    /// Number of keys in the store, including the root.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Register `key` under its parent, creating parent directories as needed.
    fn link(&mut self, key: &str) {
        let Some(parent) = parent_key(key) else {
            return;
        };
        let parent = parent.to_string();
        if !self.entries.contains_key(&parent) {
            self.link(&parent);
            self.entries.insert(parent.clone(), Entry::Dir(Vec::new()));
        }
        if let Some(Entry::Dir(children)) = self.entries.get_mut(&parent) {
            children.push(key.to_string());
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyStore for MemoryStore {
    fn fetch(&self, key: &str) -> Result<Node, FetchError> {
        match self.entries.get(key) {
            Some(Entry::Leaf(value)) => Ok(Node::leaf(key, value.clone())),
            Some(Entry::Dir(children)) => Ok(Node::dir(
                key,
                children.iter().map(ChildRef::new).collect(),
            )),
            None => Err(FetchError::KeyNotFound {
                key: key.to_string(),
            }),
        }
    }
}
