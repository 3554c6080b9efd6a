//! Key store access
//!
//! The traversal only needs one capability from a store: fetch a single node by
//! key. This module defines that capability (`KeyStore`) along with the node
//! shape it returns and the error raised when a fetch fails.
//!
//! Implementations:
//!
//! - `EtcdClient` - talks to a live etcd server over the v2 keys API
//! - `SnapshotStore` - serves a saved recursive GET response from disk
//! - `MemoryStore` - an in-memory tree, mostly for tests and benchmarks

mod etcd;
mod memory;
mod snapshot;
mod wire;

use std::path::PathBuf;

use thiserror::Error;

pub use etcd::{EtcdClient, EtcdConfig, SetupError};
pub use memory::MemoryStore;
pub use snapshot::SnapshotStore;

/// Reference to a direct child of a directory node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRef {
    pub key: String,
}

impl ChildRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// A single node as returned by a store fetch.
///
/// `value` is only meaningful for leaves and `nodes` only for directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub key: String,
    pub dir: bool,
    pub value: Vec<u8>,
    pub nodes: Vec<ChildRef>,
}

impl Node {
    /// Create a leaf node holding `value`.
    pub fn leaf(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            dir: false,
            value: value.into(),
            nodes: Vec::new(),
        }
    }

    /// Create a directory node with the given children, in order.
    pub fn dir(key: impl Into<String>, nodes: Vec<ChildRef>) -> Self {
        Self {
            key: key.into(),
            dir: true,
            value: Vec::new(),
            nodes,
        }
    }
}

/// Errors raised while fetching a node. Any of these aborts a traversal.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("key not found: {key}")]
    KeyNotFound { key: String },

    #[error("failed to reach store while fetching {key}: {source}")]
    Transport {
        key: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("store returned {status} for {key}: {message}")]
    Status {
        key: String,
        status: u16,
        message: String,
    },

    #[error("malformed response for {key}: {message}")]
    Decode { key: String, message: String },

    #[error("cannot load snapshot '{}': {message}", path.display())]
    Snapshot { path: PathBuf, message: String },
}

/// Read access to a hierarchical key store.
pub trait KeyStore {
    /// Fetch the node stored at `key`.
    ///
    /// Directories report their direct children in store order; the
    /// children's own contents are fetched separately.
    fn fetch(&self, key: &str) -> Result<Node, FetchError>;
}

impl<S: KeyStore + ?Sized> KeyStore for &S {
    fn fetch(&self, key: &str) -> Result<Node, FetchError> {
        (**self).fetch(key)
    }
}

impl<S: KeyStore + ?Sized> KeyStore for Box<S> {
    fn fetch(&self, key: &str) -> Result<Node, FetchError> {
        (**self).fetch(key)
    }
}

/// Return the parent key of `key`, or `None` when it has no parent.
///
/// Top-level keys such as `/a` have the root `/` as parent. The root itself and
/// keys without any `/` have none.
pub fn parent_key(key: &str) -> Option<&str> {
    if key == "/" {
        return None;
    }
    let idx = key.rfind('/')?;
    if idx == 0 { Some("/") } else { Some(&key[..idx]) }
}

/// Normalize a user-supplied start key: empty becomes `/` and trailing slashes
/// are dropped so the key matches what the store reports for it.
pub fn normalize_key(key: &str) -> String {
    let trimmed = key.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_key() {
        assert_eq!(parent_key("/b/c"), Some("/b"));
        assert_eq!(parent_key("/a/b/c"), Some("/a/b"));
        assert_eq!(parent_key("/a"), Some("/"));
        assert_eq!(parent_key("/"), None);
        assert_eq!(parent_key("plain"), None);
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key(""), "/");
        assert_eq!(normalize_key("/"), "/");
        assert_eq!(normalize_key("//"), "/");
        assert_eq!(normalize_key("/registry/"), "/registry");
        assert_eq!(normalize_key("registry"), "/registry");
        assert_eq!(normalize_key("/a/b"), "/a/b");
    }

    #[test]
    fn test_node_constructors() {
        let leaf = Node::leaf("/a", "xyz");
        assert!(!leaf.dir);
        assert_eq!(leaf.value, b"xyz");
        assert!(leaf.nodes.is_empty());

        let dir = Node::dir("/b", vec![ChildRef::new("/b/c")]);
        assert!(dir.dir);
        assert!(dir.value.is_empty());
        assert_eq!(dir.nodes, vec![ChildRef::new("/b/c")]);
    }
}
