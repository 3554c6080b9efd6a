//! JSON shapes of the etcd v2 keys API

use serde::Deserialize;

use super::{ChildRef, Node};

/// etcd error code for a missing key.
pub const ERROR_KEY_NOT_FOUND: u64 = 100;

/// Body of a successful `GET /v2/keys/...` reply.
#[derive(Debug, Deserialize)]
pub struct KeysResponse {
    #[allow(dead_code)]
    #[serde(default)]
    pub action: Option<String>,
    pub node: RawNode,
}

/// Body of a failed keys API request.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "errorCode")]
    pub error_code: u64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub cause: Option<String>,
}

/// A node as serialized by etcd. The root node is sent without a key.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNode {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub dir: bool,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub nodes: Vec<RawNode>,
}

impl RawNode {
    pub fn key_or_root(&self) -> &str {
        self.key.as_deref().unwrap_or("/")
    }

    pub fn is_dir(&self) -> bool {
        self.dir || !self.nodes.is_empty()
    }

    /// Convert to a `Node`, keeping only the keys of any children.
    pub fn to_node(&self) -> Node {
        let key = self.key_or_root();
        if self.is_dir() {
            Node::dir(
                key,
                self.nodes
                    .iter()
                    .map(|child| ChildRef::new(child.key_or_root()))
                    .collect(),
            )
        } else {
            Node::leaf(key, self.value.clone().unwrap_or_default())
        }
    }
}
