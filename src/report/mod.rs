//! Ranking and report output
//!
//! Turns the flat node list produced by a traversal into a ranked report:
//! the biggest nodes first, with leaves under "summarize" prefixes hidden from
//! the listing but still counted in the overall total.
//!
//! # Module Structure
//!
//! - `config` - Output configuration types
//! - `utils` - Size formatting and column layout helpers
//! - `table` - Console table formatter
//! - `json` - JSON output

mod config;
mod json;
mod table;
mod utils;

use serde::Serialize;

use crate::stats::NodeInfo;

pub use config::OutputConfig;
pub use json::{print_report_json, report_to_json};
pub use table::{TableFormatter, print_report};
pub use utils::{format_size, layout_columns};

/// Default number of rows to display.
pub const DEFAULT_TOP_N: usize = 20;

/// Ranking parameters.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Maximum number of rows to list
    pub top_n: usize,
    /// Leaves whose key starts with any of these prefixes are not listed and
    /// are left out of the filtered total
    pub summarize: Vec<String>,
}

impl ReportConfig {
    pub fn new(top_n: usize) -> Self {
        Self {
            top_n,
            summarize: Vec::new(),
        }
    }

    pub fn with_summarize(mut self, prefix: impl Into<String>) -> Self {
        self.summarize.push(prefix.into());
        self
    }

    /// Whether a leaf key falls under one of the summarize prefixes.
    pub fn is_summarized(&self, key: &str) -> bool {
        self.summarize.iter().any(|p| key.starts_with(p.as_str()))
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}

/// One listed node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub key: String,
    /// Direct leaf child count, `None` for leaves
    pub children: Option<usize>,
    pub size: u64,
}

impl ReportRow {
    pub fn is_dir(&self) -> bool {
        self.children.is_some()
    }
}

impl From<&NodeInfo> for ReportRow {
    fn from(node: &NodeInfo) -> Self {
        Self {
            key: node.key.clone(),
            children: node.is_dir.then_some(node.children),
            size: node.size,
        }
    }
}

/// The ranked report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub top_n: usize,
    pub rows: Vec<ReportRow>,
    /// Sum of every leaf's size
    pub total_size: u64,
    /// Sum of the sizes of leaves outside the summarize prefixes
    pub total_size_excluding: u64,
}

/// Rank `nodes` by size and build the report.
///
/// Sorting is stable, so equally sized nodes keep their discovery order.
/// Directories are always eligible for listing; only leaves are filtered.
pub fn build_report(mut nodes: Vec<NodeInfo>, config: &ReportConfig) -> Report {
    nodes.sort_by(|a, b| b.size.cmp(&a.size));

    let mut rows = Vec::new();
    let mut total_size = 0;
    let mut total_size_excluding = 0;

    for node in &nodes {
        if !node.is_dir {
            total_size += node.size;
            if config.is_summarized(&node.key) {
                continue;
            }
            total_size_excluding += node.size;
        }
        if rows.len() < config.top_n {
            rows.push(ReportRow::from(node));
        }
    }

    tracing::debug!(
        nodes = nodes.len(),
        listed = rows.len(),
        total_size,
        total_size_excluding,
        "built report"
    );

    Report {
        top_n: config.top_n,
        rows,
        total_size,
        total_size_excluding,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::collect;
    use crate::store::MemoryStore;

    fn sample_nodes() -> Vec<NodeInfo> {
        let store = MemoryStore::new()
            .with_leaf("/a", "xyzxy")
            .with_leaf("/b/c", "ab");
        collect(&store, "/").unwrap()
    }

    fn leaf(key: &str, size: u64) -> NodeInfo {
        NodeInfo {
            key: key.to_string(),
            is_dir: false,
            size,
            children: 0,
        }
    }

    fn dir(key: &str, size: u64, children: usize) -> NodeInfo {
        NodeInfo {
            key: key.to_string(),
            is_dir: true,
            size,
            children,
        }
    }

    #[test]
    fn test_basic_report() {
        let report = build_report(sample_nodes(), &ReportConfig::default());

        assert_eq!(report.total_size, 7);
        assert_eq!(report.total_size_excluding, 7);

        let keys: Vec<_> = report.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["/", "/a", "/b", "/b/c"]);

        let b = report.rows.iter().find(|r| r.key == "/b").unwrap();
        assert_eq!(b.children, Some(1));
        assert_eq!(b.size, 2);

        let a = report.rows.iter().find(|r| r.key == "/a").unwrap();
        assert_eq!(a.children, None);
        assert!(!a.is_dir());
    }

    #[test]
    fn test_summarized_prefix() {
        let config = ReportConfig::default().with_summarize("/b");
        let report = build_report(sample_nodes(), &config);

        assert_eq!(report.total_size, 7);
        assert_eq!(report.total_size_excluding, 5);

        let keys: Vec<_> = report.rows.iter().map(|r| r.key.as_str()).collect();
        assert!(keys.contains(&"/a"));
        assert!(!keys.contains(&"/b/c"));
        // directories are never filtered
        assert!(keys.contains(&"/b"));
    }

    #[test]
    fn test_exact_key_match_is_summarized() {
        let nodes = vec![leaf("/a", 3), leaf("/ab", 4)];
        let report = build_report(nodes, &ReportConfig::default().with_summarize("/a"));
        // plain string prefix, so /ab matches as well
        assert!(report.rows.is_empty());
        assert_eq!(report.total_size, 7);
        assert_eq!(report.total_size_excluding, 0);
    }

    #[test]
    fn test_zero_top_n_still_totals() {
        let report = build_report(sample_nodes(), &ReportConfig::new(0));
        assert!(report.rows.is_empty());
        assert_eq!(report.total_size, 7);
        assert_eq!(report.total_size_excluding, 7);
    }

    #[test]
    fn test_top_n_limits_rows() {
        let nodes = (0..50).map(|i| leaf(&format!("/k{}", i), i)).collect();
        let report = build_report(nodes, &ReportConfig::new(5));
        assert_eq!(report.rows.len(), 5);
        let sizes: Vec<_> = report.rows.iter().map(|r| r.size).collect();
        assert_eq!(sizes, vec![49, 48, 47, 46, 45]);
        assert_eq!(report.total_size, (0..50).sum::<u64>());
    }

    #[test]
    fn test_summarized_leaves_do_not_use_row_slots() {
        let nodes = vec![leaf("/big/x", 100), leaf("/big/y", 90), leaf("/small", 1)];
        let config = ReportConfig::new(1).with_summarize("/big/");
        let report = build_report(nodes, &config);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].key, "/small");
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let nodes = vec![
            leaf("/first", 5),
            dir("/d", 5, 0),
            leaf("/second", 5),
            leaf("/bigger", 6),
        ];
        let report = build_report(nodes, &ReportConfig::default());
        let keys: Vec<_> = report.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["/bigger", "/first", "/d", "/second"]);
    }

    #[test]
    fn test_rows_sorted_descending() {
        let store = MemoryStore::new()
            .with_leaf("/x/1", "a")
            .with_leaf("/x/2", "abcdef")
            .with_leaf("/y", "abc")
            .with_leaf("/z/w/v", "abcdefghij");
        let report = build_report(collect(&store, "/").unwrap(), &ReportConfig::default());
        assert!(report.rows.windows(2).all(|w| w[0].size >= w[1].size));
    }

    #[test]
    fn test_is_summarized() {
        let config = ReportConfig::default()
            .with_summarize("/registry/events")
            .with_summarize("/registry/leases");
        assert!(config.is_summarized("/registry/events"));
        assert!(config.is_summarized("/registry/events/default/x"));
        assert!(config.is_summarized("/registry/leases/kube-node-lease/n1"));
        assert!(!config.is_summarized("/registry/pods/default/p"));
        assert!(!ReportConfig::default().is_summarized("/anything"));
    }
}
