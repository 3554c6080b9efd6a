//! etcdstats - find the keys that take up the most space in an etcd v2 keyspace

pub mod logging;
pub mod report;
pub mod stats;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use report::{
    OutputConfig, Report, ReportConfig, ReportRow, TableFormatter, build_report, print_report,
    print_report_json,
};
pub use stats::{NodeInfo, Traversal, collect};
pub use store::{
    ChildRef, EtcdClient, EtcdConfig, FetchError, KeyStore, MemoryStore, Node, SetupError,
    SnapshotStore,
};
