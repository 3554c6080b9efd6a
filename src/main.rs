//! CLI entry point for etcdstats

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};
use etcdstats::{
    EtcdClient, EtcdConfig, KeyStore, OutputConfig, ReportConfig, SnapshotStore, build_report,
    collect, logging, print_report, print_report_json,
};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "etcdstats")]
#[command(about = "Show the etcd v2 keys and directories holding the most data")]
#[command(version)]
struct Args {
    /// Server url, e.g. https://127.0.0.1:2379
    #[arg(
        long,
        env = "ETCDSTATS_SERVER",
        required_unless_present = "snapshot",
        conflicts_with = "snapshot"
    )]
    server: Option<String>,

    /// Read a saved `GET /v2/keys/?recursive=true` reply instead of a live server
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// CA certificate file (PEM)
    #[arg(long, value_name = "FILE", env = "ETCDSTATS_CACERT")]
    cacert: Option<PathBuf>,

    /// Client certificate file (PEM)
    #[arg(long, value_name = "FILE", env = "ETCDSTATS_CERT", requires = "key")]
    cert: Option<PathBuf>,

    /// Client certificate key file (PKCS#8 PEM)
    #[arg(long, value_name = "FILE", env = "ETCDSTATS_KEY", requires = "cert")]
    key: Option<PathBuf>,

    /// Display top N highest nodes
    #[arg(short = 'n', default_value_t = 20, allow_negative_numbers = true)]
    n: i64,

    /// Summarize descendant nodes of the directory prefixed by this value
    /// instead of displaying them (can be used multiple times)
    #[arg(long = "summarize", value_name = "PREFIX")]
    summarize: Vec<String>,

    /// Directory prefix to start from
    #[arg(long, default_value = "/", env = "ETCDSTATS_PREFIX")]
    prefix: String,

    /// Per-request timeout, e.g. 10s, 2m (default: wait indefinitely)
    #[arg(long, value_name = "DURATION")]
    timeout: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Show human-readable sizes (1.5K, 2.0M)
    #[arg(short = 'H', long = "human")]
    human: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    fn verbosity(&self) -> i8 {
        if self.quiet {
            -1
        } else {
            self.verbose.min(i8::MAX as u8) as i8
        }
    }
}

/// Parse a duration string like "30s" or "2m" using humantime syntax.
fn parse_duration_string(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim()).map_err(|e| e.to_string())
}

fn open_store(args: &Args) -> Result<Box<dyn KeyStore>, String> {
    if let Some(ref path) = args.snapshot {
        let store = SnapshotStore::open(path).map_err(|e| e.to_string())?;
        return Ok(Box::new(store));
    }

    let server = args.server.clone().unwrap_or_default();
    if server.is_empty() {
        return Err("--server is required".to_string());
    }

    let timeout = match args.timeout {
        Some(ref s) => Some(
            parse_duration_string(s).map_err(|e| format!("invalid --timeout '{}': {}", s, e))?,
        ),
        None => None,
    };

    let config = EtcdConfig {
        server,
        ca_cert: args.cacert.clone(),
        cert: args.cert.clone(),
        key: args.key.clone(),
        timeout,
    };
    let client = EtcdClient::new(&config).map_err(|e| e.to_string())?;
    Ok(Box::new(client))
}

fn main() {
    let args = Args::parse();
    let use_color = should_use_color(args.color);
    logging::init(args.verbosity(), use_color);

    let store = open_store(&args).unwrap_or_else(|e| {
        eprintln!("etcdstats: {}", e);
        process::exit(1);
    });

    let nodes = match collect(&*store, &args.prefix) {
        Ok(nodes) => nodes,
        Err(e) => {
            tracing::debug!(error = ?e, "traversal aborted");
            eprintln!("etcdstats: {}", e);
            process::exit(1);
        }
    };

    let report_config = ReportConfig {
        top_n: usize::try_from(args.n).unwrap_or(0),
        summarize: args.summarize.clone(),
    };
    let report = build_report(nodes, &report_config);

    let result = if args.json {
        print_report_json(&report)
    } else {
        let output_config = OutputConfig {
            use_color,
            human_sizes: args.human,
        };
        print_report(&report, output_config)
    };

    if let Err(e) = result {
        eprintln!("etcdstats: error writing output: {}", e);
        process::exit(1);
    }
}
