//! JSON output formatting

use std::io;

use super::Report;

/// Serialize a report as pretty-printed JSON.
pub fn report_to_json(report: &Report) -> io::Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

/// Print a report as pretty-printed JSON to stdout.
pub fn print_report_json(report: &Report) -> io::Result<()> {
    println!("{}", report_to_json(report)?);
    Ok(())
}
