//! Console table formatter

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

use super::Report;
use super::config::OutputConfig;
use super::utils::{format_size, layout_columns};

const HEADER: [&str; 3] = ["NODE", "CHILDREN", "SIZE"];

/// Renders a `Report` as an aligned text table followed by the totals.
pub struct TableFormatter {
    config: OutputConfig,
}

impl TableFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    fn size(&self, bytes: u64) -> String {
        if self.config.human_sizes {
            format_size(bytes)
        } else {
            bytes.to_string()
        }
    }

    /// Format the report to a plain string (no color codes).
    pub fn format(&self, report: &Report) -> String {
        let mut out = NoColor::new(Vec::new());
        // Writing into a Vec cannot fail
        let _ = self.write(&mut out, report);
        String::from_utf8_lossy(&out.into_inner()).into_owned()
    }

    /// Write the report to any color-capable writer.
    pub fn write<W: WriteColor>(&self, out: &mut W, report: &Report) -> io::Result<()> {
        let mut bold = ColorSpec::new();
        bold.set_bold(true);
        let mut dir_color = ColorSpec::new();
        dir_color.set_fg(Some(Color::Cyan)).set_bold(true);

        writeln!(
            out,
            "Top {} highest etcd nodes by value size (excluding summarized items):",
            report.top_n
        )?;

        let mut cells: Vec<Vec<String>> = Vec::with_capacity(report.rows.len() + 1);
        cells.push(HEADER.iter().map(|h| h.to_string()).collect());
        for row in &report.rows {
            cells.push(vec![
                row.key.clone(),
                row.children
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
                self.size(row.size),
            ]);
        }
        let widths = layout_columns(&cells);

        for (i, line) in cells.iter().enumerate() {
            let spec = if i == 0 {
                Some(&bold)
            } else if report.rows[i - 1].is_dir() {
                Some(&dir_color)
            } else {
                None
            };

            for (col, cell) in line.iter().enumerate() {
                // Only the header styles every column; rows style the key
                match spec {
                    Some(s) if i == 0 || col == 0 => out.set_color(s)?,
                    _ => {}
                }
                write!(out, "{}", cell)?;
                out.reset()?;
                if let Some(&width) = widths.get(col) {
                    let pad = width.saturating_sub(cell.chars().count());
                    write!(out, "{:pad$}", "", pad = pad)?;
                }
            }
            writeln!(out)?;
        }

        writeln!(out)?;
        out.set_color(&bold)?;
        write!(out, "Total value size:")?;
        out.reset()?;
        writeln!(out, " {}", self.size(report.total_size))?;
        out.set_color(&bold)?;
        write!(out, "Value size excluding summarized items:")?;
        out.reset()?;
        writeln!(out, " {}", self.size(report.total_size_excluding))?;
        Ok(())
    }
}

/// Print the report table to stdout.
pub fn print_report(report: &Report, config: OutputConfig) -> io::Result<()> {
    let choice = if config.use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    TableFormatter::new(config).write(&mut stdout, report)?;
    stdout.flush()
}
