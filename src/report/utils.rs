//! Shared utility functions for report formatting

/// Padding between table columns.
pub const COLUMN_PADDING: usize = 2;

/// Format a size in bytes to human-readable format.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1}G", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1}M", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}K", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}

/// Compute the display width of each column except the last.
///
/// Every cell is padded to the widest cell in its column plus
/// `COLUMN_PADDING`. The last column is never padded.
pub fn layout_columns<R: AsRef<[String]>>(rows: &[R]) -> Vec<usize> {
    let columns = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);
    (0..columns.saturating_sub(1))
        .map(|col| {
            rows.iter()
                .filter_map(|r| r.as_ref().get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                + COLUMN_PADDING
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0B");
        assert_eq!(format_size(1023), "1023B");
        assert_eq!(format_size(1024), "1.0K");
        assert_eq!(format_size(1536), "1.5K");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0M");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0G");
    }

    #[test]
    fn test_layout_columns() {
        let rows = vec![
            vec!["NODE".to_string(), "CHILDREN".to_string(), "SIZE".to_string()],
            vec!["/registry/pods".to_string(), "3".to_string(), "12345".to_string()],
        ];
        assert_eq!(layout_columns(&rows), vec![16, 10]);
    }

    #[test]
    fn test_layout_columns_empty() {
        let rows: Vec<Vec<String>> = Vec::new();
        assert!(layout_columns(&rows).is_empty());
    }
}
