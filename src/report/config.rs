//! Output configuration types

/// Configuration for report rendering.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Show sizes as `1.5K`, `2.0M` instead of raw byte counts
    pub human_sizes: bool,
}

impl OutputConfig {
    /// Plain output: no color, raw byte counts.
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn with_human_sizes(mut self, human: bool) -> Self {
        self.human_sizes = human;
        self
    }
}
