//! Public types and constants for the visualization module.

/// Legend placement options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendMode {
    /// Overlay legend inside the plotting area (may overlap data).
    Inside,
    /// Separate, non-overlapping legend panel on the right side.
    Right,
    /// Separate legend band at the top.
    Top,
    /// Separate legend band at the bottom.
    Bottom,
}

/// Horizontal legend below the chart keeps long country names readable.
pub const DEFAULT_LEGEND_MODE: LegendMode = LegendMode::Bottom;

/// Canvas and labelling settings shared by every figure.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// Locale tag for tick labels (`"en"`, `"de"`, ...).
    pub locale: String,
    pub legend: LegendMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            locale: "en".into(),
            legend: DEFAULT_LEGEND_MODE,
        }
    }
}
