//! Chart rendering for evaluation outputs.
//!
//! All charts are standalone SVG vector images assembled as strings; chart
//! content (layout, colors of the chrome, fonts) is not load-bearing for the
//! evaluation results and may be re-skinned freely.

pub mod grid;
pub mod heatmap;
pub mod line;
pub mod svg;

pub use grid::{GridChart, GridShapeError, OutcomePolarity, QualitativeGrid};
pub use heatmap::HeatmapChart;
pub use line::{LineChart, Series};
pub use svg::SvgDocument;

pub(crate) const CANVAS_WIDTH: f64 = 640.0;
pub(crate) const CANVAS_HEIGHT: f64 = 480.0;
pub(crate) const MARGIN_LEFT: f64 = 70.0;
pub(crate) const MARGIN_RIGHT: f64 = 20.0;
pub(crate) const MARGIN_TOP: f64 = 20.0;
pub(crate) const MARGIN_BOTTOM: f64 = 50.0;

/// Compact tick label: integers render without a fraction.
pub(crate) fn fmt_tick(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else if value.abs() >= 100.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
