//! Multi-series line charts with axes, grid lines, and an optional legend.
//!
//! Used for the per-stream and combined latency CDF charts and for the
//! cross-run scalability charts. Layout constants are not load-bearing.

use std::path::Path;

use color_eyre::eyre::Result;

use super::svg::{SvgDocument, TextAnchor};
use super::{fmt_tick, CANVAS_HEIGHT, CANVAS_WIDTH, MARGIN_BOTTOM, MARGIN_LEFT, MARGIN_RIGHT, MARGIN_TOP};

/// One named, colored line.
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub color: String,
    pub points: Vec<(f64, f64)>,
}

/// A line chart over a fixed x window.
#[derive(Debug, Clone)]
pub struct LineChart {
    pub x_label: String,
    pub y_label: String,
    /// Points outside this window are not drawn.
    pub x_range: (f64, f64),
    /// `None` derives the window from the data with a zero floor.
    pub y_range: Option<(f64, f64)>,
    /// Explicit x tick positions; `None` places five evenly spaced ticks.
    pub x_ticks: Option<Vec<f64>>,
    pub legend: bool,
    pub series: Vec<Series>,
}

impl LineChart {
    pub fn render(&self) -> SvgDocument {
        let mut doc = SvgDocument::new(CANVAS_WIDTH, CANVAS_HEIGHT);

        let plot_w = CANVAS_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = CANVAS_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

        let (x_min, x_max) = self.x_range;
        let x_span = if x_max > x_min { x_max - x_min } else { 1.0 };

        let (y_min, y_max) = self.y_range.unwrap_or_else(|| self.derive_y_range());
        let y_span = if y_max > y_min { y_max - y_min } else { 1.0 };

        let to_x = |x: f64| MARGIN_LEFT + (x - x_min) / x_span * plot_w;
        let to_y = |y: f64| MARGIN_TOP + plot_h - (y - y_min) / y_span * plot_h;

        // Grid and ticks
        let x_ticks: Vec<f64> = match &self.x_ticks {
            Some(ticks) => ticks
                .iter()
                .copied()
                .filter(|t| *t >= x_min && *t <= x_max)
                .collect(),
            None => evenly_spaced(x_min, x_max, 5),
        };
        for tick in &x_ticks {
            let x = to_x(*tick);
            doc.line(x, MARGIN_TOP, x, MARGIN_TOP + plot_h, "#dddddd", 1.0);
            doc.text(x, MARGIN_TOP + plot_h + 16.0, TextAnchor::Middle, 11.0, &fmt_tick(*tick));
        }
        for tick in evenly_spaced(y_min, y_max, 5) {
            let y = to_y(tick);
            doc.line(MARGIN_LEFT, y, MARGIN_LEFT + plot_w, y, "#dddddd", 1.0);
            doc.text(MARGIN_LEFT - 6.0, y + 4.0, TextAnchor::End, 11.0, &fmt_tick(tick));
        }

        // Axes
        doc.line(MARGIN_LEFT, MARGIN_TOP, MARGIN_LEFT, MARGIN_TOP + plot_h, "black", 1.0);
        doc.line(
            MARGIN_LEFT,
            MARGIN_TOP + plot_h,
            MARGIN_LEFT + plot_w,
            MARGIN_TOP + plot_h,
            "black",
            1.0,
        );
        doc.text(
            MARGIN_LEFT + plot_w / 2.0,
            CANVAS_HEIGHT - 10.0,
            TextAnchor::Middle,
            12.0,
            &self.x_label,
        );
        doc.vertical_text(16.0, MARGIN_TOP + plot_h / 2.0, 12.0, &self.y_label);

        // Series polylines, clipped to the x window
        for series in &self.series {
            let points: Vec<(f64, f64)> = series
                .points
                .iter()
                .filter(|(x, _)| *x >= x_min && *x <= x_max)
                .map(|(x, y)| (to_x(*x), to_y(y.clamp(y_min, y_max))))
                .collect();
            doc.polyline(&points, &series.color, 1.5);
        }

        if self.legend {
            let line_height = 16.0;
            let box_h = self.series.len() as f64 * line_height + 8.0;
            let box_w = 190.0;
            let box_x = MARGIN_LEFT + plot_w - box_w - 8.0;
            let box_y = MARGIN_TOP + plot_h - box_h - 8.0;
            doc.rect_outlined(box_x, box_y, box_w, box_h, "white", "#999999");
            for (i, series) in self.series.iter().enumerate() {
                let y = box_y + 12.0 + i as f64 * line_height;
                doc.line(box_x + 6.0, y, box_x + 26.0, y, &series.color, 2.0);
                doc.text(box_x + 32.0, y + 4.0, TextAnchor::Start, 10.0, &series.name);
            }
        }

        doc
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.render().write_to(path)
    }

    fn derive_y_range(&self) -> (f64, f64) {
        let max = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|(_, y)| *y))
            .fold(f64::NEG_INFINITY, f64::max);
        if max.is_finite() && max > 0.0 {
            (0.0, max)
        } else {
            (0.0, 1.0)
        }
    }
}

fn evenly_spaced(min: f64, max: f64, count: usize) -> Vec<f64> {
    let span = if max > min { max - min } else { 1.0 };
    (0..count)
        .map(|i| min + span * i as f64 / (count - 1) as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_with(points: Vec<(f64, f64)>) -> LineChart {
        LineChart {
            x_label: "Latency in ms".to_string(),
            y_label: "P(Latency <= x)".to_string(),
            x_range: (0.0, 10.0),
            y_range: None,
            x_ticks: None,
            legend: false,
            series: vec![Series {
                name: "kickEvent".to_string(),
                color: "#2CA02C".to_string(),
                points,
            }],
        }
    }

    #[test]
    fn test_render_contains_series_and_labels() {
        let svg = chart_with(vec![(0.0, 0.0), (5.0, 0.5), (10.0, 0.9)])
            .render()
            .finish();
        assert!(svg.contains("polyline"));
        assert!(svg.contains("#2CA02C"));
        assert!(svg.contains("Latency in ms"));
    }

    #[test]
    fn test_points_beyond_x_window_are_clipped() {
        let chart = chart_with(vec![(5.0, 0.5), (50.0, 0.99)]);
        let svg = chart.render().finish();
        // The out-of-window point would land far right of the canvas.
        assert!(!svg.contains("2350.00"));
    }

    #[test]
    fn test_legend_lists_series_names() {
        let mut chart = chart_with(vec![(0.0, 0.0), (10.0, 1.0)]);
        chart.legend = true;
        let svg = chart.render().finish();
        assert!(svg.contains("kickEvent"));
    }
}
