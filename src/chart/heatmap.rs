//! 2-D histogram charts.
//!
//! Bins (x, y) points into a fixed grid and renders each bin as a cell whose
//! blue intensity is linear in the bin count, with the bin-count scale shown
//! as a small colorbar. Used for the processing-timestamp spread-over-time
//! charts, where the x axis is match time labelled only at its ends.

use std::path::Path;

use color_eyre::eyre::Result;

use super::svg::{SvgDocument, TextAnchor};
use super::{fmt_tick, CANVAS_HEIGHT, CANVAS_WIDTH, MARGIN_BOTTOM, MARGIN_LEFT, MARGIN_TOP};

/// A binned density chart over a fixed (x, y) window.
#[derive(Debug, Clone)]
pub struct HeatmapChart {
    pub x_label: String,
    pub y_label: String,
    pub colorbar_label: String,
    /// Labels drawn at the left and right edge of the x axis.
    pub x_edge_labels: (String, String),
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub bins: (usize, usize),
}

impl HeatmapChart {
    /// Bins `points` and renders the chart. Points outside the window are
    /// not counted, matching the fixed-range histogram the chart replaces.
    pub fn render(&self, points: &[(f64, f64)]) -> SvgDocument {
        let (x_bins, y_bins) = self.bins;
        let counts = self.bin_counts(points);
        let max_count = counts.iter().flatten().copied().max().unwrap_or(0);

        let mut doc = SvgDocument::new(CANVAS_WIDTH, CANVAS_HEIGHT);

        let colorbar_w = 70.0;
        let plot_w = CANVAS_WIDTH - MARGIN_LEFT - colorbar_w - 30.0;
        let plot_h = CANVAS_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let cell_w = plot_w / x_bins as f64;
        let cell_h = plot_h / y_bins as f64;

        for (xi, column) in counts.iter().enumerate() {
            for (yi, count) in column.iter().enumerate() {
                if *count == 0 {
                    continue;
                }
                let x = MARGIN_LEFT + xi as f64 * cell_w;
                // y bins grow upward, the canvas grows downward
                let y = MARGIN_TOP + plot_h - (yi + 1) as f64 * cell_h;
                doc.rect(x, y, cell_w, cell_h, &blue_scale(*count, max_count));
            }
        }

        // Frame and axis labels
        doc.rect_outlined(MARGIN_LEFT, MARGIN_TOP, plot_w, plot_h, "none", "black");
        doc.text(
            MARGIN_LEFT,
            MARGIN_TOP + plot_h + 16.0,
            TextAnchor::Middle,
            11.0,
            &self.x_edge_labels.0,
        );
        doc.text(
            MARGIN_LEFT + plot_w,
            MARGIN_TOP + plot_h + 16.0,
            TextAnchor::Middle,
            11.0,
            &self.x_edge_labels.1,
        );
        doc.text(
            MARGIN_LEFT + plot_w / 2.0,
            CANVAS_HEIGHT - 10.0,
            TextAnchor::Middle,
            12.0,
            &self.x_label,
        );
        doc.vertical_text(16.0, MARGIN_TOP + plot_h / 2.0, 12.0, &self.y_label);
        for i in 0..=4 {
            let frac = i as f64 / 4.0;
            let value = self.y_range.0 + (self.y_range.1 - self.y_range.0) * frac;
            let y = MARGIN_TOP + plot_h - frac * plot_h;
            doc.text(MARGIN_LEFT - 6.0, y + 4.0, TextAnchor::End, 11.0, &fmt_tick(value));
        }

        // Colorbar: count scale from 0 (white) to max (full blue)
        let bar_x = MARGIN_LEFT + plot_w + 16.0;
        let steps = 20usize;
        let step_h = plot_h / steps as f64;
        for i in 0..steps {
            let count = (max_count as f64 * (i + 1) as f64 / steps as f64).round() as u64;
            let y = MARGIN_TOP + plot_h - (i + 1) as f64 * step_h;
            doc.rect(bar_x, y, 14.0, step_h, &blue_scale(count, max_count));
        }
        doc.rect_outlined(bar_x, MARGIN_TOP, 14.0, plot_h, "none", "black");
        doc.text(bar_x + 20.0, MARGIN_TOP + plot_h + 4.0, TextAnchor::Start, 10.0, "0");
        doc.text(
            bar_x + 20.0,
            MARGIN_TOP + 10.0,
            TextAnchor::Start,
            10.0,
            &max_count.to_string(),
        );
        doc.vertical_text(
            bar_x + 48.0,
            MARGIN_TOP + plot_h / 2.0,
            11.0,
            &self.colorbar_label,
        );

        doc
    }

    pub fn save(&self, points: &[(f64, f64)], path: &Path) -> Result<()> {
        self.render(points).write_to(path)
    }

    /// counts[x_bin][y_bin], both 0-indexed from the low edge.
    fn bin_counts(&self, points: &[(f64, f64)]) -> Vec<Vec<u64>> {
        let (x_bins, y_bins) = self.bins;
        let (x_min, x_max) = self.x_range;
        let (y_min, y_max) = self.y_range;
        let x_span = if x_max > x_min { x_max - x_min } else { 1.0 };
        let y_span = if y_max > y_min { y_max - y_min } else { 1.0 };

        let mut counts = vec![vec![0u64; y_bins]; x_bins];
        for (x, y) in points {
            if *x < x_min || *x > x_max || *y < y_min || *y > y_max {
                continue;
            }
            let xi = (((x - x_min) / x_span * x_bins as f64) as usize).min(x_bins - 1);
            let yi = (((y - y_min) / y_span * y_bins as f64) as usize).min(y_bins - 1);
            counts[xi][yi] += 1;
        }
        counts
    }
}

fn blue_scale(count: u64, max_count: u64) -> String {
    if max_count == 0 {
        return "white".to_string();
    }
    let intensity = count as f64 / max_count as f64;
    let r = (255.0 * (1.0 - intensity * 0.9)) as u8;
    let g = (255.0 * (1.0 - intensity * 0.6)) as u8;
    format!("#{r:02X}{g:02X}FF")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> HeatmapChart {
        HeatmapChart {
            x_label: "Match time".to_string(),
            y_label: "Processing timestamp variance in ms".to_string(),
            colorbar_label: "Counts in bin".to_string(),
            x_edge_labels: ("Start".to_string(), "End".to_string()),
            x_range: (0.0, 100.0),
            y_range: (0.0, 10.0),
            bins: (10, 10),
        }
    }

    #[test]
    fn test_bin_counts_cover_edges() {
        let counts = chart().bin_counts(&[(0.0, 0.0), (100.0, 10.0), (50.0, 5.0)]);
        assert_eq!(counts[0][0], 1);
        // Points on the high edge land in the last bin, not out of range.
        assert_eq!(counts[9][9], 1);
        assert_eq!(counts[5][5], 1);
    }

    #[test]
    fn test_out_of_range_points_are_dropped() {
        let counts = chart().bin_counts(&[(-1.0, 5.0), (50.0, 11.0)]);
        let total: u64 = counts.iter().flatten().sum();
        assert_eq!(total, 0);
    }

    #[test]
    fn test_render_labels_axis_ends() {
        let svg = chart().render(&[(50.0, 5.0)]).finish();
        assert!(svg.contains("Start"));
        assert!(svg.contains("End"));
        assert!(svg.contains("Counts in bin"));
    }
}
