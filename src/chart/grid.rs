//! Qualitative detection-accuracy grids.
//!
//! A flat percentage column is reshaped row-major into a fixed
//! (time-threshold x distance-threshold) grid and rendered as a table of
//! colored cells: green intensity for positive outcome classes (correct
//! detections), red intensity for negative ones (wrong/missed detections).

use std::path::Path;

use color_eyre::eyre::Result;
use thiserror::Error;

use super::svg::{SvgDocument, TextAnchor};
use super::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Reshape failure: the flat column does not fill the grid exactly.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot reshape {len} values into a {rows}x{cols} grid")]
pub struct GridShapeError {
    pub len: usize,
    pub rows: usize,
    pub cols: usize,
}

/// A rows x cols grid of percentages, stored row-major.
#[derive(Debug, Clone)]
pub struct QualitativeGrid {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl QualitativeGrid {
    /// Reshapes `values` row-major. The source column order is an implicit
    /// contract with the upstream producer: row-major over
    /// (time threshold, distance threshold).
    pub fn from_flat(values: &[f64], rows: usize, cols: usize) -> Result<Self, GridShapeError> {
        if values.len() != rows * cols {
            return Err(GridShapeError {
                len: values.len(),
                rows,
                cols,
            });
        }
        Ok(Self {
            rows,
            cols,
            cells: values.to_vec(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.cols + col]
    }
}

/// Whether high values are good (green) or bad (red).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomePolarity {
    Positive,
    Negative,
}

/// Rendering attributes for a qualitative grid, decoupled from the data.
#[derive(Debug, Clone)]
pub struct GridChart {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// Value that saturates the cell color.
    pub declared_max: f64,
    pub polarity: OutcomePolarity,
}

impl GridChart {
    /// Renders the grid with a header row/column of labels. Label counts
    /// must match the grid shape; the pipeline validates that before calling.
    pub fn render(&self, grid: &QualitativeGrid) -> SvgDocument {
        let mut doc = SvgDocument::new(CANVAS_WIDTH, CANVAS_HEIGHT);

        let left = 90.0;
        let top = 40.0;
        let cell_w = (CANVAS_WIDTH - left - 20.0) / grid.cols() as f64;
        let cell_h = (CANVAS_HEIGHT - top - 20.0) / grid.rows() as f64;

        for (col, label) in self.col_labels.iter().enumerate() {
            doc.text(
                left + (col as f64 + 0.5) * cell_w,
                top - 12.0,
                TextAnchor::Middle,
                11.0,
                label,
            );
        }
        for (row, label) in self.row_labels.iter().enumerate() {
            doc.text(
                left - 10.0,
                top + (row as f64 + 0.5) * cell_h + 4.0,
                TextAnchor::End,
                11.0,
                label,
            );
        }

        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let value = grid.get(row, col);
                let x = left + col as f64 * cell_w;
                let y = top + row as f64 * cell_h;
                doc.rect_outlined(x, y, cell_w, cell_h, &self.cell_color(value), "black");
                doc.text(
                    x + cell_w / 2.0,
                    y + cell_h / 2.0 + 4.0,
                    TextAnchor::Middle,
                    11.0,
                    &format!("{value:.2}"),
                );
            }
        }

        doc
    }

    pub fn save(&self, grid: &QualitativeGrid, path: &Path) -> Result<()> {
        self.render(grid).write_to(path)
    }

    /// Linear color interpolation: full white at 0, saturated green or red
    /// at `declared_max`.
    fn cell_color(&self, value: f64) -> String {
        let intensity = if self.declared_max > 0.0 {
            (value / self.declared_max).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let faded = (255.0 * (1.0 - intensity)) as u8;
        match self.polarity {
            OutcomePolarity::Positive => format!("#{faded:02X}FF{faded:02X}"),
            OutcomePolarity::Negative => format!("#FF{faded:02X}{faded:02X}"),
        }
    }
}
