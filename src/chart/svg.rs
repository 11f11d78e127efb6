//! Minimal SVG document assembly.
//!
//! Charts are emitted as standalone vector images. The document is built as
//! a flat list of elements and serialized once; there is no DOM, no styling
//! layer, and no external renderer.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};

/// Horizontal anchor of a text element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// An SVG document under construction.
#[derive(Debug)]
pub struct SvgDocument {
    width: f64,
    height: f64,
    elements: Vec<String>,
}

impl SvgDocument {
    pub fn new(width: f64, height: f64) -> Self {
        let mut doc = Self {
            width,
            height,
            elements: Vec::new(),
        };
        // White canvas
        doc.rect(0.0, 0.0, width, height, "white");
        doc
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str) {
        self.elements.push(format!(
            r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{fill}"/>"#
        ));
    }

    pub fn rect_outlined(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, stroke: &str) {
        self.elements.push(format!(
            r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{fill}" stroke="{stroke}" stroke-width="1"/>"#
        ));
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, width: f64) {
        self.elements.push(format!(
            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{stroke}" stroke-width="{width}"/>"#
        ));
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], stroke: &str, width: f64) {
        if points.is_empty() {
            return;
        }
        let mut rendered = String::with_capacity(points.len() * 16);
        for (x, y) in points {
            let _ = write!(rendered, "{x:.2},{y:.2} ");
        }
        self.elements.push(format!(
            r#"<polyline points="{}" fill="none" stroke="{stroke}" stroke-width="{width}"/>"#,
            rendered.trim_end()
        ));
    }

    pub fn text(&mut self, x: f64, y: f64, anchor: TextAnchor, size: f64, content: &str) {
        self.elements.push(format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="{}" font-family="sans-serif" font-size="{size}">{}</text>"#,
            anchor.as_str(),
            escape(content)
        ));
    }

    /// Text rotated 90° counter-clockwise around its anchor, for y-axis labels.
    pub fn vertical_text(&mut self, x: f64, y: f64, size: f64, content: &str) {
        self.elements.push(format!(
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-family="sans-serif" font-size="{size}" transform="rotate(-90 {x:.2} {y:.2})">{}</text>"#,
            escape(content)
        ));
    }

    pub fn finish(self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">"#,
            self.width, self.height, self.width, self.height
        );
        for element in &self.elements {
            let _ = writeln!(out, "{element}");
        }
        out.push_str("</svg>\n");
        out
    }

    /// Serializes the document and writes it to `path`.
    pub fn write_to(self, path: &Path) -> Result<()> {
        fs::write(path, self.finish())
            .with_context(|| format!("failed to write chart {}", path.display()))?;
        log::info!("Wrote {}", path.display());
        Ok(())
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_structure() {
        let mut doc = SvgDocument::new(100.0, 50.0);
        doc.line(0.0, 0.0, 100.0, 50.0, "black", 1.0);
        doc.text(10.0, 10.0, TextAnchor::Middle, 11.0, "P(Latency <= x)");
        let svg = doc.finish();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("<line"));
        // Text content is escaped
        assert!(svg.contains("P(Latency &lt;= x)"));
    }

    #[test]
    fn test_empty_polyline_is_dropped() {
        let mut doc = SvgDocument::new(10.0, 10.0);
        doc.polyline(&[], "red", 1.0);
        assert!(!doc.finish().contains("polyline"));
    }
}
