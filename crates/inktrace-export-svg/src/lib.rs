//! SVG export for InkTrace
//!
//! Turns a [`VectorDocument`] into the SVG text that gets written to disk and
//! uploaded.
//!
//! ## Output
//!
//! - Fixed `300×300` root element with a matching `viewBox`
//! - `<circle>` for dots, `<path>` for outlines and centerlines
//! - Solid black everywhere
//! - Every number printed with a fixed precision (2 decimals by default), so
//!   the same document always produces byte-identical text

mod path_data;

use std::fmt::Write as FmtWrite;
use std::io;

use inktrace_core::{Shape, VectorDocument};

pub use path_data::{format_number, path_data};

/// Namespace of the root element
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Serializes vector documents to SVG text
#[derive(Debug, Clone)]
pub struct SvgWriter {
    /// Decimal places for every coordinate and length
    precision: usize,
}

impl SvgWriter {
    /// Create a writer with 2-decimal output
    pub fn new() -> Self {
        Self { precision: 2 }
    }

    /// Change the number of decimal places
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Render the complete SVG document
    pub fn write(&self, document: &VectorDocument) -> String {
        let mut svg = String::with_capacity(256 + document.len() * 512);

        // `fmt::Write` into a String cannot fail
        let _ = writeln!(
            &mut svg,
            r#"<svg xmlns="{}" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            SVG_NAMESPACE,
            document.width(),
            document.height(),
            document.width(),
            document.height()
        );

        for shape in document.shapes() {
            self.write_shape(&mut svg, shape);
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Render the document straight into an `io::Write`
    pub fn write_to<W: io::Write>(&self, document: &VectorDocument, mut out: W) -> io::Result<()> {
        out.write_all(self.write(document).as_bytes())
    }

    fn write_shape(&self, svg: &mut String, shape: &Shape) {
        let p = self.precision;
        match shape {
            Shape::Circle { center, radius } => {
                let _ = writeln!(
                    svg,
                    r#"<circle cx="{}" cy="{}" r="{}" fill="black" />"#,
                    format_number(center.x, p),
                    format_number(center.y, p),
                    format_number(*radius, p)
                );
            }
            Shape::FilledPath(path) => {
                let _ = writeln!(
                    svg,
                    r#"<path d="{}" fill="black" fill-rule="nonzero" />"#,
                    path_data(path, p)
                );
            }
            Shape::StrokedPath { path, width } => {
                let _ = writeln!(
                    svg,
                    r#"<path d="{}" stroke="black" fill="none" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round" />"#,
                    path_data(path, p),
                    format_number(*width, p)
                );
            }
        }
    }
}

impl Default for SvgWriter {
    fn default() -> Self {
        Self::new()
    }
}
