//! The vector drawing handed from the vectorizer to the exporter

use kurbo::{BezPath, Point};

/// Side length of the square drawing canvas, in logical units
pub const CANVAS_SIZE: f64 = 300.0;

/// One solid black primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A filled dot, used for single-sample strokes
    Circle { center: Point, radius: f64 },
    /// A variable-width outline, filled with the nonzero rule
    FilledPath(BezPath),
    /// A constant-width centerline with round caps and joins
    StrokedPath { path: BezPath, width: f64 },
}

impl Shape {
    pub fn is_circle(&self) -> bool {
        matches!(self, Shape::Circle { .. })
    }

    pub fn is_path(&self) -> bool {
        !self.is_circle()
    }
}

/// A finished drawing on the fixed 300×300 canvas
///
/// Shapes are kept in stroke order. The document never changes after
/// construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorDocument {
    shapes: Vec<Shape>,
}

impl VectorDocument {
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn width(&self) -> f64 {
        CANVAS_SIZE
    }

    pub fn height(&self) -> f64 {
        CANVAS_SIZE
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Number of circle primitives
    pub fn circle_count(&self) -> usize {
        self.shapes.iter().filter(|s| s.is_circle()).count()
    }

    /// Number of path primitives, filled or stroked
    pub fn path_count(&self) -> usize {
        self.shapes.iter().filter(|s| s.is_path()).count()
    }
}
