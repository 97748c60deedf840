//! Captured pen input

use kurbo::Point;

use crate::error::StrokeError;

/// One recorded pen sample
///
/// `width` is the instantaneous pen diameter. A width of zero means the input
/// device reported no width at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSample {
    pub position: Point,
    pub width: f64,
}

impl StrokeSample {
    pub fn new(x: f64, y: f64, width: f64) -> Self {
        Self {
            position: Point::new(x, y),
            width,
        }
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }
}

/// An ordered, non-empty run of samples from pen-down to pen-up
///
/// Sample order is temporal order and decides the traversal direction of the
/// generated outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    samples: Vec<StrokeSample>,
}

impl Stroke {
    /// Create a stroke, rejecting an empty sample list
    pub fn new(samples: Vec<StrokeSample>) -> Result<Self, StrokeError> {
        if samples.is_empty() {
            return Err(StrokeError::Empty);
        }
        Ok(Self { samples })
    }

    /// A tap: a stroke made of a single sample
    pub fn dot(sample: StrokeSample) -> Self {
        Self {
            samples: vec![sample],
        }
    }

    pub fn samples(&self) -> &[StrokeSample] {
        &self.samples
    }

    /// The pen-down sample
    pub fn first(&self) -> &StrokeSample {
        // Non-empty by construction
        &self.samples[0]
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; present for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_single(&self) -> bool {
        self.samples.len() == 1
    }
}

impl TryFrom<Vec<StrokeSample>> for Stroke {
    type Error = StrokeError;

    fn try_from(samples: Vec<StrokeSample>) -> Result<Self, Self::Error> {
        Stroke::new(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stroke_rejected() {
        assert_eq!(Stroke::new(vec![]), Err(StrokeError::Empty));
    }

    #[test]
    fn test_dot_is_single() {
        let stroke = Stroke::dot(StrokeSample::new(1.0, 2.0, 3.0));
        assert!(stroke.is_single());
        assert_eq!(stroke.first().x(), 1.0);
        assert_eq!(stroke.first().y(), 2.0);
    }

    #[test]
    fn test_try_from_keeps_order() {
        let stroke = Stroke::try_from(vec![
            StrokeSample::new(0.0, 0.0, 1.0),
            StrokeSample::new(5.0, 0.0, 2.0),
        ])
        .expect("non-empty");
        assert_eq!(stroke.len(), 2);
        assert_eq!(stroke.samples()[1].width, 2.0);
    }
}
