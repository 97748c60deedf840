//! Stroke vectorization for InkTrace
//!
//! Turns captured pen strokes into the shape primitives of a
//! [`VectorDocument`]. Two modes are available:
//!
//! - [`VectorizeMode::PressureOutline`] resamples each stroke and wraps every
//!   segment in a round-capped capsule whose width follows pen pressure. A
//!   stroke becomes one filled compound path.
//! - [`VectorizeMode::Centerline`] draws each stroke as one constant-width
//!   polyline through the raw samples.
//!
//! Either way a single-sample stroke becomes a dot.
//!
//! ```rust
//! use inktrace_core::{Stroke, StrokeSample};
//! use inktrace_vectorize::Vectorizer;
//!
//! let stroke = Stroke::new(vec![
//!     StrokeSample::new(10.0, 10.0, 4.0),
//!     StrokeSample::new(20.0, 12.0, 6.0),
//!     StrokeSample::new(30.0, 11.0, 5.0),
//! ])?;
//! let document = Vectorizer::default().vectorize(&[stroke])?;
//! assert_eq!(document.path_count(), 1);
//! assert_eq!(document.circle_count(), 0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod centerline;
pub mod outline;
pub mod resample;

use std::fmt;
use std::str::FromStr;

use inktrace_core::error::SampleDefect;
use inktrace_core::{Shape, Stroke, StrokeSample, VectorDocument, VectorizeError, CANVAS_SIZE};
use log::debug;

pub use outline::{MIN_SEGMENT_LENGTH, MIN_WIDTH};

/// Spatial resampling step used for pressure outlines
pub const DEFAULT_RESAMPLE_STEP: f64 = 1.0;

/// Smallest accepted resampling step
pub const MIN_RESAMPLE_STEP: f64 = 0.01;

/// Centerline width used when the input carries no width information
pub const DEFAULT_WIDTH: f64 = 3.0;

/// Largest accepted coordinate magnitude. Pens may leave the canvas a little,
/// not by orders of magnitude.
pub const MAX_COORDINATE: f64 = 10.0 * CANVAS_SIZE;

/// Largest accepted pen width
pub const MAX_WIDTH: f64 = CANVAS_SIZE;

/// Most points one stroke may resample to
pub const MAX_RESAMPLED_SAMPLES: usize = 200_000;

/// How strokes are turned into shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VectorizeMode {
    /// Filled variable-width outline
    #[default]
    PressureOutline,
    /// Stroked constant-width polyline
    Centerline,
}

impl VectorizeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            VectorizeMode::PressureOutline => "pressure-outline",
            VectorizeMode::Centerline => "centerline",
        }
    }
}

impl fmt::Display for VectorizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VectorizeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pressure-outline" | "pressure" | "outline" => Ok(VectorizeMode::PressureOutline),
            "centerline" | "line" => Ok(VectorizeMode::Centerline),
            other => Err(format!(
                "unknown vectorize mode '{other}', expected 'pressure-outline' or 'centerline'"
            )),
        }
    }
}

/// Vectorizer settings
#[derive(Debug, Clone, PartialEq)]
pub struct VectorizeOptions {
    pub mode: VectorizeMode,
    /// Arc-length step between resampled points (pressure outline only)
    pub resample_step: f64,
    /// Centerline width when the first sample has width 0
    pub default_width: f64,
}

impl Default for VectorizeOptions {
    fn default() -> Self {
        Self {
            mode: VectorizeMode::default(),
            resample_step: DEFAULT_RESAMPLE_STEP,
            default_width: DEFAULT_WIDTH,
        }
    }
}

/// Converts strokes into a [`VectorDocument`]
///
/// Vectorizing is a pure function of the strokes and the options.
#[derive(Debug, Clone, Default)]
pub struct Vectorizer {
    options: VectorizeOptions,
}

impl Vectorizer {
    pub fn new(options: VectorizeOptions) -> Self {
        Self { options }
    }

    /// Same settings, different mode
    pub fn with_mode(mut self, mode: VectorizeMode) -> Self {
        self.options.mode = mode;
        self
    }

    pub fn options(&self) -> &VectorizeOptions {
        &self.options
    }

    /// Vectorize all strokes, one primitive per stroke, in stroke order
    pub fn vectorize(&self, strokes: &[Stroke]) -> Result<VectorDocument, VectorizeError> {
        let step = self.options.resample_step;
        if !(step.is_finite() && step >= MIN_RESAMPLE_STEP) {
            return Err(VectorizeError::InvalidStep(step));
        }
        validate(strokes)?;
        if self.options.mode == VectorizeMode::PressureOutline {
            check_resample_budget(strokes, step)?;
        }

        let shapes: Vec<Shape> = strokes
            .iter()
            .enumerate()
            .map(|(index, stroke)| {
                let shape = self.vectorize_stroke(stroke);
                debug!(
                    "Stroke {} ({} samples) -> {}",
                    index,
                    stroke.len(),
                    if shape.is_circle() { "circle" } else { "path" }
                );
                shape
            })
            .collect();

        Ok(VectorDocument::new(shapes))
    }

    fn vectorize_stroke(&self, stroke: &Stroke) -> Shape {
        if stroke.is_single() {
            return dot(stroke.first());
        }

        match self.options.mode {
            VectorizeMode::PressureOutline => {
                let resampled = resample::resample(stroke.samples(), self.options.resample_step);
                match outline::stroke_outline(&resampled) {
                    Some(path) => Shape::FilledPath(path),
                    // Every segment fell below the threshold: a jittered tap
                    None => dot(stroke.first()),
                }
            }
            VectorizeMode::Centerline => Shape::StrokedPath {
                path: centerline::centerline(stroke.samples()),
                width: centerline::centerline_width(stroke.first(), self.options.default_width),
            },
        }
    }
}

fn dot(sample: &StrokeSample) -> Shape {
    Shape::Circle {
        center: sample.position,
        radius: MIN_WIDTH.max(sample.width / 2.0),
    }
}

/// Reject samples that are not finite, lie beyond [`MAX_COORDINATE`], or
/// carry a negative or oversized width
pub fn validate(strokes: &[Stroke]) -> Result<(), VectorizeError> {
    for (stroke_index, stroke) in strokes.iter().enumerate() {
        for (sample_index, sample) in stroke.samples().iter().enumerate() {
            let defect = if !(sample.x().is_finite() && sample.y().is_finite()) {
                Some(SampleDefect::NonFinitePosition)
            } else if sample.x().abs() > MAX_COORDINATE || sample.y().abs() > MAX_COORDINATE {
                Some(SampleDefect::PositionOutOfRange)
            } else if !sample.width.is_finite() {
                Some(SampleDefect::NonFiniteWidth)
            } else if sample.width < 0.0 {
                Some(SampleDefect::NegativeWidth)
            } else if sample.width > MAX_WIDTH {
                Some(SampleDefect::WidthTooLarge)
            } else {
                None
            };

            if let Some(defect) = defect {
                return Err(VectorizeError::InvalidSample {
                    stroke: stroke_index,
                    sample: sample_index,
                    defect,
                });
            }
        }
    }
    Ok(())
}

fn check_resample_budget(strokes: &[Stroke], step: f64) -> Result<(), VectorizeError> {
    for (index, stroke) in strokes.iter().enumerate() {
        let estimate = resample::arc_length(stroke.samples()) / step;
        // Saturating float-to-int cast; the `+ 2` covers the first and last samples
        let count = (estimate.ceil() as usize).saturating_add(2);
        if count > MAX_RESAMPLED_SAMPLES {
            return Err(VectorizeError::TooManySamples {
                stroke: index,
                count,
                limit: MAX_RESAMPLED_SAMPLES,
            });
        }
    }
    Ok(())
}
