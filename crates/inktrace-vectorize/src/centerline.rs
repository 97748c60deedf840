//! Constant-width polylines through the raw samples.

use inktrace_core::StrokeSample;
use kurbo::BezPath;

use crate::outline::MIN_WIDTH;

/// Open polyline through every sample, in capture order
pub fn centerline(samples: &[StrokeSample]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = samples.iter();
    if let Some(first) = iter.next() {
        path.move_to(first.position);
        for sample in iter {
            path.line_to(sample.position);
        }
    }
    path
}

/// Stroke width for a centerline: the first sample's width, or
/// `default_width` when the device reported none, never below [`MIN_WIDTH`]
pub fn centerline_width(first: &StrokeSample, default_width: f64) -> f64 {
    let width = if first.width > 0.0 {
        first.width
    } else {
        default_width
    };
    MIN_WIDTH.max(width)
}
