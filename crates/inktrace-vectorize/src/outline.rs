//! Variable-width outlines built from round-capped capsules.
//!
//! Each pair of neighbouring samples becomes one closed capsule: two straight
//! sides offset along the segment normal and a half-circle cap at each end.
//! A stroke's capsules go into a single compound path. They all wind the same
//! way, so the nonzero fill rule merges the overlaps into one solid shape.

use inktrace_core::StrokeSample;
use kurbo::{BezPath, Point, Vec2};

/// Segments shorter than this contribute no geometry
pub const MIN_SEGMENT_LENGTH: f64 = 0.05;

/// Smallest diameter ever drawn
pub const MIN_WIDTH: f64 = 0.5;

/// Cubic handle length for a quarter circle of unit radius
const ARC_K: f64 = 0.552_284_749_830_793_4;

/// Compound outline of a resampled stroke.
///
/// Returns `None` when no segment reaches [`MIN_SEGMENT_LENGTH`]; the caller
/// draws a dot instead.
pub fn stroke_outline(samples: &[StrokeSample]) -> Option<BezPath> {
    let mut path = BezPath::new();
    let mut capsules = 0usize;

    for pair in samples.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        if current.position.distance(next.position) < MIN_SEGMENT_LENGTH {
            continue;
        }
        let width = MIN_WIDTH.max((current.width + next.width) / 2.0);
        append_capsule(&mut path, current.position, next.position, width / 2.0);
        capsules += 1;
    }

    if capsules == 0 {
        None
    } else {
        Some(path)
    }
}

/// One closed capsule around `start → end` with the given radius.
pub fn capsule(start: Point, end: Point, radius: f64) -> BezPath {
    let mut path = BezPath::new();
    append_capsule(&mut path, start, end, radius);
    path
}

fn append_capsule(path: &mut BezPath, start: Point, end: Point, radius: f64) {
    let along = (end - start).normalize() * radius;
    let normal = Vec2::new(-along.y, along.x);

    path.move_to(start + normal);
    path.line_to(end + normal);
    quarter_arc(path, end, normal, along);
    quarter_arc(path, end, along, -normal);
    path.line_to(start - normal);
    quarter_arc(path, start, -normal, -along);
    quarter_arc(path, start, -along, normal);
    path.close_path();
}

/// Quarter circle around `center` from `center + from` to `center + to`.
/// `from` and `to` are perpendicular and have the radius as their length.
fn quarter_arc(path: &mut BezPath, center: Point, from: Vec2, to: Vec2) {
    path.curve_to(
        center + from + to * ARC_K,
        center + to + from * ARC_K,
        center + to,
    );
}
