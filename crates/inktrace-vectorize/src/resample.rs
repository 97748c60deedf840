//! Even arc-length resampling of pen samples.

use inktrace_core::StrokeSample;

/// Resample `samples` so consecutive points sit `step` units apart along the
/// polyline.
///
/// The first sample is kept as is. Widths are interpolated linearly along each
/// raw segment. The last raw sample closes the run unless it already sits at
/// the last emitted position. Zero-length raw segments are skipped, so
/// repeated input points leave the output unchanged.
///
/// `step` must be positive and finite; the caller validates it.
pub fn resample(samples: &[StrokeSample], step: f64) -> Vec<StrokeSample> {
    let Some((&first, rest)) = samples.split_first() else {
        return Vec::new();
    };

    let mut out = vec![first];
    // Arc length travelled since the last emitted sample
    let mut carry = 0.0;
    let mut prev = first;

    for &next in rest {
        let seg_len = prev.position.distance(next.position);
        if seg_len == 0.0 {
            continue;
        }

        let mut along = step - carry;
        while along <= seg_len {
            out.push(lerp(prev, next, along / seg_len));
            along += step;
        }
        carry = seg_len - (along - step);
        prev = next;
    }

    if let Some(last) = samples.last() {
        let emitted = out.last().map(|s| s.position);
        if emitted != Some(last.position) {
            out.push(*last);
        }
    }

    out
}

/// Total polyline length of `samples`
pub fn arc_length(samples: &[StrokeSample]) -> f64 {
    samples
        .windows(2)
        .map(|pair| pair[0].position.distance(pair[1].position))
        .sum()
}

fn lerp(a: StrokeSample, b: StrokeSample, t: f64) -> StrokeSample {
    StrokeSample {
        position: a.position.lerp(b.position, t),
        width: a.width + (b.width - a.width) * t,
    }
}
