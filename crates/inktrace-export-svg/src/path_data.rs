//! SVG path mini-language output for kurbo paths.

use std::fmt::Write;

use kurbo::{BezPath, PathEl, Point};

/// Format a `BezPath` as absolute SVG path data: `M x y L x y C ... Z`.
///
/// Commands and coordinates are separated by single spaces.
pub fn path_data(path: &BezPath, precision: usize) -> String {
    let elements = path.elements();
    let mut data = String::with_capacity(elements.len() * 24);

    for (i, el) in elements.iter().enumerate() {
        if i > 0 {
            data.push(' ');
        }
        let (command, points, count) = match *el {
            PathEl::MoveTo(p) => ('M', [p, Point::ZERO, Point::ZERO], 1),
            PathEl::LineTo(p) => ('L', [p, Point::ZERO, Point::ZERO], 1),
            PathEl::QuadTo(p1, p2) => ('Q', [p1, p2, Point::ZERO], 2),
            PathEl::CurveTo(p1, p2, p3) => ('C', [p1, p2, p3], 3),
            PathEl::ClosePath => ('Z', [Point::ZERO; 3], 0),
        };
        data.push(command);
        for point in &points[..count] {
            data.push(' ');
            write_number(&mut data, point.x, precision);
            data.push(' ');
            write_number(&mut data, point.y, precision);
        }
    }

    data
}

/// Format one number with a fixed number of decimals.
///
/// Values that round to zero print as `0.00`, never `-0.00`.
pub fn format_number(value: f64, precision: usize) -> String {
    let mut buf = String::new();
    write_number(&mut buf, value, precision);
    buf
}

fn write_number(buf: &mut String, value: f64, precision: usize) {
    let half_ulp = 0.5 * 10f64.powi(-(precision as i32));
    let value = if value.abs() < half_ulp { 0.0 } else { value };
    // Writing into a String cannot fail
    let _ = write!(buf, "{value:.precision$}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_path() {
        assert_eq!(path_data(&BezPath::new(), 2), "");
    }

    #[test]
    fn test_all_commands() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.quad_to((12.0, 1.0), (12.0, 3.0));
        path.curve_to((12.0, 5.0), (10.0, 6.0), (8.0, 6.0));
        path.close_path();
        assert_eq!(
            path_data(&path, 2),
            "M 0.00 0.00 L 10.00 0.00 Q 12.00 1.00 12.00 3.00 \
             C 12.00 5.00 10.00 6.00 8.00 6.00 Z"
        );
    }

    #[test]
    fn test_rounding() {
        assert_eq!(format_number(1.005_1, 2), "1.01");
        assert_eq!(format_number(2.0 / 3.0, 2), "0.67");
        assert_eq!(format_number(300.0, 2), "300.00");
    }

    #[test]
    fn test_no_negative_zero() {
        assert_eq!(format_number(-0.0, 2), "0.00");
        assert_eq!(format_number(-0.001, 2), "0.00");
        assert_eq!(format_number(-0.005_1, 2), "-0.01");
    }
}
