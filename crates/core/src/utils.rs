//! Geometry and markup helpers shared by the interpreter, layout model and
//! serializer.
//!
//! - Geometric types (Point, Rect, Matrix)
//! - Affine matrix composition and application
//! - Bounding box formatting and markup escaping

use std::borrow::Cow;

/// Floating-point infinity for bounding box accumulation.
pub const INF_F64: f64 = f64::MAX;

/// Tolerance used when deciding whether two device-space coordinates coincide.
pub const COORD_EPSILON: f64 = 1e-6;

/// A 2D point (x, y).
pub type Point = (f64, f64);

/// A rectangle defined by (x0, y0, x1, y1) where (x0, y0) is typically bottom-left
/// and (x1, y1) is top-right.
pub type Rect = (f64, f64, f64, f64);

/// A 6-element affine transformation matrix (a, b, c, d, e, f).
/// Transforms point (x, y) to (ax + cy + e, bx + dy + f).
pub type Matrix = (f64, f64, f64, f64, f64, f64);

/// Identity transformation matrix.
pub const MATRIX_IDENTITY: Matrix = (1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

/// Compares two floats for approximate equality.
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Multiplies two matrices: result = m1 * m0.
/// This applies m1 first, then m0.
pub fn mult_matrix(m1: Matrix, m0: Matrix) -> Matrix {
    let (a1, b1, c1, d1, e1, f1) = m1;
    let (a0, b0, c0, d0, e0, f0) = m0;
    (
        a0 * a1 + c0 * b1,
        b0 * a1 + d0 * b1,
        a0 * c1 + c0 * d1,
        b0 * c1 + d0 * d1,
        a0 * e1 + c0 * f1 + e0,
        b0 * e1 + d0 * f1 + f0,
    )
}

/// Moves the origin of `m` to `v`, expressed in `m`'s own coordinate system.
pub fn translate_matrix(m: Matrix, v: Point) -> Matrix {
    let (a, b, c, d, e, f) = m;
    let (x, y) = v;
    (a, b, c, d, x * a + y * c + e, x * b + y * d + f)
}

/// Applies a matrix to a point.
pub fn apply_matrix_pt(m: Matrix, v: Point) -> Point {
    let (a, b, c, d, e, f) = m;
    let (x, y) = v;
    (a * x + c * y + e, b * x + d * y + f)
}

/// Applies a matrix to a rectangle.
///
/// The result is the axis-aligned rectangle that tightly fits the four
/// transformed corners, not a rotated rectangle.
pub fn apply_matrix_rect(m: Matrix, rect: Rect) -> Rect {
    let (x0, y0, x1, y1) = rect;
    get_bound(
        [(x0, y0), (x1, y0), (x1, y1), (x0, y1)]
            .into_iter()
            .map(|pt| apply_matrix_pt(m, pt)),
    )
}

/// Trait for objects that have a bounding box.
pub trait HasBBox {
    fn x0(&self) -> f64;
    fn y0(&self) -> f64;
    fn x1(&self) -> f64;
    fn y1(&self) -> f64;

    fn bbox(&self) -> Rect {
        (self.x0(), self.y0(), self.x1(), self.y1())
    }

    fn width(&self) -> f64 {
        self.x1() - self.x0()
    }

    fn height(&self) -> f64 {
        self.y1() - self.y0()
    }
}

/// Computes the bounding box of a sequence of points.
///
/// An empty sequence yields an inverted box (INF, INF, -INF, -INF).
pub fn get_bound<I: IntoIterator<Item = Point>>(pts: I) -> Rect {
    let mut x0 = INF_F64;
    let mut y0 = INF_F64;
    let mut x1 = -INF_F64;
    let mut y1 = -INF_F64;

    for (x, y) in pts {
        x0 = x0.min(x);
        y0 = y0.min(y);
        x1 = x1.max(x);
        y1 = y1.max(y);
    }

    (x0, y0, x1, y1)
}

/// Formats a bounding box as `x0,y0,x1,y1` with three decimals.
pub fn bbox2str(bbox: Rect) -> String {
    let (x0, y0, x1, y1) = bbox;
    format!("{:.3},{:.3},{:.3},{:.3}", x0, y0, x1, y1)
}

/// Escapes `&`, `<`, `>` and `"` for markup text and attribute values.
///
/// Returns `Cow::Borrowed` when nothing needs escaping.
pub fn enc(x: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mult_matrix_identity() {
        let identity = MATRIX_IDENTITY;
        assert_eq!(mult_matrix(identity, identity), identity);
    }

    #[test]
    fn test_mult_matrix_applies_first_argument_first() {
        let scale = (2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let shift = (1.0, 0.0, 0.0, 1.0, 10.0, 0.0);
        // scale, then shift
        let m = mult_matrix(scale, shift);
        assert_eq!(apply_matrix_pt(m, (1.0, 1.0)), (12.0, 2.0));
    }

    #[test]
    fn test_translate_matrix() {
        let m = (2.0, 0.0, 0.0, 3.0, 1.0, 1.0);
        assert_eq!(translate_matrix(m, (1.0, 1.0)), (2.0, 0.0, 0.0, 3.0, 3.0, 4.0));
    }

    #[test]
    fn test_apply_matrix_rect_rotated() {
        let rot90 = (0.0, 1.0, -1.0, 0.0, 0.0, 0.0);
        assert_eq!(
            apply_matrix_rect(rot90, (0.0, 0.0, 10.0, 20.0)),
            (-20.0, 0.0, 0.0, 10.0)
        );
    }

    #[test]
    fn test_get_bound() {
        let pts = vec![(3.0, 1.0), (-1.0, 5.0), (2.0, -2.0)];
        assert_eq!(get_bound(pts), (-1.0, -2.0, 3.0, 5.0));
    }

    #[test]
    fn test_bbox2str() {
        assert_eq!(
            bbox2str((0.0, 0.0, 100.0, 0.0)),
            "0.000,0.000,100.000,0.000"
        );
        assert_eq!(bbox2str((1.23456, -2.0, 3.5, 4.0)), "1.235,-2.000,3.500,4.000");
    }

    #[test]
    fn test_enc_escapes_markup_characters() {
        let escaped = enc("A & B <tag> \"q\"");
        assert_eq!(escaped, "A &amp; B &lt;tag&gt; &quot;q&quot;");
        let without_entities = escaped
            .replace("&amp;", "")
            .replace("&lt;", "")
            .replace("&gt;", "")
            .replace("&quot;", "");
        assert!(!without_entities.contains(['&', '<', '>', '"']));
    }

    #[test]
    fn test_enc_borrows_plain_text() {
        assert!(matches!(enc("plain"), Cow::Borrowed("plain")));
    }
}
