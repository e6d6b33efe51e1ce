//! Graphical elements: LTCurve, LTLine, LTRect, LTImage.

use crate::model::{Color, ImageStream};
use crate::utils::{Point, Rect, get_bound};

use super::component::LTComponent;

/// A generic path, stored as its device-space points.
#[derive(Debug, Clone, PartialEq)]
pub struct LTCurve {
    component: LTComponent,
    pub pts: Vec<Point>,
    pub linewidth: f64,
    pub stroke: bool,
    pub fill: bool,
    pub evenodd: bool,
    pub stroking_color: Color,
    pub non_stroking_color: Color,
    /// Dashing style: (pattern, phase)
    pub dashing_style: Option<(Vec<f64>, f64)>,
}

impl LTCurve {
    pub fn new(linewidth: f64, pts: Vec<Point>) -> Self {
        let bbox = get_bound(pts.iter().copied());
        Self {
            component: LTComponent::new(bbox),
            pts,
            linewidth,
            stroke: false,
            fill: false,
            evenodd: false,
            stroking_color: Color::default(),
            non_stroking_color: Color::default(),
            dashing_style: None,
        }
    }

    /// Attach painting flags.
    pub fn with_paint(mut self, stroke: bool, fill: bool, evenodd: bool) -> Self {
        self.stroke = stroke;
        self.fill = fill;
        self.evenodd = evenodd;
        self
    }

    pub fn with_colors(mut self, stroking: Color, non_stroking: Color) -> Self {
        self.stroking_color = stroking;
        self.non_stroking_color = non_stroking;
        self
    }

    pub fn with_dashing(mut self, dashing_style: Option<(Vec<f64>, f64)>) -> Self {
        self.dashing_style = dashing_style;
        self
    }

    /// Returns the points as a comma-separated string.
    pub fn get_pts(&self) -> String {
        self.pts
            .iter()
            .map(|(x, y)| format!("{:.3},{:.3}", x, y))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl std::ops::Deref for LTCurve {
    type Target = LTComponent;
    fn deref(&self) -> &Self::Target {
        &self.component
    }
}

impl_has_bbox_delegate!(LTCurve, component);

/// A single horizontal or vertical straight line.
#[derive(Debug, Clone, PartialEq)]
pub struct LTLine {
    curve: LTCurve,
}

impl LTLine {
    pub fn new(linewidth: f64, p0: Point, p1: Point) -> Self {
        Self {
            curve: LTCurve::new(linewidth, vec![p0, p1]),
        }
    }

    /// Wraps a two-point curve that carries painting attributes.
    pub(crate) fn from_curve(curve: LTCurve) -> Self {
        Self { curve }
    }

    pub fn p0(&self) -> Point {
        self.curve.pts[0]
    }

    pub fn p1(&self) -> Point {
        self.curve.pts[1]
    }
}

impl std::ops::Deref for LTLine {
    type Target = LTCurve;
    fn deref(&self) -> &Self::Target {
        &self.curve
    }
}

impl_has_bbox_delegate!(LTLine, curve, method);

/// An axis-aligned rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct LTRect {
    curve: LTCurve,
}

impl LTRect {
    /// Creates a rectangle from two diagonal corners in any order.
    pub fn new(linewidth: f64, bbox: Rect) -> Self {
        Self::from_curve(LTCurve::new(linewidth, Self::corners(bbox)))
    }

    pub(crate) fn corners(bbox: Rect) -> Vec<Point> {
        let (x0, y0, x1, y1) = bbox;
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1)]
    }

    pub(crate) fn from_curve(curve: LTCurve) -> Self {
        Self { curve }
    }
}

impl std::ops::Deref for LTRect {
    type Target = LTCurve;
    fn deref(&self) -> &Self::Target {
        &self.curve
    }
}

impl_has_bbox_delegate!(LTRect, curve, method);

/// An image placed on the page, sized to its enclosing figure.
#[derive(Debug, Clone, PartialEq)]
pub struct LTImage {
    component: LTComponent,
    pub name: String,
    pub stream: ImageStream,
}

impl LTImage {
    pub fn new(name: &str, stream: ImageStream, bbox: Rect) -> Self {
        Self {
            component: LTComponent::new(bbox),
            name: name.to_string(),
            stream,
        }
    }

    /// Pixel width of the source image.
    pub fn src_width(&self) -> u32 {
        self.stream.width
    }

    /// Pixel height of the source image.
    pub fn src_height(&self) -> u32 {
        self.stream.height
    }
}

impl std::ops::Deref for LTImage {
    type Target = LTComponent;
    fn deref(&self) -> &Self::Target {
        &self.component
    }
}

impl_has_bbox_delegate!(LTImage, component);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::HasBBox;

    #[test]
    fn rect_bbox_is_normalized() {
        let r = LTRect::new(1.0, (50.0, 50.0, 0.0, 0.0));
        assert_eq!(r.bbox(), (0.0, 0.0, 50.0, 50.0));
        assert_eq!(r.pts.len(), 4);
    }

    #[test]
    fn curve_points_string() {
        let c = LTCurve::new(0.0, vec![(0.0, 0.0), (1.5, 2.25)]);
        assert_eq!(c.get_pts(), "0.000,0.000,1.500,2.250");
        assert_eq!(c.bbox(), (0.0, 0.0, 1.5, 2.25));
    }

    #[test]
    fn line_endpoints() {
        let l = LTLine::new(2.0, (0.0, 0.0), (100.0, 0.0));
        assert_eq!(l.p1(), (100.0, 0.0));
        assert_eq!(l.linewidth, 2.0);
    }
}
