//! Path operators.
//!
//! Construction (`m l c v y h re`) appends segments to `curpath` in user
//! space. Painting (`S s f F f* B B* b b* n`) hands the accumulated path to
//! the device together with the paint flags and then empties it. Clipping
//! (`W W*`) has no effect on layout.

use std::mem;

use crate::error::Result;
use crate::interp::device::{PDFDevice, PathSegment};
use crate::interp::interpreter::PDFPageInterpreter;

#[allow(non_snake_case)]
impl<'a, D: PDFDevice> PDFPageInterpreter<'a, D> {
    fn push_segment(&mut self, segment: PathSegment, end: (f64, f64)) {
        self.curpath.push(segment);
        self.current_point = Some(end);
    }

    /// `m`
    pub fn do_m(&mut self, x: f64, y: f64) {
        self.push_segment(PathSegment::MoveTo(x, y), (x, y));
    }

    /// `l`
    pub fn do_l(&mut self, x: f64, y: f64) {
        self.push_segment(PathSegment::LineTo(x, y), (x, y));
    }

    /// `c`: full cubic with both control points given.
    pub fn do_c(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        self.push_segment(PathSegment::CurveTo(x1, y1, x2, y2, x3, y3), (x3, y3));
    }

    /// `v`: the first control point coincides with the current point.
    pub fn do_v(&mut self, x2: f64, y2: f64, x3: f64, y3: f64) {
        self.push_segment(PathSegment::CurveV(x2, y2, x3, y3), (x3, y3));
    }

    /// `y`: the second control point coincides with the end point.
    pub fn do_y(&mut self, x1: f64, y1: f64, x3: f64, y3: f64) {
        self.push_segment(PathSegment::CurveY(x1, y1, x3, y3), (x3, y3));
    }

    /// `h`
    pub fn do_h(&mut self) {
        self.curpath.push(PathSegment::ClosePath);
    }

    /// `re` expands to a closed four-corner subpath starting at (x, y),
    /// running counter-clockwise for positive width and height.
    pub fn do_re(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.curpath.extend([
            PathSegment::MoveTo(x, y),
            PathSegment::LineTo(x + w, y),
            PathSegment::LineTo(x + w, y + h),
            PathSegment::LineTo(x, y + h),
            PathSegment::ClosePath,
        ]);
        self.current_point = Some((x, y));
    }

    fn paint_path(&mut self, stroke: bool, fill: bool, evenodd: bool) -> Result<()> {
        let path = mem::take(&mut self.curpath);
        self.current_point = None;
        if path.is_empty() {
            tracing::debug!(stroke, fill, "paint with empty path ignored");
            return Ok(());
        }
        self.device
            .paint_path(&self.graphicstate, stroke, fill, evenodd, &path)
    }

    /// `S`
    pub fn do_S(&mut self) -> Result<()> {
        self.paint_path(true, false, false)
    }

    /// `s` is `h S`.
    pub fn do_s(&mut self) -> Result<()> {
        self.do_h();
        self.paint_path(true, false, false)
    }

    /// `f`
    pub fn do_f(&mut self) -> Result<()> {
        self.paint_path(false, true, false)
    }

    /// `F`, an old spelling of `f`.
    pub fn do_F(&mut self) -> Result<()> {
        self.paint_path(false, true, false)
    }

    /// `f*`
    pub fn do_f_star(&mut self) -> Result<()> {
        self.paint_path(false, true, true)
    }

    /// `B`
    pub fn do_B(&mut self) -> Result<()> {
        self.paint_path(true, true, false)
    }

    /// `B*`
    pub fn do_B_star(&mut self) -> Result<()> {
        self.paint_path(true, true, true)
    }

    /// `b` is `h B`.
    pub fn do_b(&mut self) -> Result<()> {
        self.do_h();
        self.paint_path(true, true, false)
    }

    /// `b*` is `h B*`.
    pub fn do_b_star(&mut self) -> Result<()> {
        self.do_h();
        self.paint_path(true, true, true)
    }

    /// `n` discards the path without painting.
    pub fn do_n(&mut self) {
        self.curpath.clear();
        self.current_point = None;
    }

    pub const fn do_W(&mut self) {}

    pub const fn do_W_star(&mut self) {}
}
