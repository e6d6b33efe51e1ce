//! Layout tree construction from device callbacks.
//!
//! - PDFLayoutBuilder: device that turns interpreter callbacks into an LT tree
//! - PageSink: receiver of finished pages
//! - PDFPageAggregator: sink that keeps pages in memory

use std::sync::Arc;

use crate::error::{PdfError, Result};
use crate::font::PDFFont;
use crate::interp::device::{PDFDevice, PathSegment, shape_signature};
use crate::layout::{
    LAParams, LTChar, LTCurve, LTFigure, LTImage, LTItem, LTLine, LTPage, LTRect, PageAnalyzer,
};
use crate::model::{ImageStream, PDFGraphicState};
use crate::utils::{
    COORD_EPSILON, HasBBox, MATRIX_IDENTITY, Matrix, Point, Rect, apply_matrix_pt, approx_eq,
    mult_matrix,
};

/// Receiver of completed pages, called once per page in page order.
pub trait PageSink {
    fn receive_page(&mut self, page: LTPage) -> Result<()>;
}

impl<S: PageSink + ?Sized> PageSink for &mut S {
    fn receive_page(&mut self, page: LTPage) -> Result<()> {
        (**self).receive_page(page)
    }
}

/// Container currently receiving children.
#[derive(Debug)]
enum OpenContainer {
    Page(LTPage),
    Figure(LTFigure),
}

impl OpenContainer {
    fn kind(&self) -> &'static str {
        match self {
            OpenContainer::Page(_) => "page",
            OpenContainer::Figure(_) => "figure",
        }
    }

    fn add(&mut self, item: LTItem) {
        match self {
            OpenContainer::Page(p) => p.add(item),
            OpenContainer::Figure(f) => f.add(item),
        }
    }
}

/// Builds one layout tree per page and hands it to a [`PageSink`].
///
/// Children are appended to the innermost open container (the page or a
/// figure). Figures must be closed in reverse order of opening; `end_page`
/// with open figures is an error and the page is not delivered.
pub struct PDFLayoutBuilder<S: PageSink> {
    sink: S,
    /// Id given to the next finished page (1-based)
    pageno: u32,
    ctm: Matrix,
    stack: Vec<OpenContainer>,
    cur_item: Option<OpenContainer>,
    analysis: Option<(Box<dyn PageAnalyzer>, LAParams)>,
}

impl<S: PageSink> PDFLayoutBuilder<S> {
    pub fn new(sink: S) -> Self {
        Self::with_pageno(sink, 1)
    }

    pub fn with_pageno(sink: S, pageno: u32) -> Self {
        Self {
            sink,
            pageno,
            ctm: MATRIX_IDENTITY,
            stack: Vec::new(),
            cur_item: None,
            analysis: None,
        }
    }

    /// Run `analyzer` on every finished page before it reaches the sink.
    pub fn with_analyzer(mut self, analyzer: Box<dyn PageAnalyzer>, laparams: LAParams) -> Self {
        self.analysis = Some((analyzer, laparams));
        self
    }

    pub fn pageno(&self) -> u32 {
        self.pageno
    }

    /// Number of containers saved beneath the current one.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Kind of the current container, if any ("page" or "figure").
    pub fn current_kind(&self) -> Option<&'static str> {
        self.cur_item.as_ref().map(OpenContainer::kind)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn add_item(&mut self, op: &'static str, item: LTItem) -> Result<()> {
        match self.cur_item.as_mut() {
            Some(container) => {
                container.add(item);
                Ok(())
            }
            None => Err(PdfError::NoPage(op)),
        }
    }

    fn require_figure(&self, op: &'static str) -> Result<&LTFigure> {
        match &self.cur_item {
            Some(OpenContainer::Figure(fig)) => Ok(fig),
            Some(other) => Err(PdfError::ContainerMismatch {
                op,
                expected: "figure",
                found: other.kind(),
            }),
            None => Err(PdfError::NoPage(op)),
        }
    }

    /// Placeholder text for a glyph whose Unicode mapping is undefined.
    pub fn handle_undefined_char(&self, font: &dyn PDFFont, cid: u32) -> String {
        tracing::debug!(font = font.fontname().unwrap_or("unknown"), cid, "undefined character");
        format!("(cid:{})", cid)
    }

    /// Classify a path by shape and return its device-space points.
    fn classify_path(&self, path: &[PathSegment]) -> (PathKind, Vec<Point>) {
        let ctm = self.ctm;
        let device = |x: f64, y: f64| apply_matrix_pt(ctm, (x, y));

        match (shape_signature(path).as_str(), path) {
            ("ml", [PathSegment::MoveTo(x0, y0), PathSegment::LineTo(x1, y1)]) => {
                let p0 = device(*x0, *y0);
                let p1 = device(*x1, *y1);
                if approx_eq(p0.0, p1.0, COORD_EPSILON) || approx_eq(p0.1, p1.1, COORD_EPSILON) {
                    return (PathKind::Line, vec![p0, p1]);
                }
            }
            (
                "mlllh",
                [
                    PathSegment::MoveTo(x0, y0),
                    PathSegment::LineTo(x1, y1),
                    PathSegment::LineTo(x2, y2),
                    PathSegment::LineTo(x3, y3),
                    PathSegment::ClosePath,
                ],
            ) => {
                let corners = [
                    device(*x0, *y0),
                    device(*x1, *y1),
                    device(*x2, *y2),
                    device(*x3, *y3),
                ];
                if is_axis_aligned_rect(&corners) {
                    let (p0, p2) = (corners[0], corners[2]);
                    return (PathKind::Rect, LTRect::corners((p0.0, p0.1, p2.0, p2.1)));
                }
            }
            _ => {}
        }

        let pts = path
            .iter()
            .flat_map(PathSegment::points)
            .map(|(x, y)| device(x, y))
            .collect();
        (PathKind::Curve, pts)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathKind {
    Line,
    Rect,
    Curve,
}

/// True when consecutive corners alternate between sharing x and sharing y,
/// starting with either axis.
fn is_axis_aligned_rect(c: &[Point; 4]) -> bool {
    let eq = |a: f64, b: f64| approx_eq(a, b, COORD_EPSILON);
    let vertical_first =
        eq(c[0].0, c[1].0) && eq(c[1].1, c[2].1) && eq(c[2].0, c[3].0) && eq(c[3].1, c[0].1);
    let horizontal_first =
        eq(c[0].1, c[1].1) && eq(c[1].0, c[2].0) && eq(c[2].1, c[3].1) && eq(c[3].0, c[0].0);
    vertical_first || horizontal_first
}

impl<S: PageSink> PDFDevice for PDFLayoutBuilder<S> {
    fn set_ctm(&mut self, ctm: Matrix) {
        self.ctm = ctm;
    }

    fn ctm(&self) -> Matrix {
        self.ctm
    }

    fn begin_page(&mut self, mediabox: Rect, rotate: i32, ctm: Matrix) -> Result<()> {
        let (x0, y0, x1, y1) = mediabox;
        let (x0, y0) = apply_matrix_pt(ctm, (x0, y0));
        let (x1, y1) = apply_matrix_pt(ctm, (x1, y1));
        let bbox = (0.0, 0.0, (x0 - x1).abs(), (y0 - y1).abs());
        self.stack.clear();
        self.cur_item = Some(OpenContainer::Page(LTPage::new(self.pageno, bbox, rotate)));
        Ok(())
    }

    fn end_page(&mut self) -> Result<()> {
        if !self.stack.is_empty() {
            return Err(PdfError::UnbalancedFigures {
                depth: self.stack.len(),
            });
        }
        let mut page = match self.cur_item.take() {
            Some(OpenContainer::Page(page)) => page,
            Some(other) => {
                let found = other.kind();
                self.cur_item = Some(other);
                return Err(PdfError::ContainerMismatch {
                    op: "end_page",
                    expected: "page",
                    found,
                });
            }
            None => return Err(PdfError::NoPage("end_page")),
        };
        if let Some((analyzer, laparams)) = &self.analysis {
            analyzer.analyze(&mut page, laparams);
        }
        self.pageno += 1;
        self.sink.receive_page(page)
    }

    fn begin_figure(&mut self, name: &str, bbox: Rect, matrix: Matrix) -> Result<()> {
        let Some(parent) = self.cur_item.take() else {
            return Err(PdfError::NoPage("begin_figure"));
        };
        self.stack.push(parent);
        let fig = LTFigure::new(name, bbox, mult_matrix(matrix, self.ctm));
        self.cur_item = Some(OpenContainer::Figure(fig));
        Ok(())
    }

    fn end_figure(&mut self, _name: &str) -> Result<()> {
        self.require_figure("end_figure")?;
        let (Some(OpenContainer::Figure(fig)), Some(mut parent)) =
            (self.cur_item.take(), self.stack.pop())
        else {
            // A figure is always opened on top of a saved parent.
            return Err(PdfError::NoPage("end_figure"));
        };
        parent.add(LTItem::Figure(Box::new(fig)));
        self.cur_item = Some(parent);
        Ok(())
    }

    fn paint_path(
        &mut self,
        gstate: &PDFGraphicState,
        stroke: bool,
        fill: bool,
        evenodd: bool,
        path: &[PathSegment],
    ) -> Result<()> {
        if self.cur_item.is_none() {
            return Err(PdfError::NoPage("paint_path"));
        }
        let (kind, pts) = self.classify_path(path);
        if pts.is_empty() {
            tracing::debug!(signature = %shape_signature(path), "path without coordinates skipped");
            return Ok(());
        }
        let curve = LTCurve::new(gstate.linewidth, pts)
            .with_paint(stroke, fill, evenodd)
            .with_colors(gstate.scolor.clone(), gstate.ncolor.clone())
            .with_dashing(gstate.dash.clone());
        let item = match kind {
            PathKind::Line => LTItem::Line(LTLine::from_curve(curve)),
            PathKind::Rect => {
                tracing::debug!(
                    scs = %gstate.scs.name,
                    ncs = %gstate.ncs.name,
                    linewidth = gstate.linewidth,
                    stroke,
                    fill,
                    bbox = ?(curve.x0(), curve.y0(), curve.x1(), curve.y1()),
                    "rectangle"
                );
                LTItem::Rect(LTRect::from_curve(curve))
            }
            PathKind::Curve => LTItem::Curve(curve),
        };
        self.add_item("paint_path", item)
    }

    fn render_image(&mut self, name: &str, stream: &ImageStream) -> Result<()> {
        let bbox = self.require_figure("render_image")?.bbox();
        let item = LTImage::new(name, stream.clone(), bbox);
        self.add_item("render_image", LTItem::Image(item))
    }

    fn render_char(
        &mut self,
        matrix: Matrix,
        font: &Arc<dyn PDFFont>,
        fontsize: f64,
        scaling: f64,
        rise: f64,
        cid: u32,
        _graphicstate: &PDFGraphicState,
    ) -> Result<f64> {
        let text = match font.to_unichr(cid) {
            Some(text) => text,
            None => self.handle_undefined_char(font.as_ref(), cid),
        };
        let textwidth = font.char_width(cid);
        let textdisp = font.char_disp(cid);
        let item = LTChar::new(
            matrix,
            Arc::clone(font),
            fontsize,
            scaling,
            rise,
            text,
            textwidth,
            textdisp,
        );
        let adv = item.adv();
        self.add_item("render_char", LTItem::Char(item))?;
        Ok(adv)
    }
}

/// Sink that keeps every received page.
#[derive(Debug, Default)]
pub struct PDFPageAggregator {
    pages: Vec<LTPage>,
}

impl PDFPageAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently received page.
    pub fn result(&self) -> Option<&LTPage> {
        self.pages.last()
    }

    pub fn pages(&self) -> &[LTPage] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<LTPage> {
        self.pages
    }
}

impl PageSink for PDFPageAggregator {
    fn receive_page(&mut self, page: LTPage) -> Result<()> {
        self.pages.push(page);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> PDFLayoutBuilder<PDFPageAggregator> {
        let mut b = PDFLayoutBuilder::new(PDFPageAggregator::new());
        b.begin_page((0.0, 0.0, 200.0, 100.0), 0, MATRIX_IDENTITY)
            .unwrap();
        b
    }

    #[test]
    fn begin_page_bbox_is_positive_under_rotation() {
        let mut b = PDFLayoutBuilder::new(PDFPageAggregator::new());
        let rot90 = (0.0, -1.0, 1.0, 0.0, 0.0, 200.0);
        b.begin_page((0.0, 0.0, 200.0, 100.0), 90, rot90).unwrap();
        b.end_page().unwrap();
        let page = b.sink().result().unwrap();
        assert_eq!(page.bbox(), (0.0, 0.0, 100.0, 200.0));
        assert_eq!(page.rotate, 90);
    }

    #[test]
    fn drawing_before_page_is_rejected() {
        let mut b = PDFLayoutBuilder::new(PDFPageAggregator::new());
        let err = b
            .paint_path(
                &PDFGraphicState::new(),
                true,
                false,
                false,
                &[PathSegment::MoveTo(0.0, 0.0), PathSegment::LineTo(1.0, 0.0)],
            )
            .unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn end_figure_on_page_is_mismatch() {
        let mut b = builder();
        let err = b.end_figure("Fm0").unwrap_err();
        assert!(matches!(
            err,
            PdfError::ContainerMismatch {
                op: "end_figure",
                ..
            }
        ));
        assert_eq!(b.current_kind(), Some("page"));
    }

    #[test]
    fn render_image_requires_figure() {
        let mut b = builder();
        let stream = ImageStream::new(2, 2, vec![0u8; 4]);
        assert!(b.render_image("Im0", &stream).is_err());

        b.begin_figure("Im0", (0.0, 0.0, 1.0, 1.0), (20.0, 0.0, 0.0, 10.0, 5.0, 5.0))
            .unwrap();
        b.render_image("Im0", &stream).unwrap();
        b.end_figure("Im0").unwrap();
        b.end_page().unwrap();

        let page = b.sink().result().unwrap();
        let LTItem::Figure(fig) = &page.items()[0] else {
            panic!("expected figure");
        };
        let LTItem::Image(img) = &fig.items()[0] else {
            panic!("expected image");
        };
        assert_eq!(img.bbox(), (5.0, 5.0, 25.0, 15.0));
        assert_eq!((img.src_width(), img.src_height()), (2, 2));
    }

    #[test]
    fn analyzer_runs_before_sink() {
        let mut b = PDFLayoutBuilder::new(PDFPageAggregator::new()).with_analyzer(
            Box::new(|page: &mut LTPage, _: &LAParams| page.rotate = 180),
            LAParams::default(),
        );
        b.begin_page((0.0, 0.0, 10.0, 10.0), 0, MATRIX_IDENTITY)
            .unwrap();
        b.end_page().unwrap();
        assert_eq!(b.sink().result().unwrap().rotate, 180);
        assert_eq!(b.pageno(), 2);
    }
}
