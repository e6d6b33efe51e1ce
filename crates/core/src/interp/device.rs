//! Device interface driven by the page interpreter.
//!
//! A device receives page, figure, path, image and glyph callbacks in
//! content order. [`PDFDevice::render_string`] is provided: it walks a text
//! sequence glyph by glyph and calls [`PDFDevice::render_char`], so most
//! devices only implement the per-glyph hook.

use std::sync::Arc;

use crate::error::Result;
use crate::font::PDFFont;
use crate::model::{ImageStream, PDFGraphicState, PDFTextState};
use crate::utils::{Matrix, Point, Rect, mult_matrix, translate_matrix};

/// Sequence of text elements that can contain numbers (positioning) or bytes (character data).
pub type PDFTextSeq = Vec<PDFTextSeqItem>;

/// Individual item in a text sequence (`TJ` array element).
#[derive(Debug, Clone, PartialEq)]
pub enum PDFTextSeqItem {
    /// Adjustment in thousandths of text space; positive moves left (or down)
    Number(f64),
    /// Character data bytes
    Bytes(Vec<u8>),
}

/// Path segment in user space, as built by the path construction operators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    /// Cubic bezier curve (x1, y1, x2, y2, x3, y3)
    CurveTo(f64, f64, f64, f64, f64, f64),
    /// `v`: first control point is the current point (x2, y2, x3, y3)
    CurveV(f64, f64, f64, f64),
    /// `y`: second control point is the end point (x1, y1, x3, y3)
    CurveY(f64, f64, f64, f64),
    ClosePath,
}

impl PathSegment {
    /// Operator letter used in shape signatures.
    pub const fn op(&self) -> char {
        match self {
            PathSegment::MoveTo(..) => 'm',
            PathSegment::LineTo(..) => 'l',
            PathSegment::CurveTo(..) => 'c',
            PathSegment::CurveV(..) => 'v',
            PathSegment::CurveY(..) => 'y',
            PathSegment::ClosePath => 'h',
        }
    }

    /// Coordinate pairs carried by the segment, in order.
    pub fn points(&self) -> Vec<Point> {
        match *self {
            PathSegment::MoveTo(x, y) | PathSegment::LineTo(x, y) => vec![(x, y)],
            PathSegment::CurveTo(x1, y1, x2, y2, x3, y3) => vec![(x1, y1), (x2, y2), (x3, y3)],
            PathSegment::CurveV(xa, ya, xb, yb) | PathSegment::CurveY(xa, ya, xb, yb) => {
                vec![(xa, ya), (xb, yb)]
            }
            PathSegment::ClosePath => Vec::new(),
        }
    }
}

/// Shape signature of a path: its operator letters joined, e.g. `"mlllh"`.
pub fn shape_signature(path: &[PathSegment]) -> String {
    path.iter().map(PathSegment::op).collect()
}

/// Output interface for page interpretation.
///
/// Every callback returns `Result` so that contract violations detected by
/// a device (such as closing a page with open figures) stop interpretation.
pub trait PDFDevice {
    fn set_ctm(&mut self, ctm: Matrix);

    fn ctm(&self) -> Matrix;

    /// Begin a page. `mediabox` is in default user space; `ctm` is the
    /// page's initial matrix (rotation and origin shift).
    fn begin_page(&mut self, _mediabox: Rect, _rotate: i32, _ctm: Matrix) -> Result<()> {
        Ok(())
    }

    fn end_page(&mut self) -> Result<()> {
        Ok(())
    }

    /// Begin a form XObject (figure). `bbox` is the form's BBox in form
    /// space and `matrix` its /Matrix.
    fn begin_figure(&mut self, _name: &str, _bbox: Rect, _matrix: Matrix) -> Result<()> {
        Ok(())
    }

    fn end_figure(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn paint_path(
        &mut self,
        _graphicstate: &PDFGraphicState,
        _stroke: bool,
        _fill: bool,
        _evenodd: bool,
        _path: &[PathSegment],
    ) -> Result<()> {
        Ok(())
    }

    fn render_image(&mut self, _name: &str, _stream: &ImageStream) -> Result<()> {
        Ok(())
    }

    /// Render a single glyph and return its advance in text space.
    #[allow(clippy::too_many_arguments)]
    fn render_char(
        &mut self,
        _matrix: Matrix,
        _font: &Arc<dyn PDFFont>,
        _fontsize: f64,
        _scaling: f64,
        _rise: f64,
        _cid: u32,
        _graphicstate: &PDFGraphicState,
    ) -> Result<f64> {
        Ok(0.0)
    }

    /// Render a text string.
    ///
    /// Composes the text matrix with the CTM, then advances glyph by glyph
    /// along the font's writing direction. The final position is stored in
    /// `textstate.linematrix` so the next string continues from it. Without
    /// a selected font nothing is rendered.
    fn render_string(
        &mut self,
        textstate: &mut PDFTextState,
        seq: &PDFTextSeq,
        graphicstate: &PDFGraphicState,
    ) -> Result<()> {
        let Some(font) = textstate.font.clone() else {
            tracing::debug!(fontname = ?textstate.fontname, "text shown without a font");
            return Ok(());
        };
        let matrix = mult_matrix(textstate.matrix, self.ctm());
        let fontsize = textstate.fontsize;
        let scaling = textstate.scaling * 0.01;
        let charspace = textstate.charspace * scaling;
        let wordspace = if font.is_multibyte() {
            0.0
        } else {
            textstate.wordspace * scaling
        };
        let run = TextRun {
            matrix,
            font: &font,
            fontsize,
            scaling,
            charspace,
            wordspace,
            rise: textstate.rise,
            dxscale: 0.001 * fontsize * scaling,
            vertical: font.is_vertical(),
        };
        textstate.linematrix = self.render_run(seq, &run, textstate.linematrix, graphicstate)?;
        Ok(())
    }

    /// Walk `seq` from `pos`, returning the position after the last glyph.
    fn render_run(
        &mut self,
        seq: &PDFTextSeq,
        run: &TextRun<'_>,
        pos: Point,
        graphicstate: &PDFGraphicState,
    ) -> Result<Point> {
        let (mut x, mut y) = pos;
        let mut needcharspace = false;

        for item in seq {
            match item {
                PDFTextSeqItem::Number(n) => {
                    if run.vertical {
                        y -= n * run.dxscale;
                    } else {
                        x -= n * run.dxscale;
                    }
                    needcharspace = true;
                }
                PDFTextSeqItem::Bytes(data) => {
                    for cid in run.font.decode(data) {
                        let mut step = if needcharspace { run.charspace } else { 0.0 };
                        bump(&mut x, &mut y, run.vertical, step);
                        step = self.render_char(
                            translate_matrix(run.matrix, (x, y)),
                            run.font,
                            run.fontsize,
                            run.scaling,
                            run.rise,
                            cid,
                            graphicstate,
                        )?;
                        if cid == 32 && run.wordspace != 0.0 {
                            step += run.wordspace;
                        }
                        bump(&mut x, &mut y, run.vertical, step);
                        needcharspace = true;
                    }
                }
            }
        }
        Ok((x, y))
    }
}

fn bump(x: &mut f64, y: &mut f64, vertical: bool, step: f64) {
    if vertical {
        *y += step;
    } else {
        *x += step;
    }
}

/// Per-string rendering parameters derived from the text state.
#[derive(Debug)]
pub struct TextRun<'f> {
    pub matrix: Matrix,
    pub font: &'f Arc<dyn PDFFont>,
    pub fontsize: f64,
    /// Horizontal scaling as a factor (Tz / 100)
    pub scaling: f64,
    pub charspace: f64,
    pub wordspace: f64,
    pub rise: f64,
    /// Scale for `TJ` adjustments: 0.001 * fontsize * scaling
    pub dxscale: f64,
    pub vertical: bool,
}
