//! Graphics and text state owned by the page interpreter.

use super::color::PDFColorSpace;
use crate::font::PDFFont;
use crate::utils::{MATRIX_IDENTITY, Matrix, Point};
use std::sync::Arc;

/// Colour value set by the colour operators.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    /// Greyscale colour (0.0 = black, 1.0 = white)
    Gray(f64),
    Rgb(f64, f64, f64),
    Cmyk(f64, f64, f64, f64),
    /// Named pattern (`/P0 scn`), optionally with underlying components
    Pattern(String, Vec<f64>),
}

impl Default for Color {
    fn default() -> Self {
        Color::Gray(0.0)
    }
}

impl Color {
    /// Builds a colour from raw operands according to their count.
    pub fn from_components(components: &[f64]) -> Self {
        match *components {
            [g] => Color::Gray(g),
            [r, g, b] => Color::Rgb(r, g, b),
            [c, m, y, k] => Color::Cmyk(c, m, y, k),
            _ => Color::Gray(components.first().copied().unwrap_or(0.0)),
        }
    }

    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            Color::Gray(g) => vec![*g],
            Color::Rgb(r, g, b) => vec![*r, *g, *b],
            Color::Cmyk(c, m, y, k) => vec![*c, *m, *y, *k],
            Color::Pattern(_, components) => components.clone(),
        }
    }
}

/// Text state: font selection, spacing and the text/line matrices.
#[derive(Debug, Clone)]
pub struct PDFTextState {
    pub font: Option<Arc<dyn PDFFont>>,
    /// Resource name of the selected font (e.g. "F1")
    pub fontname: Option<String>,
    pub fontsize: f64,
    pub charspace: f64,
    /// Applied after every space glyph (cid 32) of single-byte fonts
    pub wordspace: f64,
    /// Horizontal scaling percentage (100 = normal)
    pub scaling: f64,
    /// Stored negated, as `TL` sets it
    pub leading: f64,
    pub render: i32,
    pub rise: f64,
    /// Text matrix (Tm)
    pub matrix: Matrix,
    /// Position reached by the last string within the current line
    pub linematrix: Point,
}

impl PDFTextState {
    pub fn new() -> Self {
        Self {
            font: None,
            fontname: None,
            fontsize: 0.0,
            charspace: 0.0,
            wordspace: 0.0,
            scaling: 100.0,
            leading: 0.0,
            render: 0,
            rise: 0.0,
            matrix: MATRIX_IDENTITY,
            linematrix: (0.0, 0.0),
        }
    }

    /// Reset text matrix and line matrix. Called by `BT`.
    pub fn reset(&mut self) {
        self.matrix = MATRIX_IDENTITY;
        self.linematrix = (0.0, 0.0);
    }
}

impl Default for PDFTextState {
    fn default() -> Self {
        Self::new()
    }
}

/// Graphics state parameters that travel with `q`/`Q`.
#[derive(Debug, Clone)]
pub struct PDFGraphicState {
    pub linewidth: f64,
    pub linecap: Option<i32>,
    pub linejoin: Option<i32>,
    pub miterlimit: Option<f64>,
    /// Dash pattern: (array, phase)
    pub dash: Option<(Vec<f64>, f64)>,
    pub intent: Option<String>,
    pub flatness: Option<f64>,

    pub scolor: Color,
    pub scs: PDFColorSpace,
    pub ncolor: Color,
    pub ncs: PDFColorSpace,
}

impl PDFGraphicState {
    pub fn new() -> Self {
        Self {
            linewidth: 0.0,
            linecap: None,
            linejoin: None,
            miterlimit: None,
            dash: None,
            intent: None,
            flatness: None,
            scolor: Color::Gray(0.0),
            scs: PDFColorSpace::device_gray(),
            ncolor: Color::Gray(0.0),
            ncs: PDFColorSpace::device_gray(),
        }
    }
}

impl Default for PDFGraphicState {
    fn default() -> Self {
        Self::new()
    }
}
