//! LTItem - the closed set of nodes a page or figure can hold.

use crate::utils::HasBBox;

use super::character::LTChar;
use super::container::LTFigure;
use super::graphics::{LTCurve, LTImage, LTLine, LTRect};
use super::text::{LTTextBox, LTTextLine};

macro_rules! dispatch_hasbbox {
    ($self:ident, $method:ident) => {
        match $self {
            LTItem::Char(c) => c.$method(),
            LTItem::Curve(c) => c.$method(),
            LTItem::Line(l) => l.$method(),
            LTItem::Rect(r) => r.$method(),
            LTItem::Image(i) => i.$method(),
            LTItem::TextLine(l) => l.$method(),
            LTItem::TextBox(b) => b.$method(),
            LTItem::Figure(f) => f.$method(),
        }
    };
}

/// Any child of a page or figure.
///
/// Pages are never children, so there is no page variant; matches over
/// this enum are exhaustive without a fallback arm.
#[derive(Debug, Clone)]
pub enum LTItem {
    Char(LTChar),
    Curve(LTCurve),
    Line(LTLine),
    Rect(LTRect),
    Image(LTImage),
    TextLine(LTTextLine),
    TextBox(LTTextBox),
    Figure(Box<LTFigure>),
}

impl LTItem {
    /// Variant name, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            LTItem::Char(_) => "char",
            LTItem::Curve(_) => "curve",
            LTItem::Line(_) => "line",
            LTItem::Rect(_) => "rect",
            LTItem::Image(_) => "image",
            LTItem::TextLine(_) => "textline",
            LTItem::TextBox(_) => "textbox",
            LTItem::Figure(_) => "figure",
        }
    }
}

impl HasBBox for LTItem {
    fn x0(&self) -> f64 {
        dispatch_hasbbox!(self, x0)
    }
    fn y0(&self) -> f64 {
        dispatch_hasbbox!(self, y0)
    }
    fn x1(&self) -> f64 {
        dispatch_hasbbox!(self, x1)
    }
    fn y1(&self) -> f64 {
        dispatch_hasbbox!(self, y1)
    }
}
