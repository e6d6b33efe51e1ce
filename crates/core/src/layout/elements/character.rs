//! Text elements: LTChar (rendered glyph) and LTAnno (virtual text).

use std::sync::Arc;

use crate::font::{CharDisp, PDFFont};
use crate::utils::{Matrix, apply_matrix_rect};

use super::component::LTComponent;

/// A single rendered glyph.
///
/// The bounding box is derived from the text rendering matrix and the font
/// metrics when the glyph is created; it is always normalized so that
/// `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone)]
pub struct LTChar {
    component: LTComponent,
    text: String,
    font: Arc<dyn PDFFont>,
    fontsize: f64,
    scaling: f64,
    rise: f64,
    /// Advance in text space: width * fontsize * scaling
    adv: f64,
    textdisp: CharDisp,
    /// Text rendering matrix (Tm * CTM, with per-char translation)
    matrix: Matrix,
    upright: bool,
    /// Font height for horizontal text, width for vertical text
    size: f64,
}

impl LTChar {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        matrix: Matrix,
        font: Arc<dyn PDFFont>,
        fontsize: f64,
        scaling: f64,
        rise: f64,
        text: String,
        textwidth: f64,
        textdisp: CharDisp,
    ) -> Self {
        let adv = textwidth * fontsize * scaling;

        let bbox_text = match (font.is_vertical(), textdisp) {
            (true, CharDisp::Vertical(vx, vy)) => {
                let vx = vx.map_or(fontsize * 0.5, |v| v * fontsize * 0.001);
                let vy = (1000.0 - vy) * fontsize * 0.001;
                (-vx, vy + rise + adv, -vx + fontsize, vy + rise)
            }
            _ => {
                let descent = font.get_descent() * fontsize;
                (0.0, descent + rise, adv, descent + rise + fontsize)
            }
        };

        let (a, b, c, d, _e, _f) = matrix;
        let upright = a * d * scaling > 0.0 && b * c <= 0.0;

        let (x0, y0, x1, y1) = apply_matrix_rect(matrix, bbox_text);
        let component = LTComponent::new((x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)));
        let size = if font.is_vertical() {
            component.width()
        } else {
            component.height()
        };

        Self {
            component,
            text,
            font,
            fontsize,
            scaling,
            rise,
            adv,
            textdisp,
            matrix,
            upright,
            size,
        }
    }

    pub fn get_text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> &Arc<dyn PDFFont> {
        &self.font
    }

    pub fn fontname(&self) -> &str {
        self.font.fontname().unwrap_or("unknown")
    }

    pub fn fontsize(&self) -> f64 {
        self.fontsize
    }

    pub fn scaling(&self) -> f64 {
        self.scaling
    }

    pub fn rise(&self) -> f64 {
        self.rise
    }

    pub fn adv(&self) -> f64 {
        self.adv
    }

    pub fn textdisp(&self) -> CharDisp {
        self.textdisp
    }

    pub fn matrix(&self) -> Matrix {
        self.matrix
    }

    pub fn upright(&self) -> bool {
        self.upright
    }

    pub fn size(&self) -> f64 {
        self.size
    }
}

impl std::ops::Deref for LTChar {
    type Target = LTComponent;
    fn deref(&self) -> &Self::Target {
        &self.component
    }
}

impl_has_bbox_delegate!(LTChar, component);

/// Virtual text (spaces, newlines) inserted by layout analysis.
///
/// Has no position of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LTAnno {
    text: String,
}

impl LTAnno {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    pub fn get_text(&self) -> &str {
        &self.text
    }
}
