//! Text object, text state and text showing operators.
//!
//! Positioning only ever touches `textstate.matrix`; the glyph advance
//! within a line is tracked by the device through `textstate.linematrix`.

use crate::error::Result;
use crate::interp::device::{PDFDevice, PDFTextSeq, PDFTextSeqItem};
use crate::interp::interpreter::PDFPageInterpreter;
use crate::utils::translate_matrix;

#[allow(non_snake_case)]
impl<'a, D: PDFDevice> PDFPageInterpreter<'a, D> {
    /// `BT` puts the text matrix back to identity. Font and spacing survive.
    pub fn do_BT(&mut self) {
        self.textstate.reset();
    }

    pub const fn do_ET(&mut self) {}

    pub const fn do_Tc(&mut self, charspace: f64) {
        self.textstate.charspace = charspace;
    }

    pub const fn do_Tw(&mut self, wordspace: f64) {
        self.textstate.wordspace = wordspace;
    }

    /// Horizontal scaling, in percent.
    pub const fn do_Tz(&mut self, scaling: f64) {
        self.textstate.scaling = scaling;
    }

    /// Stored negated, so that `T*` can feed it straight into `Td`.
    pub fn do_TL(&mut self, leading: f64) {
        self.textstate.leading = -leading;
    }

    /// Selects a font resource by name. Strings shown while no font is
    /// resolved produce no glyphs.
    pub fn do_Tf(&mut self, fontid: &str, fontsize: f64) {
        let font = self.resources.font(fontid).cloned();
        if font.is_none() {
            tracing::debug!(fontid, "Tf names a font missing from resources");
        }
        self.textstate.font = font;
        self.textstate.fontname = Some(fontid.to_owned());
        self.textstate.fontsize = fontsize;
    }

    pub const fn do_Tr(&mut self, render: i32) {
        self.textstate.render = render;
    }

    pub const fn do_Ts(&mut self, rise: f64) {
        self.textstate.rise = rise;
    }

    /// `Td`: new line start at (tx, ty) in the current text space.
    pub fn do_Td(&mut self, tx: f64, ty: f64) {
        self.textstate.matrix = translate_matrix(self.textstate.matrix, (tx, ty));
        self.textstate.linematrix = (0.0, 0.0);
    }

    /// `TD` moves like `Td` and keeps `ty` as the leading.
    pub fn do_TD(&mut self, tx: f64, ty: f64) {
        self.do_Td(tx, ty);
        self.textstate.leading = ty;
    }

    pub const fn do_Tm(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.textstate.matrix = (a, b, c, d, e, f);
        self.textstate.linematrix = (0.0, 0.0);
    }

    /// `T*`
    pub fn do_T_star(&mut self) {
        let leading = self.textstate.leading;
        self.do_Td(0.0, leading);
    }

    /// `TJ`: strings interleaved with kerning numbers in thousandths of an em.
    pub fn do_TJ(&mut self, seq: PDFTextSeq) -> Result<()> {
        self.device
            .render_string(&mut self.textstate, &seq, &self.graphicstate)
    }

    /// `Tj`
    pub fn do_Tj(&mut self, s: Vec<u8>) -> Result<()> {
        self.do_TJ(vec![PDFTextSeqItem::Bytes(s)])
    }

    /// `'` shows a string on the next line.
    pub fn do_quote(&mut self, s: Vec<u8>) -> Result<()> {
        self.do_T_star();
        self.do_Tj(s)
    }

    /// `"` sets word then character spacing before behaving like `'`.
    pub fn do_doublequote(&mut self, aw: f64, ac: f64, s: Vec<u8>) -> Result<()> {
        self.do_Tw(aw);
        self.do_Tc(ac);
        self.do_quote(s)
    }
}
