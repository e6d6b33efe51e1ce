//! Colour operators.
//!
//! Handles: G, g, RG, rg, K, k, CS, cs, SC, SCN, sc, scn
//!
//! Upper-case operators set the stroking colour, lower-case ones the
//! non-stroking colour. Device colour operators also switch the colour
//! space.

use crate::interp::device::PDFDevice;
use crate::interp::interpreter::PDFPageInterpreter;
use crate::interp::operator::Operand;
use crate::model::{Color, PDFColorSpace};

#[allow(non_snake_case)]
impl<'a, D: PDFDevice> PDFPageInterpreter<'a, D> {
    /// PDF operator: `G`
    pub fn do_G(&mut self, gray: f64) {
        self.set_stroking(PDFColorSpace::lookup("DeviceGray"), Color::Gray(gray));
    }

    /// PDF operator: `g`
    pub fn do_g(&mut self, gray: f64) {
        self.set_nonstroking(PDFColorSpace::lookup("DeviceGray"), Color::Gray(gray));
    }

    /// PDF operator: `RG`
    pub fn do_RG(&mut self, r: f64, g: f64, b: f64) {
        self.set_stroking(PDFColorSpace::lookup("DeviceRGB"), Color::Rgb(r, g, b));
    }

    /// PDF operator: `rg`
    pub fn do_rg(&mut self, r: f64, g: f64, b: f64) {
        self.set_nonstroking(PDFColorSpace::lookup("DeviceRGB"), Color::Rgb(r, g, b));
    }

    /// PDF operator: `K`
    pub fn do_K(&mut self, c: f64, m: f64, y: f64, k: f64) {
        self.set_stroking(
            PDFColorSpace::lookup("DeviceCMYK"),
            Color::Cmyk(c, m, y, k),
        );
    }

    /// PDF operator: `k`
    pub fn do_k(&mut self, c: f64, m: f64, y: f64, k: f64) {
        self.set_nonstroking(
            PDFColorSpace::lookup("DeviceCMYK"),
            Color::Cmyk(c, m, y, k),
        );
    }

    /// Selects the stroking colour space.
    ///
    /// PDF operator: `CS`
    pub fn do_CS(&mut self, name: &str) {
        self.graphicstate.scs = PDFColorSpace::lookup(name);
        tracing::trace!(scs = name, "stroking colour space");
    }

    /// Selects the non-stroking colour space.
    ///
    /// PDF operator: `cs`
    pub fn do_cs(&mut self, name: &str) {
        self.graphicstate.ncs = PDFColorSpace::lookup(name);
        tracing::trace!(ncs = name, "non-stroking colour space");
    }

    /// Sets the stroking colour in the current colour space.
    ///
    /// PDF operator: `SC` / `SCN`
    pub fn do_SC(&mut self, args: &[Operand]) {
        let ncomponents = self.graphicstate.scs.ncomponents;
        if let Some(color) = Self::parse_color(args, ncomponents) {
            tracing::trace!(color = ?color, "stroking colour");
            self.graphicstate.scolor = color;
        }
    }

    /// Sets the non-stroking colour in the current colour space.
    ///
    /// PDF operator: `sc` / `scn`
    pub fn do_sc(&mut self, args: &[Operand]) {
        let ncomponents = self.graphicstate.ncs.ncomponents;
        if let Some(color) = Self::parse_color(args, ncomponents) {
            tracing::trace!(color = ?color, "non-stroking colour");
            self.graphicstate.ncolor = color;
        }
    }

    fn set_stroking(&mut self, cs: PDFColorSpace, color: Color) {
        tracing::trace!(scs = %cs.name, color = ?color, "stroking colour");
        self.graphicstate.scs = cs;
        self.graphicstate.scolor = color;
    }

    fn set_nonstroking(&mut self, cs: PDFColorSpace, color: Color) {
        tracing::trace!(ncs = %cs.name, color = ?color, "non-stroking colour");
        self.graphicstate.ncs = cs;
        self.graphicstate.ncolor = color;
    }

    /// A trailing name selects a pattern (with any preceding components);
    /// otherwise the last `ncomponents` numbers form the colour.
    pub(crate) fn parse_color(args: &[Operand], ncomponents: usize) -> Option<Color> {
        if let [rest @ .., Operand::Name(pattern)] = args {
            let components = rest.iter().filter_map(Operand::as_f64).collect();
            return Some(Color::Pattern(pattern.clone(), components));
        }
        let values: Vec<f64> = args.iter().filter_map(Operand::as_f64).collect();
        if values.is_empty() {
            return None;
        }
        let start = values.len().saturating_sub(ncomponents.max(1));
        Some(Color::from_components(&values[start..]))
    }
}
