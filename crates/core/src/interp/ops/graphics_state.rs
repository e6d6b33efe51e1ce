//! Graphics state stack, CTM and line style operators.

use crate::interp::device::PDFDevice;
use crate::interp::interpreter::PDFPageInterpreter;
use crate::utils::mult_matrix;

#[allow(non_snake_case)]
impl<'a, D: PDFDevice> PDFPageInterpreter<'a, D> {
    /// `q` snapshots ctm, graphic and text state.
    pub fn do_q(&mut self) {
        let saved = self.get_current_state();
        self.gstack.push(saved);
    }

    /// `Q`. Popping an empty stack is a no-op.
    pub fn do_Q(&mut self) {
        let Some(saved) = self.gstack.pop() else {
            tracing::debug!("Q without matching q");
            return;
        };
        self.set_current_state(saved);
    }

    /// `cm` pre-multiplies the ctm and tells the device.
    pub fn do_cm(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.ctm = mult_matrix((a, b, c, d, e, f), self.ctm);
        self.device.set_ctm(self.ctm);
    }

    /// Kept in user space; devices report it unscaled.
    pub const fn do_w(&mut self, linewidth: f64) {
        self.graphicstate.linewidth = linewidth;
    }

    pub const fn do_J(&mut self, linecap: i32) {
        self.graphicstate.linecap = Some(linecap);
    }

    pub const fn do_j(&mut self, linejoin: i32) {
        self.graphicstate.linejoin = Some(linejoin);
    }

    pub const fn do_M(&mut self, miterlimit: f64) {
        self.graphicstate.miterlimit = Some(miterlimit);
    }

    pub fn do_d(&mut self, dash_array: Vec<f64>, phase: f64) {
        self.graphicstate.dash = Some((dash_array, phase));
    }

    pub fn do_ri(&mut self, intent: &str) {
        self.graphicstate.intent = Some(intent.to_owned());
    }

    pub const fn do_i(&mut self, flatness: f64) {
        self.graphicstate.flatness = Some(flatness);
    }

    /// `gs` copies over whichever entries the named ExtGState sets.
    pub fn do_gs(&mut self, name: &str) {
        let Some(params) = self.resources.ext_gstates.get(name) else {
            tracing::debug!(name, "gs names an unknown ExtGState");
            return;
        };
        let gs = &mut self.graphicstate;
        if let Some(lw) = params.linewidth {
            gs.linewidth = lw;
        }
        if params.linecap.is_some() {
            gs.linecap = params.linecap;
        }
        if params.linejoin.is_some() {
            gs.linejoin = params.linejoin;
        }
        if params.miterlimit.is_some() {
            gs.miterlimit = params.miterlimit;
        }
        if params.dash.is_some() {
            gs.dash.clone_from(&params.dash);
        }
        if params.intent.is_some() {
            gs.intent.clone_from(&params.intent);
        }
        if params.flatness.is_some() {
            gs.flatness = params.flatness;
        }
    }
}
