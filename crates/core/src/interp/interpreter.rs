//! Page interpreter: holds the execution state for one content stream and
//! routes each [`Operation`] to the matching `do_*` method under `ops/`.

use std::sync::Arc;

use super::device::{PDFDevice, PDFTextSeq, PDFTextSeqItem, PathSegment};
use super::operator::{Operand, Operation};
use crate::document::{PageDescriptor, Resources};
use crate::error::Result;
use crate::model::{PDFGraphicState, PDFTextState};
use crate::utils::{MATRIX_IDENTITY, Matrix, Point, Rect};

/// What `q` pushes and `Q` restores.
pub(crate) type SavedState = (Matrix, PDFTextState, PDFGraphicState);

/// Drives a [`PDFDevice`] from decoded page content.
///
/// Operator methods keep the operator's own spelling (`do_Q`, `do_TJ`, ...),
/// hence the `non_snake_case` allowances on every impl block.
pub struct PDFPageInterpreter<'a, D: PDFDevice> {
    pub(crate) device: &'a mut D,
    pub(crate) gstack: Vec<SavedState>,
    pub(crate) ctm: Matrix,
    pub(crate) textstate: PDFTextState,
    pub(crate) graphicstate: PDFGraphicState,
    /// Segments since the last painting operator, in user space
    pub(crate) curpath: Vec<PathSegment>,
    /// End point of the last segment
    pub(crate) current_point: Option<Point>,
    pub(crate) resources: Arc<Resources>,
    /// Running count of inline images on this interpreter
    pub(crate) inline_image_id: usize,
    /// Names of the forms currently executing, innermost last
    pub(crate) xobj_stack: Vec<String>,
}

#[allow(non_snake_case)]
impl<'a, D: PDFDevice> PDFPageInterpreter<'a, D> {
    pub fn new(device: &'a mut D) -> Self {
        Self {
            device,
            gstack: Vec::new(),
            ctm: MATRIX_IDENTITY,
            textstate: PDFTextState::new(),
            graphicstate: PDFGraphicState::new(),
            curpath: Vec::new(),
            current_point: None,
            resources: Arc::default(),
            inline_image_id: 0,
            xobj_stack: Vec::new(),
        }
    }

    /// Fresh graphic, text and path state under `ctm`. Runs before every
    /// page and every form body.
    pub fn init_state(&mut self, ctm: Matrix) {
        self.gstack.clear();
        self.curpath.clear();
        self.current_point = None;
        self.textstate = PDFTextState::new();
        self.graphicstate = PDFGraphicState::new();
        self.ctm = ctm;
        self.device.set_ctm(ctm);
    }

    pub fn init_resources(&mut self, resources: Arc<Resources>) {
        self.resources = resources;
    }

    pub const fn ctm(&self) -> Matrix {
        self.ctm
    }

    pub const fn graphicstate(&self) -> &PDFGraphicState {
        &self.graphicstate
    }

    pub const fn textstate(&self) -> &PDFTextState {
        &self.textstate
    }

    pub fn current_path(&self) -> &[PathSegment] {
        &self.curpath
    }

    pub fn gstack_depth(&self) -> usize {
        self.gstack.len()
    }

    pub(crate) fn get_current_state(&self) -> SavedState {
        (self.ctm, self.textstate.clone(), self.graphicstate.clone())
    }

    pub(crate) fn set_current_state(&mut self, (ctm, textstate, graphicstate): SavedState) {
        self.textstate = textstate;
        self.graphicstate = graphicstate;
        self.ctm = ctm;
        self.device.set_ctm(ctm);
    }

    /// Starting ctm for a page. Rotates by `rotate` degrees clockwise and
    /// moves the media box origin to (0, 0).
    pub fn page_ctm(mediabox: Rect, rotate: i32) -> Matrix {
        let (x0, y0, x1, y1) = mediabox;
        match rotate {
            90 => (0.0, -1.0, 1.0, 0.0, -y0, x1),
            180 => (-1.0, 0.0, 0.0, -1.0, x1, y1),
            270 => (0.0, 1.0, -1.0, 0.0, y1, -x0),
            _ => (1.0, 0.0, 0.0, 1.0, -x0, -y0),
        }
    }

    /// Runs one page from `begin_page` through `end_page`.
    pub fn process_page(&mut self, page: &PageDescriptor) -> Result<()> {
        let ctm = Self::page_ctm(page.mediabox, page.rotate);
        self.device.begin_page(page.mediabox, page.rotate, ctm)?;
        self.render_contents(Arc::clone(&page.resources), &page.operations, ctm)?;
        self.device.end_page()
    }

    pub fn render_contents(
        &mut self,
        resources: Arc<Resources>,
        operations: &[Operation],
        ctm: Matrix,
    ) -> Result<()> {
        self.init_resources(resources);
        self.init_state(ctm);
        self.execute(operations)
    }

    /// Applies `operations` in order against the current state.
    ///
    /// Operators whose operands are missing or of the wrong type are skipped;
    /// only device errors stop execution.
    pub fn execute(&mut self, operations: &[Operation]) -> Result<()> {
        for op in operations {
            let operator = op.operator.as_str();
            if !self.dispatch(operator, Operands(&op.operands))? {
                tracing::debug!(operator, operands = op.operands.len(), "bad operands, skipped");
            }
        }
        Ok(())
    }

    /// Returns `false` when the operator was recognised but its operands
    /// could not be used.
    fn dispatch(&mut self, operator: &str, args: Operands<'_>) -> Result<bool> {
        match operator {
            "q" => self.do_q(),
            "Q" => self.do_Q(),
            "h" => self.do_h(),
            "n" => self.do_n(),
            "W" => self.do_W(),
            "W*" => self.do_W_star(),
            "S" => self.do_S()?,
            "s" => self.do_s()?,
            "f" => self.do_f()?,
            "F" => self.do_F()?,
            "f*" => self.do_f_star()?,
            "B" => self.do_B()?,
            "B*" => self.do_B_star()?,
            "b" => self.do_b()?,
            "b*" => self.do_b_star()?,
            "BT" => self.do_BT(),
            "ET" => self.do_ET(),
            "T*" => self.do_T_star(),
            "SC" | "SCN" => self.do_SC(args.all()),
            "sc" | "scn" => self.do_sc(args.all()),
            "BI" => self.do_BI(args.all())?,
            // Marked content, compatibility sections, Type3 metrics and
            // shadings leave no trace in the layout.
            "BMC" | "BDC" | "EMC" | "MP" | "DP" | "BX" | "EX" | "d0" | "d1" | "sh" | "ID"
            | "EI" => {}
            _ => return self.dispatch_with_operands(operator, args),
        }
        Ok(true)
    }

    fn dispatch_with_operands(&mut self, operator: &str, args: Operands<'_>) -> Result<bool> {
        let applied = match operator {
            "cm" => args.matrix().map(|(a, b, c, d, e, f)| self.do_cm(a, b, c, d, e, f)),
            "w" => args.number().map(|v| self.do_w(v)),
            "J" => args.int().map(|v| self.do_J(v)),
            "j" => args.int().map(|v| self.do_j(v)),
            "M" => args.number().map(|v| self.do_M(v)),
            "d" => args.dash().map(|(array, phase)| self.do_d(array, phase)),
            "ri" => args.name().map(|v| self.do_ri(v)),
            "i" => args.number().map(|v| self.do_i(v)),
            "gs" => args.name().map(|v| self.do_gs(v)),

            "G" => args.number().map(|v| self.do_G(v)),
            "g" => args.number().map(|v| self.do_g(v)),
            "RG" => args.numbers().map(|[r, g, b]| self.do_RG(r, g, b)),
            "rg" => args.numbers().map(|[r, g, b]| self.do_rg(r, g, b)),
            "K" => args.numbers().map(|[c, m, y, k]| self.do_K(c, m, y, k)),
            "k" => args.numbers().map(|[c, m, y, k]| self.do_k(c, m, y, k)),
            "CS" => args.name().map(|v| self.do_CS(v)),
            "cs" => args.name().map(|v| self.do_cs(v)),

            "m" => args.point().map(|(x, y)| self.do_m(x, y)),
            "l" => args.point().map(|(x, y)| self.do_l(x, y)),
            "c" => args
                .numbers()
                .map(|[x1, y1, x2, y2, x3, y3]| self.do_c(x1, y1, x2, y2, x3, y3)),
            "v" => args.numbers().map(|[x2, y2, x3, y3]| self.do_v(x2, y2, x3, y3)),
            "y" => args.numbers().map(|[x1, y1, x3, y3]| self.do_y(x1, y1, x3, y3)),
            "re" => args.numbers().map(|[x, y, w, h]| self.do_re(x, y, w, h)),

            "Tc" => args.number().map(|v| self.do_Tc(v)),
            "Tw" => args.number().map(|v| self.do_Tw(v)),
            "Tz" => args.number().map(|v| self.do_Tz(v)),
            "TL" => args.number().map(|v| self.do_TL(v)),
            "Tf" => args.font().map(|(name, size)| self.do_Tf(name, size)),
            "Tr" => args.int().map(|v| self.do_Tr(v)),
            "Ts" => args.number().map(|v| self.do_Ts(v)),
            "Td" => args.point().map(|(tx, ty)| self.do_Td(tx, ty)),
            "TD" => args.point().map(|(tx, ty)| self.do_TD(tx, ty)),
            "Tm" => args.matrix().map(|(a, b, c, d, e, f)| self.do_Tm(a, b, c, d, e, f)),

            "TJ" => args.text_seq().map(|seq| self.do_TJ(seq)).transpose()?,
            "Tj" => args.string().map(|s| self.do_Tj(s.to_vec())).transpose()?,
            "'" => args.string().map(|s| self.do_quote(s.to_vec())).transpose()?,
            "\"" => args
                .spaced_string()
                .map(|(aw, ac, s)| self.do_doublequote(aw, ac, s.to_vec()))
                .transpose()?,
            "Do" => args.name().map(|v| self.do_Do(v)).transpose()?,

            other => {
                tracing::trace!(operator = other, "unknown operator ignored");
                Some(())
            }
        };
        Ok(applied.is_some())
    }
}

/// Read-only view of an operation's operands.
///
/// Accessors look at the trailing operands, so surplus leading values are
/// ignored the way a PostScript-style stack would leave them.
#[derive(Clone, Copy)]
pub(crate) struct Operands<'a>(&'a [Operand]);

impl<'a> Operands<'a> {
    fn all(self) -> &'a [Operand] {
        self.0
    }

    /// The last `N` operands as numbers, in stream order.
    fn numbers<const N: usize>(self) -> Option<[f64; N]> {
        let start = self.0.len().checked_sub(N)?;
        let mut out = [0.0; N];
        for (slot, operand) in out.iter_mut().zip(&self.0[start..]) {
            *slot = operand.as_f64()?;
        }
        Some(out)
    }

    fn number(self) -> Option<f64> {
        self.numbers().map(|[v]| v)
    }

    fn int(self) -> Option<i32> {
        self.0.last()?.as_i64().map(|n| n as i32)
    }

    fn point(self) -> Option<Point> {
        self.numbers().map(|[x, y]| (x, y))
    }

    fn matrix(self) -> Option<Matrix> {
        self.numbers().map(|[a, b, c, d, e, f]| (a, b, c, d, e, f))
    }

    fn name(self) -> Option<&'a str> {
        self.0.last()?.as_name()
    }

    fn string(self) -> Option<&'a [u8]> {
        self.0.last()?.as_bytes()
    }

    /// `[array] phase`; a phase of the wrong type counts as 0.
    fn dash(self) -> Option<(Vec<f64>, f64)> {
        let [.., array, phase] = self.0 else {
            return None;
        };
        let array = array
            .as_array()
            .map(|items| items.iter().filter_map(Operand::as_f64).collect())
            .unwrap_or_default();
        Some((array, phase.as_f64().unwrap_or(0.0)))
    }

    /// `/Name size`
    fn font(self) -> Option<(&'a str, f64)> {
        let [.., name, size] = self.0 else {
            return None;
        };
        Some((name.as_name()?, size.as_f64()?))
    }

    /// `aw ac string`
    fn spaced_string(self) -> Option<(f64, f64, &'a [u8])> {
        let [.., aw, ac, s] = self.0 else {
            return None;
        };
        Some((aw.as_f64()?, ac.as_f64()?, s.as_bytes()?))
    }

    /// Strings and kerning numbers of a `TJ` array. Other items are dropped.
    fn text_seq(self) -> Option<PDFTextSeq> {
        let items = self.0.last()?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|item| match item {
                    Operand::String(s) => Some(PDFTextSeqItem::Bytes(s.clone())),
                    other => other.as_f64().map(PDFTextSeqItem::Number),
                })
                .collect(),
        )
    }
}
