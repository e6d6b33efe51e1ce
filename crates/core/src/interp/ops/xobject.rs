//! XObject and inline image operators.
//!
//! Handles: Do, BI
//!
//! - Do on a form: the form becomes a figure; its operations run with the
//!   form's resources under the form matrix
//! - Do on an image, BI: the image becomes a unit-square figure holding
//!   one image element
//!
//! The lexer folds `BI ... ID ... EI` into a single `BI` operation.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::document::{Resources, XObject};
use crate::error::Result;
use crate::interp::device::{PDFDevice, PathSegment};
use crate::interp::interpreter::{PDFPageInterpreter, SavedState};
use crate::interp::operator::Operand;
use crate::model::ImageStream;
use crate::model::color::INLINE_COLORSPACE_ABBREV;
use crate::model::{PDFGraphicState, PDFTextState};
use crate::utils::{MATRIX_IDENTITY, Matrix, Point, Rect, mult_matrix};

/// Interpreter state put aside while a form runs.
pub(crate) struct InterpreterState {
    gstack: Vec<SavedState>,
    ctm: Matrix,
    textstate: PDFTextState,
    graphicstate: PDFGraphicState,
    curpath: Vec<PathSegment>,
    current_point: Option<Point>,
    resources: Arc<Resources>,
}

/// Unit square used as the local box of image figures.
const UNIT_BBOX: Rect = (0.0, 0.0, 1.0, 1.0);

#[allow(non_snake_case)]
impl<'a, D: PDFDevice> PDFPageInterpreter<'a, D> {
    /// Invoke a named XObject from the current resources.
    ///
    /// PDF operator: `Do`
    pub fn do_Do(&mut self, xobjid: &str) -> Result<()> {
        let Some(xobj) = self.resources.xobject(xobjid).cloned() else {
            tracing::debug!(xobjid, "undefined XObject");
            return Ok(());
        };

        match xobj.as_ref() {
            XObject::Form(form) => {
                if self.xobj_stack.iter().any(|id| id == xobjid) {
                    tracing::debug!(xobjid, "skipping recursive form");
                    return Ok(());
                }
                let resources = form
                    .resources
                    .clone()
                    .unwrap_or_else(|| Arc::clone(&self.resources));
                let form_ctm = mult_matrix(form.matrix, self.ctm);

                self.device.begin_figure(xobjid, form.bbox, form.matrix)?;
                let saved = self.snapshot_state();
                self.xobj_stack.push(xobjid.to_string());
                let result = self.render_contents(resources, &form.operations, form_ctm);
                self.xobj_stack.pop();
                self.restore_state(saved);
                result?;
                self.device.end_figure(xobjid)
            }
            XObject::Image(stream) => self.render_image_figure(xobjid, stream),
        }
    }

    /// Inline image: operands are the image dictionary and its data.
    ///
    /// PDF operator: `BI` (with `ID` and `EI`)
    pub fn do_BI(&mut self, args: &[Operand]) -> Result<()> {
        let [.., Operand::Dict(dict), Operand::String(data)] = args else {
            return Ok(());
        };
        let Some(stream) = inline_image_stream(dict, data.clone()) else {
            tracing::debug!("inline image without dimensions");
            return Ok(());
        };
        let name = format!("inline{}", self.inline_image_id);
        self.inline_image_id += 1;
        self.render_image_figure(&name, &stream)
    }

    fn render_image_figure(&mut self, name: &str, stream: &ImageStream) -> Result<()> {
        self.device.begin_figure(name, UNIT_BBOX, MATRIX_IDENTITY)?;
        self.device.render_image(name, stream)?;
        self.device.end_figure(name)
    }

    pub(crate) fn snapshot_state(&mut self) -> InterpreterState {
        InterpreterState {
            gstack: std::mem::take(&mut self.gstack),
            ctm: self.ctm,
            textstate: self.textstate.clone(),
            graphicstate: self.graphicstate.clone(),
            curpath: std::mem::take(&mut self.curpath),
            current_point: self.current_point,
            resources: Arc::clone(&self.resources),
        }
    }

    pub(crate) fn restore_state(&mut self, state: InterpreterState) {
        self.gstack = state.gstack;
        self.ctm = state.ctm;
        self.textstate = state.textstate;
        self.graphicstate = state.graphicstate;
        self.curpath = state.curpath;
        self.current_point = state.current_point;
        self.resources = state.resources;
        self.device.set_ctm(self.ctm);
    }
}

/// Build an image stream from an inline image dictionary, expanding the
/// abbreviated keys and names. Width and height are required.
fn inline_image_stream(dict: &BTreeMap<String, Operand>, data: Vec<u8>) -> Option<ImageStream> {
    let get = |short: &str, long: &str| dict.get(short).or_else(|| dict.get(long));
    let dim = |short: &str, long: &str| {
        get(short, long)
            .and_then(Operand::as_i64)
            .and_then(|v| u32::try_from(v).ok())
    };

    let mut stream = ImageStream::new(dim("W", "Width")?, dim("H", "Height")?, data);
    if let Some(bits) = dim("BPC", "BitsPerComponent") {
        stream.bits = bits;
    }
    stream.imagemask = matches!(get("IM", "ImageMask"), Some(Operand::Bool(true)));
    if let Some(cs) = get("CS", "ColorSpace") {
        stream.colorspace = operand_names(cs)
            .into_iter()
            .map(|n| {
                INLINE_COLORSPACE_ABBREV
                    .get(n.as_str())
                    .map_or(n.clone(), |full| (*full).to_string())
            })
            .collect();
    }
    if let Some(filter) = get("F", "Filter") {
        stream.filters = operand_names(filter)
            .into_iter()
            .map(|n| expand_filter(&n))
            .collect();
    }
    Some(stream)
}

fn operand_names(op: &Operand) -> Vec<String> {
    match op {
        Operand::Name(n) => vec![n.clone()],
        Operand::Array(items) => items
            .iter()
            .filter_map(|i| i.as_name().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn expand_filter(name: &str) -> String {
    match name {
        "AHx" => "ASCIIHexDecode",
        "A85" => "ASCII85Decode",
        "LZW" => "LZWDecode",
        "Fl" => "FlateDecode",
        "RL" => "RunLengthDecode",
        "CCF" => "CCITTFaxDecode",
        "DCT" => "DCTDecode",
        other => other,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_dictionary_abbreviations() {
        let dict = BTreeMap::from([
            ("W".to_string(), Operand::Int(4)),
            ("H".to_string(), Operand::Int(2)),
            ("BPC".to_string(), Operand::Int(1)),
            ("CS".to_string(), Operand::name("G")),
            ("F".to_string(), Operand::Array(vec![Operand::name("AHx"), Operand::name("DCT")])),
        ]);
        let stream = inline_image_stream(&dict, vec![0; 2]).unwrap();
        assert_eq!((stream.width, stream.height, stream.bits), (4, 2, 1));
        assert_eq!(stream.colorspace, ["DeviceGray"]);
        assert_eq!(stream.filters, ["ASCIIHexDecode", "DCTDecode"]);
        assert_eq!(stream.last_filter(), Some("DCTDecode"));
    }

    #[test]
    fn inline_image_needs_dimensions() {
        let dict = BTreeMap::from([("W".to_string(), Operand::Int(4))]);
        assert!(inline_image_stream(&dict, Vec::new()).is_none());
    }
}
