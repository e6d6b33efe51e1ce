//! Page descriptors read from PDF bytes.
//!
//! lopdf does the file-level work (cross references, object streams,
//! stream filters and content tokenizing). This module walks the page
//! tree and turns fonts, XObjects and graphics state dictionaries into
//! [`Resources`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use lopdf::{Dictionary, Object, ObjectId, Stream};

use super::page::{
    DEFAULT_MEDIABOX, ExtGState, FormXObject, PageDescriptor, Resources, XObject,
};
use super::DocumentSource;
use crate::error::{PdfError, Result};
use crate::font::{MAX_CID, PDFFont, SimpleFont, ToUnicodeMap};
use crate::interp::{Operand, Operation};
use crate::model::ImageStream;
use crate::utils::{MATRIX_IDENTITY, Matrix, Rect};

/// Width used by simple fonts that carry no width table (standard 14
/// fonts referenced without metrics).
const FALLBACK_WIDTH: f64 = 500.0;

/// PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: lopdf::Document,
    /// Page object ids in page order
    page_ids: Vec<ObjectId>,
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("pages", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

impl LopdfDocument {
    /// Parse a document from memory. Encrypted documents are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let inner = lopdf::Document::load_mem(bytes)?;
        if inner.is_encrypted() {
            return Err(PdfError::Encrypted);
        }
        let page_ids = inner.get_pages().into_values().collect();
        Ok(Self { inner, page_ids })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> Result<&'a Object> {
        match obj {
            Object::Reference(id) => self
                .inner
                .get_object(*id)
                .map_err(|_| PdfError::ObjectNotFound(id.0, id.1)),
            other => Ok(other),
        }
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        self.resolve(obj).ok()?.as_dict().ok()
    }

    /// Look up `key` on the page, then up the /Parent chain.
    fn inherited(&self, page_id: ObjectId, key: &[u8]) -> Result<Option<&Object>> {
        let mut current = page_id;
        // Guards against /Parent cycles in damaged files.
        for _ in 0..64 {
            let dict = self
                .inner
                .get_object(current)
                .and_then(Object::as_dict)
                .map_err(|_| PdfError::ObjectNotFound(current.0, current.1))?;
            if let Ok(value) = dict.get(key) {
                return Ok(Some(self.resolve(value)?));
            }
            match dict.get(b"Parent").and_then(Object::as_reference) {
                Ok(parent) => current = parent,
                Err(_) => return Ok(None),
            }
        }
        Ok(None)
    }

    fn page_contents(&self, page: &Dictionary) -> Result<Vec<Operation>> {
        let Ok(contents) = page.get(b"Contents") else {
            return Ok(Vec::new());
        };
        let mut data = Vec::new();
        match self.resolve(contents)? {
            Object::Stream(stream) => data = stream_bytes(stream)?,
            Object::Array(parts) => {
                for part in parts {
                    let stream = self.resolve(part)?.as_stream()?;
                    if !data.is_empty() {
                        data.push(b'\n');
                    }
                    data.extend_from_slice(&stream_bytes(stream)?);
                }
            }
            _ => {
                return Err(PdfError::Parse(
                    "/Contents is not a stream or array".to_string(),
                ));
            }
        }
        parse_content(&data)
    }

    fn load_resources(&self, dict: &Dictionary, visiting: &mut Vec<ObjectId>) -> Resources {
        let mut resources = Resources::new();

        if let Some(fonts) = dict.get(b"Font").ok().and_then(|o| self.resolve_dict(o)) {
            for (name, obj) in fonts.iter() {
                let name = String::from_utf8_lossy(name).into_owned();
                match self.resolve_dict(obj).map(|d| self.load_font(d)) {
                    Some(font) => {
                        resources.fonts.insert(name, font);
                    }
                    None => tracing::debug!(font = %name, "font entry is not a dictionary"),
                }
            }
        }

        if let Some(xobjects) = dict.get(b"XObject").ok().and_then(|o| self.resolve_dict(o)) {
            for (name, obj) in xobjects.iter() {
                let name = String::from_utf8_lossy(name).into_owned();
                if let Some(xobj) = self.load_xobject(&name, obj, visiting) {
                    resources.xobjects.insert(name, Arc::new(xobj));
                }
            }
        }

        if let Some(states) = dict.get(b"ExtGState").ok().and_then(|o| self.resolve_dict(o)) {
            for (name, obj) in states.iter() {
                if let Some(state) = self.resolve_dict(obj) {
                    let name = String::from_utf8_lossy(name).into_owned();
                    resources.ext_gstates.insert(name, self.load_ext_gstate(state));
                }
            }
        }

        resources
    }

    fn load_xobject(
        &self,
        name: &str,
        obj: &Object,
        visiting: &mut Vec<ObjectId>,
    ) -> Option<XObject> {
        let id = obj.as_reference().ok();
        if let Some(id) = id
            && visiting.contains(&id)
        {
            tracing::debug!(xobject = name, "skipping self-referencing form");
            return None;
        }
        let stream = self.resolve(obj).ok()?.as_stream().ok()?;
        let dict = &stream.dict;

        match name_of(dict.get(b"Subtype").ok()?)?.as_str() {
            "Form" => {
                let bbox = dict
                    .get(b"BBox")
                    .ok()
                    .and_then(|o| self.resolve(o).ok())
                    .and_then(rect_of)?;
                let matrix = dict
                    .get(b"Matrix")
                    .ok()
                    .and_then(|o| self.resolve(o).ok())
                    .and_then(matrix_of)
                    .unwrap_or(MATRIX_IDENTITY);
                let operations = match stream_bytes(stream).and_then(|d| parse_content(&d)) {
                    Ok(ops) => ops,
                    Err(err) => {
                        tracing::warn!(xobject = name, error = %err, "unreadable form content");
                        Vec::new()
                    }
                };
                let resources = match dict.get(b"Resources").ok().and_then(|o| self.resolve_dict(o))
                {
                    Some(res) => {
                        visiting.extend(id);
                        let loaded = self.load_resources(res, visiting);
                        if id.is_some() {
                            visiting.pop();
                        }
                        Some(Arc::new(loaded))
                    }
                    None => None,
                };
                Some(XObject::Form(FormXObject {
                    bbox,
                    matrix,
                    operations,
                    resources,
                }))
            }
            "Image" => Some(XObject::Image(self.load_image(stream)?)),
            other => {
                tracing::debug!(xobject = name, subtype = other, "unsupported XObject");
                None
            }
        }
    }

    fn load_image(&self, stream: &Stream) -> Option<ImageStream> {
        let dict = &stream.dict;
        let int = |key: &[u8]| {
            dict.get(key)
                .ok()
                .and_then(|o| self.resolve(o).ok())
                .and_then(|o| o.as_i64().ok())
        };
        let width = u32::try_from(int(b"Width")?).ok()?;
        let height = u32::try_from(int(b"Height")?).ok()?;

        let mut image = ImageStream::new(width, height, stream.content.clone());
        image.bits = int(b"BitsPerComponent")
            .and_then(|b| u32::try_from(b).ok())
            .unwrap_or(8);
        image.imagemask = matches!(dict.get(b"ImageMask"), Ok(Object::Boolean(true)));
        if let Some(cs) = dict.get(b"ColorSpace").ok().and_then(|o| self.resolve(o).ok()) {
            image.colorspace = names_of(cs);
        }
        if let Ok(filter) = dict.get(b"Filter") {
            image.filters = self.resolve(filter).map(names_of).unwrap_or_default();
        }
        Some(image)
    }

    fn load_ext_gstate(&self, dict: &Dictionary) -> ExtGState {
        let num = |key: &[u8]| {
            dict.get(key)
                .ok()
                .and_then(|o| self.resolve(o).ok())
                .and_then(number_of)
        };
        let dash = dict
            .get(b"D")
            .ok()
            .and_then(|o| self.resolve(o).ok())
            .and_then(|o| o.as_array().ok())
            .and_then(|d| match d.as_slice() {
                [Object::Array(pattern), phase] => Some((
                    pattern.iter().filter_map(number_of).collect(),
                    number_of(phase).unwrap_or(0.0),
                )),
                _ => None,
            });
        ExtGState {
            linewidth: num(b"LW"),
            linecap: num(b"LC").map(|v| v as i32),
            linejoin: num(b"LJ").map(|v| v as i32),
            miterlimit: num(b"ML"),
            dash,
            intent: dict.get(b"RI").ok().and_then(name_of),
            flatness: num(b"FL"),
        }
    }

    fn load_font(&self, dict: &Dictionary) -> Arc<dyn PDFFont> {
        let basefont = dict.get(b"BaseFont").ok().and_then(name_of);
        let subtype = dict.get(b"Subtype").ok().and_then(name_of).unwrap_or_default();

        let mut font = if subtype == "Type0" {
            self.load_composite_font(basefont.as_deref(), dict)
        } else {
            self.load_simple_font(basefont.as_deref(), &subtype, dict)
        };

        if let Some(stream) = dict
            .get(b"ToUnicode")
            .ok()
            .and_then(|o| self.resolve(o).ok())
            .and_then(|o| o.as_stream().ok())
        {
            match stream_bytes(stream) {
                Ok(data) => font = font.with_unicode_map(ToUnicodeMap::parse(&data)),
                Err(err) => tracing::debug!(error = %err, "unreadable ToUnicode stream"),
            }
        }
        Arc::new(font)
    }

    fn load_simple_font(&self, basefont: Option<&str>, subtype: &str, dict: &Dictionary) -> SimpleFont {
        let mut font = SimpleFont::new(basefont);
        let descriptor = dict
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| self.resolve_dict(o));

        let widths: Option<Vec<f64>> = dict
            .get(b"Widths")
            .ok()
            .and_then(|o| self.resolve(o).ok())
            .and_then(|o| o.as_array().ok())
            .map(|arr| arr.iter().filter_map(|w| self.resolve(w).ok().and_then(number_of)).collect());

        // Type3 widths are in glyph space; scale them to 1/1000 text space.
        let scale = if subtype == "Type3" {
            dict.get(b"FontMatrix")
                .ok()
                .and_then(|o| self.resolve(o).ok())
                .and_then(matrix_of)
                .map_or(1.0, |m| m.0 * 1000.0)
        } else {
            1.0
        };

        match widths {
            Some(widths) => {
                let first_char = dict
                    .get(b"FirstChar")
                    .ok()
                    .and_then(number_of)
                    .map_or(0, |c| c as u32);
                let scaled: Vec<f64> = widths.iter().map(|w| w * scale).collect();
                font = font.with_widths(first_char, &scaled);
                let missing = descriptor
                    .and_then(|d| d.get(b"MissingWidth").ok())
                    .and_then(number_of)
                    .unwrap_or(0.0);
                font = font.with_default_width(missing);
            }
            None => font = font.with_default_width(FALLBACK_WIDTH),
        }

        if let Some(descent) = descriptor
            .and_then(|d| d.get(b"Descent").ok())
            .and_then(number_of)
        {
            font = font.with_descent(descent);
        }
        font
    }

    fn load_composite_font(&self, basefont: Option<&str>, dict: &Dictionary) -> SimpleFont {
        let encoding = dict.get(b"Encoding").ok().and_then(name_of).unwrap_or_default();
        let vertical = encoding.ends_with("-V");
        let mut font = SimpleFont::new(basefont).multibyte(vertical);

        let Some(cidfont) = dict
            .get(b"DescendantFonts")
            .ok()
            .and_then(|o| self.resolve(o).ok())
            .and_then(|o| o.as_array().ok())
            .and_then(|arr| arr.first())
            .and_then(|o| self.resolve_dict(o))
        else {
            return font.with_default_width(1000.0);
        };

        let num = |key: &[u8]| cidfont.get(key).ok().and_then(|o| self.resolve(o).ok()).and_then(number_of);
        font = font.with_default_width(num(b"DW").unwrap_or(1000.0));

        if let Some(w) = self.number_array(cidfont, b"W") {
            for (cid, width) in expand_cid_widths(&w, 1) {
                font = font.with_width(cid, width[0]);
            }
        }

        if vertical {
            if let Some(dw2) = self.number_array(cidfont, b"DW2")
                && let [WidthEntry::Number(vy), WidthEntry::Number(w1y)] = dw2.as_slice()
            {
                font = font.with_vertical_default(*vy, *w1y);
            }
            if let Some(w2) = self.number_array(cidfont, b"W2") {
                for (cid, m) in expand_cid_widths(&w2, 3) {
                    font = font.with_vertical_metrics(cid, m[0], m[1], m[2]);
                }
            }
        }

        if let Some(descent) = cidfont
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| self.resolve_dict(o))
            .and_then(|d| d.get(b"Descent").ok())
            .and_then(number_of)
        {
            font = font.with_descent(descent);
        }
        font
    }

    /// Flatten a W/W2-style array into numbers and nested number lists.
    fn number_array(&self, dict: &Dictionary, key: &[u8]) -> Option<Vec<WidthEntry>> {
        let arr = dict
            .get(key)
            .ok()
            .and_then(|o| self.resolve(o).ok())
            .and_then(|o| o.as_array().ok())?;
        Some(
            arr.iter()
                .filter_map(|o| match self.resolve(o).ok()? {
                    Object::Array(inner) => Some(WidthEntry::List(
                        inner.iter().filter_map(number_of).collect(),
                    )),
                    other => number_of(other).map(WidthEntry::Number),
                })
                .collect(),
        )
    }
}

impl DocumentSource for LopdfDocument {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page(&self, index: usize) -> Result<PageDescriptor> {
        let page_id = *self.page_ids.get(index).ok_or(PdfError::PageOutOfRange {
            index,
            count: self.page_ids.len(),
        })?;
        let page = self
            .inner
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(|_| PdfError::ObjectNotFound(page_id.0, page_id.1))?;

        let mediabox = self
            .inherited(page_id, b"MediaBox")?
            .and_then(rect_of)
            .unwrap_or(DEFAULT_MEDIABOX);
        let rotate = self
            .inherited(page_id, b"Rotate")?
            .and_then(|o| o.as_i64().ok())
            .map_or(0, |r| r as i32);
        let mut visiting = Vec::new();
        let resources = match self.inherited(page_id, b"Resources")? {
            Some(Object::Dictionary(dict)) => self.load_resources(dict, &mut visiting),
            _ => Resources::new(),
        };
        let operations = self.page_contents(page)?;

        Ok(PageDescriptor::new(mediabox, rotate, operations).with_resources(resources))
    }
}

/// Tokenize a decoded content stream into operations.
pub fn parse_content(data: &[u8]) -> Result<Vec<Operation>> {
    let content = lopdf::content::Content::decode(data)?;
    Ok(content.operations.iter().map(convert_operation).collect())
}

fn convert_operation(op: &lopdf::content::Operation) -> Operation {
    if op.operator == "BI" {
        // Inline image parsed as a stream object.
        if let Some(Object::Stream(stream)) = op.operands.iter().find(|o| matches!(o, Object::Stream(_))) {
            let dict = stream
                .dict
                .iter()
                .map(|(k, v)| (String::from_utf8_lossy(k).into_owned(), convert_object(v)))
                .collect();
            return Operation::inline_image(dict, stream.content.clone());
        }
    }
    Operation::new(&op.operator, op.operands.iter().map(convert_object).collect())
}

fn convert_object(obj: &Object) -> Operand {
    match obj {
        Object::Null => Operand::Null,
        Object::Boolean(b) => Operand::Bool(*b),
        Object::Integer(n) => Operand::Int(*n),
        Object::Real(n) => Operand::Real(*n as f64),
        Object::Name(name) => Operand::Name(String::from_utf8_lossy(name).into_owned()),
        Object::String(data, _) => Operand::String(data.clone()),
        Object::Array(items) => Operand::Array(items.iter().map(convert_object).collect()),
        Object::Dictionary(dict) => Operand::Dict(
            dict.iter()
                .map(|(k, v)| (String::from_utf8_lossy(k).into_owned(), convert_object(v)))
                .collect::<BTreeMap<_, _>>(),
        ),
        Object::Stream(stream) => Operand::String(stream.content.clone()),
        Object::Reference(_) => Operand::Null,
    }
}

fn stream_bytes(stream: &Stream) -> Result<Vec<u8>> {
    if stream.dict.get(b"Filter").is_ok() {
        Ok(stream.decompressed_content()?)
    } else {
        Ok(stream.content.clone())
    }
}

fn number_of(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(n) => Some(*n as f64),
        Object::Real(n) => Some(*n as f64),
        _ => None,
    }
}

fn name_of(obj: &Object) -> Option<String> {
    obj.as_name()
        .ok()
        .map(|n| String::from_utf8_lossy(n).into_owned())
}

/// Names in a Name or an array (other entries are dropped).
fn names_of(obj: &Object) -> Vec<String> {
    match obj {
        Object::Array(items) => items.iter().filter_map(name_of).collect(),
        other => name_of(other).into_iter().collect(),
    }
}

fn rect_of(obj: &Object) -> Option<Rect> {
    match obj.as_array().ok()?.as_slice() {
        [x0, y0, x1, y1] => Some((
            number_of(x0)?,
            number_of(y0)?,
            number_of(x1)?,
            number_of(y1)?,
        )),
        _ => None,
    }
}

fn matrix_of(obj: &Object) -> Option<Matrix> {
    match obj.as_array().ok()?.as_slice() {
        [a, b, c, d, e, f] => Some((
            number_of(a)?,
            number_of(b)?,
            number_of(c)?,
            number_of(d)?,
            number_of(e)?,
            number_of(f)?,
        )),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
enum WidthEntry {
    Number(f64),
    List(Vec<f64>),
}

/// Expand CID width arrays: `c [v...]` assigns consecutive groups of
/// `group` values from `c`; `c_first c_last v...` assigns one group to the
/// whole range. Codes past [`MAX_CID`] are dropped.
fn expand_cid_widths(entries: &[WidthEntry], group: usize) -> Vec<(u32, Vec<f64>)> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < entries.len() {
        match (&entries[i], entries.get(i + 1)) {
            (WidthEntry::Number(first), Some(WidthEntry::List(values))) => {
                if let Some(first) = cid_of(*first) {
                    let cids = (first..=MAX_CID).zip(values.chunks_exact(group));
                    out.extend(cids.map(|(cid, chunk)| (cid, chunk.to_vec())));
                }
                i += 2;
            }
            (WidthEntry::Number(first), Some(WidthEntry::Number(last))) => {
                let values: Vec<f64> = entries[i + 2..]
                    .iter()
                    .take(group)
                    .map_while(|e| match e {
                        WidthEntry::Number(v) => Some(*v),
                        WidthEntry::List(_) => None,
                    })
                    .collect();
                if values.len() == group
                    && let (Some(first), Some(last)) =
                        (cid_of(*first), cid_of(last.min(f64::from(MAX_CID))))
                {
                    out.extend((first..=last).map(|cid| (cid, values.clone())));
                }
                i += 2 + values.len();
            }
            _ => i += 1,
        }
    }
    out
}

fn cid_of(code: f64) -> Option<u32> {
    (code >= 0.0 && code <= f64::from(MAX_CID)).then_some(code as u32)
}
