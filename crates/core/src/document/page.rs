//! Page descriptors and their resources.

use std::collections::HashMap;
use std::sync::Arc;

use crate::font::PDFFont;
use crate::interp::Operation;
use crate::model::ImageStream;
use crate::utils::{MATRIX_IDENTITY, Matrix, Rect};

/// Default page size (US Letter) used when a page has no usable MediaBox.
pub const DEFAULT_MEDIABOX: Rect = (0.0, 0.0, 612.0, 792.0);

/// Everything needed to interpret one page.
#[derive(Debug, Clone)]
pub struct PageDescriptor {
    /// Media box in default user space (x0, y0, x1, y1)
    pub mediabox: Rect,
    /// Rotation in degrees, normalized to 0, 90, 180 or 270
    pub rotate: i32,
    pub operations: Vec<Operation>,
    pub resources: Arc<Resources>,
}

impl PageDescriptor {
    pub fn new(mediabox: Rect, rotate: i32, operations: Vec<Operation>) -> Self {
        Self {
            mediabox,
            rotate: normalize_rotation(rotate),
            operations,
            resources: Arc::new(Resources::default()),
        }
    }

    pub fn with_resources(mut self, resources: Resources) -> Self {
        self.resources = Arc::new(resources);
        self
    }
}

/// Map any multiple of 90 into `0..360`; other values become 0.
pub fn normalize_rotation(rotate: i32) -> i32 {
    let r = rotate.rem_euclid(360);
    if r % 90 == 0 { r } else { 0 }
}

/// Named resources available to a content stream.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    pub fonts: HashMap<String, Arc<dyn PDFFont>>,
    pub xobjects: HashMap<String, Arc<XObject>>,
    pub ext_gstates: HashMap<String, ExtGState>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(mut self, name: &str, font: Arc<dyn PDFFont>) -> Self {
        self.fonts.insert(name.to_string(), font);
        self
    }

    pub fn with_xobject(mut self, name: &str, xobject: XObject) -> Self {
        self.xobjects.insert(name.to_string(), Arc::new(xobject));
        self
    }

    pub fn with_ext_gstate(mut self, name: &str, gstate: ExtGState) -> Self {
        self.ext_gstates.insert(name.to_string(), gstate);
        self
    }

    pub fn font(&self, name: &str) -> Option<&Arc<dyn PDFFont>> {
        self.fonts.get(name)
    }

    pub fn xobject(&self, name: &str) -> Option<&Arc<XObject>> {
        self.xobjects.get(name)
    }
}

/// External object invoked by `Do`.
#[derive(Debug, Clone)]
pub enum XObject {
    Form(FormXObject),
    Image(ImageStream),
}

/// Form XObject: a reusable content stream with its own space.
#[derive(Debug, Clone)]
pub struct FormXObject {
    /// BBox in form space (x0, y0, x1, y1)
    pub bbox: Rect,
    pub matrix: Matrix,
    pub operations: Vec<Operation>,
    /// Own resources; the invoking stream's resources apply when absent
    pub resources: Option<Arc<Resources>>,
}

impl FormXObject {
    pub fn new(bbox: Rect, operations: Vec<Operation>) -> Self {
        Self {
            bbox,
            matrix: MATRIX_IDENTITY,
            operations,
            resources: None,
        }
    }

    pub fn with_matrix(mut self, matrix: Matrix) -> Self {
        self.matrix = matrix;
        self
    }

    pub fn with_resources(mut self, resources: Resources) -> Self {
        self.resources = Some(Arc::new(resources));
        self
    }
}

/// Graphics state parameters applied by `gs`. Absent entries leave the
/// current state untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtGState {
    pub linewidth: Option<f64>,
    pub linecap: Option<i32>,
    pub linejoin: Option<i32>,
    pub miterlimit: Option<f64>,
    pub dash: Option<(Vec<f64>, f64)>,
    pub intent: Option<String>,
    pub flatness: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_is_normalized() {
        assert_eq!(normalize_rotation(-90), 270);
        assert_eq!(normalize_rotation(450), 90);
        assert_eq!(normalize_rotation(45), 0);
        assert_eq!(PageDescriptor::new(DEFAULT_MEDIABOX, 540, vec![]).rotate, 180);
    }

    #[test]
    fn resources_lookup() {
        let res = Resources::new().with_xobject(
            "Fm0",
            XObject::Form(FormXObject::new((0.0, 0.0, 10.0, 10.0), vec![])),
        );
        assert!(matches!(res.xobject("Fm0").map(|x| &**x), Some(XObject::Form(_))));
        assert!(res.xobject("Im0").is_none());
        assert!(res.font("F1").is_none());
    }
}
