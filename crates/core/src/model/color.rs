//! Colour space names tracked by the graphics state.

use std::collections::HashMap;
use std::sync::LazyLock;

/// A named colour space and the number of operands its colour operators take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PDFColorSpace {
    pub name: String,
    pub ncomponents: usize,
}

impl PDFColorSpace {
    pub fn new(name: &str, ncomponents: usize) -> Self {
        Self {
            name: name.to_string(),
            ncomponents,
        }
    }

    /// Looks up a predefined colour space, falling back to a one-component
    /// space carrying the given name (resource-defined spaces such as `/CS0`).
    pub fn lookup(name: &str) -> Self {
        PREDEFINED_COLORSPACE
            .get(name)
            .cloned()
            .unwrap_or_else(|| Self::new(name, 1))
    }

    pub fn device_gray() -> Self {
        Self::new("DeviceGray", 1)
    }
}

impl Default for PDFColorSpace {
    fn default() -> Self {
        Self::device_gray()
    }
}

/// Predefined colour spaces. DeviceGray is the initial space of every state.
pub static PREDEFINED_COLORSPACE: LazyLock<HashMap<&'static str, PDFColorSpace>> =
    LazyLock::new(|| {
        let entries = [
            ("DeviceGray", 1),
            ("CalRGB", 3),
            ("CalGray", 1),
            ("Lab", 3),
            ("DeviceRGB", 3),
            ("DeviceCMYK", 4),
            ("Separation", 1),
            ("Indexed", 1),
            ("Pattern", 1),
        ];

        let mut map = HashMap::with_capacity(entries.len());
        for (name, n) in entries {
            map.insert(name, PDFColorSpace::new(name, n));
        }
        map
    });

/// Inline image colour space abbreviations.
pub static INLINE_COLORSPACE_ABBREV: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        HashMap::from([
            ("G", "DeviceGray"),
            ("RGB", "DeviceRGB"),
            ("CMYK", "DeviceCMYK"),
            ("I", "Indexed"),
        ])
    });
