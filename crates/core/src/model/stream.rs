//! Raw image data referenced by image nodes.

use bytes::Bytes;

/// An image XObject or inline image, with its dictionary attributes resolved.
///
/// `data` is the stream body exactly as stored (still encoded by `filters`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageStream {
    /// Pixel width (/Width)
    pub width: u32,
    /// Pixel height (/Height)
    pub height: u32,
    /// Bits per component (/BitsPerComponent)
    pub bits: u32,
    /// Colour space name(s), e.g. `["DeviceRGB"]` or `["ICCBased"]`
    pub colorspace: Vec<String>,
    /// Filter names in application order, e.g. `["FlateDecode"]`
    pub filters: Vec<String>,
    pub imagemask: bool,
    pub data: Bytes,
}

impl ImageStream {
    pub fn new(width: u32, height: u32, data: impl Into<Bytes>) -> Self {
        Self {
            width,
            height,
            bits: 8,
            colorspace: Vec::new(),
            filters: Vec::new(),
            imagemask: false,
            data: data.into(),
        }
    }

    pub fn with_colorspace(mut self, name: &str) -> Self {
        self.colorspace = vec![name.to_string()];
        self
    }

    pub fn with_filter(mut self, name: &str) -> Self {
        self.filters.push(name.to_string());
        self
    }

    pub fn with_bits(mut self, bits: u32) -> Self {
        self.bits = bits;
        self
    }

    /// The outermost filter, which decides the exported file type.
    pub fn last_filter(&self) -> Option<&str> {
        self.filters.last().map(String::as_str)
    }
}
