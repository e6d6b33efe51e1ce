//! Page sources.
//!
//! - `page`: page descriptors, resources and XObjects
//! - `backend`: descriptors read from PDF bytes with lopdf

pub mod backend;
pub mod page;

pub use backend::{LopdfDocument, parse_content};
pub use page::{
    DEFAULT_MEDIABOX, ExtGState, FormXObject, PageDescriptor, Resources, XObject,
    normalize_rotation,
};

use crate::error::{PdfError, Result};

/// Ordered source of page descriptors.
pub trait DocumentSource {
    fn page_count(&self) -> usize;

    /// Descriptor of the page at 0-based `index`.
    fn page(&self, index: usize) -> Result<PageDescriptor>;
}

/// Document assembled in memory from ready-made descriptors.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    pages: Vec<PageDescriptor>,
}

impl MemoryDocument {
    pub fn new(pages: Vec<PageDescriptor>) -> Self {
        Self { pages }
    }

    pub fn push(&mut self, page: PageDescriptor) {
        self.pages.push(page);
    }
}

impl DocumentSource for MemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<PageDescriptor> {
        self.pages
            .get(index)
            .cloned()
            .ok_or(PdfError::PageOutOfRange {
                index,
                count: self.pages.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_document_bounds() {
        let doc = MemoryDocument::new(vec![PageDescriptor::new(DEFAULT_MEDIABOX, 0, vec![])]);
        assert_eq!(doc.page_count(), 1);
        assert!(doc.page(0).is_ok());
        assert!(matches!(
            doc.page(1),
            Err(PdfError::PageOutOfRange { index: 1, count: 1 })
        ));
    }
}
