//! High-level conversion API.
//!
//! - `extract_pages()` - Layout trees for the selected pages
//! - `convert_to_xml()` - XML for the selected pages, written to a writer
//! - `convert_to_xml_with()` - Same, with a caller-built converter and a
//!   per-page callback that sees each page's buffers
//! - `convert_pdf_bytes()` - XML straight from PDF bytes

use std::io::Write;

use serde::Deserialize;

use crate::converter::{PDFLayoutBuilder, PDFPageAggregator, PageBuffers, PageSink, XMLConverter};
use crate::document::{DocumentSource, LopdfDocument};
use crate::error::Result;
use crate::interp::PDFPageInterpreter;
use crate::layout::{LAParams, LTPage, PageAnalyzer};

/// Options for conversion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Output encoding label.
    pub codec: String,

    /// Remove control characters from text content.
    pub strip_control: bool,

    /// Maximum number of pages to convert. 0 means no limit.
    pub maxpages: usize,

    /// Zero-indexed page numbers to convert. None means all pages.
    pub page_numbers: Option<Vec<usize>>,

    /// Parameters handed to a page analyzer, when one is supplied.
    pub laparams: Option<LAParams>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            codec: "utf-8".to_string(),
            strip_control: false,
            maxpages: 0,
            page_numbers: None,
            laparams: None,
        }
    }
}

impl ConvertOptions {
    /// Zero-based indices of the pages to process, in document order.
    pub fn selected_pages(&self, page_count: usize) -> Vec<usize> {
        let selected = (0..page_count).filter(|idx| {
            self.page_numbers
                .as_ref()
                .is_none_or(|nums| nums.contains(idx))
        });
        if self.maxpages > 0 {
            selected.take(self.maxpages).collect()
        } else {
            selected.collect()
        }
    }
}

/// Interpret the selected pages into `builder`, calling `after_page` with
/// the sink once each page has been delivered.
fn process_pages<S, F>(
    doc: &dyn DocumentSource,
    options: &ConvertOptions,
    builder: &mut PDFLayoutBuilder<S>,
    mut after_page: F,
) -> Result<()>
where
    S: PageSink,
    F: FnMut(u32, &S) -> Result<()>,
{
    for page_idx in options.selected_pages(doc.page_count()) {
        let page = doc.page(page_idx)?;
        let pageid = builder.pageno();
        tracing::debug!(page_idx, pageid, ops = page.operations.len(), "processing page");
        PDFPageInterpreter::new(builder).process_page(&page)?;
        after_page(pageid, builder.sink())?;
    }
    Ok(())
}

/// Layout trees for the selected pages.
pub fn extract_pages(doc: &dyn DocumentSource, options: &ConvertOptions) -> Result<Vec<LTPage>> {
    let mut builder = PDFLayoutBuilder::new(PDFPageAggregator::new());
    process_pages(doc, options, &mut builder, |_, _| Ok(()))?;
    Ok(builder.into_sink().into_pages())
}

/// Layout trees for the selected pages, each passed through `analyzer`
/// with the options' layout parameters (or the defaults).
pub fn extract_pages_analyzed(
    doc: &dyn DocumentSource,
    options: &ConvertOptions,
    analyzer: Box<dyn PageAnalyzer>,
) -> Result<Vec<LTPage>> {
    let laparams = options.laparams.clone().unwrap_or_default();
    laparams.validate()?;
    let mut builder =
        PDFLayoutBuilder::new(PDFPageAggregator::new()).with_analyzer(analyzer, laparams);
    process_pages(doc, options, &mut builder, |_, _| Ok(()))?;
    Ok(builder.into_sink().into_pages())
}

/// Write the selected pages as XML to `writer` and return it.
pub fn convert_to_xml<W: Write>(
    doc: &dyn DocumentSource,
    writer: W,
    options: &ConvertOptions,
) -> Result<W> {
    let converter =
        XMLConverter::new(writer, &options.codec)?.with_strip_control(options.strip_control);
    convert_to_xml_with(doc, converter, options, |_, _| Ok(()))
}

/// Drive `converter` over the selected pages and finish it.
///
/// `on_page` receives the page id and that page's buffers after the page
/// is written and before the next one starts.
pub fn convert_to_xml_with<W, F>(
    doc: &dyn DocumentSource,
    converter: XMLConverter<W>,
    options: &ConvertOptions,
    mut on_page: F,
) -> Result<W>
where
    W: Write,
    F: FnMut(u32, &PageBuffers) -> Result<()>,
{
    let mut builder = PDFLayoutBuilder::new(converter);
    process_pages(doc, options, &mut builder, |pageid, converter| {
        let buffers = converter.buffers();
        tracing::debug!(pageid, summary = %buffers.summary(), "page summary");
        on_page(pageid, buffers)
    })?;
    builder.into_sink().finish()
}

/// Parse `pdf_data` and write its pages as XML to `writer`.
pub fn convert_pdf_bytes<W: Write>(
    pdf_data: &[u8],
    writer: W,
    options: &ConvertOptions,
) -> Result<W> {
    let doc = LopdfDocument::from_bytes(pdf_data)?;
    tracing::info!(pages = doc.page_count(), "document loaded");
    convert_to_xml(&doc, writer, options)
}
