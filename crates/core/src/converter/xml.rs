//! XML Converter - writes layout trees as nested markup.

use std::fmt;
use std::io::Write;
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

use crate::error::{PdfError, Result};
use crate::image::ImageExporter;
use crate::layout::{LTChar, LTItem, LTPage, LTRect, LTTextGroup, TextGroupElement, TextLineElement};
use crate::utils::{HasBBox, bbox2str, enc};

use super::base::PageSink;

static CONTROL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x00-\x08\x0b-\x0c\x0e-\x1f]").unwrap()
});

/// Characters and rectangles collected from the most recent page.
///
/// These are held back from the running output and replaced at the start
/// of every page.
#[derive(Debug, Clone, Default)]
pub struct PageBuffers {
    pub chars: Vec<LTChar>,
    pub rects: Vec<LTRect>,
}

impl PageBuffers {
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty() && self.rects.is_empty()
    }

    /// Decoded text of the buffered characters, in rendering order.
    pub fn text(&self) -> String {
        self.chars.iter().map(LTChar::get_text).collect()
    }

    pub fn summary(&self) -> PageSummary {
        PageSummary {
            char_count: self.chars.len(),
            rects: self
                .rects
                .iter()
                .map(|r| {
                    let (x0, y0, x1, y1) = r.bbox();
                    (x0, y0, x1 - x0, y1 - y0)
                })
                .collect(),
        }
    }
}

/// Aggregate statistics for one page.
///
/// Rectangles are reported as origin plus extent: `(x, y, width, height)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSummary {
    pub char_count: usize,
    pub rects: Vec<(f64, f64, f64, f64)>,
}

impl fmt::Display for PageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "number of ltchars {}", self.char_count)?;
        for (x, y, w, h) in &self.rects {
            write!(f, "\n{:.3},{:.3} {:.3},{:.3}", x, y, w, h)?;
        }
        Ok(())
    }
}

/// XML Converter - outputs one `<page>` element per received page.
///
/// The declaration and the opening `<pages>` are written by [`XMLConverter::new`];
/// the closing `</pages>` is written by [`XMLConverter::finish`], which
/// consumes the converter.
#[must_use = "call finish() to write the closing </pages> element"]
pub struct XMLConverter<W: Write> {
    outfp: W,
    encoding: &'static Encoding,
    stripcontrol: bool,
    imagewriter: Option<Box<dyn ImageExporter>>,
    buffers: PageBuffers,
}

impl<W: Write> XMLConverter<W> {
    /// Create a converter and write the document header.
    ///
    /// `codec` is an encoding label such as `utf-8` or `iso-8859-1`.
    pub fn new(outfp: W, codec: &str) -> Result<Self> {
        let encoding = Encoding::for_label(codec.as_bytes())
            .ok_or_else(|| PdfError::UnknownEncoding(codec.to_string()))?;
        // UTF-16 labels encode as UTF-8; declare what is actually written.
        let declared = if encoding.output_encoding() == encoding {
            codec.to_string()
        } else {
            encoding.output_encoding().name().to_string()
        };
        let mut converter = Self {
            outfp,
            encoding: encoding.output_encoding(),
            stripcontrol: false,
            imagewriter: None,
            buffers: PageBuffers::default(),
        };
        converter.write(&format!(
            "<?xml version=\"1.0\" encoding=\"{}\" ?>\n",
            declared
        ))?;
        converter.write("<pages>\n")?;
        Ok(converter)
    }

    /// Remove C0 control characters (except tab, newline and carriage
    /// return) from text content.
    pub fn with_strip_control(mut self, stripcontrol: bool) -> Self {
        self.stripcontrol = stripcontrol;
        self
    }

    pub fn set_image_writer(&mut self, imagewriter: Box<dyn ImageExporter>) {
        self.imagewriter = Some(imagewriter);
    }

    /// Buffers of the last page received.
    pub fn buffers(&self) -> &PageBuffers {
        &self.buffers
    }

    /// Write the footer, flush, and hand back the writer.
    pub fn finish(mut self) -> Result<W> {
        self.write("</pages>\n")?;
        self.outfp.flush()?;
        Ok(self.outfp)
    }

    fn write(&mut self, text: &str) -> Result<()> {
        if self.encoding == UTF_8 {
            self.outfp.write_all(text.as_bytes())?;
        } else {
            let (bytes, _, _) = self.encoding.encode(text);
            self.outfp.write_all(&bytes)?;
        }
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        let text = if self.stripcontrol {
            CONTROL_RE.replace_all(text, "")
        } else {
            text.into()
        };
        let escaped = enc(&text).into_owned();
        self.write(&escaped)
    }

    fn show_group(&mut self, group: &LTTextGroup) -> Result<()> {
        self.write(&format!("<textgroup bbox=\"{}\">\n", bbox2str(group.bbox())))?;
        for elem in group.iter() {
            match elem {
                TextGroupElement::Box(tb) => {
                    self.write(&format!(
                        "<textbox id=\"{}\" bbox=\"{}\" />\n",
                        tb.index(),
                        bbox2str(tb.bbox())
                    ))?;
                }
                TextGroupElement::Group(g) => self.show_group(g)?,
            }
        }
        self.write("</textgroup>\n")
    }

    fn render_textline_element(&mut self, elem: &TextLineElement) -> Result<()> {
        match elem {
            TextLineElement::Char(c) => {
                self.buffers.chars.push(c.clone());
                Ok(())
            }
            TextLineElement::Anno(a) => {
                self.write("<text>")?;
                self.write_text(a.get_text())?;
                self.write("</text>\n")
            }
        }
    }

    fn render_item(&mut self, item: &LTItem) -> Result<()> {
        match item {
            LTItem::Char(c) => self.buffers.chars.push(c.clone()),
            LTItem::Rect(r) => self.buffers.rects.push(r.clone()),
            LTItem::Line(l) => {
                self.write(&format!(
                    "<line linewidth=\"{}\" bbox=\"{}\" />\n",
                    l.linewidth as i32,
                    bbox2str(l.bbox())
                ))?;
            }
            LTItem::Curve(c) => {
                self.write(&format!(
                    "<curve linewidth=\"{}\" bbox=\"{}\" pts=\"{}\"/>\n",
                    c.linewidth as i32,
                    bbox2str(c.bbox()),
                    c.get_pts()
                ))?;
            }
            LTItem::Figure(fig) => {
                self.write(&format!(
                    "<figure name=\"{}\" bbox=\"{}\">\n",
                    enc(&fig.name),
                    bbox2str(fig.bbox())
                ))?;
                for child in fig.iter() {
                    self.render_item(child)?;
                }
                self.write("</figure>\n")?;
            }
            LTItem::TextLine(tl) => {
                self.write(&format!("<textline bbox=\"{}\">\n", bbox2str(tl.bbox())))?;
                for elem in tl.iter() {
                    self.render_textline_element(elem)?;
                }
                self.write("</textline>\n")?;
            }
            LTItem::TextBox(tb) => {
                let wmode = if tb.is_vertical() {
                    " wmode=\"vertical\""
                } else {
                    ""
                };
                self.write(&format!(
                    "<textbox id=\"{}\" bbox=\"{}\"{}>\n",
                    tb.index(),
                    bbox2str(tb.bbox()),
                    wmode
                ))?;
                for line in tb.iter() {
                    self.write(&format!("<textline bbox=\"{}\">\n", bbox2str(line.bbox())))?;
                    for elem in line.iter() {
                        self.render_textline_element(elem)?;
                    }
                    self.write("</textline>\n")?;
                }
                self.write("</textbox>\n")?;
            }
            LTItem::Image(img) => {
                let src = match self.imagewriter.as_mut() {
                    Some(writer) => format!("src=\"{}\" ", enc(&writer.export_image(img)?)),
                    None => String::new(),
                };
                self.write(&format!(
                    "<image {}width=\"{}\" height=\"{}\" />\n",
                    src,
                    img.src_width(),
                    img.src_height()
                ))?;
            }
        }
        Ok(())
    }

    /// Render a layout page.
    pub fn receive_layout(&mut self, ltpage: &LTPage) -> Result<()> {
        self.buffers = PageBuffers::default();
        self.write(&format!(
            "<page id=\"{}\" bbox=\"{}\" rotate=\"{}\">\n",
            ltpage.pageid,
            bbox2str(ltpage.bbox()),
            ltpage.rotate
        ))?;
        for item in ltpage.iter() {
            self.render_item(item)?;
        }
        if let Some(groups) = ltpage.groups() {
            self.write("<layout>\n")?;
            for group in groups {
                self.show_group(group)?;
            }
            self.write("</layout>\n")?;
        }
        self.write("</page>\n")
    }
}

impl<W: Write> PageSink for XMLConverter<W> {
    fn receive_page(&mut self, page: LTPage) -> Result<()> {
        self.receive_layout(&page)
    }
}
