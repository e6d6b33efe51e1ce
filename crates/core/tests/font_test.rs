//! Tests for font metrics and Unicode mapping as seen through text rendering.

use std::sync::Arc;

use contour_core::converter::{PDFLayoutBuilder, PDFPageAggregator};
use contour_core::document::{PageDescriptor, Resources};
use contour_core::font::{PDFFont, SimpleFont, ToUnicodeMap};
use contour_core::interp::{Operand, Operation, PDFPageInterpreter};
use contour_core::layout::{LTChar, LTItem};
use contour_core::utils::HasBBox;

const CMAP: &[u8] = b"/CIDInit /ProcSet findresource begin
begincmap
2 beginbfchar
<0001> <7E26>
<0002> <66F8>
endbfchar
1 beginbfrange
<0010> <0012> <0041>
endbfrange
endcmap";

fn render_chars(font: Arc<dyn PDFFont>, string: &[u8]) -> Vec<LTChar> {
    let page = PageDescriptor::new(
        (0.0, 0.0, 612.0, 792.0),
        0,
        vec![
            Operation::bare("BT"),
            Operation::new("Tf", vec![Operand::name("F1"), Operand::from(10.0)]),
            Operation::new("Td", vec![Operand::from(100.0), Operand::from(700.0)]),
            Operation::new("Tj", vec![Operand::string(string)]),
            Operation::bare("ET"),
        ],
    )
    .with_resources(Resources::new().with_font("F1", font));

    let mut builder = PDFLayoutBuilder::new(PDFPageAggregator::new());
    PDFPageInterpreter::new(&mut builder)
        .process_page(&page)
        .unwrap();
    let pages = builder.into_sink().into_pages();
    pages[0]
        .iter()
        .filter_map(|item| match item {
            LTItem::Char(c) => Some(c.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn identity_font_maps_through_tounicode() {
    let unicode = ToUnicodeMap::parse(CMAP);
    assert_eq!(unicode.len(), 5);
    let font = SimpleFont::new(Some("KozMin"))
        .multibyte(false)
        .with_default_width(1000.0)
        .with_unicode_map(unicode);
    let chars = render_chars(Arc::new(font), &[0x00, 0x01, 0x00, 0x12, 0x00, 0x05]);
    let texts: Vec<&str> = chars.iter().map(LTChar::get_text).collect();
    assert_eq!(texts, ["縦", "C", "(cid:5)"]);
    let x0s: Vec<f64> = chars.iter().map(|c| c.x0()).collect();
    assert_eq!(x0s, vec![100.0, 110.0, 120.0]);
}

#[test]
fn vertical_font_advances_downward() {
    let font = SimpleFont::new(None)
        .multibyte(true)
        .with_unicode(1, "縦")
        .with_unicode(2, "書");
    let chars = render_chars(Arc::new(font), &[0x00, 0x01, 0x00, 0x02]);
    assert_eq!(chars.len(), 2);
    for c in &chars {
        assert_eq!((c.x0(), c.x1()), (95.0, 105.0));
        assert!((c.size() - 10.0).abs() < 1e-9);
    }
    let drop = chars[0].y1() - chars[1].y1();
    assert!((drop - 10.0).abs() < 1e-9);
}

#[test]
fn single_byte_font_falls_back_to_windows_1252() {
    let font = SimpleFont::new(Some("Times")).with_default_width(500.0);
    let chars = render_chars(Arc::new(font), &[0x41, 0x80, 0x07]);
    let texts: Vec<&str> = chars.iter().map(LTChar::get_text).collect();
    assert_eq!(texts, ["A", "\u{20ac}", "(cid:7)"]);
}
