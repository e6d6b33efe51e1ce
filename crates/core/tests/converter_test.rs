//! Tests for XML output: framing, escaping, buffering and the layout section.

use std::sync::Arc;

use contour_core::api::{ConvertOptions, convert_to_xml, convert_to_xml_with, extract_pages_analyzed};
use contour_core::converter::{PageBuffers, PageSink, XMLConverter};
use contour_core::document::{MemoryDocument, PageDescriptor, Resources, XObject};
use contour_core::font::{PDFFont, SimpleFont};
use contour_core::image::ImageWriter;
use contour_core::interp::{Operand, Operation};
use contour_core::layout::{
    LAParams, LTAnno, LTFigure, LTItem, LTPage, LTTextBox, LTTextGroup, LTTextLine,
    TextGroupElement,
};
use contour_core::model::ImageStream;
use contour_core::utils::{MATRIX_IDENTITY, enc};

fn op(operator: &str, operands: &[f64]) -> Operation {
    Operation::new(
        operator,
        operands.iter().map(|v| Operand::from(*v)).collect(),
    )
}

fn render(pages: Vec<LTPage>) -> String {
    let mut conv = XMLConverter::new(Vec::new(), "utf-8").unwrap();
    for page in pages {
        conv.receive_page(page).unwrap();
    }
    String::from_utf8(conv.finish().unwrap()).unwrap()
}

/// One page: a horizontal line, a 50x50 rectangle and the glyph "A".
fn scenario_document() -> MemoryDocument {
    let font: Arc<dyn PDFFont> = Arc::new(
        SimpleFont::new(Some("Helvetica"))
            .with_widths(65, &[667.0])
            .with_unicode(65, "A"),
    );
    let ops = vec![
        op("m", &[0.0, 0.0]),
        op("l", &[100.0, 0.0]),
        op("S", &[]),
        op("re", &[0.0, 0.0, 50.0, 50.0]),
        op("f", &[]),
        op("BT", &[]),
        Operation::new("Tf", vec![Operand::name("F1"), Operand::from(12.0)]),
        op("Td", &[72.0, 700.0]),
        Operation::new("Tj", vec![Operand::string([65u8])]),
        op("ET", &[]),
    ];
    MemoryDocument::new(vec![
        PageDescriptor::new((0.0, 0.0, 612.0, 792.0), 0, ops)
            .with_resources(Resources::new().with_font("F1", font)),
    ])
}

#[test]
fn escaping_replaces_markup_characters() {
    let escaped = enc("A & B <tag> \"q\"");
    assert_eq!(escaped, "A &amp; B &lt;tag&gt; &quot;q&quot;");
    let stripped = escaped
        .replace("&amp;", "")
        .replace("&lt;", "")
        .replace("&gt;", "")
        .replace("&quot;", "");
    assert!(!stripped.contains(['&', '<', '>', '"']));
}

#[test]
fn end_to_end_line_rect_and_glyph() {
    let doc = scenario_document();
    let mut seen: Vec<(u32, PageBuffers)> = Vec::new();
    let conv = XMLConverter::new(Vec::new(), "utf-8").unwrap();
    let out = convert_to_xml_with(&doc, conv, &ConvertOptions::default(), |pageid, buffers| {
        seen.push((pageid, buffers.clone()));
        Ok(())
    })
    .unwrap();
    let xml = String::from_utf8(out).unwrap();

    assert_eq!(
        xml,
        concat!(
            "<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n",
            "<pages>\n",
            "<page id=\"1\" bbox=\"0.000,0.000,612.000,792.000\" rotate=\"0\">\n",
            "<line linewidth=\"0\" bbox=\"0.000,0.000,100.000,0.000\" />\n",
            "</page>\n",
            "</pages>\n",
        )
    );

    assert_eq!(seen.len(), 1);
    let (pageid, buffers) = &seen[0];
    assert_eq!(*pageid, 1);
    assert_eq!(buffers.text(), "A");
    assert_eq!(buffers.rects.len(), 1);
    let summary = buffers.summary();
    assert_eq!(summary.char_count, 1);
    assert_eq!(summary.rects, vec![(0.0, 0.0, 50.0, 50.0)]);
    assert_eq!(
        summary.to_string(),
        "number of ltchars 1\n0.000,0.000 50.000,50.000"
    );
}

#[test]
fn footer_is_written_once_per_document() {
    let doc = scenario_document();
    let mut doc2 = doc.clone();
    doc2.push(PageDescriptor::new((0.0, 0.0, 10.0, 10.0), 0, Vec::new()));
    let xml = String::from_utf8(
        convert_to_xml(&doc2, Vec::new(), &ConvertOptions::default()).unwrap(),
    )
    .unwrap();
    assert_eq!(xml.matches("</pages>").count(), 1);
    assert_eq!(xml.matches("<pages>").count(), 1);
    assert!(xml.ends_with("</page>\n</pages>\n"));
    assert!(xml.contains("<page id=\"2\" bbox=\"0.000,0.000,10.000,10.000\" rotate=\"0\">"));
}

#[test]
fn buffers_reset_between_pages() {
    let mut conv = XMLConverter::new(Vec::new(), "utf-8").unwrap();
    let doc = scenario_document();
    let pages = contour_core::extract_pages(&doc, &ConvertOptions::default()).unwrap();
    conv.receive_page(pages[0].clone()).unwrap();
    assert_eq!(conv.buffers().chars.len(), 1);
    conv.receive_page(LTPage::new(2, (0.0, 0.0, 10.0, 10.0), 0)).unwrap();
    assert!(conv.buffers().is_empty());
    let _ = conv.finish().unwrap();
}

#[test]
fn figure_names_are_escaped() {
    let mut page = LTPage::new(1, (0.0, 0.0, 10.0, 10.0), 0);
    page.add(LTItem::Figure(Box::new(LTFigure::new(
        "a<b",
        (0.0, 0.0, 1.0, 1.0),
        MATRIX_IDENTITY,
    ))));
    let xml = render(vec![page]);
    assert!(xml.contains("<figure name=\"a&lt;b\" bbox=\"0.000,0.000,1.000,1.000\">\n</figure>\n"));
}

#[test]
fn text_boxes_and_groups_render_under_layout() {
    let analyzer = |page: &mut LTPage, _: &LAParams| {
        let mut line = LTTextLine::new(false);
        let chars: Vec<LTItem> = page.take_items();
        for item in chars {
            if let LTItem::Char(c) = item {
                line.add_char(c);
            }
        }
        line.add_anno(LTAnno::new("\n"));
        let mut tbox = LTTextBox::new(0, false);
        tbox.add(line);
        page.groups = Some(vec![LTTextGroup::new(vec![TextGroupElement::Box(
            tbox.clone(),
        )])]);
        page.set_items(vec![LTItem::TextBox(tbox)]);
    };
    let pages = extract_pages_analyzed(
        &scenario_document(),
        &ConvertOptions::default(),
        Box::new(analyzer),
    )
    .unwrap();

    let mut conv = XMLConverter::new(Vec::new(), "utf-8").unwrap();
    conv.receive_page(pages[0].clone()).unwrap();
    assert_eq!(conv.buffers().text(), "A");
    let xml = String::from_utf8(conv.finish().unwrap()).unwrap();

    let textbox = xml.find("<textbox id=\"0\" bbox=").unwrap();
    let textline = xml.find("<textline bbox=").unwrap();
    let anno = xml.find("<text>\n</text>\n").unwrap();
    let layout = xml.find("<layout>\n<textgroup bbox=").unwrap();
    assert!(textbox < textline && textline < anno && anno < layout);
    assert!(xml.contains("</textline>\n</textbox>\n<layout>"));
    assert!(xml.contains(" />\n</textgroup>\n</layout>\n</page>\n"));
    assert!(!xml.contains("wmode"));
}

#[test]
fn vertical_text_box_carries_wmode() {
    let mut page = LTPage::new(1, (0.0, 0.0, 10.0, 10.0), 0);
    page.add(LTItem::TextBox(LTTextBox::new(3, true)));
    let xml = render(vec![page]);
    assert!(xml.contains("<textbox id=\"3\" bbox="));
    assert!(xml.contains(" wmode=\"vertical\">\n</textbox>\n"));
}

#[test]
fn images_report_pixel_size_and_exported_name() {
    let stream = ImageStream::new(3, 2, vec![0xff, 0xd8, 0xff]).with_filter("DCTDecode");
    let doc = MemoryDocument::new(vec![
        PageDescriptor::new(
            (0.0, 0.0, 100.0, 100.0),
            0,
            vec![
                op("cm", &[30.0, 0.0, 0.0, 20.0, 0.0, 0.0]),
                Operation::new("Do", vec![Operand::name("Im0")]),
            ],
        )
        .with_resources(Resources::new().with_xobject("Im0", XObject::Image(stream))),
    ]);

    let plain = String::from_utf8(
        convert_to_xml(&doc, Vec::new(), &ConvertOptions::default()).unwrap(),
    )
    .unwrap();
    assert!(plain.contains(concat!(
        "<figure name=\"Im0\" bbox=\"0.000,0.000,30.000,20.000\">\n",
        "<image width=\"3\" height=\"2\" />\n",
        "</figure>\n"
    )));

    let dir = tempfile::tempdir().unwrap();
    let mut conv = XMLConverter::new(Vec::new(), "utf-8").unwrap();
    conv.set_image_writer(Box::new(ImageWriter::new(dir.path()).unwrap()));
    let out = convert_to_xml_with(&doc, conv, &ConvertOptions::default(), |_, _| Ok(())).unwrap();
    let xml = String::from_utf8(out).unwrap();
    assert!(xml.contains("<image src=\"Im0_1.jpg\" width=\"3\" height=\"2\" />\n"));
    assert!(dir.path().join("Im0_1.jpg").exists());
}
