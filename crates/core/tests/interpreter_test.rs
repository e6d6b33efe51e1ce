//! Tests for the page interpreter: operators in, layout tree out.

use std::collections::BTreeMap;
use std::sync::Arc;

use contour_core::converter::{PDFLayoutBuilder, PDFPageAggregator};
use contour_core::document::{ExtGState, FormXObject, PageDescriptor, Resources, XObject};
use contour_core::font::{PDFFont, SimpleFont};
use contour_core::interp::{Operand, Operation, PDFPageInterpreter};
use contour_core::layout::{LTItem, LTPage};
use contour_core::model::ImageStream;
use contour_core::utils::HasBBox;

const LETTER: (f64, f64, f64, f64) = (0.0, 0.0, 612.0, 792.0);

fn op(operator: &str, operands: &[f64]) -> Operation {
    Operation::new(
        operator,
        operands.iter().map(|v| Operand::from(*v)).collect(),
    )
}

fn named(operator: &str, name: &str) -> Operation {
    Operation::new(operator, vec![Operand::name(name)])
}

fn show(text: &str) -> Operation {
    Operation::new("Tj", vec![Operand::string(text)])
}

fn set_font(name: &str, size: f64) -> Operation {
    Operation::new("Tf", vec![Operand::name(name), Operand::from(size)])
}

fn run(page: PageDescriptor) -> LTPage {
    let mut builder = PDFLayoutBuilder::new(PDFPageAggregator::new());
    PDFPageInterpreter::new(&mut builder)
        .process_page(&page)
        .unwrap();
    builder.into_sink().into_pages().remove(0)
}

fn plain_font() -> Arc<dyn PDFFont> {
    Arc::new(SimpleFont::new(Some("Plain")).with_default_width(500.0))
}

fn char_x0s(page: &LTPage) -> Vec<f64> {
    page.iter()
        .filter_map(|item| match item {
            LTItem::Char(c) => Some(c.x0()),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Paths and graphics state
// ============================================================================

#[test]
fn stroke_and_fill_produce_line_and_rect() {
    let page = run(PageDescriptor::new(
        LETTER,
        0,
        vec![
            op("m", &[0.0, 0.0]),
            op("l", &[100.0, 0.0]),
            op("S", &[]),
            op("re", &[0.0, 0.0, 50.0, 50.0]),
            op("f", &[]),
        ],
    ));
    assert_eq!(page.bbox(), (0.0, 0.0, 612.0, 792.0));
    match page.items() {
        [LTItem::Line(line), LTItem::Rect(rect)] => {
            assert_eq!(line.bbox(), (0.0, 0.0, 100.0, 0.0));
            assert!(line.stroke && !line.fill);
            assert_eq!(rect.bbox(), (0.0, 0.0, 50.0, 50.0));
            assert!(rect.fill && !rect.stroke);
        }
        other => panic!("unexpected items: {:?}", other),
    }
}

#[test]
fn saved_state_is_restored_by_q() {
    let page = run(PageDescriptor::new(
        LETTER,
        0,
        vec![
            op("q", &[]),
            op("cm", &[2.0, 0.0, 0.0, 2.0, 0.0, 0.0]),
            op("w", &[4.0]),
            op("Q", &[]),
            op("m", &[0.0, 0.0]),
            op("l", &[10.0, 0.0]),
            op("S", &[]),
        ],
    ));
    match &page.items()[0] {
        LTItem::Line(line) => {
            assert_eq!(line.bbox(), (0.0, 0.0, 10.0, 0.0));
            assert_eq!(line.linewidth, 0.0);
        }
        other => panic!("expected line, got {}", other.kind()),
    }
}

#[test]
fn rotated_page_transforms_paths() {
    let page = run(PageDescriptor::new(
        (0.0, 0.0, 200.0, 100.0),
        90,
        vec![op("m", &[0.0, 0.0]), op("l", &[100.0, 0.0]), op("S", &[])],
    ));
    assert_eq!(page.bbox(), (0.0, 0.0, 100.0, 200.0));
    assert_eq!(page.rotate, 90);
    assert_eq!(page.items()[0].bbox(), (0.0, 100.0, 0.0, 200.0));
}

#[test]
fn ext_gstate_sets_line_width_and_dash() {
    let gs = ExtGState {
        linewidth: Some(3.0),
        dash: Some((vec![2.0, 1.0], 0.0)),
        ..Default::default()
    };
    let page = run(
        PageDescriptor::new(
            LETTER,
            0,
            vec![
                named("gs", "GS0"),
                named("gs", "Missing"),
                op("m", &[0.0, 0.0]),
                op("l", &[0.0, 10.0]),
                op("S", &[]),
            ],
        )
        .with_resources(Resources::new().with_ext_gstate("GS0", gs)),
    );
    match &page.items()[0] {
        LTItem::Line(line) => {
            assert_eq!(line.linewidth, 3.0);
            assert_eq!(line.dashing_style, Some((vec![2.0, 1.0], 0.0)));
        }
        other => panic!("expected line, got {}", other.kind()),
    }
}

#[test]
fn malformed_operators_are_skipped() {
    let page = run(PageDescriptor::new(
        LETTER,
        0,
        vec![
            op("m", &[1.0]),
            Operation::bare("xyz"),
            op("S", &[]),
            op("m", &[0.0, 0.0]),
            op("l", &[5.0, 0.0]),
            op("S", &[]),
        ],
    ));
    assert_eq!(page.len(), 1);
    assert!(matches!(&page.items()[0], LTItem::Line(_)));
}

#[test]
fn shorthand_curves_keep_only_given_points() {
    let page = run(PageDescriptor::new(
        LETTER,
        0,
        vec![
            op("m", &[0.0, 0.0]),
            op("v", &[10.0, 10.0, 20.0, 0.0]),
            op("S", &[]),
            op("m", &[0.0, 0.0]),
            op("y", &[5.0, 5.0, 30.0, 0.0]),
            op("S", &[]),
        ],
    ));
    match page.items() {
        [LTItem::Curve(v), LTItem::Curve(y)] => {
            assert_eq!(v.pts, vec![(0.0, 0.0), (10.0, 10.0), (20.0, 0.0)]);
            assert_eq!(y.pts, vec![(0.0, 0.0), (5.0, 5.0), (30.0, 0.0)]);
        }
        other => panic!("unexpected items: {:?}", other),
    }
}

// ============================================================================
// Text
// ============================================================================

#[test]
fn char_and_word_spacing_advance_glyphs() {
    let page = run(
        PageDescriptor::new(
            LETTER,
            0,
            vec![
                op("BT", &[]),
                set_font("F1", 10.0),
                op("Tc", &[1.0]),
                op("Tw", &[2.0]),
                show("A B"),
                op("ET", &[]),
            ],
        )
        .with_resources(Resources::new().with_font("F1", plain_font())),
    );
    assert_eq!(char_x0s(&page), vec![0.0, 6.0, 14.0]);
}

#[test]
fn tj_adjustments_move_left() {
    let seq = Operand::Array(vec![
        Operand::string("A"),
        Operand::from(-1000.0),
        Operand::string("B"),
    ]);
    let page = run(
        PageDescriptor::new(
            LETTER,
            0,
            vec![
                op("BT", &[]),
                set_font("F1", 10.0),
                op("Td", &[100.0, 200.0]),
                Operation::new("TJ", vec![seq]),
                op("ET", &[]),
            ],
        )
        .with_resources(Resources::new().with_font("F1", plain_font())),
    );
    assert_eq!(char_x0s(&page), vec![100.0, 115.0]);
}

#[test]
fn next_line_operators_use_leading() {
    let page = run(
        PageDescriptor::new(
            LETTER,
            0,
            vec![
                op("BT", &[]),
                set_font("F1", 10.0),
                op("TD", &[0.0, 700.0]),
                op("TL", &[12.0]),
                show("A"),
                Operation::new("'", vec![Operand::string("B")]),
                op("ET", &[]),
            ],
        )
        .with_resources(Resources::new().with_font("F1", plain_font())),
    );
    let baselines: Vec<f64> = page.iter().map(|item| item.y0()).collect();
    assert_eq!(baselines, vec![697.5, 685.5]);
}

#[test]
fn unknown_font_renders_nothing() {
    let page = run(PageDescriptor::new(
        LETTER,
        0,
        vec![op("BT", &[]), set_font("F9", 10.0), show("A"), op("ET", &[])],
    ));
    assert!(page.is_empty());
}

#[test]
fn undefined_cid_is_buffered_as_placeholder() {
    let font: Arc<dyn PDFFont> = Arc::new(SimpleFont::new(None).multibyte(false));
    let page = run(
        PageDescriptor::new(
            LETTER,
            0,
            vec![
                op("BT", &[]),
                set_font("F0", 12.0),
                Operation::new("Tj", vec![Operand::string([0x27u8, 0x0f])]),
                op("ET", &[]),
            ],
        )
        .with_resources(Resources::new().with_font("F0", font)),
    );
    match &page.items()[0] {
        LTItem::Char(ch) => assert_eq!(ch.get_text(), "(cid:9999)"),
        other => panic!("expected char, got {}", other.kind()),
    }
}

// ============================================================================
// XObjects
// ============================================================================

#[test]
fn form_becomes_figure_under_its_matrix() {
    let form = FormXObject::new(
        (0.0, 0.0, 10.0, 10.0),
        vec![op("re", &[0.0, 0.0, 10.0, 10.0]), op("f", &[])],
    )
    .with_matrix((1.0, 0.0, 0.0, 1.0, 100.0, 100.0));
    let page = run(
        PageDescriptor::new(
            LETTER,
            0,
            vec![
                named("Do", "Fm0"),
                op("m", &[0.0, 0.0]),
                op("l", &[10.0, 0.0]),
                op("S", &[]),
            ],
        )
        .with_resources(Resources::new().with_xobject("Fm0", XObject::Form(form))),
    );
    match page.items() {
        [LTItem::Figure(fig), LTItem::Line(line)] => {
            assert_eq!(fig.name, "Fm0");
            assert_eq!(fig.bbox(), (100.0, 100.0, 110.0, 110.0));
            assert_eq!(fig.items()[0].bbox(), (100.0, 100.0, 110.0, 110.0));
            assert_eq!(line.bbox(), (0.0, 0.0, 10.0, 0.0));
        }
        other => panic!("unexpected items: {:?}", other),
    }
}

#[test]
fn form_state_does_not_leak() {
    let form = FormXObject::new(
        (0.0, 0.0, 10.0, 10.0),
        vec![op("cm", &[3.0, 0.0, 0.0, 3.0, 0.0, 0.0]), op("w", &[9.0])],
    );
    let page = run(
        PageDescriptor::new(
            LETTER,
            0,
            vec![
                named("Do", "Fm0"),
                op("m", &[0.0, 0.0]),
                op("l", &[10.0, 0.0]),
                op("S", &[]),
            ],
        )
        .with_resources(Resources::new().with_xobject("Fm0", XObject::Form(form))),
    );
    match &page.items()[1] {
        LTItem::Line(line) => {
            assert_eq!(line.bbox(), (0.0, 0.0, 10.0, 0.0));
            assert_eq!(line.linewidth, 0.0);
        }
        other => panic!("expected line, got {}", other.kind()),
    }
}

#[test]
fn recursive_form_is_entered_once() {
    let form = FormXObject::new(
        (0.0, 0.0, 10.0, 10.0),
        vec![named("Do", "Fm0"), op("re", &[0.0, 0.0, 1.0, 1.0]), op("S", &[])],
    );
    let page = run(
        PageDescriptor::new(LETTER, 0, vec![named("Do", "Fm0")])
            .with_resources(Resources::new().with_xobject("Fm0", XObject::Form(form))),
    );
    assert_eq!(page.len(), 1);
    match &page.items()[0] {
        LTItem::Figure(fig) => {
            assert_eq!(fig.len(), 1);
            assert!(matches!(&fig.items()[0], LTItem::Rect(_)));
        }
        other => panic!("expected figure, got {}", other.kind()),
    }
}

#[test]
fn image_xobject_is_wrapped_in_unit_figure() {
    let stream = ImageStream::new(4, 3, vec![0u8; 12]).with_colorspace("DeviceGray");
    let page = run(
        PageDescriptor::new(
            LETTER,
            0,
            vec![
                op("cm", &[40.0, 0.0, 0.0, 30.0, 10.0, 20.0]),
                named("Do", "Im0"),
            ],
        )
        .with_resources(Resources::new().with_xobject("Im0", XObject::Image(stream))),
    );
    match &page.items()[0] {
        LTItem::Figure(fig) => {
            assert_eq!(fig.name, "Im0");
            assert_eq!(fig.bbox(), (10.0, 20.0, 50.0, 50.0));
            match &fig.items()[0] {
                LTItem::Image(img) => {
                    assert_eq!(img.bbox(), (10.0, 20.0, 50.0, 50.0));
                    assert_eq!((img.src_width(), img.src_height()), (4, 3));
                }
                other => panic!("expected image, got {}", other.kind()),
            }
        }
        other => panic!("expected figure, got {}", other.kind()),
    }
}

#[test]
fn inline_images_are_numbered() {
    let dict = BTreeMap::from([
        ("W".to_string(), Operand::Int(2)),
        ("H".to_string(), Operand::Int(2)),
        ("CS".to_string(), Operand::name("G")),
    ]);
    let page = run(PageDescriptor::new(
        LETTER,
        0,
        vec![
            Operation::inline_image(dict.clone(), vec![0; 4]),
            Operation::inline_image(dict, vec![0; 4]),
        ],
    ));
    let names: Vec<&str> = page
        .iter()
        .filter_map(|item| match item {
            LTItem::Figure(fig) => Some(fig.name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(names, ["inline0", "inline1"]);
}

#[test]
fn undefined_xobject_is_ignored() {
    let page = run(PageDescriptor::new(LETTER, 0, vec![named("Do", "Nope")]));
    assert!(page.is_empty());
}
