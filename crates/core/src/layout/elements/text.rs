//! Text grouping elements produced by layout analysis.

use crate::utils::HasBBox;

use super::character::{LTAnno, LTChar};
use super::component::LTComponent;

/// Element of a text line.
#[derive(Debug, Clone)]
pub enum TextLineElement {
    Char(LTChar),
    Anno(LTAnno),
}

impl TextLineElement {
    pub fn get_text(&self) -> &str {
        match self {
            TextLineElement::Char(c) => c.get_text(),
            TextLineElement::Anno(a) => a.get_text(),
        }
    }
}

/// A run of characters along one baseline (or one column for vertical text).
#[derive(Debug, Clone)]
pub struct LTTextLine {
    component: LTComponent,
    vertical: bool,
    elements: Vec<TextLineElement>,
}

impl LTTextLine {
    pub fn new(vertical: bool) -> Self {
        Self {
            component: LTComponent::empty(),
            vertical,
            elements: Vec::new(),
        }
    }

    /// Appends a character and grows the line's box to cover it.
    pub fn add_char(&mut self, ch: LTChar) {
        self.component.expand(ch.bbox());
        self.elements.push(TextLineElement::Char(ch));
    }

    /// Appends virtual text; the box is unchanged.
    pub fn add_anno(&mut self, anno: LTAnno) {
        self.elements.push(TextLineElement::Anno(anno));
    }

    pub fn is_vertical(&self) -> bool {
        self.vertical
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextLineElement> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get_text(&self) -> String {
        self.elements.iter().map(TextLineElement::get_text).collect()
    }
}

impl_has_bbox_delegate!(LTTextLine, component);

/// A block of text lines with a stable index.
#[derive(Debug, Clone)]
pub struct LTTextBox {
    component: LTComponent,
    index: i32,
    vertical: bool,
    lines: Vec<LTTextLine>,
}

impl LTTextBox {
    pub fn new(index: i32, vertical: bool) -> Self {
        Self {
            component: LTComponent::empty(),
            index,
            vertical,
            lines: Vec::new(),
        }
    }

    pub fn add(&mut self, line: LTTextLine) {
        self.component.expand(line.bbox());
        self.lines.push(line);
    }

    pub fn index(&self) -> i32 {
        self.index
    }

    pub fn set_index(&mut self, index: i32) {
        self.index = index;
    }

    pub fn is_vertical(&self) -> bool {
        self.vertical
    }

    pub fn iter(&self) -> impl Iterator<Item = &LTTextLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl_has_bbox_delegate!(LTTextBox, component);

/// Member of a text group: a text box or a nested group.
#[derive(Debug, Clone)]
pub enum TextGroupElement {
    Box(LTTextBox),
    Group(Box<LTTextGroup>),
}

impl HasBBox for TextGroupElement {
    fn x0(&self) -> f64 {
        match self {
            TextGroupElement::Box(b) => b.x0(),
            TextGroupElement::Group(g) => g.x0(),
        }
    }
    fn y0(&self) -> f64 {
        match self {
            TextGroupElement::Box(b) => b.y0(),
            TextGroupElement::Group(g) => g.y0(),
        }
    }
    fn x1(&self) -> f64 {
        match self {
            TextGroupElement::Box(b) => b.x1(),
            TextGroupElement::Group(g) => g.x1(),
        }
    }
    fn y1(&self) -> f64 {
        match self {
            TextGroupElement::Box(b) => b.y1(),
            TextGroupElement::Group(g) => g.y1(),
        }
    }
}

/// Hierarchical grouping of text boxes describing reading order.
#[derive(Debug, Clone)]
pub struct LTTextGroup {
    component: LTComponent,
    elements: Vec<TextGroupElement>,
}

impl LTTextGroup {
    pub fn new(elements: Vec<TextGroupElement>) -> Self {
        let mut component = LTComponent::empty();
        for elem in &elements {
            component.expand(elem.bbox());
        }
        Self {
            component,
            elements,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextGroupElement> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl_has_bbox_delegate!(LTTextGroup, component);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{CharDisp, PDFFont, SimpleFont};
    use std::sync::Arc;

    fn glyph(x: f64, text: &str) -> LTChar {
        let font: Arc<dyn PDFFont> = Arc::new(SimpleFont::new(None).with_default_width(500.0));
        LTChar::new(
            (1.0, 0.0, 0.0, 1.0, x, 0.0),
            font,
            10.0,
            1.0,
            0.0,
            text.into(),
            0.5,
            CharDisp::Horizontal(0.5),
        )
    }

    #[test]
    fn textline_grows_with_chars_only() {
        let mut line = LTTextLine::new(false);
        line.add_char(glyph(0.0, "a"));
        line.add_anno(LTAnno::new(" "));
        line.add_char(glyph(10.0, "b"));
        assert_eq!(line.bbox(), (0.0, -2.5, 15.0, 7.5));
        assert_eq!(line.get_text(), "a b");
        assert_eq!(line.len(), 3);
    }

    #[test]
    fn group_bbox_covers_members() {
        let mut line = LTTextLine::new(false);
        line.add_char(glyph(0.0, "a"));
        let mut first = LTTextBox::new(0, false);
        first.add(line);

        let mut line = LTTextLine::new(false);
        line.add_char(glyph(40.0, "b"));
        let mut second = LTTextBox::new(1, false);
        second.add(line);

        let inner = LTTextGroup::new(vec![TextGroupElement::Box(second)]);
        let outer = LTTextGroup::new(vec![
            TextGroupElement::Box(first),
            TextGroupElement::Group(Box::new(inner)),
        ]);
        assert_eq!(outer.bbox(), (0.0, -2.5, 45.0, 7.5));
        assert_eq!(outer.len(), 2);
    }
}
