//! Container types: LTLayoutContainer, LTFigure, LTPage.

use crate::utils::{Matrix, Rect, apply_matrix_rect};

use super::component::LTComponent;
use super::item::LTItem;
use super::text::LTTextGroup;

/// Ordered child list with a bounding box.
#[derive(Debug, Clone)]
pub struct LTLayoutContainer {
    pub(crate) component: LTComponent,
    pub(crate) items: Vec<LTItem>,
}

impl LTLayoutContainer {
    pub fn new(bbox: Rect) -> Self {
        Self {
            component: LTComponent::new(bbox),
            items: Vec::new(),
        }
    }

    pub fn bbox(&self) -> Rect {
        self.component.bbox()
    }

    pub fn add(&mut self, item: LTItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LTItem> {
        self.items.iter()
    }

    pub fn items(&self) -> &[LTItem] {
        &self.items
    }

    /// Removes and returns all children, leaving the container empty.
    pub fn take_items(&mut self) -> Vec<LTItem> {
        std::mem::take(&mut self.items)
    }
}

impl_has_bbox_delegate!(LTLayoutContainer, component);

/// Content of a form XObject. Figures nest recursively.
#[derive(Debug, Clone)]
pub struct LTFigure {
    pub(crate) container: LTLayoutContainer,
    pub name: String,
    /// Form matrix composed with the CTM in effect when the form was invoked
    pub matrix: Matrix,
}

impl LTFigure {
    /// `bbox` is the form's own BBox (x0, y0, x1, y1) in form space; the
    /// figure's box is its image under `matrix`.
    pub fn new(name: &str, bbox: Rect, matrix: Matrix) -> Self {
        Self {
            container: LTLayoutContainer::new(apply_matrix_rect(matrix, bbox)),
            name: name.to_string(),
            matrix,
        }
    }

    pub fn add(&mut self, item: LTItem) {
        self.container.add(item);
    }

    pub fn len(&self) -> usize {
        self.container.len()
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LTItem> {
        self.container.iter()
    }

    pub fn items(&self) -> &[LTItem] {
        self.container.items()
    }
}

impl_has_bbox_delegate!(LTFigure, container, method);

/// A whole page in device space.
#[derive(Debug, Clone)]
pub struct LTPage {
    pub(crate) container: LTLayoutContainer,
    /// 1-based running page counter
    pub pageid: u32,
    /// Page rotation in degrees
    pub rotate: i32,
    /// Text groups produced by an analyzer, if one ran
    pub groups: Option<Vec<LTTextGroup>>,
}

impl LTPage {
    pub fn new(pageid: u32, bbox: Rect, rotate: i32) -> Self {
        Self {
            container: LTLayoutContainer::new(bbox),
            pageid,
            rotate,
            groups: None,
        }
    }

    pub fn bbox(&self) -> Rect {
        self.container.bbox()
    }

    pub fn add(&mut self, item: LTItem) {
        self.container.add(item);
    }

    pub fn len(&self) -> usize {
        self.container.len()
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LTItem> {
        self.container.iter()
    }

    pub fn items(&self) -> &[LTItem] {
        self.container.items()
    }

    /// Replace the children, e.g. after grouping characters into text boxes.
    pub fn set_items(&mut self, items: Vec<LTItem>) {
        self.container.items = items;
    }

    pub fn take_items(&mut self) -> Vec<LTItem> {
        self.container.take_items()
    }

    pub fn groups(&self) -> Option<&[LTTextGroup]> {
        self.groups.as_deref()
    }
}

impl_has_bbox_delegate!(LTPage, container, method);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LTLine;
    use crate::utils::HasBBox;

    #[test]
    fn figure_bbox_follows_matrix() {
        let fig = LTFigure::new(
            "Fm0",
            (0.0, 0.0, 10.0, 20.0),
            (2.0, 0.0, 0.0, 2.0, 100.0, 100.0),
        );
        assert_eq!(fig.bbox(), (100.0, 100.0, 120.0, 140.0));
    }

    #[test]
    fn page_keeps_insertion_order() {
        let mut page = LTPage::new(1, (0.0, 0.0, 612.0, 792.0), 0);
        page.add(LTItem::Line(LTLine::new(1.0, (0.0, 0.0), (1.0, 0.0))));
        page.add(LTItem::Line(LTLine::new(1.0, (0.0, 5.0), (1.0, 5.0))));
        let ys: Vec<f64> = page.iter().map(|item| item.y0()).collect();
        assert_eq!(ys, vec![0.0, 5.0]);
        assert!(page.groups().is_none());
    }
}
