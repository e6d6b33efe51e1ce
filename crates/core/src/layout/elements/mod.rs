//! Layout tree node types. [`LTItem`] is the closed set a container holds.

/// `HasBBox` for a wrapper type, forwarding to one of its fields. Add
/// `method` when the field exposes the coordinates as accessors.
macro_rules! impl_has_bbox_delegate {
    ($type:ty, $field:ident, method) => {
        impl crate::utils::HasBBox for $type {
            fn x0(&self) -> f64 {
                self.$field.x0()
            }
            fn y0(&self) -> f64 {
                self.$field.y0()
            }
            fn x1(&self) -> f64 {
                self.$field.x1()
            }
            fn y1(&self) -> f64 {
                self.$field.y1()
            }
        }
    };
    ($type:ty, $field:ident) => {
        impl crate::utils::HasBBox for $type {
            fn x0(&self) -> f64 {
                self.$field.x0
            }
            fn y0(&self) -> f64 {
                self.$field.y0
            }
            fn x1(&self) -> f64 {
                self.$field.x1
            }
            fn y1(&self) -> f64 {
                self.$field.y1
            }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use impl_has_bbox_delegate;

mod character;
mod component;
mod container;
mod graphics;
mod item;
mod text;

pub use character::{LTAnno, LTChar};
pub use component::LTComponent;
pub use container::{LTFigure, LTLayoutContainer, LTPage};
pub use graphics::{LTCurve, LTImage, LTLine, LTRect};
pub use item::LTItem;
pub use text::{LTTextBox, LTTextGroup, LTTextLine, TextGroupElement, TextLineElement};
