//! Surface - the render-target capability interface.
//!
//! Components never reach into a rendering backend directly. They resolve
//! [`RenderTarget`]s by [`ElementId`] from a [`Surface`] once, at construction,
//! and only ever call the mutation methods below. A browser binding would
//! implement these over DOM nodes; [`MemorySurface`] implements them in memory
//! and doubles as the test surface.
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::surface::{MemorySurface, Surface};
//!
//! let surface = MemorySurface::new();
//! surface.insert("typingText");
//!
//! let sink = surface.target(&"typingText".into()).unwrap();
//! sink.set_text("Data");
//! ```

mod memory;

use std::rc::Rc;

use crate::types::{ElementClass, ElementId, VisualState};

pub use memory::{MemoryElement, MemorySurface};

/// One mutable element on the page.
pub trait RenderTarget {
    fn id(&self) -> &ElementId;

    /// False once the element has been removed from the visible tree.
    /// Components check this before every mutation.
    fn is_attached(&self) -> bool;

    fn set_text(&self, text: &str);

    fn set_visual_state(&self, state: VisualState);

    fn add_class(&self, class: ElementClass);

    fn remove_class(&self, class: ElementClass);

    fn set_attribute(&self, name: &str, value: &str);

    /// Replace the element's children with one text child per item
    /// (technology and feature tags).
    fn replace_children(&self, items: &[String]);
}

/// Resolves element ids to render targets.
pub trait Surface {
    fn target(&self, id: &ElementId) -> Option<Rc<dyn RenderTarget>>;

    /// Resolve only if the element exists and is attached.
    fn attached_target(&self, id: &ElementId) -> Option<Rc<dyn RenderTarget>> {
        self.target(id).filter(|t| t.is_attached())
    }
}

/// Toggle a class on or off in one call.
pub fn set_class(target: &dyn RenderTarget, class: ElementClass, on: bool) {
    if on {
        target.add_class(class);
    } else {
        target.remove_class(class);
    }
}

/// The target, if it was resolved and is still attached.
pub fn live(target: &Option<Rc<dyn RenderTarget>>) -> Option<&Rc<dyn RenderTarget>> {
    target.as_ref().filter(|t| t.is_attached())
}
