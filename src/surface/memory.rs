//! In-memory surface.
//!
//! Keeps every element's text, visual state, classes, attributes and children
//! in plain cells so tests (and headless hosts) can read back exactly what the
//! components wrote.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::{RenderTarget, Surface};
use crate::types::{ElementClass, ElementId, VisualState};

// =============================================================================
// Element
// =============================================================================

#[derive(Debug)]
pub struct MemoryElement {
    id: ElementId,
    attached: Cell<bool>,
    text: RefCell<String>,
    text_writes: Cell<usize>,
    visual: Cell<VisualState>,
    classes: Cell<ElementClass>,
    attributes: RefCell<HashMap<String, String>>,
    children: RefCell<Vec<String>>,
}

impl MemoryElement {
    fn new(id: ElementId) -> Self {
        Self {
            id,
            attached: Cell::new(true),
            text: RefCell::new(String::new()),
            text_writes: Cell::new(0),
            visual: Cell::new(VisualState::default()),
            classes: Cell::new(ElementClass::NONE),
            attributes: RefCell::new(HashMap::new()),
            children: RefCell::new(Vec::new()),
        }
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Number of `set_text` calls seen so far.
    pub fn text_writes(&self) -> usize {
        self.text_writes.get()
    }

    pub fn visual_state(&self) -> VisualState {
        self.visual.get()
    }

    pub fn classes(&self) -> ElementClass {
        self.classes.get()
    }

    pub fn has_class(&self, class: ElementClass) -> bool {
        self.classes.get().contains(class)
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    pub fn children(&self) -> Vec<String> {
        self.children.borrow().clone()
    }

    pub fn set_attached(&self, attached: bool) {
        self.attached.set(attached);
    }
}

impl RenderTarget for MemoryElement {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn is_attached(&self) -> bool {
        self.attached.get()
    }

    fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
        self.text_writes.set(self.text_writes.get() + 1);
    }

    fn set_visual_state(&self, state: VisualState) {
        self.visual.set(state);
    }

    fn add_class(&self, class: ElementClass) {
        self.classes.set(self.classes.get() | class);
    }

    fn remove_class(&self, class: ElementClass) {
        self.classes.set(self.classes.get() - class);
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn replace_children(&self, items: &[String]) {
        *self.children.borrow_mut() = items.to_vec();
    }
}

// =============================================================================
// Surface
// =============================================================================

#[derive(Debug, Default)]
pub struct MemorySurface {
    elements: RefCell<HashMap<ElementId, Rc<MemoryElement>>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or return the existing) attached element.
    pub fn insert(&self, id: impl Into<ElementId>) -> Rc<MemoryElement> {
        let id = id.into();
        self.elements
            .borrow_mut()
            .entry(id.clone())
            .or_insert_with(|| Rc::new(MemoryElement::new(id)))
            .clone()
    }

    /// Insert several elements at once.
    pub fn insert_all<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<ElementId>,
    {
        for id in ids {
            self.insert(id);
        }
    }

    pub fn element(&self, id: impl Into<ElementId>) -> Option<Rc<MemoryElement>> {
        self.elements.borrow().get(&id.into()).cloned()
    }

    /// Remove an element from the visible tree. Handles already held by
    /// components see `is_attached() == false` from now on.
    pub fn detach(&self, id: impl Into<ElementId>) {
        if let Some(element) = self.elements.borrow().get(&id.into()) {
            element.set_attached(false);
        }
    }

    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }
}

impl Surface for MemorySurface {
    fn target(&self, id: &ElementId) -> Option<Rc<dyn RenderTarget>> {
        self.elements
            .borrow()
            .get(id)
            .map(|e| e.clone() as Rc<dyn RenderTarget>)
    }
}
