//! Project modal - detail view for one catalog record.
//!
//! Open/close is a two-state toggle. Opening renders the record into the
//! modal's title, description, technology and feature targets and locks page
//! scrolling; Escape closes it.

use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::debug;

use super::Catalog;
use crate::state::Notifier;
use crate::surface::{live, RenderTarget, Surface};
use crate::types::ElementClass;

pub struct ModalViewer {
    catalog: Rc<Catalog>,
    modal: Option<Rc<dyn RenderTarget>>,
    title: Option<Rc<dyn RenderTarget>>,
    description: Option<Rc<dyn RenderTarget>>,
    technologies: Option<Rc<dyn RenderTarget>>,
    features: Option<Rc<dyn RenderTarget>>,
    body: Option<Rc<dyn RenderTarget>>,
    /// Index of the record on display.
    open: Signal<Option<usize>>,
    notifier: Notifier,
}

impl ModalViewer {
    pub fn new(surface: &dyn Surface, catalog: Rc<Catalog>, notifier: Notifier) -> Self {
        let viewer = Self {
            catalog,
            modal: surface.target(&"projectModal".into()),
            title: surface.target(&"modalTitle".into()),
            description: surface.target(&"modalDescription".into()),
            technologies: surface.target(&"modalTech".into()),
            features: surface.target(&"modalFeatures".into()),
            body: surface.target(&"body".into()),
            open: signal(None),
            notifier,
        };
        if let Some(modal) = live(&viewer.modal) {
            modal.add_class(ElementClass::HIDDEN);
        }
        viewer
    }

    /// Show record `index`. Unknown indices (or a missing modal) do nothing.
    pub fn open(&self, index: usize) -> bool {
        let Some(record) = self.catalog.get(index) else {
            debug!(index, "no such project");
            return false;
        };
        let Some(modal) = live(&self.modal) else {
            return false;
        };

        if let Some(title) = live(&self.title) {
            title.set_text(&record.title);
        }
        if let Some(description) = live(&self.description) {
            description.set_text(&record.description);
        }
        if let Some(tech) = live(&self.technologies) {
            tech.replace_children(&record.technologies);
        }
        if let Some(features) = live(&self.features) {
            features.replace_children(&record.features);
        }

        modal.remove_class(ElementClass::HIDDEN);
        modal.add_class(ElementClass::VISIBLE);
        if let Some(body) = live(&self.body) {
            body.set_attribute("overflow", "hidden");
        }

        debug!(index, title = %record.title, "modal opened");
        self.open.set(Some(index));
        self.notifier.success("Project details opened");
        true
    }

    /// Hide the modal. Closing an already closed modal does nothing.
    pub fn close(&self) -> bool {
        if self.open.get().is_none() {
            return false;
        }
        if let Some(modal) = live(&self.modal) {
            modal.remove_class(ElementClass::VISIBLE);
            modal.add_class(ElementClass::HIDDEN);
        }
        if let Some(body) = live(&self.body) {
            body.set_attribute("overflow", "auto");
        }

        self.open.set(None);
        self.notifier.info("Modal closed");
        true
    }

    /// Keyboard handling: Escape closes an open modal. Returns true if consumed.
    pub fn handle_key(&self, key: &str) -> bool {
        key == "Escape" && self.close()
    }

    pub fn is_open(&self) -> bool {
        self.open.get().is_some()
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open.get()
    }

    pub fn signal(&self) -> Signal<Option<usize>> {
        self.open.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;
    use crate::scheduler::Timeline;
    use crate::surface::MemorySurface;
    use crate::types::Severity;

    fn setup() -> (MemorySurface, Notifier, ModalViewer) {
        let surface = MemorySurface::new();
        surface.insert_all([
            "projectModal",
            "modalTitle",
            "modalDescription",
            "modalTech",
            "modalFeatures",
            "body",
        ]);
        let notifier = Notifier::new(&Timeline::new(), 4500);
        let viewer = ModalViewer::new(&surface, Rc::new(fixtures::catalog()), notifier.clone());
        (surface, notifier, viewer)
    }

    #[test]
    fn test_starts_hidden() {
        let (surface, _n, viewer) = setup();
        assert!(!viewer.is_open());
        assert!(surface.element("projectModal").unwrap().has_class(ElementClass::HIDDEN));
    }

    #[test]
    fn test_open_renders_record() {
        let (surface, notifier, viewer) = setup();

        assert!(viewer.open(1));
        assert_eq!(viewer.open_index(), Some(1));

        let el = |id: &str| surface.element(id).unwrap();
        assert_eq!(el("modalTitle").text(), "Social Media Sentiment Analysis");
        assert_eq!(el("modalTech").children(), vec!["Python", "Pandas", "VADER"]);
        assert_eq!(
            el("modalFeatures").children(),
            vec!["NLP Processing", "Sentiment Classification"]
        );
        assert!(el("projectModal").has_class(ElementClass::VISIBLE));
        assert!(!el("projectModal").has_class(ElementClass::HIDDEN));
        assert_eq!(el("body").attribute("overflow").as_deref(), Some("hidden"));

        let n = notifier.current().unwrap();
        assert_eq!(n.message, "Project details opened");
        assert_eq!(n.severity, Severity::Success);
    }

    #[test]
    fn test_unknown_index_is_noop() {
        let (surface, notifier, viewer) = setup();
        assert!(!viewer.open(7));
        assert!(!viewer.is_open());
        assert!(notifier.current().is_none());
        assert_eq!(surface.element("modalTitle").unwrap().text_writes(), 0);
    }

    #[test]
    fn test_close_and_escape() {
        let (surface, notifier, viewer) = setup();

        assert!(!viewer.handle_key("Escape"));
        viewer.open(0);
        assert!(!viewer.handle_key("Enter"));
        assert!(viewer.handle_key("Escape"));

        assert!(!viewer.is_open());
        assert!(surface.element("projectModal").unwrap().has_class(ElementClass::HIDDEN));
        assert_eq!(
            surface.element("body").unwrap().attribute("overflow").as_deref(),
            Some("auto")
        );
        assert_eq!(notifier.current().unwrap().message, "Modal closed");
        assert!(!viewer.close());
    }
}
