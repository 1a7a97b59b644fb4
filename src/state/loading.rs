//! Loading screen - Holds the page behind an overlay until it has loaded.
//!
//! While loading, the body cannot scroll. Once the load delay has passed the
//! overlay gets `HIDDEN`, scrolling is restored and the `on_loaded` hook runs
//! (the page uses it to start typing and parallax).

use std::cell::Cell;
use std::rc::Rc;

use tracing::info;

use crate::scheduler::{TimerId, Timeline};
use crate::surface::{live, RenderTarget, Surface};
use crate::types::{ElementClass, Millis};

pub struct LoadingScreen {
    overlay: Option<Rc<dyn RenderTarget>>,
    body: Option<Rc<dyn RenderTarget>>,
    loaded: Rc<Cell<bool>>,
}

impl LoadingScreen {
    /// Resolve `loadingScreen` and `body`, and lock scrolling.
    pub fn new(surface: &dyn Surface) -> Self {
        let screen = Self {
            overlay: surface.target(&"loadingScreen".into()),
            body: surface.target(&"body".into()),
            loaded: Rc::new(Cell::new(false)),
        };
        if let Some(body) = live(&screen.body) {
            body.set_attribute("overflow", "hidden");
        }
        screen
    }

    /// Lift the overlay `delay_ms` from now, then run `on_loaded`.
    pub fn finish_after<F>(&self, timeline: &Timeline, delay_ms: Millis, on_loaded: F) -> TimerId
    where
        F: FnOnce() + 'static,
    {
        let overlay = self.overlay.clone();
        let body = self.body.clone();
        let loaded = self.loaded.clone();
        timeline.schedule(delay_ms, move || {
            if let Some(overlay) = live(&overlay) {
                overlay.add_class(ElementClass::HIDDEN);
            }
            if let Some(body) = live(&body) {
                body.set_attribute("overflow", "auto");
            }
            loaded.set(true);
            info!("page loaded");
            on_loaded();
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    #[test]
    fn test_overlay_lifts_after_delay() {
        let surface = MemorySurface::new();
        surface.insert_all(["loadingScreen", "body"]);
        let timeline = Timeline::new();
        let screen = LoadingScreen::new(&surface);
        let body = surface.element("body").unwrap();
        let overlay = surface.element("loadingScreen").unwrap();
        assert_eq!(body.attribute("overflow").as_deref(), Some("hidden"));

        let hooked = Rc::new(Cell::new(0));
        let h = hooked.clone();
        screen.finish_after(&timeline, 2000, move || h.set(h.get() + 1));

        timeline.advance(1999);
        assert!(!screen.is_loaded());
        assert!(!overlay.has_class(ElementClass::HIDDEN));
        assert_eq!(hooked.get(), 0);

        timeline.advance(1);
        assert!(screen.is_loaded());
        assert!(overlay.has_class(ElementClass::HIDDEN));
        assert_eq!(body.attribute("overflow").as_deref(), Some("auto"));
        assert_eq!(hooked.get(), 1);
    }

    #[test]
    fn test_missing_overlay_still_loads() {
        let surface = MemorySurface::new();
        let timeline = Timeline::new();
        let screen = LoadingScreen::new(&surface);

        let hooked = Rc::new(Cell::new(false));
        let h = hooked.clone();
        screen.finish_after(&timeline, 10, move || h.set(true));
        timeline.advance(10);

        assert!(screen.is_loaded());
        assert!(hooked.get());
    }
}
