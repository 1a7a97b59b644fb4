//! Visibility Watcher - One-shot "entered the viewport" callbacks.
//!
//! Elements are registered with a [`Threshold`] and a callback. Intersections
//! are pushed in (from a scroll handler or a browser observer); the first time
//! an element's visible fraction reaches its threshold the callback runs once
//! and the registration is dropped. Scrolling away and back never re-fires.
//!
//! # API
//!
//! - `register(target, threshold, f)` - Watch one element
//! - `notify(id, ratio)` - Push one intersection
//! - `observe(layout, viewport)` - Push intersections for every watched element
//! - `dispose()` - Drop every pending watch (page teardown)
//!
//! # Example
//!
//! ```ignore
//! let watcher = VisibilityWatcher::new();
//! let handle = watcher.register(&*card, Threshold::DEFAULT, || reveal());
//!
//! watcher.observe(&layout, &viewport.scrolled_to(640.0));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::layout::{intersection_ratio, PageLayout, Viewport};
use crate::surface::RenderTarget;
use crate::types::{ElementId, Threshold};

// =============================================================================
// TYPES
// =============================================================================

/// Identifies one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

/// Returned from [`VisibilityWatcher::register`].
///
/// An inert handle (element was not attached) never fires and unregistering it
/// does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchHandle {
    id: Option<WatchId>,
}

impl WatchHandle {
    pub fn is_inert(&self) -> bool {
        self.id.is_none()
    }

    pub fn id(&self) -> Option<WatchId> {
        self.id
    }
}

struct Watch {
    id: WatchId,
    target: Rc<dyn RenderTarget>,
    threshold: Threshold,
    on_visible: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct WatchRegistry {
    watches: Vec<Watch>,
    next_id: u64,
}

impl WatchRegistry {
    fn next_id(&mut self) -> WatchId {
        let id = WatchId(self.next_id);
        self.next_id += 1;
        id
    }
}

// =============================================================================
// WATCHER
// =============================================================================

/// Cloneable handle to one watch registry.
#[derive(Clone, Default)]
pub struct VisibilityWatcher {
    registry: Rc<RefCell<WatchRegistry>>,
}

impl VisibilityWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Watch `target` until at least `threshold` of it is visible, then run
    /// `on_visible` once.
    ///
    /// A detached target yields an inert handle.
    pub fn register<F>(
        &self,
        target: Rc<dyn RenderTarget>,
        threshold: Threshold,
        on_visible: F,
    ) -> WatchHandle
    where
        F: FnOnce() + 'static,
    {
        if !target.is_attached() {
            debug!(element = %target.id(), "not attached, watch is inert");
            return WatchHandle { id: None };
        }

        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id();
        debug!(element = %target.id(), threshold = threshold.value(), "watching");
        registry.watches.push(Watch {
            id,
            target,
            threshold,
            on_visible: Box::new(on_visible),
        });
        WatchHandle { id: Some(id) }
    }

    /// Cancel one registration. Returns false if it already fired or was inert.
    pub fn unregister(&self, handle: &WatchHandle) -> bool {
        let Some(id) = handle.id else {
            return false;
        };
        let mut registry = self.registry.borrow_mut();
        let before = registry.watches.len();
        registry.watches.retain(|w| w.id != id);
        registry.watches.len() != before
    }

    /// Push one intersection. Fires (and drops) every watch on `element` whose
    /// threshold is met. Returns the number of callbacks run.
    pub fn notify(&self, element: &ElementId, ratio: f32) -> usize {
        self.fire_where(|w| w.target.id() == element && w.threshold.is_met(ratio))
    }

    /// Push intersections for every watched element from page geometry.
    ///
    /// Elements without a rect in `layout` are left alone.
    pub fn observe(&self, layout: &PageLayout, viewport: &Viewport) -> usize {
        self.fire_where(|w| {
            layout
                .rect(w.target.id())
                .map(|rect| w.threshold.is_met(intersection_ratio(&rect, viewport)))
                .unwrap_or(false)
        })
    }

    /// Remove matching watches first, then run their callbacks with the
    /// registry released so callbacks may register new watches.
    fn fire_where<P>(&self, should_fire: P) -> usize
    where
        P: Fn(&Watch) -> bool,
    {
        let fired: Vec<Watch> = {
            let mut registry = self.registry.borrow_mut();

            // Elements removed from the page can never become visible
            registry.watches.retain(|w| {
                let attached = w.target.is_attached();
                if !attached {
                    debug!(element = %w.target.id(), "detached, dropping watch");
                }
                attached
            });

            let (fired, kept) = std::mem::take(&mut registry.watches)
                .into_iter()
                .partition(|w| should_fire(w));
            registry.watches = kept;
            fired
        };

        let count = fired.len();
        for watch in fired {
            debug!(element = %watch.target.id(), "became visible");
            (watch.on_visible)();
        }
        count
    }

    pub fn pending_count(&self) -> usize {
        self.registry.borrow().watches.len()
    }

    pub fn is_watching(&self, element: &ElementId) -> bool {
        self.registry
            .borrow()
            .watches
            .iter()
            .any(|w| w.target.id() == element)
    }

    /// Drop every pending watch without firing.
    pub fn dispose(&self) {
        let dropped = {
            let mut registry = self.registry.borrow_mut();
            std::mem::take(&mut registry.watches)
        };
        debug!(count = dropped.len(), "disposed pending watches");
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute_page_layout, Block};
    use crate::surface::{MemorySurface, Surface};
    use std::cell::Cell;

    fn setup() -> (MemorySurface, VisibilityWatcher) {
        let surface = MemorySurface::new();
        surface.insert_all(["a", "b", "c"]);
        (surface, VisibilityWatcher::new())
    }

    fn target(surface: &MemorySurface, id: &str) -> Rc<dyn RenderTarget> {
        surface.target(&id.into()).unwrap()
    }

    fn counter() -> (Rc<Cell<u32>>, impl Fn() -> Box<dyn FnOnce()>) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let make = move || {
            let c = c.clone();
            Box::new(move || c.set(c.get() + 1)) as Box<dyn FnOnce()>
        };
        (count, make)
    }

    #[test]
    fn test_fires_once_at_threshold() {
        let (surface, watcher) = setup();
        let (count, make) = counter();

        watcher.register(target(&surface, "a"), Threshold::new(0.5).unwrap(), make());

        assert_eq!(watcher.notify(&"a".into(), 0.49), 0);
        assert_eq!(count.get(), 0);

        assert_eq!(watcher.notify(&"a".into(), 0.5), 1);
        assert_eq!(count.get(), 1);

        // Scroll away and back: no replay
        watcher.notify(&"a".into(), 0.0);
        watcher.notify(&"a".into(), 1.0);
        assert_eq!(count.get(), 1);
        assert_eq!(watcher.pending_count(), 0);
    }

    #[test]
    fn test_same_element_twice_fires_both_once() {
        let (surface, watcher) = setup();
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let f = first.clone();
        let s = second.clone();

        watcher.register(target(&surface, "a"), Threshold::new(0.2).unwrap(), move || {
            f.set(f.get() + 1)
        });
        watcher.register(target(&surface, "a"), Threshold::new(0.4).unwrap(), move || {
            s.set(s.get() + 1)
        });

        assert_eq!(watcher.notify(&"a".into(), 1.0), 2);
        assert_eq!(watcher.notify(&"a".into(), 1.0), 0);

        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn test_elements_fire_independently_of_registration_order() {
        let (surface, watcher) = setup();
        let order = Rc::new(RefCell::new(Vec::new()));

        for id in ["a", "b", "c"] {
            let order = order.clone();
            watcher.register(target(&surface, id), Threshold::DEFAULT, move || {
                order.borrow_mut().push(id)
            });
        }

        watcher.notify(&"c".into(), 1.0);
        watcher.notify(&"a".into(), 1.0);

        assert_eq!(*order.borrow(), vec!["c", "a"]);
        assert!(watcher.is_watching(&"b".into()));
    }

    #[test]
    fn test_detached_registration_is_inert() {
        let (surface, watcher) = setup();
        let (count, make) = counter();
        surface.detach("a");

        let handle = watcher.register(target(&surface, "a"), Threshold::DEFAULT, make());

        assert!(handle.is_inert());
        assert!(!watcher.unregister(&handle));
        assert_eq!(watcher.notify(&"a".into(), 1.0), 0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_detached_after_registration_never_fires() {
        let (surface, watcher) = setup();
        let (count, make) = counter();

        watcher.register(target(&surface, "a"), Threshold::DEFAULT, make());
        surface.detach("a");

        assert_eq!(watcher.notify(&"a".into(), 1.0), 0);
        assert_eq!(count.get(), 0);
        assert_eq!(watcher.pending_count(), 0);
    }

    #[test]
    fn test_unregister() {
        let (surface, watcher) = setup();
        let (count, make) = counter();

        let handle = watcher.register(target(&surface, "a"), Threshold::DEFAULT, make());
        assert!(watcher.unregister(&handle));
        assert!(!watcher.unregister(&handle));

        watcher.notify(&"a".into(), 1.0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_dispose_drops_everything() {
        let (surface, watcher) = setup();
        let (count, make) = counter();

        watcher.register(target(&surface, "a"), Threshold::DEFAULT, make());
        watcher.register(target(&surface, "b"), Threshold::DEFAULT, make());
        watcher.dispose();

        assert_eq!(watcher.pending_count(), 0);
        watcher.notify(&"a".into(), 1.0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_callback_may_register_more_watches() {
        let (surface, watcher) = setup();
        let (count, make) = counter();
        let inner_cb = make();

        let w = watcher.clone();
        let b = target(&surface, "b");
        watcher.register(target(&surface, "a"), Threshold::DEFAULT, move || {
            w.register(b, Threshold::DEFAULT, inner_cb);
        });

        watcher.notify(&"a".into(), 1.0);
        assert!(watcher.is_watching(&"b".into()));

        watcher.notify(&"b".into(), 1.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_observe_uses_page_geometry() {
        let (surface, watcher) = setup();
        let layout = compute_page_layout(
            1000.0,
            &[Block::leaf("a", 500.0), Block::leaf("b", 500.0), Block::leaf("c", 500.0)],
        )
        .unwrap();
        let fired = Rc::new(RefCell::new(Vec::new()));

        for id in ["a", "b", "c"] {
            let fired = fired.clone();
            watcher.register(target(&surface, id), Threshold::new(0.5).unwrap(), move || {
                fired.borrow_mut().push(id)
            });
        }

        let viewport = Viewport::new(0.0, 600.0);
        assert_eq!(watcher.observe(&layout, &viewport), 1);
        assert_eq!(*fired.borrow(), vec!["a"]);

        // b is [500, 1000): at scroll 300 the band [300, 900) covers 400px
        assert_eq!(watcher.observe(&layout, &viewport.scrolled_to(300.0)), 1);
        assert_eq!(*fired.borrow(), vec!["a", "b"]);

        assert_eq!(watcher.observe(&layout, &viewport.scrolled_to(900.0)), 1);
        assert_eq!(watcher.pending_count(), 0);
    }
}
