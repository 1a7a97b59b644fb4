//! Notifications - One transient toast at a time.
//!
//! `show(message, severity)` replaces whatever is showing and schedules an
//! auto-dismiss on the timeline. The current notification is a reactive
//! [`Signal`], so anything rendering toasts can track it.
//!
//! # Example
//!
//! ```ignore
//! let notifier = Notifier::new(&timeline, 4500);
//! notifier.show("Message sent successfully!", Severity::Success);
//! timeline.advance(4500); // gone
//! ```

use std::cell::Cell;
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::debug;

use crate::scheduler::{TimerId, Timeline};
use crate::surface::{live, RenderTarget};
use crate::types::{ElementClass, Millis, Severity};

/// A visible toast.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
}

#[derive(Clone)]
pub struct Notifier {
    current: Signal<Option<Notification>>,
    timeline: Timeline,
    duration_ms: Millis,
    next_id: Rc<Cell<u64>>,
    dismiss_timer: Rc<Cell<Option<TimerId>>>,
    /// Optional element the toast is mirrored into.
    target: Option<Rc<dyn RenderTarget>>,
}

impl Notifier {
    pub fn new(timeline: &Timeline, duration_ms: Millis) -> Self {
        Self {
            current: signal(None),
            timeline: timeline.clone(),
            duration_ms,
            next_id: Rc::new(Cell::new(0)),
            dismiss_timer: Rc::new(Cell::new(None)),
            target: None,
        }
    }

    /// Mirror notifications into `target` (text, severity attribute, VISIBLE).
    pub fn with_target(mut self, target: Option<Rc<dyn RenderTarget>>) -> Self {
        self.target = target;
        self
    }

    /// Show `message`, clearing any previous notification.
    pub fn show(&self, message: impl Into<String>, severity: Severity) -> u64 {
        self.cancel_pending();

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let notification = Notification {
            id,
            message: message.into(),
            severity,
        };
        debug!(id, severity = severity.as_str(), message = %notification.message, "notify");

        if let Some(target) = live(&self.target) {
            target.set_text(&notification.message);
            target.set_attribute("data-severity", severity.as_str());
            target.add_class(ElementClass::VISIBLE);
        }
        self.current.set(Some(notification));

        // The queued task must not own the timeline it sits in
        let current = self.current.clone();
        let target = self.target.clone();
        let dismiss_timer = self.dismiss_timer.clone();
        let timer = self.timeline.schedule(self.duration_ms, move || {
            dismiss_timer.set(None);
            if current.get().is_some_and(|n| n.id == id) {
                clear_toast(&current, &target);
            }
        });
        self.dismiss_timer.set(Some(timer));
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.show(message, Severity::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.show(message, Severity::Error)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.show(message, Severity::Warning)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.show(message, Severity::Info)
    }

    /// Hide the current notification now.
    pub fn dismiss(&self) {
        self.cancel_pending();
        clear_toast(&self.current, &self.target);
    }

    /// Cancel a pending auto-dismiss without touching what is shown.
    pub fn cancel_pending(&self) {
        if let Some(timer) = self.dismiss_timer.take() {
            self.timeline.cancel(timer);
        }
    }

    pub fn current(&self) -> Option<Notification> {
        self.current.get()
    }

    /// Reactive handle on the current notification.
    pub fn signal(&self) -> Signal<Option<Notification>> {
        self.current.clone()
    }
}

fn clear_toast(current: &Signal<Option<Notification>>, target: &Option<Rc<dyn RenderTarget>>) {
    if let Some(target) = live(target) {
        target.remove_class(ElementClass::VISIBLE);
        target.set_text("");
    }
    current.set(None);
}
