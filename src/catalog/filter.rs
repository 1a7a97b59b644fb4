//! Filter control - show project cards of one category (or all of them).
//!
//! Matching cards are shown and fade in with a 150 ms stagger; the rest fade
//! out and are removed from the flow 400 ms later. The selected filter button
//! is marked `ACTIVE` and the visible count is announced.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::debug;

use super::{card_id, Catalog};
use crate::scheduler::{TimerId, Timeline};
use crate::state::Notifier;
use crate::surface::{set_class, RenderTarget, Surface};
use crate::types::{ElementClass, ElementId, Millis, VisualState};

pub const SHOW_STAGGER_MS: Millis = 150;
pub const HIDE_DELAY_MS: Millis = 400;

// =============================================================================
// Filter
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Category(String),
}

impl Filter {
    /// `"all"` is the wildcard; anything else is a category tag.
    pub fn parse(tag: &str) -> Self {
        if tag == "all" {
            Self::All
        } else {
            Self::Category(tag.to_string())
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Category(tag) => tag,
        }
    }

    /// Exact tag equality.
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Category(tag) => tag == category,
        }
    }

    /// Announcement for `count` visible projects.
    pub fn summary(&self, count: usize) -> String {
        let plural = if count == 1 { "" } else { "s" };
        match self {
            Self::All => format!("Showing {count} project{plural}"),
            Self::Category(tag) => format!("Showing {count} {tag} project{plural}"),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Element id of the button selecting `filter`.
pub fn filter_button_id(filter: &Filter) -> ElementId {
    ElementId::new(format!("filter-{}", filter.tag()))
}

// =============================================================================
// FilterControl
// =============================================================================

struct Card {
    category: String,
    target: Rc<dyn RenderTarget>,
}

pub struct FilterControl {
    catalog: Rc<Catalog>,
    cards: Vec<Card>,
    buttons: Vec<(Filter, Rc<dyn RenderTarget>)>,
    active: Signal<Filter>,
    notifier: Notifier,
    timeline: Timeline,
    /// Transition timers from the last `apply`, cancelled by the next one.
    transitions: RefCell<Vec<TimerId>>,
}

impl FilterControl {
    pub fn new(
        surface: &dyn Surface,
        catalog: Rc<Catalog>,
        notifier: Notifier,
        timeline: &Timeline,
    ) -> Self {
        let cards = catalog
            .iter()
            .enumerate()
            .filter_map(|(i, record)| {
                surface.target(&card_id(i)).map(|target| Card {
                    category: record.category.clone(),
                    target,
                })
            })
            .collect();

        let buttons = std::iter::once(Filter::All)
            .chain(catalog.categories().into_iter().map(Filter::parse))
            .filter_map(|filter| {
                surface
                    .target(&filter_button_id(&filter))
                    .map(|button| (filter, button))
            })
            .collect();

        let control = Self {
            catalog,
            cards,
            buttons,
            active: signal(Filter::All),
            notifier,
            timeline: timeline.clone(),
            transitions: RefCell::new(Vec::new()),
        };
        control.show_all_now();
        control
    }

    /// Make every card visible immediately (page load).
    pub fn show_all_now(&self) {
        for card in self.live_cards() {
            card.target.remove_class(ElementClass::HIDDEN);
            card.target.set_visual_state(VisualState::SETTLED);
        }
    }

    /// Select `filter`. Returns the number of projects it shows.
    pub fn apply(&self, filter: Filter) -> usize {
        for timer in self.transitions.borrow_mut().drain(..) {
            self.timeline.cancel(timer);
        }

        for (button_filter, button) in &self.buttons {
            if button.is_attached() {
                set_class(&**button, ElementClass::ACTIVE, *button_filter == filter);
            }
        }

        let mut timers = Vec::new();
        for (index, card) in self.cards.iter().enumerate() {
            if !card.target.is_attached() {
                continue;
            }
            let target = card.target.clone();
            if filter.matches(&card.category) {
                target.set_visual_state(VisualState::CONCEALED);
                target.remove_class(ElementClass::HIDDEN);
                timers.push(self.timeline.schedule(
                    index as Millis * SHOW_STAGGER_MS,
                    move || {
                        if target.is_attached() {
                            target.set_visual_state(VisualState::SETTLED);
                        }
                    },
                ));
            } else {
                target.set_visual_state(VisualState::CONCEALED);
                timers.push(self.timeline.schedule(HIDE_DELAY_MS, move || {
                    if target.is_attached() {
                        target.set_visual_state(VisualState::CONCEALED.hidden());
                        target.add_class(ElementClass::HIDDEN);
                    }
                }));
            }
        }
        *self.transitions.borrow_mut() = timers;

        let count = self.catalog.count_in(&filter);
        debug!(filter = %filter, count, "filter applied");
        self.notifier.info(filter.summary(count));
        self.active.set(filter);
        count
    }

    pub fn active(&self) -> Filter {
        self.active.get()
    }

    pub fn signal(&self) -> Signal<Filter> {
        self.active.clone()
    }

    fn live_cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(|c| c.target.is_attached())
    }
}
