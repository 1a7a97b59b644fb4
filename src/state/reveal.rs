//! Scroll reveals - staggered entrance transitions for groups of elements.
//!
//! Each element of a [`RevealGroup`] gets the group's entry class and a
//! transition delay of `index * stagger_ms`, starts concealed, and settles
//! (gaining `VISIBLE`) the first time it scrolls into view.
//!
//! The hero has its own [`HeroEntrance`]: when the profile container is seen,
//! the image frame rises in after a short delay and the hero elements follow
//! one by one.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::visibility::{VisibilityWatcher, WatchHandle};
use crate::error::Result;
use crate::scheduler::Timeline;
use crate::surface::{live, RenderTarget, Surface};
use crate::types::{ElementClass, ElementId, Millis, Threshold, VisualState};

/// Entry animation for a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealStyle {
    FadeIn,
    SlideInLeft,
    SlideInRight,
}

impl RevealStyle {
    pub fn class(self) -> ElementClass {
        match self {
            Self::FadeIn => ElementClass::FADE_IN,
            Self::SlideInLeft => ElementClass::SLIDE_IN_LEFT,
            Self::SlideInRight => ElementClass::SLIDE_IN_RIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealGroup {
    pub style: RevealStyle,
    pub stagger_ms: Millis,
    pub elements: Vec<ElementId>,
}

impl RevealGroup {
    pub fn new<I, S>(style: RevealStyle, stagger_ms: Millis, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ElementId>,
    {
        Self {
            style,
            stagger_ms,
            elements: elements.into_iter().map(Into::into).collect(),
        }
    }
}

/// Prepare every element of `group` and watch it.
///
/// Missing or detached elements are skipped; the returned handles cover only
/// the elements actually being watched.
pub fn register_reveal_group(
    watcher: &VisibilityWatcher,
    surface: &dyn Surface,
    group: &RevealGroup,
    threshold: Threshold,
) -> Vec<WatchHandle> {
    group
        .elements
        .iter()
        .enumerate()
        .filter_map(|(index, id)| {
            let target = surface.attached_target(id)?;
            let delay = index as Millis * group.stagger_ms;

            target.add_class(group.style.class());
            target.set_visual_state(VisualState::CONCEALED.with_delay(delay));

            let reveal_target = target.clone();
            Some(watcher.register(target, threshold, move || {
                reveal(&*reveal_target, delay)
            }))
        })
        .collect()
}

fn reveal(target: &dyn RenderTarget, delay: Millis) {
    if !target.is_attached() {
        return;
    }
    target.add_class(ElementClass::VISIBLE);
    target.set_visual_state(VisualState::SETTLED.with_delay(delay));
}

// =============================================================================
// HERO ENTRANCE
// =============================================================================

pub const HERO_FRAME_DELAY_MS: Millis = 200;
pub const HERO_BASE_DELAY_MS: Millis = 400;
pub const HERO_STAGGER_MS: Millis = 200;

const FRAME_START: VisualState = VisualState {
    opacity: 0.0,
    translate_y: 50.0,
    scale: 0.8,
    ..VisualState::SETTLED
};

const ELEMENT_START: VisualState = VisualState {
    opacity: 0.0,
    translate_y: 30.0,
    ..VisualState::SETTLED
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroEntrance {
    /// Watched element.
    pub container: ElementId,
    pub frame: ElementId,
    /// Entered in order, `HERO_STAGGER_MS` apart.
    pub elements: Vec<ElementId>,
    pub threshold: f32,
}

impl Default for HeroEntrance {
    fn default() -> Self {
        Self {
            container: "profileContainer".into(),
            frame: "profileFrame".into(),
            elements: [
                "hero-title",
                "hero-subtitle",
                "hero-description",
                "hero-buttons",
                "social-links",
            ]
            .into_iter()
            .map(ElementId::from)
            .collect(),
            threshold: 0.3,
        }
    }
}

/// Watch the hero container and play the entrance once it is seen.
///
/// `Ok(None)` if the container is missing. Fails only on a bad threshold.
pub fn register_hero_entrance(
    watcher: &VisibilityWatcher,
    surface: &dyn Surface,
    hero: &HeroEntrance,
    timeline: &Timeline,
) -> Result<Option<WatchHandle>> {
    let threshold = Threshold::new(hero.threshold)?;
    let Some(container) = surface.attached_target(&hero.container) else {
        debug!(container = %hero.container, "hero container missing");
        return Ok(None);
    };

    let frame = surface.target(&hero.frame);
    // Missing elements keep their slot in the stagger
    let elements: Vec<_> = hero.elements.iter().map(|id| surface.target(id)).collect();
    let timeline = timeline.clone();

    Ok(Some(watcher.register(container, threshold, move || {
        if let Some(frame) = live(&frame) {
            frame.set_visual_state(FRAME_START);
            settle_after(&timeline, frame.clone(), HERO_FRAME_DELAY_MS);
        }
        for (index, element) in elements.iter().enumerate() {
            if let Some(element) = live(element) {
                element.set_visual_state(ELEMENT_START);
                let delay = HERO_BASE_DELAY_MS + index as Millis * HERO_STAGGER_MS;
                settle_after(&timeline, element.clone(), delay);
            }
        }
    })))
}

fn settle_after(timeline: &Timeline, target: Rc<dyn RenderTarget>, delay: Millis) {
    timeline.schedule(delay, move || {
        if target.is_attached() {
            target.set_visual_state(VisualState::SETTLED);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    fn setup() -> (MemorySurface, VisibilityWatcher) {
        let surface = MemorySurface::new();
        surface.insert_all(["card-0", "card-1", "card-2"]);
        (surface, VisibilityWatcher::new())
    }

    #[test]
    fn test_prepares_with_stagger() {
        let (surface, watcher) = setup();
        let group = RevealGroup::new(RevealStyle::FadeIn, 200, ["card-0", "card-1", "card-2"]);

        let handles = register_reveal_group(&watcher, &surface, &group, Threshold::DEFAULT);
        assert_eq!(handles.len(), 3);

        for (i, id) in ["card-0", "card-1", "card-2"].iter().enumerate() {
            let e = surface.element(*id).unwrap();
            assert!(e.has_class(ElementClass::FADE_IN));
            assert!(!e.has_class(ElementClass::VISIBLE));
            assert_eq!(e.visual_state().opacity, 0.0);
            assert_eq!(e.visual_state().transition_delay_ms, i as Millis * 200);
        }
    }

    #[test]
    fn test_reveals_once_visible() {
        let (surface, watcher) = setup();
        let group = RevealGroup::new(RevealStyle::SlideInLeft, 150, ["card-0", "card-1"]);
        register_reveal_group(&watcher, &surface, &group, Threshold::DEFAULT);

        watcher.notify(&"card-1".into(), 0.5);

        let revealed = surface.element("card-1").unwrap();
        assert!(revealed.has_class(ElementClass::VISIBLE | ElementClass::SLIDE_IN_LEFT));
        assert_eq!(revealed.visual_state().opacity, 1.0);
        assert_eq!(revealed.visual_state().translate_y, 0.0);
        assert_eq!(revealed.visual_state().transition_delay_ms, 150);

        let waiting = surface.element("card-0").unwrap();
        assert!(!waiting.has_class(ElementClass::VISIBLE));
    }

    #[test]
    fn test_missing_elements_skipped() {
        let (surface, watcher) = setup();
        let group = RevealGroup::new(RevealStyle::SlideInRight, 100, ["card-0", "ghost"]);

        let handles = register_reveal_group(&watcher, &surface, &group, Threshold::DEFAULT);

        assert_eq!(handles.len(), 1);
        assert!(handles.iter().all(|h| !h.is_inert()));
        assert_eq!(watcher.pending_count(), 1);
    }

    #[test]
    fn test_hero_entrance_staggers_after_frame() {
        let surface = MemorySurface::new();
        surface.insert_all(["profileContainer", "profileFrame", "hero-title", "social-links"]);
        let watcher = VisibilityWatcher::new();
        let timeline = Timeline::new();
        let hero = HeroEntrance::default();

        let handle = register_hero_entrance(&watcher, &surface, &hero, &timeline)
            .unwrap()
            .unwrap();
        assert!(!handle.is_inert());

        // Below the 0.3 threshold
        assert_eq!(watcher.notify(&"profileContainer".into(), 0.2), 0);
        assert_eq!(watcher.notify(&"profileContainer".into(), 0.3), 1);

        let frame = surface.element("profileFrame").unwrap();
        let title = surface.element("hero-title").unwrap();
        let links = surface.element("social-links").unwrap();
        assert_eq!(frame.visual_state().scale, 0.8);
        assert_eq!(title.visual_state().opacity, 0.0);
        assert_eq!(title.visual_state().translate_y, 30.0);

        timeline.advance(HERO_FRAME_DELAY_MS);
        assert_eq!(frame.visual_state(), VisualState::SETTLED);
        assert_eq!(title.visual_state().opacity, 0.0);

        timeline.advance(HERO_BASE_DELAY_MS - HERO_FRAME_DELAY_MS);
        assert_eq!(title.visual_state(), VisualState::SETTLED);
        assert_eq!(links.visual_state().opacity, 0.0);

        // social-links is fifth in line even with the middle three missing
        timeline.advance(4 * HERO_STAGGER_MS - 1);
        assert_eq!(links.visual_state().opacity, 0.0);
        timeline.advance(1);
        assert_eq!(links.visual_state(), VisualState::SETTLED);
    }

    #[test]
    fn test_hero_entrance_without_container() {
        let surface = MemorySurface::new();
        let watcher = VisibilityWatcher::new();
        let hero = HeroEntrance::default();
        assert!(register_hero_entrance(&watcher, &surface, &hero, &Timeline::new())
            .unwrap()
            .is_none());

        let bad = HeroEntrance {
            threshold: 1.5,
            ..HeroEntrance::default()
        };
        assert!(register_hero_entrance(&watcher, &surface, &bad, &Timeline::new()).is_err());
    }

    #[test]
    fn test_style_deserializes_kebab_case() {
        let style: RevealStyle = serde_json::from_str("\"slide-in-left\"").unwrap();
        assert_eq!(style, RevealStyle::SlideInLeft);
    }
}
