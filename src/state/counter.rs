//! Stat counters and skill bars - value animations started on first sight.
//!
//! - A counter counts from 0 to its target in [`COUNTER_STEPS`] equal steps,
//!   one every [`COUNTER_TICK_MS`], writing the floored value and finally the
//!   exact target, then pulses its scale.
//! - A skill bar grows to its target width [`SKILL_BAR_DELAY_MS`] after it
//!   becomes visible.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::visibility::{VisibilityWatcher, WatchHandle};
use crate::scheduler::Timeline;
use crate::surface::{RenderTarget, Surface};
use crate::types::{ElementId, Millis, Threshold, VisualState};

pub const COUNTER_STEPS: u64 = 60;
pub const COUNTER_TICK_MS: Millis = 25;
pub const COUNTER_PULSE_MS: Millis = 200;
pub const SKILL_BAR_DELAY_MS: Millis = 300;

// =============================================================================
// COUNTERS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterSpec {
    pub id: ElementId,
    pub target: u64,
}

/// Value shown after `step` of [`COUNTER_STEPS`].
pub fn counter_value(target: u64, step: u64) -> u64 {
    if step >= COUNTER_STEPS {
        target
    } else {
        // Widened so large targets cannot overflow; the quotient fits back in u64
        (u128::from(target) * u128::from(step) / u128::from(COUNTER_STEPS)) as u64
    }
}

/// Start counting `element` up to `target` right now.
pub fn animate_counter(element: Rc<dyn RenderTarget>, target: u64, timeline: &Timeline) {
    schedule_tick(element, target, 1, timeline.clone());
}

fn schedule_tick(element: Rc<dyn RenderTarget>, target: u64, step: u64, timeline: Timeline) {
    let next = timeline.clone();
    timeline.schedule(COUNTER_TICK_MS, move || {
        if !element.is_attached() {
            return;
        }
        element.set_text(&counter_value(target, step).to_string());

        if step < COUNTER_STEPS {
            schedule_tick(element, target, step + 1, next);
            return;
        }

        let mut pulse = VisualState::SETTLED;
        pulse.scale = 1.1;
        element.set_visual_state(pulse);
        next.schedule(COUNTER_PULSE_MS, move || {
            if element.is_attached() {
                element.set_visual_state(VisualState::SETTLED);
            }
        });
    });
}

/// Watch a counter and animate it once it appears.
pub fn register_counter(
    watcher: &VisibilityWatcher,
    surface: &dyn Surface,
    spec: &CounterSpec,
    timeline: &Timeline,
) -> Option<WatchHandle> {
    let target = surface.attached_target(&spec.id)?;
    let element = target.clone();
    let value = spec.target;
    let timeline = timeline.clone();
    Some(watcher.register(target, Threshold::ANY, move || {
        animate_counter(element, value, &timeline)
    }))
}

// =============================================================================
// SKILL BARS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillBarSpec {
    pub id: ElementId,
    pub width_percent: f32,
}

/// Watch a skill bar and fill it once it appears.
pub fn register_skill_bar(
    watcher: &VisibilityWatcher,
    surface: &dyn Surface,
    spec: &SkillBarSpec,
    timeline: &Timeline,
) -> Option<WatchHandle> {
    let target = surface.attached_target(&spec.id)?;
    target.set_visual_state(VisualState::SETTLED.with_width(0.0));

    let element = target.clone();
    let width = spec.width_percent.clamp(0.0, 100.0);
    let timeline = timeline.clone();
    Some(watcher.register(target, Threshold::ANY, move || {
        timeline.schedule(SKILL_BAR_DELAY_MS, move || {
            if element.is_attached() {
                element.set_visual_state(VisualState::SETTLED.with_width(width));
            }
        });
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    fn setup() -> (MemorySurface, VisibilityWatcher, Timeline) {
        let surface = MemorySurface::new();
        surface.insert_all(["projects-stat", "python-bar"]);
        (surface, VisibilityWatcher::new(), Timeline::new())
    }

    #[test]
    fn test_counter_value_steps() {
        assert_eq!(counter_value(120, 0), 0);
        assert_eq!(counter_value(120, 30), 60);
        assert_eq!(counter_value(7, 59), 6);
        assert_eq!(counter_value(7, 60), 7);
        assert_eq!(counter_value(7, 99), 7);
    }

    #[test]
    fn test_counter_value_huge_target() {
        assert_eq!(counter_value(u64::MAX / 10, 30), u64::MAX / 20);
        assert_eq!(counter_value(u64::MAX, 59), u64::MAX / 60 * 59 + 59 * (u64::MAX % 60) / 60);
        assert_eq!(counter_value(u64::MAX, 60), u64::MAX);
        assert!(counter_value(u64::MAX, 1) < counter_value(u64::MAX, 2));
    }

    #[test]
    fn test_counter_starts_when_visible_and_lands_on_target() {
        let (surface, watcher, timeline) = setup();
        let spec = CounterSpec {
            id: "projects-stat".into(),
            target: 15,
        };
        register_counter(&watcher, &surface, &spec, &timeline).unwrap();

        // Nothing until it is seen
        timeline.advance(1000);
        let element = surface.element("projects-stat").unwrap();
        assert_eq!(element.text_writes(), 0);

        watcher.notify(&"projects-stat".into(), 0.01);
        timeline.advance(COUNTER_TICK_MS * 30);
        assert_eq!(element.text(), "7");

        timeline.advance(COUNTER_TICK_MS * 30);
        assert_eq!(element.text(), "15");
        assert_eq!(element.text_writes(), 60);
        assert_eq!(element.visual_state().scale, 1.1);

        timeline.advance(COUNTER_PULSE_MS);
        assert_eq!(element.visual_state().scale, 1.0);
        assert_eq!(timeline.pending(), 0);
    }

    #[test]
    fn test_counter_stops_when_detached() {
        let (surface, _watcher, timeline) = setup();
        let element = surface.insert("projects-stat");
        animate_counter(surface.target(&"projects-stat".into()).unwrap(), 100, &timeline);

        timeline.advance(COUNTER_TICK_MS * 3);
        surface.detach("projects-stat");
        timeline.advance(10_000);

        assert_eq!(element.text_writes(), 3);
        assert_eq!(timeline.pending(), 0);
    }

    #[test]
    fn test_skill_bar_fills_after_delay() {
        let (surface, watcher, timeline) = setup();
        let spec = SkillBarSpec {
            id: "python-bar".into(),
            width_percent: 90.0,
        };
        register_skill_bar(&watcher, &surface, &spec, &timeline).unwrap();
        let element = surface.element("python-bar").unwrap();
        assert_eq!(element.visual_state().width_percent, Some(0.0));

        watcher.notify(&"python-bar".into(), 1.0);
        timeline.advance(SKILL_BAR_DELAY_MS - 1);
        assert_eq!(element.visual_state().width_percent, Some(0.0));

        timeline.advance(1);
        assert_eq!(element.visual_state().width_percent, Some(90.0));
    }

    #[test]
    fn test_missing_elements_not_registered() {
        let (surface, watcher, timeline) = setup();
        let spec = CounterSpec {
            id: "nope".into(),
            target: 3,
        };
        assert!(register_counter(&watcher, &surface, &spec, &timeline).is_none());
        assert_eq!(watcher.pending_count(), 0);
    }
}
