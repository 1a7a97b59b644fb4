//! Core types for spark-folio.
//!
//! These types define the vocabulary every component speaks: element ids,
//! geometry, visual state and presentation classes. They flow from the
//! components into a [`Surface`](crate::surface::Surface), which is the only
//! thing that knows how to show them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FolioError;

/// Milliseconds on the [`Timeline`](crate::scheduler::Timeline) clock.
pub type Millis = u64;

// =============================================================================
// Element identity
// =============================================================================

/// Identifies one element on the page (the DOM `id` or a selector-like key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Axis-aligned rectangle in page coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains_y(&self, y: f32) -> bool {
        y >= self.y && y < self.bottom()
    }
}

// =============================================================================
// Visibility threshold
// =============================================================================

/// Fraction of an element's area that must be on screen before it counts as
/// entered. Always in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(f32);

impl Threshold {
    /// Threshold used by the page's scroll reveals.
    pub const DEFAULT: Threshold = Threshold(0.1);

    /// Any visible sliver at all.
    pub const ANY: Threshold = Threshold(f32::MIN_POSITIVE);

    pub fn new(value: f32) -> Result<Self, FolioError> {
        if value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(FolioError::InvalidThreshold(value))
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// True once `ratio` reaches or exceeds the threshold.
    pub fn is_met(self, ratio: f32) -> bool {
        ratio >= self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// =============================================================================
// Visual state
// =============================================================================

/// Presentation attributes a component may animate on a target.
///
/// Mirrors the handful of style properties the page touches: opacity, a
/// vertical translation plus scale, an optional width (skill bars), the
/// transition delay used for staggering, and whether the element is displayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    pub opacity: f32,
    pub translate_y: f32,
    pub scale: f32,
    pub width_percent: Option<f32>,
    pub transition_delay_ms: Millis,
    pub displayed: bool,
}

impl VisualState {
    /// Fully shown, resting position.
    pub const SETTLED: VisualState = VisualState {
        opacity: 1.0,
        translate_y: 0.0,
        scale: 1.0,
        width_percent: None,
        transition_delay_ms: 0,
        displayed: true,
    };

    /// Faded out and pushed down, the state cards start in before a reveal.
    pub const CONCEALED: VisualState = VisualState {
        opacity: 0.0,
        translate_y: 30.0,
        scale: 0.95,
        width_percent: None,
        transition_delay_ms: 0,
        displayed: true,
    };

    pub fn with_delay(mut self, delay_ms: Millis) -> Self {
        self.transition_delay_ms = delay_ms;
        self
    }

    pub fn with_width(mut self, percent: f32) -> Self {
        self.width_percent = Some(percent);
        self
    }

    pub fn with_translate_y(mut self, translate_y: f32) -> Self {
        self.translate_y = translate_y;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::SETTLED
    }
}

// =============================================================================
// Presentation classes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Presentation classes as a bitfield.
    ///
    /// Combine with bitwise OR: `ElementClass::FADE_IN | ElementClass::VISIBLE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ElementClass: u16 {
        const NONE = 0;
        const VISIBLE = 1 << 0;
        const HIDDEN = 1 << 1;
        const ACTIVE = 1 << 2;
        const ERROR = 1 << 3;
        const FADE_IN = 1 << 4;
        const SLIDE_IN_LEFT = 1 << 5;
        const SLIDE_IN_RIGHT = 1 << 6;
        const SCROLLED = 1 << 7;
        const DISABLED = 1 << 8;
    }
}

// =============================================================================
// Severity
// =============================================================================

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_bounds() {
        assert!(Threshold::new(0.0).is_err());
        assert!(Threshold::new(-0.5).is_err());
        assert!(Threshold::new(1.5).is_err());
        assert!(Threshold::new(f32::NAN).is_err());
        assert_eq!(Threshold::new(1.0).unwrap().value(), 1.0);
        assert_eq!(Threshold::default().value(), 0.1);
    }

    #[test]
    fn test_threshold_is_met_inclusive() {
        let t = Threshold::new(0.3).unwrap();
        assert!(!t.is_met(0.29));
        assert!(t.is_met(0.3));
        assert!(t.is_met(1.0));
    }

    #[test]
    fn test_rect_contains_y_half_open() {
        let r = Rect::new(0.0, 100.0, 50.0, 200.0);
        assert!(r.contains_y(100.0));
        assert!(r.contains_y(299.0));
        assert!(!r.contains_y(300.0));
        assert_eq!(r.bottom(), 300.0);
    }

    #[test]
    fn test_element_class_combine() {
        let classes = ElementClass::FADE_IN | ElementClass::VISIBLE;
        assert!(classes.contains(ElementClass::VISIBLE));
        assert!(!classes.contains(ElementClass::ERROR));
    }
}
