//! Theme System for spark-folio.
//!
//! The page ships four colour variants that the theme toggle cycles through:
//!
//! ```text
//! modern -> modern-blue -> modern-purple -> modern-teal -> modern
//! ```
//!
//! The active variant is written to the root element's `data-theme`
//! attribute, its icon to the toggle, and held in a reactive [`Signal`].

use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::debug;

use crate::state::Notifier;
use crate::surface::{live, RenderTarget};

// =============================================================================
// ThemeVariant
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Modern,
    ModernBlue,
    ModernPurple,
    ModernTeal,
}

impl ThemeVariant {
    pub const ALL: [ThemeVariant; 4] = [
        Self::Modern,
        Self::ModernBlue,
        Self::ModernPurple,
        Self::ModernTeal,
    ];

    /// Value of the `data-theme` attribute.
    pub fn name(self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::ModernBlue => "modern-blue",
            Self::ModernPurple => "modern-purple",
            Self::ModernTeal => "modern-teal",
        }
    }

    /// Human-readable name ("modern blue").
    pub fn label(self) -> String {
        self.name().replacen('-', " ", 1)
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Modern => "🌙",
            Self::ModernBlue => "🌊",
            Self::ModernPurple => "🌌",
            Self::ModernTeal => "✨",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Modern => Self::ModernBlue,
            Self::ModernBlue => Self::ModernPurple,
            Self::ModernPurple => Self::ModernTeal,
            Self::ModernTeal => Self::Modern,
        }
    }

    /// Parse a `data-theme` value. Unknown values fall back to `Modern`.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|v| v.name() == name)
            .unwrap_or_default()
    }
}

// =============================================================================
// ThemeCycle
// =============================================================================

/// The theme toggle.
pub struct ThemeCycle {
    active: Signal<ThemeVariant>,
    root: Option<Rc<dyn RenderTarget>>,
    icon: Option<Rc<dyn RenderTarget>>,
    notifier: Notifier,
}

impl ThemeCycle {
    /// Apply the default variant to `root` and get ready to toggle.
    pub fn new(
        root: Option<Rc<dyn RenderTarget>>,
        icon: Option<Rc<dyn RenderTarget>>,
        notifier: Notifier,
    ) -> Self {
        let cycle = Self {
            active: signal(ThemeVariant::default()),
            root,
            icon,
            notifier,
        };
        cycle.apply(ThemeVariant::default());
        cycle
    }

    pub fn active(&self) -> ThemeVariant {
        self.active.get()
    }

    pub fn signal(&self) -> Signal<ThemeVariant> {
        self.active.clone()
    }

    /// Switch to the next variant and announce it.
    pub fn toggle(&self) -> ThemeVariant {
        let next = self.active.get().next();
        self.apply(next);
        if let Some(icon) = live(&self.icon) {
            icon.set_text(next.icon());
        }
        self.notifier
            .success(format!("Switched to {} theme", next.label()));
        debug!(theme = next.name(), "theme toggled");
        next
    }

    fn apply(&self, variant: ThemeVariant) {
        if let Some(root) = live(&self.root) {
            root.set_attribute("data-theme", variant.name());
        }
        self.active.set(variant);
    }
}
