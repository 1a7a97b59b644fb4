//! # spark-folio
//!
//! Interactive behaviour for a single-page portfolio.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! observable component state.
//!
//! ## Architecture
//!
//! Components never talk to a rendering backend directly. They resolve
//! render targets from a [`Surface`](surface::Surface) once and mutate them
//! through a small capability interface. All time-based behaviour runs on a
//! deterministic [`Timeline`](scheduler::Timeline), and scroll-triggered
//! effects run off one [`VisibilityWatcher`](state::VisibilityWatcher) fed by
//! Taffy-computed page geometry.
//!
//! ```text
//! Blocks → taffy → PageLayout ─┐
//!                              ├→ VisibilityWatcher → reveal / counters / skill bars
//! scroll offset → Viewport ────┘
//! Timeline → typing loop, notifications, filter transitions, form submit
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (ElementId, Rect, Threshold, VisualState, ElementClass)
//! - [`surface`] - Render-target capability interface + in-memory surface
//! - [`scheduler`] - Virtual-clock timer queue
//! - [`layout`] - Taffy page layout and viewport intersection
//! - [`state`] - Visibility, typing, notifications, reveal, counters, navigation
//! - [`catalog`] - Project records, filter and modal
//! - [`form`] - Contact form validation and submission
//! - [`theme`] - Theme variant cycle
//! - [`pipeline`] - Mounting a page

pub mod catalog;
pub mod config;
pub mod error;
pub mod form;
pub mod layout;
pub mod pipeline;
pub mod scheduler;
pub mod state;
pub mod surface;
pub mod theme;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use catalog::{Catalog, Filter, FilterControl, ModalViewer, ProjectRecord};
pub use config::{FolioConfig, TypingConfig, WatchConfig};
pub use error::{FolioError, Result};
pub use form::{ContactForm, Field, FieldError, FormInput, SubmitOutcome};
pub use layout::{compute_page_layout, intersection_ratio, Block, PageLayout, Viewport};
pub use pipeline::{mount, MountHandle, PageSpec, RESUME_NOTICE};
pub use scheduler::{TimerId, Timeline};
pub use state::{
    HeroEntrance, LoadingScreen, Navigation, Notification, Notifier, RevealGroup, RevealStyle,
    Step, TypingLoop, TypingPhase, TypingSequencer, VisibilityWatcher, WatchHandle,
};
pub use surface::{MemoryElement, MemorySurface, RenderTarget, Surface};
pub use theme::{ThemeCycle, ThemeVariant};
