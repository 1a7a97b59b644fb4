//! Page Pipeline
//!
//! Connects the components to a surface and drives them:
//!
//! ```text
//! Surface + PageLayout + FolioConfig + Catalog → mount → MountHandle
//!                                                          ├─ scroll_to → watcher + navigation
//!                                                          └─ timeline  → typing, counters, toasts
//! ```

pub mod mount;

pub use mount::{mount, MountHandle, PageSpec, RESUME_NOTICE};
