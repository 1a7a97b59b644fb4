//! State Module - Interactive behaviour of the page
//!
//! Every component here mutates the page only through render targets and
//! schedules its time-based work on the shared [`Timeline`](crate::scheduler::Timeline):
//!
//! - **Loading** - Loading-screen gate before the page comes alive
//! - **Visibility** - One-shot "first became visible" watches
//! - **Typing** - The typing/deleting headline loop
//! - **Notification** - Single transient toast with auto-dismiss
//! - **Reveal** - Staggered fade/slide-in groups and the hero entrance
//! - **Counter** - Count-up statistics and skill bars
//! - **Navigation** - Navbar state, active section, anchors, parallax

pub mod counter;
pub mod loading;
pub mod navigation;
pub mod notification;
pub mod reveal;
pub mod typing;
pub mod visibility;

pub use counter::{register_counter, register_skill_bar, CounterSpec, SkillBarSpec};
pub use loading::LoadingScreen;
pub use navigation::{Navigation, NavigationOptions};
pub use notification::{Notification, Notifier};
pub use reveal::{
    register_hero_entrance, register_reveal_group, HeroEntrance, RevealGroup, RevealStyle,
};
pub use typing::{Step, TypingLoop, TypingPhase, TypingSequencer};
pub use visibility::{VisibilityWatcher, WatchHandle, WatchId};
