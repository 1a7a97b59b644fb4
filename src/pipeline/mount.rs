//! Mount API - Page lifecycle.
//!
//! This module is the entry point for bringing a page to life. It resolves
//! every component against a [`Surface`], registers the visibility watches
//! and, once the loading screen lifts, starts the typing loop on a fresh
//! [`Timeline`].
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::pipeline::{mount, PageSpec};
//!
//! let mut handle = mount(&surface, layout, FolioConfig::default(), catalog, PageSpec::default())?;
//!
//! // Drive it
//! handle.timeline().advance(2000); // loading screen lifts, typing starts
//! handle.scroll_to(900.0);
//!
//! // Clean up
//! handle.unmount();
//! ```

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{Catalog, FilterControl, ModalViewer};
use crate::config::FolioConfig;
use crate::error::Result;
use crate::form::ContactForm;
use crate::layout::{PageLayout, Viewport};
use crate::scheduler::Timeline;
use crate::state::{
    register_counter, register_hero_entrance, register_reveal_group, register_skill_bar,
    CounterSpec, HeroEntrance, LoadingScreen, Navigation, NavigationOptions, Notifier,
    RevealGroup, SkillBarSpec, TypingLoop, TypingSequencer, VisibilityWatcher, WatchHandle,
};
use crate::surface::Surface;
use crate::theme::ThemeCycle;
use crate::types::ElementId;

// =============================================================================
// Page description
// =============================================================================

/// Which elements get which scroll-triggered effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSpec {
    /// Element the typing loop writes into.
    pub typing_sink: ElementId,
    pub viewport_height: f32,
    /// Profile image entrance; `None` skips it.
    pub hero: Option<HeroEntrance>,
    pub reveal_groups: Vec<RevealGroup>,
    pub counters: Vec<CounterSpec>,
    pub skill_bars: Vec<SkillBarSpec>,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            typing_sink: "typingText".into(),
            viewport_height: 800.0,
            hero: Some(HeroEntrance::default()),
            reveal_groups: Vec::new(),
            counters: Vec::new(),
            skill_bars: Vec::new(),
        }
    }
}

impl PageSpec {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

pub const RESUME_NOTICE: &str =
    "Resume download would start here. Contact me for the actual file!";

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`mount`]. Dropping it unmounts the page.
pub struct MountHandle {
    timeline: Timeline,
    watcher: VisibilityWatcher,
    watches: Vec<WatchHandle>,
    loading: LoadingScreen,
    /// Filled in when the loading screen lifts.
    typing: Rc<RefCell<Option<TypingLoop>>>,
    notifier: Notifier,
    theme: ThemeCycle,
    filter: FilterControl,
    modal: ModalViewer,
    form: ContactForm,
    navigation: Navigation,
    layout: PageLayout,
    viewport: Viewport,
    mounted: bool,
}

impl MountHandle {
    /// Scroll the viewport to `scroll_y`.
    ///
    /// Fires the watches of everything now visible and updates navigation.
    /// Returns the number of watches fired.
    pub fn scroll_to(&mut self, scroll_y: f32) -> usize {
        if !self.mounted {
            return 0;
        }
        self.viewport = self.viewport.scrolled_to(scroll_y);
        self.navigation.set_parallax(self.loading.is_loaded());
        let fired = self.watcher.observe(&self.layout, &self.viewport);
        self.navigation.on_scroll(&self.layout, self.viewport.scroll_y);
        fired
    }

    /// Follow a nav link: close the mobile menu and scroll to the section.
    pub fn follow_link(&mut self, section: &ElementId) -> Option<f32> {
        let target = self.navigation.follow_link(&self.layout, section)?;
        self.scroll_to(target);
        Some(target)
    }

    /// The resume button: there is no file to serve, so say so.
    pub fn download_resume(&self) -> u64 {
        self.notifier.info(RESUME_NOTICE)
    }

    /// Page-level key handling. Returns true if the key was consumed.
    pub fn handle_key(&self, key: &str) -> bool {
        self.mounted && self.modal.handle_key(key)
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn watcher(&self) -> &VisibilityWatcher {
        &self.watcher
    }

    /// Watches that were registered at mount (some may have fired since).
    pub fn watches(&self) -> &[WatchHandle] {
        &self.watches
    }

    /// The typing loop, once the page has loaded.
    pub fn typing(&self) -> Option<Ref<'_, TypingLoop>> {
        Ref::filter_map(self.typing.borrow(), Option::as_ref).ok()
    }

    pub fn is_loaded(&self) -> bool {
        self.loading.is_loaded()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn theme(&self) -> &ThemeCycle {
        &self.theme
    }

    pub fn filter(&self) -> &FilterControl {
        &self.filter
    }

    pub fn modal(&self) -> &ModalViewer {
        &self.modal
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut Navigation {
        &mut self.navigation
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Stop the typing loop, drop every pending watch and every queued timer.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        let typing = self.typing.borrow_mut().take();
        if let Some(typing) = typing {
            typing.stop();
        }
        self.watcher.dispose();
        self.notifier.cancel_pending();
        // Queued tasks hold timeline handles of their own
        self.timeline.clear();
        info!("page unmounted");
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Mount the page.
///
/// This sets up:
/// 1. The shared timeline, notifier and loading screen
/// 2. Theme, project filter, project modal and contact form
/// 3. Navigation over the laid-out sections
/// 4. Hero entrance, reveal groups, counters and skill bars on one
///    visibility watcher
/// 5. The typing loop and hero parallax, held until the loading screen lifts
///
/// Then it observes the initial viewport, so anything above the fold
/// animates straight away.
///
/// Fails only on invalid configuration. Missing elements are skipped.
pub fn mount(
    surface: &dyn Surface,
    layout: PageLayout,
    config: FolioConfig,
    catalog: Catalog,
    page: PageSpec,
) -> Result<MountHandle> {
    config.validate()?;
    let threshold = config.watch.threshold()?;

    let timeline = Timeline::new();
    let loading = LoadingScreen::new(surface);
    let notifier = Notifier::new(&timeline, config.notification_ms)
        .with_target(surface.target(&"notification".into()));

    let theme = ThemeCycle::new(
        surface.target(&"document".into()),
        surface.target(&"themeIcon".into()),
        notifier.clone(),
    );

    let projects = catalog.len();
    let catalog = Rc::new(catalog);
    let filter = FilterControl::new(surface, catalog.clone(), notifier.clone(), &timeline);
    let modal = ModalViewer::new(surface, catalog, notifier.clone());
    let form = ContactForm::new(surface, notifier.clone(), &timeline, config.submit_delay_ms);

    let navigation = Navigation::new(
        surface,
        &layout,
        NavigationOptions {
            navbar_height: config.navbar_height,
            scrolled_after: config.navbar_scrolled_after,
            offset: config.nav_offset,
        },
    );

    let watcher = VisibilityWatcher::new();
    let mut watches = Vec::new();
    if let Some(hero) = &page.hero {
        watches.extend(register_hero_entrance(&watcher, surface, hero, &timeline)?);
    }
    for group in &page.reveal_groups {
        watches.extend(register_reveal_group(&watcher, surface, group, threshold));
    }
    watches.extend(
        page.counters
            .iter()
            .filter_map(|spec| register_counter(&watcher, surface, spec, &timeline)),
    );
    watches.extend(
        page.skill_bars
            .iter()
            .filter_map(|spec| register_skill_bar(&watcher, surface, spec, &timeline)),
    );

    let sequencer = match surface.attached_target(&page.typing_sink) {
        Some(sink) => Some(TypingSequencer::new(&config.typing, sink)?),
        None => {
            debug!(sink = %page.typing_sink, "typing sink missing, not typing");
            None
        }
    };
    let has_typing = sequencer.is_some();
    let typing: Rc<RefCell<Option<TypingLoop>>> = Rc::default();
    {
        let slot = typing.clone();
        let tl = timeline.clone();
        loading.finish_after(&timeline, config.load_delay_ms, move || {
            if let Some(sequencer) = sequencer {
                *slot.borrow_mut() = Some(TypingLoop::start(sequencer, &tl));
            }
        });
    }

    let viewport = Viewport::new(0.0, page.viewport_height)
        .with_root_margin_bottom(config.watch.root_margin_bottom);

    info!(
        watches = watches.len(),
        projects,
        typing = has_typing,
        "page mounted"
    );

    let mut handle = MountHandle {
        timeline,
        watcher,
        watches,
        loading,
        typing,
        notifier,
        theme,
        filter,
        modal,
        form,
        navigation,
        layout,
        viewport,
        mounted: true,
    };
    handle.scroll_to(0.0);
    Ok(handle)
}
