//! Navigation - Scroll-driven navbar state, active link and anchor targets.
//!
//! Pure functions of the scroll offset and page geometry, plus a small
//! [`Navigation`] component that applies them to the navbar, the nav links
//! (`nav-<section>`), the mobile menu and the hero parallax layer.

use std::rc::Rc;

use tracing::debug;

use crate::layout::PageLayout;
use crate::surface::{live, set_class, RenderTarget, Surface};
use crate::types::{ElementClass, ElementId, VisualState};

/// Parallax rate of the hero background relative to scrolling.
pub const PARALLAX_RATE: f32 = -0.5;

/// Section containing `scroll_y + offset`, in document order.
pub fn active_section(layout: &PageLayout, scroll_y: f32, offset: f32) -> Option<ElementId> {
    let line = scroll_y + offset;
    layout
        .sections()
        .filter(|(_, rect)| rect.contains_y(line))
        .last()
        .map(|(id, _)| id.clone())
}

/// Scroll offset that puts `section` just below a fixed navbar.
pub fn anchor_scroll_target(layout: &PageLayout, section: &ElementId, navbar_height: f32) -> Option<f32> {
    layout
        .rect(section)
        .map(|rect| (rect.y - navbar_height).max(0.0))
}

/// Id of the nav link pointing at `section`.
pub fn nav_link_id(section: &ElementId) -> ElementId {
    ElementId::new(format!("nav-{section}"))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationOptions {
    pub navbar_height: f32,
    pub scrolled_after: f32,
    pub offset: f32,
}

pub struct Navigation {
    options: NavigationOptions,
    navbar: Option<Rc<dyn RenderTarget>>,
    menu: Option<Rc<dyn RenderTarget>>,
    hamburger: Option<Rc<dyn RenderTarget>>,
    hero_background: Option<Rc<dyn RenderTarget>>,
    /// (section, link) pairs in document order.
    links: Vec<(ElementId, Rc<dyn RenderTarget>)>,
    menu_open: bool,
    parallax: bool,
    active: Option<ElementId>,
}

impl Navigation {
    pub fn new(surface: &dyn Surface, layout: &PageLayout, options: NavigationOptions) -> Self {
        let links = layout
            .sections()
            .filter_map(|(section, _)| {
                surface
                    .target(&nav_link_id(section))
                    .map(|link| (section.clone(), link))
            })
            .collect();

        Self {
            options,
            navbar: surface.target(&"navbar".into()),
            menu: surface.target(&"navMenu".into()),
            hamburger: surface.target(&"navHamburger".into()),
            hero_background: surface.target(&"heroBackground".into()),
            links,
            menu_open: false,
            parallax: true,
            active: None,
        }
    }

    /// Apply every scroll-dependent effect for offset `scroll_y`.
    pub fn on_scroll(&mut self, layout: &PageLayout, scroll_y: f32) {
        if let Some(navbar) = live(&self.navbar) {
            set_class(&**navbar, ElementClass::SCROLLED, scroll_y > self.options.scrolled_after);
        }

        if let Some(bg) = live(&self.hero_background).filter(|_| self.parallax) {
            bg.set_visual_state(VisualState::SETTLED.with_translate_y(scroll_y * PARALLAX_RATE));
        }

        // Leave the highlight alone between sections
        if let Some(section) = active_section(layout, scroll_y, self.options.offset) {
            if self.active.as_ref() != Some(&section) {
                debug!(section = %section, "active section");
                for (id, link) in &self.links {
                    if link.is_attached() {
                        set_class(&**link, ElementClass::ACTIVE, *id == section);
                    }
                }
                self.active = Some(section);
            }
        }
    }

    pub fn active(&self) -> Option<&ElementId> {
        self.active.as_ref()
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.set_menu(!self.menu_open);
        self.menu_open
    }

    /// A nav link was clicked: close the mobile menu and return where to scroll.
    pub fn follow_link(&mut self, layout: &PageLayout, section: &ElementId) -> Option<f32> {
        self.set_menu(false);
        anchor_scroll_target(layout, section, self.options.navbar_height)
    }

    /// Enable or disable the hero parallax. Disabled, the background stays put.
    pub fn set_parallax(&mut self, enabled: bool) {
        self.parallax = enabled;
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    fn set_menu(&mut self, open: bool) {
        self.menu_open = open;
        for target in [&self.menu, &self.hamburger].into_iter().filter_map(live) {
            set_class(&**target, ElementClass::ACTIVE, open);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute_page_layout, Block};
    use crate::surface::MemorySurface;

    fn setup() -> (MemorySurface, PageLayout, Navigation) {
        let surface = MemorySurface::new();
        surface.insert_all([
            "navbar",
            "navMenu",
            "navHamburger",
            "heroBackground",
            "nav-home",
            "nav-about",
            "nav-contact",
        ]);
        let layout = compute_page_layout(
            1200.0,
            &[
                Block::leaf("home", 800.0),
                Block::leaf("about", 600.0),
                Block::leaf("contact", 500.0),
            ],
        )
        .unwrap();
        let nav = Navigation::new(
            &surface,
            &layout,
            NavigationOptions {
                navbar_height: 70.0,
                scrolled_after: 100.0,
                offset: 150.0,
            },
        );
        (surface, layout, nav)
    }

    #[test]
    fn test_active_section_uses_offset() {
        let (_s, layout, _n) = setup();
        assert_eq!(active_section(&layout, 0.0, 150.0), Some("home".into()));
        // 650 + 150 = 800 is the first pixel of "about"
        assert_eq!(active_section(&layout, 649.0, 150.0), Some("home".into()));
        assert_eq!(active_section(&layout, 650.0, 150.0), Some("about".into()));
        assert_eq!(active_section(&layout, 5000.0, 150.0), None);
    }

    #[test]
    fn test_anchor_target_clears_navbar() {
        let (_s, layout, _n) = setup();
        assert_eq!(anchor_scroll_target(&layout, &"about".into(), 70.0), Some(730.0));
        assert_eq!(anchor_scroll_target(&layout, &"home".into(), 70.0), Some(0.0));
        assert_eq!(anchor_scroll_target(&layout, &"missing".into(), 70.0), None);
    }

    #[test]
    fn test_scroll_updates_navbar_and_links() {
        let (surface, layout, mut nav) = setup();

        nav.on_scroll(&layout, 50.0);
        assert!(!surface.element("navbar").unwrap().has_class(ElementClass::SCROLLED));
        assert!(surface.element("nav-home").unwrap().has_class(ElementClass::ACTIVE));

        nav.on_scroll(&layout, 700.0);
        assert!(surface.element("navbar").unwrap().has_class(ElementClass::SCROLLED));
        assert!(!surface.element("nav-home").unwrap().has_class(ElementClass::ACTIVE));
        assert!(surface.element("nav-about").unwrap().has_class(ElementClass::ACTIVE));
        assert_eq!(nav.active(), Some(&ElementId::from("about")));

        let bg = surface.element("heroBackground").unwrap();
        assert_eq!(bg.visual_state().translate_y, -350.0);
    }

    #[test]
    fn test_parallax_can_be_held() {
        let (surface, layout, mut nav) = setup();
        let bg = surface.element("heroBackground").unwrap();

        nav.set_parallax(false);
        nav.on_scroll(&layout, 400.0);
        assert_eq!(bg.visual_state().translate_y, 0.0);

        nav.set_parallax(true);
        nav.on_scroll(&layout, 400.0);
        assert_eq!(bg.visual_state().translate_y, -200.0);
    }

    #[test]
    fn test_menu_toggle_and_link_close() {
        let (surface, layout, mut nav) = setup();

        assert!(nav.toggle_menu());
        assert!(surface.element("navMenu").unwrap().has_class(ElementClass::ACTIVE));
        assert!(surface.element("navHamburger").unwrap().has_class(ElementClass::ACTIVE));

        let target = nav.follow_link(&layout, &"contact".into());
        assert_eq!(target, Some(1330.0));
        assert!(!nav.is_menu_open());
        assert!(!surface.element("navMenu").unwrap().has_class(ElementClass::ACTIVE));
    }
}
