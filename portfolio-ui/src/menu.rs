use std::cell::Cell;
use std::rc::Rc;

use crate::context::AppContext;
use crate::events::PageEvent;

pub trait MenuSurface {
    fn set_open(&self, open: bool);
}

/// Open/closed state of the small-screen navigation drawer.
pub struct MobileMenu {
    ctx: AppContext,
    surface: Rc<dyn MenuSurface>,
    open: Cell<bool>,
}

impl MobileMenu {
    pub fn new(ctx: AppContext, surface: Rc<dyn MenuSurface>) -> Self {
        Self {
            ctx,
            surface,
            open: Cell::new(false),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn toggle(&self) -> bool {
        self.set(!self.is_open());
        self.is_open()
    }

    pub fn open(&self) {
        self.set(true);
    }

    pub fn close(&self) {
        self.set(false);
    }

    /// Keyboard handling for the open drawer. Returns true if `key` closed it.
    pub fn on_key(&self, key: &str) -> bool {
        if key != "Escape" || !self.is_open() {
            return false;
        }
        self.close();
        true
    }

    fn set(&self, open: bool) {
        if self.open.replace(open) == open {
            return;
        }
        self.surface.set_open(open);
        self.ctx.emit(PageEvent::MenuToggled { open });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingMenuSurface;

    #[test]
    fn test_toggle_and_close() {
        let surface = Rc::new(RecordingMenuSurface::default());
        let menu = MobileMenu::new(AppContext::default(), surface.clone());

        assert!(menu.toggle());
        assert!(!menu.toggle());
        menu.open();
        menu.close();
        menu.close();

        assert!(!menu.is_open());
        assert_eq!(surface.states(), vec![true, false, true, false]);
    }

    #[test]
    fn test_escape_closes_open_menu() {
        let surface = Rc::new(RecordingMenuSurface::default());
        let menu = MobileMenu::new(AppContext::default(), surface.clone());

        assert!(!menu.on_key("Escape"));
        menu.open();
        assert!(!menu.on_key("Enter"));
        assert!(menu.is_open());
        assert!(menu.on_key("Escape"));
        assert!(!menu.is_open());
        assert_eq!(surface.states(), vec![true, false]);
    }

    #[test]
    fn test_menu_changes_are_published() {
        let ctx = AppContext::default();
        let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
        let s = seen.clone();
        ctx.bus().subscribe(crate::events::TOPIC_MENU_TOGGLED, move |event| {
            if let PageEvent::MenuToggled { open } = event {
                s.borrow_mut().push(*open);
            }
        });

        let menu = MobileMenu::new(ctx, Rc::new(RecordingMenuSurface::default()));
        menu.toggle();
        menu.open();
        menu.close();
        assert_eq!(*seen.borrow(), vec![true, false]);
    }
}
