use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use portfolio_types::ThemePreference;

use crate::context::AppContext;
use crate::error::PortfolioError;
use crate::events::PageEvent;
use crate::scheduler::Scheduler;

pub const DEFAULT_THEME: ThemePreference = ThemePreference::Light;

/// CSS custom properties written on the document root for each theme.
pub type Palette = &'static [(&'static str, &'static str)];

pub const LIGHT_PALETTE: Palette = &[
    ("--color-bg", "#ffffff"),
    ("--color-surface", "#f8fafc"),
    ("--color-text", "#1a1a2e"),
    ("--color-text-muted", "#5b6474"),
    ("--color-primary", "#2563eb"),
    ("--color-border", "#e2e8f0"),
    ("--color-card-bg", "#ffffff"),
    ("--color-shadow", "rgba(15, 23, 42, 0.08)"),
];

pub const DARK_PALETTE: Palette = &[
    ("--color-bg", "#0f172a"),
    ("--color-surface", "#1e293b"),
    ("--color-text", "#f1f5f9"),
    ("--color-text-muted", "#94a3b8"),
    ("--color-primary", "#60a5fa"),
    ("--color-border", "#334155"),
    ("--color-card-bg", "#1e293b"),
    ("--color-shadow", "rgba(0, 0, 0, 0.45)"),
];

pub fn palette_for(theme: ThemePreference) -> Palette {
    match theme {
        ThemePreference::Light => LIGHT_PALETTE,
        ThemePreference::Dark => DARK_PALETTE,
    }
}

/// Durable per-origin key-value storage.
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>, PortfolioError>;
    fn save(&self, key: &str, value: &str) -> Result<(), PortfolioError>;
}

/// In-memory store. Used when localStorage is blocked so the theme still
/// works for the session.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, PortfolioError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PortfolioError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Where a theme becomes visible: data attributes and palette variables.
pub trait ThemeSurface {
    fn apply(&self, theme: ThemePreference, palette: Palette) -> Result<(), PortfolioError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeOutcome {
    Applied(ThemePreference),
    /// A previous switch is still inside its cool-down window.
    Busy,
}

/// Decides, applies, persists and announces the page theme.
pub struct ThemeController {
    ctx: AppContext,
    store: Rc<dyn PreferenceStore>,
    surface: Rc<dyn ThemeSurface>,
    scheduler: Rc<dyn Scheduler>,
    current: Cell<ThemePreference>,
    busy: Rc<Cell<bool>>,
}

impl ThemeController {
    pub fn new(
        ctx: AppContext,
        store: Rc<dyn PreferenceStore>,
        surface: Rc<dyn ThemeSurface>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            ctx,
            store,
            surface,
            scheduler,
            current: Cell::new(DEFAULT_THEME),
            busy: Rc::new(Cell::new(false)),
        }
    }

    pub fn current(&self) -> ThemePreference {
        self.current.get()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Stored value, if any. Unrecognized values and storage failures read as
    /// absent.
    pub fn stored_preference(&self) -> Option<ThemePreference> {
        let key = &self.ctx.config().theme.storage_key;
        match self.store.load(key) {
            Ok(Some(raw)) => match raw.parse::<ThemePreference>() {
                Ok(theme) => Some(theme),
                Err(e) => {
                    log::debug!("Ignoring stored theme preference: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::debug!("Theme preference unreadable, treating as absent: {}", e);
                None
            }
        }
    }

    /// Stored preference, else the OS colour-scheme signal, else light.
    pub fn initial_theme(&self) -> ThemePreference {
        self.stored_preference().unwrap_or_else(|| {
            if self.ctx.env().prefers_dark {
                ThemePreference::Dark
            } else {
                DEFAULT_THEME
            }
        })
    }

    /// Apply the initial theme at startup. Nothing is persisted so a later
    /// OS-level change can still be followed.
    ///
    /// Fails, leaving the controller untouched, when the document cannot take
    /// the theme at all.
    pub fn init(&self) -> Result<ThemePreference, PortfolioError> {
        let theme = self.initial_theme();
        self.surface.apply(theme, palette_for(theme))?;
        self.current.set(theme);
        self.ctx.emit(PageEvent::ThemeChanged { theme });
        log::info!("Theme initialized: {}", theme);
        Ok(theme)
    }

    /// Validate and apply a theme by name.
    pub fn set_theme(&self, requested: &str) -> Result<ThemeOutcome, PortfolioError> {
        match requested.parse::<ThemePreference>() {
            Ok(theme) => Ok(self.apply(theme)),
            Err(e) => {
                log::warn!("Rejected theme change: {}", e);
                Err(e.into())
            }
        }
    }

    /// Apply, persist and announce `theme`, unless a switch is cooling down.
    pub fn apply(&self, theme: ThemePreference) -> ThemeOutcome {
        if self.busy.get() {
            log::debug!("Theme switch to {} ignored during transition", theme);
            return ThemeOutcome::Busy;
        }

        self.render(theme);
        self.persist(theme);
        self.arm_cooldown();
        ThemeOutcome::Applied(theme)
    }

    pub fn toggle_theme(&self) -> ThemeOutcome {
        self.apply(self.current().toggled())
    }

    /// Follow an OS colour-scheme change while the visitor has not chosen a
    /// theme explicitly.
    pub fn follow_system(&self, prefers_dark: bool) -> Option<ThemeOutcome> {
        if self.stored_preference().is_some() {
            return None;
        }
        let theme = if prefers_dark {
            ThemePreference::Dark
        } else {
            ThemePreference::Light
        };
        if theme == self.current() {
            return None;
        }
        self.render(theme);
        Some(ThemeOutcome::Applied(theme))
    }

    fn render(&self, theme: ThemePreference) {
        if let Err(e) = self.surface.apply(theme, palette_for(theme)) {
            log::warn!("Failed to apply {} theme to document: {}", theme, e);
        }
        self.current.set(theme);
        self.ctx.emit(PageEvent::ThemeChanged { theme });
    }

    fn persist(&self, theme: ThemePreference) {
        let key = &self.ctx.config().theme.storage_key;
        if let Err(e) = self.store.save(key, theme.as_str()) {
            log::debug!("Theme preference not persisted: {}", e);
        }
    }

    fn arm_cooldown(&self) {
        let cooldown = self.ctx.config().theme.transition_cooldown_ms;
        if cooldown == 0 {
            return;
        }
        self.busy.set(true);
        let busy = self.busy.clone();
        self.scheduler
            .schedule(cooldown, Box::new(move || busy.set(false)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PortfolioConfig;
    use crate::context::Environment;
    use crate::events::TOPIC_THEME_CHANGED;
    use crate::scheduler::ManualScheduler;
    use crate::test_support::{FailingStore, FailingThemeSurface, RecordingThemeSurface};

    struct Harness {
        ctx: AppContext,
        store: Rc<MemoryStore>,
        surface: Rc<RecordingThemeSurface>,
        scheduler: Rc<ManualScheduler>,
        controller: ThemeController,
    }

    fn harness(prefers_dark: bool) -> Harness {
        harness_with_store(prefers_dark, Rc::new(MemoryStore::new()))
    }

    fn harness_with_store(prefers_dark: bool, store: Rc<MemoryStore>) -> Harness {
        let env = Environment {
            prefers_dark,
            ..Environment::default()
        };
        let ctx = AppContext::new(PortfolioConfig::default(), env);
        let surface = Rc::new(RecordingThemeSurface::default());
        let scheduler = Rc::new(ManualScheduler::new());
        let controller =
            ThemeController::new(ctx.clone(), store.clone(), surface.clone(), scheduler.clone());
        Harness {
            ctx,
            store,
            surface,
            scheduler,
            controller,
        }
    }

    #[test]
    fn test_initial_theme_prefers_stored_value() {
        let h = harness(false);
        h.store.save("theme", "dark").unwrap();
        assert_eq!(h.controller.initial_theme(), ThemePreference::Dark);
    }

    #[test]
    fn test_initial_theme_falls_back_to_os_then_light() {
        assert_eq!(harness(true).controller.initial_theme(), ThemePreference::Dark);
        assert_eq!(harness(false).controller.initial_theme(), ThemePreference::Light);
    }

    #[test]
    fn test_unrecognized_stored_value_is_absent() {
        let h = harness(true);
        h.store.save("theme", "sepia").unwrap();
        assert_eq!(h.controller.stored_preference(), None);
        assert_eq!(h.controller.initial_theme(), ThemePreference::Dark);
    }

    #[test]
    fn test_invalid_theme_leaves_state_and_store_untouched() {
        let h = harness(false);
        h.controller.init().unwrap();
        let applied_before = h.surface.applied_count();

        for bad in ["", "Dark", "blue", "light ", "null"] {
            let result = h.controller.set_theme(bad);
            assert!(matches!(result, Err(PortfolioError::InvalidTheme(_))));
        }

        assert_eq!(h.controller.current(), ThemePreference::Light);
        assert_eq!(h.store.load("theme").unwrap(), None);
        assert_eq!(h.surface.applied_count(), applied_before);
        assert!(!h.controller.is_busy());
    }

    #[test]
    fn test_set_theme_twice_matches_once() {
        let once = harness(false);
        once.controller.set_theme("dark").unwrap();
        once.scheduler.run_until_idle();

        let twice = harness(false);
        twice.controller.set_theme("dark").unwrap();
        twice.scheduler.run_until_idle();
        twice.controller.set_theme("dark").unwrap();
        twice.scheduler.run_until_idle();

        assert_eq!(once.surface.last(), twice.surface.last());
        assert_eq!(twice.surface.last().map(|(theme, _)| theme), Some(ThemePreference::Dark));
    }

    #[test]
    fn test_dark_round_trips_through_store() {
        let store = Rc::new(MemoryStore::new());
        let first = harness_with_store(false, store.clone());
        first.controller.set_theme("dark").unwrap();

        let reloaded = harness_with_store(false, store);
        assert_eq!(reloaded.controller.initial_theme(), ThemePreference::Dark);
    }

    #[test]
    fn test_switch_during_cooldown_is_ignored() {
        let h = harness(false);
        assert_eq!(
            h.controller.toggle_theme(),
            ThemeOutcome::Applied(ThemePreference::Dark)
        );
        assert!(h.controller.is_busy());
        assert_eq!(h.controller.toggle_theme(), ThemeOutcome::Busy);
        assert_eq!(h.controller.current(), ThemePreference::Dark);

        h.scheduler.advance(300);
        assert!(!h.controller.is_busy());
        assert_eq!(
            h.controller.toggle_theme(),
            ThemeOutcome::Applied(ThemePreference::Light)
        );
        assert_eq!(h.store.load("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_theme_changed_is_published() {
        let h = harness(false);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        h.ctx.bus().subscribe(TOPIC_THEME_CHANGED, move |event| {
            s.borrow_mut().push(event.clone());
        });

        h.controller.set_theme("dark").unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![PageEvent::ThemeChanged {
                theme: ThemePreference::Dark
            }]
        );
    }

    #[test]
    fn test_palette_written_with_theme() {
        let h = harness(false);
        h.controller.set_theme("dark").unwrap();
        let (theme, palette) = h.surface.last().unwrap();
        assert_eq!(theme, ThemePreference::Dark);
        assert!(palette.contains(&("--color-bg", "#0f172a")));
    }

    #[test]
    fn test_storage_failure_still_applies_theme() {
        let env = Environment::default();
        let ctx = AppContext::new(PortfolioConfig::default(), env);
        let surface = Rc::new(RecordingThemeSurface::default());
        let controller = ThemeController::new(
            ctx,
            Rc::new(FailingStore),
            surface.clone(),
            Rc::new(ManualScheduler::new()),
        );

        assert_eq!(controller.initial_theme(), ThemePreference::Light);
        assert_eq!(
            controller.toggle_theme(),
            ThemeOutcome::Applied(ThemePreference::Dark)
        );
        assert_eq!(surface.applied_count(), 1);
    }

    #[test]
    fn test_init_reports_unusable_document() {
        let ctx = AppContext::default();
        let seen = Rc::new(Cell::new(0));
        let s = seen.clone();
        ctx.bus()
            .subscribe(TOPIC_THEME_CHANGED, move |_| s.set(s.get() + 1));
        let controller = ThemeController::new(
            ctx,
            Rc::new(MemoryStore::new()),
            Rc::new(FailingThemeSurface),
            Rc::new(ManualScheduler::new()),
        );

        let result = controller.init();
        assert!(matches!(result, Err(PortfolioError::MissingElement(_))));
        assert_eq!(seen.get(), 0);
    }

    #[test]
    fn test_follow_system_only_without_stored_choice() {
        let h = harness(false);
        h.controller.init().unwrap();
        assert_eq!(
            h.controller.follow_system(true),
            Some(ThemeOutcome::Applied(ThemePreference::Dark))
        );
        // Following the OS does not count as a visitor choice.
        assert_eq!(h.store.load("theme").unwrap(), None);

        h.scheduler.run_until_idle();
        h.controller.set_theme("light").unwrap();
        assert_eq!(h.controller.follow_system(true), None);
        assert_eq!(h.controller.current(), ThemePreference::Light);
    }
}
