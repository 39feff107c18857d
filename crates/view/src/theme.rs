use portfolio_protocol::{Theme, THEME_KEY};
use portfolio_store::KvStore;

/// Light/dark choice. An explicit choice is persisted and beats the OS
/// preference; until one is made the OS preference is followed.
#[derive(Debug, Clone)]
pub struct ThemeToggle {
    store: KvStore,
    os_preference: Theme,
    current: Theme,
}

impl ThemeToggle {
    pub fn init(store: KvStore, os_preference: Theme) -> Self {
        let current = stored_theme(&store).unwrap_or(os_preference);
        Self {
            store,
            os_preference,
            current,
        }
    }

    pub const fn current(&self) -> Theme {
        self.current
    }

    pub fn stored(&self) -> Option<Theme> {
        stored_theme(&self.store)
    }

    pub fn toggle(&mut self) -> Theme {
        self.set(self.current.toggled());
        self.current
    }

    pub fn set(&mut self, theme: Theme) {
        self.current = theme;
        self.store.set(THEME_KEY, theme.as_str());
    }

    /// Follow an OS change unless the user chose explicitly. Returns whether
    /// the current theme changed.
    pub fn os_preference_changed(&mut self, os: Theme) -> bool {
        self.os_preference = os;
        if self.stored().is_some() || self.current == os {
            return false;
        }
        self.current = os;
        true
    }

    /// Drop the explicit choice and fall back to the OS preference.
    pub fn forget(&mut self) {
        self.store.remove(THEME_KEY);
        self.current = self.os_preference;
    }

    pub const fn button_label(&self) -> &'static str {
        match self.current {
            Theme::Dark => "☀️ Light mode",
            Theme::Light => "🌙 Dark mode",
        }
    }

    pub const fn aria_pressed(&self) -> bool {
        matches!(self.current, Theme::Dark)
    }
}

// Accepts both the JSON string `"dark"` and a bare legacy `dark`.
fn stored_theme(store: &KvStore) -> Option<Theme> {
    let raw = store.get_raw(THEME_KEY)?;
    Theme::parse(raw.trim().trim_matches('"'))
}
