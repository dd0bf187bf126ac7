use std::sync::Arc;

use parley_storage::PreferenceStore;
use tokio::sync::watch;

use super::palette::Palette;
use super::preference::{Appearance, ThemePreference};

/// Preference key holding `system`, `light` or `dark`.
pub const THEME_MODE_KEY: &str = "themeMode";

/// Read-only theme state shared with every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeContext {
    pub preference: ThemePreference,
    pub system_appearance: Appearance,
    pub is_dark_mode: bool,
    pub palette: &'static Palette,
}

impl ThemeContext {
    fn resolve(preference: ThemePreference, system_appearance: Appearance) -> Self {
        let is_dark_mode = preference.resolve(system_appearance).is_dark();
        Self {
            preference,
            system_appearance,
            is_dark_mode,
            palette: Palette::for_dark_mode(is_dark_mode),
        }
    }
}

/// Owns the active theme for the whole application.
///
/// Constructed once at the application root and handed to views; changes fan out through
/// a watch channel. Persistence failures are logged and never surfaced to callers.
pub struct ThemeService {
    store: Arc<dyn PreferenceStore>,
    state: watch::Sender<ThemeContext>,
}

impl ThemeService {
    /// Loads the persisted preference, falling back to `system` when absent or unreadable.
    pub fn load(store: Arc<dyn PreferenceStore>, system_appearance: Appearance) -> Self {
        let preference = match store.get(THEME_MODE_KEY) {
            Ok(Some(raw)) => ThemePreference::parse_lossy(&raw),
            Ok(None) => ThemePreference::default(),
            Err(error) => {
                tracing::warn!(error = %error, "failed to load theme preference, using system");
                ThemePreference::default()
            }
        };

        let context = ThemeContext::resolve(preference, system_appearance);
        tracing::info!(
            preference = preference.as_str(),
            is_dark_mode = context.is_dark_mode,
            "theme loaded"
        );

        Self {
            store,
            state: watch::Sender::new(context),
        }
    }

    pub fn snapshot(&self) -> ThemeContext {
        *self.state.borrow()
    }

    pub fn is_dark_mode(&self) -> bool {
        self.state.borrow().is_dark_mode
    }

    pub fn preference(&self) -> ThemePreference {
        self.state.borrow().preference
    }

    pub fn colors(&self) -> &'static Palette {
        self.state.borrow().palette
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeContext> {
        self.state.subscribe()
    }

    /// Persists and applies a new preference, then notifies subscribers.
    pub fn set_preference(&self, preference: ThemePreference) {
        if let Err(error) = self.store.set(THEME_MODE_KEY, preference.as_str()) {
            tracing::warn!(
                preference = preference.as_str(),
                error = %error,
                "failed to persist theme preference"
            );
        }

        self.state.send_modify(|context| {
            *context = ThemeContext::resolve(preference, context.system_appearance);
        });
        tracing::debug!(preference = preference.as_str(), "theme preference changed");
    }

    /// Flips to the opposite of what is currently shown.
    ///
    /// Under `system` the new explicit preference is the opposite of the OS appearance.
    pub fn toggle(&self) {
        let current = self.snapshot();
        let next = match current.preference {
            ThemePreference::System => match current.system_appearance.opposite() {
                Appearance::Light => ThemePreference::Light,
                Appearance::Dark => ThemePreference::Dark,
            },
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        };
        self.set_preference(next);
    }

    /// Records an OS appearance change; subscribers are notified only when it matters.
    pub fn set_system_appearance(&self, appearance: Appearance) {
        self.state.send_if_modified(|context| {
            if context.system_appearance == appearance {
                return false;
            }

            let next = ThemeContext::resolve(context.preference, appearance);
            let resolved_changed = next.is_dark_mode != context.is_dark_mode;
            *context = next;
            resolved_changed
        });
    }
}

#[cfg(test)]
mod tests {
    use parley_storage::{
        JsonPreferenceStore, MemoryPreferenceStore, StorageError, StorageResult,
    };

    use super::*;

    fn memory_store() -> Arc<MemoryPreferenceStore> {
        Arc::new(MemoryPreferenceStore::new())
    }

    struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::NotFound {
                stage: "broken-get",
                entity: "preference",
                id: key.to_string(),
            })
        }

        fn set(&self, key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::NotFound {
                stage: "broken-set",
                entity: "preference",
                id: key.to_string(),
            })
        }
    }

    #[test]
    fn defaults_to_system_preference() {
        let service = ThemeService::load(memory_store(), Appearance::Dark);
        assert_eq!(service.preference(), ThemePreference::System);
        assert!(service.is_dark_mode());
        assert_eq!(service.colors(), &Palette::DARK);
    }

    #[test]
    fn dark_preference_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");

        let service = ThemeService::load(
            Arc::new(JsonPreferenceStore::open(path.clone())),
            Appearance::Light,
        );
        service.set_preference(ThemePreference::Dark);
        drop(service);

        let restarted =
            ThemeService::load(Arc::new(JsonPreferenceStore::open(path)), Appearance::Light);
        assert_eq!(restarted.preference(), ThemePreference::Dark);
        assert!(restarted.is_dark_mode());
    }

    #[test]
    fn system_preference_tracks_os_appearance() {
        let service = ThemeService::load(memory_store(), Appearance::Light);
        service.set_preference(ThemePreference::System);
        let mut updates = service.subscribe();

        service.set_system_appearance(Appearance::Dark);
        assert!(service.is_dark_mode());
        assert!(updates.has_changed().unwrap());
        assert!(updates.borrow_and_update().is_dark_mode);

        service.set_system_appearance(Appearance::Light);
        assert!(!service.is_dark_mode());
    }

    #[test]
    fn explicit_preference_ignores_os_changes() {
        let service = ThemeService::load(memory_store(), Appearance::Light);
        service.set_preference(ThemePreference::Light);
        let mut updates = service.subscribe();
        updates.borrow_and_update();

        service.set_system_appearance(Appearance::Dark);
        assert!(!service.is_dark_mode());
        assert!(!updates.has_changed().unwrap());
    }

    #[test]
    fn toggle_twice_round_trips() {
        let store = memory_store();
        let service = ThemeService::load(store.clone(), Appearance::Light);
        service.set_preference(ThemePreference::Light);
        let original = service.is_dark_mode();

        service.toggle();
        assert_eq!(service.preference(), ThemePreference::Dark);
        assert_eq!(store.get(THEME_MODE_KEY).unwrap().as_deref(), Some("dark"));

        service.toggle();
        assert_eq!(service.is_dark_mode(), original);
        assert_eq!(service.preference(), ThemePreference::Light);
    }

    #[test]
    fn toggle_from_system_picks_opposite_of_os() {
        let service = ThemeService::load(memory_store(), Appearance::Dark);
        service.toggle();
        assert_eq!(service.preference(), ThemePreference::Light);
        assert!(!service.is_dark_mode());
    }

    #[test]
    fn storage_failures_are_swallowed() {
        let service = ThemeService::load(Arc::new(BrokenStore), Appearance::Light);
        assert_eq!(service.preference(), ThemePreference::System);

        service.set_preference(ThemePreference::Dark);
        assert!(service.is_dark_mode());
    }
}
