//! Light/dark theme preference.
//!
//! Read from local storage on startup and rewritten on every toggle. Never
//! cleared, logout included.

use meal_planner_core::ThemePreference;
use tracing::debug;

use crate::storage::{LocalStorage, StorageError, keys};

/// Theme preference persisted under [`keys::THEME`].
#[derive(Debug, Clone)]
pub struct ThemeStore {
    storage: LocalStorage,
}

impl ThemeStore {
    #[must_use]
    pub const fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// The stored preference. Missing or unknown values are light.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if storage cannot be read.
    pub fn load(&self) -> Result<ThemePreference, StorageError> {
        let stored = self.storage.get(keys::THEME)?;
        Ok(ThemePreference::from_stored(stored.as_deref()))
    }

    /// Persist a preference.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if storage cannot be written.
    pub fn set(&self, theme: ThemePreference) -> Result<(), StorageError> {
        debug!(theme = %theme, "Saving theme");
        self.storage.set(keys::THEME, theme.as_str())
    }

    /// Flip and persist the preference, returning the new value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if storage cannot be read or written.
    pub fn toggle(&self) -> Result<ThemePreference, StorageError> {
        let next = self.load()?.toggled();
        self.set(next)?;
        Ok(next)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_light() {
        let theme = ThemeStore::new(LocalStorage::in_memory());
        assert_eq!(theme.load().unwrap(), ThemePreference::Light);
    }

    #[test]
    fn test_toggle_persists() {
        let storage = LocalStorage::in_memory();
        let theme = ThemeStore::new(storage.clone());

        assert_eq!(theme.toggle().unwrap(), ThemePreference::Dark);
        assert_eq!(storage.get(keys::THEME).unwrap().as_deref(), Some("dark"));

        assert_eq!(theme.toggle().unwrap(), ThemePreference::Light);
        assert_eq!(storage.get(keys::THEME).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_unknown_value_is_light() {
        let storage = LocalStorage::in_memory();
        storage.set(keys::THEME, "solarized").unwrap();
        assert_eq!(
            ThemeStore::new(storage).load().unwrap(),
            ThemePreference::Light
        );
    }
}
