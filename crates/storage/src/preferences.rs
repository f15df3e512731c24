//! Persisted appearance preference
//!
//! The saved preference is a single string slot: key [`THEME_PREFERENCE_KEY`],
//! value `"light"` or `"dark"`. Reads and writes go through
//! [`PreferenceStorage`] and never fail outward: a broken store reads as
//! "nothing saved" and a failed write is logged and reported as `false`.

use crate::kv::PreferenceStorage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Storage key holding the saved appearance mode
pub const THEME_PREFERENCE_KEY: &str = "theme";

/// Page-wide appearance mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppearanceMode {
    /// Light appearance
    #[default]
    Light,
    /// Dark appearance
    Dark,
}

impl AppearanceMode {
    /// The opposite mode
    pub fn toggled(self) -> Self {
        match self {
            AppearanceMode::Light => AppearanceMode::Dark,
            AppearanceMode::Dark => AppearanceMode::Light,
        }
    }

    /// Check if this is the dark mode
    pub fn is_dark(self) -> bool {
        matches!(self, AppearanceMode::Dark)
    }

    /// Mode matching a host "prefers dark" flag
    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark {
            AppearanceMode::Dark
        } else {
            AppearanceMode::Light
        }
    }

    /// Persisted string form
    pub fn as_str(self) -> &'static str {
        match self {
            AppearanceMode::Light => "light",
            AppearanceMode::Dark => "dark",
        }
    }
}

impl std::fmt::Display for AppearanceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppearanceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(AppearanceMode::Light),
            "dark" => Ok(AppearanceMode::Dark),
            _ => Err(format!("Unknown appearance mode: {}", s)),
        }
    }
}

/// Handle to the saved appearance preference slot
#[derive(Clone)]
pub struct ThemePreference {
    storage: Arc<dyn PreferenceStorage>,
}

impl std::fmt::Debug for ThemePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemePreference").finish_non_exhaustive()
    }
}

impl ThemePreference {
    /// Create a preference slot over the given storage
    pub fn new(storage: Arc<dyn PreferenceStorage>) -> Self {
        Self { storage }
    }

    /// Load the saved mode
    ///
    /// Returns `None` when nothing is saved, when the stored value is not a
    /// known mode, or when the storage cannot be read.
    pub fn load(&self) -> Option<AppearanceMode> {
        match self.storage.get_item(THEME_PREFERENCE_KEY) {
            Ok(Some(raw)) => match raw.parse() {
                Ok(mode) => Some(mode),
                Err(e) => {
                    tracing::debug!("Ignoring saved theme preference: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::debug!("Theme preference unreadable: {}", e);
                None
            }
        }
    }

    /// Check whether a usable preference is saved
    pub fn is_saved(&self) -> bool {
        self.load().is_some()
    }

    /// Save the mode, returning whether the write succeeded
    pub fn save(&self, mode: AppearanceMode) -> bool {
        match self.storage.set_item(THEME_PREFERENCE_KEY, mode.as_str()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Theme preference not saved: {}", e);
                false
            }
        }
    }

    /// Forget the saved mode, returning whether the removal succeeded
    pub fn clear(&self) -> bool {
        match self.storage.remove_item(THEME_PREFERENCE_KEY) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Theme preference not cleared: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{KvError, MemoryStorage, MockPreferenceStorage, UnavailableStorage};
    use mockall::predicate::eq;

    #[test]
    fn test_mode_toggled() {
        assert_eq!(AppearanceMode::Light.toggled(), AppearanceMode::Dark);
        assert_eq!(AppearanceMode::Dark.toggled(), AppearanceMode::Light);
        assert_eq!(AppearanceMode::Dark.toggled().toggled(), AppearanceMode::Dark);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("light".parse::<AppearanceMode>().unwrap(), AppearanceMode::Light);
        assert_eq!("DARK".parse::<AppearanceMode>().unwrap(), AppearanceMode::Dark);
        assert!("dim".parse::<AppearanceMode>().is_err());
        assert!("".parse::<AppearanceMode>().is_err());
    }

    #[test]
    fn test_mode_serde() {
        assert_eq!(serde_json::to_string(&AppearanceMode::Dark).unwrap(), "\"dark\"");
        let mode: AppearanceMode = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(mode, AppearanceMode::Light);
    }

    #[test]
    fn test_mode_from_prefers_dark() {
        assert_eq!(AppearanceMode::from_prefers_dark(true), AppearanceMode::Dark);
        assert_eq!(AppearanceMode::from_prefers_dark(false), AppearanceMode::Light);
        assert_eq!(AppearanceMode::default(), AppearanceMode::Light);
    }

    #[test]
    fn test_load_and_save() {
        let pref = ThemePreference::new(Arc::new(MemoryStorage::new()));
        assert_eq!(pref.load(), None);
        assert!(!pref.is_saved());

        assert!(pref.save(AppearanceMode::Dark));
        assert_eq!(pref.load(), Some(AppearanceMode::Dark));
        assert!(pref.is_saved());

        assert!(pref.clear());
        assert_eq!(pref.load(), None);
    }

    #[test]
    fn test_unknown_value_reads_as_unset() {
        let storage = MemoryStorage::with_item(THEME_PREFERENCE_KEY, "sepia");
        let pref = ThemePreference::new(Arc::new(storage));
        assert_eq!(pref.load(), None);
    }

    #[test]
    fn test_unavailable_storage_is_swallowed() {
        let pref = ThemePreference::new(Arc::new(UnavailableStorage));
        assert_eq!(pref.load(), None);
        assert!(!pref.save(AppearanceMode::Dark));
        assert!(!pref.clear());
    }

    #[test]
    fn test_save_writes_theme_key() {
        let mut storage = MockPreferenceStorage::new();
        storage
            .expect_set_item()
            .with(eq(THEME_PREFERENCE_KEY), eq("dark"))
            .times(1)
            .returning(|_, _| Ok(()));

        let pref = ThemePreference::new(Arc::new(storage));
        assert!(pref.save(AppearanceMode::Dark));
    }

    #[test]
    fn test_read_failure_reads_as_unset() {
        let mut storage = MockPreferenceStorage::new();
        storage
            .expect_get_item()
            .returning(|_| Err(KvError::Unavailable("quota".to_string())));

        let pref = ThemePreference::new(Arc::new(storage));
        assert_eq!(pref.load(), None);
    }
}
