//! Light/dark color theme.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::Result;
use super::PreferenceStore;

/// Preference key holding the theme.
pub const THEME_KEY: &str = "theme";

/// Display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Reads the theme from `store`.
    ///
    /// Only the exact value `"dark"` selects the dark theme; anything else,
    /// including a missing key, is light.
    pub fn load(store: &dyn PreferenceStore) -> Self {
        match store.get(THEME_KEY).as_deref() {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    /// Writes the theme to `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store could not persist the value.
    pub fn save(self, store: &mut dyn PreferenceStore) -> Result<()> {
        store.set(THEME_KEY, self.as_str())
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
