//! Filesystem locations used by the daemon and CLI.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable overriding the state directory.
pub const HOME_ENV: &str = "POMOCLOCK_HOME";

/// State directory name under the user's home.
const DEFAULT_DIR_NAME: &str = ".pomoclock";

const SOCKET_FILE: &str = "pomoclock.sock";
const PREFERENCES_FILE: &str = "preferences.json";
const SOUNDS_DIR: &str = "sounds";

/// Resolved state directory layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    /// Resolves the state directory from `POMOCLOCK_HOME` or `~/.pomoclock`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither is available.
    pub fn resolve() -> Result<Self> {
        if let Some(root) = env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(root));
        }

        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(Self::with_root(home.join(DEFAULT_DIR_NAME)))
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Unix socket the daemon listens on.
    pub fn socket(&self) -> PathBuf {
        self.root.join(SOCKET_FILE)
    }

    pub fn preferences(&self) -> PathBuf {
        self.root.join(PREFERENCES_FILE)
    }

    /// Directory searched for custom alert sounds.
    pub fn sounds_dir(&self) -> PathBuf {
        self.root.join(SOUNDS_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_root() {
        let paths = AppPaths::with_root("/tmp/pomo");

        assert_eq!(paths.root(), Path::new("/tmp/pomo"));
        assert_eq!(paths.socket(), PathBuf::from("/tmp/pomo/pomoclock.sock"));
        assert_eq!(
            paths.preferences(),
            PathBuf::from("/tmp/pomo/preferences.json")
        );
        assert_eq!(paths.sounds_dir(), PathBuf::from("/tmp/pomo/sounds"));
    }

    #[test]
    fn test_resolve_yields_socket_name() {
        // Either the override or the home default; both share the layout.
        if let Ok(paths) = AppPaths::resolve() {
            assert!(paths.socket().ends_with(SOCKET_FILE));
        }
    }
}
