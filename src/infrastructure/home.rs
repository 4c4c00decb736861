//! Codex home directory discovery

use crate::error::{CodexError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const HOME_ENV: &str = "CODEX_HOME";
pub const CONFIG_FILE: &str = "config.json";
pub const DATA_DIR: &str = "data";
pub const DATA_FILE: &str = "codex_data.json";

/// Directory holding `config.json` and `data/codex_data.json`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodexHome {
    pub root: PathBuf,
}

impl CodexHome {
    pub fn new(root: PathBuf) -> Self {
        CodexHome { root }
    }

    /// Resolve the home directory: explicit path, then CODEX_HOME, then the
    /// current directory
    pub fn discover(explicit: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = explicit {
            return Ok(CodexHome::new(path));
        }

        if let Ok(root_path) = std::env::var(HOME_ENV) {
            if !root_path.trim().is_empty() {
                return Ok(CodexHome::new(PathBuf::from(root_path)));
            }
        }

        Ok(CodexHome::new(std::env::current_dir()?))
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn data_path(&self) -> PathBuf {
        self.root.join(DATA_DIR).join(DATA_FILE)
    }

    pub fn is_initialized(&self) -> bool {
        self.config_path().is_file()
    }

    /// Fail with NotInitialized unless `codex init` has run here
    pub fn require_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(CodexError::NotInitialized(self.root.clone()))
        }
    }

    /// Create the directory layout; errors if the home already has a config
    pub fn initialize(&self) -> Result<()> {
        if self.is_initialized() {
            return Err(CodexError::Config(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir_all(self.root.join(DATA_DIR))?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths() {
        let home = CodexHome::new(PathBuf::from("/srv/codex"));
        assert_eq!(home.config_path(), PathBuf::from("/srv/codex/config.json"));
        assert_eq!(
            home.data_path(),
            PathBuf::from("/srv/codex/data/codex_data.json")
        );
    }

    #[test]
    fn test_discover_prefers_explicit_path() {
        let home = CodexHome::discover(Some(PathBuf::from("/explicit"))).unwrap();
        assert_eq!(home.root, PathBuf::from("/explicit"));
    }

    #[test]
    fn test_initialize_creates_data_dir() {
        let temp = TempDir::new().unwrap();
        let home = CodexHome::new(temp.path().to_path_buf());

        assert!(!home.is_initialized());
        home.initialize().unwrap();
        assert!(temp.path().join("data").is_dir());
    }

    #[test]
    fn test_initialize_twice_fails() {
        let temp = TempDir::new().unwrap();
        let home = CodexHome::new(temp.path().to_path_buf());

        home.initialize().unwrap();
        fs::write(home.config_path(), "{}").unwrap();

        assert!(home.initialize().is_err());
    }

    #[test]
    fn test_require_initialized() {
        let temp = TempDir::new().unwrap();
        let home = CodexHome::new(temp.path().to_path_buf());

        match home.require_initialized().unwrap_err() {
            CodexError::NotInitialized(p) => assert_eq!(p, temp.path()),
            other => panic!("Expected NotInitialized, got {other:?}"),
        }
    }
}
