//! Config management use case

use crate::error::Result;
use crate::infrastructure::{CodexHome, Settings};
use tracing::info;

/// Service for reading and changing `config.json` by dot path.
///
/// Reads skip validation so that a file with a bad value can be repaired
/// through `set`.
pub struct ConfigService {
    home: CodexHome,
}

impl ConfigService {
    pub fn new(home: CodexHome) -> Self {
        ConfigService { home }
    }

    /// Get a single config value
    pub fn get(&self, key: &str) -> Result<String> {
        Settings::read_from(&self.home)?.get(key)
    }

    /// Set a config value and save the file
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut settings = Settings::read_from(&self.home)?;
        settings.set(key, value)?;
        settings.save_to(&self.home)?;
        info!(key, value, "config updated");
        Ok(())
    }

    /// List all config values
    pub fn list(&self) -> Result<Vec<(String, String)>> {
        Settings::read_from(&self.home)?.entries()
    }
}
