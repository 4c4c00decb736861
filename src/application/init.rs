//! Initialize codex use case

use crate::error::Result;
use crate::infrastructure::{CodexHome, JsonStore, Settings};
use tracing::info;

/// Set up a new codex home: default `config.json` and an empty
/// `data/codex_data.json`.
pub fn init(home: &CodexHome) -> Result<Settings> {
    home.initialize()?;

    let settings = Settings::default();
    settings.save_to(home)?;

    JsonStore::in_home(home).load()?;

    info!(root = %home.root().display(), "codex initialized");
    Ok(settings)
}
