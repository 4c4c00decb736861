//! Backups and the reset button

use crate::error::{CodexError, Result};
use crate::infrastructure::{JsonStore, Settings};
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

pub const CONFIG_EXPORT_NAME: &str = "codex_config.json";

/// A file offered for download
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub file_name: String,
    pub contents: String,
}

pub fn backup_file_name(today: NaiveDate) -> String {
    format!("codex_backup_{}.json", today.format("%Y%m%d"))
}

/// The whole data document as pretty JSON
pub fn export_data(store: &JsonStore) -> Result<Export> {
    let doc = store.load()?;
    let contents = serde_json::to_string_pretty(&doc)?;
    info!(bytes = contents.len(), "data exported");
    Ok(Export {
        file_name: backup_file_name(Local::now().date_naive()),
        contents,
    })
}

pub fn export_settings(settings: &Settings) -> Result<Export> {
    Ok(Export {
        file_name: CONFIG_EXPORT_NAME.to_string(),
        contents: settings.to_json()?,
    })
}

/// Delete every record. Refuses unless `confirmed` is set.
pub fn reset_data(store: &JsonStore, confirmed: bool) -> Result<()> {
    if !confirmed {
        return Err(CodexError::InvalidInput(
            "Confirm the reset before deleting all data".to_string(),
        ));
    }
    store.reset()?;
    warn!("all codex data deleted");
    Ok(())
}
