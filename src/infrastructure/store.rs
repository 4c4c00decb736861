//! JSON data store: the whole codex lives in one file

use crate::domain::document::{self, CodexDocument};
use crate::error::{CodexError, Result};
use crate::infrastructure::home::CodexHome;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Reads and rewrites `codex_data.json`. Every save replaces the file.
///
/// Clones share one write lock, so concurrent `update` calls from the web
/// handlers apply one after another.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonStore {
    pub fn new(path: PathBuf) -> Self {
        JsonStore {
            path,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn in_home(home: &CodexHome) -> Self {
        JsonStore::new(home.data_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, creating it when missing and replacing it when
    /// it cannot be parsed. The unreadable file is kept next to it with a
    /// `.corrupt` suffix.
    pub fn load(&self) -> Result<CodexDocument> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        if !self.path.exists() {
            info!(path = %self.path.display(), "creating new codex document");
            return self.write_default();
        }

        let contents = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<CodexDocument>(&contents) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "codex document unreadable, starting fresh");
                quarantine(&self.path)?;
                self.write_default()
            }
        }
    }

    /// Stamp `last_modified` and rewrite the whole file
    pub fn save(&self, doc: &mut CodexDocument) -> Result<()> {
        doc.touch(document::now());
        let contents = serde_json::to_string_pretty(doc)?;
        write_atomic(&self.path, &contents)?;
        debug!(path = %self.path.display(), bytes = contents.len(), "codex document saved");
        Ok(())
    }

    /// Load, apply `f`, save. Nothing is written when `f` fails.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut CodexDocument) -> Result<T>,
    {
        let _guard = match self.write_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut doc = self.load()?;
        let out = f(&mut doc)?;
        self.save(&mut doc)?;
        Ok(out)
    }

    /// Delete the data file; the next load starts from an empty document
    pub fn reset(&self) -> Result<()> {
        let _guard = match self.write_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            warn!(path = %self.path.display(), "codex data reset");
        }
        Ok(())
    }

    fn write_default(&self) -> Result<CodexDocument> {
        let mut doc = CodexDocument::default();
        self.save(&mut doc)?;
        Ok(doc)
    }
}

/// Write through a temp file in the same directory, then rename into place.
///
/// On Windows, `rename` does not overwrite existing files, so the
/// destination is removed first.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_name = format!(
        "{}.codex-tmp-{}",
        path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("codex.json"),
        std::process::id()
    );
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, contents)?;

    if cfg!(windows) && path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&tmp_path, path).map_err(CodexError::Io)
}

/// Copy an unreadable file aside as `<name>.corrupt`, or `<name>.corrupt.N`
/// when earlier copies are already there.
pub(crate) fn quarantine(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("codex.json");
    let mut target = path.with_file_name(format!("{}.corrupt", name));
    let mut n = 1;
    while target.exists() {
        target = path.with_file_name(format!("{}.corrupt.{}", name, n));
        n += 1;
    }
    fs::copy(path, &target)?;
    warn!(from = %path.display(), to = %target.display(), "unreadable file kept aside");
    Ok(target)
}
