use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use crate::application::{
    CarpentryService, DashboardService, FinanceService, PhilosophyService, ProjectDraft,
};
use crate::error::Result;
use crate::infrastructure::{CodexHome, JsonStore, Module, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FlashKind {
    Success,
    Error,
}

/// One-shot message shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Flash {
    pub(crate) kind: FlashKind,
    pub(crate) message: String,
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) home: Arc<CodexHome>,
    pub(crate) store: JsonStore,
    pub(crate) settings: Arc<RwLock<Settings>>, // updated from the settings page
    pub(crate) draft: Arc<Mutex<ProjectDraft>>,
    flash: Arc<Mutex<Option<Flash>>>,
}

impl AppState {
    pub(crate) fn new(home: CodexHome, settings: Settings) -> Self {
        AppState {
            store: JsonStore::in_home(&home),
            home: Arc::new(home),
            settings: Arc::new(RwLock::new(settings)),
            draft: Arc::new(Mutex::new(ProjectDraft::default())),
            flash: Arc::new(Mutex::new(None)),
        }
    }

    pub(crate) fn settings(&self) -> Settings {
        match self.settings.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Apply `f` to the settings, save them, and publish the result.
    ///
    /// The write lock is held throughout, so concurrent updates apply one
    /// after another. Nothing changes when `f`, validation or the save fails.
    pub(crate) fn update_settings<F>(&self, f: F) -> Result<Settings>
    where
        F: FnOnce(&mut Settings) -> Result<()>,
    {
        let mut guard = match self.settings.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut updated = guard.clone();
        f(&mut updated)?;
        updated.validate()?;
        updated.save_to(&self.home)?;
        *guard = updated.clone();
        Ok(updated)
    }

    /// Current settings, or ModuleDisabled when `module` is switched off
    pub(crate) fn require(&self, module: Module) -> Result<Settings> {
        let settings = self.settings();
        settings.require_enabled(module)?;
        Ok(settings)
    }

    pub(crate) fn draft(&self) -> MutexGuard<'_, ProjectDraft> {
        match self.draft.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub(crate) fn success(&self, message: impl Into<String>) {
        self.set_flash(FlashKind::Success, message.into());
    }

    pub(crate) fn error(&self, message: impl Into<String>) {
        self.set_flash(FlashKind::Error, message.into());
    }

    fn set_flash(&self, kind: FlashKind, message: String) {
        let mut slot = match self.flash.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = Some(Flash { kind, message });
    }

    pub(crate) fn take_flash(&self) -> Option<Flash> {
        match self.flash.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }

    pub(crate) fn finance(&self) -> FinanceService {
        FinanceService::new(self.store.clone())
    }

    pub(crate) fn carpentry(&self) -> CarpentryService {
        CarpentryService::new(self.store.clone())
    }

    pub(crate) fn philosophy(&self) -> PhilosophyService {
        PhilosophyService::new(self.store.clone())
    }

    pub(crate) fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.store.clone())
    }
}
