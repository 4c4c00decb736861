//! Carpentry use cases: quick calcs, project estimates, saved work

use crate::application::finance::record;
use crate::domain::carpentry::{
    self, LumberCalculation, ProjectEstimate, ProjectItem, QuickCalc,
};
use crate::domain::document;
use crate::domain::finance::{NewTransaction, Transaction, TransactionKind, LUMBER_CATEGORY};
use crate::error::{CodexError, Result};
use crate::infrastructure::JsonStore;
use chrono::Local;
use tracing::info;

/// Saved projects shown on the saved tab
pub const SAVED_PROJECTS_SHOWN: usize = 5;
/// Saved quick calculations shown on the saved tab
pub const SAVED_CALCS_SHOWN: usize = 10;

/// Items collected for an estimate that has not been saved yet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDraft {
    pub items: Vec<ProjectItem>,
}

impl ProjectDraft {
    pub fn add(&mut self, key: &str, quantity: u32) -> Result<&ProjectItem> {
        let item = ProjectItem::new(key, quantity)?;
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn remove(&mut self, index: usize) -> Result<ProjectItem> {
        if index >= self.items.len() {
            return Err(CodexError::NotFound(format!("project item {}", index)));
        }
        Ok(self.items.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn totals(&self, waste_percent: u32) -> (f64, f64) {
        carpentry::project_totals(&self.items, waste_percent)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// What the saved tab shows, newest first
#[derive(Debug, Clone, Default)]
pub struct SavedWork {
    pub projects: Vec<ProjectEstimate>,
    pub calculations: Vec<LumberCalculation>,
}

impl SavedWork {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.calculations.is_empty()
    }
}

pub struct CarpentryService {
    store: JsonStore,
}

impl CarpentryService {
    pub fn new(store: JsonStore) -> Self {
        CarpentryService { store }
    }

    pub fn calculate(&self, key: &str, quantity: u32, waste_percent: u32) -> Result<QuickCalc> {
        carpentry::quick_calc(key, quantity, waste_percent)
    }

    pub fn save_calculation(&self, calc: &QuickCalc) -> Result<LumberCalculation> {
        let record = LumberCalculation::from_calc(calc, document::short_id(), document::now());
        self.store.update(|doc| {
            doc.lumber_calculations.push(record.clone());
            Ok(())
        })?;
        info!(id = %record.id, lumber = %record.lumber_type, total = record.total_cost, "lumber calculation saved");
        Ok(record)
    }

    /// Book the calculation's cost as a lumber expense dated today
    pub fn add_to_finance(&self, calc: &QuickCalc) -> Result<Transaction> {
        let new = NewTransaction {
            kind: TransactionKind::Expense,
            amount: calc.total_cost,
            category: LUMBER_CATEGORY.to_string(),
            date: Local::now().date_naive(),
            description: calc.purchase_description(),
            tags: vec!["lumber".to_string(), "materials".to_string()],
        };
        new.validate()?;

        let txn = self.store.update(|doc| Ok(record(doc, new)))?;
        info!(id = %txn.id, amount = txn.amount, "lumber expense added to finance");
        Ok(txn)
    }

    /// Save the draft as a project estimate and clear it
    pub fn save_project(
        &self,
        name: &str,
        draft: &mut ProjectDraft,
        waste_percent: u32,
    ) -> Result<ProjectEstimate> {
        let project = ProjectEstimate::build(
            name,
            draft.items.clone(),
            waste_percent,
            document::short_id(),
            document::now(),
        )?;
        self.store.update(|doc| {
            doc.projects.push(project.clone());
            Ok(())
        })?;
        draft.clear();
        info!(id = %project.id, name = %project.name, total = project.total, "project estimate saved");
        Ok(project)
    }

    pub fn saved(&self) -> Result<SavedWork> {
        let doc = self.store.load()?;

        let mut projects = doc.projects;
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        projects.truncate(SAVED_PROJECTS_SHOWN);

        let mut calculations = doc.lumber_calculations;
        calculations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        calculations.truncate(SAVED_CALCS_SHOWN);

        Ok(SavedWork {
            projects,
            calculations,
        })
    }
}
