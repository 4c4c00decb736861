//! Finance use cases: record, list, delete, summarise, budget

use crate::domain::date_input::parse_date;
use crate::domain::document::{self, CodexDocument};
use crate::domain::finance::{
    self, MonthlySummary, NewTransaction, Transaction, TransactionFilter, TransactionKind,
};
use crate::domain::tags::parse_tag_list;
use crate::error::{CodexError, Result};
use crate::infrastructure::JsonStore;
use chrono::{Datelike, Local, NaiveDate};
use tracing::info;

/// Transactions shown in the list view
pub const LIST_LIMIT: usize = 20;

/// Raw form input for a new transaction
#[derive(Debug, Clone)]
pub struct AddTransaction {
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    /// `YYYY-MM-DD` or a relative reference like `yesterday`
    pub date: String,
    pub description: String,
    /// Comma-separated
    pub tags: String,
}

pub struct FinanceService {
    store: JsonStore,
}

impl FinanceService {
    pub fn new(store: JsonStore) -> Self {
        FinanceService { store }
    }

    pub fn add(&self, req: &AddTransaction) -> Result<Transaction> {
        self.add_on(req, Local::now().date_naive())
    }

    /// Add a transaction, resolving relative dates against `today`
    pub fn add_on(&self, req: &AddTransaction, today: NaiveDate) -> Result<Transaction> {
        let new = NewTransaction {
            kind: req.kind,
            amount: req.amount,
            category: req.category.trim().to_string(),
            date: parse_date(&req.date, today)?,
            description: req.description.clone(),
            tags: parse_tag_list(&req.tags),
        };
        new.validate()?;

        let txn = self.store.update(|doc| Ok(record(doc, new)))?;
        info!(id = %txn.id, kind = %txn.kind, amount = txn.amount, "transaction added");
        Ok(txn)
    }

    /// Newest first by date, optionally filtered and truncated
    pub fn list(&self, filter: &TransactionFilter, limit: Option<usize>) -> Result<Vec<Transaction>> {
        let doc = self.store.load()?;
        Ok(select(&doc.finance.transactions, filter, limit))
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.store.update(|doc| {
            let txns = &mut doc.finance.transactions;
            let before = txns.len();
            txns.retain(|t| t.id != id);
            if txns.len() == before {
                return Err(CodexError::NotFound(format!("transaction {}", id)));
            }
            Ok(())
        })?;
        info!(id, "transaction deleted");
        Ok(())
    }

    pub fn summary(&self, year: i32, month: u32) -> Result<MonthlySummary> {
        let doc = self.store.load()?;
        Ok(finance::monthly_summary(&doc.finance, year, month))
    }

    pub fn current_month_summary(&self) -> Result<MonthlySummary> {
        let today = Local::now().date_naive();
        self.summary(today.year(), today.month())
    }

    /// Set the monthly limit for a category
    pub fn set_budget(&self, category: &str, limit: f64) -> Result<()> {
        let category = category.trim();
        if !finance::is_category(category) {
            return Err(CodexError::InvalidInput(format!(
                "Unknown category: {}",
                category
            )));
        }
        if !limit.is_finite() || limit <= 0.0 {
            return Err(CodexError::InvalidInput(
                "Budget must be greater than zero".to_string(),
            ));
        }

        self.store.update(|doc| {
            doc.finance.budgets.insert(category.to_string(), limit);
            Ok(())
        })?;
        info!(category, limit, "budget set");
        Ok(())
    }

    pub fn remove_budget(&self, category: &str) -> Result<()> {
        self.store.update(|doc| {
            doc.finance
                .budgets
                .remove(category.trim())
                .map(|_| ())
                .ok_or_else(|| CodexError::NotFound(format!("budget for {}", category)))
        })
    }
}

/// Append a validated transaction to the document and return it
pub(crate) fn record(doc: &mut CodexDocument, new: NewTransaction) -> Transaction {
    let txn = new.into_transaction(document::transaction_id(), document::now());
    doc.finance.transactions.push(txn.clone());
    txn
}

fn select(
    transactions: &[Transaction],
    filter: &TransactionFilter,
    limit: Option<usize>,
) -> Vec<Transaction> {
    let mut out: Vec<Transaction> = transactions
        .iter()
        .filter(|t| filter.matches(t))
        .cloned()
        .collect();
    out.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    if let Some(n) = limit {
        out.truncate(n);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service() -> (TempDir, FinanceService) {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::new(temp.path().join("codex_data.json"));
        (temp, FinanceService::new(store))
    }

    fn expense(amount: f64, category: &str, date: &str) -> AddTransaction {
        AddTransaction {
            kind: TransactionKind::Expense,
            amount,
            category: category.to_string(),
            date: date.to_string(),
            description: format!("{} spend", category),
            tags: "home, monthly".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 17).unwrap()
    }

    #[test]
    fn test_add_and_reload() {
        let (_temp, svc) = service();
        let txn = svc
            .add_on(&expense(42.5, "Groceries", "2025-01-10"), today())
            .unwrap();

        let listed = svc.list(&TransactionFilter::default(), None).unwrap();
        assert_eq!(listed, vec![txn.clone()]);
        assert_eq!(txn.amount, -42.5);
        assert_eq!(txn.tags, vec!["home", "monthly"]);
        assert_eq!(txn.description, "Groceries spend");
    }

    #[test]
    fn test_add_resolves_relative_date() {
        let (_temp, svc) = service();
        let txn = svc
            .add_on(&expense(5.0, "Other", "yesterday"), today())
            .unwrap();
        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2025, 1, 16).unwrap());
    }

    #[test]
    fn test_add_rejects_invalid_amount_without_writing() {
        let (_temp, svc) = service();
        let err = svc
            .add_on(&expense(-3.0, "Other", "today"), today())
            .unwrap_err();
        assert!(matches!(err, CodexError::InvalidInput(_)));
        assert!(svc
            .list(&TransactionFilter::default(), None)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_add_rejects_bad_date() {
        let (_temp, svc) = service();
        assert!(matches!(
            svc.add_on(&expense(3.0, "Other", "someday"), today()),
            Err(CodexError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_list_sorted_filtered_limited() {
        let (_temp, svc) = service();
        svc.add_on(&expense(1.0, "Groceries", "2025-01-01"), today())
            .unwrap();
        svc.add_on(&expense(2.0, "Housing", "2025-01-03"), today())
            .unwrap();
        svc.add_on(
            &AddTransaction {
                kind: TransactionKind::Income,
                amount: 500.0,
                category: "Income".to_string(),
                date: "2025-01-02".to_string(),
                description: "Paycheck".to_string(),
                tags: String::new(),
            },
            today(),
        )
        .unwrap();

        let all = svc.list(&TransactionFilter::default(), None).unwrap();
        let dates: Vec<String> = all.iter().map(|t| t.date.to_string()).collect();
        assert_eq!(dates, vec!["2025-01-03", "2025-01-02", "2025-01-01"]);

        let incomes = svc
            .list(
                &TransactionFilter {
                    category: None,
                    kind: Some(TransactionKind::Income),
                },
                None,
            )
            .unwrap();
        assert_eq!(incomes.len(), 1);
        assert_eq!(incomes[0].description, "Paycheck");

        let limited = svc.list(&TransactionFilter::default(), Some(2)).unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_delete() {
        let (_temp, svc) = service();
        let txn = svc
            .add_on(&expense(9.0, "Other", "2025-01-05"), today())
            .unwrap();

        svc.delete(&txn.id).unwrap();
        assert!(svc
            .list(&TransactionFilter::default(), None)
            .unwrap()
            .is_empty());
        assert!(matches!(
            svc.delete(&txn.id),
            Err(CodexError::NotFound(_))
        ));
    }

    #[test]
    fn test_summary_with_budget() {
        let (_temp, svc) = service();
        svc.add_on(&expense(80.0, "Groceries", "2025-01-05"), today())
            .unwrap();
        svc.set_budget("Groceries", 100.0).unwrap();

        let summary = svc.summary(2025, 1).unwrap();
        assert_eq!(summary.expenses, 80.0);
        assert_eq!(summary.budgets[0].remaining, 20.0);

        svc.remove_budget("Groceries").unwrap();
        assert!(svc.summary(2025, 1).unwrap().budgets.is_empty());
        assert!(svc.remove_budget("Groceries").is_err());
    }

    #[test]
    fn test_set_budget_validation() {
        let (_temp, svc) = service();
        assert!(svc.set_budget("Boats", 10.0).is_err());
        assert!(svc.set_budget("Housing", 0.0).is_err());
    }
}
