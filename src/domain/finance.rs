//! Finance records and monthly arithmetic

use crate::error::{CodexError, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Category every lumber purchase lands in
pub const LUMBER_CATEGORY: &str = "Lumber & Materials";

/// Fixed spending/income categories
pub const CATEGORIES: [&str; 13] = [
    "Housing",
    "Utilities",
    "Groceries",
    "Transportation",
    "Healthcare",
    "Entertainment",
    "Dining Out",
    "Shopping",
    "Tools & Equipment",
    LUMBER_CATEGORY,
    "Subscriptions",
    "Income",
    "Other",
];

pub fn is_category(name: &str) -> bool {
    CATEGORIES.contains(&name)
}

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }

    /// Apply the sign convention: income positive, expense negative
    pub fn signed(&self, amount: f64) -> f64 {
        match self {
            TransactionKind::Income => amount.abs(),
            TransactionKind::Expense => -amount.abs(),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(format!(
                "Invalid transaction type: {}. Valid types: income, expense",
                s
            )),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single income or expense line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Signed amount: positive for income, negative for expenses
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: NaiveDateTime,
}

/// Validated input for a new transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    /// Unsigned amount as typed
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    pub description: String,
    pub tags: Vec<String>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(CodexError::InvalidInput(
                "Please enter a valid amount (greater than zero)".to_string(),
            ));
        }
        if !is_category(&self.category) {
            return Err(CodexError::InvalidInput(format!(
                "Unknown category: {}",
                self.category
            )));
        }
        Ok(())
    }

    pub fn into_transaction(self, id: String, created_at: NaiveDateTime) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            amount: self.kind.signed(self.amount),
            category: self.category,
            date: self.date,
            description: self.description.trim().to_string(),
            tags: self.tags,
            created_at,
        }
    }
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    pub fn in_month(&self, year: i32, month: u32) -> bool {
        self.date.year() == year && self.date.month() == month
    }

    pub fn display_description(&self) -> &str {
        if self.description.is_empty() {
            "No description"
        } else {
            &self.description
        }
    }
}

/// Filters applied to the transaction list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub category: Option<String>,
    pub kind: Option<TransactionKind>,
}

impl TransactionFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        self.category.as_deref().map_or(true, |c| txn.category == c)
            && self.kind.map_or(true, |k| txn.kind == k)
    }
}

/// The `finance` section of the persisted document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinanceBook {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Monthly spending limit per category
    #[serde(default)]
    pub budgets: BTreeMap<String, f64>,
    #[serde(default)]
    pub recurring: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    pub category: String,
    pub amount: f64,
    /// Share of the month's expenses, 0..=100
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub category: String,
    pub limit: f64,
    pub spent: f64,
    pub remaining: f64,
}

impl BudgetStatus {
    pub fn over_budget(&self) -> bool {
        self.remaining < 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
    pub by_category: Vec<CategorySpend>,
    pub budgets: Vec<BudgetStatus>,
}

/// Income and expense totals (expenses as a positive number)
pub fn monthly_totals(transactions: &[Transaction], year: i32, month: u32) -> (f64, f64) {
    transactions
        .iter()
        .filter(|t| t.in_month(year, month))
        .fold((0.0, 0.0), |(income, expenses), t| {
            if t.is_income() {
                (income + t.amount, expenses)
            } else {
                (income, expenses - t.amount)
            }
        })
}

pub fn monthly_summary(book: &FinanceBook, year: i32, month: u32) -> MonthlySummary {
    let (income, expenses) = monthly_totals(&book.transactions, year, month);

    let mut spent: BTreeMap<&str, f64> = BTreeMap::new();
    for txn in book
        .transactions
        .iter()
        .filter(|t| t.in_month(year, month) && t.is_expense())
    {
        *spent.entry(txn.category.as_str()).or_insert(0.0) += txn.amount.abs();
    }

    let mut by_category: Vec<CategorySpend> = spent
        .iter()
        .map(|(category, amount)| CategorySpend {
            category: category.to_string(),
            amount: *amount,
            percent: if expenses > 0.0 {
                amount / expenses * 100.0
            } else {
                0.0
            },
        })
        .collect();
    by_category.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });

    let budgets = book
        .budgets
        .iter()
        .map(|(category, limit)| {
            let used = spent.get(category.as_str()).copied().unwrap_or(0.0);
            BudgetStatus {
                category: category.clone(),
                limit: *limit,
                spent: used,
                remaining: limit - used,
            }
        })
        .collect();

    MonthlySummary {
        year,
        month,
        income,
        expenses,
        balance: income - expenses,
        by_category,
        budgets,
    }
}
