//! Home page numbers: counts, this month's money, recent activity

use crate::domain::document::CodexDocument;
use crate::domain::finance;
use crate::error::Result;
use crate::infrastructure::settings::currency_symbol;
use crate::infrastructure::JsonStore;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;

const RECENT_JOURNAL: usize = 5;
const RECENT_TRANSACTIONS: usize = 5;
const RECENT_CALCS: usize = 3;
const RECENT_SHOWN: usize = 6;
const PREVIEW_CHARS: usize = 80;

/// Record counts, served as JSON by `/api/stats` and printed by `codex stats`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub journal_entries: usize,
    pub transactions: usize,
    pub projects: usize,
    pub reflections: usize,
    pub lumber_calcs: usize,
    pub last_modified: NaiveDateTime,
}

impl Stats {
    pub fn of(doc: &CodexDocument) -> Self {
        Stats {
            journal_entries: doc.journal.len(),
            transactions: doc.finance.transactions.len(),
            projects: doc.projects.len(),
            reflections: doc.reflections.len(),
            lumber_calcs: doc.lumber_calculations.len(),
            last_modified: doc.meta.last_modified,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Greeting {
    pub text: &'static str,
    pub icon: &'static str,
}

pub fn greeting(hour: u32) -> Greeting {
    match hour {
        0..=11 => Greeting {
            text: "Good morning",
            icon: "🌅",
        },
        12..=16 => Greeting {
            text: "Good afternoon",
            icon: "☀️",
        },
        _ => Greeting {
            text: "Good evening",
            icon: "🌙",
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Journal,
    Finance,
    Carpentry,
}

impl ActivityKind {
    pub fn icon(&self) -> &'static str {
        match self {
            ActivityKind::Journal => "📝",
            ActivityKind::Finance => "💰",
            ActivityKind::Carpentry => "🪵",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::Journal => "Journal",
            ActivityKind::Finance => "Finance",
            ActivityKind::Carpentry => "Carpentry",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub kind: ActivityKind,
    pub summary: String,
    pub at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub month_expenses: f64,
    pub month_income: f64,
    pub stats: Stats,
    pub recent: Vec<Activity>,
}

pub struct DashboardService {
    store: JsonStore,
}

impl DashboardService {
    pub fn new(store: JsonStore) -> Self {
        DashboardService { store }
    }

    pub fn stats(&self) -> Result<Stats> {
        Ok(Stats::of(&self.store.load()?))
    }

    /// Amounts in the activity list are written in `currency`
    pub fn overview(&self, currency: &str) -> Result<Overview> {
        let doc = self.store.load()?;
        Ok(overview(&doc, Local::now().date_naive(), currency))
    }
}

/// The current local hour, for [`greeting`]
pub fn current_hour() -> u32 {
    Local::now().hour()
}

pub fn overview(doc: &CodexDocument, today: NaiveDate, currency: &str) -> Overview {
    let (month_income, month_expenses) =
        finance::monthly_totals(&doc.finance.transactions, today.year(), today.month());
    Overview {
        month_expenses,
        month_income,
        stats: Stats::of(doc),
        recent: recent_activity(doc, currency),
    }
}

/// The latest journal entries, transactions and calculations, newest first
pub fn recent_activity(doc: &CodexDocument, currency: &str) -> Vec<Activity> {
    let journal = last(&doc.journal, RECENT_JOURNAL).iter().map(|e| Activity {
        kind: ActivityKind::Journal,
        summary: preview(&e.content),
        at: e.created_at,
    });
    let transactions = last(&doc.finance.transactions, RECENT_TRANSACTIONS)
        .iter()
        .map(|t| Activity {
            kind: ActivityKind::Finance,
            summary: format!(
                "{}: {}{:.2}",
                t.display_description(),
                currency_symbol(currency),
                t.amount.abs()
            ),
            at: t.created_at,
        });
    let calcs = last(&doc.lumber_calculations, RECENT_CALCS)
        .iter()
        .map(|c| Activity {
            kind: ActivityKind::Carpentry,
            summary: format!("{}x {}", c.adjusted_quantity, c.lumber_name),
            at: c.created_at,
        });

    let mut all: Vec<Activity> = journal.chain(transactions).chain(calcs).collect();
    all.sort_by(|a, b| b.at.cmp(&a.at));
    all.truncate(RECENT_SHOWN);
    all
}

fn last<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

fn preview(content: &str) -> String {
    if content.chars().count() > PREVIEW_CHARS {
        let cut: String = content.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::finance::{NewTransaction, TransactionKind};
    use crate::domain::philosophy::JournalEntry;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn journal(content: &str, created_at: NaiveDateTime) -> JournalEntry {
        JournalEntry {
            id: "j".to_string(),
            title: None,
            content: content.to_string(),
            mood: None,
            tags: vec![],
            entry_type: "journal".to_string(),
            created_at,
            updated_at: None,
        }
    }

    fn txn(kind: TransactionKind, amount: f64, day: u32) -> crate::domain::Transaction {
        NewTransaction {
            kind,
            amount,
            category: "Other".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            description: "Hinges".to_string(),
            tags: vec![],
        }
        .into_transaction(format!("txn_{}", day), at(day, 12))
    }

    #[test]
    fn test_greeting_boundaries() {
        assert_eq!(greeting(0).text, "Good morning");
        assert_eq!(greeting(11).text, "Good morning");
        assert_eq!(greeting(12).text, "Good afternoon");
        assert_eq!(greeting(16).text, "Good afternoon");
        assert_eq!(greeting(17).text, "Good evening");
        assert_eq!(greeting(23).icon, "🌙");
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let long = "a".repeat(100);
        let p = preview(&long);
        assert_eq!(p.len(), 83);
        assert!(p.ends_with("..."));
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_overview_month_totals() {
        let mut doc = CodexDocument::new(at(1, 0));
        doc.finance.transactions = vec![
            txn(TransactionKind::Expense, 40.0, 2),
            txn(TransactionKind::Income, 900.0, 3),
        ];

        let o = overview(&doc, NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(), "CAD");
        assert_eq!(o.month_expenses, 40.0);
        assert_eq!(o.month_income, 900.0);
        assert_eq!(o.stats.transactions, 2);

        let april = overview(&doc, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(), "CAD");
        assert_eq!(april.month_expenses, 0.0);
    }

    #[test]
    fn test_recent_activity_merges_and_caps() {
        let mut doc = CodexDocument::new(at(1, 0));
        doc.journal = (1..=7).map(|d| journal("entry", at(d, 8))).collect();
        doc.finance.transactions = vec![txn(TransactionKind::Expense, 12.5, 10)];

        let recent = recent_activity(&doc, "CAD");
        assert_eq!(recent.len(), RECENT_SHOWN);
        assert_eq!(recent[0].kind, ActivityKind::Finance);
        assert_eq!(recent[0].summary, "Hinges: $12.50");
        assert!(recent.windows(2).all(|w| w[0].at >= w[1].at));
        // Only the last five journal entries are considered
        assert!(recent.iter().all(|a| a.at >= at(3, 8)));
    }

    #[test]
    fn test_recent_activity_uses_configured_currency() {
        let mut doc = CodexDocument::new(at(1, 0));
        doc.finance.transactions = vec![txn(TransactionKind::Expense, 12.5, 10)];

        assert_eq!(recent_activity(&doc, "EUR")[0].summary, "Hinges: €12.50");
        assert_eq!(recent_activity(&doc, "GBP")[0].summary, "Hinges: £12.50");
    }

    #[test]
    fn test_stats_counts() {
        let mut doc = CodexDocument::new(at(1, 0));
        doc.journal.push(journal("x", at(2, 9)));
        let stats = Stats::of(&doc);
        assert_eq!(stats.journal_entries, 1);
        assert_eq!(stats.projects, 0);
        assert_eq!(stats.last_modified, at(1, 0));
    }
}
