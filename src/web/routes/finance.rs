use std::fmt::Write as _;
use std::str::FromStr;

use axum::extract::{Form, Path, Query, State};
use axum::response::Response;
use chrono::Local;
use serde::Deserialize;

use super::{after_action, render};
use crate::application::finance::LIST_LIMIT;
use crate::application::AddTransaction;
use crate::domain::finance::{MonthlySummary, TransactionFilter, CATEGORIES};
use crate::domain::TransactionKind;
use crate::error::{CodexError, Result};
use crate::infrastructure::{Module, Settings};
use crate::web::state::AppState;
use crate::web::templates::{self, escape, money, options, Page};

const TABS: [(&str, &str); 3] = [
    ("add", "➕ Add"),
    ("list", "📋 Transactions"),
    ("summary", "📊 Summary"),
];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FinanceQuery {
    tab: Option<String>,
    category: Option<String>,
    kind: Option<String>,
}

impl FinanceQuery {
    fn filter(&self) -> TransactionFilter {
        TransactionFilter {
            category: self
                .category
                .as_deref()
                .filter(|c| !c.is_empty() && *c != "all")
                .map(str::to_string),
            kind: self
                .kind
                .as_deref()
                .and_then(|k| TransactionKind::from_str(k).ok()),
        }
    }
}

pub(crate) async fn page(
    State(state): State<AppState>,
    Query(query): Query<FinanceQuery>,
) -> Result<Response> {
    let settings = state.require(Module::Finance)?;
    let tab = query.tab.as_deref().unwrap_or("add");

    let mut body = String::from(r#"<h1 class="main-title">💰 Finance</h1>"#);
    body.push_str(&templates::tabs("/finance", "tab", &TABS, tab));
    match tab {
        "list" => body.push_str(&list_tab(&state, &settings, &query)?),
        "summary" => body.push_str(&summary_tab(&state, &settings)?),
        _ => body.push_str(&add_tab(&settings)),
    }

    Ok(render(&state, &settings, Page::Finance, "Finance", &body))
}

fn add_tab(settings: &Settings) -> String {
    format!(
        r#"<form class="stack" method="post" action="/finance/transactions">
<div class="grid-2">
<label>Type<select name="kind">{kinds}</select></label>
<label>Amount ({currency})<input name="amount" type="number" step="0.01" min="0.01" required></label>
<label>Category<select name="category">{categories}</select></label>
<label>Date<input name="date" type="date" value="{today}"></label>
</div>
<label>Description<input name="description" placeholder="What was it for?"></label>
<label>Tags<input name="tags" placeholder="groceries, weekly"></label>
<button type="submit">💾 Add Transaction</button>
</form>"#,
        kinds = options([("expense", "Expense"), ("income", "Income")], "expense"),
        currency = escape(&settings.user.currency),
        categories = options(CATEGORIES.iter().map(|c| (*c, *c)), ""),
        today = Local::now().date_naive(),
    )
}

fn list_tab(state: &AppState, settings: &Settings, query: &FinanceQuery) -> Result<String> {
    let filter = query.filter();
    let transactions = state.finance().list(&filter, Some(LIST_LIMIT))?;
    let currency = &settings.user.currency;

    let selected_category = filter.category.as_deref().unwrap_or("all");
    let selected_kind = filter.kind.map(|k| k.label()).unwrap_or("all").to_lowercase();

    let mut out = format!(
        r#"<form class="grid-2" method="get" action="/finance">
<input type="hidden" name="tab" value="list">
<label>Category<select name="category" onchange="this.form.submit()">{}</select></label>
<label>Type<select name="kind" onchange="this.form.submit()">{}</select></label>
</form><br>"#,
        options(
            std::iter::once(("all", "All")).chain(CATEGORIES.iter().map(|c| (*c, *c))),
            selected_category
        ),
        options(
            [("all", "All"), ("income", "Income"), ("expense", "Expense")],
            &selected_kind
        ),
    );

    if transactions.is_empty() {
        out.push_str(&templates::empty_state(
            "No transactions yet. Add your first one!",
        ));
    }
    for txn in &transactions {
        let (icon, class) = if txn.is_income() {
            ("📈", "positive")
        } else {
            ("📉", "negative")
        };
        let _ = write!(
            out,
            r#"<div class="row"><div>{icon} <strong>{desc}</strong><br><span class="date">{cat} • {date}</span></div>
<strong class="{class}">{amount}</strong>
<form class="inline" method="post" action="/finance/transactions/{id}/delete"><button class="icon" title="Delete">🗑️</button></form></div>"#,
            icon = icon,
            desc = escape(txn.display_description()),
            cat = escape(&txn.category),
            date = txn.date,
            class = class,
            amount = money(txn.amount, currency),
            id = escape(&txn.id),
        );
    }
    Ok(out)
}

fn summary_tab(state: &AppState, settings: &Settings) -> Result<String> {
    let summary = state.finance().current_month_summary()?;
    let currency = &settings.user.currency;

    let mut out = format!(
        r#"<p class="section-header">This Month</p><div class="cards">
<div class="card"><div class="metric-label">Income</div><div class="metric-value positive">{}</div></div>
<div class="card"><div class="metric-label">Expenses</div><div class="metric-value negative">{}</div></div>
<div class="card"><div class="metric-label">Balance</div><div class="metric-value {}">{}{}</div></div>
</div>"#,
        money(summary.income, currency),
        money(summary.expenses, currency),
        if summary.balance >= 0.0 { "positive" } else { "negative" },
        if summary.balance < 0.0 { "-" } else { "" },
        money(summary.balance, currency),
    );

    out.push_str(r#"<p class="section-header">Spending by Category</p>"#);
    out.push_str(&category_bars(&summary, currency));
    out.push_str(r#"<p class="section-header">Budgets</p>"#);
    out.push_str(&budget_section(&summary, currency));
    Ok(out)
}

fn category_bars(summary: &MonthlySummary, currency: &str) -> String {
    if summary.by_category.is_empty() {
        return templates::empty_state("No expenses recorded this month");
    }
    let mut out = String::new();
    for spend in &summary.by_category {
        let _ = write!(
            out,
            r#"<div>{}: {} ({:.1}%)</div><div class="bar"><span style="width: {:.1}%"></span></div><br>"#,
            escape(&spend.category),
            money(spend.amount, currency),
            spend.percent,
            spend.percent,
        );
    }
    out
}

fn budget_section(summary: &MonthlySummary, currency: &str) -> String {
    let mut out = String::new();
    for budget in &summary.budgets {
        let used = if budget.limit > 0.0 {
            (budget.spent / budget.limit * 100.0).min(100.0)
        } else {
            0.0
        };
        let _ = write!(
            out,
            r#"<div>{}: {} of {} ({} {})</div><div class="bar{}"><span style="width: {:.1}%"></span></div><br>"#,
            escape(&budget.category),
            money(budget.spent, currency),
            money(budget.limit, currency),
            money(budget.remaining, currency),
            if budget.over_budget() { "over budget" } else { "left" },
            if budget.over_budget() { " over" } else { "" },
            used,
        );
    }
    let _ = write!(
        out,
        r#"<form class="grid-2" method="post" action="/finance/budgets">
<label>Category<select name="category">{}</select></label>
<label>Monthly limit ({})<input name="limit" type="number" step="0.01" min="0"></label>
<button type="submit" name="action" value="set">Set Budget</button>
<button class="secondary" type="submit" name="action" value="remove">Remove Budget</button>
</form>"#,
        options(CATEGORIES.iter().map(|c| (*c, *c)), ""),
        escape(currency),
    );
    out
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TransactionForm {
    kind: String,
    amount: String,
    category: String,
    date: String,
    description: String,
    tags: String,
}

impl TransactionForm {
    fn parse(&self) -> Result<AddTransaction> {
        let kind = TransactionKind::from_str(&self.kind).map_err(CodexError::InvalidInput)?;
        let amount = parse_amount(&self.amount)?;
        Ok(AddTransaction {
            kind,
            amount,
            category: self.category.clone(),
            date: self.date.clone(),
            description: self.description.trim().to_string(),
            tags: self.tags.clone(),
        })
    }
}

fn parse_amount(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite() && *a > 0.0)
        .ok_or_else(|| CodexError::InvalidInput("Please enter a valid amount".to_string()))
}

pub(crate) async fn add_transaction(
    State(state): State<AppState>,
    Form(form): Form<TransactionForm>,
) -> Result<Response> {
    let settings = state.require(Module::Finance)?;
    let outcome = form
        .parse()
        .and_then(|req| state.finance().add(&req))
        .map(|txn| {
            format!(
                "Added {}: {}",
                txn.kind.label().to_lowercase(),
                money(txn.amount, &settings.user.currency)
            )
        });
    after_action(&state, outcome, "/finance?tab=add")
}

pub(crate) async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    state.require(Module::Finance)?;
    let outcome = state
        .finance()
        .delete(&id)
        .map(|_| "Transaction deleted".to_string());
    after_action(&state, outcome, "/finance?tab=list")
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct BudgetForm {
    category: String,
    limit: String,
    action: String,
}

pub(crate) async fn budget(
    State(state): State<AppState>,
    Form(form): Form<BudgetForm>,
) -> Result<Response> {
    state.require(Module::Finance)?;
    let finance = state.finance();
    let outcome = if form.action == "remove" {
        finance
            .remove_budget(&form.category)
            .map(|_| format!("Budget removed for {}", form.category))
    } else {
        parse_amount(&form.limit)
            .and_then(|limit| finance.set_budget(&form.category, limit))
            .map(|_| format!("Budget set for {}", form.category))
    };
    after_action(&state, outcome, "/finance?tab=summary")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 12.50 ").unwrap(), 12.5);
        assert!(parse_amount("").is_err());
        assert!(parse_amount("-4").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_query_filter() {
        let q = FinanceQuery {
            tab: Some("list".to_string()),
            category: Some("all".to_string()),
            kind: Some("income".to_string()),
        };
        let f = q.filter();
        assert_eq!(f.category, None);
        assert_eq!(f.kind, Some(TransactionKind::Income));
    }
}
