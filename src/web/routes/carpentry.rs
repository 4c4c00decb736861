use std::fmt::Write as _;

use axum::extract::{Form, Path, Query, State};
use axum::response::Response;
use serde::Deserialize;

use super::{after_action, render};
use crate::application::carpentry::SavedWork;
use crate::application::CarpentryService;
use crate::domain::carpentry::{QuickCalc, CATALOG, MAX_WASTE_PERCENT};
use crate::error::{CodexError, Result};
use crate::infrastructure::{Module, Settings};
use crate::web::state::AppState;
use crate::web::templates::{self, escape, money, options, Page};

const TABS: [(&str, &str); 4] = [
    ("quick", "🧮 Quick Calc"),
    ("project", "📐 Project Estimator"),
    ("saved", "💾 Saved"),
    ("reference", "📚 Reference"),
];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CarpentryQuery {
    tab: Option<String>,
    lumber: Option<String>,
    qty: Option<String>,
    waste: Option<String>,
}

pub(crate) async fn page(
    State(state): State<AppState>,
    Query(query): Query<CarpentryQuery>,
) -> Result<Response> {
    let settings = state.require(Module::Carpentry)?;
    let tab = query.tab.as_deref().unwrap_or("quick");

    let mut body = String::from(r#"<h1 class="main-title">🪵 Carpentry</h1>"#);
    body.push_str(&templates::tabs("/carpentry", "tab", &TABS, tab));
    match tab {
        "project" => body.push_str(&project_tab(&state, &settings, &query)),
        "saved" => body.push_str(&saved_tab(&state.carpentry().saved()?, &settings)),
        "reference" => body.push_str(&reference_tab(&settings)),
        _ => body.push_str(&quick_tab(&state, &settings, &query)),
    }

    Ok(render(&state, &settings, Page::Carpentry, "Carpentry", &body))
}

fn lumber_options(selected: &str) -> String {
    options(CATALOG.iter().map(|p| (p.key, p.name)), selected)
}

fn waste_field(name: &str, value: u32) -> String {
    format!(
        r#"<label>Waste factor (%)<input name="{}" type="number" min="0" max="{}" step="1" value="{}"></label>"#,
        name, MAX_WASTE_PERCENT, value
    )
}

fn quick_tab(state: &AppState, settings: &Settings, query: &CarpentryQuery) -> String {
    let default_waste = settings.modules.carpentry.default_waste_percent();
    let lumber = query.lumber.as_deref().unwrap_or(CATALOG[0].key);
    let qty = query.qty.as_deref().unwrap_or("1");
    let waste = query
        .waste
        .as_deref()
        .and_then(|w| w.trim().parse().ok())
        .unwrap_or(default_waste);

    let mut out = format!(
        r#"<form class="stack" method="get" action="/carpentry">
<input type="hidden" name="tab" value="quick">
<div class="grid-2">
<label>Lumber type<select name="lumber">{}</select></label>
<label>Quantity needed<input name="qty" type="number" min="1" step="1" value="{}"></label>
{}
</div>
<button type="submit">Calculate</button>
</form>"#,
        lumber_options(lumber),
        escape(qty),
        waste_field("waste", waste),
    );

    if query.lumber.is_none() {
        return out;
    }

    match parse_calc(&state.carpentry(), lumber, qty, &waste.to_string()) {
        Ok(calc) => out.push_str(&calc_result(&calc, settings)),
        Err(e) => {
            let _ = write!(out, r#"<div class="flash error">{}</div>"#, escape(&e.to_string()));
        }
    }
    out
}

fn calc_result(calc: &QuickCalc, settings: &Settings) -> String {
    let currency = &settings.user.currency;
    format!(
        r#"<p class="section-header">Result</p><div class="cards">
<div class="card"><div class="metric-label">Unit price</div><div class="metric-value">{unit}</div></div>
<div class="card"><div class="metric-label">Quantity (with waste)</div><div class="metric-value">{adjusted}</div></div>
<div class="card"><div class="metric-label">Total cost</div><div class="metric-value">{total}</div></div>
</div>
<p class="date">Actual dimensions: {dims}</p>
<form method="post" action="/carpentry/quick">
<input type="hidden" name="lumber" value="{key}">
<input type="hidden" name="qty" value="{qty}">
<input type="hidden" name="waste" value="{waste}">
<button type="submit" name="action" value="save">Save Calculation</button>
<button class="secondary" type="submit" name="action" value="finance">Add to Finance</button>
</form>"#,
        unit = money(calc.product.price, currency),
        adjusted = calc.adjusted_quantity,
        total = money(calc.total_cost, currency),
        dims = escape(&calc.product.actual.display(settings.user.units)),
        key = escape(calc.product.key),
        qty = calc.quantity,
        waste = calc.waste_percent,
    )
}

fn project_tab(state: &AppState, settings: &Settings, query: &CarpentryQuery) -> String {
    let currency = &settings.user.currency;
    let waste = query
        .waste
        .as_deref()
        .and_then(|w| w.trim().parse().ok())
        .unwrap_or_else(|| settings.modules.carpentry.default_waste_percent());
    let draft = state.draft().clone();

    let mut out = format!(
        r#"<p class="section-header">Add Materials</p>
<form class="grid-2" method="post" action="/carpentry/project/items">
<label>Lumber<select name="lumber">{}</select></label>
<label>Qty<input name="qty" type="number" min="1" step="1" value="1"></label>
<button type="submit">Add Item</button>
</form>"#,
        lumber_options(""),
    );

    out.push_str(r#"<p class="section-header">Project Materials</p>"#);
    if draft.is_empty() {
        out.push_str(&templates::empty_state("No materials added yet"));
        return out;
    }

    for (index, item) in draft.items.iter().enumerate() {
        let _ = write!(
            out,
            r#"<div class="row"><span>{}</span><span>x{}</span><strong>{}</strong>
<form class="inline" method="post" action="/carpentry/project/items/{}/delete"><button class="icon" title="Remove">❌</button></form></div>"#,
            escape(&item.name),
            item.quantity,
            money(item.line_total(), currency),
            index
        );
    }

    let (subtotal, total) = draft.totals(waste);
    let _ = write!(
        out,
        r#"<div class="cards">
<div class="card"><div class="metric-label">Subtotal</div><div class="metric-value">{}</div></div>
<div class="card"><div class="metric-label">Total (with {}% waste)</div><div class="metric-value">{}</div></div>
</div><br>
<form class="stack" method="post" action="/carpentry/project">
<label>Project name<input name="name" placeholder="Deck Build - Backyard"></label>
{}
<button type="submit">Save Project Estimate</button>
</form>"#,
        money(subtotal, currency),
        waste,
        money(total, currency),
        waste_field("waste", waste),
    );
    out
}

fn saved_tab(saved: &SavedWork, settings: &Settings) -> String {
    let currency = &settings.user.currency;
    if saved.is_empty() {
        return templates::empty_state(
            "No saved calculations yet. Use Quick Calc or Project Estimator to get started!",
        );
    }

    let mut out = String::new();
    if !saved.projects.is_empty() {
        out.push_str(r#"<p class="section-header">Saved Projects</p>"#);
    }
    for project in &saved.projects {
        let items: String = project
            .items
            .iter()
            .map(|item| {
                format!(
                    "<li>{}x {} - {}</li>",
                    item.quantity,
                    escape(&item.name),
                    money(item.line_total(), currency)
                )
            })
            .collect();
        let _ = write!(
            out,
            r#"<details><summary>📁 {} - {}</summary><div class="body"><ul>{}</ul><span class="date">Created: {}</span></div></details>"#,
            escape(&project.name),
            money(project.total, currency),
            items,
            project.created_at.format("%Y-%m-%d"),
        );
    }

    if !saved.calculations.is_empty() {
        out.push_str(r#"<p class="section-header">Quick Calculations</p><ul>"#);
        for calc in &saved.calculations {
            let _ = write!(
                out,
                "<li>{}x {} = {}</li>",
                calc.adjusted_quantity,
                escape(&calc.lumber_name),
                money(calc.total_cost, currency)
            );
        }
        out.push_str("</ul>");
    }
    out
}

fn reference_tab(settings: &Settings) -> String {
    let units = settings.user.units;
    let mut out = String::from(
        r#"<p class="section-header">Current Prices</p><table><tr><th>Product</th><th>Price</th><th>Actual size</th><th>Board feet</th></tr>"#,
    );
    for product in CATALOG.iter() {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td></tr>",
            escape(product.name),
            money(product.price, &settings.user.currency),
            escape(&product.actual.display(units)),
            product.actual.board_feet(),
        );
    }
    out.push_str("</table>");
    out.push_str(
        r#"<p class="section-header">Common Conversions</p>
<ul>
<li>1 board foot = 144 cubic inches (1" x 12" x 12")</li>
<li>Deck boards: about 21 per 100 sq ft (5.5" wide)</li>
<li>Joist spacing: 16" on center standard, 12" for heavy loads</li>
</ul>
<p class="section-header">Tips</p>
<ul>
<li>Buy 10-15% extra for waste and mistakes</li>
<li>Check boards for warping before purchase</li>
<li>Store lumber flat and covered</li>
</ul>"#,
    );
    out
}

fn parse_count(raw: &str, what: &str) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| CodexError::InvalidInput(format!("{} must be a whole number", what)))
}

fn parse_calc(
    service: &CarpentryService,
    lumber: &str,
    qty: &str,
    waste: &str,
) -> Result<QuickCalc> {
    let quantity = parse_count(qty, "Quantity")?;
    let waste = parse_count(waste, "Waste factor")?;
    service.calculate(lumber, quantity, waste)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct QuickForm {
    lumber: String,
    qty: String,
    waste: String,
    action: String,
}

pub(crate) async fn quick(
    State(state): State<AppState>,
    Form(form): Form<QuickForm>,
) -> Result<Response> {
    let settings = state.require(Module::Carpentry)?;
    let service = state.carpentry();
    let outcome = parse_calc(&service, &form.lumber, &form.qty, &form.waste).and_then(|calc| {
        if form.action == "finance" {
            service.add_to_finance(&calc).map(|txn| {
                format!(
                    "Added {} expense to Finance",
                    money(txn.amount, &settings.user.currency)
                )
            })
        } else {
            service
                .save_calculation(&calc)
                .map(|_| "Calculation saved!".to_string())
        }
    });
    after_action(&state, outcome, "/carpentry?tab=quick")
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ItemForm {
    lumber: String,
    qty: String,
}

pub(crate) async fn add_item(
    State(state): State<AppState>,
    Form(form): Form<ItemForm>,
) -> Result<Response> {
    state.require(Module::Carpentry)?;
    let outcome = parse_count(&form.qty, "Quantity").and_then(|qty| {
        state
            .draft()
            .add(&form.lumber, qty)
            .map(|item| format!("Added {}x {}", item.quantity, item.name))
    });
    after_action(&state, outcome, "/carpentry?tab=project")
}

pub(crate) async fn remove_item(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Response> {
    state.require(Module::Carpentry)?;
    let outcome = state
        .draft()
        .remove(index)
        .map(|item| format!("Removed {}", item.name));
    after_action(&state, outcome, "/carpentry?tab=project")
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ProjectForm {
    name: String,
    waste: String,
}

pub(crate) async fn save_project(
    State(state): State<AppState>,
    Form(form): Form<ProjectForm>,
) -> Result<Response> {
    state.require(Module::Carpentry)?;
    let outcome = parse_count(&form.waste, "Waste factor").and_then(|waste| {
        let mut draft = state.draft();
        state
            .carpentry()
            .save_project(&form.name, &mut draft, waste)
            .map(|project| format!("Project '{}' saved!", project.name))
    });
    after_action(&state, outcome, "/carpentry?tab=project")
}
