use std::fmt::Write as _;

use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use chrono::Local;

use super::render;
use crate::application::dashboard::{self, Overview};
use crate::error::Result;
use crate::infrastructure::{Module, Settings};
use crate::web::state::AppState;
use crate::web::templates::{self, escape, money, Page};

pub(crate) async fn index(State(state): State<AppState>) -> Result<Response> {
    let settings = state.settings();
    let overview = state.dashboard().overview(&settings.user.currency)?;
    let greeting = dashboard::greeting(dashboard::current_hour());

    let mut body = format!(
        r#"<h1 class="main-title">{} {}, {}</h1>
<p class="subtitle">{}</p>
<div class="codex-quote">A private place for the numbers and the thoughts worth keeping.</div>"#,
        greeting.icon,
        greeting.text,
        escape(&settings.user.name),
        Local::now().format("%A, %B %d, %Y"),
    );

    body.push_str(r#"<p class="section-header">Quick Overview</p><div class="cards">"#);
    body.push_str(&overview_cards(&settings, &overview));
    body.push_str("</div>");

    body.push_str(r#"<p class="section-header">Recent Activity</p>"#);
    if overview.recent.is_empty() {
        body.push_str(&templates::empty_state(
            "No recent activity. Start by adding a journal entry or tracking an expense!",
        ));
    }
    for item in &overview.recent {
        let _ = write!(
            body,
            r#"<div class="activity-item"><div><strong>{} {}</strong><br><span class="metric-label">{}</span></div><span class="date">{}</span></div>"#,
            item.kind.icon(),
            item.kind.label(),
            escape(&item.summary),
            item.at.format("%Y-%m-%d"),
        );
    }

    Ok(render(&state, &settings, Page::Home, "Home", &body))
}

fn overview_cards(settings: &Settings, overview: &Overview) -> String {
    let mut cards = String::new();
    let currency = &settings.user.currency;

    if settings.is_enabled(Module::Finance) {
        let income = if overview.month_income > 0.0 {
            format!(
                r#"<div class="positive">+{}</div>"#,
                money(overview.month_income, currency)
            )
        } else {
            String::new()
        };
        let _ = write!(
            cards,
            r#"<div class="card"><strong>💰 Finance</strong><div class="metric-label">Spent this month</div><div class="metric-value">{}</div>{}</div>"#,
            money(overview.month_expenses, currency),
            income
        );
    }
    if settings.is_enabled(Module::Carpentry) {
        let _ = write!(
            cards,
            r#"<div class="card"><strong>🪵 Carpentry</strong><div class="metric-label">Calculations</div><div class="metric-value">{}</div><div class="metric-label">Projects</div><div class="metric-value">{}</div></div>"#,
            overview.stats.lumber_calcs, overview.stats.projects
        );
    }
    if settings.is_enabled(Module::Philosophy) {
        let _ = write!(
            cards,
            r#"<div class="card"><strong>📖 Journal</strong><div class="metric-label">Entries</div><div class="metric-value">{}</div><div class="metric-label">Reflections</div><div class="metric-value">{}</div></div>"#,
            overview.stats.journal_entries, overview.stats.reflections
        );
    }
    cards
}

pub(crate) async fn asset_css() -> Response {
    let mut resp = Response::new(templates::APP_CSS.into());
    *resp.status_mut() = StatusCode::OK;
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/css; charset=utf-8"),
    );
    resp
}

pub(crate) async fn health() -> &'static str {
    "OK"
}
