use std::fmt::Write as _;

use axum::extract::{Form, State};
use axum::response::Response;
use serde::Deserialize;

use super::{after_action, attachment, is_on, render};
use crate::application::export;
use crate::error::Result;
use crate::infrastructure::settings::CURRENCIES;
use crate::infrastructure::{Module, Settings};
use crate::web::state::AppState;
use crate::web::templates::{checked, escape, options, Page};

pub(crate) async fn page(State(state): State<AppState>) -> Result<Response> {
    let settings = state.settings();

    let mut body = String::from(r#"<h1 class="main-title">⚙️ Settings</h1>"#);
    body.push_str(&preferences_form(&settings));
    body.push_str(&modules_form(&settings));
    let _ = write!(
        body,
        r#"<p class="section-header">📦 Data Management</p>
<p><a href="/settings/export/data">📥 Export All Data</a> · <a href="/settings/export/config">📥 Export Config</a></p>
<p class="date">Data file: {}</p>
<p class="section-header danger">⚠️ Danger Zone</p>
<details><summary>Reset Options</summary><div class="body">
<p class="danger">This will delete ALL your data permanently!</p>
<form method="post" action="/settings/reset">
<label class="check"><input type="checkbox" name="confirm" value="yes"> Yes, delete everything</label><br>
<button class="danger" type="submit">💣 Reset ALL Data</button>
</form></div></details>
<p class="section-header">About {}</p>
<p>Your personal codex: a private space for tracking finances, calculating lumber needs, journaling and collecting wisdom.</p>
<p class="subtitle">"The unexamined life is not worth living." - Socrates</p>"#,
        escape(&state.store.path().display().to_string()),
        escape(&settings.app.name),
    );

    Ok(render(&state, &settings, Page::Settings, "Settings", &body))
}

fn preferences_form(settings: &Settings) -> String {
    let user = &settings.user;
    format!(
        r#"<p class="section-header">User Preferences</p>
<form class="stack" method="post" action="/settings/preferences">
<div class="grid-2">
<label>Your name<input name="name" value="{name}" required></label>
<label>Currency<select name="currency">{currencies}</select></label>
<label>Measurement units<select name="units">{units}</select></label>
<label>Timezone<input name="timezone" value="{timezone}"></label>
</div>
<button type="submit">💾 Save Preferences</button>
</form>"#,
        name = escape(&user.name),
        currencies = options(CURRENCIES.iter().map(|c| (*c, *c)), &user.currency),
        units = options(
            [("imperial", "Imperial"), ("metric", "Metric")],
            &user.units.to_string()
        ),
        timezone = escape(&user.timezone),
    )
}

fn modules_form(settings: &Settings) -> String {
    let mut out = String::from(
        r#"<p class="section-header">Modules</p><form class="stack" method="post" action="/settings/modules">"#,
    );
    for module in Module::ALL {
        let _ = write!(
            out,
            r#"<label class="check"><input type="checkbox" name="{}"{}> {}</label>"#,
            module.key(),
            checked(settings.is_enabled(module)),
            module.title()
        );
    }
    out.push_str(r#"<button type="submit">💾 Save Modules</button></form>"#);
    out
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PreferencesForm {
    name: String,
    currency: String,
    units: String,
    timezone: String,
}

pub(crate) async fn preferences(
    State(state): State<AppState>,
    Form(form): Form<PreferencesForm>,
) -> Result<Response> {
    let outcome = state
        .update_settings(|s| {
            s.set("user.name", &form.name)?;
            s.set("user.currency", &form.currency)?;
            s.set("user.units", &form.units)?;
            s.set("user.timezone", &form.timezone)
        })
        .map(|_| "Preferences saved!".to_string());
    after_action(&state, outcome, "/settings")
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ModulesForm {
    finance: Option<String>,
    carpentry: Option<String>,
    philosophy: Option<String>,
}

pub(crate) async fn modules(
    State(state): State<AppState>,
    Form(form): Form<ModulesForm>,
) -> Result<Response> {
    let outcome = state
        .update_settings(|s| {
            s.set_enabled(Module::Finance, is_on(&form.finance));
            s.set_enabled(Module::Carpentry, is_on(&form.carpentry));
            s.set_enabled(Module::Philosophy, is_on(&form.philosophy));
            Ok(())
        })
        .map(|_| "Modules updated".to_string());
    after_action(&state, outcome, "/settings")
}

pub(crate) async fn export_data(State(state): State<AppState>) -> Result<Response> {
    let export = export::export_data(&state.store)?;
    Ok(attachment(&export.file_name, export.contents))
}

pub(crate) async fn export_config(State(state): State<AppState>) -> Result<Response> {
    let export = export::export_settings(&state.settings())?;
    Ok(attachment(&export.file_name, export.contents))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ResetForm {
    confirm: String,
}

pub(crate) async fn reset(
    State(state): State<AppState>,
    Form(form): Form<ResetForm>,
) -> Result<Response> {
    let outcome = export::reset_data(&state.store, form.confirm == "yes")
        .map(|_| "All data reset!".to_string());
    after_action(&state, outcome, "/settings")
}
