use std::fmt::Write as _;
use std::str::FromStr;

use axum::extract::{Form, Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use super::{after_action, is_on, render};
use crate::application::philosophy::{History, LinkedEntry, HISTORY_LIMIT};
use crate::application::{HistoryQuery, JournalInput};
use crate::domain::philosophy::{HistoryKind, JournalEntry};
use crate::domain::tags::{manual_tags, visible_tags};
use crate::domain::{Mood, PromptTheme};
use crate::error::{CodexError, Result};
use crate::infrastructure::Module;
use crate::web::state::AppState;
use crate::web::templates::{self, checked, escape, markdown, options, tag_chips, Page};

const MODES: [(&str, &str); 3] = [
    ("write", "📝 New Entry"),
    ("prompt", "💭 Prompt"),
    ("history", "📚 History"),
];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PhilosophyQuery {
    mode: Option<String>,
    theme: Option<String>,
    kind: Option<String>,
    tag: Option<String>,
}

pub(crate) async fn page(
    State(state): State<AppState>,
    Query(query): Query<PhilosophyQuery>,
) -> Result<Response> {
    let settings = state.require(Module::Philosophy)?;
    let mode = query.mode.as_deref().unwrap_or("write");

    let mut body = String::from(r#"<h1 class="main-title">📖 Journal &amp; Reflections</h1>"#);
    body.push_str(&templates::tabs("/philosophy", "mode", &MODES, mode));
    match mode {
        "prompt" => {
            let theme = query
                .theme
                .as_deref()
                .and_then(|t| PromptTheme::from_str(t).ok())
                .unwrap_or_default();
            body.push_str(&prompt_mode(theme, pick_prompt(theme)));
        }
        "history" => body.push_str(&history_mode(&state, &query)?),
        _ => body.push_str(&journal_form(
            "/philosophy/journal",
            None,
            "What's on your mind?",
            "💾 Save",
        )),
    }

    Ok(render(&state, &settings, Page::Philosophy, "Philosophy", &body))
}

fn pick_prompt(theme: PromptTheme) -> &'static str {
    theme.random_prompt(&mut rand::thread_rng())
}

/// Mood choices. A stored label outside the current list stays selectable
/// so that saving an edit keeps it.
fn mood_options(selected: &str) -> String {
    let mut labels: Vec<(String, &str)> = Mood::ALL
        .iter()
        .map(|m| (format!("{} {}", m.icon(), m.label()), m.label()))
        .collect();
    if !selected.is_empty() && labels.iter().all(|(_, value)| *value != selected) {
        labels.push((selected.to_string(), selected));
    }
    options(
        std::iter::once(("", "No mood")).chain(labels.iter().map(|(text, value)| (*value, text.as_str()))),
        selected,
    )
}

/// Write form, prefilled when editing
fn journal_form(action: &str, entry: Option<&JournalEntry>, heading: &str, submit: &str) -> String {
    let title = entry.and_then(|e| e.title.as_deref()).unwrap_or("");
    let content = entry.map(|e| e.content.as_str()).unwrap_or("");
    let mood = entry.and_then(|e| e.mood.as_deref()).unwrap_or("");
    // Inline #tags come back from the content on save
    let tags = entry
        .map(|e| {
            manual_tags(&e.tags, &e.content)
                .into_iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();
    let linked = entry.is_some_and(|e| e.is_linked());

    format!(
        r#"<p class="section-header">{heading}</p>
<form class="stack" method="post" action="{action}">
<label>Title (optional)<input name="title" value="{title}" placeholder="Give this entry a name..."></label>
<label>Write freely...<textarea name="content" required placeholder="This is your space. Tip: use #tags inline (e.g. #work #idea)">{content}</textarea></label>
<div class="grid-2">
<label>Mood<select name="mood">{moods}</select></label>
<label>Tags<input name="tags" value="{tags}" placeholder="work, project, idea"></label>
</div>
<label class="check"><input type="checkbox" name="link_to_codex"{linked}> 🤖 Link to Codex</label>
<button type="submit">{submit}</button>
<span class="date">Stored locally, never shared</span>
</form>"#,
        heading = escape(heading),
        action = action,
        title = escape(title),
        content = escape(content),
        moods = mood_options(mood),
        tags = escape(&tags),
        linked = checked(linked),
        submit = submit,
    )
}

fn prompt_mode(theme: PromptTheme, prompt: &str) -> String {
    let themes: Vec<(&str, &str)> = PromptTheme::ALL.iter().map(|t| (t.key(), t.title())).collect();
    format!(
        r#"<p class="section-header">Daily Reflection</p>
<form method="get" action="/philosophy">
<input type="hidden" name="mode" value="prompt">
<label>Theme<select name="theme" onchange="this.form.submit()">{themes}</select></label>
</form>
<p class="prompt">"{prompt}"</p>
<p><a href="/philosophy?mode=prompt&amp;theme={key}">🔄 New Prompt</a></p>
<form class="stack" method="post" action="/philosophy/reflections">
<input type="hidden" name="prompt" value="{prompt}">
<input type="hidden" name="theme" value="{key}">
<label>Your reflection<textarea name="response" required placeholder="Take a moment to think..."></textarea></label>
<label class="check"><input type="checkbox" name="link_to_codex"> 🤖 Link to Codex</label>
<button type="submit">💾 Save Reflection</button>
</form>"#,
        themes = options(themes, theme.key()),
        prompt = escape(prompt),
        key = theme.key(),
    )
}

fn history_mode(state: &AppState, query: &PhilosophyQuery) -> Result<String> {
    let kind = query
        .kind
        .as_deref()
        .and_then(|k| HistoryKind::from_str(k).ok())
        .unwrap_or_default();
    let tag = query
        .tag
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty() && *t != "all")
        .map(str::to_string);

    let service = state.philosophy();
    let history = service.history(
        &HistoryQuery {
            kind,
            tag: tag.clone(),
        },
        HISTORY_LIMIT,
    )?;
    let linked = service.linked_entries()?;

    let kind_key = match kind {
        HistoryKind::Journal => "journal",
        HistoryKind::Reflections => "reflections",
        HistoryKind::All => "all",
    };
    let mut out = format!(
        r#"<p class="section-header">Your Codex History</p>
<form class="grid-2" method="get" action="/philosophy">
<input type="hidden" name="mode" value="history">
<label>Type<select name="kind" onchange="this.form.submit()">{}</select></label>
<label>Tag<select name="tag" onchange="this.form.submit()">{}</select></label>
</form>
{}"#,
        options(
            [("journal", "Journal"), ("reflections", "Reflections"), ("all", "All")],
            kind_key
        ),
        options(
            std::iter::once(("all", "All")).chain(history.all_tags.iter().map(|t| (t.as_str(), t.as_str()))),
            tag.as_deref().unwrap_or("all"),
        ),
        linked_section(&linked),
    );

    out.push_str(&history_entries(&history));
    Ok(out)
}

/// Entries flagged for Codex, newest first
fn linked_section(linked: &[LinkedEntry]) -> String {
    if linked.is_empty() {
        return r#"<p class="date">🤖 No entries linked to Codex</p>"#.to_string();
    }

    let mut out = format!(
        r#"<details class="linked"><summary>🤖 {} entries linked to Codex</summary><ul>"#,
        linked.len()
    );
    for item in linked {
        let (icon, label) = match item {
            LinkedEntry::Journal { title, .. } => ("📝", title),
            LinkedEntry::Reflection { prompt, .. } => ("💭", prompt),
        };
        let _ = write!(
            out,
            r#"<li><span class="date">{}</span> {} {}</li>"#,
            item.date().format("%Y-%m-%d"),
            icon,
            escape(label),
        );
    }
    out.push_str("</ul></details>");
    out
}

fn history_entries(history: &History) -> String {
    if history.journal.is_empty() && history.reflections.is_empty() {
        return templates::empty_state("Nothing here yet");
    }

    let mut out = String::new();
    for entry in &history.journal {
        let _ = write!(
            out,
            r#"<details><summary>{icon} {title} · {date} {linked}</summary><div class="body">{content}{tags}
<a href="/philosophy/journal/{id}/edit">✏️ Edit</a>
<form class="inline" method="post" action="/philosophy/journal/{id}/delete"><button class="icon" title="Delete">🗑️</button></form>
</div></details>"#,
            icon = entry.mood_icon(),
            title = escape(&entry.display_title()),
            date = entry.created_at.format("%Y-%m-%d"),
            linked = if entry.is_linked() { "🤖" } else { "" },
            content = markdown(&entry.content),
            tags = tag_chips(visible_tags(&entry.tags)),
            id = escape(&entry.id),
        );
    }
    for reflection in &history.reflections {
        let _ = write!(
            out,
            r#"<details><summary>💭 {category} · {date} {linked}</summary><div class="body"><p class="prompt">{prompt}</p>{response}
<form class="inline" method="post" action="/philosophy/reflections/{id}/delete"><button class="icon" title="Delete">🗑️</button></form>
</div></details>"#,
            category = escape(&reflection.category_title()),
            date = reflection.created_at.format("%Y-%m-%d"),
            linked = if reflection.is_linked() { "🤖" } else { "" },
            prompt = escape(&reflection.prompt),
            response = markdown(&reflection.response),
            id = escape(&reflection.id),
        );
    }
    out
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct JournalForm {
    title: String,
    content: String,
    mood: String,
    tags: String,
    link_to_codex: Option<String>,
}

impl JournalForm {
    fn input(&self) -> Result<JournalInput> {
        let mood = match self.mood.trim() {
            "" => None,
            m => Some(Mood::from_str(m).map_err(CodexError::InvalidInput)?),
        };
        Ok(JournalInput {
            title: self.title.clone(),
            content: self.content.clone(),
            mood,
            tags: self.tags.clone(),
            link_to_codex: is_on(&self.link_to_codex),
            keep_mood: false,
        })
    }

    /// Like [`JournalForm::input`], but a mood label that is no longer
    /// listed is accepted when it is the one already stored
    fn edit_input(&self, stored_mood: Option<&str>) -> Result<JournalInput> {
        let mood = self.mood.trim();
        let unlisted = !mood.is_empty() && Mood::from_str(mood).is_err();
        if unlisted && stored_mood.map(str::trim) == Some(mood) {
            let mut input = JournalForm {
                mood: String::new(),
                ..self.clone()
            }
            .input()?;
            input.keep_mood = true;
            return Ok(input);
        }
        self.input()
    }
}

pub(crate) async fn add_journal(
    State(state): State<AppState>,
    Form(form): Form<JournalForm>,
) -> Result<Response> {
    state.require(Module::Philosophy)?;
    let outcome = form
        .input()
        .and_then(|input| state.philosophy().add_journal_entry(&input))
        .map(|_| "Saved!".to_string());
    after_action(&state, outcome, "/philosophy?mode=write")
}

pub(crate) async fn edit_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let settings = state.require(Module::Philosophy)?;
    let entry = match state.philosophy().journal_entry(&id) {
        Ok(entry) => entry,
        Err(CodexError::NotFound(what)) => {
            state.error(format!("No such {}", what));
            return Ok(Redirect::to("/philosophy?mode=history").into_response());
        }
        Err(e) => return Err(e),
    };

    let mut body = String::from(r#"<h1 class="main-title">📖 Edit Entry</h1>"#);
    body.push_str(&journal_form(
        &format!("/philosophy/journal/{}/edit", escape(&entry.id)),
        Some(&entry),
        "Edit your entry",
        "💾 Save Changes",
    ));
    Ok(render(&state, &settings, Page::Philosophy, "Edit Entry", &body))
}

pub(crate) async fn edit_journal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<JournalForm>,
) -> Result<Response> {
    state.require(Module::Philosophy)?;
    let stored_mood = state
        .philosophy()
        .journal_entry(&id)
        .ok()
        .and_then(|e| e.mood);
    let outcome = form
        .edit_input(stored_mood.as_deref())
        .and_then(|input| state.philosophy().update_journal_entry(&id, &input));
    let back = match &outcome {
        Err(e) if !matches!(e, CodexError::NotFound(_)) && is_record_id(&id) => {
            format!("/philosophy/journal/{}/edit", id)
        }
        _ => "/philosophy?mode=history".to_string(),
    };
    after_action(&state, outcome.map(|_| "Entry updated".to_string()), &back)
}

fn is_record_id(id: &str) -> bool {
    id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

pub(crate) async fn delete_journal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    state.require(Module::Philosophy)?;
    let outcome = state
        .philosophy()
        .delete_journal_entry(&id)
        .map(|_| "Entry deleted".to_string());
    after_action(&state, outcome, "/philosophy?mode=history")
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ReflectionForm {
    prompt: String,
    response: String,
    theme: String,
    link_to_codex: Option<String>,
}

pub(crate) async fn add_reflection(
    State(state): State<AppState>,
    Form(form): Form<ReflectionForm>,
) -> Result<Response> {
    state.require(Module::Philosophy)?;
    let theme = PromptTheme::from_str(&form.theme).unwrap_or_default();
    let outcome = state
        .philosophy()
        .add_reflection(
            &form.prompt,
            &form.response,
            theme,
            is_on(&form.link_to_codex),
        )
        .map(|_| "Saved!".to_string());
    after_action(
        &state,
        outcome,
        &format!("/philosophy?mode=prompt&theme={}", theme.key()),
    )
}

pub(crate) async fn delete_reflection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    state.require(Module::Philosophy)?;
    let outcome = state
        .philosophy()
        .delete_reflection(&id)
        .map(|_| "Reflection deleted".to_string());
    after_action(&state, outcome, "/philosophy?mode=history")
}
