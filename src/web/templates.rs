//! HTML helpers shared by the pages

use std::fmt::Write as _;

use axum::response::Html;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

use super::state::{Flash, FlashKind};
use crate::infrastructure::settings::currency_symbol;
use crate::infrastructure::{Module, Settings};

pub(crate) const APP_CSS: &str = include_str!("templates/app.css");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Page {
    Home,
    Finance,
    Carpentry,
    Philosophy,
    Settings,
}

impl Page {
    const ALL: [Page; 5] = [
        Page::Home,
        Page::Finance,
        Page::Carpentry,
        Page::Philosophy,
        Page::Settings,
    ];

    fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Finance => "/finance",
            Page::Carpentry => "/carpentry",
            Page::Philosophy => "/philosophy",
            Page::Settings => "/settings",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Page::Home => "🏠 Home",
            Page::Finance => "💰 Finance",
            Page::Carpentry => "🪵 Carpentry",
            Page::Philosophy => "📖 Philosophy",
            Page::Settings => "⚙️ Settings",
        }
    }

    fn module(&self) -> Option<Module> {
        match self {
            Page::Finance => Some(Module::Finance),
            Page::Carpentry => Some(Module::Carpentry),
            Page::Philosophy => Some(Module::Philosophy),
            Page::Home | Page::Settings => None,
        }
    }
}

/// Wrap a page body in the shared shell: sidebar nav and flash banner.
/// Disabled modules are left out of the nav.
pub(crate) fn layout(
    settings: &Settings,
    active: Page,
    flash: Option<Flash>,
    title: &str,
    body: &str,
) -> Html<String> {
    let mut nav = String::new();
    for page in Page::ALL {
        if page.module().is_some_and(|m| !settings.is_enabled(m)) {
            continue;
        }
        let _ = write!(
            nav,
            r#"<a class="nav-link{}" href="{}">{}</a>"#,
            if page == active { " active" } else { "" },
            page.path(),
            page.label()
        );
    }

    let flash = flash
        .map(|f| {
            let class = match f.kind {
                FlashKind::Success => "flash success",
                FlashKind::Error => "flash error",
            };
            format!(r#"<div class="{}">{}</div>"#, class, escape(&f.message))
        })
        .unwrap_or_default();

    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · {app}</title>
<link rel="stylesheet" href="/assets/app.css">
</head>
<body>
<aside class="sidebar">
<div class="brand">📜 {app}</div>
<nav>{nav}</nav>
<div class="sidebar-foot">v{version}</div>
</aside>
<main>
{flash}
{body}
</main>
</body>
</html>"#,
        title = escape(title),
        app = escape(&settings.app.name),
        nav = nav,
        version = escape(&settings.app.version),
        flash = flash,
        body = body,
    ))
}

pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `12.5` -> `$12.50`; the sign is dropped
pub(crate) fn money(amount: f64, currency: &str) -> String {
    format!("{}{:.2}", currency_symbol(currency), amount.abs())
}

/// Render journal Markdown. Raw HTML in the source is shown as text and
/// link or image targets with a scheme other than http, https or mailto
/// are replaced by `#`.
pub(crate) fn markdown(source: &str) -> String {
    let parser = Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    });
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    // Browsers ignore whitespace and control characters inside a scheme
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    let allowed = match cleaned.find(':') {
        Some(i) if !cleaned[..i].contains(['/', '?', '#']) => {
            matches!(&cleaned[..i], "http" | "https" | "mailto")
        }
        _ => true,
    };
    if allowed {
        url
    } else {
        CowStr::Borrowed("#")
    }
}

/// Tab strip linking to `{base}?{param}={key}`
pub(crate) fn tabs(base: &str, param: &str, items: &[(&str, &str)], active: &str) -> String {
    let mut out = String::from(r#"<div class="tabs">"#);
    for (key, label) in items {
        let _ = write!(
            out,
            r#"<a class="tab{}" href="{}?{}={}">{}</a>"#,
            if *key == active { " active" } else { "" },
            base,
            param,
            key,
            label
        );
    }
    out.push_str("</div>");
    out
}

/// `<option>` list; `selected` marks the chosen value
pub(crate) fn options<'a>(
    items: impl IntoIterator<Item = (&'a str, &'a str)>,
    selected: &str,
) -> String {
    let mut out = String::new();
    for (value, label) in items {
        let _ = write!(
            out,
            r#"<option value="{}"{}>{}</option>"#,
            escape(value),
            if value == selected { " selected" } else { "" },
            escape(label)
        );
    }
    out
}

pub(crate) fn checked(on: bool) -> &'static str {
    if on {
        " checked"
    } else {
        ""
    }
}

pub(crate) fn tag_chips<'a>(tags: impl IntoIterator<Item = &'a String>) -> String {
    let chips: Vec<String> = tags
        .into_iter()
        .map(|t| format!(r##"<span class="tag">#{}</span>"##, escape(t)))
        .collect();
    if chips.is_empty() {
        String::new()
    } else {
        format!(r#"<div class="tags">{}</div>"#, chips.join(" "))
    }
}

pub(crate) fn empty_state(message: &str) -> String {
    format!(r#"<p class="empty">{}</p>"#, escape(message))
}
