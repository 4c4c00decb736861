pub(crate) mod api;
pub(crate) mod carpentry;
pub(crate) mod finance;
pub(crate) mod home;
pub(crate) mod philosophy;
pub(crate) mod settings;

use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Redirect, Response};

use super::state::AppState;
use super::templates::{self, Page};
use crate::error::Result;
use crate::infrastructure::Settings;

/// Render `body` inside the layout, consuming the pending flash
pub(crate) fn render(
    state: &AppState,
    settings: &Settings,
    active: Page,
    title: &str,
    body: &str,
) -> Response {
    let mut resp =
        templates::layout(settings, active, state.take_flash(), title, body).into_response();
    resp.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate"),
    );
    resp
}

/// POST/redirect/GET: flash the outcome and send the browser to `back`.
/// Input mistakes become an error flash; anything else propagates.
pub(crate) fn after_action(state: &AppState, outcome: Result<String>, back: &str) -> Result<Response> {
    match outcome {
        Ok(message) => state.success(message),
        Err(e) if e.is_user_error() => state.error(e.to_string()),
        Err(e) => return Err(e),
    }
    Ok(Redirect::to(back).into_response())
}

/// A download with a `Content-Disposition: attachment` header
pub(crate) fn attachment(file_name: &str, contents: String) -> Response {
    let mut resp = contents.into_response();
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file_name)) {
        resp.headers_mut().insert(header::CONTENT_DISPOSITION, value);
    }
    resp
}

/// Checkbox fields arrive as `on` when ticked and are absent otherwise
pub(crate) fn is_on(field: &Option<String>) -> bool {
    field
        .as_deref()
        .is_some_and(|v| matches!(v, "on" | "true" | "yes" | "1"))
}
