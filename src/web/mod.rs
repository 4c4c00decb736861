//! Web UI: server-rendered HTML over axum.

mod router;
mod routes;
mod state;
mod templates;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use tracing::{error, info};

use crate::error::CodexError;
use crate::infrastructure::{CodexHome, Settings};
use state::AppState;

/// The full router for a codex home, ready to serve or to test with `oneshot`
pub fn app(home: CodexHome, settings: Settings) -> Router {
    router::build_router(AppState::new(home, settings))
}

/// Serve the UI on `addr` until Ctrl+C
pub fn run(home: CodexHome, settings: Settings, addr: SocketAddr) -> Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(run_async(home, settings, addr))
}

async fn run_async(home: CodexHome, settings: Settings, addr: SocketAddr) -> Result<()> {
    let root = home.root().display().to_string();
    let app = app(home, settings);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind failed: {addr}"))?;

    info!(%addr, home = %root, "codex web UI listening");
    println!("Codex is running at http://{addr}/");
    println!("Press Ctrl+C to stop.");

    let notify = Arc::new(tokio::sync::Notify::new());
    {
        let notify = notify.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            notify.notify_waiters();
        });
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            notify.notified().await;
        })
        .await
        .map_err(|e| anyhow!(e))?;

    info!("codex web UI stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    println!("Stopping server...");
}

impl IntoResponse for CodexError {
    fn into_response(self) -> Response {
        let status = match &self {
            CodexError::ModuleDisabled(_) | CodexError::NotFound(_) => StatusCode::NOT_FOUND,
            e if e.is_user_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}
