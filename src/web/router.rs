use axum::routing::{get, post};
use axum::Router;

use super::routes;
use super::state::AppState;

pub(crate) fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::home::index))
        .route("/assets/app.css", get(routes::home::asset_css))
        .route("/health", get(routes::home::health))
        .route("/api/stats", get(routes::api::stats))
        .route("/finance", get(routes::finance::page))
        .route("/finance/transactions", post(routes::finance::add_transaction))
        .route(
            "/finance/transactions/:id/delete",
            post(routes::finance::delete_transaction),
        )
        .route("/finance/budgets", post(routes::finance::budget))
        .route("/carpentry", get(routes::carpentry::page))
        .route("/carpentry/quick", post(routes::carpentry::quick))
        .route("/carpentry/project", post(routes::carpentry::save_project))
        .route(
            "/carpentry/project/items",
            post(routes::carpentry::add_item),
        )
        .route(
            "/carpentry/project/items/:index/delete",
            post(routes::carpentry::remove_item),
        )
        .route("/philosophy", get(routes::philosophy::page))
        .route("/philosophy/journal", post(routes::philosophy::add_journal))
        .route(
            "/philosophy/journal/:id/edit",
            get(routes::philosophy::edit_page).post(routes::philosophy::edit_journal),
        )
        .route(
            "/philosophy/journal/:id/delete",
            post(routes::philosophy::delete_journal),
        )
        .route(
            "/philosophy/reflections",
            post(routes::philosophy::add_reflection),
        )
        .route(
            "/philosophy/reflections/:id/delete",
            post(routes::philosophy::delete_reflection),
        )
        .route("/settings", get(routes::settings::page))
        .route(
            "/settings/preferences",
            post(routes::settings::preferences),
        )
        .route("/settings/modules", post(routes::settings::modules))
        .route("/settings/export/data", get(routes::settings::export_data))
        .route(
            "/settings/export/config",
            get(routes::settings::export_config),
        )
        .route("/settings/reset", post(routes::settings::reset))
        .with_state(state)
}
