use axum::extract::State;
use axum::Json;

use crate::application::Stats;
use crate::error::Result;
use crate::web::state::AppState;

pub(crate) async fn stats(State(state): State<AppState>) -> Result<Json<Stats>> {
    Ok(Json(state.dashboard().stats()?))
}
