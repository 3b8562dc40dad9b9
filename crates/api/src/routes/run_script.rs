use axum::extract::State;
use axum::{routing::post, Json, Router};

use crate::error::AppResult;
use crate::state::AppState;
use crate::trigger::{self, RunScriptResponse};

/// POST /run-script -- run the whole script sequence and return its output.
///
/// The request body is ignored. Blocks until the runner process exits.
async fn run_script(State(state): State<AppState>) -> AppResult<Json<RunScriptResponse>> {
    let response = trigger::run_runner(&state.config.runner).await?;
    Ok(Json(response))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/run-script", post(run_script))
}
