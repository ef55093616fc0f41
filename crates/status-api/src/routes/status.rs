use std::time::Instant;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use status_core::{filter_by_state, select_monitors, StateFilter, StatusRecord};

use crate::error::ApiError;
use crate::state::{AppState, ViewArgs};

/// Query string of `GET /api/status`. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl StatusQuery {
    fn state(&self) -> Result<Option<StateFilter>, ApiError> {
        non_empty(&self.status)
            .map(|s| s.parse::<StateFilter>().map_err(ApiError::BadRequest))
            .transpose()
    }
}

/// GET /api/status
///
/// Runs a fresh round over the configured monitors.
pub async fn get_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<StatusRecord>>, ApiError> {
    let wanted = query.state()?;
    let types: Vec<String> = non_empty(&query.kind).map(str::to_string).into_iter().collect();
    let monitors = select_monitors(&state.monitors, non_empty(&query.name), &types);

    let started = Instant::now();
    let records = state.dispatcher.dispatch_sorted(&monitors).await;
    let records = filter_by_state(records, wanted);
    tracing::info!(
        checked = monitors.len(),
        returned = records.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Status round served"
    );

    Ok(Json(records))
}

/// GET /api/args
pub async fn get_args(State(state): State<AppState>) -> Json<ViewArgs> {
    Json(state.args.clone())
}
