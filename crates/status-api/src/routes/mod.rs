mod status;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub use status::StatusQuery;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(status::get_status))
        .route("/args", get(status::get_args))
}
