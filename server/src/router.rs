//! Route table and middleware.

use std::time::Duration;

use axum::{
    http::StatusCode,
    routing::{get, put},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

/// Build the application router.
///
/// `/todo` and `/todo/` are the same collection route. Requests running
/// longer than `request_timeout` are answered with 408.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let collection = get(handlers::list_todos).post(handlers::create_todo);

    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/todo", collection.clone())
        .route("/todo/", collection)
        .route(
            "/todo/{id}",
            put(handlers::update_todo).delete(handlers::delete_todo),
        )
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
