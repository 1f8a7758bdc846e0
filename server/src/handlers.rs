//! HTTP handlers.
//!
//! Each handler extracts its inputs, hands them to `todo_core::service`, and
//! shapes the result. Request bodies are taken as raw bytes and decoded here,
//! whatever the `Content-Type`, so an identifier is always validated before
//! the body and a bad body is reported through `AppError`.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use tracing::warn;

use serde::de::DeserializeOwned;

use todo_core::{service, CreateTodo, TodoId, UpdateTodo};

use crate::dto::{CreatedResponse, HealthResponse, ListResponse, MessageResponse};
use crate::error::AppError;
use crate::state::AppState;

pub type HandlerResult<T> = Result<Json<T>, AppError>;

const HOME_PAGE: &str = include_str!("../static/home.html");

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    Ok(serde_json::from_slice(body)?)
}

/// GET /
pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.repository.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                storage: "connected".to_string(),
            }),
        ),
        Err(e) => {
            warn!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded".to_string(),
                    storage: e.cause(),
                }),
            )
        }
    }
}

/// GET /todo/
pub async fn list_todos(State(state): State<AppState>) -> HandlerResult<ListResponse> {
    let data = service::list_todos(state.repository.as_ref()).await?;
    Ok(Json(ListResponse { data }))
}

/// POST /todo/
pub async fn create_todo(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let input: CreateTodo = decode_body(&body)?;
    let item = service::create_todo(state.repository.as_ref(), input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Todo created successfully".to_string(),
            todo_id: item.id,
        }),
    ))
}

/// PUT /todo/{id}
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> HandlerResult<MessageResponse> {
    // Reject a bad id before looking at the body.
    let id = TodoId::parse(&id)?;
    let input: UpdateTodo = decode_body(&body)?;
    service::update_todo(state.repository.as_ref(), &id, input).await?;
    Ok(Json(MessageResponse::new("Todo updated successfully")))
}

/// DELETE /todo/{id}
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<MessageResponse> {
    let id = TodoId::parse(&id)?;
    service::delete_todo(state.repository.as_ref(), &id).await?;
    Ok(Json(MessageResponse::new("Todo deleted successfully")))
}
