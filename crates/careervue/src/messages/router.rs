use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use super::domain::{ContactSubmission, MessageId};
use super::repository::{MessageRepository, RepositoryError};
use super::service::{
    MessageQuery, MessageService, MessageServiceError, ReplyRequest, StatusUpdate,
};

/// Router builder exposing the contact form, admin inbox, and sentiment endpoints.
pub fn message_router<R>(service: Arc<MessageService<R>>) -> Router
where
    R: MessageRepository + 'static,
{
    Router::new()
        .route("/api/v1/messages/contact", post(contact_handler::<R>))
        .route("/api/v1/messages", get(list_handler::<R>))
        .route(
            "/api/v1/messages/stats/overview",
            get(overview_handler::<R>),
        )
        .route(
            "/api/v1/messages/:message_id",
            get(detail_handler::<R>).delete(delete_handler::<R>),
        )
        .route(
            "/api/v1/messages/:message_id/status",
            put(status_handler::<R>),
        )
        .route(
            "/api/v1/messages/:message_id/response",
            put(response_handler::<R>),
        )
        .route(
            "/api/v1/admin/messages/statistics",
            get(statistics_handler::<R>),
        )
        .route("/api/v1/sentiment/classify", post(classify_handler::<R>))
        .with_state(service)
}

/// Body for ad-hoc scoring; `text` may be any JSON value.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ClassifyRequest {
    #[serde(default)]
    pub(crate) text: Value,
}

pub(crate) async fn contact_handler<R>(
    State(service): State<Arc<MessageService<R>>>,
    axum::Json(submission): axum::Json<ContactSubmission>,
) -> Response
where
    R: MessageRepository + 'static,
{
    match service.submit(submission) {
        Ok(message) => {
            let payload = json!({
                "message": "Message sent successfully! We will get back to you soon.",
                "success": true,
                "id": message.id,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<MessageService<R>>>,
    Query(query): Query<MessageQuery>,
) -> Response
where
    R: MessageRepository + 'static,
{
    match service.list(&query) {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn detail_handler<R>(
    State(service): State<Arc<MessageService<R>>>,
    Path(message_id): Path<String>,
) -> Response
where
    R: MessageRepository + 'static,
{
    match service.get(&MessageId(message_id)) {
        Ok(message) => (StatusCode::OK, axum::Json(message)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<MessageService<R>>>,
    Path(message_id): Path<String>,
    axum::Json(update): axum::Json<StatusUpdate>,
) -> Response
where
    R: MessageRepository + 'static,
{
    match service.update_status(&MessageId(message_id), update) {
        Ok(message) => {
            let payload = json!({
                "message": "Message status updated successfully",
                "data": message,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn response_handler<R>(
    State(service): State<Arc<MessageService<R>>>,
    Path(message_id): Path<String>,
    axum::Json(reply): axum::Json<ReplyRequest>,
) -> Response
where
    R: MessageRepository + 'static,
{
    match service.respond(&MessageId(message_id), reply) {
        Ok(message) => {
            let payload = json!({
                "message": "Response sent successfully",
                "data": message,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<MessageService<R>>>,
    Path(message_id): Path<String>,
) -> Response
where
    R: MessageRepository + 'static,
{
    match service.delete(&MessageId(message_id)) {
        Ok(_) => {
            let payload = json!({ "message": "Message deleted successfully" });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn overview_handler<R>(State(service): State<Arc<MessageService<R>>>) -> Response
where
    R: MessageRepository + 'static,
{
    match service.overview(Utc::now()) {
        Ok(stats) => (StatusCode::OK, axum::Json(json!({ "stats": stats }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn statistics_handler<R>(
    State(service): State<Arc<MessageService<R>>>,
) -> Response
where
    R: MessageRepository + 'static,
{
    match service.statistics(Utc::now()) {
        Ok(statistics) => {
            let payload = json!({ "success": true, "data": statistics });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn classify_handler<R>(
    State(service): State<Arc<MessageService<R>>>,
    axum::Json(request): axum::Json<ClassifyRequest>,
) -> Response
where
    R: MessageRepository + 'static,
{
    let result = service.scorer().classify_value(&request.text);
    (StatusCode::OK, axum::Json(result)).into_response()
}

fn error_response(error: MessageServiceError) -> Response {
    let status = match &error {
        MessageServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        MessageServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        MessageServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        MessageServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status.is_server_error() {
        warn!(%error, "message request failed");
    }

    let message = match &error {
        MessageServiceError::Repository(RepositoryError::NotFound) => {
            "message not found".to_string()
        }
        other => other.to_string(),
    };

    (status, axum::Json(json!({ "error": message }))).into_response()
}
