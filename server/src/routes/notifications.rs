//! Notification routes. Every route requires a bearer token.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use emporium_engine::{Formatted, QueryParams};

use crate::auth::AuthenticatedPrincipal;
use crate::error::Result;
use crate::handlers::{self, DataResponse, ReadAllResponse};
use crate::models::Notification;
use crate::AppState;

/// Create notification routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(index))
        .route("/notifications/read-all", post(read_all))
        .route("/notifications/{id}/read", put(read))
        .route("/notifications/{id}", delete(destroy))
}

/// GET /api/notifications
async fn index(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<QueryParams>,
) -> Result<Json<Formatted<Notification>>> {
    let page = handlers::list_notifications(&state, principal, &params, uri.path()).await?;
    Ok(Json(page))
}

/// PUT /api/notifications/{id}/read
async fn read(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(id): Path<u64>,
) -> Result<Json<DataResponse<Notification>>> {
    let notification = handlers::mark_notification_read(&state, principal, id).await?;
    Ok(Json(DataResponse::new(notification)))
}

/// POST /api/notifications/read-all
async fn read_all(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
) -> Result<Json<DataResponse<ReadAllResponse>>> {
    let response = handlers::mark_all_notifications_read(&state, principal).await?;
    Ok(Json(DataResponse::new(response)))
}

/// DELETE /api/notifications/{id}
async fn destroy(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    handlers::delete_notification(&state, principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
