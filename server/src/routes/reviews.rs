//! Review routes.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use emporium_engine::{Formatted, QueryParams};

use crate::auth::{AuthenticatedPrincipal, OptionalPrincipal};
use crate::error::Result;
use crate::handlers::{self, CreateReview, DataResponse, UpdateReview};
use crate::models::Review;
use crate::AppState;

/// Create review routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", get(index).post(store))
        .route("/reviews/{id}", get(show).put(update).delete(destroy))
}

/// GET /api/reviews
async fn index(
    State(state): State<AppState>,
    viewer: OptionalPrincipal,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<QueryParams>,
) -> Result<Json<Formatted<Review>>> {
    let page = handlers::list_reviews(&state, viewer, &params, uri.path()).await?;
    Ok(Json(page))
}

/// GET /api/reviews/{id}
async fn show(
    State(state): State<AppState>,
    viewer: OptionalPrincipal,
    Path(id): Path<u64>,
) -> Result<Json<DataResponse<Review>>> {
    let review = handlers::get_review(&state, viewer, id).await?;
    Ok(Json(DataResponse::new(review)))
}

/// POST /api/reviews
async fn store(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Json(input): Json<CreateReview>,
) -> Result<(StatusCode, Json<DataResponse<Review>>)> {
    let review = handlers::create_review(&state, principal, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(review))))
}

/// PUT /api/reviews/{id}
async fn update(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(id): Path<u64>,
    Json(input): Json<UpdateReview>,
) -> Result<Json<DataResponse<Review>>> {
    let review = handlers::update_review(&state, principal, id, input).await?;
    Ok(Json(DataResponse::new(review)))
}

/// DELETE /api/reviews/{id}
async fn destroy(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    handlers::delete_review(&state, principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
