//! Category routes.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use emporium_engine::{Formatted, QueryParams};

use crate::auth::AuthenticatedPrincipal;
use crate::error::Result;
use crate::handlers::{self, CategoryInput, DataResponse};
use crate::models::Category;
use crate::AppState;

/// Create category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(index).post(store))
        .route("/categories/{id}", get(show).put(update).delete(destroy))
}

/// GET /api/categories
async fn index(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<QueryParams>,
) -> Result<Json<Formatted<Category>>> {
    let page = handlers::list_categories(&state, &params, uri.path()).await?;
    Ok(Json(page))
}

/// GET /api/categories/{id}
async fn show(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DataResponse<Category>>> {
    let category = handlers::get_category(&state, id).await?;
    Ok(Json(DataResponse::new(category)))
}

/// POST /api/categories
async fn store(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<DataResponse<Category>>)> {
    let category = handlers::create_category(&state, principal, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(category))))
}

/// PUT /api/categories/{id}
async fn update(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(id): Path<u64>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<DataResponse<Category>>> {
    let category = handlers::update_category(&state, principal, id, input).await?;
    Ok(Json(DataResponse::new(category)))
}

/// DELETE /api/categories/{id}
async fn destroy(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    handlers::delete_category(&state, principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
