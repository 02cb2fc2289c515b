//! Product routes.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use emporium_engine::{Formatted, QueryParams};

use crate::auth::{AuthenticatedPrincipal, OptionalPrincipal};
use crate::error::Result;
use crate::handlers::{self, DataResponse, ProductInput};
use crate::models::Product;
use crate::AppState;

/// Create product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(index).post(store))
        .route("/products/{id}", get(show).put(update).delete(destroy))
}

/// GET /api/products
async fn index(
    State(state): State<AppState>,
    viewer: OptionalPrincipal,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<QueryParams>,
) -> Result<Json<Formatted<Product>>> {
    let page = handlers::list_products(&state, viewer, &params, uri.path()).await?;
    Ok(Json(page))
}

/// GET /api/products/{id}
async fn show(
    State(state): State<AppState>,
    viewer: OptionalPrincipal,
    Path(id): Path<u64>,
) -> Result<Json<DataResponse<Product>>> {
    let product = handlers::get_product(&state, viewer, id).await?;
    Ok(Json(DataResponse::new(product)))
}

/// POST /api/products
async fn store(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<DataResponse<Product>>)> {
    let product = handlers::create_product(&state, principal, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(product))))
}

/// PUT /api/products/{id}
async fn update(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(id): Path<u64>,
    Json(input): Json<ProductInput>,
) -> Result<Json<DataResponse<Product>>> {
    let product = handlers::update_product(&state, principal, id, input).await?;
    Ok(Json(DataResponse::new(product)))
}

/// DELETE /api/products/{id}
async fn destroy(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    handlers::delete_product(&state, principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
