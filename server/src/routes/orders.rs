//! Order routes. Every route requires a bearer token.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use emporium_engine::{Formatted, QueryParams};

use crate::auth::AuthenticatedPrincipal;
use crate::error::Result;
use crate::handlers::{self, CreateOrder, DataResponse, UpdateOrder};
use crate::models::Order;
use crate::AppState;

/// Create order routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(index).post(store))
        .route("/orders/{id}", get(show).put(update).delete(destroy))
}

/// GET /api/orders
async fn index(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<QueryParams>,
) -> Result<Json<Formatted<Order>>> {
    let page = handlers::list_orders(&state, principal, &params, uri.path()).await?;
    Ok(Json(page))
}

/// GET /api/orders/{id}
async fn show(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(id): Path<u64>,
) -> Result<Json<DataResponse<Order>>> {
    let order = handlers::get_order(&state, principal, id).await?;
    Ok(Json(DataResponse::new(order)))
}

/// POST /api/orders
async fn store(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Json(input): Json<CreateOrder>,
) -> Result<(StatusCode, Json<DataResponse<Order>>)> {
    let order = handlers::create_order(&state, principal, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(order))))
}

/// PUT /api/orders/{id}
async fn update(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(id): Path<u64>,
    Json(input): Json<UpdateOrder>,
) -> Result<Json<DataResponse<Order>>> {
    let order = handlers::update_order(&state, principal, id, input).await?;
    Ok(Json(DataResponse::new(order)))
}

/// DELETE /api/orders/{id}
async fn destroy(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    handlers::delete_order(&state, principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
