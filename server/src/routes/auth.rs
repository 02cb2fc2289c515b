//! Authentication routes.

use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};

use crate::auth::AuthenticatedPrincipal;
use crate::error::Result;
use crate::handlers::{self, DataResponse, LoginRequest, LoginResponse, RegisterRequest};
use crate::models::UserView;
use crate::AppState;

/// Create auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/me", get(me))
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    Ok(Json(handlers::login(&state, request).await?))
}

/// POST /api/auth/register
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<LoginResponse>)> {
    let response = handlers::register(&state, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/auth/me
async fn me(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
) -> Result<Json<DataResponse<UserView>>> {
    let user = handlers::current_user(&state, principal).await?;
    Ok(Json(DataResponse::new(user)))
}
