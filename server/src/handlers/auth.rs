//! Login, registration and the current user.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::required_text;
use crate::auth::{AuthenticatedPrincipal, IssuedToken};
use crate::error::{AppError, Result};
use crate::models::{Role, User, UserView};
use crate::AppState;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Token plus the account it was issued for.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub token: IssuedToken,
    pub user: UserView,
}

async fn find_by_email(state: &AppState, email: &str) -> Result<Option<User>> {
    let email = email.trim();
    Ok(state
        .users
        .all()
        .await?
        .into_iter()
        .find(|u| u.email.eq_ignore_ascii_case(email)))
}

fn issue_for(state: &AppState, user: &User) -> Result<LoginResponse> {
    let principal = AuthenticatedPrincipal {
        id: user.id,
        role: user.role,
    };
    let token = state
        .authenticator
        .issue(&principal)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(LoginResponse {
        token,
        user: user.public(),
    })
}

/// Exchange credentials for an access token.
pub async fn login(state: &AppState, request: LoginRequest) -> Result<LoginResponse> {
    let user = find_by_email(state, &request.email).await?;

    match user {
        Some(user) if user.verify_password(&request.password) => {
            tracing::info!(user_id = user.id, "user logged in");
            issue_for(state, &user)
        }
        _ => Err(AppError::Unauthorized(format!(
            "invalid credentials for {}",
            request.email.trim()
        ))),
    }
}

/// Create a customer account and log it in.
pub async fn register(state: &AppState, request: RegisterRequest) -> Result<LoginResponse> {
    let name = required_text("name", &request.name)?;
    let email = required_text("email", &request.email)?.to_lowercase();

    if !email.contains('@') {
        return Err(AppError::validation("The email must be a valid email address."));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "The password must be at least {} characters.",
            MIN_PASSWORD_LEN
        )));
    }
    if find_by_email(state, &email).await?.is_some() {
        return Err(AppError::validation("The email has already been taken."));
    }

    let user = state
        .users
        .create(User {
            id: 0,
            name,
            email,
            role: Role::Customer,
            password_digest: User::digest_password(&request.password),
            created_at: Utc::now(),
        })
        .await?;

    tracing::info!(user_id = user.id, "user registered");
    issue_for(state, &user)
}

/// The account behind the presented token.
pub async fn current_user(state: &AppState, principal: AuthenticatedPrincipal) -> Result<UserView> {
    state
        .users
        .get(principal.id)
        .await?
        .map(|u| u.public())
        .ok_or_else(|| AppError::Unauthorized(format!("user {} no longer exists", principal.id)))
}
