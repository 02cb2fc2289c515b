//! Request extractors for the calling user.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::models::Role;
use crate::AppState;

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    pub id: u64,
    pub role: Role,
}

impl AuthenticatedPrincipal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fail with 403 unless the caller is an admin.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// Whether the caller may act on something owned by `owner_id`.
    pub fn can_access(&self, owner_id: u64) -> bool {
        self.is_admin() || self.id == owner_id
    }
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let header = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("authorization header is not valid text".into()))?;

    match header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim())),
        Some(_) => Err(AppError::Unauthorized("empty bearer token".into())),
        None => Err(AppError::Unauthorized(
            "invalid authorization header format".into(),
        )),
    }
}

impl FromRequestParts<AppState> for AuthenticatedPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| AppError::Unauthorized("missing authorization header".into()))?;

        state
            .authenticator
            .verify(token)
            .map_err(|e| AppError::Unauthorized(e.to_string()))
    }
}

/// Caller if a valid token was presented. Requests without a token pass
/// through anonymously; requests with a bad token are still rejected.
#[derive(Debug, Clone, Copy)]
pub struct OptionalPrincipal(pub Option<AuthenticatedPrincipal>);

impl OptionalPrincipal {
    pub fn is_admin(&self) -> bool {
        self.0.is_some_and(|p| p.is_admin())
    }
}

impl FromRequestParts<AppState> for OptionalPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if bearer_token(parts)?.is_none() {
            return Ok(OptionalPrincipal(None));
        }

        let principal = AuthenticatedPrincipal::from_request_parts(parts, state).await?;
        Ok(OptionalPrincipal(Some(principal)))
    }
}
