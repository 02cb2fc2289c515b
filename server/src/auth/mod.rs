//! Authentication.
//!
//! Handlers only ever see an [`AuthenticatedPrincipal`]. How a bearer token
//! turns into a principal is the business of the [`Authenticator`] held in
//! the application state; [`JwtAuthenticator`] is the implementation used
//! by the server.

mod jwt;
mod principal;

pub use jwt::JwtAuthenticator;
pub use principal::{AuthenticatedPrincipal, OptionalPrincipal};

use serde::Serialize;

/// An access token handed to a client.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

/// Authentication failures.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token could not be issued: {0}")]
    Issue(String),
}

/// Issues and verifies access tokens.
pub trait Authenticator: Send + Sync {
    fn issue(&self, principal: &AuthenticatedPrincipal) -> Result<IssuedToken, AuthError>;

    fn verify(&self, token: &str) -> Result<AuthenticatedPrincipal, AuthError>;
}
