//! HS256 JWT access tokens.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{AuthError, AuthenticatedPrincipal, Authenticator, IssuedToken};
use crate::models::Role;

/// JWT claims carried by access tokens.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id
    sub: String,
    role: Role,
    exp: i64,
    iat: i64,
    jti: String,
}

/// Signs and verifies tokens with a shared secret.
#[derive(Clone)]
pub struct JwtAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl JwtAuthenticator {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }
}

impl Authenticator for JwtAuthenticator {
    fn issue(&self, principal: &AuthenticatedPrincipal) -> Result<IssuedToken, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: principal.id.to_string(),
            role: principal.role,
            exp: now + self.ttl_secs as i64,
            iat: now,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Issue(e.to_string()))?;

        Ok(IssuedToken {
            access_token,
            token_type: "Bearer",
            expires_in: self.ttl_secs,
        })
    }

    fn verify(&self, token: &str) -> Result<AuthenticatedPrincipal, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let id = data
            .claims
            .sub
            .parse::<u64>()
            .map_err(|_| AuthError::InvalidToken("subject is not a user id".to_string()))?;

        Ok(AuthenticatedPrincipal {
            id,
            role: data.claims.role,
        })
    }
}
