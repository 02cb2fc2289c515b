//! Users and roles.

use chrono::{DateTime, Utc};
use emporium_engine::Queryable;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::borrow::Cow;

use super::Entity;

/// Role carried in access tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

/// A shop account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Hex BLAKE3 digest of the password. Never serialized to clients.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Digest a plaintext password for storage or comparison.
    pub fn digest_password(password: &str) -> String {
        blake3::hash(password.as_bytes()).to_hex().to_string()
    }

    pub fn verify_password(&self, password: &str) -> bool {
        !self.password_digest.is_empty() && self.password_digest == Self::digest_password(password)
    }

    /// Client-facing view without credentials.
    pub fn public(&self) -> UserView {
        UserView {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// What clients see of a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserView {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Entity for User {
    const COLLECTION: &'static str = "users";
    const NAME: &'static str = "User";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl Queryable for User {
    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        let value = match name {
            "id" => json!(self.id),
            "name" => json!(self.name),
            "email" => json!(self.email),
            "role" => json!(self.role),
            "created_at" => json!(self.created_at),
            _ => return None,
        };
        Some(Cow::Owned(value))
    }
}
