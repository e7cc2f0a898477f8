/*
 * Responsibility
 * - User / Role model and the credential store contract (UserStore)
 * - Lookup by email (token subject), listing, creation, role replacement
 * - Implementations live in repos::pg (PostgreSQL) and repos::memory
 */
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::error::RepoResult;

/// Authorization role. ADMIN does not imply USER.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    // Also accepts the legacy authority names (ROLE_USER / ROLE_ADMIN).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed.strip_prefix("ROLE_").unwrap_or(trimmed);
        match name.to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

pub type RoleSet = BTreeSet<Role>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    // never empty
    pub roles: RoleSet,
}

impl UserRecord {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub roles: RoleSet,
}

/// Credential store: system of record for identity, password hash and roles.
///
/// Reads must be safe to run concurrently; writes are serialized by the backend.
/// Emails are compared exactly as stored (callers normalise them).
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>>;

    async fn list(&self) -> RepoResult<Vec<UserRecord>>;

    // Fails with `RepoError::Conflict` when the email is already registered.
    async fn create(&self, user: NewUser) -> RepoResult<UserRecord>;

    // Replace the whole role set. Returns None when the user does not exist.
    async fn set_roles(&self, user_id: Uuid, roles: &RoleSet) -> RepoResult<Option<UserRecord>>;
}

pub(crate) fn parse_roles(raw: &[String]) -> RepoResult<RoleSet> {
    raw.iter()
        .map(|r| {
            r.parse::<Role>()
                .map_err(|e| crate::repos::error::RepoError::Corrupt(e.to_string()))
        })
        .collect()
}
