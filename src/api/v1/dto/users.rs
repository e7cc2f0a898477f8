/*
 * Responsibility
 * - Users の request/response DTO
 * - password hash は決して返さない
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::user_repo::{Role, RoleSet, UserRecord};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<Role>,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            roles: user.roles.into_iter().collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRolesRequest {
    pub roles: Vec<String>,
}

impl UpdateRolesRequest {
    /// Accepts `USER` / `ADMIN` (and the `ROLE_` prefixed forms).
    pub fn validate(&self) -> Result<RoleSet, String> {
        if self.roles.is_empty() {
            return Err("roles must not be empty".to_string());
        }
        self.roles
            .iter()
            .map(|r| r.parse::<Role>().map_err(|e| e.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_parse_into_a_set() {
        let req = UpdateRolesRequest {
            roles: vec!["ADMIN".to_string(), "ROLE_USER".to_string(), "ADMIN".to_string()],
        };
        assert_eq!(req.validate().unwrap(), RoleSet::from([Role::User, Role::Admin]));
    }

    #[test]
    fn empty_or_unknown_roles_are_rejected() {
        assert!(UpdateRolesRequest { roles: vec![] }.validate().is_err());
        assert!(
            UpdateRolesRequest {
                roles: vec!["ROOT".to_string()]
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn response_has_no_password_hash() {
        let json = serde_json::to_value(UserResponse::from(UserRecord {
            id: Uuid::nil(),
            email: "a@b.c".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            roles: RoleSet::from([Role::User]),
        }))
        .unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["roles"], serde_json::json!(["USER"]));
        assert_eq!(json["firstName"], "A");
    }
}
