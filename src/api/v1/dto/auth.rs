/*
 * Responsibility
 * - /auth (signin / signup) の request/response DTO
 * - signup の形式チェック validate()
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::auth::login::SignUp;
use crate::services::auth::token_codec::IssuedToken;

pub const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.first_name.trim().is_empty() {
            return Err("firstName is required");
        }
        if self.last_name.trim().is_empty() {
            return Err("lastName is required");
        }
        if self.email.trim().is_empty() {
            return Err("email is required");
        }
        if !self.email.contains('@') {
            return Err("email is not valid");
        }
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err("password must be at least 8 characters");
        }

        Ok(())
    }
}

impl From<SignupRequest> for SignUp {
    fn from(req: SignupRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            expires_at: issued.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SignupRequest {
        SignupRequest {
            first_name: "Alice".to_string(),
            last_name: "Johnson".to_string(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
        }
    }

    #[test]
    fn accepts_complete_request() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_blank_and_malformed_fields() {
        let mut req = valid();
        req.first_name = "  ".to_string();
        assert!(req.validate().is_err());

        let mut req = valid();
        req.email = "alice.example.com".to_string();
        assert_eq!(req.validate(), Err("email is not valid"));

        let mut req = valid();
        req.password = "short".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn wire_names_are_camel_case() {
        let req: SignupRequest = serde_json::from_str(
            r#"{"firstName":"A","lastName":"B","email":"a@b.c","password":"12345678"}"#,
        )
        .unwrap();
        assert_eq!(req.first_name, "A");
        assert_eq!(req.last_name, "B");
    }
}
