use std::sync::Arc;

use tracing::{info, warn};

use crate::error::AppError;
use crate::repos::error::RepoError;
use crate::repos::user_repo::{NewUser, Role, RoleSet, UserStore};
use crate::services::auth::password::{hash_password, verify_dummy, verify_password};
use crate::services::auth::token_codec::{IssuedToken, TokenCodec};

/// Emails are stored and looked up trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[derive(Debug, Clone)]
pub struct SignUp {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Sign-in / sign-up on top of the credential store and the token codec.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenCodec>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenCodec>) -> Self {
        Self { users, tokens }
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn signin(&self, email: &str, password: &str) -> Result<IssuedToken, AppError> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            verify_dummy(password);
            warn!("sign-in for unknown account");
            return Err(AppError::Unauthorized);
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "sign-in with wrong password");
            return Err(AppError::Unauthorized);
        }

        info!(user_id = %user.id, "signed in");
        self.issue(&user.email)
    }

    /// New accounts always start with the USER role only.
    pub async fn signup(&self, request: SignUp) -> Result<IssuedToken, AppError> {
        let user = self
            .users
            .create(NewUser {
                email: normalize_email(&request.email),
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
                password_hash: hash_password(&request.password)?,
                roles: RoleSet::from([Role::User]),
            })
            .await?;

        info!(user_id = %user.id, "account created");
        self.issue(&user.email)
    }

    /// Create an ADMIN account unless the email is already registered.
    /// Returns true when an account was created.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<bool, AppError> {
        let email = normalize_email(email);
        if let Some(existing) = self.users.find_by_email(&email).await? {
            if !existing.has_role(Role::Admin) {
                warn!(user_id = %existing.id, "bootstrap admin email belongs to a non-admin account");
            }
            return Ok(false);
        }

        let created = self
            .users
            .create(NewUser {
                email: email.clone(),
                first_name: "Admin".to_string(),
                last_name: String::new(),
                password_hash: hash_password(password)?,
                roles: RoleSet::from([Role::Admin]),
            })
            .await;

        match created {
            Ok(user) => {
                info!(user_id = %user.id, backend = self.users.backend_name(), "bootstrap admin created");
                Ok(true)
            }
            // created concurrently by another instance
            Err(RepoError::Conflict(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn issue(&self, subject: &str) -> Result<IssuedToken, AppError> {
        self.tokens.issue_now(subject).map_err(|e| {
            tracing::error!(error = %e, "failed to issue token");
            AppError::Internal
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::memory::InMemoryUserStore;
    use chrono::Duration;

    fn service() -> (AuthService, Arc<InMemoryUserStore>, Arc<TokenCodec>) {
        let users = Arc::new(InMemoryUserStore::new());
        let tokens = Arc::new(
            TokenCodec::new(b"0123456789abcdef0123456789abcdef", Duration::hours(10)).unwrap(),
        );
        (AuthService::new(users.clone(), tokens.clone()), users, tokens)
    }

    fn alice() -> SignUp {
        SignUp {
            first_name: "Alice".to_string(),
            last_name: "Johnson".to_string(),
            email: "  Alice.Johnson@Example.com ".to_string(),
            password: "password123".to_string(),
        }
    }

    #[tokio::test]
    async fn signup_creates_user_role_account_and_token() {
        let (service, users, tokens) = service();
        let issued = service.signup(alice()).await.unwrap();

        let subject = tokens.parse(&issued.token).unwrap().subject;
        assert_eq!(subject, "alice.johnson@example.com");

        let stored = users.find_by_email(&subject).await.unwrap().unwrap();
        assert_eq!(stored.roles, RoleSet::from([Role::User]));
        assert_ne!(stored.password_hash, "password123");
    }

    #[tokio::test]
    async fn duplicate_signup_is_conflict() {
        let (service, _, _) = service();
        service.signup(alice()).await.unwrap();
        let err = service.signup(alice()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn signin_checks_password() {
        let (service, _, tokens) = service();
        service.signup(alice()).await.unwrap();

        let issued = service
            .signin("alice.johnson@example.com", "password123")
            .await
            .unwrap();
        assert!(tokens.parse(&issued.token).is_ok());

        let wrong = service
            .signin("alice.johnson@example.com", "password124")
            .await
            .unwrap_err();
        assert!(matches!(wrong, AppError::Unauthorized));

        let unknown = service
            .signin("nobody@example.com", "password123")
            .await
            .unwrap_err();
        assert!(matches!(unknown, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn unknown_account_and_wrong_password_fail_alike() {
        let (service, _, _) = service();
        service.signup(alice()).await.unwrap();

        let wrong = service
            .signin("alice.johnson@example.com", "password124")
            .await
            .unwrap_err();
        let unknown = service
            .signin("nobody@example.com", "password124")
            .await
            .unwrap_err();

        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(unknown, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let (service, users, _) = service();
        assert!(service.ensure_admin("Bob@example.com", "password456").await.unwrap());
        assert!(!service.ensure_admin("bob@example.com", "other-password").await.unwrap());

        let bob = users.find_by_email("bob@example.com").await.unwrap().unwrap();
        assert_eq!(bob.roles, RoleSet::from([Role::Admin]));
        assert!(verify_password("password456", &bob.password_hash).unwrap());
    }

    #[tokio::test]
    async fn ensure_admin_leaves_an_existing_user_account_alone() {
        let (service, users, _) = service();
        service.signup(alice()).await.unwrap();

        assert!(!service.ensure_admin("alice.johnson@example.com", "password456").await.unwrap());
        let alice = users.find_by_email("alice.johnson@example.com").await.unwrap().unwrap();
        assert!(alice.has_role(Role::User));
        assert!(!alice.has_role(Role::Admin));
    }
}
