/*
 * Responsibility
 * - users table (roles kept as TEXT[])
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::user_repo::{NewUser, RoleSet, UserRecord, UserStore, parse_roles};

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    password_hash: String,
    roles: Vec<String>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = RepoError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let roles = parse_roles(&row.roles)?;
        if roles.is_empty() {
            return Err(RepoError::Corrupt(format!("user {} has no roles", row.id)));
        }

        Ok(UserRecord {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            password_hash: row.password_hash,
            roles,
        })
    }
}

fn role_names(roles: &RoleSet) -> Vec<String> {
    roles.iter().map(|r| r.as_str().to_string()).collect()
}

#[derive(Clone, Debug)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, first_name, last_name, password_hash, roles
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn list(&self) -> RepoResult<Vec<UserRecord>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, first_name, last_name, password_hash, roles
            FROM users
            ORDER BY email
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(UserRecord::try_from).collect()
    }

    async fn create(&self, user: NewUser) -> RepoResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, first_name, last_name, password_hash, roles)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, first_name, last_name, password_hash, roles
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(role_names(&user.roles))
        .fetch_one(&self.db)
        .await
        .map_err(|e| RepoError::from_sqlx(e, "email already registered"))?;

        UserRecord::try_from(row)
    }

    async fn set_roles(&self, user_id: Uuid, roles: &RoleSet) -> RepoResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET roles = $2
            WHERE id = $1
            RETURNING id, email, first_name, last_name, password_hash, roles
            "#,
        )
        .bind(user_id)
        .bind(role_names(roles))
        .fetch_optional(&self.db)
        .await?;

        row.map(UserRecord::try_from).transpose()
    }
}
