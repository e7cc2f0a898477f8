/*
 * Responsibility
 * - Meaning a repository reports upward (independent of the backend)
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),

    #[error("conflict: {0}")]
    Conflict(&'static str),

    // Stored data that cannot be mapped back into the domain (e.g. unknown role name).
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl RepoError {
    pub fn from_sqlx(e: sqlx::Error, conflict: &'static str) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23505")
        {
            return RepoError::Conflict(conflict);
        }
        RepoError::Db(e)
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
