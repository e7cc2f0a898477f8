/*
 * Responsibility
 * - libros (books) CRUD contract
 * - update replaces every field (PUT semantics)
 */
use async_trait::async_trait;

use crate::repos::error::RepoResult;
use crate::repos::page::{Page, PageRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

#[async_trait]
pub trait BookRepo: Send + Sync + 'static {
    // Ordered by id ascending.
    async fn list(&self, page: PageRequest) -> RepoResult<Page<Book>>;

    async fn get(&self, id: i64) -> RepoResult<Option<Book>>;

    async fn create(&self, fields: BookFields) -> RepoResult<Book>;

    async fn update(&self, id: i64, fields: BookFields) -> RepoResult<Option<Book>>;

    // true if a row was removed
    async fn delete(&self, id: i64) -> RepoResult<bool>;
}
