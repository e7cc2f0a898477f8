/*
 * Responsibility
 * - comidas (foods) CRUD contract, same shape as libros
 */
use async_trait::async_trait;

use crate::repos::error::RepoResult;
use crate::repos::page::{Page, PageRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Food {
    pub id: i64,
    pub name: String,
    pub origin_country: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodFields {
    pub name: String,
    pub origin_country: String,
}

#[async_trait]
pub trait FoodRepo: Send + Sync + 'static {
    async fn list(&self, page: PageRequest) -> RepoResult<Page<Food>>;

    async fn get(&self, id: i64) -> RepoResult<Option<Food>>;

    async fn create(&self, fields: FoodFields) -> RepoResult<Food>;

    async fn update(&self, id: i64, fields: FoodFields) -> RepoResult<Option<Food>>;

    async fn delete(&self, id: i64) -> RepoResult<bool>;
}
