/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - repos (Postgres / in-memory のどちらか) と AuthService
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::{book_repo::BookRepo, food_repo::FoodRepo, user_repo::UserStore};
use crate::services::auth::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub books: Arc<dyn BookRepo>,
    pub foods: Arc<dyn FoodRepo>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        books: Arc<dyn BookRepo>,
        foods: Arc<dyn FoodRepo>,
        auth: Arc<AuthService>,
    ) -> Self {
        Self {
            users,
            books,
            foods,
            auth,
        }
    }
}
