/*
 * Responsibility
 * - v1 の URL 構造を定義 (/auth, /libros, /comidas, /users, /resources)
 * - 認証・認可は app.rs で Router 全体に掛ける (ここでは route_layer を使わない)
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    auth::{signin, signup},
    books::{create_book, delete_book, get_book, list_books, update_book},
    foods::{create_food, delete_food, get_food, list_foods, update_food},
    resources::resources,
    users::{list_users, update_roles},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signin", post(signin))
        .route("/auth/signup", post(signup))
        .route("/libros", get(list_books).post(create_book))
        .route(
            "/libros/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .route("/comidas", get(list_foods).post(create_food))
        .route(
            "/comidas/{id}",
            get(get_food).put(update_food).delete(delete_food),
        )
        .route("/users", get(list_users))
        .route("/users/{user_id}/roles", put(update_roles))
        .route("/resources", get(resources))
}
