/*
 * Responsibility
 * - PostgreSQL (sqlx) implementations of the repository traits
 * - Pool construction
 * - Schema: migrations/ (applied outside the process)
 */
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

mod books;
mod foods;
mod users;

pub use books::PgBookRepo;
pub use foods::PgFoodRepo;
pub use users::PgUserStore;

pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
