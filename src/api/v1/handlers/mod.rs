pub mod auth;
pub mod books;
pub mod foods;
pub mod health;
pub mod resources;
pub mod users;
