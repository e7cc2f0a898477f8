pub mod auth;
pub mod books;
pub mod foods;
pub mod page;
pub mod users;
