/*
 * Responsibility
 * - Repository contracts (traits) and their backends
 */
pub mod book_repo;
pub mod error;
pub mod food_repo;
pub mod memory;
pub mod page;
pub mod pg;
pub mod user_repo;
