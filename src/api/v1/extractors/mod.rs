/*
 * Responsibility
 * - v1 handler 用の extractor (AuthCtx / JSON body / path / query)
 * - rejection はすべて AppError の JSON error body になる
 */
mod auth_ctx;
mod json;
mod params;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use json::ApiJson;
pub use params::{ApiPath, ApiQuery};
