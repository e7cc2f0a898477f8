/// Factory: build the token codec from application `Config`.
use std::sync::Arc;

use chrono::Duration;

use crate::config::{Config, ConfigError};
use crate::services::auth::token_codec::TokenCodec;

pub fn build_token_codec(config: &Config) -> Result<Arc<TokenCodec>, ConfigError> {
    let ttl_seconds = i64::try_from(config.jwt_expiration_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or(ConfigError::Invalid("JWT_EXPIRATION_SECONDS"))?;

    let codec = TokenCodec::from_base64url(&config.jwt_secret, ttl_seconds).map_err(|e| {
        tracing::error!(error = %e, "JWT_SECRET rejected");
        ConfigError::Invalid("JWT_SECRET")
    })?;

    Ok(Arc::new(codec))
}
