/*
 * Responsibility
 * - POST /auth/signin, POST /auth/signup
 * - 認証は AuthService に委譲し、token を返す
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::auth::{SigninRequest, SignupRequest, TokenResponse},
        extractors::ApiJson,
    },
    error::AppError,
    state::AppState,
};

pub async fn signin(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SigninRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let issued = state.auth.signin(&req.email, &req.password).await?;
    Ok(Json(issued.into()))
}

pub async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    req.validate().map_err(AppError::invalid_request)?;

    let issued = state.auth.signup(req.into()).await?;
    Ok((StatusCode::CREATED, Json(issued.into())))
}
