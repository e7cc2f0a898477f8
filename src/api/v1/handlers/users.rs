/*
 * Responsibility
 * - /users 系 handler (ADMIN 専用; 認可は middleware 側)
 * - 一覧と role の付け替えのみ。password hash は返さない
 */
use axum::{Json, extract::State};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::users::{UpdateRolesRequest, UserResponse},
        extractors::{ApiJson, ApiPath, AuthCtxExtractor},
    },
    error::AppError,
    state::AppState,
};

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Replaces the whole role set. Takes effect on the user's next request.
pub async fn update_roles(
    State(state): State<AppState>,
    AuthCtxExtractor(actor): AuthCtxExtractor,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateRolesRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let roles = req.validate().map_err(AppError::invalid_request)?;

    let user = state
        .users
        .set_roles(user_id, &roles)
        .await?
        .ok_or(AppError::not_found("user"))?;

    tracing::info!(
        actor = %actor.user_id,
        %user_id,
        roles = ?roles,
        "roles replaced"
    );

    Ok(Json(user.into()))
}
