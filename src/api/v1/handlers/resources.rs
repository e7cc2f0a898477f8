/*
 * Responsibility
 * - GET /resources: 認証済みなら誰でも。呼び出し元と role (ADMIN かどうか) を返す
 */
use axum::Json;
use serde::Serialize;

use crate::api::v1::extractors::AuthCtxExtractor;
use crate::repos::user_repo::Role;

#[derive(Debug, Serialize)]
pub struct ResourcesResponse {
    pub message: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub admin: bool,
}

pub async fn resources(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<ResourcesResponse> {
    let names: Vec<&str> = ctx.roles.iter().map(Role::as_str).collect();
    let admin = ctx.has_role(Role::Admin);

    Json(ResourcesResponse {
        message: format!("Hello {}, your roles: {}", ctx.email, names.join(", ")),
        email: ctx.email,
        roles: ctx.roles.into_iter().collect(),
        admin,
    })
}
