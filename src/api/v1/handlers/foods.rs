/*
 * Responsibility
 * - /comidas 系 CRUD handler (libros と同じ形)
 */
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::{
            foods::{FoodRequest, FoodResponse},
            page::{PageQuery, PageResponse},
        },
        extractors::{ApiJson, ApiPath, ApiQuery},
    },
    error::AppError,
    state::AppState,
};

const RESOURCE: &str = "comida";

pub async fn list_foods(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<PageResponse<FoodResponse>>, AppError> {
    let page = state.foods.list(query.into()).await?;
    Ok(Json(PageResponse::from_page(page)))
}

pub async fn get_food(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<FoodResponse>, AppError> {
    let food = state
        .foods
        .get(id)
        .await?
        .ok_or(AppError::not_found(RESOURCE))?;

    Ok(Json(food.into()))
}

pub async fn create_food(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<FoodRequest>,
) -> Result<(StatusCode, Json<FoodResponse>), AppError> {
    req.validate().map_err(AppError::invalid_request)?;

    let food = state.foods.create(req.into_fields()).await?;
    tracing::info!(food_id = food.id, "comida created");

    Ok((StatusCode::CREATED, Json(food.into())))
}

pub async fn update_food(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<FoodRequest>,
) -> Result<Json<FoodResponse>, AppError> {
    req.validate().map_err(AppError::invalid_request)?;

    let food = state
        .foods
        .update(id, req.into_fields())
        .await?
        .ok_or(AppError::not_found(RESOURCE))?;

    Ok(Json(food.into()))
}

pub async fn delete_food(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    if state.foods.delete(id).await? {
        tracing::info!(food_id = id, "comida deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(RESOURCE))
    }
}
