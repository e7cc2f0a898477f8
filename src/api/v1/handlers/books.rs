/*
 * Responsibility
 * - /libros 系 CRUD handler
 * - 認可 (GET: USER/ADMIN, 書き込み: ADMIN) は authorize middleware 側で済んでいる
 */
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::{
            books::{BookRequest, BookResponse},
            page::{PageQuery, PageResponse},
        },
        extractors::{ApiJson, ApiPath, ApiQuery},
    },
    error::AppError,
    state::AppState,
};

const RESOURCE: &str = "libro";

pub async fn list_books(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<PageResponse<BookResponse>>, AppError> {
    let page = state.books.list(query.into()).await?;
    Ok(Json(PageResponse::from_page(page)))
}

pub async fn get_book(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<BookResponse>, AppError> {
    let book = state
        .books
        .get(id)
        .await?
        .ok_or(AppError::not_found(RESOURCE))?;

    Ok(Json(book.into()))
}

pub async fn create_book(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), AppError> {
    req.validate().map_err(AppError::invalid_request)?;

    let book = state.books.create(req.into_fields()).await?;
    tracing::info!(book_id = book.id, "libro created");

    Ok((StatusCode::CREATED, Json(book.into())))
}

pub async fn update_book(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<BookRequest>,
) -> Result<Json<BookResponse>, AppError> {
    req.validate().map_err(AppError::invalid_request)?;

    let book = state
        .books
        .update(id, req.into_fields())
        .await?
        .ok_or(AppError::not_found(RESOURCE))?;

    Ok(Json(book.into()))
}

pub async fn delete_book(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    if state.books.delete(id).await? {
        tracing::info!(book_id = id, "libro deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(RESOURCE))
    }
}
