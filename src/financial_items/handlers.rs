use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreateItemRequest, ItemResponse, ItemsListResponse, UpdateItemRequest};
use super::services;
use crate::{auth::AuthUser, dto::MessageResponse, state::AppState};

pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/financial-items", get(list_items).post(create_item))
        .route(
            "/financial-items/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
}

#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ItemsListResponse>, (StatusCode, String)> {
    Ok(Json(services::list_items(&state, user_id).await?))
}

#[instrument(skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemResponse>, (StatusCode, String)> {
    let item = services::get_owned(&state, user_id, id).await?;
    Ok(Json(ItemResponse { item }))
}

#[instrument(skip(state, payload))]
pub async fn create_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateItemRequest>,
) -> Result<(StatusCode, HeaderMap, Json<ItemResponse>), (StatusCode, String)> {
    let item = services::create_item(&state, user_id, payload).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/financial-items/{}", item.id).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }

    Ok((StatusCode::CREATED, headers, Json(ItemResponse { item })))
}

#[instrument(skip(state, payload))]
pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, (StatusCode, String)> {
    let item = services::update_item(&state, user_id, id, payload).await?;
    Ok(Json(ItemResponse { item }))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    services::delete_item(&state, user_id, id).await?;
    Ok(Json(MessageResponse::new("Financial item deleted successfully")))
}
