use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreateGoalRequest, GoalResponse, GoalsListResponse, UpdateGoalRequest};
use super::services;
use crate::{auth::AuthUser, dto::MessageResponse, state::AppState};

pub fn goal_routes() -> Router<AppState> {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route("/goals/:id", put(update_goal).delete(delete_goal))
}

#[instrument(skip(state))]
pub async fn list_goals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<GoalsListResponse>, (StatusCode, String)> {
    let goals = services::list_goals(&state, user_id).await?;
    let count = goals.len();
    Ok(Json(GoalsListResponse { goals, count }))
}

#[instrument(skip(state, payload))]
pub async fn create_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<GoalResponse>), (StatusCode, String)> {
    let goal = services::create_goal(&state, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(GoalResponse { goal })))
}

#[instrument(skip(state, payload))]
pub async fn update_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGoalRequest>,
) -> Result<Json<GoalResponse>, (StatusCode, String)> {
    let goal = services::update_goal(&state, user_id, id, payload).await?;
    Ok(Json(GoalResponse { goal }))
}

#[instrument(skip(state))]
pub async fn delete_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    services::delete_goal(&state, user_id, id).await?;
    Ok(Json(MessageResponse::new("Goal deleted successfully")))
}
