use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{instrument, warn};

use super::dto::{GeneratedRoadmapResponse, ProgressRequest, ProgressResponse, RoadmapResponse};
use super::services;
use crate::{auth::AuthUser, dto::MessageResponse, state::AppState};

pub fn roadmap_routes() -> Router<AppState> {
    Router::new()
        .route("/roadmap", get(get_roadmap).delete(delete_roadmap))
        .route("/roadmap/generate", post(generate_roadmap))
        .route("/roadmap/progress/:step_number", put(update_progress))
}

#[instrument(skip(state))]
pub async fn get_roadmap(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<RoadmapResponse>, (StatusCode, String)> {
    let roadmap = services::get_roadmap(&state, user_id).await?;
    Ok(Json(RoadmapResponse { roadmap }))
}

#[instrument(skip(state))]
pub async fn generate_roadmap(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<GeneratedRoadmapResponse>, (StatusCode, String)> {
    let (roadmap, financial_state) = services::generate_for_user(&state, user_id).await?;
    Ok(Json(GeneratedRoadmapResponse {
        message: "Roadmap generated successfully".into(),
        roadmap,
        financial_state,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_progress(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(step_number): Path<String>,
    Json(payload): Json<ProgressRequest>,
) -> Result<Json<ProgressResponse>, (StatusCode, String)> {
    if let Err(e) = services::validate_progress(payload.progress) {
        warn!(%user_id, %step_number, progress = payload.progress, "progress out of range");
        return Err(e.into());
    }
    let step_number = services::parse_step_number(&step_number)?;
    let roadmap =
        services::update_progress(&state, user_id, step_number, payload.progress).await?;
    Ok(Json(ProgressResponse {
        message: "Progress updated successfully".into(),
        roadmap,
    }))
}

#[instrument(skip(state))]
pub async fn delete_roadmap(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    services::delete_roadmap(&state, user_id).await?;
    Ok(Json(MessageResponse::new("Roadmap deleted successfully")))
}
