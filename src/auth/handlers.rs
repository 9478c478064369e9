use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use super::dto::{
    AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest, UpdateProfileRequest,
};
use super::services;
use super::tokens::AuthUser;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me/profile", put(update_profile))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, String)> {
    let res = services::register(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    Ok(Json(services::login(&state, payload).await?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    Ok(Json(services::refresh(&state, payload).await?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    Ok(Json(services::current_user(&state, user_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    Ok(Json(services::update_profile(&state, user_id, payload).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::dto::PublicProfile;
    use crate::roadmap::model::EmploymentStatus;
    use uuid::Uuid;

    #[test]
    fn public_user_nests_profile() {
        let user = PublicUser {
            id: Uuid::nil(),
            email: "saver@example.com".to_string(),
            profile: PublicProfile {
                monthly_income: 3200.0,
                employment_status: EmploymentStatus::Entrepreneur,
            },
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["email"], "saver@example.com");
        assert_eq!(json["profile"]["employment_status"], "entrepreneur");
        assert_eq!(json["profile"]["monthly_income"], 3200.0);
        assert!(json.get("password_hash").is_none());
    }
}
