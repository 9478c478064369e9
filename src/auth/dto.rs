use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::roadmap::model::EmploymentStatus;

/// Request body for user registration. Profile fields are optional and may be
/// filled in later through `PUT /me/profile`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub monthly_income: Option<f64>,
    #[serde(default)]
    pub employment_status: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub monthly_income: Option<f64>,
    pub employment_status: Option<String>,
}

/// Response returned after login, register or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub profile: PublicProfile,
}

#[derive(Debug, Serialize)]
pub struct PublicProfile {
    pub monthly_income: f64,
    pub employment_status: EmploymentStatus,
}
