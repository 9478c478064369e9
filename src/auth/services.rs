use anyhow::anyhow;
use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{
    AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest, UpdateProfileRequest,
};
use super::repo_types::User;
use super::tokens::{JwtKeys, TokenKind};
use crate::error::{AppError, AppResult};
use crate::roadmap::model::{EmploymentStatus, UserProfile};
use crate::state::AppState;

pub const MIN_PASSWORD_LEN: usize = 8;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Trimmed, lowercased email, or a validation error.
pub fn normalize_email(raw: &str) -> AppResult<String> {
    let email = raw.trim().to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(AppError::validation("Invalid email"));
    }
    Ok(email)
}

/// Merge optional profile fields from a request onto `base`.
pub fn merge_profile(
    base: UserProfile,
    monthly_income: Option<f64>,
    employment_status: Option<&str>,
) -> AppResult<UserProfile> {
    let mut profile = base;
    if let Some(income) = monthly_income {
        if !income.is_finite() || income < 0.0 {
            return Err(AppError::validation("Monthly income cannot be negative"));
        }
        profile.monthly_income = income;
    }
    if let Some(status) = employment_status {
        profile.employment_status = status.parse::<EmploymentStatus>()?;
    }
    Ok(profile)
}

pub fn hash_password(plain: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow!("hash password: {e}"))?;
    Ok(hash.to_string())
}

/// False on a wrong password; an unreadable stored hash is an internal error.
pub fn password_matches(plain: &str, stored_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| anyhow!("parse stored hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// A taken email surfaces as a unique violation when two registrations race
/// past the lookup.
fn map_create_error(err: sqlx::Error) -> AppError {
    let taken = err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if taken {
        return AppError::Conflict("Email already registered".into());
    }
    AppError::from(err)
}

fn respond(keys: &JwtKeys, user: &User) -> AppResult<AuthResponse> {
    let pair = keys.issue_pair(user.id)?;
    Ok(AuthResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        user: user.to_public()?,
    })
}

pub async fn register(st: &AppState, req: RegisterRequest) -> AppResult<AuthResponse> {
    let email = normalize_email(&req.email)?;
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation("Password too short"));
    }
    let profile = merge_profile(
        UserProfile::default(),
        req.monthly_income,
        req.employment_status.as_deref(),
    )?;

    if User::find_by_email(&st.db, &email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&req.password)?;
    let user = User::create(&st.db, &email, &hash, &profile)
        .await
        .map_err(map_create_error)?;

    info!(user_id = %user.id, "user registered");
    respond(&JwtKeys::from(&st.config.jwt), &user)
}

pub async fn login(st: &AppState, req: LoginRequest) -> AppResult<AuthResponse> {
    let email = normalize_email(&req.email)?;
    let invalid = || AppError::Unauthorized("Invalid credentials".into());

    let Some(user) = User::find_by_email(&st.db, &email).await? else {
        warn!(%email, "login for unknown email");
        return Err(invalid());
    };
    if !password_matches(&req.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(invalid());
    }

    info!(user_id = %user.id, "user logged in");
    respond(&JwtKeys::from(&st.config.jwt), &user)
}

pub async fn refresh(st: &AppState, req: RefreshRequest) -> AppResult<AuthResponse> {
    let keys = JwtKeys::from(&st.config.jwt);
    let claims = keys.verify(&req.refresh_token, TokenKind::Refresh)?;
    let user = User::find_by_id(&st.db, claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    respond(&keys, &user)
}

pub async fn current_user(st: &AppState, user_id: Uuid) -> AppResult<PublicUser> {
    User::find_by_id(&st.db, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?
        .to_public()
}

pub async fn update_profile(
    st: &AppState,
    user_id: Uuid,
    req: UpdateProfileRequest,
) -> AppResult<PublicUser> {
    // Reject bad fields before touching the database.
    merge_profile(
        UserProfile::default(),
        req.monthly_income,
        req.employment_status.as_deref(),
    )?;

    let user = User::find_by_id(&st.db, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    let profile = merge_profile(
        user.profile()?,
        req.monthly_income,
        req.employment_status.as_deref(),
    )?;

    let updated = User::update_profile(&st.db, user_id, &profile)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    info!(
        %user_id,
        monthly_income = profile.monthly_income,
        employment_status = profile.employment_status.as_str(),
        "profile updated"
    );
    updated.to_public()
}
