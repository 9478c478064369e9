use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::dto::{PublicProfile, PublicUser};
use crate::error::AppResult;
use crate::roadmap::model::UserProfile;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                     // unique user ID
    pub email: String,                // user email
    #[serde(skip_serializing)]
    pub password_hash: String,        // Argon2 hash, not exposed in JSON
    pub monthly_income: f64,          // self-reported, non-negative
    pub employment_status: String,    // student | employed | entrepreneur | other
    pub created_at: OffsetDateTime,   // creation timestamp
}

impl User {
    pub fn profile(&self) -> AppResult<UserProfile> {
        Ok(UserProfile {
            monthly_income: self.monthly_income,
            employment_status: self.employment_status.parse()?,
        })
    }

    pub fn to_public(&self) -> AppResult<PublicUser> {
        let profile = self.profile()?;
        Ok(PublicUser {
            id: self.id,
            email: self.email.clone(),
            profile: PublicProfile {
                monthly_income: profile.monthly_income,
                employment_status: profile.employment_status,
            },
        })
    }
}
