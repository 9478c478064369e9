use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::roadmap::model::UserProfile;

const COLUMNS: &str = "id, email, password_hash, monthly_income, employment_status, created_at";

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(db)
            .await
            .context("find user by email")?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("find user by id")?;
        Ok(user)
    }

    /// Insert a user. The raw sqlx error is returned so callers can tell a
    /// taken email (unique violation) from other failures.
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        profile: &UserProfile,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, monthly_income, employment_status)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(email)
        .bind(password_hash)
        .bind(profile.monthly_income)
        .bind(profile.employment_status.as_str())
        .fetch_one(db)
        .await
    }

    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        profile: &UserProfile,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET monthly_income = $2, employment_status = $3
             WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(profile.monthly_income)
        .bind(profile.employment_status.as_str())
        .fetch_optional(db)
        .await
        .context("update user profile")?;
        Ok(user)
    }
}
