use anyhow::Context;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

/// Serialize writers on one user's goals and roadmap for the rest of `tx`.
///
/// Takes a transaction-scoped advisory lock keyed by the user id, so it is
/// released on commit or rollback.
pub async fn lock_user(tx: &mut Transaction<'_, Postgres>, user_id: Uuid) -> anyhow::Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
        .bind(user_id.to_string())
        .execute(&mut **tx)
        .await
        .context("acquire user lock")?;
    Ok(())
}
