use anyhow::Context;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use super::repo_types::GoalRow;
use super::services::GoalDraft;

const COLUMNS: &str =
    "id, user_id, goal_type, priority, timeline, status, target_amount, created_at, updated_at";

/// Goals of a user, highest priority first.
pub async fn list_by_user<'e, E>(ex: E, user_id: Uuid) -> anyhow::Result<Vec<GoalRow>>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, GoalRow>(&format!(
        "SELECT {COLUMNS} FROM goals WHERE user_id = $1 ORDER BY priority ASC, created_at ASC"
    ))
    .bind(user_id)
    .fetch_all(ex)
    .await
    .context("list goals")?;
    Ok(rows)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<GoalRow>> {
    let row = sqlx::query_as::<_, GoalRow>(&format!("SELECT {COLUMNS} FROM goals WHERE id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("get goal")?;
    Ok(row)
}

pub async fn insert<'e, E>(ex: E, user_id: Uuid, draft: &GoalDraft) -> anyhow::Result<GoalRow>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, GoalRow>(&format!(
        r#"
        INSERT INTO goals (user_id, goal_type, priority, timeline, status, target_amount)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(draft.goal_type.as_str())
    .bind(draft.priority)
    .bind(draft.timeline.as_str())
    .bind(draft.status.as_str())
    .bind(draft.target_amount)
    .fetch_one(ex)
    .await
    .context("insert goal")?;
    Ok(row)
}

pub async fn update(db: &PgPool, id: Uuid, draft: &GoalDraft) -> anyhow::Result<GoalRow> {
    let row = sqlx::query_as::<_, GoalRow>(&format!(
        r#"
        UPDATE goals
           SET priority = $2, timeline = $3, status = $4, target_amount = $5,
               updated_at = now()
         WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(draft.priority)
    .bind(draft.timeline.as_str())
    .bind(draft.status.as_str())
    .bind(draft.target_amount)
    .fetch_one(db)
    .await
    .context("update goal")?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM goals WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("delete goal")?;
    Ok(())
}
