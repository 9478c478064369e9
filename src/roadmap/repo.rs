use anyhow::Context;
use sqlx::{types::Json, Executor, Postgres};
use uuid::Uuid;

use super::model::RoadmapStep;
use super::repo_types::RoadmapRow;

const COLUMNS: &str = "user_id, steps, last_generated, created_at, updated_at";

pub async fn find_by_user<'e, E>(ex: E, user_id: Uuid) -> anyhow::Result<Option<RoadmapRow>>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, RoadmapRow>(&format!(
        "SELECT {COLUMNS} FROM roadmaps WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(ex)
    .await
    .context("get roadmap")?;
    Ok(row)
}

/// Insert the first roadmap or replace steps and timestamp of the existing one.
pub async fn upsert<'e, E>(ex: E, user_id: Uuid, steps: &[RoadmapStep]) -> anyhow::Result<RoadmapRow>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, RoadmapRow>(&format!(
        r#"
        INSERT INTO roadmaps (user_id, steps)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE
           SET steps = EXCLUDED.steps,
               last_generated = now(),
               updated_at = now()
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(Json(steps))
    .fetch_one(ex)
    .await
    .context("upsert roadmap")?;
    Ok(row)
}

/// Overwrite steps in place; `last_generated` is left alone.
pub async fn update_steps<'e, E>(
    ex: E,
    user_id: Uuid,
    steps: &[RoadmapStep],
) -> anyhow::Result<RoadmapRow>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, RoadmapRow>(&format!(
        r#"
        UPDATE roadmaps
           SET steps = $2, updated_at = now()
         WHERE user_id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(Json(steps))
    .fetch_one(ex)
    .await
    .context("update roadmap steps")?;
    Ok(row)
}

/// Returns false when there was nothing to delete.
pub async fn delete<'e, E>(ex: E, user_id: Uuid) -> anyhow::Result<bool>
where
    E: Executor<'e, Database = Postgres>,
{
    let res = sqlx::query("DELETE FROM roadmaps WHERE user_id = $1")
        .bind(user_id)
        .execute(ex)
        .await
        .context("delete roadmap")?;
    Ok(res.rows_affected() > 0)
}
