use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::FinancialItemRow;
use super::services::ItemDraft;

const COLUMNS: &str = "id, user_id, name, item_type, category, value, monthly_impact, \
                       interest_rate, created_at, updated_at";

/// All items of a user, newest first.
pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<FinancialItemRow>> {
    let rows = sqlx::query_as::<_, FinancialItemRow>(&format!(
        "SELECT {COLUMNS} FROM financial_items WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list financial items")?;
    Ok(rows)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<FinancialItemRow>> {
    let row = sqlx::query_as::<_, FinancialItemRow>(&format!(
        "SELECT {COLUMNS} FROM financial_items WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
    .context("get financial item")?;
    Ok(row)
}

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    draft: &ItemDraft,
) -> anyhow::Result<FinancialItemRow> {
    let row = sqlx::query_as::<_, FinancialItemRow>(&format!(
        r#"
        INSERT INTO financial_items
            (user_id, name, item_type, category, value, monthly_impact, interest_rate)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&draft.name)
    .bind(draft.item_type.as_str())
    .bind(draft.category.as_str())
    .bind(draft.value)
    .bind(draft.monthly_impact)
    .bind(draft.interest_rate)
    .fetch_one(db)
    .await
    .context("insert financial item")?;
    Ok(row)
}

pub async fn update(db: &PgPool, id: Uuid, draft: &ItemDraft) -> anyhow::Result<FinancialItemRow> {
    let row = sqlx::query_as::<_, FinancialItemRow>(&format!(
        r#"
        UPDATE financial_items
           SET name = $2, item_type = $3, category = $4, value = $5,
               monthly_impact = $6, interest_rate = $7, updated_at = now()
         WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&draft.name)
    .bind(draft.item_type.as_str())
    .bind(draft.category.as_str())
    .bind(draft.value)
    .bind(draft.monthly_impact)
    .bind(draft.interest_rate)
    .fetch_one(db)
    .await
    .context("update financial item")?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM financial_items WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("delete financial item")?;
    Ok(())
}
