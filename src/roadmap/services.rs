use tracing::{debug, info, warn};
use uuid::Uuid;

use super::generator;
use super::model::{FinancialState, RoadmapStep};
use super::repo;
use super::repo_types::Roadmap;
use crate::auth::repo_types::User;
use crate::db::lock_user;
use crate::error::{AppError, AppResult};
use crate::financial_items::services::{financial_state, load_items};
use crate::goals::{self, repo_types::Goal};
use crate::state::AppState;

pub fn validate_progress(progress: f64) -> AppResult<()> {
    if !(0.0..=100.0).contains(&progress) {
        return Err(AppError::validation("Progress must be between 0 and 100"));
    }
    Ok(())
}

/// Step numbers start at 1; anything else names no step.
pub fn parse_step_number(raw: &str) -> AppResult<u32> {
    raw.parse::<u32>()
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| AppError::not_found("Step not found"))
}

/// Set progress on the step numbered `step_number`; 100 marks it complete.
pub fn apply_progress(steps: &mut [RoadmapStep], step_number: u32, progress: f64) -> AppResult<()> {
    validate_progress(progress)?;
    let step = steps
        .iter_mut()
        .find(|s| s.step_number == step_number)
        .ok_or_else(|| AppError::not_found("Step not found"))?;
    step.current_progress = progress;
    step.is_completed = progress == 100.0;
    Ok(())
}

pub async fn get_roadmap(st: &AppState, user_id: Uuid) -> AppResult<Roadmap> {
    repo::find_by_user(&st.db, user_id)
        .await?
        .map(Roadmap::from)
        .ok_or_else(|| {
            AppError::not_found(
                "No roadmap found. Generate one first by calling POST /api/roadmap/generate",
            )
        })
}

/// Aggregate the user's data, run the generator and replace the stored roadmap.
pub async fn generate_for_user(
    st: &AppState,
    user_id: Uuid,
) -> AppResult<(Roadmap, FinancialState)> {
    let user = User::find_by_id(&st.db, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    let profile = user.profile()?;

    let items = load_items(st, user_id).await?;
    let state = financial_state(&items);

    let mut tx = st.db.begin().await?;
    lock_user(&mut tx, user_id).await?;

    let goals = goals::repo::list_by_user(&mut *tx, user_id)
        .await?
        .into_iter()
        .map(Goal::try_from)
        .collect::<AppResult<Vec<_>>>()?;

    if goals.is_empty() {
        warn!(%user_id, "roadmap requested without goals");
        return Err(AppError::Precondition(
            "Please set at least one financial goal before generating a roadmap".into(),
        ));
    }

    let steps = generator::generate(&profile, &state, &goals);
    debug!(%user_id, steps = steps.len(), goals = goals.len(), "roadmap generated");

    let roadmap = Roadmap::from(repo::upsert(&mut *tx, user_id, &steps).await?);
    tx.commit().await?;

    info!(%user_id, steps = roadmap.steps.len(), "roadmap stored");
    Ok((roadmap, state))
}

pub async fn update_progress(
    st: &AppState,
    user_id: Uuid,
    step_number: u32,
    progress: f64,
) -> AppResult<Roadmap> {
    validate_progress(progress)?;

    let mut tx = st.db.begin().await?;
    lock_user(&mut tx, user_id).await?;

    let mut roadmap: Roadmap = repo::find_by_user(&mut *tx, user_id)
        .await?
        .map(Roadmap::from)
        .ok_or_else(|| AppError::not_found("Roadmap not found"))?;

    apply_progress(&mut roadmap.steps, step_number, progress)?;

    let roadmap = Roadmap::from(repo::update_steps(&mut *tx, user_id, &roadmap.steps).await?);
    tx.commit().await?;

    info!(%user_id, step_number, progress, "roadmap progress updated");
    Ok(roadmap)
}

pub async fn delete_roadmap(st: &AppState, user_id: Uuid) -> AppResult<()> {
    let mut tx = st.db.begin().await?;
    lock_user(&mut tx, user_id).await?;
    let deleted = repo::delete(&mut *tx, user_id).await?;
    if !deleted {
        return Err(AppError::not_found("No roadmap to delete"));
    }
    tx.commit().await?;
    info!(%user_id, "roadmap deleted");
    Ok(())
}
