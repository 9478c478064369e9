use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{CreateGoalRequest, UpdateGoalRequest};
use super::repo;
use super::repo_types::{Goal, GoalStatus, GoalType, Timeline};
use crate::db::lock_user;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub const MAX_GOALS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct GoalDraft {
    pub goal_type: GoalType,
    pub priority: i16,
    pub timeline: Timeline,
    pub status: GoalStatus,
    pub target_amount: f64,
}

fn parse_priority(priority: i64) -> AppResult<i16> {
    if !(1..=3).contains(&priority) {
        return Err(AppError::validation("Priority must be between 1 and 3"));
    }
    Ok(priority as i16)
}

fn parse_target(amount: f64) -> AppResult<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::validation("Target amount cannot be negative"));
    }
    Ok(amount)
}

impl GoalDraft {
    /// Validate a new goal against the goals the user already holds.
    pub fn for_create(existing: &[Goal], req: CreateGoalRequest) -> AppResult<Self> {
        let goal_type: GoalType = req.goal_type.parse()?;
        let priority = parse_priority(req.priority)?;
        let timeline = match req.timeline {
            Some(t) => t.parse()?,
            None => Timeline::default(),
        };
        let target_amount = parse_target(req.target_amount.unwrap_or(0.0))?;

        if existing.len() >= MAX_GOALS {
            return Err(AppError::validation(
                "Maximum 3 goals allowed. Delete an existing goal first.",
            ));
        }
        if existing.iter().any(|g| g.goal_type == goal_type) {
            return Err(AppError::validation("You already have this goal type"));
        }

        Ok(Self {
            goal_type,
            priority,
            timeline,
            status: GoalStatus::default(),
            target_amount,
        })
    }

    pub fn for_update(goal: &Goal, req: UpdateGoalRequest) -> AppResult<Self> {
        Ok(Self {
            goal_type: goal.goal_type,
            priority: match req.priority {
                Some(p) => parse_priority(p)?,
                None => goal.priority,
            },
            timeline: match req.timeline {
                Some(t) => t.parse()?,
                None => goal.timeline,
            },
            status: match req.status {
                Some(s) => s.parse()?,
                None => goal.status,
            },
            target_amount: match req.target_amount {
                Some(a) => parse_target(a)?,
                None => goal.target_amount,
            },
        })
    }
}

fn ensure_owner(goal: &Goal, user_id: Uuid, action: &str) -> AppResult<()> {
    if goal.user_id != user_id {
        warn!(goal_id = %goal.id, %user_id, "goal owned by another user");
        return Err(AppError::Forbidden(format!(
            "Not authorized to {action} this goal"
        )));
    }
    Ok(())
}

pub async fn list_goals(st: &AppState, user_id: Uuid) -> AppResult<Vec<Goal>> {
    repo::list_by_user(&st.db, user_id)
        .await?
        .into_iter()
        .map(Goal::try_from)
        .collect()
}

pub async fn create_goal(st: &AppState, user_id: Uuid, req: CreateGoalRequest) -> AppResult<Goal> {
    let mut tx = st.db.begin().await?;
    lock_user(&mut tx, user_id).await?;

    let existing = repo::list_by_user(&mut *tx, user_id)
        .await?
        .into_iter()
        .map(Goal::try_from)
        .collect::<AppResult<Vec<_>>>()?;

    let draft = GoalDraft::for_create(&existing, req).map_err(|e| {
        warn!(%user_id, error = %e, "goal rejected");
        e
    })?;

    let goal: Goal = repo::insert(&mut *tx, user_id, &draft).await?.try_into()?;
    tx.commit().await?;

    info!(%user_id, goal_id = %goal.id, goal_type = goal.goal_type.as_str(), "goal created");
    Ok(goal)
}

async fn get_owned(st: &AppState, user_id: Uuid, id: Uuid, action: &str) -> AppResult<Goal> {
    let goal: Goal = repo::find_by_id(&st.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Goal not found"))?
        .try_into()?;
    ensure_owner(&goal, user_id, action)?;
    Ok(goal)
}

pub async fn update_goal(
    st: &AppState,
    user_id: Uuid,
    id: Uuid,
    req: UpdateGoalRequest,
) -> AppResult<Goal> {
    let current = get_owned(st, user_id, id, "update").await?;
    let draft = GoalDraft::for_update(&current, req)?;
    let goal: Goal = repo::update(&st.db, id, &draft).await?.try_into()?;
    info!(%user_id, goal_id = %goal.id, "goal updated");
    Ok(goal)
}

pub async fn delete_goal(st: &AppState, user_id: Uuid, id: Uuid) -> AppResult<()> {
    get_owned(st, user_id, id, "delete").await?;
    repo::delete(&st.db, id).await?;
    info!(%user_id, goal_id = %id, "goal deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn stored(goal_type: GoalType, priority: i16) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            goal_type,
            priority,
            timeline: Timeline::Long,
            status: GoalStatus::InProgress,
            target_amount: 0.0,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn create(goal_type: &str, priority: i64) -> CreateGoalRequest {
        CreateGoalRequest {
            goal_type: goal_type.into(),
            priority,
            timeline: None,
            target_amount: None,
        }
    }

    fn validation_msg(res: AppResult<GoalDraft>) -> String {
        match res {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_applies_defaults() {
        let draft = GoalDraft::for_create(&[], create("retire_early", 2)).unwrap();
        assert_eq!(draft.goal_type, GoalType::RetireEarly);
        assert_eq!(draft.priority, 2);
        assert_eq!(draft.timeline, Timeline::Medium);
        assert_eq!(draft.status, GoalStatus::NotStarted);
        assert_eq!(draft.target_amount, 0.0);
    }

    #[test]
    fn create_rejects_unknown_type_and_bad_priority() {
        assert_eq!(
            validation_msg(GoalDraft::for_create(&[], create("buy_yacht", 1))),
            "Invalid goal type"
        );
        for p in [0, 4, -1] {
            assert_eq!(
                validation_msg(GoalDraft::for_create(&[], create("retire_early", p))),
                "Priority must be between 1 and 3"
            );
        }
    }

    #[test]
    fn create_rejects_fourth_goal() {
        let existing = [
            stored(GoalType::EmergencyFund, 1),
            stored(GoalType::DebtFreedom, 2),
            stored(GoalType::StartInvesting, 3),
        ];
        let msg = validation_msg(GoalDraft::for_create(&existing, create("retire_early", 1)));
        assert!(msg.starts_with("Maximum 3 goals allowed"));
    }

    #[test]
    fn create_rejects_duplicate_type() {
        let existing = [stored(GoalType::PassiveIncome, 1)];
        assert_eq!(
            validation_msg(GoalDraft::for_create(&existing, create("passive_income", 2))),
            "You already have this goal type"
        );
    }

    #[test]
    fn update_keeps_type_and_overlays_fields() {
        let goal = stored(GoalType::StartBusiness, 1);
        let draft = GoalDraft::for_update(
            &goal,
            UpdateGoalRequest {
                priority: Some(3),
                status: Some("completed".into()),
                ..UpdateGoalRequest::default()
            },
        )
        .unwrap();
        assert_eq!(draft.goal_type, GoalType::StartBusiness);
        assert_eq!(draft.priority, 3);
        assert_eq!(draft.status, GoalStatus::Completed);
        assert_eq!(draft.timeline, Timeline::Long);
    }

    #[test]
    fn update_rejects_bad_values() {
        let goal = stored(GoalType::StartBusiness, 1);
        for req in [
            UpdateGoalRequest {
                priority: Some(9),
                ..UpdateGoalRequest::default()
            },
            UpdateGoalRequest {
                timeline: Some("forever".into()),
                ..UpdateGoalRequest::default()
            },
            UpdateGoalRequest {
                target_amount: Some(-5.0),
                ..UpdateGoalRequest::default()
            },
        ] {
            assert!(matches!(
                GoalDraft::for_update(&goal, req),
                Err(AppError::Validation(_))
            ));
        }
    }

    #[test]
    fn foreign_goals_are_forbidden() {
        let goal = stored(GoalType::RetireEarly, 1);
        let err = ensure_owner(&goal, Uuid::new_v4(), "delete").unwrap_err();
        assert_eq!(err.to_string(), "Not authorized to delete this goal");
    }
}
