use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    EmergencyFund,
    DebtFreedom,
    StartInvesting,
    StartBusiness,
    RetireEarly,
    PassiveIncome,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::EmergencyFund => "emergency_fund",
            GoalType::DebtFreedom => "debt_freedom",
            GoalType::StartInvesting => "start_investing",
            GoalType::StartBusiness => "start_business",
            GoalType::RetireEarly => "retire_early",
            GoalType::PassiveIncome => "passive_income",
        }
    }
}

impl FromStr for GoalType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "emergency_fund" => Ok(GoalType::EmergencyFund),
            "debt_freedom" => Ok(GoalType::DebtFreedom),
            "start_investing" => Ok(GoalType::StartInvesting),
            "start_business" => Ok(GoalType::StartBusiness),
            "retire_early" => Ok(GoalType::RetireEarly),
            "passive_income" => Ok(GoalType::PassiveIncome),
            _ => Err(AppError::validation("Invalid goal type")),
        }
    }
}

/// short: 0-2 years, medium: 2-5 years, long: 5+ years.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Timeline {
    Short,
    #[default]
    Medium,
    Long,
}

impl Timeline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeline::Short => "short",
            Timeline::Medium => "medium",
            Timeline::Long => "long",
        }
    }
}

impl FromStr for Timeline {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(Timeline::Short),
            "medium" => Ok(Timeline::Medium),
            "long" => Ok(Timeline::Long),
            _ => Err(AppError::validation("Invalid timeline")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::NotStarted => "not_started",
            GoalStatus::InProgress => "in_progress",
            GoalStatus::Completed => "completed",
        }
    }
}

impl FromStr for GoalStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(GoalStatus::NotStarted),
            "in_progress" => Ok(GoalStatus::InProgress),
            "completed" => Ok(GoalStatus::Completed),
            _ => Err(AppError::validation("Invalid goal status")),
        }
    }
}

/// A stored goal, as consumed by the roadmap generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_type: GoalType,
    /// 1 = highest, 3 = lowest.
    pub priority: i16,
    pub timeline: Timeline,
    pub status: GoalStatus,
    pub target_amount: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct GoalRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_type: String,
    pub priority: i16,
    pub timeline: String,
    pub status: String,
    pub target_amount: f64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<GoalRow> for Goal {
    type Error = AppError;

    fn try_from(r: GoalRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            goal_type: r.goal_type.parse()?,
            priority: r.priority,
            timeline: r.timeline.parse()?,
            status: r.status.parse()?,
            target_amount: r.target_amount,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}
