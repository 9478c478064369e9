use serde::{Deserialize, Serialize};

use super::repo_types::Goal;

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub goal_type: String,
    pub priority: i64,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub target_amount: Option<f64>,
}

/// Goal type is fixed once created; everything else may change.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateGoalRequest {
    pub priority: Option<i64>,
    pub timeline: Option<String>,
    pub status: Option<String>,
    pub target_amount: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct GoalsListResponse {
    pub goals: Vec<Goal>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct GoalResponse {
    pub goal: Goal,
}
