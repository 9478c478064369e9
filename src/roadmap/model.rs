//! Inputs and outputs of the roadmap generator.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Student,
    Employed,
    Entrepreneur,
    #[default]
    Other,
}

impl EmploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentStatus::Student => "student",
            EmploymentStatus::Employed => "employed",
            EmploymentStatus::Entrepreneur => "entrepreneur",
            EmploymentStatus::Other => "other",
        }
    }
}

impl FromStr for EmploymentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(EmploymentStatus::Student),
            "employed" => Ok(EmploymentStatus::Employed),
            "entrepreneur" => Ok(EmploymentStatus::Entrepreneur),
            "other" => Ok(EmploymentStatus::Other),
            _ => Err(AppError::validation(format!("Invalid employment status: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub monthly_income: f64,
    pub employment_status: EmploymentStatus,
}

/// Snapshot of a user's items, summed by type and category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialState {
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub net_worth: f64,
    pub cash_assets: f64,
    pub investment_assets: f64,
    pub business_assets: f64,
    pub has_high_interest_debt: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StepCategory {
    Foundation,
    WealthBuilding,
    Advanced,
    Preparation,
}

/// One actionable recommendation in a roadmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapStep {
    pub step_number: u32,
    pub title: String,
    pub description: String,
    pub category: StepCategory,
    /// 1 (most urgent) to 5. Ranks steps for ordering and trimming; unrelated
    /// to goal priority.
    pub priority: u8,
    pub can_run_parallel: bool,
    /// 0 means the step has no monetary target.
    pub target_amount: f64,
    pub current_progress: f64,
    #[serde(default)]
    pub is_completed: bool,
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employment_status_parses_known_values_only() {
        for status in [
            EmploymentStatus::Student,
            EmploymentStatus::Employed,
            EmploymentStatus::Entrepreneur,
            EmploymentStatus::Other,
        ] {
            assert_eq!(status.as_str().parse::<EmploymentStatus>().unwrap(), status);
        }
        assert!("Student".parse::<EmploymentStatus>().is_err());
        assert!("retired".parse::<EmploymentStatus>().is_err());
    }

    #[test]
    fn step_category_uses_kebab_case_on_the_wire() {
        let json = serde_json::to_string(&StepCategory::WealthBuilding).unwrap();
        assert_eq!(json, "\"wealth-building\"");
    }
}
