use serde::{Deserialize, Serialize};

use super::model::FinancialState;
use super::repo_types::Roadmap;

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub progress: f64,
}

#[derive(Debug, Serialize)]
pub struct RoadmapResponse {
    pub roadmap: Roadmap,
}

#[derive(Debug, Serialize)]
pub struct GeneratedRoadmapResponse {
    pub message: String,
    pub roadmap: Roadmap,
    pub financial_state: FinancialState,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub message: String,
    pub roadmap: Roadmap,
}
