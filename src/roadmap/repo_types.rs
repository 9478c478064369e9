use serde::Serialize;
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use super::model::RoadmapStep;

/// A user's stored roadmap.
#[derive(Debug, Clone, Serialize)]
pub struct Roadmap {
    pub user_id: Uuid,
    pub steps: Vec<RoadmapStep>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_generated: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub struct RoadmapRow {
    pub user_id: Uuid,
    pub steps: Json<Vec<RoadmapStep>>,
    pub last_generated: OffsetDateTime,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<RoadmapRow> for Roadmap {
    fn from(r: RoadmapRow) -> Self {
        Self {
            user_id: r.user_id,
            steps: r.steps.0,
            last_generated: r.last_generated,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
