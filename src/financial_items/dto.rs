use serde::{Deserialize, Serialize};

use super::repo_types::FinancialItem;

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub category: String,
    pub value: f64,
    #[serde(default)]
    pub monthly_impact: Option<f64>,
    #[serde(default)]
    pub interest_rate: Option<f64>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub category: Option<String>,
    pub value: Option<f64>,
    pub monthly_impact: Option<f64>,
    pub interest_rate: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ItemsSummary {
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub net_worth: f64,
    /// Two-decimal string, or "N/A" when there are no liabilities.
    pub asset_to_liability_ratio: String,
    pub has_high_interest_debt: bool,
    pub item_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ItemsListResponse {
    pub items: Vec<FinancialItem>,
    pub summary: ItemsSummary,
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub item: FinancialItem,
}
