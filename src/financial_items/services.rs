use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{CreateItemRequest, ItemsListResponse, ItemsSummary, UpdateItemRequest};
use super::repo;
use super::repo_types::{FinancialItem, ItemCategory, ItemType};
use crate::error::{AppError, AppResult};
use crate::roadmap::model::FinancialState;
use crate::state::AppState;

/// Liabilities above this annual rate count as high-interest debt.
pub const HIGH_INTEREST_RATE: f64 = 10.0;

/// Validated field set for an insert or a full-row update.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub item_type: ItemType,
    pub category: ItemCategory,
    pub value: f64,
    pub monthly_impact: f64,
    pub interest_rate: f64,
}

impl ItemDraft {
    fn check(self) -> AppResult<Self> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Please provide all required fields"));
        }
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(AppError::validation("Value cannot be negative"));
        }
        if !self.monthly_impact.is_finite() || !self.interest_rate.is_finite() {
            return Err(AppError::validation("Amounts must be finite numbers"));
        }
        if self.interest_rate < 0.0 {
            return Err(AppError::validation("Interest rate cannot be negative"));
        }
        if self.category.item_type() != self.item_type {
            return Err(AppError::validation(format!(
                "Category {} does not belong to type {}",
                self.category.as_str(),
                self.item_type.as_str()
            )));
        }
        Ok(self)
    }

    pub fn from_create(req: CreateItemRequest) -> AppResult<Self> {
        ItemDraft {
            name: req.name.trim().to_string(),
            item_type: req.item_type.parse()?,
            category: req.category.parse()?,
            value: req.value,
            monthly_impact: req.monthly_impact.unwrap_or(0.0),
            interest_rate: req.interest_rate.unwrap_or(0.0),
        }
        .check()
    }

    /// Overlay a partial update on the stored item.
    pub fn from_update(item: &FinancialItem, req: UpdateItemRequest) -> AppResult<Self> {
        ItemDraft {
            name: req
                .name
                .map(|n| n.trim().to_string())
                .unwrap_or_else(|| item.name.clone()),
            item_type: match req.item_type {
                Some(t) => t.parse()?,
                None => item.item_type,
            },
            category: match req.category {
                Some(c) => c.parse()?,
                None => item.category,
            },
            value: req.value.unwrap_or(item.value),
            monthly_impact: req.monthly_impact.unwrap_or(item.monthly_impact),
            interest_rate: req.interest_rate.unwrap_or(item.interest_rate),
        }
        .check()
    }
}

/// Sum items by type and category into the generator's input snapshot.
pub fn financial_state(items: &[FinancialItem]) -> FinancialState {
    let mut st = FinancialState::default();
    for item in items {
        match item.item_type {
            ItemType::Asset => {
                st.total_assets += item.value;
                match item.category {
                    ItemCategory::CashSavings => st.cash_assets += item.value,
                    ItemCategory::StocksInvestments | ItemCategory::RetirementAccount => {
                        st.investment_assets += item.value
                    }
                    ItemCategory::Business => st.business_assets += item.value,
                    _ => {}
                }
            }
            ItemType::Liability => {
                st.total_liabilities += item.value;
                if item.interest_rate > HIGH_INTEREST_RATE {
                    st.has_high_interest_debt = true;
                }
            }
        }
    }
    st.net_worth = st.total_assets - st.total_liabilities;
    st
}

pub fn summarize(items: &[FinancialItem]) -> ItemsSummary {
    let st = financial_state(items);
    let asset_to_liability_ratio = if st.total_liabilities > 0.0 {
        format!("{:.2}", st.total_assets / st.total_liabilities)
    } else {
        "N/A".to_string()
    };
    ItemsSummary {
        total_assets: st.total_assets,
        total_liabilities: st.total_liabilities,
        net_worth: st.net_worth,
        asset_to_liability_ratio,
        has_high_interest_debt: st.has_high_interest_debt,
        item_count: items.len(),
    }
}

pub fn ensure_owner(item: &FinancialItem, user_id: Uuid) -> AppResult<()> {
    if item.user_id != user_id {
        warn!(item_id = %item.id, %user_id, "financial item owned by another user");
        return Err(AppError::Forbidden("Not authorized to access this item".into()));
    }
    Ok(())
}

pub async fn load_items(st: &AppState, user_id: Uuid) -> AppResult<Vec<FinancialItem>> {
    repo::list_by_user(&st.db, user_id)
        .await?
        .into_iter()
        .map(FinancialItem::try_from)
        .collect()
}

pub async fn list_items(st: &AppState, user_id: Uuid) -> AppResult<ItemsListResponse> {
    let items = load_items(st, user_id).await?;
    let summary = summarize(&items);
    Ok(ItemsListResponse { items, summary })
}

pub async fn get_owned(st: &AppState, user_id: Uuid, id: Uuid) -> AppResult<FinancialItem> {
    let item: FinancialItem = repo::find_by_id(&st.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Financial item not found"))?
        .try_into()?;
    ensure_owner(&item, user_id)?;
    Ok(item)
}

pub async fn create_item(
    st: &AppState,
    user_id: Uuid,
    req: CreateItemRequest,
) -> AppResult<FinancialItem> {
    let draft = ItemDraft::from_create(req)?;
    let item: FinancialItem = repo::insert(&st.db, user_id, &draft).await?.try_into()?;
    info!(%user_id, item_id = %item.id, category = item.category.as_str(), "financial item created");
    Ok(item)
}

pub async fn update_item(
    st: &AppState,
    user_id: Uuid,
    id: Uuid,
    req: UpdateItemRequest,
) -> AppResult<FinancialItem> {
    let current = get_owned(st, user_id, id).await?;
    let draft = ItemDraft::from_update(&current, req)?;
    let item: FinancialItem = repo::update(&st.db, id, &draft).await?.try_into()?;
    info!(%user_id, item_id = %item.id, "financial item updated");
    Ok(item)
}

pub async fn delete_item(st: &AppState, user_id: Uuid, id: Uuid) -> AppResult<()> {
    get_owned(st, user_id, id).await?;
    repo::delete(&st.db, id).await?;
    info!(%user_id, item_id = %id, "financial item deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn item(category: ItemCategory, value: f64, interest_rate: f64) -> FinancialItem {
        FinancialItem {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            name: category.as_str().to_string(),
            item_type: category.item_type(),
            category,
            value,
            monthly_impact: 0.0,
            interest_rate,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn create_req(item_type: &str, category: &str, value: f64) -> CreateItemRequest {
        CreateItemRequest {
            name: "  Savings account ".into(),
            item_type: item_type.into(),
            category: category.into(),
            value,
            monthly_impact: None,
            interest_rate: None,
        }
    }

    #[test]
    fn aggregates_by_type_and_category() {
        let items = vec![
            item(ItemCategory::CashSavings, 1000.0, 0.0),
            item(ItemCategory::CashSavings, 400.0, 0.0),
            item(ItemCategory::StocksInvestments, 2000.0, 0.0),
            item(ItemCategory::RetirementAccount, 3000.0, 0.0),
            item(ItemCategory::Business, 500.0, 0.0),
            item(ItemCategory::OtherAsset, 100.0, 0.0),
            item(ItemCategory::CarLoan, 8000.0, 6.5),
        ];
        let st = financial_state(&items);

        assert_eq!(st.total_assets, 7000.0);
        assert_eq!(st.total_liabilities, 8000.0);
        assert_eq!(st.net_worth, -1000.0);
        assert_eq!(st.cash_assets, 1400.0);
        assert_eq!(st.investment_assets, 5000.0);
        assert_eq!(st.business_assets, 500.0);
        assert!(!st.has_high_interest_debt);
    }

    #[test]
    fn flags_debt_strictly_above_ten_percent() {
        let at_limit = [item(ItemCategory::PersonalLoan, 1000.0, 10.0)];
        assert!(!financial_state(&at_limit).has_high_interest_debt);

        let above = [item(ItemCategory::CreditCard, 5000.0, 15.0)];
        let st = financial_state(&above);
        assert!(st.has_high_interest_debt);
        assert_eq!(st.total_liabilities, 5000.0);
    }

    #[test]
    fn summary_ratio_is_na_without_liabilities() {
        let summary = summarize(&[item(ItemCategory::CashSavings, 100.0, 0.0)]);
        assert_eq!(summary.asset_to_liability_ratio, "N/A");
        assert_eq!(summary.item_count, 1);

        let summary = summarize(&[
            item(ItemCategory::CashSavings, 100.0, 0.0),
            item(ItemCategory::StudentLoan, 300.0, 4.0),
        ]);
        assert_eq!(summary.asset_to_liability_ratio, "0.33");
        assert_eq!(summary.net_worth, -200.0);
    }

    #[test]
    fn create_defaults_and_trims() {
        let draft = ItemDraft::from_create(create_req("asset", "cash_savings", 250.0)).unwrap();
        assert_eq!(draft.name, "Savings account");
        assert_eq!(draft.monthly_impact, 0.0);
        assert_eq!(draft.interest_rate, 0.0);
    }

    #[test]
    fn create_rejects_bad_input() {
        for req in [
            create_req("equity", "cash_savings", 1.0),
            create_req("asset", "crypto", 1.0),
            create_req("asset", "cash_savings", -1.0),
            create_req("asset", "credit_card", 1.0),
            CreateItemRequest {
                name: "   ".into(),
                ..create_req("asset", "cash_savings", 1.0)
            },
        ] {
            assert!(matches!(ItemDraft::from_create(req), Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn update_overlays_only_given_fields() {
        let stored = item(ItemCategory::CreditCard, 900.0, 19.9);
        let draft = ItemDraft::from_update(
            &stored,
            UpdateItemRequest {
                value: Some(450.0),
                ..UpdateItemRequest::default()
            },
        )
        .unwrap();
        assert_eq!(draft.value, 450.0);
        assert_eq!(draft.interest_rate, 19.9);
        assert_eq!(draft.category, ItemCategory::CreditCard);
        assert_eq!(draft.name, stored.name);
    }

    #[test]
    fn update_rejects_type_category_mismatch() {
        let stored = item(ItemCategory::CreditCard, 900.0, 19.9);
        let err = ItemDraft::from_update(
            &stored,
            UpdateItemRequest {
                item_type: Some("asset".into()),
                ..UpdateItemRequest::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn ownership_is_enforced() {
        let it = item(ItemCategory::CashSavings, 1.0, 0.0);
        assert!(ensure_owner(&it, Uuid::nil()).is_ok());
        assert!(matches!(
            ensure_owner(&it, Uuid::new_v4()),
            Err(AppError::Forbidden(_))
        ));
    }
}
