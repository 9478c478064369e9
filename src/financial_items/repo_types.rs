use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Asset,
    Liability,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Asset => "asset",
            ItemType::Liability => "liability",
        }
    }
}

impl FromStr for ItemType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asset" => Ok(ItemType::Asset),
            "liability" => Ok(ItemType::Liability),
            _ => Err(AppError::validation("Type must be either asset or liability")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    // assets
    CashSavings,
    StocksInvestments,
    RetirementAccount,
    Business,
    OtherAsset,
    // liabilities
    CreditCard,
    PersonalLoan,
    CarLoan,
    StudentLoan,
    OtherLiability,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::CashSavings => "cash_savings",
            ItemCategory::StocksInvestments => "stocks_investments",
            ItemCategory::RetirementAccount => "retirement_account",
            ItemCategory::Business => "business",
            ItemCategory::OtherAsset => "other_asset",
            ItemCategory::CreditCard => "credit_card",
            ItemCategory::PersonalLoan => "personal_loan",
            ItemCategory::CarLoan => "car_loan",
            ItemCategory::StudentLoan => "student_loan",
            ItemCategory::OtherLiability => "other_liability",
        }
    }

    /// The item type this category belongs to.
    pub fn item_type(&self) -> ItemType {
        match self {
            ItemCategory::CashSavings
            | ItemCategory::StocksInvestments
            | ItemCategory::RetirementAccount
            | ItemCategory::Business
            | ItemCategory::OtherAsset => ItemType::Asset,
            ItemCategory::CreditCard
            | ItemCategory::PersonalLoan
            | ItemCategory::CarLoan
            | ItemCategory::StudentLoan
            | ItemCategory::OtherLiability => ItemType::Liability,
        }
    }
}

impl FromStr for ItemCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = match s {
            "cash_savings" => ItemCategory::CashSavings,
            "stocks_investments" => ItemCategory::StocksInvestments,
            "retirement_account" => ItemCategory::RetirementAccount,
            "business" => ItemCategory::Business,
            "other_asset" => ItemCategory::OtherAsset,
            "credit_card" => ItemCategory::CreditCard,
            "personal_loan" => ItemCategory::PersonalLoan,
            "car_loan" => ItemCategory::CarLoan,
            "student_loan" => ItemCategory::StudentLoan,
            "other_liability" => ItemCategory::OtherLiability,
            _ => return Err(AppError::validation("Invalid category")),
        };
        Ok(category)
    }
}

/// A single asset or liability owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub category: ItemCategory,
    pub value: f64,
    /// Positive for income-generating assets, negative for debt payments.
    pub monthly_impact: f64,
    /// Annual percentage; meaningful for liabilities.
    pub interest_rate: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct FinancialItemRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub item_type: String,
    pub category: String,
    pub value: f64,
    pub monthly_impact: f64,
    pub interest_rate: f64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<FinancialItemRow> for FinancialItem {
    type Error = AppError;

    fn try_from(r: FinancialItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            name: r.name,
            item_type: r.item_type.parse()?,
            category: r.category.parse()?,
            value: r.value,
            monthly_impact: r.monthly_impact,
            interest_rate: r.interest_rate,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}
