// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{ClientError, ClientResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_CURRENCY: &str = "INR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Debit,
    Credit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Debit => "debit",
            TransactionType::Credit => "credit",
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, TransactionType::Credit)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debit" | "expense" => Ok(TransactionType::Debit),
            "credit" | "income" => Ok(TransactionType::Credit),
            _ => Err(ClientError::validation(
                "Type must be either \"debit\" or \"credit\"",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Expense,
    Income,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: CategoryKind,
}

pub const CATEGORIES: &[Category] = &[
    Category { id: "food", name: "Food & Drinks", kind: CategoryKind::Expense },
    Category { id: "shopping", name: "Shopping", kind: CategoryKind::Expense },
    Category { id: "transportation", name: "Transportation", kind: CategoryKind::Expense },
    Category { id: "entertainment", name: "Entertainment", kind: CategoryKind::Expense },
    Category { id: "bills", name: "Bills", kind: CategoryKind::Expense },
    Category { id: "upi", name: "UPI", kind: CategoryKind::Expense },
    Category { id: "banking", name: "Banking", kind: CategoryKind::Expense },
    Category { id: "investment", name: "Investment", kind: CategoryKind::Expense },
    Category { id: "healthcare", name: "Healthcare", kind: CategoryKind::Expense },
    Category { id: "education", name: "Education", kind: CategoryKind::Expense },
    Category { id: "travel", name: "Travel", kind: CategoryKind::Expense },
    Category { id: "subscription", name: "Subscription", kind: CategoryKind::Expense },
    Category { id: "income", name: "Income", kind: CategoryKind::Income },
    Category { id: "other", name: "Other", kind: CategoryKind::Expense },
];

impl Category {
    /// Matches a display name or slug, ignoring case.
    pub fn lookup(s: &str) -> Option<&'static Category> {
        let s = s.trim();
        CATEGORIES
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(s) || c.id.eq_ignore_ascii_case(s))
    }
}

/// A transaction as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub transaction_date: Option<String>,
    #[serde(default)]
    pub receipt_url: Option<String>,
    #[serde(default)]
    pub receipt_filename: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Transaction {
    pub fn display_title(&self) -> &str {
        self.description
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.title.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("Transaction")
    }

    /// Date the transaction happened, falling back to when it was recorded.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.transaction_date
            .as_deref()
            .or(self.created_at.as_deref())
            .and_then(|s| s.get(..10))
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    }

    /// Amount with the sign implied by its type.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Credit => self.amount.abs(),
            TransactionType::Debit => -self.amount.abs(),
        }
    }
}

/// Raw form input for a new transaction, validated before any request.
#[derive(Debug, Clone, Default)]
pub struct TransactionDraft {
    pub title: String,
    pub amount: String,
    pub category: String,
    pub is_expense: bool,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub currency: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    pub tags: Vec<String>,
    pub description: String,
    pub reference: String,
    pub transaction_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_filename: Option<String>,
}

/// Parses a user-entered amount; anything non-numeric or not strictly positive is rejected.
pub fn parse_positive_amount(raw: &str) -> ClientResult<Decimal> {
    let amount = raw
        .trim()
        .parse::<Decimal>()
        .map_err(|_| ClientError::validation("Please enter a valid amount"))?;
    if amount <= Decimal::ZERO {
        return Err(ClientError::validation("Please enter a valid amount"));
    }
    Ok(amount)
}

impl TransactionDraft {
    pub fn validate(&self, today: NaiveDate) -> ClientResult<NewTransaction> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ClientError::validation("Please enter a transaction title"));
        }
        let amount = parse_positive_amount(&self.amount)?;
        if self.category.trim().is_empty() {
            return Err(ClientError::validation("Please select a category"));
        }
        let category = Category::lookup(&self.category).ok_or_else(|| {
            ClientError::validation(format!("Unknown category '{}'", self.category.trim()))
        })?;
        let kind = if self.is_expense {
            TransactionType::Debit
        } else {
            TransactionType::Credit
        };
        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(title);
        let reference = self
            .reference
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(title);
        Ok(NewTransaction {
            amount,
            currency: self
                .currency
                .clone()
                .unwrap_or_else(default_currency)
                .to_uppercase(),
            kind,
            category: category.name.to_string(),
            tags: self.tags.clone(),
            description: description.to_string(),
            reference: reference.to_string(),
            transaction_date: self.transaction_date.unwrap_or(today).to_string(),
            receipt_url: None,
            receipt_filename: None,
        })
    }
}

/// Partial update sent with PUT; absent fields are left alone by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        *self == TransactionPatch::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilters {
    pub category: Option<String>,
    pub kind: Option<TransactionType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl TransactionFilters {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut q = Vec::new();
        if let Some(c) = &self.category {
            q.push(("category".to_string(), c.clone()));
        }
        if let Some(k) = self.kind {
            q.push(("type".to_string(), k.to_string()));
        }
        if let Some(d) = self.start_date {
            q.push(("start_date".to_string(), d.to_string()));
        }
        if let Some(d) = self.end_date {
            q.push(("end_date".to_string(), d.to_string()));
        }
        if let Some(l) = self.limit {
            q.push(("limit".to_string(), l.to_string()));
        }
        if let Some(o) = self.offset.filter(|o| *o > 0) {
            q.push(("offset".to_string(), o.to_string()));
        }
        q
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    #[serde(default)]
    pub balance: Decimal,
    #[serde(default)]
    pub income: Decimal,
    #[serde(default)]
    pub expenses: Decimal,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Day, Period::Week, Period::Month, Period::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.as_str() == s.trim())
            .ok_or_else(|| {
                ClientError::validation("Invalid period. Must be one of: day, week, month, year")
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    #[serde(default)]
    pub period: Option<Period>,
    #[serde(default)]
    pub balance: Decimal,
    #[serde(default)]
    pub income: Decimal,
    #[serde(default)]
    pub expenses: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    #[serde(default)]
    pub total: Decimal,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialBreakdown {
    #[serde(default)]
    pub period: Option<Period>,
    #[serde(default)]
    pub categories: Vec<CategoryBreakdown>,
    /// Anything else the backend adds is kept for `--json` output.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodData {
    pub summary: FinancialSummary,
    pub breakdown: FinancialBreakdown,
}

/// Identity fields owned by the session provider; never edited from here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Identity {
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The backend's own copy of the user's editable fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutableProfile {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// What the profile editor shows and edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub profile_image: Option<String>,
}

/// Body of `PUT /users/profile`: only fields that changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(rename = "firstName", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(rename = "phoneNumber", skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ProfileUpdate::default()
    }
}

/// A user row in the backend's `/users` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, rename = "lastName")]
    pub last_name: Option<String>,
    #[serde(default, alias = "phoneNumber")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Transaction as the extraction endpoint returns it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExtractedTransaction {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

/// An extracted transaction held locally until the user saves or cancels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateTransaction {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub transaction_date: String,
    pub reference: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub id: u64,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}
