use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A registration with its bank-transfer payment state. The id is the
/// human-readable "PRE/NNN" identifier assigned at creation time, not a
/// store-generated key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Gender,
    pub crew: Option<String>,
    pub unit: Option<String>,
    pub level: Option<String>,
    pub paid_amount: Option<f64>,
    pub pending_amount: Option<f64>,
    pub payment_status: PaymentStatus,
    pub outreach_id: Option<Uuid>,
    pub bank_id: Option<Uuid>,
    #[serde(rename = "proof_image")]
    pub proof_image: Vec<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "TEXT")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    NotPaid,
    Pending,
    Partial,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::NotPaid => "NOT_PAID",
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Partial => "PARTIAL",
            PaymentStatus::Paid => "PAID",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NOT_PAID" => Some(PaymentStatus::NotPaid),
            "PENDING" => Some(PaymentStatus::Pending),
            "PARTIAL" => Some(PaymentStatus::Partial),
            "PAID" => Some(PaymentStatus::Paid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "TEXT")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Unspecified,
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Unspecified => "UNSPECIFIED",
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "UNSPECIFIED" => Some(Gender::Unspecified),
            "MALE" => Some(Gender::Male),
            "FEMALE" => Some(Gender::Female),
            _ => None,
        }
    }
}

fn default_unit() -> Option<String> {
    Some("President".to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 10, message = "phone must be at least 10 characters"))]
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub crew: Option<String>,
    #[serde(default = "default_unit")]
    pub unit: Option<String>,
    pub level: Option<String>,
    #[validate(range(min = 500.0, message = "paidAmount must be at least 500"))]
    pub paid_amount: Option<f64>,
    pub pending_amount: Option<f64>,
    pub payment_status: Option<PaymentStatus>,
    pub outreach_id: Option<Uuid>,
    pub bank_id: Option<Uuid>,
    #[serde(rename = "proof_image")]
    pub proof_image: Option<Vec<String>>,
    /// Wizard draft to clear once the registration lands.
    pub draft_token: Option<Uuid>,
}

/// Partial admin update. A supplied `pending_amount` is ADDED to the stored
/// value and forces the status to PENDING; every other field replaces.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub crew: Option<String>,
    pub unit: Option<String>,
    pub level: Option<String>,
    pub paid_amount: Option<f64>,
    pub pending_amount: Option<f64>,
    pub payment_status: Option<PaymentStatus>,
    pub bank_id: Option<Uuid>,
}

/// List/search/stats predicate. `None` means the dimension is unfiltered
/// (the "*" sentinel on the wire).
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub q: Option<String>,
    pub status: Option<PaymentStatus>,
    pub outreach_id: Option<Uuid>,
    pub bank_id: Option<Uuid>,
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStats {
    pub total_paid: i64,
    pub total_pending: i64,
    pub total_paid_amount: f64,
    pub pending_paid_amount: f64,
    pub completed_paid_amount: f64,
}

/// Search result for the public top-up flow: the payment plus display labels
/// for its outreach and bank account.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSearchHit {
    #[serde(flatten)]
    pub payment: Payment,
    pub outreach: Option<String>,
    pub bank: String,
}
