use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Gender;

/// In-progress registration wizard state, keyed by a client-generated token.
/// Persisted so an attendee can resume after a reload; cleared explicitly
/// when the registration is submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDraft {
    pub token: Uuid,
    pub step: i64,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub crew: Option<String>,
    pub unit: Option<String>,
    pub level: Option<String>,
    pub amount: Option<f64>,
    pub bank_id: Option<Uuid>,
    pub outreach_id: Option<Uuid>,
    /// Set once step 2 has created the payment, so step 3 (proof upload)
    /// survives a reload.
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertDraftRequest {
    pub step: i64,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub crew: Option<String>,
    pub unit: Option<String>,
    pub level: Option<String>,
    pub amount: Option<f64>,
    pub bank_id: Option<Uuid>,
    pub outreach_id: Option<Uuid>,
    pub payment_id: Option<String>,
}
