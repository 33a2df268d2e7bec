use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A destination account for bank-transfer payments. `is_public` gates
/// whether the public registration form lists it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetail {
    pub id: Uuid,
    pub name: String,
    pub bank: String,
    pub acct_no: String,
    pub outreach_id: Option<Uuid>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBankRequest {
    pub name: String,
    pub bank: String,
    pub acct_no: String,
    pub outreach_id: Option<Uuid>,
    pub is_public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBankRequest {
    pub name: Option<String>,
    pub bank: Option<String>,
    pub acct_no: Option<String>,
    pub outreach_id: Option<Uuid>,
    pub is_public: Option<bool>,
}
