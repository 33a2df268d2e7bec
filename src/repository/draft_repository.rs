use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Gender, RegistrationDraft, UpsertDraftRequest},
    error::{AppError, Result},
    repository::DraftRepository,
};

#[derive(FromRow)]
struct DraftRow {
    token: String,
    step: i64,
    name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    gender: Option<String>,
    crew: Option<String>,
    unit: Option<String>,
    level: Option<String>,
    amount: Option<f64>,
    bank_id: Option<String>,
    outreach_id: Option<String>,
    payment_id: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteDraftRepository {
    pool: SqlitePool,
}

impl SqliteDraftRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_draft(row: DraftRow) -> Result<RegistrationDraft> {
        let gender = row
            .gender
            .map(|s| {
                Gender::parse(&s)
                    .ok_or_else(|| AppError::Database(format!("Invalid gender: {}", s)))
            })
            .transpose()?;

        Ok(RegistrationDraft {
            token: Uuid::parse_str(&row.token).map_err(|e| AppError::Database(e.to_string()))?,
            step: row.step,
            name: row.name,
            phone: row.phone,
            email: row.email,
            gender,
            crew: row.crew,
            unit: row.unit,
            level: row.level,
            amount: row.amount,
            bank_id: Self::parse_optional_uuid(row.bank_id)?,
            outreach_id: Self::parse_optional_uuid(row.outreach_id)?,
            payment_id: row.payment_id,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn parse_optional_uuid(value: Option<String>) -> Result<Option<Uuid>> {
        value
            .map(|s| Uuid::parse_str(&s).map_err(|e| AppError::Database(e.to_string())))
            .transpose()
    }
}

#[async_trait]
impl DraftRepository for SqliteDraftRepository {
    async fn upsert(&self, token: Uuid, draft: UpsertDraftRequest) -> Result<RegistrationDraft> {
        let token_str = token.to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO registration_drafts (
                token, step, name, phone, email, gender, crew, unit, level,
                amount, bank_id, outreach_id, payment_id, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(token) DO UPDATE SET
                step = excluded.step,
                name = excluded.name,
                phone = excluded.phone,
                email = excluded.email,
                gender = excluded.gender,
                crew = excluded.crew,
                unit = excluded.unit,
                level = excluded.level,
                amount = excluded.amount,
                bank_id = excluded.bank_id,
                outreach_id = excluded.outreach_id,
                payment_id = excluded.payment_id,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&token_str)
        .bind(draft.step)
        .bind(&draft.name)
        .bind(&draft.phone)
        .bind(&draft.email)
        .bind(draft.gender.map(|g| g.as_str()))
        .bind(&draft.crew)
        .bind(&draft.unit)
        .bind(&draft.level)
        .bind(draft.amount)
        .bind(draft.bank_id.map(|id| id.to_string()))
        .bind(draft.outreach_id.map(|id| id.to_string()))
        .bind(&draft.payment_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find(token).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve saved draft".to_string())
        })
    }

    async fn find(&self, token: Uuid) -> Result<Option<RegistrationDraft>> {
        let token_str = token.to_string();
        let row = sqlx::query_as::<_, DraftRow>(
            r#"
            SELECT token, step, name, phone, email, gender, crew, unit, level,
                   amount, bank_id, outreach_id, payment_id, created_at, updated_at
            FROM registration_drafts
            WHERE token = ?
            "#,
        )
        .bind(token_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_draft(r)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, token: Uuid) -> Result<()> {
        let token_str = token.to_string();
        sqlx::query("DELETE FROM registration_drafts WHERE token = ?")
            .bind(&token_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
