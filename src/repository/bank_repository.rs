use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{BankDetail, CreateBankRequest, UpdateBankRequest},
    error::{AppError, Result},
    repository::BankRepository,
};

#[derive(FromRow)]
struct BankRow {
    id: String,
    name: String,
    bank: String,
    acct_no: String,
    outreach_id: Option<String>,
    is_public: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteBankRepository {
    pool: SqlitePool,
}

impl SqliteBankRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_bank(row: BankRow) -> Result<BankDetail> {
        Ok(BankDetail {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            bank: row.bank,
            acct_no: row.acct_no,
            outreach_id: row
                .outreach_id
                .map(|s| Uuid::parse_str(&s).map_err(|e| AppError::Database(e.to_string())))
                .transpose()?,
            is_public: row.is_public != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl BankRepository for SqliteBankRepository {
    async fn create(&self, request: CreateBankRequest) -> Result<BankDetail> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO bank_details (
                id, name, bank, acct_no, outreach_id, is_public,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&request.name)
        .bind(&request.bank)
        .bind(&request.acct_no)
        .bind(request.outreach_id.map(|id| id.to_string()))
        .bind(request.is_public as i32)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created bank account".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BankDetail>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, BankRow>(
            r#"
            SELECT id, name, bank, acct_no, outreach_id, is_public,
                   created_at, updated_at
            FROM bank_details
            WHERE id = ?
            "#,
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_bank(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, public_only: bool) -> Result<Vec<BankDetail>> {
        let rows = if public_only {
            sqlx::query_as::<_, BankRow>(
                r#"
                SELECT id, name, bank, acct_no, outreach_id, is_public,
                       created_at, updated_at
                FROM bank_details
                WHERE is_public = 1
                ORDER BY name DESC
                "#,
            )
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, BankRow>(
                r#"
                SELECT id, name, bank, acct_no, outreach_id, is_public,
                       created_at, updated_at
                FROM bank_details
                ORDER BY name DESC
                "#,
            )
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_bank).collect()
    }

    async fn update(&self, id: Uuid, update: UpdateBankRequest) -> Result<BankDetail> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();
        let is_public = update.is_public.map(|b| b as i32);

        let result = sqlx::query(
            r#"
            UPDATE bank_details
            SET name = COALESCE(?, name),
                bank = COALESCE(?, bank),
                acct_no = COALESCE(?, acct_no),
                outreach_id = COALESCE(?, outreach_id),
                is_public = COALESCE(?, is_public),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(&update.bank)
        .bind(&update.acct_no)
        .bind(update.outreach_id.map(|id| id.to_string()))
        .bind(is_public)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Bank account not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated bank account".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        let result = sqlx::query("DELETE FROM bank_details WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Bank account not found".to_string()));
        }

        Ok(())
    }
}
