use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateOutreachRequest, Outreach, UpdateOutreachRequest},
    error::{AppError, Result},
    repository::OutreachRepository,
};

#[derive(FromRow)]
struct OutreachRow {
    id: String,
    theme: String,
    description: Option<String>,
    location: Option<String>,
    date: Option<NaiveDateTime>,
    fee: Option<f64>,
    flyer: Option<String>,
    is_active: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteOutreachRepository {
    pool: SqlitePool,
}

impl SqliteOutreachRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_outreach(row: OutreachRow) -> Result<Outreach> {
        Ok(Outreach {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            theme: row.theme,
            description: row.description,
            location: row.location,
            date: row.date.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            fee: row.fee,
            flyer: row.flyer,
            is_active: row.is_active != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl OutreachRepository for SqliteOutreachRepository {
    async fn create(&self, request: CreateOutreachRequest) -> Result<Outreach> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();
        let date_naive = request.date.map(|dt| dt.naive_utc());
        let is_active = request.is_active.unwrap_or(false) as i32;

        sqlx::query(
            r#"
            INSERT INTO outreaches (
                id, theme, description, location, date, fee, flyer,
                is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&request.theme)
        .bind(&request.description)
        .bind(&request.location)
        .bind(date_naive)
        .bind(request.fee)
        .bind(&request.flyer)
        .bind(is_active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created outreach".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Outreach>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, OutreachRow>(
            r#"
            SELECT id, theme, description, location, date, fee, flyer,
                   is_active, created_at, updated_at
            FROM outreaches
            WHERE id = ?
            "#,
        )
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_outreach(r)?)),
            None => Ok(None),
        }
    }

    async fn latest(&self) -> Result<Option<Outreach>> {
        let row = sqlx::query_as::<_, OutreachRow>(
            r#"
            SELECT id, theme, description, location, date, fee, flyer,
                   is_active, created_at, updated_at
            FROM outreaches
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_outreach(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Outreach>> {
        let rows = sqlx::query_as::<_, OutreachRow>(
            r#"
            SELECT id, theme, description, location, date, fee, flyer,
                   is_active, created_at, updated_at
            FROM outreaches
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_outreach).collect()
    }

    async fn update(&self, id: Uuid, update: UpdateOutreachRequest) -> Result<Outreach> {
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();
        let date_naive = update.date.map(|dt| dt.naive_utc());
        let is_active = update.is_active.map(|b| b as i32);

        let result = sqlx::query(
            r#"
            UPDATE outreaches
            SET theme = COALESCE(?, theme),
                description = COALESCE(?, description),
                location = COALESCE(?, location),
                date = COALESCE(?, date),
                fee = COALESCE(?, fee),
                flyer = COALESCE(?, flyer),
                is_active = COALESCE(?, is_active),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.theme)
        .bind(&update.description)
        .bind(&update.location)
        .bind(date_naive)
        .bind(update.fee)
        .bind(&update.flyer)
        .bind(is_active)
        .bind(now)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Outreach not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated outreach".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        let result = sqlx::query("DELETE FROM outreaches WHERE id = ?")
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Outreach not found".to_string()));
        }

        Ok(())
    }
}
