use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{
        Gender, Payment, PaymentFilter, PaymentSearchHit, PaymentStats, PaymentStatus,
        UpdatePaymentRequest,
    },
    error::{AppError, Result},
    repository::PaymentRepository,
};

pub const DUPLICATE_CONTACT_MESSAGE: &str = "Email or Phone number already exists.";

const PAYMENT_COLUMNS: &str = "id, name, email, phone, gender, crew, unit, level, \
     paid_amount, pending_amount, payment_status, outreach_id, bank_id, \
     proof_image, is_deleted, created_at, updated_at";

#[derive(FromRow)]
struct PaymentRow {
    id: String,
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    gender: String,
    crew: Option<String>,
    unit: Option<String>,
    level: Option<String>,
    paid_amount: Option<f64>,
    pending_amount: Option<f64>,
    payment_status: String,
    outreach_id: Option<String>,
    bank_id: Option<String>,
    proof_image: String,
    is_deleted: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(FromRow)]
struct SearchRow {
    #[sqlx(flatten)]
    payment: PaymentRow,
    outreach_theme: Option<String>,
    bank_name: Option<String>,
    bank_bank: Option<String>,
}

pub struct SqlitePaymentRepository {
    pool: SqlitePool,
}

impl SqlitePaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_payment(row: PaymentRow) -> Result<Payment> {
        let proof_image: Vec<String> = serde_json::from_str(&row.proof_image)
            .map_err(|e| AppError::Database(format!("Invalid proof_image column: {}", e)))?;

        Ok(Payment {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            gender: Self::parse_gender(&row.gender)?,
            crew: row.crew,
            unit: row.unit,
            level: row.level,
            paid_amount: row.paid_amount,
            pending_amount: row.pending_amount,
            payment_status: Self::parse_payment_status(&row.payment_status)?,
            outreach_id: Self::parse_optional_uuid(row.outreach_id)?,
            bank_id: Self::parse_optional_uuid(row.bank_id)?,
            proof_image,
            is_deleted: row.is_deleted != 0,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }

    fn parse_optional_uuid(value: Option<String>) -> Result<Option<Uuid>> {
        value
            .map(|s| Uuid::parse_str(&s).map_err(|e| AppError::Database(e.to_string())))
            .transpose()
    }

    fn parse_payment_status(s: &str) -> Result<PaymentStatus> {
        PaymentStatus::parse(s)
            .ok_or_else(|| AppError::Database(format!("Invalid payment status: {}", s)))
    }

    fn parse_gender(s: &str) -> Result<Gender> {
        Gender::parse(s).ok_or_else(|| AppError::Database(format!("Invalid gender: {}", s)))
    }

    /// Appends the AND-combined filter dimensions to a query that already
    /// carries a `WHERE is_deleted = 0` clause. The free-text OR clause is
    /// omitted entirely when `q` is unset so an empty filter matches all rows.
    fn push_filter<'a>(builder: &mut QueryBuilder<'a, Sqlite>, filter: &'a PaymentFilter) {
        if let Some(q) = &filter.q {
            let pattern = format!("%{}%", q);
            builder
                .push(" AND (name LIKE ")
                .push_bind(pattern.clone())
                .push(" OR email LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(status) = filter.status {
            builder
                .push(" AND payment_status = ")
                .push_bind(status.as_str());
        }
        if let Some(outreach_id) = filter.outreach_id {
            builder
                .push(" AND outreach_id = ")
                .push_bind(outreach_id.to_string());
        }
        if let Some(bank_id) = filter.bank_id {
            builder.push(" AND bank_id = ").push_bind(bank_id.to_string());
        }
        if let Some(gender) = filter.gender {
            builder.push(" AND gender = ").push_bind(gender.as_str());
        }
    }

    fn map_insert_error(e: sqlx::Error) -> AppError {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                let message = db.message();
                if message.contains("payments.email") || message.contains("payments.phone") {
                    return AppError::Conflict(DUPLICATE_CONTACT_MESSAGE.to_string());
                }
                return AppError::Conflict(format!("Payment id already taken: {}", message));
            }
        }
        AppError::Database(e.to_string())
    }
}

#[async_trait]
impl PaymentRepository for SqlitePaymentRepository {
    async fn insert(&self, payment: Payment) -> Result<Payment> {
        let proof_image = serde_json::to_string(&payment.proof_image)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let created_at = payment.created_at.naive_utc();
        let updated_at = payment.updated_at.naive_utc();

        sqlx::query(
            r#"
            INSERT INTO payments (
                id, name, email, phone, gender, crew, unit, level,
                paid_amount, pending_amount, payment_status, outreach_id,
                bank_id, proof_image, is_deleted, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.name)
        .bind(&payment.email)
        .bind(&payment.phone)
        .bind(payment.gender.as_str())
        .bind(&payment.crew)
        .bind(&payment.unit)
        .bind(&payment.level)
        .bind(payment.paid_amount)
        .bind(payment.pending_amount)
        .bind(payment.payment_status.as_str())
        .bind(payment.outreach_id.map(|id| id.to_string()))
        .bind(payment.bank_id.map(|id| id.to_string()))
        .bind(&proof_image)
        .bind(payment.is_deleted as i32)
        .bind(created_at)
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(Self::map_insert_error)?;

        self.find_by_id(&payment.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created payment".to_string())
        })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {} FROM payments WHERE id = ?",
            PAYMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_payment(r)?)),
            None => Ok(None),
        }
    }

    async fn latest_id_in_partition(
        &self,
        crew: &str,
        outreach_id: Option<Uuid>,
    ) -> Result<Option<String>> {
        // Rows with a NULL crew belong to the default partition; `IS ?`
        // matches NULL when no outreach scopes the partition.
        let id = sqlx::query_scalar::<_, String>(
            r#"
            SELECT id FROM payments
            WHERE COALESCE(crew, 'nocrew') = ? AND outreach_id IS ?
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(crew)
        .bind(outreach_id.map(|id| id.to_string()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(id)
    }

    async fn contact_exists(&self, email: Option<&str>, phone: Option<&str>) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM payments
            WHERE is_deleted = 0 AND (email = ? OR phone = ?)
            "#,
        )
        .bind(email)
        .bind(phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    async fn list(&self, filter: &PaymentFilter) -> Result<Vec<Payment>> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {} FROM payments WHERE is_deleted = 0",
            PAYMENT_COLUMNS
        ));
        Self::push_filter(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC");

        let rows = builder
            .build_query_as::<PaymentRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_payment).collect()
    }

    async fn update_partial(&self, id: &str, update: UpdatePaymentRequest) -> Result<Payment> {
        let now = Utc::now().naive_utc();

        // One statement: a supplied pending amount accumulates and forces the
        // status to PENDING until an admin approves it.
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET name = COALESCE(?, name),
                email = COALESCE(?, email),
                phone = COALESCE(?, phone),
                gender = COALESCE(?, gender),
                crew = COALESCE(?, crew),
                unit = COALESCE(?, unit),
                level = COALESCE(?, level),
                paid_amount = COALESCE(?, paid_amount),
                bank_id = COALESCE(?, bank_id),
                pending_amount = CASE
                    WHEN ? IS NOT NULL THEN COALESCE(pending_amount, 0) + ?
                    ELSE pending_amount
                END,
                payment_status = CASE
                    WHEN ? IS NOT NULL THEN 'PENDING'
                    ELSE COALESCE(?, payment_status)
                END,
                updated_at = ?
            WHERE id = ? AND is_deleted = 0
            "#,
        )
        .bind(&update.name)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(update.gender.map(|g| g.as_str()))
        .bind(&update.crew)
        .bind(&update.unit)
        .bind(&update.level)
        .bind(update.paid_amount)
        .bind(update.bank_id.map(|id| id.to_string()))
        .bind(update.pending_amount)
        .bind(update.pending_amount)
        .bind(update.pending_amount)
        .bind(update.payment_status.map(|s| s.as_str()))
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Payment not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated payment".to_string())
        })
    }

    async fn approve_pending(&self, id: &str) -> Result<Payment> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE payments
            SET paid_amount = COALESCE(paid_amount, 0) + COALESCE(pending_amount, 0),
                pending_amount = 0,
                updated_at = ?
            WHERE id = ? AND is_deleted = 0
            "#,
        )
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Payment not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated payment".to_string())
        })
    }

    async fn soft_delete(&self, id: &str) -> Result<()> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            "UPDATE payments SET is_deleted = 1, updated_at = ? WHERE id = ? AND is_deleted = 0",
        )
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Payment not found".to_string()));
        }

        Ok(())
    }

    async fn append_proof(&self, id: &str, asset_id: &str) -> Result<Payment> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE payments
            SET proof_image = json_insert(proof_image, '$[#]', ?),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(asset_id)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Payment not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated payment".to_string())
        })
    }

    async fn stats(&self, filter: &PaymentFilter) -> Result<PaymentStats> {
        let mut builder = QueryBuilder::new(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN payment_status = 'PAID' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN payment_status = 'PENDING' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(paid_amount), 0.0),
                COALESCE(SUM(CASE WHEN payment_status = 'PENDING' THEN paid_amount END), 0.0),
                COALESCE(SUM(CASE WHEN payment_status = 'PAID' THEN paid_amount END), 0.0)
            FROM payments WHERE is_deleted = 0
            "#,
        );
        Self::push_filter(&mut builder, filter);

        let row: (i64, i64, f64, f64, f64) = builder
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(PaymentStats {
            total_paid: row.0,
            total_pending: row.1,
            total_paid_amount: row.2,
            pending_paid_amount: row.3,
            completed_paid_amount: row.4,
        })
    }

    async fn search_contact(
        &self,
        query: &str,
        outreach_id: Uuid,
    ) -> Result<Option<PaymentSearchHit>> {
        let row = sqlx::query_as::<_, SearchRow>(
            r#"
            SELECT p.id, p.name, p.email, p.phone, p.gender, p.crew, p.unit,
                   p.level, p.paid_amount, p.pending_amount, p.payment_status,
                   p.outreach_id, p.bank_id, p.proof_image, p.is_deleted,
                   p.created_at, p.updated_at,
                   o.theme AS outreach_theme,
                   b.name AS bank_name,
                   b.bank AS bank_bank
            FROM payments p
            LEFT JOIN outreaches o ON o.id = p.outreach_id
            LEFT JOIN bank_details b ON b.id = p.bank_id
            WHERE (p.email = ? OR p.phone = ?)
              AND p.outreach_id = ?
              AND p.is_deleted = 0
            ORDER BY p.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(query)
        .bind(query)
        .bind(outreach_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => {
                let bank = match (&r.bank_name, &r.bank_bank) {
                    (Some(name), Some(bank)) => format!("{} - {}", name, bank),
                    _ => String::new(),
                };
                Ok(Some(PaymentSearchHit {
                    payment: Self::row_to_payment(r.payment)?,
                    outreach: r.outreach_theme,
                    bank,
                }))
            }
            None => Ok(None),
        }
    }
}
