use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::*;
use crate::error::Result;

pub mod bank_repository;
pub mod draft_repository;
pub mod outreach_repository;
pub mod payment_repository;
pub mod user_repository;

pub use bank_repository::SqliteBankRepository;
pub use draft_repository::SqliteDraftRepository;
pub use outreach_repository::SqliteOutreachRepository;
pub use payment_repository::SqlitePaymentRepository;
pub use user_repository::SqliteUserRepository;

#[async_trait]
pub trait OutreachRepository: Send + Sync {
    async fn create(&self, request: CreateOutreachRequest) -> Result<Outreach>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Outreach>>;
    async fn latest(&self) -> Result<Option<Outreach>>;
    async fn list(&self) -> Result<Vec<Outreach>>;
    async fn update(&self, id: Uuid, update: UpdateOutreachRequest) -> Result<Outreach>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait BankRepository: Send + Sync {
    async fn create(&self, request: CreateBankRequest) -> Result<BankDetail>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BankDetail>>;
    /// Ordered by account name descending. `public_only` restricts to rows
    /// visible on the public registration form.
    async fn list(&self, public_only: bool) -> Result<Vec<BankDetail>>;
    async fn update(&self, id: Uuid, update: UpdateBankRequest) -> Result<BankDetail>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert a fully formed payment. Unique-index conflicts surface as
    /// `AppError::Conflict` so the caller can retry identifier allocation.
    async fn insert(&self, payment: Payment) -> Result<Payment>;
    /// Direct lookup by id, soft-deleted rows included.
    async fn find_by_id(&self, id: &str) -> Result<Option<Payment>>;
    /// Id of the most recently created payment in a `(crew, outreach)`
    /// partition, soft-deleted rows included so sequences never regress.
    async fn latest_id_in_partition(
        &self,
        crew: &str,
        outreach_id: Option<Uuid>,
    ) -> Result<Option<String>>;
    /// Whether any non-deleted payment already uses the email or phone.
    async fn contact_exists(&self, email: Option<&str>, phone: Option<&str>) -> Result<bool>;
    async fn list(&self, filter: &PaymentFilter) -> Result<Vec<Payment>>;
    async fn update_partial(&self, id: &str, update: UpdatePaymentRequest) -> Result<Payment>;
    /// Move the pending amount into the paid amount in one statement.
    async fn approve_pending(&self, id: &str) -> Result<Payment>;
    async fn soft_delete(&self, id: &str) -> Result<()>;
    async fn append_proof(&self, id: &str, asset_id: &str) -> Result<Payment>;
    async fn stats(&self, filter: &PaymentFilter) -> Result<PaymentStats>;
    /// Most recent non-deleted payment in one outreach whose email or phone
    /// equals `query`, joined with outreach and bank display labels.
    async fn search_contact(
        &self,
        query: &str,
        outreach_id: Uuid,
    ) -> Result<Option<PaymentSearchHit>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, request: RegisterUserRequest) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn password_hash(&self, email: &str) -> Result<Option<String>>;
}

#[async_trait]
pub trait DraftRepository: Send + Sync {
    async fn upsert(&self, token: Uuid, draft: UpsertDraftRequest) -> Result<RegistrationDraft>;
    async fn find(&self, token: Uuid) -> Result<Option<RegistrationDraft>>;
    async fn delete(&self, token: Uuid) -> Result<()>;
}
