use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{
        payment_id, CreatePaymentRequest, Gender, Payment, PaymentFilter, PaymentSearchHit,
        PaymentStats, PaymentStatus, UpdatePaymentRequest,
    },
    error::{AppError, Result},
    repository::{payment_repository::DUPLICATE_CONTACT_MESSAGE, DraftRepository, PaymentRepository},
};

/// How many identifier candidates to try before giving up. Conflicts only
/// happen when two creates race the same partition (or two partitions share
/// a prefix), so the loop almost always exits on the first attempt.
const MAX_ID_ATTEMPTS: u32 = 5;

/// Creates and mutates payment records: identifier allocation, duplicate
/// contact rejection, pending-amount approval, and filtered aggregates.
pub struct PaymentService {
    payment_repo: Arc<dyn PaymentRepository>,
    draft_repo: Arc<dyn DraftRepository>,
}

impl PaymentService {
    pub fn new(payment_repo: Arc<dyn PaymentRepository>, draft_repo: Arc<dyn DraftRepository>) -> Self {
        Self {
            payment_repo,
            draft_repo,
        }
    }

    /// Register a new payment. The identifier is derived from the most recent
    /// id in the `(crew, outreach)` partition; the store's unique constraint
    /// backstops concurrent creates and the insert retries with the next
    /// sequence on a conflict.
    pub async fn create(&self, request: CreatePaymentRequest) -> Result<Payment> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if request.email.is_some() || request.phone.is_some() {
            let exists = self
                .payment_repo
                .contact_exists(request.email.as_deref(), request.phone.as_deref())
                .await?;
            if exists {
                return Err(AppError::Conflict(DUPLICATE_CONTACT_MESSAGE.to_string()));
            }
        }

        let crew = request
            .crew
            .clone()
            .unwrap_or_else(|| payment_id::DEFAULT_CREW.to_string());
        let prefix = payment_id::crew_prefix(&crew);

        let last_id = self
            .payment_repo
            .latest_id_in_partition(&crew, request.outreach_id)
            .await?;
        let (mut sequence, restarted) = payment_id::next_sequence(last_id.as_deref());
        if restarted {
            tracing::warn!(
                last_id = last_id.as_deref().unwrap_or_default(),
                crew = %crew,
                "Previous payment id has a non-numeric suffix; sequence restarted at 001, review the partition manually"
            );
        }

        let mut last_error = None;
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = payment_id::format_id(&prefix, sequence);
            match self
                .payment_repo
                .insert(self.build_payment(candidate, &request))
                .await
            {
                Ok(payment) => {
                    if let Some(token) = request.draft_token {
                        if let Err(e) = self.draft_repo.delete(token).await {
                            tracing::warn!("Failed to clear registration draft {}: {}", token, e);
                        }
                    }
                    return Ok(payment);
                }
                Err(AppError::Conflict(message)) => {
                    // A contact-info conflict will never resolve by bumping
                    // the sequence, but retrying is harmless and the original
                    // message still surfaces once attempts run out.
                    tracing::debug!(sequence, "Payment insert conflict: {}", message);
                    last_error = Some(AppError::Conflict(message));
                    sequence += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AppError::Internal("Payment id allocation exhausted its attempts".to_string())
        }))
    }

    fn build_payment(&self, id: String, request: &CreatePaymentRequest) -> Payment {
        let now = Utc::now();
        Payment {
            id,
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            gender: request.gender.unwrap_or(Gender::Unspecified),
            crew: request.crew.clone(),
            unit: request.unit.clone(),
            level: request.level.clone(),
            paid_amount: request.paid_amount,
            pending_amount: request.pending_amount,
            payment_status: request.payment_status.unwrap_or(PaymentStatus::NotPaid),
            outreach_id: request.outreach_id,
            bank_id: request.bank_id,
            proof_image: request.proof_image.clone().unwrap_or_default(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub async fn find(&self, id: &str) -> Result<Payment> {
        self.payment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))
    }

    pub async fn list(&self, filter: &PaymentFilter) -> Result<Vec<Payment>> {
        self.payment_repo.list(filter).await
    }

    pub async fn update(&self, id: &str, update: UpdatePaymentRequest) -> Result<Payment> {
        self.payment_repo.update_partial(id, update).await
    }

    pub async fn approve_pending(&self, id: &str) -> Result<Payment> {
        self.payment_repo.approve_pending(id).await
    }

    pub async fn soft_delete(&self, id: &str) -> Result<()> {
        self.payment_repo.soft_delete(id).await
    }

    pub async fn append_proof(&self, id: &str, asset_id: &str) -> Result<Payment> {
        self.payment_repo.append_proof(id, asset_id).await
    }

    pub async fn stats(&self, filter: &PaymentFilter) -> Result<PaymentStats> {
        self.payment_repo.stats(filter).await
    }

    /// Locate the most recent registration matching a contact within one
    /// outreach. Lets an attendee find their prior payment for a top-up
    /// without authenticating.
    pub async fn search_contact(&self, query: &str, outreach_id: Uuid) -> Result<PaymentSearchHit> {
        self.payment_repo
            .search_contact(query, outreach_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))
    }
}
