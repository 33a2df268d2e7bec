pub mod payment_service;

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::AuthService;
use crate::repository::*;
use payment_service::PaymentService;

pub struct ServiceContext {
    pub outreach_repo: Arc<dyn OutreachRepository>,
    pub bank_repo: Arc<dyn BankRepository>,
    pub payment_repo: Arc<dyn PaymentRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub draft_repo: Arc<dyn DraftRepository>,
    pub payment_service: Arc<PaymentService>,
    pub auth_service: Arc<AuthService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        outreach_repo: Arc<dyn OutreachRepository>,
        bank_repo: Arc<dyn BankRepository>,
        payment_repo: Arc<dyn PaymentRepository>,
        user_repo: Arc<dyn UserRepository>,
        draft_repo: Arc<dyn DraftRepository>,
        auth_service: Arc<AuthService>,
        db_pool: SqlitePool,
    ) -> Self {
        let payment_service = Arc::new(PaymentService::new(
            payment_repo.clone(),
            draft_repo.clone(),
        ));

        Self {
            outreach_repo,
            bank_repo,
            payment_repo,
            user_repo,
            draft_repo,
            payment_service,
            auth_service,
            db_pool,
        }
    }
}
