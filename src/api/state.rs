use std::sync::Arc;

use crate::{config::Settings, service::ServiceContext, storage::StorageProvider};

#[derive(Clone)]
pub struct AppState {
    pub service_context: Arc<ServiceContext>,
    pub storage: Arc<dyn StorageProvider>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(
        service_context: Arc<ServiceContext>,
        storage: Arc<dyn StorageProvider>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            service_context,
            storage,
            settings,
        }
    }
}
