use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use almoner::{
    api,
    auth::AuthService,
    config::Settings,
    repository,
    service::ServiceContext,
    storage,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "almoner=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!(
        "Starting Almoner server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    // Initialize database
    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    // Initialize auth service
    let auth_service = Arc::new(AuthService::new(
        db_pool.clone(),
        settings.auth.session_secret.clone(),
    ));

    // Initialize repositories
    let outreach_repo = Arc::new(repository::SqliteOutreachRepository::new(db_pool.clone()));
    let bank_repo = Arc::new(repository::SqliteBankRepository::new(db_pool.clone()));
    let payment_repo = Arc::new(repository::SqlitePaymentRepository::new(db_pool.clone()));
    let user_repo = Arc::new(repository::SqliteUserRepository::new(db_pool.clone()));
    let draft_repo = Arc::new(repository::SqliteDraftRepository::new(db_pool.clone()));

    // Initialize the proof-of-payment storage provider
    let storage_provider = storage::build_provider(&settings.storage)
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage provider: {}", e))?;
    tracing::info!("Proof uploads handled by the {} storage provider", storage_provider.name());

    // Create service context
    let service_context = Arc::new(ServiceContext::new(
        outreach_repo,
        bank_repo,
        payment_repo,
        user_repo,
        draft_repo,
        auth_service,
        db_pool.clone(),
    ));

    // Create the app
    let app = api::create_app(service_context, storage_provider, Arc::new(settings.clone()));

    let listener = tokio::net::TcpListener::bind(format!(
        "{}:{}",
        settings.server.host, settings.server.port
    ))
    .await?;

    tracing::info!(
        "Server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
