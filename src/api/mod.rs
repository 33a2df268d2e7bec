pub mod handlers;
pub mod middleware;
pub mod respond;
pub mod state;

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use crate::{config::Settings, service::ServiceContext, storage::StorageProvider};
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    storage: Arc<dyn StorageProvider>,
    settings: Arc<Settings>,
) -> Router {
    let app_state = AppState::new(service_context, storage, settings.clone());

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))
        // Versioned API
        .nest("/api/v1", api_routes(app_state.clone()))
        // Locally stored proof images
        .nest_service("/uploads", ServeDir::new(settings.storage.local_dir.clone()))
        // Add state to the router
        .with_state(app_state)
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/outreach", outreach_routes(state.clone()))
        .nest("/banks", bank_routes(state.clone()))
        .nest("/payments", payment_routes(state.clone()))
        .nest("/drafts", draft_routes())
        .nest("/users", user_routes())
}

fn outreach_routes(state: AppState) -> Router<AppState> {
    let admin = from_fn_with_state(state, middleware::auth::require_admin);

    Router::new()
        .route(
            "/",
            get(handlers::outreach::list)
                .merge(post(handlers::outreach::create).route_layer(admin.clone())),
        )
        .route("/latest", get(handlers::outreach::latest))
        .route(
            "/:id",
            get(handlers::outreach::get).merge(
                patch(handlers::outreach::update)
                    .delete(handlers::outreach::delete)
                    .route_layer(admin),
            ),
        )
}

fn bank_routes(state: AppState) -> Router<AppState> {
    let admin = from_fn_with_state(state, middleware::auth::require_admin);

    Router::new()
        .route(
            "/",
            get(handlers::banks::list)
                .post(handlers::banks::create)
                .route_layer(admin.clone()),
        )
        .route("/public", get(handlers::banks::list_public))
        .route(
            "/:id",
            patch(handlers::banks::update)
                .delete(handlers::banks::delete)
                .route_layer(admin),
        )
}

fn payment_routes(state: AppState) -> Router<AppState> {
    let admin = from_fn_with_state(state, middleware::auth::require_admin);

    Router::new()
        // Registration submit stays public; the dashboard list and soft
        // delete on the same path sit behind the session guard.
        .route(
            "/",
            post(handlers::payments::create).merge(
                get(handlers::payments::list)
                    .delete(handlers::payments::delete)
                    .route_layer(admin.clone()),
            ),
        )
        .route("/search", get(handlers::payments::search))
        .route("/topup", post(handlers::payments::topup))
        .route("/proof", post(handlers::proof::upload))
        .route(
            "/find",
            get(handlers::payments::find).route_layer(admin.clone()),
        )
        .route(
            "/update",
            patch(handlers::payments::update).route_layer(admin.clone()),
        )
        .route(
            "/approve",
            post(handlers::payments::approve).route_layer(admin.clone()),
        )
        .route(
            "/stats",
            get(handlers::payments::stats).route_layer(admin.clone()),
        )
        .route("/excel", get(handlers::export::excel).route_layer(admin))
}

fn draft_routes() -> Router<AppState> {
    Router::new().route(
        "/:token",
        put(handlers::drafts::upsert)
            .get(handlers::drafts::get)
            .delete(handlers::drafts::delete),
    )
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/signin", post(handlers::auth::signin))
        .route("/auth/logout", post(handlers::auth::logout))
}
