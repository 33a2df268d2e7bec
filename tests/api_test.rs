use std::sync::Arc;

use almoner::{
    api,
    auth::AuthService,
    config::Settings,
    repository::{
        SqliteBankRepository, SqliteDraftRepository, SqliteOutreachRepository,
        SqlitePaymentRepository, SqliteUserRepository,
    },
    service::ServiceContext,
    storage,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::util::ServiceExt;
use uuid::Uuid;

async fn test_app() -> anyhow::Result<Router> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let auth_service = Arc::new(AuthService::new(pool.clone(), "test-secret".to_string()));

    let service_context = Arc::new(ServiceContext::new(
        Arc::new(SqliteOutreachRepository::new(pool.clone())),
        Arc::new(SqliteBankRepository::new(pool.clone())),
        Arc::new(SqlitePaymentRepository::new(pool.clone())),
        Arc::new(SqliteUserRepository::new(pool.clone())),
        Arc::new(SqliteDraftRepository::new(pool.clone())),
        auth_service,
        pool.clone(),
    ));

    let mut settings = Settings::default();
    settings.storage.local_dir = std::env::temp_dir()
        .join(format!("almoner-test-{}", Uuid::new_v4()))
        .to_string_lossy()
        .into_owned();

    let storage_provider = storage::build_provider(&settings.storage)?;

    Ok(api::create_app(
        service_context,
        storage_provider,
        Arc::new(settings),
    ))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register an admin, sign in, and return the session cookie pair.
async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/auth/register",
            json!({"name": "Admin", "email": "admin@example.com", "password": "secret123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/auth/signin",
            json!({"email": "admin@example.com", "password": "secret123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("signin sets a session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn create_outreach(app: &Router, cookie: &str, theme: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/outreach")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::COOKIE, cookie)
                .body(Body::from(json!({"theme": theme}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_registration_creates_a_payment_with_a_derived_id() -> anyhow::Result<()> {
    let app = test_app().await?;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/payments",
            json!({
                "name": "Jane Doe",
                "phone": "08011112222",
                "crew": "nocrew",
                "paidAmount": 500
            }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["status"], 201);
    assert_eq!(body["message"], "Added successfully");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], "NOC/001");
    assert_eq!(body["data"]["paymentStatus"], "NOT_PAID");
    assert!(body["data"]["pendingAmount"].is_null());

    Ok(())
}

#[tokio::test]
async fn test_low_amount_and_duplicate_contact_are_rejected() -> anyhow::Result<()> {
    let app = test_app().await?;

    // Below the 500 floor
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/payments",
            json!({"name": "Jane Doe", "phone": "08011112222", "paidAmount": 100}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["success"], false);

    // First registration lands
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/payments",
            json!({"name": "Jane Doe", "phone": "08011112222", "paidAmount": 500}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Re-using the phone does not
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/payments",
            json!({"name": "Someone Else", "phone": "08011112222", "paidAmount": 600}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Email or Phone number already exists.");

    Ok(())
}

#[tokio::test]
async fn test_admin_endpoints_require_a_session() -> anyhow::Result<()> {
    let app = test_app().await?;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/payments")
                .body(Body::empty())
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Invalid Access Token");
    assert_eq!(body["success"], false);

    let cookie = login(&app).await;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/payments?status=*&q=*")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Fetched successfully");

    Ok(())
}

#[tokio::test]
async fn test_search_finds_a_registration_within_one_outreach() -> anyhow::Result<()> {
    let app = test_app().await?;
    let cookie = login(&app).await;
    let outreach_id = create_outreach(&app, &cookie, "Harvest outreach").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/payments",
            json!({
                "name": "Jane Doe",
                "phone": "08011112222",
                "paidAmount": 500,
                "outreachId": outreach_id
            }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!(
                    "/api/v1/payments/search?q=08011112222&outreachId={}",
                    outreach_id
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["outreach"], "Harvest outreach");
    assert_eq!(body["data"]["phone"], "08011112222");

    // Unknown contact is a 404
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!(
                    "/api/v1/payments/search?q=08099999999&outreachId={}",
                    outreach_id
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Missing params are a 400
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/payments/search")
                .body(Body::empty())
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_excel_export_streams_a_workbook() -> anyhow::Result<()> {
    let app = test_app().await?;
    let cookie = login(&app).await;

    // Nothing to export yet
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/payments/excel")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["message"], "No records found");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/payments",
            json!({"name": "Jane Doe", "phone": "08011112222", "paidAmount": 500}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/payments/excel")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&bytes[..2], b"PK");

    Ok(())
}

#[tokio::test]
async fn test_proof_upload_appends_to_the_payment() -> anyhow::Result<()> {
    let app = test_app().await?;
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/payments",
            json!({"name": "Jane Doe", "phone": "08011112222", "crew": "kitchen", "paidAmount": 500}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let boundary = "almoner-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"proof.png\"\r\nContent-Type: image/png\r\n\r\n",
            boundary
        )
        .as_bytes(),
    );
    body.extend_from_slice(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/payments/proof?id=KIT/001")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let upload = response_json(response).await;
    assert_eq!(upload["message"], "File uploaded");
    let asset_id = upload["data"]["assetId"].as_str().unwrap().to_string();
    assert!(asset_id.starts_with("uploads/"));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/payments/find?id=KIT/001")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["proof_image"][0], asset_id);

    Ok(())
}

#[tokio::test]
async fn test_draft_is_cleared_when_the_registration_lands() -> anyhow::Result<()> {
    let app = test_app().await?;
    let token = Uuid::new_v4();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/drafts/{}", token),
            json!({"step": 2, "name": "Jane Doe", "phone": "08011112222", "amount": 500}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    // Resume-after-reload: the draft is retrievable
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/v1/drafts/{}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["name"], "Jane Doe");
    assert_eq!(body["data"]["step"], 2);

    // Submitting with the token clears the draft
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/payments",
            json!({
                "name": "Jane Doe",
                "phone": "08011112222",
                "paidAmount": 500,
                "draftToken": token
            }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/v1/drafts/{}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_public_topup_needs_no_session() -> anyhow::Result<()> {
    let app = test_app().await?;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/payments",
            json!({"name": "Jane Doe", "phone": "08011112222", "crew": "kitchen", "paidAmount": 500}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/payments/topup?id=KIT/001",
            json!({"pendingAmount": 750}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = response_json(response).await;
    assert_eq!(body["data"]["pendingAmount"], 750.0);
    assert_eq!(body["data"]["paymentStatus"], "PENDING");

    Ok(())
}

#[tokio::test]
async fn test_pending_topup_and_approval_through_the_api() -> anyhow::Result<()> {
    let app = test_app().await?;
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/payments",
            json!({"name": "Jane Doe", "phone": "08011112222", "crew": "kitchen", "paidAmount": 500}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Top-up: pending amount accumulates and the status flips to PENDING
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/v1/payments/update?id=KIT/001")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::COOKIE, &cookie)
                .body(Body::from(json!({"pendingAmount": 1000}).to_string()))
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = response_json(response).await;
    assert_eq!(body["data"]["pendingAmount"], 1000.0);
    assert_eq!(body["data"]["paymentStatus"], "PENDING");

    // Approval folds the pending amount into the paid amount
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/payments/approve?id=KIT/001")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = response_json(response).await;
    assert_eq!(body["data"]["paidAmount"], 1500.0);
    assert_eq!(body["data"]["pendingAmount"], 0.0);

    Ok(())
}
