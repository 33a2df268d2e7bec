use std::sync::Arc;

use almoner::{
    api::handlers::payments::ListParams,
    domain::{
        CreateOutreachRequest, CreatePaymentRequest, Gender, PaymentFilter, PaymentStatus,
    },
    repository::{
        OutreachRepository, SqliteDraftRepository, SqliteOutreachRepository,
        SqlitePaymentRepository,
    },
    service::payment_service::PaymentService,
};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

async fn setup() -> anyhow::Result<(SqlitePool, PaymentService, Uuid, Uuid)> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let service = PaymentService::new(
        Arc::new(SqlitePaymentRepository::new(pool.clone())),
        Arc::new(SqliteDraftRepository::new(pool.clone())),
    );

    let outreach_repo = SqliteOutreachRepository::new(pool.clone());
    let mut ids = Vec::new();
    for theme in ["Spring outreach", "Harvest outreach"] {
        let outreach = outreach_repo
            .create(CreateOutreachRequest {
                theme: theme.to_string(),
                description: None,
                location: None,
                date: None,
                fee: None,
                flyer: None,
                is_active: None,
            })
            .await?;
        ids.push(outreach.id);
    }

    Ok((pool, service, ids[0], ids[1]))
}

fn request(
    name: &str,
    email: &str,
    phone: &str,
    status: PaymentStatus,
    gender: Gender,
    outreach_id: Uuid,
) -> CreatePaymentRequest {
    CreatePaymentRequest {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        phone: Some(phone.to_string()),
        gender: Some(gender),
        crew: None,
        unit: None,
        level: None,
        paid_amount: Some(1000.0),
        pending_amount: None,
        payment_status: Some(status),
        outreach_id: Some(outreach_id),
        bank_id: None,
        proof_image: None,
        draft_token: None,
    }
}

#[tokio::test]
async fn test_filters_combine_with_and() -> anyhow::Result<()> {
    let (_pool, service, spring, harvest) = setup().await?;

    service
        .create(request(
            "Ada Obi",
            "ada@example.com",
            "08100000001",
            PaymentStatus::Paid,
            Gender::Female,
            spring,
        ))
        .await?;
    service
        .create(request(
            "Ben Ade",
            "ben@example.com",
            "08100000002",
            PaymentStatus::Paid,
            Gender::Male,
            harvest,
        ))
        .await?;
    service
        .create(request(
            "Chi Eze",
            "chi@example.com",
            "08100000003",
            PaymentStatus::Pending,
            Gender::Female,
            spring,
        ))
        .await?;

    // status AND outreach
    let filtered = service
        .list(&PaymentFilter {
            status: Some(PaymentStatus::Paid),
            outreach_id: Some(spring),
            ..Default::default()
        })
        .await?;
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name.as_deref(), Some("Ada Obi"));

    // unfiltered dimensions do not constrain
    let by_status = service
        .list(&PaymentFilter {
            status: Some(PaymentStatus::Paid),
            ..Default::default()
        })
        .await?;
    assert_eq!(by_status.len(), 2);

    // gender dimension
    let by_gender = service
        .list(&PaymentFilter {
            gender: Some(Gender::Female),
            ..Default::default()
        })
        .await?;
    assert_eq!(by_gender.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_free_text_matches_name_or_email_substring() -> anyhow::Result<()> {
    let (_pool, service, spring, _harvest) = setup().await?;

    service
        .create(request(
            "Ada Obi",
            "ada@example.com",
            "08100000001",
            PaymentStatus::Paid,
            Gender::Female,
            spring,
        ))
        .await?;
    service
        .create(request(
            "Ben Ade",
            "ben@example.com",
            "08100000002",
            PaymentStatus::Paid,
            Gender::Male,
            spring,
        ))
        .await?;

    // Substring of a name
    let by_name = service
        .list(&PaymentFilter {
            q: Some("Obi".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(by_name.len(), 1);

    // Substring of an email
    let by_email = service
        .list(&PaymentFilter {
            q: Some("ben@".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(by_email.len(), 1);

    // "Ad" hits "Ada Obi" (name) and "Ben Ade" (name substring)
    let both = service
        .list(&PaymentFilter {
            q: Some("Ad".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(both.len(), 2);

    let none = service
        .list(&PaymentFilter {
            q: Some("zzz".to_string()),
            ..Default::default()
        })
        .await?;
    assert!(none.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_list_is_ordered_by_creation_time_descending() -> anyhow::Result<()> {
    let (_pool, service, spring, _harvest) = setup().await?;

    service
        .create(request(
            "First In",
            "first@example.com",
            "08100000001",
            PaymentStatus::Paid,
            Gender::Male,
            spring,
        ))
        .await?;
    service
        .create(request(
            "Second In",
            "second@example.com",
            "08100000002",
            PaymentStatus::Paid,
            Gender::Male,
            spring,
        ))
        .await?;

    let listed = service.list(&PaymentFilter::default()).await?;
    assert_eq!(listed[0].name.as_deref(), Some("Second In"));
    assert_eq!(listed[1].name.as_deref(), Some("First In"));

    Ok(())
}

#[test]
fn test_sentinel_values_mean_unfiltered() {
    let params = ListParams {
        q: Some("*".to_string()),
        status: Some("*".to_string()),
        outreach: Some("*".to_string()),
        bank: None,
        gender: Some(String::new()),
    };

    let filter = params.into_filter().unwrap();
    assert!(filter.q.is_none());
    assert!(filter.status.is_none());
    assert!(filter.outreach_id.is_none());
    assert!(filter.bank_id.is_none());
    assert!(filter.gender.is_none());
}

#[test]
fn test_invalid_status_filter_is_rejected() {
    let params = ListParams {
        q: None,
        status: Some("SETTLED".to_string()),
        outreach: None,
        bank: None,
        gender: None,
    };

    assert!(params.into_filter().is_err());
}

#[test]
fn test_set_filters_parse_into_typed_dimensions() {
    let outreach = Uuid::new_v4();
    let params = ListParams {
        q: Some("jane".to_string()),
        status: Some("PAID".to_string()),
        outreach: Some(outreach.to_string()),
        bank: None,
        gender: Some("FEMALE".to_string()),
    };

    let filter = params.into_filter().unwrap();
    assert_eq!(filter.q.as_deref(), Some("jane"));
    assert_eq!(filter.status, Some(PaymentStatus::Paid));
    assert_eq!(filter.outreach_id, Some(outreach));
    assert_eq!(filter.gender, Some(Gender::Female));
}
