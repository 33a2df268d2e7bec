use clap::Parser;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use sqlx::sqlite::SqlitePoolOptions;

use almoner::{
    domain::{
        CreateBankRequest, CreateOutreachRequest, CreatePaymentRequest, Gender,
        RegisterUserRequest,
    },
    repository::{
        BankRepository, OutreachRepository, SqliteBankRepository, SqliteDraftRepository,
        SqliteOutreachRepository, SqlitePaymentRepository, SqliteUserRepository, UserRepository,
    },
    service::payment_service::PaymentService,
};

#[derive(Parser)]
#[command(about = "Seed the database with demo outreach, bank, and payment data")]
struct Args {
    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:almoner.db")]
    database_url: String,

    /// Number of demo payments to create
    #[arg(long, default_value_t = 12)]
    payments: usize,
}

const CREWS: &[&str] = &["kitchen", "logistics", "medical", "media", "nocrew"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("Seeding {}...", args.database_url);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&args.database_url)
        .await?;

    println!("Running migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let outreach_repo = SqliteOutreachRepository::new(db_pool.clone());
    let bank_repo = SqliteBankRepository::new(db_pool.clone());
    let user_repo = SqliteUserRepository::new(db_pool.clone());
    let payment_service = PaymentService::new(
        std::sync::Arc::new(SqlitePaymentRepository::new(db_pool.clone())),
        std::sync::Arc::new(SqliteDraftRepository::new(db_pool.clone())),
    );

    // Admin account
    let admin = user_repo
        .create(RegisterUserRequest {
            name: "Admin".to_string(),
            email: "admin@almoner.local".to_string(),
            password: "admin123".to_string(),
        })
        .await?;
    println!("Created admin user {} (admin@almoner.local / admin123)", admin.id);

    // One active outreach
    let outreach = outreach_repo
        .create(CreateOutreachRequest {
            theme: "Hope for the City".to_string(),
            description: Some("Annual city-wide outreach".to_string()),
            location: Some("Tafawa Balewa Square, Lagos".to_string()),
            date: None,
            fee: Some(5000.0),
            flyer: None,
            is_active: Some(true),
        })
        .await?;
    println!("Created outreach \"{}\"", outreach.theme);

    // A public and a private bank account
    bank_repo
        .create(CreateBankRequest {
            name: "Outreach Welfare".to_string(),
            bank: "GTBank".to_string(),
            acct_no: "0123456789".to_string(),
            outreach_id: Some(outreach.id),
            is_public: true,
        })
        .await?;
    bank_repo
        .create(CreateBankRequest {
            name: "Outreach Operations".to_string(),
            bank: "Access Bank".to_string(),
            acct_no: "9876543210".to_string(),
            outreach_id: Some(outreach.id),
            is_public: false,
        })
        .await?;
    println!("Created bank accounts");

    // Demo payments spread across crews
    for i in 0..args.payments {
        let crew = CREWS[i % CREWS.len()];
        let name: String = Name().fake();
        let email: String = SafeEmail().fake();
        let phone = format!("080{:08}", 10000000 + i as u64);

        let payment = payment_service
            .create(CreatePaymentRequest {
                name: Some(name),
                email: Some(email),
                phone: Some(phone),
                gender: Some(if i % 2 == 0 { Gender::Female } else { Gender::Male }),
                crew: Some(crew.to_string()),
                unit: None,
                level: None,
                paid_amount: Some(500.0 + (i as f64) * 250.0),
                pending_amount: None,
                payment_status: None,
                outreach_id: Some(outreach.id),
                bank_id: None,
                proof_image: None,
                draft_token: None,
            })
            .await?;
        println!("  {} registered", payment.id);
    }

    println!("Done.");

    Ok(())
}
