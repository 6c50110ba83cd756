use std::path::PathBuf;

use tracing::info;

use upfluence_db::Database;

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "upfluence=info".into()),
        )
        .init();

    let db_path: PathBuf = std::env::var("UPFLUENCE_DB_PATH")
        .unwrap_or_else(|_| "upfluence.db".into())
        .into();

    info!("Seeding {}", db_path.display());
    let db = Database::open(&db_path)?;
    let summary = upfluence_api::seed::run(&db)?;

    info!(
        brands = summary.brands,
        influencers = summary.influencers,
        campaigns = summary.campaigns,
        applications = summary.applications,
        messages = summary.messages,
        admins = summary.admins,
        "Database seeded"
    );
    info!("Brand: sarah@fashionnova.com / {}", upfluence_api::seed::DEMO_PASSWORD);
    info!("Influencer: sarah@lifestyle.com / {}", upfluence_api::seed::DEMO_PASSWORD);
    info!("Admin: {} / {}", upfluence_api::seed::ADMIN_EMAIL, upfluence_api::seed::ADMIN_PASSWORD);
    Ok(())
}
