use mimalloc::MiMalloc;
use tephra::config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tephra=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env().expect("Failed to load configuration");

    let pool =
        tephra::db::create_pool(&config.database_url, config.database_max_connections).await?;
    tephra::db::run_migrations(&pool).await?;

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!(host = %addr, "Starting tephra API server");

    let state = tephra::AppState { db: pool, config };
    let app = tephra::routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
