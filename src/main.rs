use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use automail::triage::{ClassifierHandle, TriageService};
use automail::{config::Config, models::AppState, routes::create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "automail=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    // Connect to database and ensure the uploads table exists
    let pool = automail::db::create_pool(&config.database).await?;
    automail::db::init_schema(&pool).await?;
    info!("Database ready");

    // Build the triage pipeline; a missing ITZAM_API_KEY degrades to
    // sentinel classifications instead of failing startup.
    let classifier = ClassifierHandle::from_config(&config.itzam)?;
    let triage = TriageService::new(classifier, config.itzam.workflow_slug.clone());

    // Create shared state
    let state = AppState {
        pool,
        config: config.clone(),
        triage,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
