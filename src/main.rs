use anyhow::Result;
use tracing::info;

use stripe_gateway::{build_router, startup, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first so RUST_LOG / LOG_FORMAT apply
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;
    info!("Loaded configuration for environment: {}", config.environment);

    let addr = config.bind_address();
    let app_state = startup::initialize_app(config)?;
    let app = build_router(app_state);

    info!("Starting Stripe gateway on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(startup::shutdown_signal())
        .await?;

    Ok(())
}
