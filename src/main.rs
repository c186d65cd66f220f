use ferrum_admin::api;
use ferrum_admin::config::Config;
use ferrum_admin::state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ferrum_admin=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting ferrum-admin (env: {})", config.environment);

    // Initialize application state (connects to Postgres, runs migrations)
    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("ferrum-admin listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
