mod app;
mod auth;
mod config;
mod db;
mod error;
mod photos;
mod state;
mod store;
mod users;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "photo_api=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    if config.jwt.secret.is_none() {
        tracing::warn!("JWT_SECRET_KEY is not set; protected photo routes will answer 500");
    }
    let addr = config.bind_addr()?;

    // Database connect and schema setup are fatal on failure.
    let app_state = AppState::init(config).await?;

    app::serve(app::build_app(app_state), addr).await
}
