use std::sync::Arc;

mod app;
mod auth;
mod config;
mod criteria;
mod db;
mod error;
mod extract;
mod jobs;
mod mailer;
mod resource;
mod response;
mod state;
#[cfg(test)]
mod test_support;
mod validation;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "profile_matching=debug,axum=info,tower_http=info".to_string());
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
    error::expose_internal_errors(config.is_development());
    tracing::info!(
        environment = %config.environment,
        default_role = %config.default_role,
        "configuration loaded"
    );

    let pool = db::connect(&config.database).await?;
    db::migrate(&pool).await?;

    let config = Arc::new(config);
    let state = AppState::new(config.clone(), pool.clone());
    let result = app::serve(app::build_app(state), &config.host, config.port).await;

    pool.close().await;
    tracing::info!("database pool closed");
    result
}
