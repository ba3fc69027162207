use actix_web::{web, HttpServer};
use anyhow::Context;

use es_api::{build_state, create_app, telemetry};
use es_shared::{AppConfig, Environment};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();
    dotenvy::from_filename(environment.env_file()).ok();
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init_tracing(&config.logging);

    tracing::info!(
        environment = %config.environment,
        "Starting Events Scheduler API server"
    );
    if config.auth.is_using_default_secret() {
        tracing::warn!("JWT_SECRET not set; using the development default");
    }

    let state = web::Data::new(
        build_state(&config)
            .await
            .context("failed to initialise application state")?,
    );

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, "Server listening");

    HttpServer::new(move || create_app(state.clone()))
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    Ok(())
}
