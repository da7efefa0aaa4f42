mod checking;
mod config;
mod error;
mod handlers;
mod models;
mod router;
mod routes;
mod scheduler;
mod store;

use actix_web::{App, HttpServer, web};
use anyhow::Context;
use config::Config;
use dotenv::dotenv;
use router::ModeRouter;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    let router = web::Data::new(ModeRouter::from_config(&config).await?);

    let _scheduler = scheduler::start(router.clone().into_inner(), config.schedule_interval);

    tracing::info!(
        address = %config.bind_address,
        port = config.port,
        personal = config.is_personal(),
        "starting HTTP server"
    );
    HttpServer::new(move || App::new().app_data(router.clone()).configure(routes::init))
        .bind((config.bind_address.as_str(), config.port))?
        .run()
        .await?;

    Ok(())
}
