// Chain Watcher - Monero blockchain event detection
// Polls the daemon and wallet RPC endpoints and publishes new-block,
// transfer, balance and confirmation events to NATS.

use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

mod config;
mod service;
mod store;

use config::Config;
use service::ChainWatcherService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("⛓️  Chain Watcher starting...");

    // Load configuration
    let config = Config::from_env();

    // Create the watcher service
    let service = ChainWatcherService::new(config.clone())
        .await
        .expect("Failed to create chain watcher");

    // Start the scheduled polling job
    start_polling_job(service, &config.poll_schedule).await?;

    // Start HTTP server for health checks
    let server_port = config.server_port;
    info!("🚀 Starting HTTP server on port {}", server_port);

    HttpServer::new(|| App::new().route("/health", web::get().to(health_check)))
        .bind(("0.0.0.0", server_port))?
        .run()
        .await
}

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "chain-watcher",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn start_polling_job(service: ChainWatcherService, schedule: &str) -> std::io::Result<()> {
    let scheduler = JobScheduler::new()
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let service = service.clone();
        Box::pin(async move {
            if let Err(e) = service.poll_all().await {
                error!("Polling round failed: {:#}", e);
            }
        })
    })
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    scheduler
        .add(job)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    scheduler
        .start()
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    info!("✅ Polling job scheduled ({})", schedule);

    Ok(())
}
