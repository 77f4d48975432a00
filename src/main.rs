use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tripledger::api::{self, handlers::AppState};
use tripledger::config::CONFIG;
use tripledger::{InMemoryActivityLog, InMemoryStorage, LedgerService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&CONFIG.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!("Starting trip ledger with {:?}", *CONFIG);

    // The in-memory store doubles as the membership directory.
    let storage = InMemoryStorage::new();
    let logging = InMemoryActivityLog::new();
    let service = Arc::new(LedgerService::new(
        storage.clone(),
        storage,
        logging,
        CONFIG.store_timeout,
        CONFIG.default_currency,
    ));

    let app = api::app(AppState::new(service), CONFIG.request_timeout);

    // Start server
    let addr = SocketAddr::from(([127, 0, 0, 1], CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
