use std::sync::Arc;

use estatecare::config::AppConfig;
use estatecare::rate_limit::InMemoryRateLimiter;
use estatecare::{handlers, microsvc, telemetry, InMemoryDocumentStore, InventoryService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    telemetry::init_tracing(&config.log)?;

    let inventory =
        InventoryService::new(InMemoryDocumentStore::new()).with_options(config.transaction);
    let service = Arc::new(handlers::inventory_service(inventory));
    let limiter = Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone()));

    tracing::info!(
        commands = service.commands().len(),
        max_attempts = config.transaction.max_attempts,
        "starting estatecare"
    );
    microsvc::serve(
        service,
        limiter,
        config.rate_limit.client_key(),
        &config.server.bind_addr,
    )
    .await?;
    Ok(())
}
