use localpulse::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting LocalPulse");

    // Load configuration
    let config = startup::load_config().await?;

    // Run the background service
    startup::start_service(config).await
}
