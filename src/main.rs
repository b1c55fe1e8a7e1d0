use anyhow::Result;
use website_audit::api;
use website_audit::config::Config;
use website_audit::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // initialize logging
    logging::init();

    // load configuration
    let config = Config::from_env();

    // serve until shutdown
    api::serve(config).await?;

    Ok(())
}
