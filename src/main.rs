mod bootstrap;

use anyhow::Context;
use tracing::{error, info};

use bootstrap::{init_tracing_subscriber, resolve_config, run_kiosk, wire_dependencies};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal; variables may come from the real environment.
    let dotenv = dotenvy::dotenv();

    init_tracing_subscriber().context("Failed to initialize tracing")?;
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    let config = resolve_config().context("Failed to load kiosk configuration")?;
    let deps = wire_dependencies(&config)?;

    if let Err(err) = run_kiosk(deps).await {
        error!(error = %err, "kiosk stopped with an error");
        return Err(err);
    }
    info!("kiosk stopped");
    Ok(())
}
