//! Burrow installer entry point.

mod app;
mod config;
mod engine;
mod prompts;

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(request_path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        anyhow::bail!("usage: burrow <install-request.json>");
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting burrow installer");

    // Load configuration.
    let config = config::Config::load()?;
    tracing::info!(
        store = %config.store_path().display(),
        api = %config.api_base_url,
        "configuration loaded"
    );

    let rt = tokio::runtime::Runtime::new()?;
    if let Some(result) = rt.block_on(app::run(config, &request_path))? {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(())
}
