//! Entry point for the ROI Engine binary.
//!
//! Running this binary will start an HTTP server that exposes a
//! minimal API for calculating ROI.  A configuration table may be
//! supplied as JSON via the `ROI_CONFIG_FILE` environment variable;
//! if unset the built-in table is used.  Log output is controlled
//! with `RUST_LOG`.

use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn,roi_engine=info".into()),
        )
        .init();

    // Optional configuration table override
    let config_path = std::env::var_os("ROI_CONFIG_FILE").map(PathBuf::from);
    // Determine bind address
    let addr = std::env::var("ROI_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    if let Err(err) = roi_engine::api::serve(&addr, config_path).await {
        error!("Error running server: {err:#}");
        std::process::exit(1);
    }
}
