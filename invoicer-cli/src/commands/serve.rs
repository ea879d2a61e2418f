use anyhow::{Context, Result};
use invoicer_core::app::InvoicerApp;
use invoicer_core::config::InvoicerConfig;
use invoicer_core::http::HttpServer;
use std::path::Path;
use std::sync::Arc;

/// Load configuration, apply command-line overrides, and serve until Ctrl-C.
pub async fn run(config_path: &Path, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = InvoicerConfig::load_from(config_path)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    invoicer_core::logging::init_logging(&config.logging)?;

    if config.users.is_empty() {
        log::warn!("No [[users]] configured, every login will be rejected");
    }

    let addr = config.server.bind_address();
    let app = InvoicerApp::builder(config).build().context("Invalid configuration")?;

    HttpServer::new(Arc::new(app)).serve(&addr).await
}
