//! fare-gateway: Fare Comparison Gateway Main Binary
//!
//! Main entry point for the fare comparison gateway.
//!
//! Usage:
//!   fare-gateway           - Start the HTTP API server
//!   fare-gateway --help    - Show help
//!   fare-gateway --version - Show version

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use fare_browser::{BrowserConfig, BrowserLauncher, ChromeLauncher};
use fare_core::{Config, CredentialManager};

/// Run mode
enum RunMode {
    /// Server mode (HTTP API)
    Server,
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    match parse_args() {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("fare-gateway {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Server => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting fare-gateway...");
    tracing::info!(
        "Services: {}",
        config
            .services
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    run_server(config).await
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    let args: Vec<String> = std::env::args().collect();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Server
}

/// Print help message
fn print_help() {
    println!("fare-gateway - Fare Comparison Gateway");
    println!();
    println!("Usage:");
    println!("  fare-gateway           Start the HTTP API server");
    println!("  fare-gateway --help    Show this help message");
    println!("  fare-gateway --version Show version");
    println!();
    println!("Environment Variables:");
    println!("  API_PORT             HTTP API port (default: 3000)");
    println!("  FARE_DB_PATH         Credential store path (default: fare-gateway.db)");
    println!("  FARE_SERVICES        Enabled services, comma-separated (default: all)");
    println!("  FARE_CONFIG          Path to a fare-gateway.toml config file");
    println!("  BROWSER_HEADLESS     Run scraping sessions headless (default: true)");
    println!("  BROWSER_USER_AGENT   Custom browser user agent");
}

/// Run server mode (HTTP API)
async fn run_server(config: Config) -> anyhow::Result<()> {
    // Create the credential store
    let credentials = CredentialManager::new(&config.store.db_path)
        .map_err(|e| anyhow::anyhow!("Failed to open credential store: {}", e))?;

    // Create the browser launcher agents scrape through
    let mut browser = BrowserConfig::builder().headless(config.browser.headless);
    if let Some(ua) = &config.browser.user_agent {
        browser = browser.user_agent(ua);
    }
    let launcher: Arc<dyn BrowserLauncher> = Arc::new(ChromeLauncher::new(browser.build()));

    // Start HTTP API server
    let api_port = config.api.port;
    let api_config = config.clone();
    let api_credentials = credentials.clone();

    let handle = tokio::spawn(async move {
        if let Err(e) =
            fare_api::start_server(api_port, api_config, api_credentials, launcher).await
        {
            tracing::error!("HTTP API error: {}", e);
        }
    });
    tracing::info!("HTTP API server started on port {}", api_port);

    tracing::info!("fare-gateway initialized successfully");
    tracing::info!("Press Ctrl+C to exit");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");

    handle.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}
