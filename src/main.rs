//! Azure DevOps Viewer - browse an Azure DevOps organization from a local server
//!
//! # Usage
//! ```bash
//! export AZURE_DEVOPS_PAT=...
//! devops-viewer --organization contoso          # Start server
//! devops-viewer --organization contoso --open   # Start and open browser
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devops_viewer::devops::{ClientConfig, DevOpsClient, DEFAULT_API_URL};

/// Azure DevOps Viewer - Browse Azure DevOps projects in your browser
#[derive(Parser)]
#[command(name = "devops-viewer")]
#[command(about = "A local browser for Azure DevOps repositories and pipelines", long_about = None)]
struct Cli {
    /// Azure DevOps organization name
    #[arg(long, env = "AZURE_DEVOPS_ORGANIZATION")]
    organization: String,

    /// Personal access token with read access to code and builds
    #[arg(long, env = "AZURE_DEVOPS_PAT", hide_env_values = true)]
    pat: String,

    /// Base URL of the Azure DevOps REST API
    #[arg(long, env = "AZURE_DEVOPS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Upstream request timeout in seconds (none by default)
    #[arg(long)]
    timeout: Option<u64>,

    /// Open browser automatically after starting
    #[arg(short, long)]
    open: bool,

    /// Port to run the server on
    #[arg(short, long, default_value = "3001")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (quieter for production)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig {
        organization: cli.organization.clone(),
        personal_access_token: cli.pat,
        base_url: cli.api_url,
        timeout: cli.timeout.map(Duration::from_secs),
    };

    let client = match DevOpsClient::new(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("✗ Failed to configure Azure DevOps client: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Serving organization {} via {}", client.organization(), client.base_url());

    let app = devops_viewer::app(Arc::new(client));

    // Bind to the port
    let addr = format!("127.0.0.1:{}", cli.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to port {}: {}", cli.port, e);
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    // Print startup message
    let url = format!("http://127.0.0.1:{}", cli.port);
    println!();
    println!("  ┌─────────────────────────────────────────────┐");
    println!("  │             Azure DevOps Viewer             │");
    println!("  └─────────────────────────────────────────────┘");
    println!();
    println!("  Organization: {}", cli.organization);
    println!("  Server:       {}", url);
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    // Open browser if requested
    if cli.open {
        if let Err(e) = open::that(&url) {
            eprintln!("  Warning: Could not open browser: {}", e);
        }
    }

    // Set up graceful shutdown
    let shutdown = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        println!("\n  Shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
