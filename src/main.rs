//! StaffHub gateway server.

use clap::Parser;
use staffhub_connectivity::ConnectivityMonitor;
use staffhub_core::StaffHubConfig;
use staffhub_platform::{StoreProbe, TenantService, create_cache, create_store};
use std::path::PathBuf;
use std::sync::Arc;

mod logging;

#[derive(Parser)]
#[command(name = "staffhub")]
#[command(author, version, about = "StaffHub gateway: connectivity status and tenant-scoped reads", long_about = None)]
struct Cli {
    /// Config file (default: ~/.staffhub/config.toml)
    #[arg(long, env = "STAFFHUB_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = StaffHubConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }

    let primary = create_store(&config.backend)?;
    let cache = create_cache(&config.backend)?;
    tracing::info!(
        "Backend: {} (cache: {})",
        primary.name(),
        if cache.is_some() { "enabled" } else { "disabled" }
    );

    let probe = Arc::new(StoreProbe::new(primary.clone()));
    let monitor = ConnectivityMonitor::new(&config.connectivity, Some(probe));
    let service = Arc::new(TenantService::new(primary, cache, monitor));

    staffhub_gateway::start(&config.gateway, service).await
}
