//! Relayer Service
//!
//! Moves prediction-market bet intents between chains. The service accepts
//! `BetIntent` submissions over the REST API, relays them through the
//! destination chain's gateway adapter, and tracks every relay in the
//! message store, which is the single source of truth for delivery status.
//!
//! ## Overview
//!
//! The relayer runs as a set of independent workers coordinated through the
//! stores:
//! 1. The dispatcher validates intents and submits payloads (at-most-once)
//! 2. The confirmation watcher polls destination chains and settles bets
//! 3. The timeout coordinator retries stuck sends and escalates expired
//!    messages
//! 4. The market resolver fixes outcomes when the oracle feed reports

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use relayer::api::ApiServer;
use relayer::config::Config;
use relayer::dispatcher::RelayDispatcher;
use relayer::gateway::GatewayRouter;
use relayer::resolver::MarketResolver;
use relayer::store::markets::MarketStore;
use relayer::store::messages::MessageStore;
use relayer::timeout::TimeoutCoordinator;
use relayer::watcher::ConfirmationWatcher;

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

/// Main application entry point that initializes and runs the relayer.
///
/// This function:
/// 1. Initializes logging and tracing
/// 2. Loads configuration from a TOML file
/// 3. Builds the stores, gateways, and workers
/// 4. Spawns the background workers
/// 5. Runs the API server until shutdown
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured logging for debugging and monitoring
    tracing_subscriber::fmt::init();

    info!("Starting Relayer Service");

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Check for help flag
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("Relayer Service");
        println!();
        println!("Usage: relayer [OPTIONS]");
        println!();
        println!("Options:");
        println!("  --testnet, -t    Use testnet configuration (config/relayer_testnet.toml)");
        println!("  --config <path>   Use custom config file path (overrides --testnet)");
        println!("  --help, -h        Show this help message");
        println!();
        println!("Environment variables:");
        println!("  RELAYER_CONFIG_PATH    Path to config file (overrides --config and --testnet)");
        return Ok(());
    }

    // Check for custom config path
    let mut config_path = None;
    for (i, arg) in args.iter().enumerate() {
        if arg == "--config" && i + 1 < args.len() {
            config_path = Some(args[i + 1].clone());
            break;
        }
    }

    // Set config path based on flags
    if let Some(path) = config_path {
        std::env::set_var("RELAYER_CONFIG_PATH", &path);
        info!("Using custom config: {}", path);
    } else if args.iter().any(|arg| arg == "--testnet" || arg == "-t") {
        std::env::set_var("RELAYER_CONFIG_PATH", "config/relayer_testnet.toml");
        info!("Using testnet configuration");
    }

    // Load configuration from config file (or RELAYER_CONFIG_PATH env var)
    let config = Arc::new(Config::load()?);
    info!("Configuration loaded successfully");

    // The stores are the only shared mutable state
    let store = Arc::new(MessageStore::new());
    let markets = Arc::new(MarketStore::new());

    // One gateway adapter per configured chain
    let gateways = Arc::new(GatewayRouter::new(&config)?);
    info!("Gateway router initialized");

    let dispatcher = Arc::new(RelayDispatcher::new(
        config.clone(),
        store.clone(),
        markets.clone(),
        gateways.clone(),
    ));
    let resolver = Arc::new(MarketResolver::new(markets.clone()));

    // Start background confirmation polling
    info!("Starting background workers");
    let watcher = ConfirmationWatcher::new(
        config.clone(),
        store.clone(),
        markets.clone(),
        gateways.clone(),
    );
    tokio::spawn(async move { watcher.run().await });

    // Start background timeout sweeping
    let coordinator = TimeoutCoordinator::new(config.clone(), store.clone(), gateways);
    tokio::spawn(async move { coordinator.run().await });

    // Run the API server (this blocks until shutdown)
    let api_server = ApiServer::new(config, store, markets, dispatcher, resolver);
    api_server.run().await?;

    Ok(())
}
