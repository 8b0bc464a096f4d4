//! Configuration Management Module
//!
//! This module handles loading and managing configuration for the relayer
//! service. Configuration includes chain endpoints, timing and retry
//! settings, gas budgets, and API settings. The configuration is an explicit
//! struct handed to every component at construction, so tests can substitute
//! deterministic endpoints.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::amount;
use crate::intent::{BetAction, ChainId};

// ============================================================================
// CONFIGURATION STRUCTURES
// ============================================================================

/// Main configuration structure containing all service settings.
///
/// This structure holds configuration for:
/// - The Solana chain (optional, direct program invocation)
/// - EVM chains reached through the cross-chain gateway (zero or more)
/// - Zcash shielded settlement (optional)
/// - Relayer timing, timeout, and retry settings
/// - API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Solana chain configuration (optional)
    #[serde(default)]
    pub solana: Option<SvmChainConfig>,
    /// EVM chains served by the gateway backend (optional, repeatable)
    #[serde(default)]
    pub evm: Vec<EvmChainConfig>,
    /// Zcash shielded settlement configuration (optional)
    #[serde(default)]
    pub zcash: Option<ShieldedChainConfig>,
    /// Relayer-specific configuration (timing and retry settings)
    pub relayer: RelayerConfig,
    /// Fixed gas budgets for destination-contract entry points
    #[serde(default)]
    pub gas_limits: GasLimits,
    /// Market intake settings
    #[serde(default)]
    pub market: MarketConfig,
    /// API server configuration (host, port, CORS settings)
    pub api: ApiConfig,
}

/// Configuration for the Solana chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvmChainConfig {
    /// Human-readable name for the chain
    pub name: String,
    /// RPC endpoint URL for Solana JSON-RPC communication
    pub rpc_url: String,
    /// Program ID of the betting program (base58)
    pub program_id: String,
    /// Decimal places for amounts on this chain
    pub decimals: u32,
    /// Smallest accepted bet, as a decimal string
    pub min_bet_amount: String,
}

/// Configuration for an EVM-compatible chain (Arbitrum, Ethereum, Base).
///
/// EVM chains are reached through an Axelar-style gateway service: the
/// relayer submits a relay request to `gateway_url` and observes the
/// resulting destination transaction through `rpc_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvmChainConfig {
    /// Which supported chain this section configures
    pub chain: ChainId,
    /// Human-readable name for the chain
    pub name: String,
    /// RPC endpoint URL of the destination chain
    pub rpc_url: String,
    /// Gateway relay endpoint that forwards payloads to this chain
    pub gateway_url: String,
    /// Address of the betting contract on the destination chain
    pub contract_addr: String,
    /// Decimal places for amounts on this chain
    pub decimals: u32,
    /// Smallest accepted bet, as a decimal string
    pub min_bet_amount: String,
}

/// Configuration for Zcash shielded settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShieldedChainConfig {
    /// Human-readable name for the chain
    pub name: String,
    /// RPC endpoint URL of the Zcash node
    pub rpc_url: String,
    /// Shielded address the settlement notes are sent from
    pub pool_addr: String,
    /// Shielded address the settlement notes are sent to
    pub settlement_addr: String,
    /// Decimal places for amounts on this chain
    pub decimals: u32,
    /// Smallest accepted bet, as a decimal string
    pub min_bet_amount: String,
}

/// Relayer-specific configuration for timing and retry parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayerConfig {
    /// Seconds a message may sit unconfirmed before the sweep acts on it
    pub cross_chain_timeout_secs: u64,
    /// Confirmation watcher cadence in seconds
    pub confirmation_poll_interval_secs: u64,
    /// Timeout coordinator sweep cadence in seconds
    pub sweep_interval_secs: u64,
    /// Total send attempts tolerated for a message stuck in pending
    pub max_dispatch_attempts: u32,
    /// Confirmation polls performed before a relayed message is escalated
    pub max_confirmation_polls: u32,
    /// Per-request timeout for chain RPC calls in milliseconds
    pub send_timeout_ms: u64,
}

/// Fixed gas budgets for the destination-contract entry points.
///
/// These are sanity/cost-estimate bounds passed along with gateway relay
/// requests, not values the relayer computes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasLimits {
    pub place_bet: u64,
    pub resolve_market: u64,
    pub claim_winnings: u64,
}

impl Default for GasLimits {
    fn default() -> Self {
        Self {
            place_bet: 200_000,
            resolve_market: 150_000,
            claim_winnings: 100_000,
        }
    }
}

impl GasLimits {
    /// Gas budget for the destination entry point a given action invokes.
    pub fn for_action(&self, action: BetAction) -> u64 {
        match action {
            BetAction::PlaceBet => self.place_bet,
            BetAction::ClaimWinnings => self.claim_winnings,
        }
    }
}

/// Market intake settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Minimum seconds between market creation and its deadline
    pub min_duration_secs: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            min_duration_secs: 3600,
        }
    }
}

/// API server configuration for external communication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host address to bind the API server to
    pub host: String,
    /// Port number to bind the API server to
    pub port: u16,
    /// Allowed CORS origins for cross-origin requests
    pub cors_origins: Vec<String>,
}

/// Per-chain amount constraints used during validation.
#[derive(Debug, Clone, Copy)]
pub struct ChainLimits<'a> {
    /// Decimal places for amounts on the chain
    pub decimals: u32,
    /// Smallest accepted bet, as a decimal string
    pub min_bet_amount: &'a str,
}

// ============================================================================
// CONFIGURATION LOADING AND MANAGEMENT
// ============================================================================

impl Config {
    /// Whether a chain has a configured backend and may appear in intents.
    pub fn is_supported(&self, chain: ChainId) -> bool {
        match chain {
            ChainId::Solana => self.solana.is_some(),
            ChainId::Zcash => self.zcash.is_some(),
            chain => self.evm.iter().any(|section| section.chain == chain),
        }
    }

    /// Amount constraints for a configured chain.
    ///
    /// # Returns
    ///
    /// * `Some(ChainLimits)` - The chain is configured
    /// * `None` - No configuration section covers the chain
    pub fn chain_limits(&self, chain: ChainId) -> Option<ChainLimits<'_>> {
        match chain {
            ChainId::Solana => self.solana.as_ref().map(|section| ChainLimits {
                decimals: section.decimals,
                min_bet_amount: &section.min_bet_amount,
            }),
            ChainId::Zcash => self.zcash.as_ref().map(|section| ChainLimits {
                decimals: section.decimals,
                min_bet_amount: &section.min_bet_amount,
            }),
            chain => self
                .evm
                .iter()
                .find(|section| section.chain == chain)
                .map(|section| ChainLimits {
                    decimals: section.decimals,
                    min_bet_amount: &section.min_bet_amount,
                }),
        }
    }

    /// Validates the configuration.
    ///
    /// This function ensures that:
    /// - At least one chain backend is configured
    /// - Every EVM section names an EVM chain and no chain is configured twice
    /// - Endpoint URLs parse
    /// - Minimum bet amounts parse under each chain's decimal count
    /// - Timing and retry parameters are non-zero
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Configuration is valid
    /// - `Err(anyhow::Error)` - First violated rule
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.solana.is_none() && self.evm.is_empty() && self.zcash.is_none() {
            return Err(anyhow::anyhow!(
                "Configuration error: no chain backends configured"
            ));
        }

        if let Some(ref solana) = self.solana {
            validate_endpoint(&solana.rpc_url, &solana.name)?;
            validate_min_bet(&solana.min_bet_amount, solana.decimals, &solana.name)?;
        }

        for (index, section) in self.evm.iter().enumerate() {
            if !section.chain.is_evm() {
                return Err(anyhow::anyhow!(
                    "Configuration error: [[evm]] section {} configures non-EVM chain {}",
                    index,
                    section.chain
                ));
            }
            let duplicates = self
                .evm
                .iter()
                .filter(|other| other.chain == section.chain)
                .count();
            if duplicates > 1 {
                return Err(anyhow::anyhow!(
                    "Configuration error: chain {} is configured more than once",
                    section.chain
                ));
            }
            validate_endpoint(&section.rpc_url, &section.name)?;
            validate_endpoint(&section.gateway_url, &section.name)?;
            validate_min_bet(&section.min_bet_amount, section.decimals, &section.name)?;
        }

        if let Some(ref zcash) = self.zcash {
            validate_endpoint(&zcash.rpc_url, &zcash.name)?;
            validate_min_bet(&zcash.min_bet_amount, zcash.decimals, &zcash.name)?;
        }

        if self.relayer.max_dispatch_attempts == 0 {
            return Err(anyhow::anyhow!(
                "Configuration error: max_dispatch_attempts must be non-zero"
            ));
        }
        if self.relayer.confirmation_poll_interval_secs == 0
            || self.relayer.sweep_interval_secs == 0
        {
            return Err(anyhow::anyhow!(
                "Configuration error: worker intervals must be non-zero"
            ));
        }

        Ok(())
    }

    /// Loads configuration from the TOML file.
    ///
    /// This function:
    /// 1. Resolves the config path (RELAYER_CONFIG_PATH or config/relayer.toml)
    /// 2. Loads and parses the configuration if the file exists
    /// 3. Validates the configuration
    /// 4. Returns an error asking the user to copy the template otherwise
    ///
    /// # Returns
    ///
    /// - `Ok(Config)` - Successfully loaded and validated configuration
    /// - `Err(anyhow::Error)` - Missing file, parse failure, or validation failure
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("RELAYER_CONFIG_PATH")
            .unwrap_or_else(|_| "config/relayer.toml".to_string());

        if std::path::Path::new(&config_path).exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Err(anyhow::anyhow!(
                "Configuration file '{}' not found. Please copy the template:\n\
                cp config/relayer.template.toml config/relayer.toml\n\
                Then edit config/relayer.toml with your actual values.",
                config_path
            ))
        }
    }
}

/// Validates that an endpoint URL parses.
fn validate_endpoint(endpoint: &str, chain_name: &str) -> anyhow::Result<()> {
    Url::parse(endpoint)
        .map_err(|e| anyhow::anyhow!("Invalid endpoint URL for {}: {}", chain_name, e))?;
    Ok(())
}

/// Validates that a configured minimum bet parses under the chain's decimals.
fn validate_min_bet(min_bet: &str, decimals: u32, chain_name: &str) -> anyhow::Result<()> {
    amount::parse_decimal(min_bet, decimals)
        .map_err(|e| anyhow::anyhow!("Invalid min_bet_amount for {}: {}", chain_name, e))?;
    Ok(())
}
