//! Shared test helpers
//!
//! This module provides helper functions used by the integration tests.
//!
//! The module is organized into several categories:
//! - **Constants**: Dummy ids, addresses, and deadlines
//! - **Configuration Builders**: Functions to create test configurations,
//!   including variants pointed at mock RPC servers
//! - **Default Record Creators**: Functions to create default intents,
//!   markets, metrics, and bets

use relayer::config::{
    ApiConfig, Config, EvmChainConfig, GasLimits, MarketConfig, RelayerConfig,
    ShieldedChainConfig, SvmChainConfig,
};
use relayer::intent::{BetAction, BetIntent, BetParams, ChainId};
use relayer::store::markets::{Bet, Market, TargetMetric, TwitterMetrics};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Dummy market id
#[allow(dead_code)]
pub const DUMMY_MARKET_ID: &str = "market-0001";

/// Dummy user address (EVM format, 20 bytes)
#[allow(dead_code)]
pub const DUMMY_USER_EVM: &str = "0x00000000000000000000000000000000000000a1";

/// Dummy user address (Solana format, base58)
#[allow(dead_code)]
pub const DUMMY_USER_SVM: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";

/// Dummy transaction hash (64 hex characters)
#[allow(dead_code)]
pub const DUMMY_TX_HASH: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000012";

/// Dummy tweet URL for markets
#[allow(dead_code)]
pub const DUMMY_TWITTER_URL: &str = "https://twitter.com/example/status/1";

/// Deadline far in the future
#[allow(dead_code)]
pub const FUTURE_DEADLINE: u64 = 9999999999;

/// Deadline far in the past
#[allow(dead_code)]
pub const PAST_DEADLINE: u64 = 1;

// ============================================================================
// CONFIGURATION BUILDERS
// ============================================================================

/// Build a valid in-memory test configuration covering all three backends.
/// Endpoints point at unroutable local ports; tests that need live endpoints
/// use the mock-server variants below.
#[allow(dead_code)]
pub fn build_test_config() -> Config {
    Config {
        solana: Some(SvmChainConfig {
            name: "Solana Devnet".to_string(),
            rpc_url: "http://127.0.0.1:18899".to_string(),
            program_id: "11111111111111111111111111111111".to_string(),
            decimals: 9,
            min_bet_amount: "0.01".to_string(),
        }),
        evm: vec![EvmChainConfig {
            chain: ChainId::Arbitrum,
            name: "Arbitrum Sepolia".to_string(),
            rpc_url: "http://127.0.0.1:18545".to_string(),
            gateway_url: "http://127.0.0.1:18546/relay".to_string(),
            contract_addr: "0x0000000000000000000000000000000000000010".to_string(),
            decimals: 18,
            min_bet_amount: "0.01".to_string(),
        }],
        zcash: Some(ShieldedChainConfig {
            name: "Zcash Testnet".to_string(),
            rpc_url: "http://127.0.0.1:18232".to_string(),
            pool_addr: "ztestsapling1qqqqqqqqpool".to_string(),
            settlement_addr: "ztestsapling1qqqqqqqqsettle".to_string(),
            decimals: 8,
            min_bet_amount: "0.01".to_string(),
        }),
        relayer: RelayerConfig {
            cross_chain_timeout_secs: 300,
            confirmation_poll_interval_secs: 30,
            sweep_interval_secs: 60,
            max_dispatch_attempts: 3,
            max_confirmation_polls: 10,
            send_timeout_ms: 1000,
        },
        gas_limits: GasLimits::default(),
        market: MarketConfig::default(),
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 3999,
            cors_origins: vec![],
        },
    }
}

/// Build a test configuration whose Arbitrum gateway and RPC point at the
/// given endpoints (usually a wiremock server).
#[allow(dead_code)]
pub fn build_test_config_with_evm_endpoints(gateway_url: &str, rpc_url: &str) -> Config {
    let mut config = build_test_config();
    config.evm[0].gateway_url = gateway_url.to_string();
    config.evm[0].rpc_url = rpc_url.to_string();
    config
}

/// Build a test configuration whose Solana RPC points at the given endpoint.
#[allow(dead_code)]
pub fn build_test_config_with_solana_rpc(rpc_url: &str) -> Config {
    let mut config = build_test_config();
    if let Some(ref mut solana) = config.solana {
        solana.rpc_url = rpc_url.to_string();
    }
    config
}

/// Build a test configuration with a zero cross-chain timeout, so the sweep
/// treats every message as expired immediately.
#[allow(dead_code)]
pub fn build_test_config_with_zero_timeout() -> Config {
    let mut config = build_test_config();
    config.relayer.cross_chain_timeout_secs = 0;
    config
}

// ============================================================================
// DEFAULT RECORD CREATORS
// ============================================================================

/// Create a default place_bet intent from Solana to Arbitrum.
/// This can be customized using Rust's struct update syntax:
/// ```
/// let intent = create_default_intent();
/// let custom_intent = BetIntent {
///     destination_chain: ChainId::Zcash,
///     ..intent
/// };
/// ```
#[allow(dead_code)]
pub fn create_default_intent() -> BetIntent {
    BetIntent {
        source_chain: ChainId::Solana,
        destination_chain: ChainId::Arbitrum,
        action: BetAction::PlaceBet,
        params: BetParams {
            market_id: DUMMY_MARKET_ID.to_string(),
            prediction: true,
            amount: "1.5".to_string(),
            user: DUMMY_USER_EVM.to_string(),
        },
    }
}

/// Create a default claim_winnings intent from Solana to Arbitrum.
#[allow(dead_code)]
pub fn create_default_claim_intent() -> BetIntent {
    BetIntent {
        action: BetAction::ClaimWinnings,
        ..create_default_intent()
    }
}

/// Create a default unresolved market with a future deadline.
/// This can be customized using Rust's struct update syntax:
/// ```
/// let market = create_default_market();
/// let past = Market { deadline: PAST_DEADLINE, ..market };
/// ```
#[allow(dead_code)]
pub fn create_default_market() -> Market {
    Market {
        id: DUMMY_MARKET_ID.to_string(),
        creator: DUMMY_USER_EVM.to_string(),
        twitter_url: DUMMY_TWITTER_URL.to_string(),
        target_metric: TargetMetric::Likes,
        threshold: 1000,
        deadline: FUTURE_DEADLINE,
        total_volume: 0,
        resolved: false,
        outcome: false,
    }
}

/// Create a default resolved market (outcome = true) with a past deadline.
#[allow(dead_code)]
pub fn create_default_resolved_market() -> Market {
    Market {
        deadline: PAST_DEADLINE,
        resolved: true,
        outcome: true,
        ..create_default_market()
    }
}

/// Create a default oracle snapshot above the default market threshold.
#[allow(dead_code)]
pub fn create_default_metrics() -> TwitterMetrics {
    TwitterMetrics {
        likes: 1500,
        retweets: 200,
        replies: 50,
        views: 90000,
        timestamp: 1700000000,
    }
}

/// Create a default unclaimed winning bet (prediction = true).
#[allow(dead_code)]
pub fn create_default_bet() -> Bet {
    Bet {
        user: DUMMY_USER_EVM.to_string(),
        market_id: DUMMY_MARKET_ID.to_string(),
        prediction: true,
        amount: "1.5".to_string(),
        amount_units: 1_500_000_000_000_000_000,
        timestamp: 1700000000,
        source_chain: ChainId::Solana,
        claimed: false,
    }
}
