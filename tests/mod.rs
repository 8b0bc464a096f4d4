//! Test module organization
//!
//! This module re-exports test helpers for use in test files.

mod helpers;

#[allow(unused_imports)]
pub use helpers::{
    build_test_config, build_test_config_with_evm_endpoints, build_test_config_with_solana_rpc,
    build_test_config_with_zero_timeout, create_default_bet, create_default_claim_intent,
    create_default_intent, create_default_market, create_default_metrics,
    create_default_resolved_market, DUMMY_MARKET_ID, DUMMY_TWITTER_URL, DUMMY_TX_HASH,
    DUMMY_USER_EVM, DUMMY_USER_SVM, FUTURE_DEADLINE, PAST_DEADLINE,
};
