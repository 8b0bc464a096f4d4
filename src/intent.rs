//! Bet Intent Types
//!
//! Core types for cross-chain bet intents: the supported chain set, the
//! intent actions, and the `BetIntent` structure that is serialized into an
//! opaque payload for relay. An intent is immutable once dispatched; the
//! payload travels as-is and is decoded again only at settlement time.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CHAIN IDENTIFIERS
// ============================================================================

/// Supported chains.
///
/// This is a closed set: adding a chain means adding a variant here, a config
/// section, and a gateway router arm. No component branches on chain name
/// strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainId {
    /// Solana (direct program invocation)
    Solana,
    /// Arbitrum (EVM, reached through the cross-chain gateway)
    Arbitrum,
    /// Ethereum (EVM, reached through the cross-chain gateway)
    Ethereum,
    /// Base (EVM, reached through the cross-chain gateway)
    Base,
    /// Zcash shielded settlement
    Zcash,
}

impl ChainId {
    /// Whether this chain is served by the EVM gateway backend.
    pub fn is_evm(self) -> bool {
        matches!(self, ChainId::Arbitrum | ChainId::Ethereum | ChainId::Base)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChainId::Solana => "solana",
            ChainId::Arbitrum => "arbitrum",
            ChainId::Ethereum => "ethereum",
            ChainId::Base => "base",
            ChainId::Zcash => "zcash",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// INTENT STRUCTURES
// ============================================================================

/// What the user is asking the destination chain to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetAction {
    /// Stake an amount on a market outcome
    PlaceBet,
    /// Collect winnings from a resolved market
    ClaimWinnings,
}

impl fmt::Display for BetAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BetAction::PlaceBet => "place_bet",
            BetAction::ClaimWinnings => "claim_winnings",
        };
        write!(f, "{}", name)
    }
}

/// Action parameters carried inside a bet intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetParams {
    /// Market the action targets
    pub market_id: String,
    /// Predicted outcome (yes/no)
    pub prediction: bool,
    /// Stake as a decimal string. Chains disagree on decimal counts, so the
    /// amount stays textual until a specific chain's base units are needed.
    pub amount: String,
    /// User address as supplied by the authenticated UI boundary
    pub user: String,
}

/// A user's request to act on a market, expressed independently of which
/// chain executes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetIntent {
    /// Chain the user submitted from
    pub source_chain: ChainId,
    /// Chain that executes the action
    pub destination_chain: ChainId,
    /// Requested action
    pub action: BetAction,
    /// Action parameters
    pub params: BetParams,
}

impl BetIntent {
    /// Serializes the intent into the opaque relay payload.
    pub fn to_payload(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decodes a relay payload back into an intent.
    pub fn from_payload(payload: &str) -> serde_json::Result<Self> {
        serde_json::from_str(payload)
    }
}
