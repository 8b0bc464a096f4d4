//! Gateway Adapters
//!
//! One adapter per chain backend, as a closed set of variants behind a single
//! capability surface: `send` a relay payload, `poll_confirmation` of a
//! transaction hash. Adding a chain means adding a variant and a router arm,
//! not branching on chain name strings.

mod evm;
mod svm;
mod zcash;

pub use evm::EvmGateway;
pub use svm::SvmGateway;
pub use zcash::ShieldedGateway;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::config::Config;
use crate::intent::ChainId;

// ============================================================================
// ADAPTER CAPABILITY TYPES
// ============================================================================

/// What a destination chain reports about a relayed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// No final effect observed yet
    Unconfirmed,
    /// Final, irreversible effect observed
    Confirmed,
    /// The transaction executed and failed
    Reverted,
}

/// Failure taxonomy shared by all adapters.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Transport-level failure; the send may be retried
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),
    /// Definitive rejection by the chain (insufficient balance, invalid
    /// signature, nonce conflict); never retried
    #[error("rejected: {0}")]
    Rejected(String),
    /// Indeterminate outcome; retried with bounded attempts
    #[error("unknown adapter failure: {0}")]
    Unknown(String),
}

impl AdapterError {
    /// Classifies a transport error from the HTTP client.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            AdapterError::NetworkUnavailable(err.to_string())
        } else {
            AdapterError::Unknown(err.to_string())
        }
    }
}

// ============================================================================
// JSON-RPC PLUMBING
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

impl JsonRpcRequest {
    pub(crate) fn new(method: &str, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcError {
    pub message: String,
}

/// Classifies a JSON-RPC error object into the adapter failure taxonomy.
pub(crate) fn classify_rpc_error(error: JsonRpcError) -> AdapterError {
    let lowered = error.message.to_lowercase();
    if lowered.contains("insufficient")
        || lowered.contains("invalid")
        || lowered.contains("nonce")
        || lowered.contains("rejected")
    {
        AdapterError::Rejected(error.message)
    } else {
        AdapterError::Unknown(error.message)
    }
}

// ============================================================================
// GATEWAY ADAPTER VARIANTS
// ============================================================================

/// A chain backend able to accept relay payloads and report confirmations.
pub enum GatewayAdapter {
    /// Solana: direct program invocation, single-transaction finality
    Svm(SvmGateway),
    /// EVM chain behind an Axelar-style gateway: a send is only a relay
    /// request, confirmation is observed on the destination chain separately
    Evm(EvmGateway),
    /// Zcash shielded settlement: confirmation is observation of a shielded
    /// commitment, opaque beyond success or failure
    Shielded(ShieldedGateway),
}

impl GatewayAdapter {
    /// Submits a payload for relay.
    ///
    /// # Arguments
    ///
    /// * `payload` - Opaque serialized intent
    /// * `gas_limit` - Fixed gas budget for the destination entry point;
    ///   only meaningful for gateway-routed EVM chains
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Transaction hash (or operation id) to poll
    /// * `Err(AdapterError)` - Classified send failure
    pub async fn send(&self, payload: &str, gas_limit: u64) -> Result<String, AdapterError> {
        match self {
            GatewayAdapter::Svm(gateway) => gateway.send(payload).await,
            GatewayAdapter::Evm(gateway) => gateway.send(payload, gas_limit).await,
            GatewayAdapter::Shielded(gateway) => gateway.send(payload).await,
        }
    }

    /// Polls the destination chain for the fate of a relayed transaction.
    pub async fn poll_confirmation(
        &self,
        tx_hash: &str,
    ) -> Result<ConfirmationStatus, AdapterError> {
        match self {
            GatewayAdapter::Svm(gateway) => gateway.poll_confirmation(tx_hash).await,
            GatewayAdapter::Evm(gateway) => gateway.poll_confirmation(tx_hash).await,
            GatewayAdapter::Shielded(gateway) => gateway.poll_confirmation(tx_hash).await,
        }
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Maps each configured chain to its gateway adapter.
pub struct GatewayRouter {
    adapters: HashMap<ChainId, GatewayAdapter>,
}

impl GatewayRouter {
    /// Builds adapters for every chain present in the configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let timeout_ms = config.relayer.send_timeout_ms;
        let mut adapters = HashMap::new();

        if let Some(ref solana) = config.solana {
            adapters.insert(
                ChainId::Solana,
                GatewayAdapter::Svm(SvmGateway::new(solana, timeout_ms)?),
            );
        }
        for section in &config.evm {
            adapters.insert(
                section.chain,
                GatewayAdapter::Evm(EvmGateway::new(section, timeout_ms)?),
            );
        }
        if let Some(ref zcash) = config.zcash {
            adapters.insert(
                ChainId::Zcash,
                GatewayAdapter::Shielded(ShieldedGateway::new(zcash, timeout_ms)?),
            );
        }

        Ok(Self { adapters })
    }

    /// Adapter serving a chain, if one is configured.
    pub fn adapter_for(&self, chain: ChainId) -> Option<&GatewayAdapter> {
        self.adapters.get(&chain)
    }
}
