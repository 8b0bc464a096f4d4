//! Relay Dispatcher
//!
//! Entry point for inbound intents: validates, creates the message record,
//! submits the payload to the destination gateway, and records the outcome.
//! Submission is at-most-once: an indeterminate send leaves the message
//! pending for the timeout coordinator instead of being retried inline, so a
//! payload is never silently submitted twice.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::gateway::{AdapterError, GatewayRouter};
use crate::intent::BetIntent;
use crate::store::markets::MarketStore;
use crate::store::messages::{MessageStatus, MessageStore, StoreError};
use crate::validator::{self, ValidationError};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Ways a dispatch can fail.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The intent violated a validation rule; nothing was recorded
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The gateway definitively rejected the send; the message is failed
    #[error("send rejected by destination gateway: {0}")]
    SendRejected(String),
    /// No gateway is configured for the destination chain
    #[error("no gateway configured for chain {0}")]
    NoGateway(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to serialize intent: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ============================================================================
// DISPATCHER
// ============================================================================

/// Submits validated intents to the cross-chain relay.
pub struct RelayDispatcher {
    config: Arc<Config>,
    store: Arc<MessageStore>,
    markets: Arc<MarketStore>,
    gateways: Arc<GatewayRouter>,
}

impl RelayDispatcher {
    pub fn new(
        config: Arc<Config>,
        store: Arc<MessageStore>,
        markets: Arc<MarketStore>,
        gateways: Arc<GatewayRouter>,
    ) -> Self {
        Self {
            config,
            store,
            markets,
            gateways,
        }
    }

    /// Dispatches a bet intent to its destination chain.
    ///
    /// Steps:
    /// 1. Validate the intent (no side effects on failure)
    /// 2. Serialize it into the relay payload
    /// 3. Create a pending message record
    /// 4. Submit the payload through the destination gateway
    /// 5. Record the outcome: relayed with the returned hash, failed on a
    ///    definitive rejection, or left pending on an indeterminate send
    ///    for the timeout coordinator to retry
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Id of the tracked message (including the
    ///   left-pending case; the message remains visible and tracked)
    /// * `Err(DispatchError)` - Validation failure or definitive rejection
    pub async fn dispatch(&self, intent: &BetIntent) -> Result<String, DispatchError> {
        validator::validate(intent, &self.markets, &self.config).await?;

        let adapter = self
            .gateways
            .adapter_for(intent.destination_chain)
            .ok_or_else(|| DispatchError::NoGateway(intent.destination_chain.to_string()))?;

        let payload = intent.to_payload()?;
        let message = self
            .store
            .create(intent.source_chain, intent.destination_chain, payload.clone())
            .await;
        info!(
            "Dispatching message {} ({} -> {}, {})",
            message.id, intent.source_chain, intent.destination_chain, intent.action
        );

        let gas_limit = self.config.gas_limits.for_action(intent.action);
        match adapter.send(&payload, gas_limit).await {
            Ok(tx_hash) => {
                self.store
                    .transition(&message.id, MessageStatus::Relayed, Some(tx_hash.clone()))
                    .await?;
                info!("Message {} relayed, tx {}", message.id, tx_hash);
                Ok(message.id)
            }
            Err(AdapterError::Rejected(reason)) => {
                self.store
                    .transition(&message.id, MessageStatus::Failed, None)
                    .await?;
                warn!("Message {} rejected by gateway: {}", message.id, reason);
                Err(DispatchError::SendRejected(reason))
            }
            Err(err) => {
                // Outcome indeterminate: the sweep owns the retry
                self.store.record_dispatch_attempt(&message.id).await?;
                warn!(
                    "Message {} send did not complete, left pending: {}",
                    message.id, err
                );
                Ok(message.id)
            }
        }
    }
}
