//! Timeout & Retry Coordinator
//!
//! Periodic sweep over messages that have outlived the cross-chain timeout.
//! Pending messages (send never accepted) are re-dispatched up to a bounded
//! attempt count, then failed. Relayed messages are never re-sent: an
//! on-chain effect may already exist, so once confirmation polls are
//! exhausted they are failed and left visible for operator reconciliation.

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::gateway::{AdapterError, GatewayRouter};
use crate::intent::BetIntent;
use crate::store::messages::{CrossChainMessage, MessageStatus, MessageStore};

/// Counts of what one sweep pass did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Pending messages whose send was attempted again
    pub retried: u32,
    /// Messages transitioned to failed
    pub failed: u32,
}

/// Enforces the cross-chain timeout over the message store.
pub struct TimeoutCoordinator {
    config: Arc<Config>,
    store: Arc<MessageStore>,
    gateways: Arc<GatewayRouter>,
}

impl TimeoutCoordinator {
    pub fn new(config: Arc<Config>, store: Arc<MessageStore>, gateways: Arc<GatewayRouter>) -> Self {
        Self {
            config,
            store,
            gateways,
        }
    }

    /// Runs the sweep loop until the process shuts down.
    pub async fn run(&self) {
        info!(
            "Starting timeout coordinator (every {}s, timeout {}s)",
            self.config.relayer.sweep_interval_secs, self.config.relayer.cross_chain_timeout_secs
        );
        loop {
            self.sweep_once().await;
            tokio::time::sleep(Duration::from_secs(self.config.relayer.sweep_interval_secs))
                .await;
        }
    }

    /// Sweeps expired messages once.
    pub async fn sweep_once(&self) -> SweepOutcome {
        let now = crate::store::current_timestamp();
        let timeout = self.config.relayer.cross_chain_timeout_secs;
        let mut outcome = SweepOutcome::default();

        for message in self.store.by_status(MessageStatus::Pending).await {
            if now.saturating_sub(message.timestamp) < timeout {
                continue;
            }
            if message.dispatch_attempts >= self.config.relayer.max_dispatch_attempts {
                match self
                    .store
                    .transition(&message.id, MessageStatus::Failed, None)
                    .await
                {
                    Ok(()) => {
                        warn!(
                            "Message {} failed after {} dispatch attempts",
                            message.id, message.dispatch_attempts
                        );
                        outcome.failed += 1;
                    }
                    Err(e) => error!("Failed to fail message {}: {}", message.id, e),
                }
                continue;
            }
            self.retry_dispatch(&message, &mut outcome).await;
        }

        for message in self.store.by_status(MessageStatus::Relayed).await {
            if now.saturating_sub(message.timestamp) < timeout {
                continue;
            }
            if message.confirmation_polls < self.config.relayer.max_confirmation_polls {
                continue;
            }
            match self
                .store
                .transition(&message.id, MessageStatus::Failed, None)
                .await
            {
                Ok(()) => {
                    // Funds may already exist on the destination chain
                    warn!(
                        "Message {} (tx {:?}) timed out awaiting confirmation after {} polls; \
                         marked failed, requires operator reconciliation",
                        message.id, message.tx_hash, message.confirmation_polls
                    );
                    outcome.failed += 1;
                }
                Err(e) => error!("Failed to escalate message {}: {}", message.id, e),
            }
        }

        outcome
    }

    /// Attempts the send again for a pending message.
    async fn retry_dispatch(&self, message: &CrossChainMessage, outcome: &mut SweepOutcome) {
        let Some(adapter) = self.gateways.adapter_for(message.destination_chain) else {
            warn!(
                "No gateway for chain {} (message {})",
                message.destination_chain, message.id
            );
            return;
        };
        let gas_limit = match BetIntent::from_payload(&message.payload) {
            Ok(intent) => self.config.gas_limits.for_action(intent.action),
            Err(e) => {
                error!("Message {} carries an undecodable payload: {}", message.id, e);
                return;
            }
        };

        if let Err(e) = self.store.record_dispatch_attempt(&message.id).await {
            error!("Failed to record attempt for message {}: {}", message.id, e);
            return;
        }
        outcome.retried += 1;

        match adapter.send(&message.payload, gas_limit).await {
            Ok(tx_hash) => {
                match self
                    .store
                    .transition(&message.id, MessageStatus::Relayed, Some(tx_hash.clone()))
                    .await
                {
                    Ok(()) => info!("Message {} relayed on retry, tx {}", message.id, tx_hash),
                    Err(e) => error!("Failed to mark message {} relayed: {}", message.id, e),
                }
            }
            Err(AdapterError::Rejected(reason)) => {
                match self
                    .store
                    .transition(&message.id, MessageStatus::Failed, None)
                    .await
                {
                    Ok(()) => {
                        warn!("Message {} rejected on retry: {}", message.id, reason);
                        outcome.failed += 1;
                    }
                    Err(e) => error!("Failed to fail message {}: {}", message.id, e),
                }
            }
            Err(e) => {
                warn!("Retry send for message {} did not complete: {}", message.id, e);
            }
        }
    }
}
