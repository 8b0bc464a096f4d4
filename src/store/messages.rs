//! Cross-Chain Message Store
//!
//! Durable record of every relayed message, keyed by id. The store owns the
//! message state machine: `pending -> {relayed, failed}` and `relayed ->
//! {confirmed, failed}`; `confirmed` and `failed` are terminal. All mutation
//! goes through methods that take the write lock, so transitions for a given
//! id are linearized even when the watcher and the timeout coordinator race.
//!
//! Messages are never deleted. Failed messages stay visible for audit and
//! operator reconciliation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::intent::ChainId;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Delivery status of a cross-chain message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    /// Created, send not yet accepted by the gateway
    Pending,
    /// Accepted by the gateway, awaiting destination confirmation
    Relayed,
    /// Final, irreversible effect observed on the destination chain
    Confirmed,
    /// Terminal failure; retained for reconciliation
    Failed,
}

impl MessageStatus {
    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, MessageStatus::Confirmed | MessageStatus::Failed)
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageStatus::Pending => "pending",
            MessageStatus::Relayed => "relayed",
            MessageStatus::Confirmed => "confirmed",
            MessageStatus::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// A tracked relay of one intent payload from source to destination chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossChainMessage {
    /// Unique identifier, generated at dispatch
    pub id: String,
    /// Chain the intent was submitted from
    pub source_chain: ChainId,
    /// Chain the payload is delivered to
    pub destination_chain: ChainId,
    /// Opaque serialized intent
    pub payload: String,
    /// Current delivery status
    pub status: MessageStatus,
    /// Transaction hash returned by the gateway, once accepted
    pub tx_hash: Option<String>,
    /// Unix timestamp when the message was created
    pub timestamp: u64,
    /// Send attempts that ended without gateway acceptance
    pub dispatch_attempts: u32,
    /// Confirmation polls performed while relayed
    pub confirmation_polls: u32,
}

/// Errors raised by message store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("message not found: {0}")]
    NotFound(String),
    #[error("invalid transition for message {id}: {from} -> {to}")]
    InvalidTransition {
        id: String,
        from: MessageStatus,
        to: MessageStatus,
    },
}

// ============================================================================
// STORE IMPLEMENTATION
// ============================================================================

/// In-memory store of cross-chain messages.
///
/// Uses HashMap for O(1) lookup by message id. Thread-safe via RwLock; the
/// write lock is the serialization point for all status transitions.
pub struct MessageStore {
    /// Map of message id -> message record
    messages: RwLock<HashMap<String, CrossChainMessage>>,
}

impl MessageStore {
    /// Create a new, empty message store.
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a pending message record for a payload about to be sent.
    ///
    /// # Arguments
    ///
    /// * `source_chain` - Chain the intent was submitted from
    /// * `destination_chain` - Chain the payload is delivered to
    /// * `payload` - Opaque serialized intent
    ///
    /// # Returns
    ///
    /// The created message, including its generated id
    pub async fn create(
        &self,
        source_chain: ChainId,
        destination_chain: ChainId,
        payload: String,
    ) -> CrossChainMessage {
        let message = CrossChainMessage {
            id: Uuid::new_v4().to_string(),
            source_chain,
            destination_chain,
            payload,
            status: MessageStatus::Pending,
            tx_hash: None,
            timestamp: super::current_timestamp(),
            dispatch_attempts: 0,
            confirmation_polls: 0,
        };

        let mut messages = self.messages.write().await;
        messages.insert(message.id.clone(), message.clone());
        message
    }

    /// Gets a message by id.
    pub async fn get(&self, id: &str) -> Option<CrossChainMessage> {
        let messages = self.messages.read().await;
        messages.get(id).cloned()
    }

    /// Returns all messages, in no particular order.
    pub async fn all(&self) -> Vec<CrossChainMessage> {
        let messages = self.messages.read().await;
        messages.values().cloned().collect()
    }

    /// Returns all messages currently in the given status.
    pub async fn by_status(&self, status: MessageStatus) -> Vec<CrossChainMessage> {
        let messages = self.messages.read().await;
        messages
            .values()
            .filter(|message| message.status == status)
            .cloned()
            .collect()
    }

    /// Moves a message to a new status.
    ///
    /// The state machine admits exactly these edges:
    /// `pending -> relayed`, `pending -> failed`, `relayed -> confirmed`,
    /// `relayed -> failed`. A transition to the status the message already
    /// holds succeeds without effect, so two workers racing toward the same
    /// target both observe success while the record changes once. Any other
    /// edge fails with `StoreError::InvalidTransition`.
    ///
    /// # Arguments
    ///
    /// * `id` - Message id
    /// * `to` - Target status
    /// * `tx_hash` - Transaction hash to record, if the gateway returned one
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Transition applied, or already in the target status
    /// * `Err(StoreError)` - Unknown id or disallowed edge
    pub async fn transition(
        &self,
        id: &str,
        to: MessageStatus,
        tx_hash: Option<String>,
    ) -> Result<(), StoreError> {
        let mut messages = self.messages.write().await;
        let message = messages
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if message.status == to {
            return Ok(());
        }

        let allowed = matches!(
            (message.status, to),
            (MessageStatus::Pending, MessageStatus::Relayed)
                | (MessageStatus::Pending, MessageStatus::Failed)
                | (MessageStatus::Relayed, MessageStatus::Confirmed)
                | (MessageStatus::Relayed, MessageStatus::Failed)
        );
        if !allowed {
            return Err(StoreError::InvalidTransition {
                id: id.to_string(),
                from: message.status,
                to,
            });
        }

        message.status = to;
        if let Some(hash) = tx_hash {
            message.tx_hash = Some(hash);
        }
        Ok(())
    }

    /// Cancels a message that has not yet been accepted by the gateway.
    ///
    /// Once a message is relayed an on-chain effect may already exist, so
    /// cancellation is only possible from `pending`. The record is kept as
    /// `failed` for audit.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Message cancelled
    /// * `Err(StoreError)` - Unknown id, or the message already left pending
    pub async fn cancel(&self, id: &str) -> Result<(), StoreError> {
        let mut messages = self.messages.write().await;
        let message = messages
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if message.status != MessageStatus::Pending {
            return Err(StoreError::InvalidTransition {
                id: id.to_string(),
                from: message.status,
                to: MessageStatus::Failed,
            });
        }
        message.status = MessageStatus::Failed;
        Ok(())
    }

    /// Records a send attempt that ended without gateway acceptance.
    ///
    /// # Returns
    ///
    /// * `Ok(u32)` - The updated attempt count
    /// * `Err(StoreError)` - Unknown id
    pub async fn record_dispatch_attempt(&self, id: &str) -> Result<u32, StoreError> {
        let mut messages = self.messages.write().await;
        let message = messages
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        message.dispatch_attempts += 1;
        Ok(message.dispatch_attempts)
    }

    /// Records one confirmation poll for a relayed message.
    ///
    /// # Returns
    ///
    /// * `Ok(u32)` - The updated poll count
    /// * `Err(StoreError)` - Unknown id
    pub async fn record_confirmation_poll(&self, id: &str) -> Result<u32, StoreError> {
        let mut messages = self.messages.write().await;
        let message = messages
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        message.confirmation_polls += 1;
        Ok(message.confirmation_polls)
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}
