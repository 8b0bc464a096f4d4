//! Unit tests for the cross-chain message store
//!
//! These tests verify message creation, the monotonic status state machine,
//! idempotent same-target transitions, cancellation, and the retry/poll
//! counters.

use relayer::intent::ChainId;
use relayer::store::messages::{MessageStatus, MessageStore, StoreError};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Create a payload-shaped string; the store treats payloads as opaque
fn dummy_payload() -> String {
    "{\"action\":\"place_bet\"}".to_string()
}

async fn create_message(store: &MessageStore) -> String {
    store
        .create(ChainId::Solana, ChainId::Arbitrum, dummy_payload())
        .await
        .id
}

// ============================================================================
// CREATION TESTS
// ============================================================================

/// Test that created messages start pending with no tx hash
/// What is tested: Initial record shape after create
/// Why: Every relay starts from the same known state
#[tokio::test]
async fn test_create_starts_pending() {
    let store = MessageStore::new();
    let message = store
        .create(ChainId::Solana, ChainId::Arbitrum, dummy_payload())
        .await;

    assert_eq!(message.status, MessageStatus::Pending);
    assert!(message.tx_hash.is_none());
    assert_eq!(message.dispatch_attempts, 0);
    assert_eq!(message.confirmation_polls, 0);
    assert!(message.timestamp > 0, "Timestamp should be set");

    let stored = store.get(&message.id).await.unwrap();
    assert_eq!(stored.status, MessageStatus::Pending);
    assert_eq!(stored.payload, dummy_payload());
}

/// Test that message ids are unique across creations
/// What is tested: Id generation
/// Why: The id is the key for all status tracking
#[tokio::test]
async fn test_create_generates_unique_ids() {
    let store = MessageStore::new();
    let first = create_message(&store).await;
    let second = create_message(&store).await;
    assert_ne!(first, second, "Each message must get its own id");
}

/// Test that getting a non-existent message returns None
/// What is tested: Lookup of unknown ids
/// Why: Callers must be able to distinguish missing from failed
#[tokio::test]
async fn test_get_nonexistent_message() {
    let store = MessageStore::new();
    assert!(store.get("no-such-id").await.is_none());
}

// ============================================================================
// STATE MACHINE TESTS
// ============================================================================

/// Test the full happy path: pending -> relayed -> confirmed
/// What is tested: The only path a successful relay takes
/// Why: Status transitions observed over time must form this path
#[tokio::test]
async fn test_happy_path_transitions() {
    let store = MessageStore::new();
    let id = create_message(&store).await;

    store
        .transition(&id, MessageStatus::Relayed, Some("0xabc".to_string()))
        .await
        .unwrap();
    let message = store.get(&id).await.unwrap();
    assert_eq!(message.status, MessageStatus::Relayed);
    assert_eq!(message.tx_hash.as_deref(), Some("0xabc"));

    store
        .transition(&id, MessageStatus::Confirmed, None)
        .await
        .unwrap();
    let message = store.get(&id).await.unwrap();
    assert_eq!(message.status, MessageStatus::Confirmed);
    assert_eq!(
        message.tx_hash.as_deref(),
        Some("0xabc"),
        "Hash recorded at relay time must survive later transitions"
    );
}

/// Test that pending can fail directly
/// What is tested: pending -> failed edge
/// Why: Rejected sends and exhausted retries fail without ever relaying
#[tokio::test]
async fn test_pending_to_failed() {
    let store = MessageStore::new();
    let id = create_message(&store).await;

    store.transition(&id, MessageStatus::Failed, None).await.unwrap();
    assert_eq!(store.get(&id).await.unwrap().status, MessageStatus::Failed);
}

/// Test that pending cannot jump straight to confirmed
/// What is tested: Disallowed edge pending -> confirmed
/// Why: A message can only confirm after the gateway accepted it
#[tokio::test]
async fn test_pending_to_confirmed_rejected() {
    let store = MessageStore::new();
    let id = create_message(&store).await;

    let result = store.transition(&id, MessageStatus::Confirmed, None).await;
    assert_eq!(
        result,
        Err(StoreError::InvalidTransition {
            id: id.clone(),
            from: MessageStatus::Pending,
            to: MessageStatus::Confirmed,
        })
    );
    assert_eq!(store.get(&id).await.unwrap().status, MessageStatus::Pending);
}

/// Test that terminal states admit no further transitions
/// What is tested: confirmed and failed are terminal
/// Why: A settled or failed relay must never change again
#[tokio::test]
async fn test_terminal_states_are_final() {
    let store = MessageStore::new();

    let confirmed = create_message(&store).await;
    store
        .transition(&confirmed, MessageStatus::Relayed, Some("0x1".to_string()))
        .await
        .unwrap();
    store
        .transition(&confirmed, MessageStatus::Confirmed, None)
        .await
        .unwrap();
    let result = store.transition(&confirmed, MessageStatus::Failed, None).await;
    assert!(matches!(result, Err(StoreError::InvalidTransition { .. })));

    let failed = create_message(&store).await;
    store.transition(&failed, MessageStatus::Failed, None).await.unwrap();
    let result = store.transition(&failed, MessageStatus::Relayed, None).await;
    assert!(matches!(result, Err(StoreError::InvalidTransition { .. })));
    let result = store.transition(&failed, MessageStatus::Confirmed, None).await;
    assert!(matches!(result, Err(StoreError::InvalidTransition { .. })));
}

/// Test that a transition on an unknown id fails with NotFound
/// What is tested: Error handling for missing messages
/// Why: Workers may race record creation; the failure must be explicit
#[tokio::test]
async fn test_transition_unknown_id() {
    let store = MessageStore::new();
    let result = store
        .transition("no-such-id", MessageStatus::Relayed, None)
        .await;
    assert_eq!(result, Err(StoreError::NotFound("no-such-id".to_string())));
}

// ============================================================================
// IDEMPOTENCY TESTS
// ============================================================================

/// Test that a repeated transition to the same target succeeds as a no-op
/// What is tested: Same-target idempotency
/// Why: The watcher and the sweep may race toward the same status
#[tokio::test]
async fn test_same_target_transition_is_idempotent() {
    let store = MessageStore::new();
    let id = create_message(&store).await;

    store
        .transition(&id, MessageStatus::Relayed, Some("0xaaa".to_string()))
        .await
        .unwrap();
    store
        .transition(&id, MessageStatus::Relayed, Some("0xbbb".to_string()))
        .await
        .unwrap();

    let message = store.get(&id).await.unwrap();
    assert_eq!(message.status, MessageStatus::Relayed);
    assert_eq!(
        message.tx_hash.as_deref(),
        Some("0xaaa"),
        "The losing call must not overwrite the stored hash"
    );
}

/// Test that concurrent duplicate transitions both succeed with one effect
/// What is tested: Racing same-target transitions on one id
/// Why: Correctness relies on the store, not on worker mutual exclusion
#[tokio::test]
async fn test_concurrent_duplicate_transitions() {
    let store = std::sync::Arc::new(MessageStore::new());
    let id = create_message(&store).await;

    let first = {
        let store = store.clone();
        let id = id.clone();
        tokio::spawn(async move {
            store
                .transition(&id, MessageStatus::Relayed, Some("0x1".to_string()))
                .await
        })
    };
    let second = {
        let store = store.clone();
        let id = id.clone();
        tokio::spawn(async move {
            store
                .transition(&id, MessageStatus::Relayed, Some("0x2".to_string()))
                .await
        })
    };

    assert!(first.await.unwrap().is_ok());
    assert!(second.await.unwrap().is_ok());

    let message = store.get(&id).await.unwrap();
    assert_eq!(message.status, MessageStatus::Relayed);
    let hash = message.tx_hash.unwrap();
    assert!(hash == "0x1" || hash == "0x2", "Exactly one hash must win");
}

/// Test that racing transitions to different targets settle deterministically
/// What is tested: First transition wins, the conflicting one fails
/// Why: relayed vs failed on the same id must not corrupt the record
#[tokio::test]
async fn test_conflicting_transitions_favor_first() {
    let store = MessageStore::new();
    let id = create_message(&store).await;

    store
        .transition(&id, MessageStatus::Relayed, Some("0x1".to_string()))
        .await
        .unwrap();
    store.transition(&id, MessageStatus::Failed, None).await.unwrap();

    // Failed won; a late confirm must now lose
    let result = store.transition(&id, MessageStatus::Confirmed, None).await;
    assert!(matches!(result, Err(StoreError::InvalidTransition { .. })));
    assert_eq!(store.get(&id).await.unwrap().status, MessageStatus::Failed);
}

// ============================================================================
// CANCELLATION TESTS
// ============================================================================

/// Test that a pending message can be cancelled and is kept for audit
/// What is tested: cancel on a pending message
/// Why: Cancellation is only possible before the gateway accepts the send
#[tokio::test]
async fn test_cancel_pending_message() {
    let store = MessageStore::new();
    let id = create_message(&store).await;

    store.cancel(&id).await.unwrap();
    let message = store.get(&id).await.unwrap();
    assert_eq!(message.status, MessageStatus::Failed);
}

/// Test that a relayed message cannot be cancelled
/// What is tested: cancel after gateway acceptance
/// Why: An on-chain effect may already exist once relayed
#[tokio::test]
async fn test_cancel_relayed_message_fails() {
    let store = MessageStore::new();
    let id = create_message(&store).await;
    store
        .transition(&id, MessageStatus::Relayed, Some("0x1".to_string()))
        .await
        .unwrap();

    let result = store.cancel(&id).await;
    assert!(matches!(result, Err(StoreError::InvalidTransition { .. })));
    assert_eq!(store.get(&id).await.unwrap().status, MessageStatus::Relayed);
}

// ============================================================================
// BOOKKEEPING TESTS
// ============================================================================

/// Test that attempt and poll counters accumulate
/// What is tested: record_dispatch_attempt and record_confirmation_poll
/// Why: The sweep bounds retries and escalation on these counters
#[tokio::test]
async fn test_counters_accumulate() {
    let store = MessageStore::new();
    let id = create_message(&store).await;

    assert_eq!(store.record_dispatch_attempt(&id).await.unwrap(), 1);
    assert_eq!(store.record_dispatch_attempt(&id).await.unwrap(), 2);
    assert_eq!(store.record_confirmation_poll(&id).await.unwrap(), 1);

    let message = store.get(&id).await.unwrap();
    assert_eq!(message.dispatch_attempts, 2);
    assert_eq!(message.confirmation_polls, 1);
}

/// Test that failed messages remain queryable
/// What is tested: Messages are never deleted
/// Why: Terminal failures stay visible for operator reconciliation
#[tokio::test]
async fn test_failed_messages_retained() {
    let store = MessageStore::new();
    let id = create_message(&store).await;
    store.transition(&id, MessageStatus::Failed, None).await.unwrap();

    assert!(store.get(&id).await.is_some());
    assert_eq!(store.by_status(MessageStatus::Failed).await.len(), 1);
    assert_eq!(store.all().await.len(), 1);
}

/// Test that by_status filters correctly
/// What is tested: Status-filtered listing
/// Why: The watcher and the sweep select their work through this query
#[tokio::test]
async fn test_by_status_filters() {
    let store = MessageStore::new();
    let pending = create_message(&store).await;
    let relayed = create_message(&store).await;
    store
        .transition(&relayed, MessageStatus::Relayed, Some("0x1".to_string()))
        .await
        .unwrap();

    let pending_list = store.by_status(MessageStatus::Pending).await;
    assert_eq!(pending_list.len(), 1);
    assert_eq!(pending_list[0].id, pending);

    let relayed_list = store.by_status(MessageStatus::Relayed).await;
    assert_eq!(relayed_list.len(), 1);
    assert_eq!(relayed_list[0].id, relayed);
}
