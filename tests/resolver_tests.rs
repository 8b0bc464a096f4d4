//! Unit tests for the market resolver
//!
//! These tests verify resolver behavior against the real clock: deadlines in
//! the past resolve, deadlines in the future are too early, and a fixed
//! outcome never changes.

use relayer::resolver::MarketResolver;
use relayer::store::markets::{Market, MarketStore, ResolveError, TargetMetric};
use std::sync::Arc;

#[path = "mod.rs"]
mod test_helpers;
use test_helpers::{
    create_default_market, create_default_metrics, DUMMY_MARKET_ID, PAST_DEADLINE,
};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

async fn resolver_with_market(market: Market) -> (MarketResolver, Arc<MarketStore>) {
    let markets = Arc::new(MarketStore::new());
    markets.insert_market(market).await;
    (MarketResolver::new(markets.clone()), markets)
}

// ============================================================================
// RESOLUTION TESTS
// ============================================================================

/// Test that a past-deadline market resolves with the metric at threshold
/// What is tested: resolve through the component against the real clock
/// Why: The resolver supplies the clock; the store only checks it
#[tokio::test]
async fn test_resolve_past_deadline() {
    let (resolver, markets) = resolver_with_market(Market {
        deadline: PAST_DEADLINE,
        ..create_default_market()
    })
    .await;

    let outcome = resolver
        .resolve(DUMMY_MARKET_ID, &create_default_metrics())
        .await
        .unwrap();
    assert!(outcome);
    assert!(markets.get(DUMMY_MARKET_ID).await.unwrap().resolved);
}

/// Test that a future-deadline market is too early to resolve
/// What is tested: TooEarly from the component
/// Why: Resolution before the deadline would race the betting window
#[tokio::test]
async fn test_resolve_future_deadline_too_early() {
    let (resolver, _markets) = resolver_with_market(create_default_market()).await;

    let result = resolver
        .resolve(DUMMY_MARKET_ID, &create_default_metrics())
        .await;
    assert_eq!(result, Err(ResolveError::TooEarly));
}

/// Test that the second resolution attempt is rejected
/// What is tested: AlreadyResolved through the component
/// Why: Calling resolve again must be a no-op failure, not a re-evaluation
#[tokio::test]
async fn test_resolve_twice_rejected() {
    let (resolver, markets) = resolver_with_market(Market {
        deadline: PAST_DEADLINE,
        ..create_default_market()
    })
    .await;

    let outcome = resolver
        .resolve(DUMMY_MARKET_ID, &create_default_metrics())
        .await
        .unwrap();
    assert!(outcome);

    let mut drifted = create_default_metrics();
    drifted.likes = 0;
    let result = resolver.resolve(DUMMY_MARKET_ID, &drifted).await;
    assert_eq!(result, Err(ResolveError::AlreadyResolved));
    assert!(markets.get(DUMMY_MARKET_ID).await.unwrap().outcome);
}

/// Test that each target metric is read from the right snapshot field
/// What is tested: Metric selection for retweets and views
/// Why: Markets can track any of the four tweet statistics
#[tokio::test]
async fn test_resolve_selects_target_metric() {
    let (resolver, _markets) = resolver_with_market(Market {
        deadline: PAST_DEADLINE,
        target_metric: TargetMetric::Retweets,
        threshold: 500,
        ..create_default_market()
    })
    .await;

    // Snapshot has retweets=200, below the 500 threshold
    let outcome = resolver
        .resolve(DUMMY_MARKET_ID, &create_default_metrics())
        .await
        .unwrap();
    assert!(!outcome);

    let (resolver, _markets) = resolver_with_market(Market {
        deadline: PAST_DEADLINE,
        target_metric: TargetMetric::Views,
        threshold: 50_000,
        ..create_default_market()
    })
    .await;

    // Snapshot has views=90000, above the 50000 threshold
    let outcome = resolver
        .resolve(DUMMY_MARKET_ID, &create_default_metrics())
        .await
        .unwrap();
    assert!(outcome);
}

/// Test that resolving an unknown market surfaces MarketNotFound
/// What is tested: Unknown id through the component
/// Why: Oracle pushes for unregistered markets must fail loudly
#[tokio::test]
async fn test_resolve_unknown_market() {
    let (resolver, _markets) = resolver_with_market(create_default_market()).await;
    let result = resolver
        .resolve("no-such-market", &create_default_metrics())
        .await;
    assert_eq!(result, Err(ResolveError::MarketNotFound));
}
