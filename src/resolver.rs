//! Market Resolver
//!
//! Consumes oracle metric snapshots and fixes market outcomes. A market
//! resolves exactly once, at or after its deadline; later attempts fail
//! instead of re-evaluating. Once a market resolves, `claim_winnings`
//! intents against it become dispatchable.

use std::sync::Arc;
use tracing::info;

use crate::store::markets::{MarketStore, ResolveError, TwitterMetrics};

/// Decides market outcomes from oracle data.
pub struct MarketResolver {
    markets: Arc<MarketStore>,
}

impl MarketResolver {
    pub fn new(markets: Arc<MarketStore>) -> Self {
        Self { markets }
    }

    /// Resolves a market against an oracle snapshot.
    ///
    /// # Arguments
    ///
    /// * `market_id` - Market to resolve
    /// * `metrics` - Point-in-time oracle snapshot
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - The fixed outcome (metric reached the threshold)
    /// * `Err(ResolveError)` - Unknown market, before deadline, or already resolved
    pub async fn resolve(
        &self,
        market_id: &str,
        metrics: &TwitterMetrics,
    ) -> Result<bool, ResolveError> {
        let now = crate::store::current_timestamp();
        let outcome = self.markets.resolve(market_id, metrics, now).await?;
        info!("Market {} resolved: outcome={}", market_id, outcome);
        Ok(outcome)
    }
}
