//! Market and Bet Store
//!
//! Holds prediction markets and the bets recorded against them. Markets
//! enter through the intake operation, are mutated exactly once by
//! resolution, and never change afterwards. Bets are created when a
//! `place_bet` relay confirms and claimed at most once after resolution.
//!
//! Resolution and claiming are check-and-set operations under the write
//! lock. Settlement effects are keyed by the message id that triggered them,
//! so a racing worker replaying the same confirmation applies nothing twice.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::intent::ChainId;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Tweet statistic a market tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetMetric {
    Likes,
    Retweets,
    Replies,
    Views,
}

/// Point-in-time oracle snapshot of a tweet's statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterMetrics {
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    pub views: u64,
    /// Unix timestamp the snapshot was taken
    pub timestamp: u64,
}

impl TwitterMetrics {
    /// Value of the metric a market is tracking.
    pub fn value_of(&self, metric: TargetMetric) -> u64 {
        match metric {
            TargetMetric::Likes => self.likes,
            TargetMetric::Retweets => self.retweets,
            TargetMetric::Replies => self.replies,
            TargetMetric::Views => self.views,
        }
    }
}

/// A prediction market over a tweet metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    /// Unique market identifier
    pub id: String,
    /// Address of the market creator
    pub creator: String,
    /// Tweet the market is about
    pub twitter_url: String,
    /// Which statistic decides the outcome
    pub target_metric: TargetMetric,
    /// Metric value the market bets on reaching
    pub threshold: u64,
    /// Unix timestamp after which betting closes and resolution is allowed
    pub deadline: u64,
    /// Total staked volume, in 18-decimal fixed-point units
    pub total_volume: u128,
    /// Whether the outcome has been fixed
    pub resolved: bool,
    /// The fixed outcome; meaningful only once `resolved` is true
    pub outcome: bool,
}

/// A settled stake on a market outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bet {
    /// Address of the bettor
    pub user: String,
    /// Market the bet is on
    pub market_id: String,
    /// Predicted outcome
    pub prediction: bool,
    /// Stake as originally submitted (decimal string)
    pub amount: String,
    /// Stake in 18-decimal fixed-point units
    pub amount_units: u128,
    /// Unix timestamp the bet was recorded
    pub timestamp: u64,
    /// Chain the bet was submitted from
    pub source_chain: ChainId,
    /// Whether winnings were claimed
    pub claimed: bool,
}

/// Errors raised when fixing a market outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Market not found")]
    MarketNotFound,
    #[error("Betting period has not ended")]
    TooEarly,
    #[error("Market already resolved")]
    AlreadyResolved,
}

/// Errors raised by market intake, bet recording, and claims.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    #[error("Market not found")]
    NotFound,
    #[error("market {0} already exists")]
    DuplicateId(String),
    #[error("deadline must be at least {0} seconds in the future")]
    DurationTooShort(u64),
    #[error("Market not resolved")]
    NotResolved,
    #[error("no winning unclaimed bets for user {0}")]
    NoWinningBets(String),
}

/// A market together with its bets and settlement bookkeeping.
#[derive(Debug, Clone)]
struct MarketRecord {
    market: Market,
    bets: Vec<Bet>,
    /// Message ids whose settlement effect was already applied
    settled_messages: HashSet<String>,
}

// ============================================================================
// STORE IMPLEMENTATION
// ============================================================================

/// In-memory store of markets and bets. Thread-safe via RwLock.
pub struct MarketStore {
    /// Map of market id -> market record
    markets: RwLock<HashMap<String, MarketRecord>>,
}

impl MarketStore {
    /// Create a new, empty market store.
    pub fn new() -> Self {
        Self {
            markets: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a market arriving from the external creation flow.
    ///
    /// # Arguments
    ///
    /// * `market` - The market to register
    /// * `min_duration_secs` - Minimum seconds between now and the deadline
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Market registered
    /// * `Err(MarketError)` - Duplicate id or deadline too close
    pub async fn create_market(
        &self,
        market: Market,
        min_duration_secs: u64,
    ) -> Result<(), MarketError> {
        let now = super::current_timestamp();
        if market.deadline < now.saturating_add(min_duration_secs) {
            return Err(MarketError::DurationTooShort(min_duration_secs));
        }

        let mut markets = self.markets.write().await;
        if markets.contains_key(&market.id) {
            return Err(MarketError::DuplicateId(market.id));
        }
        markets.insert(
            market.id.clone(),
            MarketRecord {
                market,
                bets: Vec::new(),
                settled_messages: HashSet::new(),
            },
        );
        Ok(())
    }

    /// Inserts a market without intake checks.
    ///
    /// **WARNING**: This method is public ONLY so tests can seed markets with
    /// arbitrary deadlines. Production intake goes through `create_market`.
    #[doc(hidden)]
    pub async fn insert_market(&self, market: Market) {
        let mut markets = self.markets.write().await;
        markets.insert(
            market.id.clone(),
            MarketRecord {
                market,
                bets: Vec::new(),
                settled_messages: HashSet::new(),
            },
        );
    }

    /// Gets a market by id.
    pub async fn get(&self, market_id: &str) -> Option<Market> {
        let markets = self.markets.read().await;
        markets.get(market_id).map(|record| record.market.clone())
    }

    /// Returns all markets, in no particular order.
    pub async fn list(&self) -> Vec<Market> {
        let markets = self.markets.read().await;
        markets.values().map(|record| record.market.clone()).collect()
    }

    /// Returns all bets recorded against a market.
    pub async fn bets_for(&self, market_id: &str) -> Vec<Bet> {
        let markets = self.markets.read().await;
        markets
            .get(market_id)
            .map(|record| record.bets.clone())
            .unwrap_or_default()
    }

    /// Records a bet produced by a confirmed `place_bet` relay.
    ///
    /// The effect is keyed by message id: recording the same message twice
    /// leaves one bet and an unchanged volume.
    ///
    /// # Arguments
    ///
    /// * `message_id` - Id of the confirmed cross-chain message
    /// * `bet` - The bet to record
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Bet recorded, or already recorded for this message
    /// * `Err(MarketError)` - Market not found
    pub async fn record_bet(&self, message_id: &str, bet: Bet) -> Result<(), MarketError> {
        let mut markets = self.markets.write().await;
        let record = markets
            .get_mut(&bet.market_id)
            .ok_or(MarketError::NotFound)?;

        if record.settled_messages.contains(message_id) {
            return Ok(());
        }

        record.market.total_volume = record
            .market
            .total_volume
            .saturating_add(bet.amount_units);
        record.bets.push(bet);
        record.settled_messages.insert(message_id.to_string());
        Ok(())
    }

    /// Marks a user's winning bets claimed after a confirmed `claim_winnings`
    /// relay.
    ///
    /// Requires a resolved market and at least one unclaimed bet whose
    /// prediction matches the outcome. Keyed by message id like
    /// `record_bet`, so a replayed confirmation claims nothing twice.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of bets marked claimed (0 on replay)
    /// * `Err(MarketError)` - Market missing, unresolved, or nothing to claim
    pub async fn claim_winnings(
        &self,
        message_id: &str,
        market_id: &str,
        user: &str,
    ) -> Result<usize, MarketError> {
        let mut markets = self.markets.write().await;
        let record = markets.get_mut(market_id).ok_or(MarketError::NotFound)?;

        if record.settled_messages.contains(message_id) {
            return Ok(0);
        }
        if !record.market.resolved {
            return Err(MarketError::NotResolved);
        }

        let outcome = record.market.outcome;
        let mut claimed = 0;
        for bet in record
            .bets
            .iter_mut()
            .filter(|bet| bet.user == user && bet.prediction == outcome && !bet.claimed)
        {
            bet.claimed = true;
            claimed += 1;
        }
        if claimed == 0 {
            return Err(MarketError::NoWinningBets(user.to_string()));
        }

        record.settled_messages.insert(message_id.to_string());
        Ok(claimed)
    }

    /// Fixes a market's outcome from an oracle snapshot.
    ///
    /// The outcome is `metric value >= threshold`, evaluated only at or after
    /// the deadline and only while the market is unresolved. Later calls fail
    /// with `AlreadyResolved` instead of re-evaluating, so oracle data
    /// drifting after the fact cannot change a fixed outcome.
    ///
    /// # Arguments
    ///
    /// * `market_id` - Market to resolve
    /// * `metrics` - Oracle snapshot
    /// * `now` - Current Unix timestamp
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - The fixed outcome
    /// * `Err(ResolveError)` - Unknown market, before deadline, or already resolved
    pub async fn resolve(
        &self,
        market_id: &str,
        metrics: &TwitterMetrics,
        now: u64,
    ) -> Result<bool, ResolveError> {
        let mut markets = self.markets.write().await;
        let record = markets
            .get_mut(market_id)
            .ok_or(ResolveError::MarketNotFound)?;

        if record.market.resolved {
            return Err(ResolveError::AlreadyResolved);
        }
        if now < record.market.deadline {
            return Err(ResolveError::TooEarly);
        }

        let outcome = metrics.value_of(record.market.target_metric) >= record.market.threshold;
        record.market.resolved = true;
        record.market.outcome = outcome;
        Ok(outcome)
    }
}

impl Default for MarketStore {
    fn default() -> Self {
        Self::new()
    }
}
