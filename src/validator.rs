//! Intent Validation
//!
//! Structural and business validation of a `BetIntent` before any relay side
//! effect. Checks run in a fixed order and stop at the first violation; a
//! failed validation leaves no trace in any store.

use std::fmt;
use thiserror::Error;

use crate::amount;
use crate::config::Config;
use crate::intent::{BetAction, BetIntent};
use crate::store::markets::MarketStore;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Which rule an intent violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    EmptyMarketId,
    UnsupportedChain,
    SameChain,
    InvalidAmount,
    BelowMinimumBet,
    MarketNotFound,
    MarketResolved,
    BettingClosed,
    MarketNotResolved,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ValidationErrorKind::EmptyMarketId => "market id is empty",
            ValidationErrorKind::UnsupportedChain => "chain is not supported",
            ValidationErrorKind::SameChain => "source and destination chain must differ",
            ValidationErrorKind::InvalidAmount => "amount is not a positive decimal",
            ValidationErrorKind::BelowMinimumBet => "amount is below the chain minimum bet",
            ValidationErrorKind::MarketNotFound => "Market not found",
            ValidationErrorKind::MarketResolved => "Market already resolved",
            ValidationErrorKind::BettingClosed => "Betting period has ended",
            ValidationErrorKind::MarketNotResolved => "market is not resolved yet",
        };
        write!(f, "{}", message)
    }
}

/// First rule an intent violated, and the field that tripped it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} (field: {field})")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub field: &'static str,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, field: &'static str) -> Self {
        Self { kind, field }
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Validates a bet intent against configuration and market state.
///
/// Rules, in order:
/// 1. `market_id` is non-empty
/// 2. Source and destination chains are configured
/// 3. Source and destination chains differ
/// 4. `amount` parses as a positive decimal under the destination chain's
///    decimal count, without precision loss
/// 5. For `place_bet`, the amount meets the destination chain's minimum bet
/// 6. The market exists
/// 7. For `place_bet`, the market is unresolved and before its deadline;
///    for `claim_winnings`, the market is resolved
///
/// # Arguments
///
/// * `intent` - The intent to validate
/// * `markets` - Market store the intent references
/// * `config` - Service configuration (supported chains, amount limits)
///
/// # Returns
///
/// * `Ok(())` - All rules passed
/// * `Err(ValidationError)` - The first violated rule
pub async fn validate(
    intent: &BetIntent,
    markets: &MarketStore,
    config: &Config,
) -> Result<(), ValidationError> {
    if intent.params.market_id.trim().is_empty() {
        return Err(ValidationError::new(
            ValidationErrorKind::EmptyMarketId,
            "market_id",
        ));
    }
    if !config.is_supported(intent.source_chain) {
        return Err(ValidationError::new(
            ValidationErrorKind::UnsupportedChain,
            "source_chain",
        ));
    }
    if !config.is_supported(intent.destination_chain) {
        return Err(ValidationError::new(
            ValidationErrorKind::UnsupportedChain,
            "destination_chain",
        ));
    }
    if intent.source_chain == intent.destination_chain {
        return Err(ValidationError::new(
            ValidationErrorKind::SameChain,
            "destination_chain",
        ));
    }

    let limits = config
        .chain_limits(intent.destination_chain)
        .ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::UnsupportedChain, "destination_chain")
        })?;
    let units = amount::parse_decimal(&intent.params.amount, limits.decimals)
        .map_err(|_| ValidationError::new(ValidationErrorKind::InvalidAmount, "amount"))?;

    if intent.action == BetAction::PlaceBet {
        let min_units = amount::parse_decimal(limits.min_bet_amount, limits.decimals)
            .map_err(|_| ValidationError::new(ValidationErrorKind::InvalidAmount, "amount"))?;
        if units < min_units {
            return Err(ValidationError::new(
                ValidationErrorKind::BelowMinimumBet,
                "amount",
            ));
        }
    }

    let market = markets
        .get(&intent.params.market_id)
        .await
        .ok_or_else(|| ValidationError::new(ValidationErrorKind::MarketNotFound, "market_id"))?;

    match intent.action {
        BetAction::PlaceBet => {
            if market.resolved {
                return Err(ValidationError::new(
                    ValidationErrorKind::MarketResolved,
                    "market_id",
                ));
            }
            if crate::store::current_timestamp() >= market.deadline {
                return Err(ValidationError::new(
                    ValidationErrorKind::BettingClosed,
                    "market_id",
                ));
            }
        }
        BetAction::ClaimWinnings => {
            if !market.resolved {
                return Err(ValidationError::new(
                    ValidationErrorKind::MarketNotResolved,
                    "market_id",
                ));
            }
        }
    }

    Ok(())
}
