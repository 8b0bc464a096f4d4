//! Intent, message, market, and oracle handlers
//!
//! Handlers translate between HTTP and the relayer's components. Domain
//! errors map onto status codes here; the stores and the dispatcher decide
//! what is allowed.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use warp::{http::StatusCode, Rejection, Reply};

use super::generic::ApiResponse;
use crate::config::Config;
use crate::dispatcher::{DispatchError, RelayDispatcher};
use crate::intent::BetIntent;
use crate::resolver::MarketResolver;
use crate::store::markets::{Bet, Market, MarketError, MarketStore, ResolveError, TargetMetric, TwitterMetrics};
use crate::store::messages::{CrossChainMessage, MessageStatus, MessageStore};

// ============================================================================
// REQUEST/RESPONSE STRUCTURES
// ============================================================================

/// Query parameters for message listing.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    /// Optional status filter (pending, relayed, confirmed, failed)
    pub status: Option<String>,
}

/// Body for market intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMarketRequest {
    pub id: String,
    pub creator: String,
    pub twitter_url: String,
    pub target_metric: TargetMetric,
    pub threshold: u64,
    pub deadline: u64,
}

/// Response for a dispatched intent.
#[derive(Debug, Serialize, Deserialize)]
pub struct DispatchReceipt {
    pub message_id: String,
}

/// Response for a market resolution.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveReceipt {
    pub market_id: String,
    pub outcome: bool,
}

fn parse_status(raw: &str) -> Option<MessageStatus> {
    match raw {
        "pending" => Some(MessageStatus::Pending),
        "relayed" => Some(MessageStatus::Relayed),
        "confirmed" => Some(MessageStatus::Confirmed),
        "failed" => Some(MessageStatus::Failed),
        _ => None,
    }
}

// ============================================================================
// INTENT AND MESSAGE HANDLERS
// ============================================================================

/// Handler for POST /intents.
///
/// Validates and dispatches a bet intent, returning the id of the message
/// that now tracks it.
pub async fn submit_intent_handler(
    intent: BetIntent,
    dispatcher: Arc<RelayDispatcher>,
) -> Result<impl Reply, Rejection> {
    debug!(
        "POST /intents - {} {} -> {}",
        intent.action, intent.source_chain, intent.destination_chain
    );
    match dispatcher.dispatch(&intent).await {
        Ok(message_id) => Ok(warp::reply::with_status(
            warp::reply::json(&ApiResponse::ok(DispatchReceipt { message_id })),
            StatusCode::OK,
        )),
        Err(err) => {
            let status = match &err {
                DispatchError::Validation(_) | DispatchError::NoGateway(_) => {
                    StatusCode::BAD_REQUEST
                }
                DispatchError::SendRejected(_) => StatusCode::BAD_GATEWAY,
                DispatchError::Store(_) | DispatchError::Serialize(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            Ok(warp::reply::with_status(
                warp::reply::json(&ApiResponse::<DispatchReceipt>::error(err.to_string())),
                status,
            ))
        }
    }
}

/// Handler for GET /messages.
pub async fn list_messages_handler(
    query: MessageQuery,
    store: Arc<MessageStore>,
) -> Result<impl Reply, Rejection> {
    let messages = match query.status.as_deref() {
        None => store.all().await,
        Some(raw) => match parse_status(raw) {
            Some(status) => store.by_status(status).await,
            None => {
                return Ok(warp::reply::with_status(
                    warp::reply::json(&ApiResponse::<Vec<CrossChainMessage>>::error(format!(
                        "unknown status: {}",
                        raw
                    ))),
                    StatusCode::BAD_REQUEST,
                ))
            }
        },
    };
    Ok(warp::reply::with_status(
        warp::reply::json(&ApiResponse::ok(messages)),
        StatusCode::OK,
    ))
}

/// Handler for GET /messages/:id.
pub async fn get_message_handler(
    id: String,
    store: Arc<MessageStore>,
) -> Result<impl Reply, Rejection> {
    match store.get(&id).await {
        Some(message) => Ok(warp::reply::with_status(
            warp::reply::json(&ApiResponse::ok(message)),
            StatusCode::OK,
        )),
        None => Ok(warp::reply::with_status(
            warp::reply::json(&ApiResponse::<CrossChainMessage>::error(format!(
                "message not found: {}",
                id
            ))),
            StatusCode::NOT_FOUND,
        )),
    }
}

/// Handler for POST /messages/:id/cancel.
///
/// Cancellation only succeeds while the message is still pending; once the
/// gateway accepted the send, an on-chain effect may already exist.
pub async fn cancel_message_handler(
    id: String,
    store: Arc<MessageStore>,
) -> Result<impl Reply, Rejection> {
    match store.cancel(&id).await {
        Ok(()) => {
            let message = store.get(&id).await;
            Ok(warp::reply::with_status(
                warp::reply::json(&ApiResponse::ok(message)),
                StatusCode::OK,
            ))
        }
        Err(err) => {
            let status = match &err {
                crate::store::messages::StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                crate::store::messages::StoreError::InvalidTransition { .. } => {
                    StatusCode::CONFLICT
                }
            };
            Ok(warp::reply::with_status(
                warp::reply::json(&ApiResponse::<Option<CrossChainMessage>>::error(
                    err.to_string(),
                )),
                status,
            ))
        }
    }
}

// ============================================================================
// MARKET HANDLERS
// ============================================================================

/// Handler for POST /markets.
pub async fn create_market_handler(
    request: CreateMarketRequest,
    markets: Arc<MarketStore>,
    config: Arc<Config>,
) -> Result<impl Reply, Rejection> {
    let market = Market {
        id: request.id,
        creator: request.creator,
        twitter_url: request.twitter_url,
        target_metric: request.target_metric,
        threshold: request.threshold,
        deadline: request.deadline,
        total_volume: 0,
        resolved: false,
        outcome: false,
    };
    match markets
        .create_market(market.clone(), config.market.min_duration_secs)
        .await
    {
        Ok(()) => Ok(warp::reply::with_status(
            warp::reply::json(&ApiResponse::ok(market)),
            StatusCode::OK,
        )),
        Err(err) => {
            let status = match &err {
                MarketError::DuplicateId(_) => StatusCode::CONFLICT,
                _ => StatusCode::BAD_REQUEST,
            };
            Ok(warp::reply::with_status(
                warp::reply::json(&ApiResponse::<Market>::error(err.to_string())),
                status,
            ))
        }
    }
}

/// Handler for GET /markets.
pub async fn list_markets_handler(markets: Arc<MarketStore>) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&ApiResponse::ok(markets.list().await)))
}

/// Handler for GET /markets/:id.
pub async fn get_market_handler(
    id: String,
    markets: Arc<MarketStore>,
) -> Result<impl Reply, Rejection> {
    match markets.get(&id).await {
        Some(market) => Ok(warp::reply::with_status(
            warp::reply::json(&ApiResponse::ok(market)),
            StatusCode::OK,
        )),
        None => Ok(warp::reply::with_status(
            warp::reply::json(&ApiResponse::<Market>::error(format!(
                "market not found: {}",
                id
            ))),
            StatusCode::NOT_FOUND,
        )),
    }
}

/// Handler for GET /markets/:id/bets.
pub async fn market_bets_handler(
    id: String,
    markets: Arc<MarketStore>,
) -> Result<impl Reply, Rejection> {
    if markets.get(&id).await.is_none() {
        return Ok(warp::reply::with_status(
            warp::reply::json(&ApiResponse::<Vec<Bet>>::error(format!(
                "market not found: {}",
                id
            ))),
            StatusCode::NOT_FOUND,
        ));
    }
    Ok(warp::reply::with_status(
        warp::reply::json(&ApiResponse::ok(markets.bets_for(&id).await)),
        StatusCode::OK,
    ))
}

/// Handler for POST /markets/:id/resolve.
///
/// The oracle feed pushes a metrics snapshot; the resolver decides whether
/// the market can be resolved with it.
pub async fn resolve_market_handler(
    id: String,
    metrics: TwitterMetrics,
    resolver: Arc<MarketResolver>,
) -> Result<impl Reply, Rejection> {
    match resolver.resolve(&id, &metrics).await {
        Ok(outcome) => Ok(warp::reply::with_status(
            warp::reply::json(&ApiResponse::ok(ResolveReceipt {
                market_id: id,
                outcome,
            })),
            StatusCode::OK,
        )),
        Err(err) => {
            let status = match &err {
                ResolveError::MarketNotFound => StatusCode::NOT_FOUND,
                ResolveError::TooEarly | ResolveError::AlreadyResolved => StatusCode::CONFLICT,
            };
            Ok(warp::reply::with_status(
                warp::reply::json(&ApiResponse::<ResolveReceipt>::error(err.to_string())),
                status,
            ))
        }
    }
}
