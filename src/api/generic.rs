//! Generic API structures and server plumbing
//!
//! This module contains the response envelope, CORS configuration, the
//! global rejection handler, and the `ApiServer` that wires routes to the
//! relayer's components.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use warp::{
    http::{Method, StatusCode},
    Filter, Rejection, Reply,
};

use super::intents;
use crate::config::Config;
use crate::dispatcher::RelayDispatcher;
use crate::resolver::MarketResolver;
use crate::store::markets::MarketStore;
use crate::store::messages::MessageStore;

// ============================================================================
// SHARED RESPONSE STRUCTURE
// ============================================================================

/// Standardized response structure for all API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (if successful)
    pub data: Option<T>,
    /// Error message (if failed)
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

// ============================================================================
// WARP FILTER HELPERS
// ============================================================================

/// Creates a warp filter that injects shared state into request handlers.
pub(crate) fn with_state<T>(
    state: T,
) -> impl Filter<Extract = (T,), Error = std::convert::Infallible> + Clone
where
    T: Clone + Send + Sync + 'static,
{
    warp::any().map(move || state.clone())
}

// ============================================================================
// CORS CONFIGURATION
// ============================================================================

/// Creates a CORS filter based on the configured allowed origins.
fn create_cors_filter(allowed_origins: &[String]) -> warp::cors::Builder {
    let methods = vec![Method::GET, Method::POST, Method::OPTIONS];

    if allowed_origins.contains(&"*".to_string()) {
        warp::cors()
            .allow_any_origin()
            .allow_methods(methods)
            .allow_headers(vec!["content-type"])
    } else {
        let origins: Vec<&str> = allowed_origins.iter().map(|s| s.as_str()).collect();
        warp::cors()
            .allow_origins(origins)
            .allow_methods(methods)
            .allow_headers(vec!["content-type"])
    }
}

// ============================================================================
// REJECTION HANDLER
// ============================================================================

/// Global rejection handler for all API routes.
///
/// Converts warp rejections into the standardized response envelope with
/// appropriate HTTP status codes.
pub async fn handle_rejection(rej: Rejection) -> Result<impl Reply, std::convert::Infallible> {
    let (status, message) = if let Some(err) = rej.find::<warp::filters::body::BodyDeserializeError>()
    {
        (StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", err))
    } else if let Some(err) = rej.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, format!("Invalid query: {}", err))
    } else if rej.is_not_found() {
        (StatusCode::NOT_FOUND, "Endpoint not found".to_string())
    } else if rej.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed".to_string(),
        )
    } else {
        error!("Unhandled rejection: {:?}", rej);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ApiResponse::<()>::error(message)),
        status,
    ))
}

// ============================================================================
// API SERVER IMPLEMENTATION
// ============================================================================

/// REST API server for the relayer service.
///
/// Exposes intent submission, message and market status, market intake, and
/// the oracle resolution endpoint. The server renders store state; the
/// background workers own the relay lifecycle.
pub struct ApiServer {
    config: Arc<Config>,
    store: Arc<MessageStore>,
    markets: Arc<MarketStore>,
    dispatcher: Arc<RelayDispatcher>,
    resolver: Arc<MarketResolver>,
}

impl ApiServer {
    /// Creates a new API server over the relayer's shared components.
    pub fn new(
        config: Arc<Config>,
        store: Arc<MessageStore>,
        markets: Arc<MarketStore>,
        dispatcher: Arc<RelayDispatcher>,
        resolver: Arc<MarketResolver>,
    ) -> Self {
        Self {
            config,
            store,
            markets,
            dispatcher,
            resolver,
        }
    }

    /// Starts the API server and begins handling HTTP requests.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Server ran to shutdown
    /// * `Err(anyhow::Error)` - Failed to bind the configured address
    pub async fn run(&self) -> Result<()> {
        info!(
            "Starting API server on {}:{}",
            self.config.api.host, self.config.api.port
        );

        let routes = self.create_routes();

        let addr: std::net::SocketAddr =
            format!("{}:{}", self.config.api.host, self.config.api.port)
                .parse()
                .context("Failed to parse API server address")?;

        warp::serve(routes).run(addr).await;

        Ok(())
    }

    /// Creates all API routes for the server.
    pub(crate) fn create_routes(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
        let store = self.store.clone();
        let markets = self.markets.clone();
        let dispatcher = self.dispatcher.clone();
        let resolver = self.resolver.clone();
        let config = self.config.clone();

        // Health check endpoint - returns service status
        let health = warp::path("health")
            .and(warp::path::end())
            .and(warp::get())
            .map(|| {
                warp::reply::json(&ApiResponse::<String>::ok(
                    "Relayer Service is running".to_string(),
                ))
            });

        // POST /intents - validate and dispatch a bet intent
        let submit_intent = warp::path("intents")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(with_state(dispatcher))
            .and_then(intents::submit_intent_handler);

        // GET /messages - list messages, optionally filtered by ?status=
        let list_messages = warp::path("messages")
            .and(warp::path::end())
            .and(warp::get())
            .and(warp::query::<intents::MessageQuery>())
            .and(with_state(store.clone()))
            .and_then(intents::list_messages_handler);

        // GET /messages/:id - single message status
        let get_message = warp::path("messages")
            .and(warp::path::param())
            .and(warp::path::end())
            .and(warp::get())
            .and(with_state(store.clone()))
            .and_then(intents::get_message_handler);

        // POST /messages/:id/cancel - cancel a message still pending
        let cancel_message = warp::path("messages")
            .and(warp::path::param())
            .and(warp::path("cancel"))
            .and(warp::path::end())
            .and(warp::post())
            .and(with_state(store))
            .and_then(intents::cancel_message_handler);

        // POST /markets - market intake from the external creation flow
        let create_market = warp::path("markets")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(with_state(markets.clone()))
            .and(with_state(config.clone()))
            .and_then(intents::create_market_handler);

        // GET /markets - list all markets
        let list_markets = warp::path("markets")
            .and(warp::path::end())
            .and(warp::get())
            .and(with_state(markets.clone()))
            .and_then(intents::list_markets_handler);

        // GET /markets/:id - single market
        let get_market = warp::path("markets")
            .and(warp::path::param())
            .and(warp::path::end())
            .and(warp::get())
            .and(with_state(markets.clone()))
            .and_then(intents::get_market_handler);

        // GET /markets/:id/bets - bets recorded against a market
        let market_bets = warp::path("markets")
            .and(warp::path::param())
            .and(warp::path("bets"))
            .and(warp::path::end())
            .and(warp::get())
            .and(with_state(markets))
            .and_then(intents::market_bets_handler);

        // POST /markets/:id/resolve - oracle pushes a metrics snapshot
        let resolve_market = warp::path("markets")
            .and(warp::path::param())
            .and(warp::path("resolve"))
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(with_state(resolver))
            .and_then(intents::resolve_market_handler);

        health
            .or(submit_intent)
            .or(list_messages)
            .or(get_message)
            .or(cancel_message)
            .or(create_market)
            .or(list_markets)
            .or(get_market)
            .or(market_bets)
            .or(resolve_market)
            .with(create_cors_filter(&self.config.api.cors_origins))
            .recover(handle_rejection)
    }

    /// Public method for testing - exposes routes for integration tests
    #[allow(dead_code)]
    pub fn test_routes(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
        self.create_routes()
    }
}
