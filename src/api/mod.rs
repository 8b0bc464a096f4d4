//! REST API Server Module
//!
//! This module provides the REST API server for the relayer service: intent
//! submission, message status rendering for the UI, market intake, and the
//! oracle's resolution push. The API never decides relay success or failure
//! itself; it only drives and renders the message and market stores.

// Shared plumbing (response envelope, CORS, rejection handling, server)
mod generic;

// Intent, message, market, and oracle handlers
mod intents;

// Re-export ApiServer for convenience
pub use generic::ApiServer;
// Re-export ApiResponse for testing
#[allow(unused_imports)]
pub use generic::ApiResponse;
// Re-export request bodies for clients and tests
pub use intents::CreateMarketRequest;
