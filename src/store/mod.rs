//! Relay State Stores
//!
//! The message store and the market store are the only shared mutable state
//! in the relayer. Every worker coordinates through them; no component
//! mutates a record except through the operations defined here.

pub mod markets;
pub mod messages;

use chrono::Utc;

/// Current Unix timestamp in seconds.
pub(crate) fn current_timestamp() -> u64 {
    Utc::now().timestamp().max(0) as u64
}
