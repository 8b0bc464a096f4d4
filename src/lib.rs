//! Cross-Chain Bet Relayer Library
//!
//! This crate relays prediction-market bet intents between chains: it
//! validates inbound intents, submits them through per-chain gateway
//! adapters, tracks every relay in a message store with a monotonic status
//! state machine, confirms or fails messages in background workers, and
//! resolves markets from oracle metric snapshots.

pub mod amount;
pub mod api;
pub mod config;
pub mod dispatcher;
pub mod gateway;
pub mod intent;
pub mod resolver;
pub mod store;
pub mod timeout;
pub mod validator;
pub mod watcher;

// Re-export commonly used types
pub use config::{
    ApiConfig, Config, EvmChainConfig, GasLimits, MarketConfig, RelayerConfig,
    ShieldedChainConfig, SvmChainConfig,
};
pub use dispatcher::{DispatchError, RelayDispatcher};
pub use gateway::{AdapterError, ConfirmationStatus, GatewayAdapter, GatewayRouter};
pub use intent::{BetAction, BetIntent, BetParams, ChainId};
pub use resolver::MarketResolver;
pub use store::markets::{
    Bet, Market, MarketError, MarketStore, ResolveError, TargetMetric, TwitterMetrics,
};
pub use store::messages::{CrossChainMessage, MessageStatus, MessageStore, StoreError};
pub use timeout::{SweepOutcome, TimeoutCoordinator};
pub use validator::{ValidationError, ValidationErrorKind};
pub use watcher::ConfirmationWatcher;
