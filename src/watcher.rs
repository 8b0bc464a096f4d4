//! Confirmation Watcher
//!
//! Background worker that polls destination chains for the fate of relayed
//! messages and applies the settlement effect when one confirms. The store's
//! transition rules are the only synchronization with the timeout
//! coordinator; the watcher holds no authoritative state of its own.

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::amount;
use crate::config::Config;
use crate::gateway::{ConfirmationStatus, GatewayRouter};
use crate::intent::{BetAction, BetIntent};
use crate::store::markets::{Bet, MarketStore};
use crate::store::messages::{CrossChainMessage, MessageStatus, MessageStore};

/// Polls relayed messages for destination-chain confirmation.
pub struct ConfirmationWatcher {
    config: Arc<Config>,
    store: Arc<MessageStore>,
    markets: Arc<MarketStore>,
    gateways: Arc<GatewayRouter>,
}

impl ConfirmationWatcher {
    pub fn new(
        config: Arc<Config>,
        store: Arc<MessageStore>,
        markets: Arc<MarketStore>,
        gateways: Arc<GatewayRouter>,
    ) -> Self {
        Self {
            config,
            store,
            markets,
            gateways,
        }
    }

    /// Runs the watcher loop until the process shuts down.
    pub async fn run(&self) {
        info!(
            "Starting confirmation watcher (every {}s)",
            self.config.relayer.confirmation_poll_interval_secs
        );
        loop {
            self.poll_once().await;
            tokio::time::sleep(Duration::from_secs(
                self.config.relayer.confirmation_poll_interval_secs,
            ))
            .await;
        }
    }

    /// Polls every relayed message once.
    ///
    /// # Returns
    ///
    /// Number of messages that reached a terminal status in this pass
    pub async fn poll_once(&self) -> usize {
        let relayed = self.store.by_status(MessageStatus::Relayed).await;
        let mut settled = 0;

        for message in relayed {
            let Some(tx_hash) = message.tx_hash.clone() else {
                warn!("Relayed message {} has no tx hash", message.id);
                continue;
            };
            let Some(adapter) = self.gateways.adapter_for(message.destination_chain) else {
                warn!(
                    "No gateway for chain {} (message {})",
                    message.destination_chain, message.id
                );
                continue;
            };

            match adapter.poll_confirmation(&tx_hash).await {
                Ok(ConfirmationStatus::Confirmed) => match self.settle(&message).await {
                    Ok(()) => settled += 1,
                    Err(e) => error!("Failed to settle message {}: {}", message.id, e),
                },
                Ok(ConfirmationStatus::Reverted) => {
                    match self
                        .store
                        .transition(&message.id, MessageStatus::Failed, None)
                        .await
                    {
                        Ok(()) => {
                            warn!(
                                "Message {} reverted on {}",
                                message.id, message.destination_chain
                            );
                            settled += 1;
                        }
                        Err(e) => error!("Failed to mark message {} failed: {}", message.id, e),
                    }
                }
                Ok(ConfirmationStatus::Unconfirmed) => {
                    if let Err(e) = self.store.record_confirmation_poll(&message.id).await {
                        error!("Failed to record poll for message {}: {}", message.id, e);
                    }
                }
                Err(e) => {
                    warn!("Confirmation poll failed for message {}: {}", message.id, e);
                    if let Err(e) = self.store.record_confirmation_poll(&message.id).await {
                        error!("Failed to record poll for message {}: {}", message.id, e);
                    }
                }
            }
        }

        settled
    }

    /// Transitions a confirmed message and applies its settlement effect.
    ///
    /// The transition happens first; the effect is keyed by message id in the
    /// market store, so a racing replay of the same confirmation settles
    /// nothing twice.
    async fn settle(&self, message: &CrossChainMessage) -> anyhow::Result<()> {
        self.store
            .transition(&message.id, MessageStatus::Confirmed, None)
            .await?;

        let intent = BetIntent::from_payload(&message.payload)?;
        match intent.action {
            BetAction::PlaceBet => {
                let amount_units = amount::normalize(&intent.params.amount)?;
                let bet = Bet {
                    user: intent.params.user.clone(),
                    market_id: intent.params.market_id.clone(),
                    prediction: intent.params.prediction,
                    amount: intent.params.amount.clone(),
                    amount_units,
                    timestamp: crate::store::current_timestamp(),
                    source_chain: intent.source_chain,
                    claimed: false,
                };
                self.markets.record_bet(&message.id, bet).await?;
                info!(
                    "Confirmed bet on market {} for {} (message {})",
                    intent.params.market_id, intent.params.user, message.id
                );
            }
            BetAction::ClaimWinnings => {
                let claimed = self
                    .markets
                    .claim_winnings(&message.id, &intent.params.market_id, &intent.params.user)
                    .await?;
                info!(
                    "Confirmed claim of {} bet(s) on market {} for {} (message {})",
                    claimed, intent.params.market_id, intent.params.user, message.id
                );
            }
        }
        Ok(())
    }
}
