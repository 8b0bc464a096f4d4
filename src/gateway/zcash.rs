//! Zcash Shielded Settlement Gateway
//!
//! Wraps the relay payload into a shielded note memo (`z_sendmany`) and
//! observes the asynchronous operation status (`z_getoperationstatus`). The
//! shielded pool hides sender, receiver, and value; after a send this
//! adapter reports only success or failure and never exposes transaction
//! contents to its caller.

use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{classify_rpc_error, AdapterError, ConfirmationStatus, JsonRpcRequest, JsonRpcResponse};
use crate::config::ShieldedChainConfig;

pub struct ShieldedGateway {
    client: Client,
    rpc_url: String,
    pool_addr: String,
    settlement_addr: String,
}

#[derive(Debug, Deserialize)]
struct OperationStatus {
    status: String,
}

impl ShieldedGateway {
    pub fn new(config: &ShieldedChainConfig, timeout_ms: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .no_proxy()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            rpc_url: config.rpc_url.clone(),
            pool_addr: config.pool_addr.clone(),
            settlement_addr: config.settlement_addr.clone(),
        })
    }

    /// Sends the payload as a zero-value marker note with a memo.
    ///
    /// Value settlement happens inside the pool; the note only carries the
    /// intent. Returns the async operation id, which stands in for a
    /// transaction hash.
    pub async fn send(&self, payload: &str) -> Result<String, AdapterError> {
        let memo = hex::encode(payload.as_bytes());
        let request = JsonRpcRequest::new(
            "z_sendmany",
            serde_json::json!([
                self.pool_addr,
                [{ "address": self.settlement_addr, "amount": 0, "memo": memo }],
                1
            ]),
        );

        let response: JsonRpcResponse<String> = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(AdapterError::from_transport)?
            .json()
            .await
            .map_err(|e| AdapterError::Unknown(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(classify_rpc_error(error));
        }
        response
            .result
            .ok_or_else(|| AdapterError::Unknown("z_sendmany returned no operation id".to_string()))
    }

    /// Reports the fate of a shielded operation.
    ///
    /// Only the status field is read. Shielded operations expose no amounts
    /// or addresses here, and neither does this method.
    pub async fn poll_confirmation(
        &self,
        tx_hash: &str,
    ) -> Result<ConfirmationStatus, AdapterError> {
        let request = JsonRpcRequest::new("z_getoperationstatus", serde_json::json!([[tx_hash]]));

        let response: JsonRpcResponse<Vec<OperationStatus>> = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(AdapterError::from_transport)?
            .json()
            .await
            .map_err(|e| AdapterError::Unknown(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(classify_rpc_error(error));
        }

        Ok(match response.result.unwrap_or_default().into_iter().next() {
            None => ConfirmationStatus::Unconfirmed,
            Some(operation) => match operation.status.as_str() {
                "success" => ConfirmationStatus::Confirmed,
                "failed" => ConfirmationStatus::Reverted,
                _ => ConfirmationStatus::Unconfirmed,
            },
        })
    }
}
