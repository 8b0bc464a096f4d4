//! EVM Gateway
//!
//! Routes payloads to EVM chains through an Axelar-style gateway service. A
//! send is only a relay request accepted by the gateway; the destination
//! transaction is observed separately through the destination chain's RPC.

use anyhow::Context;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{classify_rpc_error, AdapterError, ConfirmationStatus, JsonRpcRequest, JsonRpcResponse};
use crate::config::EvmChainConfig;

pub struct EvmGateway {
    client: Client,
    gateway_url: String,
    rpc_url: String,
    contract_addr: String,
}

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    destination_address: &'a str,
    /// Hex-encoded intent payload
    payload: String,
    /// Fixed gas budget for the destination entry point
    gas_limit: u64,
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    tx_hash: String,
}

#[derive(Debug, Deserialize)]
struct TransactionReceipt {
    status: Option<String>,
}

impl EvmGateway {
    pub fn new(config: &EvmChainConfig, timeout_ms: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .no_proxy()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            gateway_url: config.gateway_url.clone(),
            rpc_url: config.rpc_url.clone(),
            contract_addr: config.contract_addr.clone(),
        })
    }

    /// Submits a relay request to the gateway service.
    ///
    /// Acceptance here means the gateway took the request, not that the
    /// destination transaction exists; the returned hash is what the
    /// confirmation poll watches for.
    pub async fn send(&self, payload: &str, gas_limit: u64) -> Result<String, AdapterError> {
        let request = RelayRequest {
            destination_address: &self.contract_addr,
            payload: format!("0x{}", hex::encode(payload.as_bytes())),
            gas_limit,
        };

        let response = self
            .client
            .post(&self.gateway_url)
            .json(&request)
            .send()
            .await
            .map_err(AdapterError::from_transport)?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Rejected(format!(
                "gateway returned {}: {}",
                status, body
            )));
        }
        if !status.is_success() {
            return Err(AdapterError::Unknown(format!("gateway returned {}", status)));
        }

        let relay: RelayResponse = response
            .json()
            .await
            .map_err(|e| AdapterError::Unknown(e.to_string()))?;
        Ok(relay.tx_hash)
    }

    /// Looks up the destination-chain receipt for a relayed transaction.
    pub async fn poll_confirmation(
        &self,
        tx_hash: &str,
    ) -> Result<ConfirmationStatus, AdapterError> {
        let request = JsonRpcRequest::new(
            "eth_getTransactionReceipt",
            serde_json::json!([tx_hash]),
        );

        let response: JsonRpcResponse<Option<TransactionReceipt>> = self
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

        Ok(match response.result.flatten() {
            None => ConfirmationStatus::Unconfirmed,
            Some(receipt) => match receipt.status.as_deref() {
                Some("0x1") => ConfirmationStatus::Confirmed,
                Some("0x0") => ConfirmationStatus::Reverted,
                _ => ConfirmationStatus::Unconfirmed,
            },
        })
    }
}
