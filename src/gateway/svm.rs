//! Solana Gateway
//!
//! Direct program invocation semantics: the relay payload is submitted as a
//! base64-encoded transaction via `sendTransaction` and its fate observed
//! through `getSignatureStatuses`. Finality is expected within seconds.

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::{classify_rpc_error, AdapterError, ConfirmationStatus, JsonRpcRequest, JsonRpcResponse};
use crate::config::SvmChainConfig;

pub struct SvmGateway {
    client: Client,
    rpc_url: String,
    program_id: String,
}

#[derive(Debug, Deserialize)]
struct SignatureStatusResult {
    value: Vec<Option<SignatureStatus>>,
}

#[derive(Debug, Deserialize)]
struct SignatureStatus {
    #[serde(rename = "confirmationStatus")]
    confirmation_status: Option<String>,
    err: Option<serde_json::Value>,
}

impl SvmGateway {
    pub fn new(config: &SvmChainConfig, timeout_ms: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .no_proxy()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            rpc_url: config.rpc_url.clone(),
            program_id: config.program_id.clone(),
        })
    }

    /// Program the payloads are addressed to.
    #[allow(dead_code)]
    pub fn program_id(&self) -> &str {
        &self.program_id
    }

    /// Submits the payload and returns the transaction signature.
    pub async fn send(&self, payload: &str) -> Result<String, AdapterError> {
        let encoded = STANDARD.encode(payload.as_bytes());
        let request = JsonRpcRequest::new(
            "sendTransaction",
            serde_json::json!([encoded, { "encoding": "base64" }]),
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
            .ok_or_else(|| AdapterError::Unknown("sendTransaction returned no signature".to_string()))
    }

    /// Reports the fate of a submitted transaction signature.
    pub async fn poll_confirmation(
        &self,
        tx_hash: &str,
    ) -> Result<ConfirmationStatus, AdapterError> {
        let request = JsonRpcRequest::new(
            "getSignatureStatuses",
            serde_json::json!([[tx_hash], { "searchTransactionHistory": true }]),
        );

        let response: JsonRpcResponse<SignatureStatusResult> = self
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

        let statuses = response.result.map(|r| r.value).unwrap_or_default();
        Ok(match statuses.into_iter().next().flatten() {
            None => ConfirmationStatus::Unconfirmed,
            Some(status) if status.err.is_some() => ConfirmationStatus::Reverted,
            Some(status) => match status.confirmation_status.as_deref() {
                Some("finalized") => ConfirmationStatus::Confirmed,
                _ => ConfirmationStatus::Unconfirmed,
            },
        })
    }
}
