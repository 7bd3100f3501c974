//! Block-explorer verification lookups with process-local memoization.

use crate::VerificationStatus;
use alloy_primitives::Address;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use warden_core::{WardenError, WardenResult};

/// Etherscan-compatible verification client.
///
/// Responses are memoized per `(address, chain)` for the process lifetime.
/// The cache is an optimization only -- a cold cache must produce the same
/// answers as a warm one.
pub struct ExplorerClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    cache: Mutex<HashMap<(Address, u64), bool>>,
}

impl ExplorerClient {
    pub fn new(api_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key,
            cache: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl VerificationStatus for ExplorerClient {
    async fn is_verified(&self, address: Address, chain_id: u64) -> WardenResult<bool> {
        if let Some(&hit) = self.cache.lock().unwrap().get(&(address, chain_id)) {
            return Ok(hit);
        }

        let mut query = vec![
            ("module", "contract".to_string()),
            ("action", "getsourcecode".to_string()),
            ("address", format!("{address:#x}")),
            ("chainid", chain_id.to_string()),
        ];
        if let Some(key) = &self.api_key {
            query.push(("apikey", key.clone()));
        }

        let response = self
            .client
            .get(&self.api_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| WardenError::Rpc(format!("explorer request failed: {e}")))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| WardenError::Rpc(format!("malformed explorer response: {e}")))?;

        // Unverified contracts come back status "1" with an empty SourceCode
        // field, so check the payload rather than the status flag alone.
        let verified = body
            .get("result")
            .and_then(|r| r.get(0))
            .and_then(|entry| entry.get("SourceCode"))
            .and_then(|source| source.as_str())
            .is_some_and(|source| !source.is_empty());

        tracing::debug!(%address, chain_id, verified, "verification lookup");

        self.cache
            .lock()
            .unwrap()
            .insert((address, chain_id), verified);
        Ok(verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_starts_cold() {
        let client = ExplorerClient::new("https://api.etherscan.io/v2/api", None);
        assert!(client.cache.lock().unwrap().is_empty());
    }
}
