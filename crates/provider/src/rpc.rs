//! JSON-RPC address state provider backed by alloy-rs.

use crate::AddressState;
use alloy_primitives::{Address, Bytes};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use async_trait::async_trait;
use warden_core::{WardenError, WardenResult};

/// Fetches account code and nonce from an Ethereum JSON-RPC endpoint.
///
/// ```ignore
/// let state = RpcAddressState::connect("https://mainnet.infura.io/v3/KEY").await?;
/// ```
pub struct RpcAddressState {
    provider: DynProvider,
    rpc_url: String,
}

impl RpcAddressState {
    pub async fn connect(rpc_url: &str) -> WardenResult<Self> {
        if rpc_url.is_empty() {
            return Err(WardenError::InvalidInput("RPC URL must not be empty".into()));
        }

        let provider = ProviderBuilder::new()
            .connect(rpc_url)
            .await
            .map_err(|e| WardenError::Rpc(format!("Failed to connect to {rpc_url}: {e}")))?;

        tracing::info!(rpc_url, "connected");

        Ok(Self {
            provider: provider.erased(),
            rpc_url: rpc_url.to_string(),
        })
    }
}

#[async_trait]
impl AddressState for RpcAddressState {
    async fn get_code(&self, address: Address) -> WardenResult<Bytes> {
        tracing::debug!(%address, rpc_url = %self.rpc_url, "eth_getCode");
        self.provider
            .get_code_at(address)
            .await
            .map_err(|e| WardenError::Rpc(format!("getCode({address}) failed: {e}")))
    }

    async fn get_transaction_count(&self, address: Address) -> WardenResult<u64> {
        tracing::debug!(%address, rpc_url = %self.rpc_url, "eth_getTransactionCount");
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(|e| WardenError::Rpc(format!("getTransactionCount({address}) failed: {e}")))
    }
}
