//! External collaborator abstractions for Warden.
//!
//! Three boundaries, each behind a trait so the analyzer crate can be
//! exercised with in-memory fakes:
//! - [`SimulationBackend`] -- executes a transaction against chain state and
//!   returns a structured trace.
//! - [`AddressState`] -- `eth_getCode` / `eth_getTransactionCount`.
//! - [`VerificationStatus`] -- block-explorer source verification lookup.

pub mod backend;
pub mod rpc;
pub mod verification;

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use warden_core::{SimulationRequest, SimulationResult, WardenResult};

pub use backend::HttpSimulationBackend;
pub use rpc::RpcAddressState;
pub use verification::ExplorerClient;

/// Abstraction over the simulation service. The same request/response
/// contract serves the source-chain run and every destination re-simulation.
#[async_trait]
pub trait SimulationBackend: Send + Sync {
    /// Whether the backend can simulate against the given chain. The
    /// orchestrator consults this before dispatching and marks messages on
    /// unsupported chains as skipped without a network call.
    fn supports_chain(&self, chain_id: u64) -> bool;

    async fn simulate(&self, request: &SimulationRequest) -> WardenResult<SimulationResult>;
}

/// On-chain account state needed by the address classification checks.
#[async_trait]
pub trait AddressState: Send + Sync {
    async fn get_code(&self, address: Address) -> WardenResult<Bytes>;
    async fn get_transaction_count(&self, address: Address) -> WardenResult<u64>;
}

/// Source-verification lookups against a block explorer.
#[async_trait]
pub trait VerificationStatus: Send + Sync {
    async fn is_verified(&self, address: Address, chain_id: u64) -> WardenResult<bool>;
}
