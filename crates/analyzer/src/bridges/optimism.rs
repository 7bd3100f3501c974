//! OP-stack cross-domain messenger extraction.
//!
//! Every OP-stack chain exposes an L1CrossDomainMessenger with the same
//! `sendMessage` signature; the destination chain is identified by *which*
//! messenger address was called, not by anything in the calldata. Unlike
//! Arbitrum, the apparent L2 sender is the L1 caller unmodified.

use crate::bridges::BridgeParser;
use crate::trace;
use alloy_primitives::{address, Address};
use alloy_sol_types::{sol, SolCall};
use std::collections::BTreeMap;
use warden_core::{BridgeKind, CallRecord, CrossChainMessage};

sol! {
    function sendMessage(address target, bytes message, uint32 minGasLimit) external payable;
}

/// OP Mainnet L1CrossDomainMessenger proxy.
pub const OP_MAINNET_MESSENGER: Address = address!("25ace71c97B33Cc4729CF772ae268934F7ab5fA1");

/// Base L1CrossDomainMessenger proxy.
pub const BASE_MESSENGER: Address = address!("866E82a600A1414e583f7F13623F1aC5d58b0Afa");

/// Reject decoded payloads above this size; a malicious proposal must not
/// force unbounded memory use during re-simulation.
const MAX_MESSAGE_BYTES: usize = 1 << 20;

/// Extracts `sendMessage` calls to known OP-stack messengers.
pub struct OptimismParser {
    /// Messenger address -> destination chain id.
    messengers: BTreeMap<Address, u64>,
}

impl Default for OptimismParser {
    fn default() -> Self {
        Self {
            messengers: BTreeMap::from([
                (OP_MAINNET_MESSENGER, 10),
                (BASE_MESSENGER, 8453),
            ]),
        }
    }
}

impl OptimismParser {
    /// Registers an additional OP-stack chain's messenger.
    pub fn with_messenger(mut self, messenger: Address, chain_id: u64) -> Self {
        self.messengers.insert(messenger, chain_id);
        self
    }
}

impl BridgeParser for OptimismParser {
    fn name(&self) -> &'static str {
        "optimism-cross-domain-messenger"
    }

    fn extract(&self, trace: Option<&CallRecord>) -> Vec<CrossChainMessage> {
        let Some(root) = trace else {
            return Vec::new();
        };

        let targets: Vec<Address> = self.messengers.keys().copied().collect();
        let mut messages = Vec::new();

        for call in trace::calls_to(root, &targets) {
            let Some(data) = call.input_bytes() else {
                continue;
            };
            if data.len() < 4 || data[..4] != sendMessageCall::SELECTOR {
                if data.len() >= 4 {
                    tracing::debug!(
                        selector = %hex::encode(&data[..4]),
                        "unrecognized messenger selector, skipping"
                    );
                }
                continue;
            }

            let decoded = match sendMessageCall::abi_decode(&data) {
                Ok(call) => call,
                Err(e) => {
                    tracing::debug!(error = %e, "sendMessage calldata failed to decode, skipping");
                    continue;
                }
            };

            if decoded.message.len() > MAX_MESSAGE_BYTES {
                tracing::warn!(
                    len = decoded.message.len(),
                    "oversized cross-domain message rejected"
                );
                continue;
            }

            // The messenger address matched during the walk, so the lookup
            // cannot miss.
            let Some(&chain_id) = call.to_address().and_then(|to| self.messengers.get(&to)) else {
                continue;
            };

            messages.push(CrossChainMessage {
                bridge: BridgeKind::OptimismL1L2,
                destination_chain_id: chain_id.to_string(),
                l2_target: decoded.target,
                l2_input: decoded.message,
                l2_value: call.value_wei(),
                l2_from: call.from_address(),
            });
        }

        messages
    }
}
