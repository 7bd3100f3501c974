//! Arbitrum delayed-inbox message extraction.
//!
//! The delayed inbox accepts a family of entry points (retryable tickets,
//! L1-funded and unfunded transactions, raw L2 messages), each with its own
//! argument layout. The apparent L2 sender is the *alias* of the L1 caller:
//! contracts calling the inbox appear on L2 shifted by a fixed offset.

use crate::bridges::BridgeParser;
use crate::trace;
use alloy_primitives::{address, Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use warden_core::{BridgeKind, CallRecord, CrossChainMessage};

sol! {
    function createRetryableTicket(
        address to,
        uint256 l2CallValue,
        uint256 maxSubmissionCost,
        address excessFeeRefundAddress,
        address callValueRefundAddress,
        uint256 gasLimit,
        uint256 maxFeePerGas,
        bytes data
    ) external payable returns (uint256);

    function unsafeCreateRetryableTicket(
        address to,
        uint256 l2CallValue,
        uint256 maxSubmissionCost,
        address excessFeeRefundAddress,
        address callValueRefundAddress,
        uint256 gasLimit,
        uint256 maxFeePerGas,
        bytes data
    ) external payable returns (uint256);

    function sendContractTransaction(
        uint256 gasLimit,
        uint256 maxFeePerGas,
        address to,
        uint256 value,
        bytes data
    ) external returns (uint256);

    function sendUnsignedTransaction(
        uint256 gasLimit,
        uint256 maxFeePerGas,
        uint256 nonce,
        address to,
        uint256 value,
        bytes data
    ) external returns (uint256);

    function sendL1FundedContractTransaction(
        uint256 gasLimit,
        uint256 maxFeePerGas,
        address to,
        bytes data
    ) external payable returns (uint256);

    function sendL1FundedUnsignedTransaction(
        uint256 gasLimit,
        uint256 maxFeePerGas,
        uint256 nonce,
        address to,
        bytes data
    ) external payable returns (uint256);

    function sendL2Message(bytes messageData) external returns (uint256);
}

/// Arbitrum One delayed inbox on mainnet.
pub const ARBITRUM_ONE_DELAYED_INBOX: Address =
    address!("4Dbd4fc535Ac27206064B68FfCf827b0A60BAB3f");

/// 0x1111000000000000000000000000000000001111 -- the retryable-ticket
/// sender aliasing constant.
const ALIAS_OFFSET: U256 = U256::from_limbs([0x1111, 0, 0x1111_0000, 0]);

/// 2^160 - 1.
const ADDRESS_MASK: U256 = U256::from_limbs([u64::MAX, u64::MAX, u32::MAX as u64, 0]);

/// Kind byte of an unsigned contract transaction inside `sendL2Message`.
const L2_MSG_KIND_CONTRACT_TX: u8 = 0x01;

const WORD: usize = 32;

/// Applies L1->L2 sender aliasing: `(sender + offset) mod 2^160`.
///
/// Computed in `U256` with an explicit mask so the 160-bit wraparound is
/// exact rather than relying on fixed-width overflow behavior.
pub fn alias_l2_sender(l1_sender: Address) -> Address {
    let aliased = (U256::from_be_slice(l1_sender.as_slice()) + ALIAS_OFFSET) & ADDRESS_MASK;
    Address::from_slice(&aliased.to_be_bytes::<32>()[12..])
}

/// Extracts retryable tickets and sibling message kinds sent through the
/// delayed inbox.
pub struct ArbitrumParser {
    inbox: Address,
    destination_chain_id: String,
}

impl Default for ArbitrumParser {
    fn default() -> Self {
        Self {
            inbox: ARBITRUM_ONE_DELAYED_INBOX,
            destination_chain_id: "42161".into(),
        }
    }
}

impl ArbitrumParser {
    /// Parser for another Arbitrum-family chain (e.g. Nova) with its own
    /// delayed inbox.
    pub fn for_inbox(inbox: Address, destination_chain_id: impl Into<String>) -> Self {
        Self {
            inbox,
            destination_chain_id: destination_chain_id.into(),
        }
    }

    fn decode_call(&self, call: &CallRecord, data: &[u8]) -> Option<CrossChainMessage> {
        let selector: [u8; 4] = data[..4].try_into().ok()?;

        let (l2_target, l2_value, l2_input) = match selector {
            createRetryableTicketCall::SELECTOR => {
                let c = decode::<createRetryableTicketCall>(data)?;
                (c.to, c.l2CallValue, c.data)
            }
            unsafeCreateRetryableTicketCall::SELECTOR => {
                let c = decode::<unsafeCreateRetryableTicketCall>(data)?;
                (c.to, c.l2CallValue, c.data)
            }
            sendContractTransactionCall::SELECTOR => {
                let c = decode::<sendContractTransactionCall>(data)?;
                (c.to, c.value, c.data)
            }
            sendUnsignedTransactionCall::SELECTOR => {
                let c = decode::<sendUnsignedTransactionCall>(data)?;
                (c.to, c.value, c.data)
            }
            sendL1FundedContractTransactionCall::SELECTOR => {
                let c = decode::<sendL1FundedContractTransactionCall>(data)?;
                // L2 value is funded by the ETH attached to the L1 call.
                (c.to, call.value_wei(), c.data)
            }
            sendL1FundedUnsignedTransactionCall::SELECTOR => {
                let c = decode::<sendL1FundedUnsignedTransactionCall>(data)?;
                (c.to, call.value_wei(), c.data)
            }
            sendL2MessageCall::SELECTOR => {
                let c = decode::<sendL2MessageCall>(data)?;
                decode_unsigned_contract_tx(&c.messageData)?
            }
            _ => {
                tracing::debug!(
                    selector = %hex::encode(selector),
                    "unrecognized inbox selector, skipping"
                );
                return None;
            }
        };

        Some(CrossChainMessage {
            bridge: BridgeKind::ArbitrumL1L2,
            destination_chain_id: self.destination_chain_id.clone(),
            l2_target,
            l2_input,
            l2_value,
            l2_from: call.from_address().map(alias_l2_sender),
        })
    }
}

impl BridgeParser for ArbitrumParser {
    fn name(&self) -> &'static str {
        "arbitrum-delayed-inbox"
    }

    fn extract(&self, trace: Option<&CallRecord>) -> Vec<CrossChainMessage> {
        let Some(root) = trace else {
            return Vec::new();
        };

        let mut messages = Vec::new();
        for call in trace::calls_to(root, std::slice::from_ref(&self.inbox)) {
            let Some(data) = call.input_bytes() else {
                continue;
            };
            if data.len() < 4 {
                continue;
            }
            if let Some(message) = self.decode_call(call, &data) {
                messages.push(message);
            }
        }
        messages
    }
}

fn decode<T: SolCall>(data: &[u8]) -> Option<T> {
    match T::abi_decode(data) {
        Ok(call) => Some(call),
        Err(e) => {
            tracing::debug!(error = %e, "inbox calldata failed to ABI-decode, skipping");
            None
        }
    }
}

/// Manually unpacks a `sendL2Message` payload of the unsigned-contract-tx
/// kind: `kind(1) | gasLimit(32) | maxFeePerGas(32) | to(32) | value(32) |
/// data(..)`. Other message kinds are skipped.
fn decode_unsigned_contract_tx(payload: &[u8]) -> Option<(Address, U256, Bytes)> {
    if payload.len() < 1 + 4 * WORD {
        tracing::debug!(len = payload.len(), "sendL2Message payload too short, skipping");
        return None;
    }
    if payload[0] != L2_MSG_KIND_CONTRACT_TX {
        tracing::debug!(kind = payload[0], "unsupported L2 message kind, skipping");
        return None;
    }

    let words = &payload[1..];
    let to = Address::from_slice(&words[2 * WORD + 12..3 * WORD]);
    let value = U256::from_be_slice(&words[3 * WORD..4 * WORD]);
    let data = Bytes::from(words[4 * WORD..].to_vec());
    Some((to, value, data))
}
