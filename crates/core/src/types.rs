//! Domain types for the Warden proposal analyzer.

use alloy_primitives::{address, Address, Bytes, U256};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Synthetic `from` used when simulating a proposal that has not been
/// submitted on-chain yet. Checks must not warn about this address being
/// an empty account unless a real address warns alongside it.
pub const PLACEHOLDER_SENDER: Address = address!("D73a92Be73EfbFcF3854433A5FcbAbF9c1316073");

// ---------------------------------------------------------------------------
// Simulation backend contract
// ---------------------------------------------------------------------------

/// One node of the call tree returned by the simulation backend.
///
/// Every field is optional and string-typed on the wire: traces are
/// attacker-influenced, so a single malformed node must never poison
/// deserialization of the surrounding tree. Typed accessors below parse
/// lazily and return `None` on garbage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub input: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: Option<String>,
    #[serde(default)]
    pub calls: Option<Vec<CallRecord>>,
}

impl CallRecord {
    /// Child calls; a missing `calls` field means no children.
    pub fn children(&self) -> &[CallRecord] {
        self.calls.as_deref().unwrap_or(&[])
    }

    pub fn to_address(&self) -> Option<Address> {
        parse_address(self.to.as_deref()?)
    }

    pub fn from_address(&self) -> Option<Address> {
        parse_address(self.from.as_deref()?)
    }

    /// Decoded calldata, or `None` when the field is absent or not valid hex.
    pub fn input_bytes(&self) -> Option<Vec<u8>> {
        let raw = self.input.as_deref()?.trim();
        let stripped = raw.strip_prefix("0x").unwrap_or(raw);
        if stripped.len() % 2 != 0 {
            return None;
        }
        hex::decode(stripped).ok()
    }

    /// Attached native value; unparseable values read as zero.
    pub fn value_wei(&self) -> U256 {
        self.value
            .as_deref()
            .and_then(parse_u256)
            .unwrap_or(U256::ZERO)
    }
}

fn parse_address(raw: &str) -> Option<Address> {
    Address::from_str(raw.trim()).ok()
}

fn parse_u256(raw: &str) -> Option<U256> {
    let trimmed = raw.trim();
    if let Some(hex) = trimmed.strip_prefix("0x") {
        U256::from_str_radix(hex, 16).ok()
    } else {
        U256::from_str_radix(trimmed, 10).ok()
    }
}

/// Accept a JSON string, map everything else (numbers, objects, null) to
/// `None` instead of failing the whole document.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Text(s)) => Some(s),
        _ => None,
    })
}

/// A decoded event log from the simulation backend. Decoding happens on the
/// backend side; `name` is present only when the backend knew the ABI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLog {
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub data: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

/// Request issued to the simulation backend. The same shape is used for the
/// source-chain run and for every destination re-simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    pub network_id: String,
    pub from: Address,
    pub to: Address,
    pub input: Bytes,
    pub value: U256,
    pub gas: u64,
    pub gas_price: u64,
}

/// Structured result returned by the simulation backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Transaction-level success flag.
    pub status: bool,
    #[serde(default)]
    pub call_trace: Option<CallRecord>,
    #[serde(default)]
    pub logs: Vec<EventLog>,
    /// Addresses of contracts touched during execution.
    #[serde(default)]
    pub contracts: Vec<String>,
}

// ---------------------------------------------------------------------------
// Cross-chain messages
// ---------------------------------------------------------------------------

/// Closed set of modeled L1->L2 bridge families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BridgeKind {
    ArbitrumL1L2,
    OptimismL1L2,
}

impl std::fmt::Display for BridgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BridgeKind::ArbitrumL1L2 => write!(f, "ArbitrumL1L2"),
            BridgeKind::OptimismL1L2 => write!(f, "OptimismL1L2"),
        }
    }
}

/// One L1->L2 message extracted from a source-chain call trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossChainMessage {
    #[serde(rename = "bridgeType")]
    pub bridge: BridgeKind,
    #[serde(rename = "destinationChainId")]
    pub destination_chain_id: String,
    #[serde(rename = "l2TargetAddress")]
    pub l2_target: Address,
    #[serde(rename = "l2InputData")]
    pub l2_input: Bytes,
    #[serde(rename = "l2Value")]
    pub l2_value: U256,
    /// Apparent L2 sender: aliased for Arbitrum, preserved for OP-stack.
    #[serde(rename = "l2FromAddress", skip_serializing_if = "Option::is_none")]
    pub l2_from: Option<Address>,
}

impl CrossChainMessage {
    /// Semantic identity of the message. Two calls anywhere in a trace that
    /// carry the same target, calldata, and destination are the same logical
    /// message and must collapse to one entry.
    pub fn key(&self) -> MessageKey {
        MessageKey {
            destination_chain_id: self.destination_chain_id.clone(),
            l2_target: self.l2_target,
            l2_input: self.l2_input.to_vec(),
        }
    }
}

/// Deduplication key: `(destination chain, target, calldata)`. Ordered so
/// that message sets iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageKey {
    pub destination_chain_id: String,
    pub l2_target: Address,
    pub l2_input: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Destination simulation results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationStatus {
    Success,
    Failure,
    Skipped,
}

/// Outcome of re-simulating one extracted message on its destination chain.
#[derive(Debug, Clone, Serialize)]
pub struct DestinationSimulation {
    pub chain_id: u64,
    pub bridge: BridgeKind,
    pub status: DestinationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sim: Option<SimulationResult>,
    #[serde(rename = "l2Params")]
    pub message: CrossChainMessage,
}

/// Aggregate cross-chain result for one source simulation.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossChainReport {
    pub destination_simulations: Vec<DestinationSimulation>,
    /// True iff at least one destination has `status = failure`.
    /// Skipped destinations never count as failures.
    pub cross_chain_failure: bool,
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Per-address classification produced by the check drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressClassification {
    Eoa,
    Empty,
    Safe,
    Delegatecall,
    Selfdestruct,
    Trusted,
    Verified,
    Unverified,
}

/// Reachability verdict of the bytecode scanner. The classification layer
/// maps EOA/empty/trusted before bytecode is ever scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeSafety {
    Safe,
    Delegatecall,
    Selfdestruct,
}

impl From<CodeSafety> for AddressClassification {
    fn from(safety: CodeSafety) -> Self {
        match safety {
            CodeSafety::Safe => AddressClassification::Safe,
            CodeSafety::Delegatecall => AddressClassification::Delegatecall,
            CodeSafety::Selfdestruct => AddressClassification::Selfdestruct,
        }
    }
}

/// Output of a single safety check.
///
/// `errors` is reserved for positively confirmed danger, `warnings` for
/// suspicious-but-inconclusive findings, `info` for benign status.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckOutput {
    pub info: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl CheckOutput {
    pub fn is_empty(&self) -> bool {
        self.info.is_empty() && self.warnings.is_empty() && self.errors.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Proposal payload
// ---------------------------------------------------------------------------

/// A governance proposal's action set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub targets: Vec<Address>,
    pub values: Vec<U256>,
    pub calldatas: Vec<Bytes>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Proposal {
    /// Structural validation: the three action arrays must line up. A
    /// mismatch is rejected outright rather than producing a partially
    /// valid simulation.
    pub fn validate(&self) -> Result<(), crate::error::WardenError> {
        if self.targets.len() != self.values.len() || self.targets.len() != self.calldatas.len() {
            return Err(crate::error::WardenError::InvalidInput(format!(
                "proposal action arrays disagree: {} targets, {} values, {} calldatas",
                self.targets.len(),
                self.values.len(),
                self.calldatas.len()
            )));
        }
        Ok(())
    }
}

/// Input payload for an analysis run: the prepared source-chain simulation
/// request plus the proposal it represents. Building the request (governor
/// storage overrides, queueing state) is the caller's concern.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload {
    pub request: SimulationRequest,
    pub proposal: Proposal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_trace_fields_become_none() {
        let raw = r#"{"from": 5, "to": null, "input": {"x": 1}, "value": "12", "calls": null}"#;
        let record: CallRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.from, None);
        assert_eq!(record.to, None);
        assert_eq!(record.input, None);
        assert_eq!(record.value_wei(), U256::from(12));
        assert!(record.children().is_empty());
    }

    #[test]
    fn input_bytes_rejects_odd_and_non_hex() {
        let mut record = CallRecord {
            input: Some("0xabc".into()),
            ..Default::default()
        };
        assert_eq!(record.input_bytes(), None);

        record.input = Some("0xzzzz".into());
        assert_eq!(record.input_bytes(), None);

        record.input = Some("0xdeadbeef".into());
        assert_eq!(record.input_bytes(), Some(vec![0xde, 0xad, 0xbe, 0xef]));
    }

    #[test]
    fn message_key_ignores_bridge_and_sender() {
        let a = CrossChainMessage {
            bridge: BridgeKind::ArbitrumL1L2,
            destination_chain_id: "42161".into(),
            l2_target: Address::ZERO,
            l2_input: Bytes::from_static(&[1, 2, 3]),
            l2_value: U256::ZERO,
            l2_from: Some(PLACEHOLDER_SENDER),
        };
        let mut b = a.clone();
        b.l2_from = None;
        assert_eq!(a.key(), b.key());

        b.destination_chain_id = "10".into();
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn proposal_length_mismatch_is_rejected() {
        let proposal = Proposal {
            targets: vec![Address::ZERO],
            values: vec![],
            calldatas: vec![Bytes::new()],
            description: None,
        };
        assert!(proposal.validate().is_err());
    }
}
