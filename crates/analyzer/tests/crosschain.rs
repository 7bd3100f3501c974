//! Orchestrator integration tests against an in-memory simulation backend.

use alloy_primitives::{address, Address, Bytes, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use warden_analyzer::bridges::arbitrum::{createRetryableTicketCall, ARBITRUM_ONE_DELAYED_INBOX};
use warden_analyzer::bridges::optimism::{sendMessageCall, BASE_MESSENGER, OP_MAINNET_MESSENGER};
use warden_analyzer::crosschain::analyze_cross_chain;
use warden_core::{
    CallRecord, DestinationStatus, SimulationRequest, SimulationResult, WardenError, WardenResult,
};
use warden_provider::SimulationBackend;

/// Backend double: records every request and fails or reverts on command.
struct MockBackend {
    supported: BTreeSet<u64>,
    error_targets: BTreeSet<Address>,
    revert_targets: BTreeSet<Address>,
    requests: Mutex<Vec<SimulationRequest>>,
}

impl MockBackend {
    fn new(supported: impl IntoIterator<Item = u64>) -> Self {
        Self {
            supported: supported.into_iter().collect(),
            error_targets: BTreeSet::new(),
            revert_targets: BTreeSet::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn erroring_on(mut self, target: Address) -> Self {
        self.error_targets.insert(target);
        self
    }

    fn reverting_on(mut self, target: Address) -> Self {
        self.revert_targets.insert(target);
        self
    }
}

#[async_trait]
impl SimulationBackend for MockBackend {
    fn supports_chain(&self, chain_id: u64) -> bool {
        self.supported.contains(&chain_id)
    }

    async fn simulate(&self, request: &SimulationRequest) -> WardenResult<SimulationResult> {
        self.requests.lock().unwrap().push(request.clone());

        if self.error_targets.contains(&request.to) {
            return Err(WardenError::Backend("boom".into()));
        }
        Ok(SimulationResult {
            status: !self.revert_targets.contains(&request.to),
            ..Default::default()
        })
    }
}

fn retryable_input(target: Address) -> String {
    let encoded = createRetryableTicketCall {
        to: target,
        l2CallValue: U256::from(1u64),
        maxSubmissionCost: U256::from(1u64),
        excessFeeRefundAddress: Address::ZERO,
        callValueRefundAddress: Address::ZERO,
        gasLimit: U256::from(1_000_000u64),
        maxFeePerGas: U256::from(1u64),
        data: Bytes::new(),
    }
    .abi_encode();
    format!("0x{}", hex::encode(encoded))
}

fn send_message_input(target: Address) -> String {
    let encoded = sendMessageCall {
        target,
        message: Bytes::from_static(&[0x11]),
        minGasLimit: 100_000,
    }
    .abi_encode();
    format!("0x{}", hex::encode(encoded))
}

fn call(from: &str, to: Address, input: String) -> CallRecord {
    CallRecord {
        from: Some(from.into()),
        to: Some(format!("{to:#x}")),
        input: Some(input),
        value: None,
        calls: None,
    }
}

fn source_with_calls(calls: Vec<CallRecord>) -> SimulationResult {
    SimulationResult {
        status: true,
        call_trace: Some(CallRecord {
            calls: Some(calls),
            ..Default::default()
        }),
        ..Default::default()
    }
}

const SENDER: &str = "0x1a9C8182C09F50C8318d769245beA52c32BE35BC";

#[tokio::test]
async fn one_failing_destination_does_not_disturb_its_siblings() {
    let targets = [
        Address::with_last_byte(0x0a),
        Address::with_last_byte(0x0b),
        Address::with_last_byte(0x0c),
    ];
    let source = source_with_calls(
        targets
            .iter()
            .map(|&t| call(SENDER, ARBITRUM_ONE_DELAYED_INBOX, retryable_input(t)))
            .collect(),
    );

    let backend = Arc::new(MockBackend::new([42161]).erroring_on(targets[1]));
    let report = analyze_cross_chain(backend, &source).await;

    assert_eq!(report.destination_simulations.len(), 3);
    assert!(report.cross_chain_failure);

    let statuses: Vec<DestinationStatus> = report
        .destination_simulations
        .iter()
        .map(|d| d.status)
        .collect();
    assert_eq!(
        statuses,
        vec![
            DestinationStatus::Success,
            DestinationStatus::Failure,
            DestinationStatus::Success,
        ]
    );
    assert!(report.destination_simulations[1]
        .error
        .as_deref()
        .unwrap()
        .contains("boom"));
}

#[tokio::test]
async fn reverting_destination_counts_as_failure() {
    let target = Address::with_last_byte(0x0a);
    let source = source_with_calls(vec![call(
        SENDER,
        ARBITRUM_ONE_DELAYED_INBOX,
        retryable_input(target),
    )]);

    let backend = Arc::new(MockBackend::new([42161]).reverting_on(target));
    let report = analyze_cross_chain(backend, &source).await;

    assert!(report.cross_chain_failure);
    let dest = &report.destination_simulations[0];
    assert_eq!(dest.status, DestinationStatus::Failure);
    assert!(dest.sim.is_some());
}

#[tokio::test]
async fn unsupported_chain_is_skipped_without_a_network_call() {
    let source = source_with_calls(vec![call(
        SENDER,
        BASE_MESSENGER,
        send_message_input(Address::with_last_byte(0x0a)),
    )]);

    // Backend knows Arbitrum but not Base.
    let backend = Arc::new(MockBackend::new([42161]));
    let report = analyze_cross_chain(backend.clone(), &source).await;

    assert_eq!(report.destination_simulations.len(), 1);
    assert_eq!(
        report.destination_simulations[0].status,
        DestinationStatus::Skipped
    );
    // Skipped never counts as cross-chain failure.
    assert!(!report.cross_chain_failure);
    assert!(backend.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_source_simulation_short_circuits() {
    let source = SimulationResult {
        status: false,
        call_trace: Some(CallRecord {
            calls: Some(vec![call(
                SENDER,
                ARBITRUM_ONE_DELAYED_INBOX,
                retryable_input(Address::with_last_byte(0x0a)),
            )]),
            ..Default::default()
        }),
        ..Default::default()
    };

    let backend = Arc::new(MockBackend::new([42161]));
    let report = analyze_cross_chain(backend.clone(), &source).await;

    assert!(report.destination_simulations.is_empty());
    assert!(!report.cross_chain_failure);
    assert!(backend.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn destination_requests_carry_the_bridge_specific_sender() {
    let arb_target = Address::with_last_byte(0x0a);
    let op_target = Address::with_last_byte(0x0b);
    let source = source_with_calls(vec![
        call(SENDER, ARBITRUM_ONE_DELAYED_INBOX, retryable_input(arb_target)),
        call(SENDER, OP_MAINNET_MESSENGER, send_message_input(op_target)),
    ]);

    let backend = Arc::new(MockBackend::new([10, 42161]));
    let report = analyze_cross_chain(backend.clone(), &source).await;
    assert_eq!(report.destination_simulations.len(), 2);
    assert!(!report.cross_chain_failure);

    let requests = backend.requests.lock().unwrap();
    let arb_request = requests.iter().find(|r| r.to == arb_target).unwrap();
    let op_request = requests.iter().find(|r| r.to == op_target).unwrap();

    // Arbitrum aliases the L1 caller; the OP stack preserves it.
    assert_eq!(
        arb_request.from,
        address!("2BAD8182C09F50c8318d769245beA52C32Be46CD")
    );
    assert_eq!(
        op_request.from,
        address!("1a9C8182C09F50C8318d769245beA52c32BE35BC")
    );
    assert_eq!(arb_request.network_id, "42161");
    assert_eq!(op_request.network_id, "10");
}
