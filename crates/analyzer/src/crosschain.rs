//! Destination-chain re-simulation of extracted bridge messages.
//!
//! Every deduplicated message gets its own simulation request against its
//! destination chain. Dispatches run concurrently and each outcome is
//! captured independently: one destination reverting or erroring must not
//! disturb its siblings.

use crate::bridges::{self, BridgeParser};
use std::sync::Arc;
use tokio::task::JoinSet;
use warden_core::{
    CrossChainMessage, CrossChainReport, DestinationSimulation, DestinationStatus,
    SimulationRequest, SimulationResult, PLACEHOLDER_SENDER,
};
use warden_provider::SimulationBackend;

/// Gas limit for destination runs; bridge executors relay with generous
/// budgets, so a fixed ceiling is fine for simulation purposes.
const DESTINATION_GAS: u64 = 30_000_000;

/// Runs the bridge parsers over a completed source simulation and
/// re-simulates every extracted message on its destination chain.
///
/// A failed source execution short-circuits to an empty report: simulating
/// L2 effects of a transaction that never succeeded would be noise.
pub async fn analyze_cross_chain(
    backend: Arc<dyn SimulationBackend>,
    source: &SimulationResult,
) -> CrossChainReport {
    if !source.status {
        tracing::info!("source simulation failed, skipping destination analysis");
        return CrossChainReport::default();
    }

    let parsers = bridges::default_parsers();
    analyze_cross_chain_with(backend, source, &parsers).await
}

/// As [`analyze_cross_chain`], with an explicit parser set.
pub async fn analyze_cross_chain_with(
    backend: Arc<dyn SimulationBackend>,
    source: &SimulationResult,
    parsers: &[Box<dyn BridgeParser>],
) -> CrossChainReport {
    if !source.status {
        return CrossChainReport::default();
    }

    let messages = bridges::extract_messages(source.call_trace.as_ref(), parsers);
    if messages.is_empty() {
        return CrossChainReport::default();
    }

    tracing::info!(messages = messages.len(), "re-simulating bridge messages");
    simulate_destinations(backend, messages).await
}

/// Fans out one simulation per message and awaits all of them. Results come
/// back in message order regardless of completion order.
pub async fn simulate_destinations(
    backend: Arc<dyn SimulationBackend>,
    messages: Vec<CrossChainMessage>,
) -> CrossChainReport {
    let mut slots: Vec<Option<DestinationSimulation>> =
        messages.iter().map(|_| None).collect();
    let mut tasks = JoinSet::new();

    for (idx, message) in messages.into_iter().enumerate() {
        let Ok(chain_id) = message.destination_chain_id.parse::<u64>() else {
            slots[idx] = Some(skipped(
                0,
                format!(
                    "destination chain id {:?} is not an integer",
                    message.destination_chain_id
                ),
                message,
            ));
            continue;
        };

        if !backend.supports_chain(chain_id) {
            slots[idx] = Some(skipped(
                chain_id,
                format!("chain {chain_id} is not supported by the simulation backend"),
                message,
            ));
            continue;
        }

        let backend = backend.clone();
        tasks.spawn(async move {
            let request = destination_request(&message);
            let outcome = backend.simulate(&request).await;
            (idx, chain_id, message, outcome)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, chain_id, message, Ok(sim))) => {
                let status = if sim.status {
                    DestinationStatus::Success
                } else {
                    DestinationStatus::Failure
                };
                let error = (!sim.status).then(|| "destination execution reverted".to_string());
                slots[idx] = Some(DestinationSimulation {
                    chain_id,
                    bridge: message.bridge,
                    status,
                    error,
                    sim: Some(sim),
                    message,
                });
            }
            Ok((idx, chain_id, message, Err(e))) => {
                tracing::warn!(chain_id, error = %e, "destination simulation failed");
                slots[idx] = Some(DestinationSimulation {
                    chain_id,
                    bridge: message.bridge,
                    status: DestinationStatus::Failure,
                    error: Some(e.to_string()),
                    sim: None,
                    message,
                });
            }
            Err(join_error) => {
                tracing::warn!(error = %join_error, "destination simulation task aborted");
            }
        }
    }

    let destination_simulations: Vec<DestinationSimulation> =
        slots.into_iter().flatten().collect();
    let cross_chain_failure = destination_simulations
        .iter()
        .any(|d| d.status == DestinationStatus::Failure);

    CrossChainReport {
        destination_simulations,
        cross_chain_failure,
    }
}

fn destination_request(message: &CrossChainMessage) -> SimulationRequest {
    SimulationRequest {
        network_id: message.destination_chain_id.clone(),
        from: message.l2_from.unwrap_or(PLACEHOLDER_SENDER),
        to: message.l2_target,
        input: message.l2_input.clone(),
        value: message.l2_value,
        gas: DESTINATION_GAS,
        gas_price: 0,
    }
}

fn skipped(chain_id: u64, error: String, message: CrossChainMessage) -> DestinationSimulation {
    tracing::info!(chain_id, %error, "destination skipped");
    DestinationSimulation {
        chain_id,
        bridge: message.bridge,
        status: DestinationStatus::Skipped,
        error: Some(error),
        sim: None,
        message,
    }
}
