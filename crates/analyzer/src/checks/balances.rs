//! Native-token movement summary for a simulated proposal.

use crate::trace;
use alloy_primitives::{Address, U256};
use std::collections::BTreeMap;
use warden_core::{CheckOutput, SimulationResult};

/// Summarizes net ETH movement per address from the call trace. Purely
/// informational: value transfers are expected in many proposals.
pub fn check_eth_balance_changes(sim: &SimulationResult) -> CheckOutput {
    let mut output = CheckOutput::default();

    let Some(root) = sim.call_trace.as_ref() else {
        output
            .info
            .push("No call trace available; balance changes not analyzed".into());
        return output;
    };

    let transfers = trace::value_transfers(root);
    if transfers.is_empty() {
        output.info.push("No ETH transfers".into());
        return output;
    }

    // (received, sent) per address.
    let mut deltas: BTreeMap<Address, (U256, U256)> = BTreeMap::new();
    for t in &transfers {
        deltas.entry(t.to).or_default().0 += t.value;
        deltas.entry(t.from).or_default().1 += t.value;
    }

    for (address, (received, sent)) in deltas {
        output.info.push(format!(
            "{address} receives {received} wei, sends {sent} wei"
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::CallRecord;

    #[test]
    fn absent_trace_is_informational() {
        let output = check_eth_balance_changes(&SimulationResult::default());
        assert_eq!(output.info.len(), 1);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn nets_transfers_per_address() {
        let sim = SimulationResult {
            status: true,
            call_trace: Some(CallRecord {
                from: Some("0x0000000000000000000000000000000000000001".into()),
                to: Some("0x0000000000000000000000000000000000000002".into()),
                value: Some("100".into()),
                calls: Some(vec![CallRecord {
                    from: Some("0x0000000000000000000000000000000000000002".into()),
                    to: Some("0x0000000000000000000000000000000000000003".into()),
                    value: Some("40".into()),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        };

        let output = check_eth_balance_changes(&sim);
        // Three addresses appear in the delta map.
        assert_eq!(output.info.len(), 3);
        assert!(output.info[1].contains("receives 100 wei, sends 40 wei"));
    }
}
