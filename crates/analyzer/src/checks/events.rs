//! Summary of events emitted during the source simulation.
//!
//! Decoding happens on the backend side; this check only folds the decoded
//! logs into readable report lines.

use warden_core::{CheckOutput, SimulationResult};

pub fn check_decoded_events(sim: &SimulationResult) -> CheckOutput {
    let mut output = CheckOutput::default();

    if sim.logs.is_empty() {
        output.info.push("No events emitted".into());
        return output;
    }

    for log in &sim.logs {
        let address = log.address.as_deref().unwrap_or("<unknown address>");
        match &log.name {
            Some(name) => output.info.push(format!("{address} emitted {name}")),
            None => {
                let topic0 = log.topics.first().map(String::as_str).unwrap_or("<none>");
                output.info.push(format!(
                    "{address} emitted an undecoded log (topic0 {topic0})"
                ));
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::EventLog;

    #[test]
    fn lists_decoded_and_undecoded_logs() {
        let sim = SimulationResult {
            status: true,
            logs: vec![
                EventLog {
                    address: Some("0x0000000000000000000000000000000000000001".into()),
                    name: Some("ProposalExecuted(uint256)".into()),
                    ..Default::default()
                },
                EventLog {
                    address: None,
                    topics: vec!["0xabcd".into()],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let output = check_decoded_events(&sim);
        assert_eq!(output.info.len(), 2);
        assert!(output.info[0].contains("ProposalExecuted"));
        assert!(output.info[1].contains("undecoded"));
    }

    #[test]
    fn no_logs_is_informational() {
        let output = check_decoded_events(&SimulationResult::default());
        assert_eq!(output.info, vec!["No events emitted".to_string()]);
    }
}
