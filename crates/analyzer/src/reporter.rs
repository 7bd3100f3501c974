//! Plain-text report assembly for an analysis run.

use warden_core::{CheckOutput, CrossChainReport, DestinationStatus, SimulationResult};

/// Renders the outcome of a full analysis: source status, per-check
/// findings, and the cross-chain section when bridge messages were found.
pub fn render_report(
    source: &SimulationResult,
    checks: &[(String, CheckOutput)],
    cross_chain: &CrossChainReport,
) -> String {
    let mut out = String::new();

    out.push_str("== Warden proposal analysis ==\n");
    out.push_str(&format!(
        "Source simulation: {}\n",
        if source.status { "ok" } else { "FAILED" }
    ));

    for (name, check) in checks {
        out.push_str(&format!("\n-- {name} --\n"));
        for line in &check.errors {
            out.push_str(&format!("  [error] {line}\n"));
        }
        for line in &check.warnings {
            out.push_str(&format!("  [warn]  {line}\n"));
        }
        for line in &check.info {
            out.push_str(&format!("  [info]  {line}\n"));
        }
        if check.is_empty() {
            out.push_str("  (nothing to report)\n");
        }
    }

    if !cross_chain.destination_simulations.is_empty() {
        out.push_str("\n-- Cross-chain messages --\n");
        for dest in &cross_chain.destination_simulations {
            let status = match dest.status {
                DestinationStatus::Success => "ok",
                DestinationStatus::Failure => "FAILED",
                DestinationStatus::Skipped => "skipped",
            };
            out.push_str(&format!(
                "  [{status}] {} -> chain {} target {}",
                dest.bridge, dest.chain_id, dest.message.l2_target
            ));
            if let Some(error) = &dest.error {
                out.push_str(&format!(" ({error})"));
            }
            out.push('\n');
        }
        out.push_str(&format!(
            "Cross-chain failure: {}\n",
            cross_chain.cross_chain_failure
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_check_findings() {
        let source = SimulationResult {
            status: true,
            ..Default::default()
        };
        let checks = vec![(
            "Target safety".to_string(),
            CheckOutput {
                info: vec!["all clear".into()],
                warnings: vec![],
                errors: vec![],
            },
        )];

        let rendered = render_report(&source, &checks, &CrossChainReport::default());
        assert!(rendered.contains("Source simulation: ok"));
        assert!(rendered.contains("[info]  all clear"));
        // No messages extracted, so no cross-chain section.
        assert!(!rendered.contains("Cross-chain"));
    }
}
