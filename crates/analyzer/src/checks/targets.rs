//! Selfdestruct / delegatecall classification of touched addresses.

use crate::bytecode;
use alloy_primitives::Address;
use futures::future::join_all;
use std::collections::BTreeSet;
use warden_core::{AddressClassification, CheckOutput, WardenResult, PLACEHOLDER_SENDER};
use warden_provider::AddressState;

/// Classifies one address: trusted allow-list first, then code/nonce
/// (fetched concurrently), then the bytecode scan.
pub async fn classify_address(
    state: &dyn AddressState,
    address: Address,
    trusted: &BTreeSet<Address>,
) -> WardenResult<AddressClassification> {
    if trusted.contains(&address) {
        return Ok(AddressClassification::Trusted);
    }

    let (code, nonce) = tokio::join!(
        state.get_code(address),
        state.get_transaction_count(address)
    );
    let code = code?;
    let nonce = nonce?;

    if code.is_empty() {
        return Ok(if nonce == 0 {
            AddressClassification::Empty
        } else {
            AddressClassification::Eoa
        });
    }

    Ok(bytecode::scan_code(&code).into())
}

/// Runs the classification over a candidate address set (proposal targets,
/// or every contract touched during simulation) and folds the results into
/// a check output.
///
/// The placeholder sender used for not-yet-proposed simulations is handled
/// specially: when *every* warning is attributed to it, its warnings are
/// suppressed (a dry run should not warn about its own synthetic caller).
/// The suppression is address-exact and never touches `info`.
pub async fn check_target_safety(
    state: &dyn AddressState,
    candidates: &[Address],
    trusted: &BTreeSet<Address>,
) -> CheckOutput {
    let mut seen = BTreeSet::new();
    let unique: Vec<Address> = candidates
        .iter()
        .copied()
        .filter(|a| seen.insert(*a))
        .collect();

    let classified = join_all(unique.iter().map(|&address| async move {
        (address, classify_address(state, address, trusted).await)
    }))
    .await;

    let mut output = CheckOutput::default();
    let mut warnings: Vec<(Address, String)> = Vec::new();

    for (address, result) in classified {
        match result {
            Err(e) => {
                tracing::warn!(%address, error = %e, "classification unavailable");
                output
                    .info
                    .push(format!("Could not classify {address}: {e}"));
            }
            Ok(AddressClassification::Trusted) => output
                .info
                .push(format!("{address} is a trusted governance contract; scan skipped")),
            Ok(AddressClassification::Eoa) => output
                .info
                .push(format!("{address} is an externally-owned account")),
            Ok(AddressClassification::Safe) => output
                .info
                .push(format!("{address}: no reachable SELFDESTRUCT or DELEGATECALL")),
            Ok(AddressClassification::Empty) => warnings.push((
                address,
                format!("{address} has no code and zero nonce; code can still be deployed there"),
            )),
            Ok(AddressClassification::Delegatecall) => warnings.push((
                address,
                format!("{address} contains a reachable DELEGATECALL"),
            )),
            Ok(AddressClassification::Selfdestruct) => output
                .errors
                .push(format!("{address} contains a reachable SELFDESTRUCT")),
            // Verification classes are produced by the verification check.
            Ok(AddressClassification::Verified | AddressClassification::Unverified) => {}
        }
    }

    let only_placeholder = !warnings.is_empty()
        && warnings
            .iter()
            .all(|(address, _)| *address == PLACEHOLDER_SENDER);
    if only_placeholder {
        output.info.push(format!(
            "Suppressed empty-account warning for placeholder sender {PLACEHOLDER_SENDER}"
        ));
    } else {
        output
            .warnings
            .extend(warnings.into_iter().map(|(_, text)| text));
    }

    output
}
