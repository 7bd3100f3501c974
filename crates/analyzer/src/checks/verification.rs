//! Source-verification status of touched contracts.

use alloy_primitives::Address;
use futures::future::join_all;
use std::collections::BTreeSet;
use warden_core::CheckOutput;
use warden_provider::VerificationStatus;

/// Looks up verification status for every candidate contract on the given
/// chain. Lookup failures reduce the completeness of `info`; they are not
/// check errors.
pub async fn check_verification(
    status: &dyn VerificationStatus,
    contracts: &[Address],
    chain_id: u64,
) -> CheckOutput {
    let mut seen = BTreeSet::new();
    let unique: Vec<Address> = contracts
        .iter()
        .copied()
        .filter(|a| seen.insert(*a))
        .collect();

    let results = join_all(unique.iter().map(|&address| async move {
        (address, status.is_verified(address, chain_id).await)
    }))
    .await;

    let mut output = CheckOutput::default();
    for (address, result) in results {
        match result {
            Ok(true) => output
                .info
                .push(format!("{address} source is verified")),
            Ok(false) => output
                .warnings
                .push(format!("{address} source is not verified")),
            Err(e) => {
                tracing::warn!(%address, chain_id, error = %e, "verification lookup failed");
                output.info.push(format!(
                    "Verification status unavailable for {address}: {e}"
                ));
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use warden_core::{WardenError, WardenResult};

    struct FakeStatus {
        verified: HashMap<Address, bool>,
    }

    #[async_trait]
    impl VerificationStatus for FakeStatus {
        async fn is_verified(&self, address: Address, _chain_id: u64) -> WardenResult<bool> {
            self.verified
                .get(&address)
                .copied()
                .ok_or_else(|| WardenError::Rpc("explorer timeout".into()))
        }
    }

    #[tokio::test]
    async fn splits_verified_unverified_and_unavailable() {
        let verified = Address::with_last_byte(1);
        let unverified = Address::with_last_byte(2);
        let unknown = Address::with_last_byte(3);
        let status = FakeStatus {
            verified: HashMap::from([(verified, true), (unverified, false)]),
        };

        let output = check_verification(&status, &[verified, unverified, unknown], 1).await;
        assert_eq!(output.info.len(), 2); // verified + unavailable note
        assert_eq!(output.warnings.len(), 1);
        assert!(output.errors.is_empty());
    }
}
