//! Proposal safety checks.
//!
//! Each check produces a [`warden_core::CheckOutput`]: `errors` for
//! positively confirmed danger, `warnings` for suspicious findings, `info`
//! for benign status. Collaborator failures degrade `info` completeness
//! rather than becoming check errors.

pub mod balances;
pub mod events;
pub mod targets;
pub mod verification;

pub use balances::check_eth_balance_changes;
pub use events::check_decoded_events;
pub use targets::{check_target_safety, classify_address};
pub use verification::check_verification;
