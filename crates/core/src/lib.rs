//! Domain models, shared types, and error definitions.
//!
//! Foundation crate -- no async or I/O dependencies.

pub mod error;
pub mod types;

pub use error::{WardenError, WardenResult};
pub use types::{
    AddressClassification, AnalysisPayload, BridgeKind, CallRecord, CheckOutput, CodeSafety,
    CrossChainMessage, CrossChainReport, DestinationSimulation, DestinationStatus, EventLog,
    MessageKey, Proposal, SimulationRequest, SimulationResult, PLACEHOLDER_SENDER,
};
