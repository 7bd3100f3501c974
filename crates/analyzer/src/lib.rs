//! Call-trace analysis, bridge message extraction, destination
//! re-simulation, and proposal safety checks.

pub mod bridges;
pub mod bytecode;
pub mod checks;
pub mod crosschain;
pub mod reporter;
pub mod trace;

pub use bridges::{default_parsers, extract_messages, BridgeParser};
pub use bytecode::scan_code;
pub use crosschain::{analyze_cross_chain, simulate_destinations};
