//! L1->L2 bridge message extraction.
//!
//! One parser per modeled bridge family, sharing the trace-walk and
//! deduplication skeleton. Parsers are total functions over untrusted
//! traces: malformed calls are skipped, never errors.

pub mod arbitrum;
pub mod optimism;

use std::collections::BTreeMap;
use warden_core::{CallRecord, CrossChainMessage, MessageKey};

pub use arbitrum::ArbitrumParser;
pub use optimism::OptimismParser;

/// A bridge family's message extractor.
pub trait BridgeParser: Send + Sync {
    fn name(&self) -> &'static str;

    /// Every L1->L2 message sent through this family's entry points. An
    /// absent trace yields an empty set.
    fn extract(&self, trace: Option<&CallRecord>) -> Vec<CrossChainMessage>;
}

/// The default parser set: one instance per modeled bridge family.
pub fn default_parsers() -> Vec<Box<dyn BridgeParser>> {
    vec![
        Box::new(ArbitrumParser::default()),
        Box::new(OptimismParser::default()),
    ]
}

/// Runs every parser over the trace and collapses the union by semantic
/// message identity. Two calls producing the same `(destination, target,
/// calldata)` tuple are one logical message; last write wins since
/// duplicates are expected to be identical.
pub fn extract_messages(
    trace: Option<&CallRecord>,
    parsers: &[Box<dyn BridgeParser>],
) -> Vec<CrossChainMessage> {
    let mut deduped: BTreeMap<MessageKey, CrossChainMessage> = BTreeMap::new();

    for parser in parsers {
        let found = parser.extract(trace);
        if !found.is_empty() {
            tracing::debug!(
                parser = parser.name(),
                messages = found.len(),
                "extracted bridge messages"
            );
        }
        for message in found {
            deduped.insert(message.key(), message);
        }
    }

    deduped.into_values().collect()
}
