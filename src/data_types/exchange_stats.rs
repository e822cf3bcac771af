
use indexmap::IndexMap;
use serde::Serialize;

use crate::data_types::genotype::GenotypeCall;

/// Accumulates the record and call counts for a full run.
/// Call tallies are keyed by the rendered GT string in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExchangeStats {
    /// Number of records pulled from the input
    pub records_read: u64,
    /// Number of records written to the output
    pub records_emitted: u64,
    /// Number of records dropped because the source tag was absent
    pub records_dropped: u64,
    /// Per-sample call tallies, keyed by the rendered genotype
    pub call_counts: IndexMap<String, u64>
}

impl ExchangeStats {
    /// Adds a single decoded sample call to the tallies.
    pub fn record_call(&mut self, call: GenotypeCall) {
        *self.call_counts.entry(call.as_ref().to_string()).or_default() += 1;
    }
}
