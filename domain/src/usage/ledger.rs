//! Append-only usage ledger.
//!
//! Records are created on every completed invocation and never mutated.
//! Appends serialize through a mutex so concurrent invocations cannot lose
//! records; insertion order is preserved for chronological reporting.

use super::pricing::PricingTable;
use crate::core::family::Family;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// One completed invocation, priced at record time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    pub family: Family,
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// USD cost, computed from the pricing table when the record was made.
    pub cost: f64,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

/// Aggregated totals for one family
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyTotals {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost: f64,
    pub requests: u64,
}

/// Aggregated token counts across the whole ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTotals {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

/// Thread-safe append-only ledger of usage records.
///
/// # Example
///
/// ```
/// use conclave_domain::{Family, UsageLedger};
///
/// let ledger = UsageLedger::new(Default::default());
/// ledger.record(Family::DeepSeek, "deepseek-chat", 1_000_000, 500_000);
///
/// assert_eq!(ledger.history().len(), 1);
/// assert!((ledger.total_cost() - (0.14 + 0.14)).abs() < 1e-9);
/// ```
pub struct UsageLedger {
    pricing: PricingTable,
    records: Mutex<Vec<UsageRecord>>,
}

impl UsageLedger {
    pub fn new(pricing: PricingTable) -> Self {
        Self {
            pricing,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Price and append one record; returns a copy of what was stored
    pub fn record(
        &self,
        family: Family,
        model: impl Into<String>,
        input_tokens: u64,
        output_tokens: u64,
    ) -> UsageRecord {
        let record = UsageRecord {
            cost: self.pricing.cost(&family, input_tokens, output_tokens),
            family,
            model: model.into(),
            input_tokens,
            output_tokens,
            timestamp_ms: current_timestamp(),
        };

        let mut records = self.records.lock().expect("usage ledger poisoned");
        records.push(record.clone());
        record
    }

    /// Sum of all record costs
    pub fn total_cost(&self) -> f64 {
        let records = self.records.lock().expect("usage ledger poisoned");
        records.iter().map(|r| r.cost).sum()
    }

    /// Per-family sums and request counts
    pub fn totals_by_family(&self) -> HashMap<Family, FamilyTotals> {
        let records = self.records.lock().expect("usage ledger poisoned");
        let mut totals: HashMap<Family, FamilyTotals> = HashMap::new();
        for record in records.iter() {
            let entry = totals.entry(record.family.clone()).or_default();
            entry.input_tokens += record.input_tokens;
            entry.output_tokens += record.output_tokens;
            entry.cost += record.cost;
            entry.requests += 1;
        }
        totals
    }

    /// Token counts across all records
    pub fn total_tokens(&self) -> TokenTotals {
        let records = self.records.lock().expect("usage ledger poisoned");
        let mut totals = TokenTotals::default();
        for record in records.iter() {
            totals.input_tokens += record.input_tokens;
            totals.output_tokens += record.output_tokens;
        }
        totals.total_tokens = totals.input_tokens + totals.output_tokens;
        totals
    }

    /// Snapshot of the full ledger in insertion order
    pub fn history(&self) -> Vec<UsageRecord> {
        let records = self.records.lock().expect("usage ledger poisoned");
        records.clone()
    }

    /// Clear the ledger
    pub fn reset(&self) {
        let mut records = self.records.lock().expect("usage ledger poisoned");
        records.clear();
    }
}

impl Default for UsageLedger {
    fn default() -> Self {
        Self::new(PricingTable::builtin())
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
