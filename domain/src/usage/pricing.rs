//! Per-family pricing table

use crate::core::family::Family;
use serde::{Deserialize, Serialize};

/// USD rates per million tokens for one family
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FamilyRate {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl FamilyRate {
    pub const fn new(input_per_million: f64, output_per_million: f64) -> Self {
        Self {
            input_per_million,
            output_per_million,
        }
    }

    /// Cost of one invocation at this rate
    pub fn cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        (input_tokens as f64 / 1_000_000.0) * self.input_per_million
            + (output_tokens as f64 / 1_000_000.0) * self.output_per_million
    }
}

/// Pricing rows keyed by family.
///
/// Injected into the ledger at construction so tests and per-environment
/// overrides can swap rates without touching accounting logic. A family
/// without a row is priced at the deepseek rate rather than erroring, so
/// accounting never blocks an invocation.
#[derive(Debug, Clone)]
pub struct PricingTable {
    rows: Vec<(Family, FamilyRate)>,
    fallback: FamilyRate,
}

/// DeepSeek rate, also used as the fallback row.
const DEEPSEEK_RATE: FamilyRate = FamilyRate::new(0.14, 0.28);

impl PricingTable {
    pub fn new(rows: Vec<(Family, FamilyRate)>, fallback: FamilyRate) -> Self {
        Self { rows, fallback }
    }

    /// The rates shipped with conclave.
    pub fn builtin() -> Self {
        Self::new(
            vec![
                (Family::Anthropic, FamilyRate::new(3.00, 15.00)),
                (Family::DeepSeek, DEEPSEEK_RATE),
                (Family::Mistral, FamilyRate::new(0.40, 2.00)),
                (Family::Xai, FamilyRate::new(2.00, 10.00)),
            ],
            DEEPSEEK_RATE,
        )
    }

    /// Rate for a family, falling back to the deepseek row when unknown
    pub fn rate_for(&self, family: &Family) -> FamilyRate {
        self.rows
            .iter()
            .find(|(f, _)| f == family)
            .map(|(_, rate)| *rate)
            .unwrap_or(self.fallback)
    }

    /// Cost of one invocation for a family
    pub fn cost(&self, family: &Family, input_tokens: u64, output_tokens: u64) -> f64 {
        self.rate_for(family).cost(input_tokens, output_tokens)
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::builtin()
    }
}
