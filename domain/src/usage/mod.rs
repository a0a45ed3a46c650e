//! Usage and cost accounting.
//!
//! The ledger is append-only: every completed invocation adds one immutable
//! [`UsageRecord`](ledger::UsageRecord), priced from a static
//! [`PricingTable`](pricing::PricingTable) injected at construction.

pub mod ledger;
pub mod pricing;
