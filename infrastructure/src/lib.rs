//! Infrastructure layer for conclave
//!
//! This crate contains the adapters that implement the ports defined in
//! the application layer: one HTTP adapter per vendor wire protocol, the
//! provider router that turns family names into configured invokers,
//! configuration file loading, and the JSONL usage log.

pub mod config;
pub mod logging;
pub mod router;
pub mod vendors;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, FileConfig, FileFamilyConfig};
pub use logging::JsonlUsageLog;
pub use router::{FamilySummary, ProviderRouter, RouterError};
pub use vendors::{
    anthropic::AnthropicAdapter, echo::EchoAdapter, openai_compat::OpenAiCompatAdapter,
};
