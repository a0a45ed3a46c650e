//! Application layer for conclave
//!
//! This crate contains the use cases and the ports they depend on. The
//! resilient invoker wraps one vendor adapter with retry, backoff and
//! per-attempt timeouts; the council use case orchestrates deliberation
//! rounds, synthesis and the authority approval loop on top of it.
//! Adapter implementations live in the infrastructure layer.

pub mod invoker;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use invoker::{InvokeError, ResilientInvoker, RetryPolicy};
pub use ports::{
    progress::{CouncilPhase, NoProgress, ProgressNotifier},
    vendor_adapter::{VendorAdapter, VendorError},
};
pub use use_cases::run_council::{
    CouncilSeats, RunCouncilError, RunCouncilInput, RunCouncilUseCase,
};
