//! Progress notification port
//!
//! Defines the interface for reporting progress during a council run.

use conclave_domain::Family;

/// Phase of a council run, for progress display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouncilPhase {
    /// Deliberation round n (1-3).
    Round(u8),
    /// Redactor synthesis.
    Synthesis,
    /// Sub-agent execution (delegated flow only).
    Delegation,
    /// Authority approval exchanges.
    Approval,
}

impl std::fmt::Display for CouncilPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CouncilPhase::Round(n) => write!(f, "round {}", n),
            CouncilPhase::Synthesis => write!(f, "synthesis"),
            CouncilPhase::Delegation => write!(f, "delegation"),
            CouncilPhase::Approval => write!(f, "approval"),
        }
    }
}

/// Callback for progress updates during a council run
///
/// Implementations live outside this crate and can display progress in
/// various ways (console, logs, a UI).
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: &CouncilPhase, total_tasks: usize);

    /// Called when a seat settles within a phase
    fn on_slot_complete(&self, phase: &CouncilPhase, slot: u8, family: &Family, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &CouncilPhase);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &CouncilPhase, _total_tasks: usize) {}
    fn on_slot_complete(&self, _phase: &CouncilPhase, _slot: u8, _family: &Family, _success: bool) {
    }
    fn on_phase_complete(&self, _phase: &CouncilPhase) {}
}
