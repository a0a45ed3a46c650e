//! Approval exchange records and flow results.
//!
//! Both flows end in an approval loop against the authority: the direct
//! flow submits the redactor's candidate, the delegated flow first has a
//! sub-agent execute the candidate and submits its work instead. Running
//! out of exchanges is a terminal outcome, not an error.

use super::round::ConsensusReport;
use serde::{Deserialize, Serialize};

/// One round-trip between a candidate output and the authority
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalExchange {
    /// The work-in-progress submitted for approval.
    pub candidate: String,
    /// The authority's full reply.
    pub authority_reply: String,
    /// Whether the authority approved.
    pub approved: bool,
}

impl ApprovalExchange {
    pub fn new(
        candidate: impl Into<String>,
        authority_reply: impl Into<String>,
        approved: bool,
    ) -> Self {
        Self {
            candidate: candidate.into(),
            authority_reply: authority_reply.into(),
            approved,
        }
    }
}

/// One step of the sub-agent's guided execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubAgentExchange {
    /// The sub-agent's reply for this step.
    pub reply: String,
    /// Whether the sub-agent reported its work complete.
    pub complete: bool,
}

impl SubAgentExchange {
    pub fn new(reply: impl Into<String>, complete: bool) -> Self {
        Self {
            reply: reply.into(),
            complete,
        }
    }
}

/// Result of a direct-flow run: the authority decides on the redactor's
/// candidate itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilDecision {
    /// Deliberation history.
    pub consensus: ConsensusReport,
    /// Approval exchanges, in order (at most 3).
    pub exchanges: Vec<ApprovalExchange>,
    /// Exchange at which approval was granted, if any.
    pub approved_at: Option<u8>,
    /// The final output (last candidate, approved or not).
    pub output: String,
}

impl CouncilDecision {
    pub fn is_approved(&self) -> bool {
        self.approved_at.is_some()
    }
}

/// Result of a delegated-flow run: a sub-agent executes the candidate and
/// the authority approves the sub-agent's work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilDelegation {
    /// Deliberation history.
    pub consensus: ConsensusReport,
    /// The sub-agent's execution steps, preceding the approval loop.
    pub sub_exchanges: Vec<SubAgentExchange>,
    /// Approval exchanges, in order (at most 3).
    pub exchanges: Vec<ApprovalExchange>,
    /// Exchange at which approval was granted, if any.
    pub approved_at: Option<u8>,
    /// The final output (the sub-agent's last work product).
    pub output: String,
}

impl CouncilDelegation {
    pub fn is_approved(&self) -> bool {
        self.approved_at.is_some()
    }

    /// Whether the sub-agent reported completion before the approval loop
    pub fn execution_completed(&self) -> bool {
        self.sub_exchanges.last().is_some_and(|e| e.complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_report() -> ConsensusReport {
        ConsensusReport::from_rounds(vec![])
    }

    #[test]
    fn test_decision_approval_helpers() {
        let decision = CouncilDecision {
            consensus: empty_report(),
            exchanges: vec![
                ApprovalExchange::new("draft 1", "DECISION: REJECT", false),
                ApprovalExchange::new("draft 2", "DECISION: APPROVE", true),
            ],
            approved_at: Some(2),
            output: "draft 2".to_string(),
        };

        assert!(decision.is_approved());
        assert_eq!(decision.exchanges.len(), 2);
    }

    #[test]
    fn test_exhausted_decision_is_not_approved() {
        let decision = CouncilDecision {
            consensus: empty_report(),
            exchanges: vec![ApprovalExchange::new("draft", "DECISION: REJECT", false); 3],
            approved_at: None,
            output: "draft".to_string(),
        };

        assert!(!decision.is_approved());
    }

    #[test]
    fn test_delegation_execution_completed() {
        let delegation = CouncilDelegation {
            consensus: empty_report(),
            sub_exchanges: vec![
                SubAgentExchange::new("step 1", false),
                SubAgentExchange::new("done. STATUS: COMPLETE", true),
            ],
            exchanges: vec![ApprovalExchange::new("done", "APPROVE", true)],
            approved_at: Some(1),
            output: "done. STATUS: COMPLETE".to_string(),
        };

        assert!(delegation.execution_completed());
        assert!(delegation.is_approved());
    }
}
