//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid slot assignment: {0}")]
    InvalidAssignment(String),

    #[error("All advisor slots failed to respond")]
    AllSlotsFailed,

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failure() {
        let e = DomainError::InvalidAssignment("slot 3 shares the authority family".into());
        assert!(e.to_string().contains("slot 3"));
        assert_eq!(
            DomainError::AllSlotsFailed.to_string(),
            "All advisor slots failed to respond"
        );
    }

    #[test]
    fn test_only_cancelled_reports_cancellation() {
        assert!(DomainError::Cancelled.is_cancelled());
        assert!(!DomainError::AllSlotsFailed.is_cancelled());
        assert!(!DomainError::InvalidQuestion("blank".into()).is_cancelled());
    }
}
