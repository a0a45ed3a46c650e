//! Rules for deciding when a deliberation round has reached consensus

use serde::{Deserialize, Serialize};

/// Rule for aggregating advisor agreement into a round verdict
///
/// # Example
///
/// ```
/// use conclave_domain::ConsensusRule;
///
/// let rule = ConsensusRule::Unanimous;
/// assert!(rule.is_satisfied(3, 3));
/// assert!(!rule.is_satisfied(2, 3));
///
/// let relaxed = ConsensusRule::Majority;
/// assert!(relaxed.is_satisfied(2, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusRule {
    /// Every counted advisor must agree
    #[default]
    Unanimous,

    /// More than half of the counted advisors must agree
    Majority,
}

impl ConsensusRule {
    /// Check if the rule is satisfied given agreement count and total votes
    pub fn is_satisfied(&self, agreements: usize, total: usize) -> bool {
        if total == 0 {
            return false;
        }
        match self {
            ConsensusRule::Unanimous => agreements == total,
            ConsensusRule::Majority => agreements > total / 2,
        }
    }

    /// Human-readable description of this rule
    pub fn description(&self) -> &'static str {
        match self {
            ConsensusRule::Unanimous => "unanimous (all advisors must agree)",
            ConsensusRule::Majority => "majority (more than half)",
        }
    }
}

impl std::fmt::Display for ConsensusRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for ConsensusRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unanimous" => Ok(ConsensusRule::Unanimous),
            "majority" => Ok(ConsensusRule::Majority),
            _ => Err(format!(
                "Unknown consensus rule: {}. Valid: unanimous, majority",
                s
            )),
        }
    }
}
