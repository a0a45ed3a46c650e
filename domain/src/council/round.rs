//! Deliberation round records.
//!
//! A round is one parallel invocation of all four seats plus a
//! reached/not-reached determination over the brainstormer verdicts.

use super::parsing::parse_agreement;
use super::rule::ConsensusRule;
use crate::core::family::Family;
use serde::{Deserialize, Serialize};

/// Reply from a single seat within one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotReply {
    /// Seat number (1-4).
    pub slot: u8,
    /// Family that held the seat.
    pub family: Family,
    /// The reply content (empty on failure).
    pub content: String,
    /// Whether the seat produced a reply.
    pub success: bool,
    /// Error message if the seat failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SlotReply {
    /// Creates a successful reply from a seat.
    pub fn success(slot: u8, family: Family, content: impl Into<String>) -> Self {
        Self {
            slot,
            family,
            content: content.into(),
            success: true,
            error: None,
        }
    }

    /// Creates a failed reply for a seat that could not respond.
    pub fn failure(slot: u8, family: Family, error: impl Into<String>) -> Self {
        Self {
            slot,
            family,
            content: String::new(),
            success: false,
            error: Some(error.into()),
        }
    }

    /// Whether this reply came from a brainstormer seat (slots 1-3)
    pub fn is_brainstormer(&self) -> bool {
        self.slot <= 3
    }
}

/// Minimum successful brainstormer replies for a round verdict to count.
/// Below this the round cannot reach consensus regardless of rule.
const MIN_COUNTED_VOICES: usize = 2;

/// One deliberation round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilRound {
    /// Round number (1-indexed, at most 3).
    pub round: u8,
    /// Replies from all seats, in slot order.
    pub replies: Vec<SlotReply>,
    /// Whether this round reached consensus.
    pub consensus_reached: bool,
}

impl CouncilRound {
    /// Build a round record, evaluating consensus over the parsed
    /// agreement verdicts of the successful brainstormer replies.
    pub fn evaluate(round: u8, replies: Vec<SlotReply>, rule: ConsensusRule) -> Self {
        let counted: Vec<_> = replies
            .iter()
            .filter(|r| r.is_brainstormer() && r.success)
            .collect();
        let agreements = counted.iter().filter(|r| parse_agreement(&r.content)).count();

        let consensus_reached =
            counted.len() >= MIN_COUNTED_VOICES && rule.is_satisfied(agreements, counted.len());

        Self {
            round,
            replies,
            consensus_reached,
        }
    }

    /// Number of seats that produced a reply
    pub fn successful_count(&self) -> usize {
        self.replies.iter().filter(|r| r.success).count()
    }

    /// Replies that succeeded, in slot order
    pub fn successful_replies(&self) -> impl Iterator<Item = &SlotReply> {
        self.replies.iter().filter(|r| r.success)
    }
}

/// Final position of one seat after deliberation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotPosition {
    pub slot: u8,
    pub family: Family,
    pub position: String,
}

/// The complete deliberation history of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusReport {
    /// All rounds, in order (at most 3).
    pub rounds: Vec<CouncilRound>,
    /// Round at which consensus was reached, if any.
    pub reached_at: Option<u8>,
    /// Final per-slot positions, from the last round's successful replies.
    pub final_positions: Vec<SlotPosition>,
}

impl ConsensusReport {
    /// Assemble the report from the recorded rounds.
    pub fn from_rounds(rounds: Vec<CouncilRound>) -> Self {
        let reached_at = rounds
            .iter()
            .find(|r| r.consensus_reached)
            .map(|r| r.round);

        let final_positions = rounds
            .last()
            .map(|round| {
                round
                    .successful_replies()
                    .map(|r| SlotPosition {
                        slot: r.slot,
                        family: r.family.clone(),
                        position: r.content.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            rounds,
            reached_at,
            final_positions,
        }
    }

    /// Whether any round reached consensus
    pub fn reached(&self) -> bool {
        self.reached_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agree(slot: u8, family: Family) -> SlotReply {
        SlotReply::success(slot, family, "VERDICT: AGREE — positions converge")
    }

    fn dissent(slot: u8, family: Family) -> SlotReply {
        SlotReply::success(slot, family, "VERDICT: DISSENT — slot 1 is wrong")
    }

    #[test]
    fn test_unanimous_round_reaches_consensus() {
        let round = CouncilRound::evaluate(
            1,
            vec![
                agree(1, Family::DeepSeek),
                agree(2, Family::Xai),
                agree(3, Family::Mistral),
                SlotReply::success(4, Family::Anthropic, "synthesis notes"),
            ],
            ConsensusRule::Unanimous,
        );

        assert!(round.consensus_reached);
        assert_eq!(round.successful_count(), 4);
    }

    #[test]
    fn test_single_dissent_blocks_unanimous() {
        let round = CouncilRound::evaluate(
            1,
            vec![
                agree(1, Family::DeepSeek),
                dissent(2, Family::Xai),
                agree(3, Family::Mistral),
            ],
            ConsensusRule::Unanimous,
        );

        assert!(!round.consensus_reached);
    }

    #[test]
    fn test_majority_rule_tolerates_dissent() {
        let round = CouncilRound::evaluate(
            2,
            vec![
                agree(1, Family::DeepSeek),
                dissent(2, Family::Xai),
                agree(3, Family::Mistral),
            ],
            ConsensusRule::Majority,
        );

        assert!(round.consensus_reached);
    }

    #[test]
    fn test_redactor_verdict_is_not_counted() {
        // Slot 4 dissenting must not block a unanimous brainstormer round.
        let round = CouncilRound::evaluate(
            1,
            vec![
                agree(1, Family::DeepSeek),
                agree(2, Family::Xai),
                agree(3, Family::Mistral),
                dissent(4, Family::Anthropic),
            ],
            ConsensusRule::Unanimous,
        );

        assert!(round.consensus_reached);
    }

    #[test]
    fn test_too_few_voices_cannot_reach_consensus() {
        let round = CouncilRound::evaluate(
            1,
            vec![
                agree(1, Family::DeepSeek),
                SlotReply::failure(2, Family::Xai, "timed out"),
                SlotReply::failure(3, Family::Mistral, "timed out"),
            ],
            ConsensusRule::Unanimous,
        );

        assert!(!round.consensus_reached);
    }

    #[test]
    fn test_report_marks_first_consensus_round() {
        let rounds = vec![
            CouncilRound::evaluate(
                1,
                vec![agree(1, Family::DeepSeek), dissent(2, Family::Xai)],
                ConsensusRule::Unanimous,
            ),
            CouncilRound::evaluate(
                2,
                vec![agree(1, Family::DeepSeek), agree(2, Family::Xai)],
                ConsensusRule::Unanimous,
            ),
        ];
        let report = ConsensusReport::from_rounds(rounds);

        assert_eq!(report.reached_at, Some(2));
        assert!(report.reached());
        assert!(!report.rounds[0].consensus_reached);
        assert!(report.rounds[1].consensus_reached);
    }

    #[test]
    fn test_report_positions_come_from_last_round() {
        let rounds = vec![CouncilRound::evaluate(
            1,
            vec![
                agree(1, Family::DeepSeek),
                SlotReply::failure(2, Family::Xai, "boom"),
            ],
            ConsensusRule::Majority,
        )];
        let report = ConsensusReport::from_rounds(rounds);

        assert_eq!(report.final_positions.len(), 1);
        assert_eq!(report.final_positions[0].slot, 1);
    }

    #[test]
    fn test_exhausted_report_has_null_reached_at() {
        let rounds = vec![
            CouncilRound::evaluate(
                1,
                vec![dissent(1, Family::DeepSeek), dissent(2, Family::Xai)],
                ConsensusRule::Unanimous,
            ),
            CouncilRound::evaluate(
                2,
                vec![dissent(1, Family::DeepSeek), dissent(2, Family::Xai)],
                ConsensusRule::Unanimous,
            ),
            CouncilRound::evaluate(
                3,
                vec![dissent(1, Family::DeepSeek), dissent(2, Family::Xai)],
                ConsensusRule::Unanimous,
            ),
        ];
        let report = ConsensusReport::from_rounds(rounds);

        assert_eq!(report.reached_at, None);
        assert_eq!(report.rounds.len(), 3);
    }
}
