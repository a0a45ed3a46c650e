//! Run Council use case
//!
//! Orchestrates a full council run: up to three concurrent deliberation
//! rounds, redactor synthesis, and the authority approval loop. The
//! delegated variant inserts a sub-agent execution phase between synthesis
//! and approval.
//!
//! A single seat failing mid-round does not abort the round; the seat is
//! recorded as failed and deliberation continues with the voices that
//! remain. Exhausting every round or exchange without consensus or
//! approval is a terminal outcome carried in the result, not an error.

use crate::invoker::{InvokeError, ResilientInvoker};
use crate::ports::progress::{CouncilPhase, NoProgress, ProgressNotifier};
use conclave_domain::{
    ApprovalExchange, ChatMessage, CompletionRequest, ConsensusReport, ConsensusRule,
    CouncilDecision, CouncilDelegation, CouncilPrompts, CouncilRound, Family, Question,
    SlotAssignment, SlotReply, SubAgentExchange, parse_approval, parse_completion,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur during a council run
#[derive(Error, Debug)]
pub enum RunCouncilError {
    #[error("Council requires exactly 4 advisor seats, got {0}")]
    WrongSeatCount(usize),

    #[error("Seat {slot} invoker serves {actual}, assignment expects {expected}")]
    SeatMismatch {
        slot: u8,
        actual: Family,
        expected: Family,
    },

    #[error("All advisor slots failed in round {0}")]
    AllSlotsFailed(u8),

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Authority unavailable: {0}")]
    AuthorityUnavailable(InvokeError),

    #[error("Sub-agent failed: {0}")]
    SubAgentFailed(InvokeError),

    #[error("Operation cancelled")]
    Cancelled,
}

/// The wired seats for one council run: four advisor invokers matching the
/// slot assignment, plus the privileged authority invoker.
#[derive(Debug)]
pub struct CouncilSeats {
    assignment: SlotAssignment,
    advisors: Vec<Arc<ResilientInvoker>>,
    authority: Arc<ResilientInvoker>,
}

impl CouncilSeats {
    /// Wire seats, checking each invoker against the assignment.
    pub fn new(
        assignment: SlotAssignment,
        advisors: Vec<Arc<ResilientInvoker>>,
        authority: Arc<ResilientInvoker>,
    ) -> Result<Self, RunCouncilError> {
        if advisors.len() != 4 {
            return Err(RunCouncilError::WrongSeatCount(advisors.len()));
        }
        for (slot, invoker) in assignment.slots().iter().zip(&advisors) {
            if invoker.family() != slot.family {
                return Err(RunCouncilError::SeatMismatch {
                    slot: slot.slot,
                    actual: invoker.family(),
                    expected: slot.family.clone(),
                });
            }
        }
        if authority.family() != assignment.authority {
            return Err(RunCouncilError::SeatMismatch {
                slot: 0,
                actual: authority.family(),
                expected: assignment.authority.clone(),
            });
        }
        Ok(Self {
            assignment,
            advisors,
            authority,
        })
    }

    pub fn assignment(&self) -> &SlotAssignment {
        &self.assignment
    }

    /// The slot-4 invoker: redactor during synthesis/revision, sub-agent
    /// during delegated execution (authority family, non-privileged seat).
    fn redactor(&self) -> &Arc<ResilientInvoker> {
        &self.advisors[3]
    }
}

/// Input for the RunCouncil use case
#[derive(Debug, Clone)]
pub struct RunCouncilInput {
    /// The question put before the council.
    pub question: Question,
    /// How brainstormer verdicts aggregate into round consensus.
    pub rule: ConsensusRule,
    /// Deliberation round cap.
    pub max_rounds: u8,
    /// Approval exchange cap (also bounds sub-agent steps).
    pub max_exchanges: u8,
    /// Checked between phases; cancels the run cooperatively.
    pub cancellation: CancellationToken,
}

impl RunCouncilInput {
    pub fn new(question: impl Into<Question>) -> Self {
        Self {
            question: question.into(),
            rule: ConsensusRule::default(),
            max_rounds: 3,
            max_exchanges: 3,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_rule(mut self, rule: ConsensusRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }
}

/// Use case for running a council deliberation
pub struct RunCouncilUseCase {
    seats: CouncilSeats,
}

impl RunCouncilUseCase {
    pub fn new(seats: CouncilSeats) -> Self {
        Self { seats }
    }

    /// Direct flow: the authority decides on the redactor's candidate.
    pub async fn decide(&self, input: RunCouncilInput) -> Result<CouncilDecision, RunCouncilError> {
        self.decide_with_progress(input, &NoProgress).await
    }

    /// Direct flow with progress callbacks.
    pub async fn decide_with_progress(
        &self,
        input: RunCouncilInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<CouncilDecision, RunCouncilError> {
        info!(authority = %self.seats.assignment.authority, "starting council (direct flow)");

        let consensus = self.phase_rounds(&input, progress).await?;
        let candidate = self.phase_synthesis(&input, &consensus, progress).await?;
        let (exchanges, approved_at, output) =
            self.phase_approval(&input, candidate, progress).await?;

        Ok(CouncilDecision {
            consensus,
            exchanges,
            approved_at,
            output,
        })
    }

    /// Delegated flow: a sub-agent executes the candidate, then the
    /// authority approves the sub-agent's work.
    pub async fn delegate(
        &self,
        input: RunCouncilInput,
    ) -> Result<CouncilDelegation, RunCouncilError> {
        self.delegate_with_progress(input, &NoProgress).await
    }

    /// Delegated flow with progress callbacks.
    pub async fn delegate_with_progress(
        &self,
        input: RunCouncilInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<CouncilDelegation, RunCouncilError> {
        info!(authority = %self.seats.assignment.authority, "starting council (delegated flow)");

        let consensus = self.phase_rounds(&input, progress).await?;
        let candidate = self.phase_synthesis(&input, &consensus, progress).await?;
        let (sub_exchanges, work) = self.phase_delegation(&input, &candidate, progress).await?;
        let (exchanges, approved_at, output) =
            self.phase_approval(&input, work, progress).await?;

        Ok(CouncilDelegation {
            consensus,
            sub_exchanges,
            exchanges,
            approved_at,
            output,
        })
    }

    /// Deliberation rounds: all four seats invoked concurrently, stopping
    /// at the first round that reaches consensus.
    async fn phase_rounds(
        &self,
        input: &RunCouncilInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<ConsensusReport, RunCouncilError> {
        let mut rounds: Vec<CouncilRound> = Vec::new();
        let mut prior_positions: Vec<(String, String)> = Vec::new();

        for round_no in 1..=input.max_rounds {
            self.check_cancelled(input)?;
            let phase = CouncilPhase::Round(round_no);
            progress.on_phase_start(&phase, self.seats.advisors.len());

            let mut join_set = JoinSet::new();
            for (slot, invoker) in self.seats.assignment.slots().iter().zip(&self.seats.advisors)
            {
                let invoker = Arc::clone(invoker);
                let slot = slot.clone();
                let request = advisor_request(&input.question, round_no, &prior_positions);

                join_set.spawn(async move {
                    let result = invoker.complete(&request).await;
                    (slot, result)
                });
            }

            let mut replies = Vec::new();
            while let Some(joined) = join_set.join_next().await {
                match joined {
                    Ok((slot, Ok(response))) => {
                        debug!(slot = slot.slot, family = %slot.family, "seat replied");
                        progress.on_slot_complete(&phase, slot.slot, &slot.family, true);
                        replies.push(SlotReply::success(slot.slot, slot.family, response.text));
                    }
                    Ok((slot, Err(e))) => {
                        warn!(slot = slot.slot, family = %slot.family, "seat failed: {}", e);
                        progress.on_slot_complete(&phase, slot.slot, &slot.family, false);
                        replies.push(SlotReply::failure(slot.slot, slot.family, e.to_string()));
                    }
                    Err(e) => {
                        warn!("seat task join error: {}", e);
                    }
                }
            }
            replies.sort_by_key(|r| r.slot);

            if !replies.iter().any(|r| r.success) {
                return Err(RunCouncilError::AllSlotsFailed(round_no));
            }

            let round = CouncilRound::evaluate(round_no, replies, input.rule);
            progress.on_phase_complete(&phase);
            info!(
                round = round_no,
                consensus = round.consensus_reached,
                voices = round.successful_count(),
                "round complete"
            );

            prior_positions = round
                .successful_replies()
                .map(|r| (format!("Seat {} ({})", r.slot, r.family), r.content.clone()))
                .collect();
            let reached = round.consensus_reached;
            rounds.push(round);
            if reached {
                break;
            }
        }

        Ok(ConsensusReport::from_rounds(rounds))
    }

    /// Redactor synthesis: slot 4 condenses the final round into one
    /// candidate text.
    async fn phase_synthesis(
        &self,
        input: &RunCouncilInput,
        consensus: &ConsensusReport,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, RunCouncilError> {
        self.check_cancelled(input)?;
        progress.on_phase_start(&CouncilPhase::Synthesis, 1);

        let positions: Vec<(String, String)> = consensus
            .final_positions
            .iter()
            .map(|p| (format!("Seat {} ({})", p.slot, p.family), p.position.clone()))
            .collect();

        let request = CompletionRequest::from_user(CouncilPrompts::synthesis(
            input.question.content(),
            &positions,
        ))
        .with_system(CouncilPrompts::redactor_system());

        let redactor = self.seats.redactor();
        let response = redactor
            .complete(&request)
            .await
            .map_err(|e| RunCouncilError::SynthesisFailed(e.to_string()))?;

        progress.on_phase_complete(&CouncilPhase::Synthesis);
        Ok(response.text)
    }

    /// Approval loop: submit the candidate to the authority, revising via
    /// the redactor between rejected exchanges.
    async fn phase_approval(
        &self,
        input: &RunCouncilInput,
        mut candidate: String,
        progress: &dyn ProgressNotifier,
    ) -> Result<(Vec<ApprovalExchange>, Option<u8>, String), RunCouncilError> {
        progress.on_phase_start(&CouncilPhase::Approval, input.max_exchanges as usize);
        let mut exchanges = Vec::new();

        for exchange_no in 1..=input.max_exchanges {
            self.check_cancelled(input)?;

            let request = CompletionRequest::from_user(CouncilPrompts::approval(
                input.question.content(),
                &candidate,
            ))
            .with_system(CouncilPrompts::authority_system());

            let reply = self
                .seats
                .authority
                .complete(&request)
                .await
                .map_err(RunCouncilError::AuthorityUnavailable)?;

            let (approved, feedback) = parse_approval(&reply.text);
            info!(exchange = exchange_no, approved, "authority reviewed candidate");
            exchanges.push(ApprovalExchange::new(candidate.clone(), reply.text, approved));

            if approved {
                progress.on_phase_complete(&CouncilPhase::Approval);
                return Ok((exchanges, Some(exchange_no), candidate));
            }

            if exchange_no < input.max_exchanges {
                let revision = CompletionRequest::from_user(CouncilPrompts::revision(
                    &candidate, &feedback,
                ))
                .with_system(CouncilPrompts::redactor_system());

                candidate = self
                    .seats
                    .redactor()
                    .complete(&revision)
                    .await
                    .map_err(|e| RunCouncilError::SynthesisFailed(e.to_string()))?
                    .text;
            }
        }

        progress.on_phase_complete(&CouncilPhase::Approval);
        Ok((exchanges, None, candidate))
    }

    /// Sub-agent execution: the slot-4 invoker works through the candidate
    /// step by step until it reports completion or runs out of steps.
    async fn phase_delegation(
        &self,
        input: &RunCouncilInput,
        candidate: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<(Vec<SubAgentExchange>, String), RunCouncilError> {
        progress.on_phase_start(&CouncilPhase::Delegation, input.max_exchanges as usize);
        let mut exchanges = Vec::new();
        // The chat endpoints are stateless, so the history is replayed in
        // full on every step.
        let mut history = vec![ChatMessage::user(CouncilPrompts::subagent_opening(candidate))];

        for step in 1..=input.max_exchanges {
            self.check_cancelled(input)?;

            let request = CompletionRequest::new(history.clone())
                .with_system(CouncilPrompts::subagent_system());
            let reply = self
                .seats
                .redactor()
                .complete(&request)
                .await
                .map_err(RunCouncilError::SubAgentFailed)?;

            let complete = parse_completion(&reply.text);
            debug!(step, complete, "sub-agent step settled");
            exchanges.push(SubAgentExchange::new(reply.text.clone(), complete));

            if complete {
                break;
            }
            history.push(ChatMessage::assistant(reply.text));
            history.push(ChatMessage::user(CouncilPrompts::subagent_continue()));
        }

        progress.on_phase_complete(&CouncilPhase::Delegation);
        let work = exchanges
            .last()
            .map(|e| e.reply.clone())
            .unwrap_or_default();
        Ok((exchanges, work))
    }

    fn check_cancelled(&self, input: &RunCouncilInput) -> Result<(), RunCouncilError> {
        if input.cancellation.is_cancelled() {
            Err(RunCouncilError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Build the per-seat request for one deliberation round.
fn advisor_request(
    question: &Question,
    round_no: u8,
    prior_positions: &[(String, String)],
) -> CompletionRequest {
    let user_prompt = if round_no == 1 {
        CouncilPrompts::advisor_opening(question.content())
    } else {
        CouncilPrompts::advisor_followup(question.content(), round_no, prior_positions)
    };
    CompletionRequest::from_user(user_prompt).with_system(CouncilPrompts::advisor_system())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::RetryPolicy;
    use crate::ports::vendor_adapter::{VendorAdapter, VendorError};
    use async_trait::async_trait;
    use conclave_domain::{CompletionResponse, UsageLedger};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Adapter replaying a script of replies (or failures) in call order.
    struct ScriptedAdapter {
        family: Family,
        script: Mutex<VecDeque<Result<String, String>>>,
        fallback: String,
    }

    impl ScriptedAdapter {
        fn new(family: Family, script: Vec<Result<&str, &str>>) -> Arc<Self> {
            Arc::new(Self {
                family,
                script: Mutex::new(
                    script
                        .into_iter()
                        .map(|r| r.map(String::from).map_err(String::from))
                        .collect(),
                ),
                fallback: "VERDICT: AGREE".to_string(),
            })
        }

        /// An adapter that always replies the same way.
        fn constant(family: Family, reply: &str) -> Arc<Self> {
            Arc::new(Self {
                family,
                script: Mutex::new(VecDeque::new()),
                fallback: reply.to_string(),
            })
        }
    }

    #[async_trait]
    impl VendorAdapter for ScriptedAdapter {
        fn family(&self) -> Family {
            self.family.clone()
        }

        async fn invoke(
            &self,
            _request: &CompletionRequest,
        ) -> Result<CompletionResponse, VendorError> {
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(Ok(text)) => Ok(CompletionResponse::new(text, "scripted", self.family())),
                Some(Err(message)) => Err(VendorError::Network(message)),
                None => Ok(CompletionResponse::new(
                    self.fallback.clone(),
                    "scripted",
                    self.family(),
                )),
            }
        }
    }

    fn wrap(adapter: Arc<ScriptedAdapter>, ledger: &Arc<UsageLedger>) -> Arc<ResilientInvoker> {
        // One attempt keeps scripted failures terminal instead of retried.
        let policy = RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::default()
        };
        Arc::new(ResilientInvoker::new(
            adapter,
            "scripted",
            policy,
            Arc::clone(ledger),
        ))
    }

    struct SeatScripts {
        slot1: Arc<ScriptedAdapter>,
        slot2: Arc<ScriptedAdapter>,
        slot3: Arc<ScriptedAdapter>,
        slot4: Arc<ScriptedAdapter>,
        authority: Arc<ScriptedAdapter>,
    }

    fn seats(scripts: SeatScripts) -> CouncilSeats {
        let ledger = Arc::new(UsageLedger::default());
        let assignment = SlotAssignment::for_authority(Family::Anthropic).unwrap();
        // Assignment order for an anthropic authority: deepseek, xai,
        // mistral, anthropic.
        let advisors = vec![
            wrap(scripts.slot1, &ledger),
            wrap(scripts.slot2, &ledger),
            wrap(scripts.slot3, &ledger),
            wrap(scripts.slot4, &ledger),
        ];
        let authority = wrap(scripts.authority, &ledger);
        CouncilSeats::new(assignment, advisors, authority).unwrap()
    }

    fn agreeing_seats(authority_script: Vec<Result<&str, &str>>) -> CouncilSeats {
        seats(SeatScripts {
            slot1: ScriptedAdapter::constant(Family::DeepSeek, "VERDICT: AGREE"),
            slot2: ScriptedAdapter::constant(Family::Xai, "VERDICT: AGREE"),
            slot3: ScriptedAdapter::constant(Family::Mistral, "VERDICT: AGREE"),
            slot4: ScriptedAdapter::constant(Family::Anthropic, "candidate answer"),
            authority: if authority_script.is_empty() {
                ScriptedAdapter::constant(Family::Anthropic, "DECISION: APPROVE")
            } else {
                ScriptedAdapter::new(Family::Anthropic, authority_script)
            },
        })
    }

    #[tokio::test]
    async fn test_consensus_first_round_and_first_approval() {
        let use_case = RunCouncilUseCase::new(agreeing_seats(vec![]));

        let decision = use_case
            .decide(RunCouncilInput::new("Should we shard?"))
            .await
            .unwrap();

        assert_eq!(decision.consensus.rounds.len(), 1);
        assert_eq!(decision.consensus.reached_at, Some(1));
        assert_eq!(decision.exchanges.len(), 1);
        assert_eq!(decision.approved_at, Some(1));
        assert!(decision.is_approved());
        assert_eq!(decision.output, "candidate answer");
    }

    #[tokio::test]
    async fn test_dissent_runs_all_three_rounds() {
        let use_case = RunCouncilUseCase::new(seats(SeatScripts {
            slot1: ScriptedAdapter::constant(Family::DeepSeek, "VERDICT: DISSENT"),
            slot2: ScriptedAdapter::constant(Family::Xai, "VERDICT: AGREE"),
            slot3: ScriptedAdapter::constant(Family::Mistral, "VERDICT: AGREE"),
            slot4: ScriptedAdapter::constant(Family::Anthropic, "notes"),
            authority: ScriptedAdapter::constant(Family::Anthropic, "DECISION: APPROVE"),
        }));

        let decision = use_case
            .decide(RunCouncilInput::new("q"))
            .await
            .unwrap();

        assert_eq!(decision.consensus.rounds.len(), 3);
        assert_eq!(decision.consensus.reached_at, None);
        for round in &decision.consensus.rounds {
            assert!(!round.consensus_reached);
        }
        // Proceeds with best-available positions: synthesis and approval
        // still happen.
        assert!(decision.is_approved());
    }

    #[tokio::test]
    async fn test_majority_rule_reaches_consensus_despite_dissent() {
        let use_case = RunCouncilUseCase::new(seats(SeatScripts {
            slot1: ScriptedAdapter::constant(Family::DeepSeek, "VERDICT: DISSENT"),
            slot2: ScriptedAdapter::constant(Family::Xai, "VERDICT: AGREE"),
            slot3: ScriptedAdapter::constant(Family::Mistral, "VERDICT: AGREE"),
            slot4: ScriptedAdapter::constant(Family::Anthropic, "notes"),
            authority: ScriptedAdapter::constant(Family::Anthropic, "DECISION: APPROVE"),
        }));

        let decision = use_case
            .decide(RunCouncilInput::new("q").with_rule(ConsensusRule::Majority))
            .await
            .unwrap();

        assert_eq!(decision.consensus.reached_at, Some(1));
    }

    #[tokio::test]
    async fn test_failed_seat_does_not_abort_the_round() {
        let use_case = RunCouncilUseCase::new(seats(SeatScripts {
            slot1: ScriptedAdapter::new(
                Family::DeepSeek,
                vec![Err("connection reset"), Ok("VERDICT: AGREE")],
            ),
            slot2: ScriptedAdapter::constant(Family::Xai, "VERDICT: AGREE"),
            slot3: ScriptedAdapter::constant(Family::Mistral, "VERDICT: AGREE"),
            slot4: ScriptedAdapter::constant(Family::Anthropic, "notes"),
            authority: ScriptedAdapter::constant(Family::Anthropic, "DECISION: APPROVE"),
        }));

        let decision = use_case
            .decide(RunCouncilInput::new("q"))
            .await
            .unwrap();

        // Round 1 degrades (slot 1 failed, remaining voices agree) and
        // consensus is reached with the surviving seats.
        let round1 = &decision.consensus.rounds[0];
        assert!(!round1.replies[0].success);
        assert!(round1.replies[0].error.is_some());
        assert!(round1.consensus_reached);
        assert_eq!(decision.consensus.reached_at, Some(1));
    }

    #[tokio::test]
    async fn test_all_seats_failing_aborts_the_run() {
        let failing = |family: Family| {
            ScriptedAdapter::new(family, vec![Err("down"), Err("down"), Err("down")])
        };
        let use_case = RunCouncilUseCase::new(seats(SeatScripts {
            slot1: failing(Family::DeepSeek),
            slot2: failing(Family::Xai),
            slot3: failing(Family::Mistral),
            slot4: failing(Family::Anthropic),
            authority: ScriptedAdapter::constant(Family::Anthropic, "DECISION: APPROVE"),
        }));

        let err = use_case.decide(RunCouncilInput::new("q")).await.unwrap_err();
        assert!(matches!(err, RunCouncilError::AllSlotsFailed(1)));
    }

    #[tokio::test]
    async fn test_rejections_exhaust_three_exchanges() {
        let use_case = RunCouncilUseCase::new(agreeing_seats(vec![
            Ok("DECISION: REJECT — too vague"),
            Ok("DECISION: REJECT — still too vague"),
            Ok("DECISION: REJECT — no"),
        ]));

        let decision = use_case
            .decide(RunCouncilInput::new("q"))
            .await
            .unwrap();

        assert_eq!(decision.exchanges.len(), 3);
        assert_eq!(decision.approved_at, None);
        assert!(!decision.is_approved());
        for exchange in &decision.exchanges {
            assert!(!exchange.approved);
        }
    }

    #[tokio::test]
    async fn test_revised_candidate_wins_second_exchange() {
        let use_case = RunCouncilUseCase::new(seats(SeatScripts {
            slot1: ScriptedAdapter::constant(Family::DeepSeek, "VERDICT: AGREE"),
            slot2: ScriptedAdapter::constant(Family::Xai, "VERDICT: AGREE"),
            slot3: ScriptedAdapter::constant(Family::Mistral, "VERDICT: AGREE"),
            // Round reply, synthesis, then the revision.
            slot4: ScriptedAdapter::new(
                Family::Anthropic,
                vec![Ok("notes"), Ok("draft 1"), Ok("draft 2")],
            ),
            authority: ScriptedAdapter::new(
                Family::Anthropic,
                vec![Ok("DECISION: REJECT — tighten it"), Ok("DECISION: APPROVE")],
            ),
        }));

        let decision = use_case
            .decide(RunCouncilInput::new("q"))
            .await
            .unwrap();

        assert_eq!(decision.approved_at, Some(2));
        assert_eq!(decision.exchanges[0].candidate, "draft 1");
        assert_eq!(decision.exchanges[1].candidate, "draft 2");
        assert_eq!(decision.output, "draft 2");
    }

    #[tokio::test]
    async fn test_delegated_flow_runs_subagent_before_approval() {
        let use_case = RunCouncilUseCase::new(seats(SeatScripts {
            slot1: ScriptedAdapter::constant(Family::DeepSeek, "VERDICT: AGREE"),
            slot2: ScriptedAdapter::constant(Family::Xai, "VERDICT: AGREE"),
            slot3: ScriptedAdapter::constant(Family::Mistral, "VERDICT: AGREE"),
            // Round reply, synthesis, then two sub-agent steps.
            slot4: ScriptedAdapter::new(
                Family::Anthropic,
                vec![
                    Ok("notes"),
                    Ok("the plan"),
                    Ok("half done. STATUS: CONTINUE"),
                    Ok("all done. STATUS: COMPLETE"),
                ],
            ),
            authority: ScriptedAdapter::constant(Family::Anthropic, "DECISION: APPROVE"),
        }));

        let delegation = use_case
            .delegate(RunCouncilInput::new("q"))
            .await
            .unwrap();

        assert_eq!(delegation.sub_exchanges.len(), 2);
        assert!(!delegation.sub_exchanges[0].complete);
        assert!(delegation.sub_exchanges[1].complete);
        assert!(delegation.execution_completed());
        assert_eq!(delegation.exchanges.len(), 1);
        assert_eq!(delegation.approved_at, Some(1));
        assert_eq!(delegation.output, "all done. STATUS: COMPLETE");
    }

    #[tokio::test]
    async fn test_subagent_step_cap() {
        let use_case = RunCouncilUseCase::new(seats(SeatScripts {
            slot1: ScriptedAdapter::constant(Family::DeepSeek, "VERDICT: AGREE"),
            slot2: ScriptedAdapter::constant(Family::Xai, "VERDICT: AGREE"),
            slot3: ScriptedAdapter::constant(Family::Mistral, "VERDICT: AGREE"),
            slot4: ScriptedAdapter::constant(Family::Anthropic, "STATUS: CONTINUE"),
            authority: ScriptedAdapter::constant(Family::Anthropic, "DECISION: APPROVE"),
        }));

        let delegation = use_case
            .delegate(RunCouncilInput::new("q"))
            .await
            .unwrap();

        // Never reports complete: capped at three steps, last work product
        // still goes to approval.
        assert_eq!(delegation.sub_exchanges.len(), 3);
        assert!(!delegation.execution_completed());
        assert!(delegation.is_approved());
    }

    #[tokio::test]
    async fn test_seat_mismatch_is_rejected_at_wiring() {
        let ledger = Arc::new(UsageLedger::default());
        let assignment = SlotAssignment::for_authority(Family::Anthropic).unwrap();
        // Slot 1 should be deepseek; give it xai instead.
        let advisors = vec![
            wrap(ScriptedAdapter::constant(Family::Xai, "x"), &ledger),
            wrap(ScriptedAdapter::constant(Family::Xai, "x"), &ledger),
            wrap(ScriptedAdapter::constant(Family::Mistral, "x"), &ledger),
            wrap(ScriptedAdapter::constant(Family::Anthropic, "x"), &ledger),
        ];
        let authority = wrap(ScriptedAdapter::constant(Family::Anthropic, "x"), &ledger);

        let err = CouncilSeats::new(assignment, advisors, authority).unwrap_err();
        assert!(matches!(err, RunCouncilError::SeatMismatch { slot: 1, .. }));
    }

    #[tokio::test]
    async fn test_cancelled_token_stops_the_run() {
        let use_case = RunCouncilUseCase::new(agreeing_seats(vec![]));
        let token = CancellationToken::new();
        token.cancel();

        let err = use_case
            .decide(RunCouncilInput::new("q").with_cancellation(token))
            .await
            .unwrap_err();

        assert!(matches!(err, RunCouncilError::Cancelled));
    }
}
