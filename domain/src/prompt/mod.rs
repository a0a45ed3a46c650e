//! Prompt templates for the council protocol.
//!
//! Every system prompt carries the concise-reasoning directive: advisors
//! are asked for short, explicit reasoning followed by a machine-parseable
//! verdict line, which is what [`crate::council::parsing`] extracts.

/// Templates for generating prompts at each stage
pub struct CouncilPrompts;

impl CouncilPrompts {
    /// Shared directive for short, structured reasoning
    pub fn concise_guidelines() -> &'static str {
        r#"Reason in at most a few short steps and state each step explicitly.
Prefer plain sentences over lists unless structure is asked for.
Do not restate the question or pad your answer with caveats."#
    }

    /// System prompt for a brainstormer seat
    pub fn advisor_system() -> String {
        format!(
            r#"You are one advisor on a four-seat council deliberating a question.
Give your own independent position. When positions from other seats are
shown, weigh them on merit and say where you stand.

{}

End your reply with exactly one line:
VERDICT: AGREE — if the shown positions and yours have converged
VERDICT: DISSENT — if material disagreement remains"#,
            Self::concise_guidelines()
        )
    }

    /// User prompt for a first-round advisor
    pub fn advisor_opening(question: &str) -> String {
        format!(
            r#"Question under deliberation:

{}

Give your position. Since this is the opening round there is nothing to
agree with yet; close with VERDICT: DISSENT unless the question is trivial."#,
            question
        )
    }

    /// User prompt for an advisor in rounds 2-3, with the prior round's positions
    pub fn advisor_followup(question: &str, round: u8, positions: &[(String, String)]) -> String {
        let mut prompt = format!(
            r#"Question under deliberation:

{}

Round {}. Positions from the previous round:
"#,
            question, round
        );

        for (seat, position) in positions {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", seat, position));
        }

        prompt.push_str(
            r#"
Restate your position, updated for anything the other seats got right.
Close with your VERDICT line."#,
        );

        prompt
    }

    /// System prompt for the redactor seat
    pub fn redactor_system() -> String {
        format!(
            r#"You are the redactor of a four-seat advisor council.
Condense the final round of positions into one candidate answer that the
council's authority can approve as-is. Keep what the seats agree on, pick
a side on what they dispute, and say so when you do.

{}"#,
            Self::concise_guidelines()
        )
    }

    /// User prompt for synthesis over the final round's positions
    pub fn synthesis(question: &str, positions: &[(String, String)]) -> String {
        let mut prompt = format!(
            r#"Question under deliberation:

{}

Final positions:
"#,
            question
        );

        for (seat, position) in positions {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", seat, position));
        }

        prompt.push_str(
            r#"
Write the single candidate answer. No meta-commentary about the council."#,
        );

        prompt
    }

    /// User prompt asking the redactor to revise a rejected candidate
    pub fn revision(candidate: &str, feedback: &str) -> String {
        format!(
            r#"Your candidate answer was not approved.

Candidate:
{}

Authority feedback:
{}

Revise the candidate to address the feedback. Reply with the revised
answer only."#,
            candidate, feedback
        )
    }

    /// System prompt for the authority's approval review
    pub fn authority_system() -> String {
        format!(
            r#"You are the final authority over an advisor council. You are shown a
candidate answer to a question. Approve it only if it is correct,
complete, and actionable as written.

{}

End your reply with exactly one line:
DECISION: APPROVE — or —
DECISION: REJECT followed by what must change"#,
            Self::concise_guidelines()
        )
    }

    /// User prompt for one approval exchange
    pub fn approval(question: &str, candidate: &str) -> String {
        format!(
            r#"Question:

{}

Candidate answer:

{}

Review and give your DECISION line."#,
            question, candidate
        )
    }

    /// System prompt for the delegated flow's sub-agent
    pub fn subagent_system() -> String {
        format!(
            r#"You execute work specified by an approved plan from an advisor
council. Carry out the next concrete step each time you are prompted and
show the work product itself, not a description of it.

{}

End your reply with exactly one line:
STATUS: COMPLETE — when the work product is finished
STATUS: CONTINUE — when more steps remain"#,
            Self::concise_guidelines()
        )
    }

    /// User prompt starting the sub-agent's execution
    pub fn subagent_opening(candidate: &str) -> String {
        format!(
            r#"Plan to execute:

{}

Begin. Close with your STATUS line."#,
            candidate
        )
    }

    /// User prompt continuing the sub-agent's execution
    pub fn subagent_continue() -> &'static str {
        "Continue with the next step. Close with your STATUS line."
    }
}
