//! Verdict extraction from free-form model responses.
//!
//! These functions pull structured decisions out of the text the council
//! prompts ask for. They are pure domain logic: no I/O, no session state,
//! just keyword matching with conservative defaults.
//!
//! | Function | Use | Keywords |
//! |----------|-----|----------|
//! | [`parse_agreement`] | Advisor round verdicts | AGREE / DISSENT |
//! | [`parse_approval`] | Authority approval | APPROVE / REJECT |
//! | [`parse_completion`] | Sub-agent progress | COMPLETE / CONTINUE |

/// Parse an advisor reply for an agreement verdict.
///
/// Conservative: an ambiguous reply counts as dissent, so consensus is
/// never declared on silence.
pub fn parse_agreement(response: &str) -> bool {
    let upper = response.to_uppercase();

    let agrees = upper.contains("AGREE")
        && !upper.contains("DISAGREE")
        && !upper.contains("DON'T AGREE")
        && !upper.contains("DO NOT AGREE");

    let dissents = upper.contains("DISSENT") || upper.contains("DISAGREE");

    agrees && !dissents
}

/// Parse an authority reply for approval status and feedback.
///
/// Checks for explicit APPROVE/REJECT keywords. Conservative: defaults to
/// rejection when ambiguous.
///
/// # Returns
///
/// `(approved, full_response_as_feedback)`
pub fn parse_approval(response: &str) -> (bool, String) {
    let upper = response.to_uppercase();

    let approved = upper.contains("APPROVE")
        && !upper.contains("NOT APPROVE")
        && !upper.contains("DON'T APPROVE")
        && !upper.contains("CANNOT APPROVE");

    let rejected = upper.contains("REJECT")
        || upper.contains("REVISE")
        || upper.contains("NOT APPROVE")
        || upper.contains("CANNOT APPROVE");

    (approved && !rejected, response.to_string())
}

/// Parse a sub-agent reply for a completion marker.
///
/// `INCOMPLETE` and `NOT COMPLETE` negate; otherwise any `COMPLETE`
/// counts as done.
pub fn parse_completion(response: &str) -> bool {
    let upper = response.to_uppercase();

    upper.contains("COMPLETE")
        && !upper.contains("INCOMPLETE")
        && !upper.contains("NOT COMPLETE")
}
