//! Council types: advisor seats, deliberation rounds, approval exchanges.
//!
//! A council run is four fixed seats deliberating over a question for up to
//! three rounds, a redactor condensing the final round into one candidate,
//! and a privileged authority granting or withholding approval in up to
//! three exchanges.

pub mod approval;
pub mod parsing;
pub mod round;
pub mod rule;
pub mod slot;
