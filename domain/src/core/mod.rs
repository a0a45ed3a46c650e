//! Core domain primitives: families, questions, errors.

pub mod error;
pub mod family;
pub mod question;
