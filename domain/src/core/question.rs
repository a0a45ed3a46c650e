//! Question value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A question put before the council (Value Object)
///
/// The content is guaranteed non-empty: a blank question would send four
/// seats deliberating over nothing. Fallible input goes through
/// [`Question::parse`]; the `From` impls are for literals and panic on
/// blank input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    content: String,
}

impl Question {
    /// Validate and wrap caller-supplied content.
    pub fn parse(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::InvalidQuestion(
                "content is empty or whitespace".to_string(),
            ));
        }
        Ok(Self { content })
    }

    /// Get the question content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl From<&str> for Question {
    /// # Panics
    /// Panics if `s` is empty or only whitespace
    fn from(s: &str) -> Self {
        match Question::parse(s) {
            Ok(q) => q,
            Err(e) => panic!("{}", e),
        }
    }
}

impl From<String> for Question {
    /// # Panics
    /// Panics if `s` is empty or only whitespace
    fn from(s: String) -> Self {
        match Question::parse(s) {
            Ok(q) => q,
            Err(e) => panic!("{}", e),
        }
    }
}
