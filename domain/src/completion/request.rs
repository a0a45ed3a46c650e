//! Generic completion request types

use serde::{Deserialize, Serialize};

/// Conversational role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire string for this role (identical across vendors)
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One message in a completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// A vendor-neutral completion request.
///
/// The ordered message sequence may mix roles freely; what each vendor does
/// with system-role entries is the adapter's concern. `system` is an
/// optional top-level system prompt in addition to any inline system
/// messages.
///
/// # Example
///
/// ```
/// use conclave_domain::{ChatMessage, CompletionRequest};
///
/// let request = CompletionRequest::new(vec![ChatMessage::user("2+2")])
///     .with_system("You are terse.")
///     .with_max_tokens(50);
///
/// assert_eq!(request.messages.len(), 1);
/// assert_eq!(request.max_tokens, Some(50));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Ordered conversational messages.
    pub messages: Vec<ChatMessage>,
    /// Optional top-level system prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Optional cap on generated tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Optional sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Convenience: a single user message
    pub fn from_user(content: impl Into<String>) -> Self {
        Self::new(vec![ChatMessage::user(content)])
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Append a message to the sequence
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Messages that carry conversation (user/assistant), in order
    pub fn conversational(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(|m| m.role != Role::System)
    }

    /// System-role messages, in order
    pub fn system_messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(|m| m.role == Role::System)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let request = CompletionRequest::from_user("hello")
            .with_system("be brief")
            .with_max_tokens(128)
            .with_temperature(0.2);

        assert_eq!(request.messages[0].role, Role::User);
        assert_eq!(request.system.as_deref(), Some("be brief"));
        assert_eq!(request.max_tokens, Some(128));
        assert_eq!(request.temperature, Some(0.2));
    }

    #[test]
    fn test_role_partition() {
        let request = CompletionRequest::new(vec![
            ChatMessage::system("a"),
            ChatMessage::user("b"),
            ChatMessage::assistant("c"),
            ChatMessage::system("d"),
        ]);

        let system: Vec<_> = request.system_messages().map(|m| m.content.as_str()).collect();
        let convo: Vec<_> = request.conversational().map(|m| m.content.as_str()).collect();
        assert_eq!(system, vec!["a", "d"]);
        assert_eq!(convo, vec!["b", "c"]);
    }

    #[test]
    fn test_role_wire_strings() {
        assert_eq!(Role::System.as_str(), "system");
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }
}
