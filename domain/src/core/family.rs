//! Family value object identifying a vendor backend

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Vendor families known to conclave (Value Object)
///
/// A family is a logical vendor identifier with its own wire protocol and
/// pricing row. Unknown identifiers parse into `Custom` so that routing and
/// accounting keep working for families that have no real adapter yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Family {
    Anthropic,
    DeepSeek,
    Mistral,
    Xai,
    /// A family with no built-in adapter; served by the echo fallback.
    Custom(String),
}

impl Family {
    /// Get the string identifier for this family
    pub fn as_str(&self) -> &str {
        match self {
            Family::Anthropic => "anthropic",
            Family::DeepSeek => "deepseek",
            Family::Mistral => "mistral",
            Family::Xai => "xai",
            Family::Custom(s) => s,
        }
    }

    /// The families with a built-in adapter and catalog entry
    pub fn known_families() -> Vec<Family> {
        vec![
            Family::Anthropic,
            Family::DeepSeek,
            Family::Mistral,
            Family::Xai,
        ]
    }

    /// Check if this family speaks the OpenAI-compatible chat protocol
    pub fn is_openai_compatible(&self) -> bool {
        matches!(self, Family::DeepSeek | Family::Mistral | Family::Xai)
    }

    /// Check if this family is served by the echo fallback adapter
    pub fn is_custom(&self) -> bool {
        matches!(self, Family::Custom(_))
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Family {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "anthropic" => Family::Anthropic,
            "deepseek" => Family::DeepSeek,
            "mistral" => Family::Mistral,
            "xai" => Family::Xai,
            other => Family::Custom(other.to_string()),
        })
    }
}

impl Serialize for Family {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Family {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap())
    }
}
