//! Provider configuration types (vendor-neutral, injected at construction).
//!
//! These types define the shape of per-family settings without depending on
//! any serialization format. The catalog is loaded once and read-only
//! thereafter; callers that want different defaults construct their own
//! catalog instead of mutating a global.

use crate::core::family::Family;

/// Static configuration for one family.
#[derive(Debug, Clone)]
pub struct FamilyProfile {
    /// The family this profile configures.
    pub family: Family,
    /// Models the family is allowed to serve.
    pub models: Vec<String>,
    /// Model used when the caller does not override one.
    pub default_model: String,
    /// Whether invoker construction must be able to resolve an API key.
    pub requires_api_key: bool,
    /// Base URL for the vendor endpoint.
    pub base_url: String,
}

impl FamilyProfile {
    pub fn new(
        family: Family,
        models: Vec<&str>,
        default_model: &str,
        requires_api_key: bool,
        base_url: &str,
    ) -> Self {
        Self {
            family,
            models: models.into_iter().map(String::from).collect(),
            default_model: default_model.to_string(),
            requires_api_key,
            base_url: base_url.to_string(),
        }
    }
}

/// Read-only catalog of family profiles.
#[derive(Debug, Clone)]
pub struct FamilyCatalog {
    profiles: Vec<FamilyProfile>,
}

impl FamilyCatalog {
    pub fn new(profiles: Vec<FamilyProfile>) -> Self {
        Self { profiles }
    }

    /// The catalog shipped with conclave: the four known families.
    pub fn builtin() -> Self {
        Self::new(vec![
            FamilyProfile::new(
                Family::Anthropic,
                vec![
                    "claude-sonnet-4-20250514",
                    "claude-opus-4-1-20250805",
                    "claude-3-5-haiku-20241022",
                ],
                "claude-sonnet-4-20250514",
                true,
                "https://api.anthropic.com",
            ),
            FamilyProfile::new(
                Family::DeepSeek,
                vec!["deepseek-chat", "deepseek-reasoner"],
                "deepseek-chat",
                true,
                "https://api.deepseek.com",
            ),
            FamilyProfile::new(
                Family::Mistral,
                vec!["mistral-large-latest", "mistral-small-latest"],
                "mistral-large-latest",
                true,
                "https://api.mistral.ai/v1",
            ),
            FamilyProfile::new(
                Family::Xai,
                vec!["grok-3", "grok-3-mini"],
                "grok-3",
                true,
                "https://api.x.ai/v1",
            ),
        ])
    }

    /// Look up the profile for a family
    pub fn get(&self, family: &Family) -> Option<&FamilyProfile> {
        self.profiles.iter().find(|p| &p.family == family)
    }

    /// All profiles, in catalog order
    pub fn profiles(&self) -> &[FamilyProfile] {
        &self.profiles
    }
}

impl Default for FamilyCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Caller-supplied parameters for invoker construction.
///
/// Every field except `family` is an override; `None` falls back to the
/// catalog entry (model, base URL) or the router's stored key table.
#[derive(Debug, Clone)]
pub struct VendorSpec {
    pub family: Family,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl VendorSpec {
    pub fn new(family: Family) -> Self {
        Self {
            family,
            model: None,
            api_key: None,
            base_url: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}
