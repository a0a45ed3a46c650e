//! Configuration file support (`config.toml` + `CONCLAVE_*` environment).
//!
//! The core API is programmatic; this module is the convenience surface
//! the CLI uses to feed it. Keys can be given directly or by naming an
//! environment variable to read.

mod loader;

pub use loader::{ConfigError, ConfigLoader};

use crate::router::ProviderRouter;
use conclave_domain::{Family, FamilyCatalog, FamilyProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Per-family configuration from the `[families.<id>]` sections
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileFamilyConfig {
    /// Direct API key (not recommended; prefer `api_key_env`).
    pub api_key: Option<String>,
    /// Environment variable name to read the API key from.
    pub api_key_env: Option<String>,
    /// Base URL override for this family's endpoint.
    pub base_url: Option<String>,
    /// Default model override.
    pub model: Option<String>,
}

/// Top-level configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    /// Authority family id (default: "anthropic").
    pub authority: Option<String>,
    /// Consensus rule: "unanimous" or "majority".
    pub rule: Option<String>,
    /// Per-family settings.
    pub families: HashMap<String, FileFamilyConfig>,
}

impl FileConfig {
    /// Resolve the key for one family section: direct value wins over the
    /// named environment variable.
    fn resolve_key(section: &FileFamilyConfig) -> Option<String> {
        if let Some(key) = &section.api_key {
            return Some(key.clone());
        }
        section
            .api_key_env
            .as_ref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|v| !v.is_empty())
    }

    /// Store every resolvable key into the router's key table.
    pub fn apply_keys(&self, router: &ProviderRouter) {
        for (name, section) in &self.families {
            let family: Family = name.parse().unwrap();
            if let Some(key) = Self::resolve_key(section) {
                debug!(%family, "configured API key");
                router.set_api_key(family, key);
            }
        }
    }

    /// Build the family catalog with this file's base-URL and model
    /// overrides applied on top of the builtin entries.
    pub fn catalog(&self) -> FamilyCatalog {
        let profiles = FamilyCatalog::builtin()
            .profiles()
            .iter()
            .map(|p| self.apply_overrides(p))
            .collect();
        FamilyCatalog::new(profiles)
    }

    fn apply_overrides(&self, profile: &FamilyProfile) -> FamilyProfile {
        let mut profile = profile.clone();
        if let Some(section) = self.families.get(profile.family.as_str()) {
            if let Some(base_url) = &section.base_url {
                profile.base_url = base_url.clone();
            }
            if let Some(model) = &section.model {
                if !profile.models.contains(model) {
                    profile.models.push(model.clone());
                }
                profile.default_model = model.clone();
            }
        }
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_application::RetryPolicy;
    use conclave_domain::UsageLedger;
    use std::sync::Arc;

    fn section(api_key: Option<&str>, model: Option<&str>) -> FileFamilyConfig {
        FileFamilyConfig {
            api_key: api_key.map(String::from),
            api_key_env: None,
            base_url: None,
            model: model.map(String::from),
        }
    }

    #[test]
    fn test_apply_keys_stores_direct_keys() {
        let mut config = FileConfig::default();
        config
            .families
            .insert("deepseek".to_string(), section(Some("sk-d"), None));

        let router = ProviderRouter::new(
            config.catalog(),
            RetryPolicy::default(),
            Arc::new(UsageLedger::default()),
        );
        config.apply_keys(&router);

        assert_eq!(router.api_key(&Family::DeepSeek).as_deref(), Some("sk-d"));
        assert!(!router.has_api_key(&Family::Anthropic));
    }

    #[test]
    fn test_catalog_overrides_model_and_base_url() {
        let mut config = FileConfig::default();
        config.families.insert(
            "mistral".to_string(),
            FileFamilyConfig {
                base_url: Some("http://localhost:9000".to_string()),
                model: Some("mistral-tiny".to_string()),
                ..Default::default()
            },
        );

        let catalog = config.catalog();
        let mistral = catalog.get(&Family::Mistral).unwrap();
        assert_eq!(mistral.base_url, "http://localhost:9000");
        assert_eq!(mistral.default_model, "mistral-tiny");
        assert!(mistral.models.contains(&"mistral-tiny".to_string()));

        // Untouched families keep builtin settings.
        let deepseek = catalog.get(&Family::DeepSeek).unwrap();
        assert_eq!(deepseek.default_model, "deepseek-chat");
    }

    #[test]
    fn test_direct_key_wins_over_env_name() {
        let section = FileFamilyConfig {
            api_key: Some("direct".to_string()),
            api_key_env: Some("SOME_UNSET_VARIABLE_12345".to_string()),
            ..Default::default()
        };
        assert_eq!(FileConfig::resolve_key(&section).as_deref(), Some("direct"));
    }

    #[test]
    fn test_unset_env_resolves_to_none() {
        let section = FileFamilyConfig {
            api_key_env: Some("SOME_UNSET_VARIABLE_12345".to_string()),
            ..Default::default()
        };
        assert_eq!(FileConfig::resolve_key(&section), None);
    }
}
