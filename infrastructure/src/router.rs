//! Provider router: resolves family names into configured invokers.
//!
//! The router holds the read-only family catalog, a read-mostly API key
//! table, and the shared usage ledger. Configuration failures (unknown
//! family, missing required key) surface immediately and are never
//! retried; a family without a real adapter resolves to the echo fallback
//! instead of failing.

use crate::vendors::anthropic::AnthropicAdapter;
use crate::vendors::echo::EchoAdapter;
use crate::vendors::openai_compat::OpenAiCompatAdapter;
use conclave_application::{
    CouncilSeats, ResilientInvoker, RetryPolicy, RunCouncilError, VendorAdapter,
};
use conclave_domain::{
    DomainError, Family, FamilyCatalog, FamilyProfile, SlotAssignment, UsageLedger, VendorSpec,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{debug, info};

/// Configuration errors surfaced by the router. Fatal: retrying a missing
/// key or an unknown family cannot succeed.
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Unknown family: {0}")]
    UnknownFamily(String),

    /// The remediation text names the exact calls that fix this.
    #[error(
        "No API key configured for '{family}': call setApiKey('{family}', ...) or pass apiKey"
    )]
    MissingApiKey { family: Family },

    #[error(transparent)]
    Assignment(#[from] DomainError),

    #[error("Council wiring failed: {0}")]
    Wiring(String),
}

/// Diagnostic snapshot of one catalog family
#[derive(Debug, Clone, Serialize)]
pub struct FamilySummary {
    pub family: Family,
    pub models: Vec<String>,
    pub default_model: String,
    pub requires_api_key: bool,
    pub key_configured: bool,
    pub base_url: String,
}

/// Catalog-backed factory for resilient invokers.
pub struct ProviderRouter {
    catalog: FamilyCatalog,
    keys: RwLock<HashMap<Family, String>>,
    ledger: Arc<UsageLedger>,
    policy: RetryPolicy,
}

impl ProviderRouter {
    pub fn new(catalog: FamilyCatalog, policy: RetryPolicy, ledger: Arc<UsageLedger>) -> Self {
        Self {
            catalog,
            keys: RwLock::new(HashMap::new()),
            ledger,
            policy,
        }
    }

    /// The shared usage ledger all invokers record into
    pub fn ledger(&self) -> &Arc<UsageLedger> {
        &self.ledger
    }

    // ==================== Key table ====================

    /// Store an API key for a family
    pub fn set_api_key(&self, family: Family, key: impl Into<String>) {
        let mut keys = self.keys.write().expect("router key table poisoned");
        keys.insert(family, key.into());
    }

    /// Fetch the stored key for a family
    pub fn api_key(&self, family: &Family) -> Option<String> {
        let keys = self.keys.read().expect("router key table poisoned");
        keys.get(family).cloned()
    }

    /// Whether a key is stored for a family
    pub fn has_api_key(&self, family: &Family) -> bool {
        let keys = self.keys.read().expect("router key table poisoned");
        keys.contains_key(family)
    }

    // ==================== Catalog ====================

    /// Catalog entry for a family, or an unknown-family error
    pub fn family_profile(&self, family: &Family) -> Result<&FamilyProfile, RouterError> {
        self.catalog
            .get(family)
            .ok_or_else(|| RouterError::UnknownFamily(family.to_string()))
    }

    /// Diagnostic summary of every catalog family
    pub fn providers_summary(&self) -> Vec<FamilySummary> {
        self.catalog
            .profiles()
            .iter()
            .map(|p| FamilySummary {
                family: p.family.clone(),
                models: p.models.clone(),
                default_model: p.default_model.clone(),
                requires_api_key: p.requires_api_key,
                key_configured: self.has_api_key(&p.family),
                base_url: p.base_url.clone(),
            })
            .collect()
    }

    // ==================== Invoker construction ====================

    /// Resolve a spec into a configured invoker.
    ///
    /// Key resolution: explicit override, then the stored table. A catalog
    /// entry that requires a key fails construction when neither source
    /// has one; this happens before any network activity. Families outside
    /// the catalog resolve to the echo fallback and need no key.
    pub fn create_invoker(&self, spec: VendorSpec) -> Result<ResilientInvoker, RouterError> {
        let profile = self.catalog.get(&spec.family);

        let api_key = spec.api_key.clone().or_else(|| self.api_key(&spec.family));
        if let Some(profile) = profile
            && profile.requires_api_key
            && api_key.is_none()
        {
            return Err(RouterError::MissingApiKey {
                family: spec.family.clone(),
            });
        }

        let model = spec
            .model
            .clone()
            .or_else(|| profile.map(|p| p.default_model.clone()))
            .unwrap_or_else(|| "echo".to_string());
        let base_url = spec
            .base_url
            .clone()
            .or_else(|| profile.map(|p| p.base_url.clone()));

        let adapter: Arc<dyn VendorAdapter> = match (&spec.family, base_url) {
            (Family::Anthropic, Some(base_url)) => Arc::new(AnthropicAdapter::new(
                api_key.unwrap_or_default(),
                base_url,
                model.clone(),
            )),
            (family, Some(base_url)) if family.is_openai_compatible() => {
                Arc::new(OpenAiCompatAdapter::new(
                    family.clone(),
                    api_key.unwrap_or_default(),
                    base_url,
                    model.clone(),
                ))
            }
            (family, _) => {
                debug!(%family, "no vendor integration, using echo fallback");
                Arc::new(EchoAdapter::new(family.clone(), model.clone()))
            }
        };

        Ok(ResilientInvoker::new(
            adapter,
            model,
            self.policy.clone(),
            Arc::clone(&self.ledger),
        ))
    }

    /// Wire a full council for the given authority family, using catalog
    /// defaults for every seat.
    pub fn assemble_council(&self, authority: Family) -> Result<CouncilSeats, RouterError> {
        let assignment = SlotAssignment::for_authority(authority.clone())?;
        info!(%authority, "assembling council seats");

        let mut advisors = Vec::with_capacity(4);
        for slot in assignment.slots() {
            let invoker = self.create_invoker(VendorSpec::new(slot.family.clone()))?;
            advisors.push(Arc::new(invoker));
        }
        let authority_invoker = Arc::new(self.create_invoker(VendorSpec::new(authority))?);

        CouncilSeats::new(assignment, advisors, authority_invoker)
            .map_err(|e: RunCouncilError| RouterError::Wiring(e.to_string()))
    }
}
