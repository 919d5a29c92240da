/// External identity providers
///
/// Providers run the redirect/callback handshake and hand back a verified
/// identity. Account decisions are made by the reconciler, never here.

mod github;

pub use github::GitHubProvider;

use crate::{config::OAuthConfig, error::KumanoResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Identity asserted by a provider after a completed handshake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    pub provider: String,
    pub provider_user_id: String,
    pub display_name: String,
    pub avatar_url: String,
    pub nickname: String,
    /// Unique per callback when the provider supplies one
    pub callback_nonce: Option<String>,
}

/// One external authentication service
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Name used in routes and stored on accounts
    fn name(&self) -> &str;

    /// Where to send the browser to start the handshake
    fn authorize_url(&self, state: &str) -> String;

    /// Finish the handshake from the callback's authorization code
    async fn complete(&self, code: &str, state: &str) -> KumanoResult<VerifiedIdentity>;
}

/// Configured providers by name
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn IdentityProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from configuration
    pub fn from_config(config: &OAuthConfig) -> KumanoResult<Self> {
        let mut registry = Self::new();
        if let Some(github) = &config.github {
            registry.register(Arc::new(GitHubProvider::new(github.clone())?));
        }
        Ok(registry)
    }

    pub fn register(&mut self, provider: Arc<dyn IdentityProvider>) {
        tracing::info!("Identity provider enabled: {}", provider.name());
        self.providers.insert(provider.name().to_string(), provider);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn IdentityProvider>> {
        self.providers.get(name).cloned()
    }

    /// Sorted provider names
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }
}
