//! Hosted backend adapter: GoTrue for accounts and sessions, PostgREST for
//! the `events` and `weather_predictions` tables.

use std::sync::Arc;

pub mod auth;
pub mod error;
pub mod postgrest;
pub mod repository;
pub mod rows;

#[cfg(test)]
mod testing;

pub use auth::SupabaseAuthenticationService;
pub use error::SupabaseError;
pub use repository::{SupabaseEventRepository, SupabasePredictionRepository};

#[derive(Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub jwt_secret: String,
    /// Bearer used for table access. Falls back to the anon key, which only
    /// works when the row policies allow it.
    pub service_role_key: Option<String>,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            jwt_secret: jwt_secret.into(),
            service_role_key: None,
        }
    }

    pub fn with_service_role_key(mut self, key: Option<String>) -> Self {
        self.service_role_key = key;
        self
    }

    pub(crate) fn row_access_key(&self) -> &str {
        self.service_role_key.as_deref().unwrap_or(&self.anon_key)
    }
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Shared HTTP client plus project settings. Cheap to clone.
#[derive(Clone)]
pub struct SupabaseClient {
    pub(crate) http: reqwest::Client,
    pub(crate) config: Arc<SupabaseConfig>,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Result<Self, SupabaseError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        log::info!("Using Supabase project at {}", config.url);
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }
}
