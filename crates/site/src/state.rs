//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::WheelsClient;
use crate::config::SiteConfig;
use crate::services::AuthService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the remote API client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    api: WheelsClient,
    auth: AuthService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: SiteConfig, api: WheelsClient, auth: AuthService) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, api, auth }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the remote Wheels API client.
    #[must_use]
    pub fn api(&self) -> &WheelsClient {
        &self.inner.api
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }
}
