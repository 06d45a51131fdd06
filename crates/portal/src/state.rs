//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiError, TicketApiClient};
use crate::config::PortalConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and read-only after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PortalConfig,
    api: TicketApiClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticket API client cannot be built.
    pub fn new(config: PortalConfig) -> Result<Self, ApiError> {
        let api = TicketApiClient::new(&config.api)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    /// Get a reference to the portal configuration.
    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    /// Get a reference to the ticket API client.
    #[must_use]
    pub fn api(&self) -> &TicketApiClient {
        &self.inner.api
    }
}
