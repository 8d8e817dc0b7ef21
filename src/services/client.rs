//! Spark API client
//!
//! Bundles the resource wrappers over a single transport and connection pool

use crate::config::{ApiConfig, Settings};
use crate::resources::{Memberships, Messages, People, Rooms, Webhooks};
use crate::services::transport::Transport;
use crate::utils::error::SparkResult;
use tracing::{debug, info};

/// Entry point of the library.
///
/// All wrappers share one transport, so concurrent calls reuse the same
/// connections. [`SparkClient::close`] releases the pool for every wrapper,
/// clone and paginator made from this client.
#[derive(Debug)]
pub struct SparkClient {
    transport: Transport,
    pub messages: Messages,
    pub people: People,
    pub webhooks: Webhooks,
    pub rooms: Rooms,
    pub memberships: Memberships,
}

impl SparkClient {
    /// Client for the public API endpoint with default settings
    pub fn new(access_token: impl Into<String>) -> SparkResult<Self> {
        Self::with_config(&ApiConfig::with_token(access_token))
    }

    /// Create a new client instance
    pub fn with_config(config: &ApiConfig) -> SparkResult<Self> {
        let transport = Transport::new(config)?;
        info!("Spark API client created for {}", transport.base_url());
        Ok(Self::from_transport(transport))
    }

    pub fn from_settings(settings: &Settings) -> SparkResult<Self> {
        Self::with_config(&settings.api)
    }

    /// Build a client over an existing transport
    pub fn from_transport(transport: Transport) -> Self {
        Self {
            messages: Messages::new(transport.clone()),
            people: People::new(transport.clone()),
            webhooks: Webhooks::new(transport.clone()),
            rooms: Rooms::new(transport.clone()),
            memberships: Memberships::new(transport.clone()),
            transport,
        }
    }

    /// Raw access to the five transport operations
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Release the connection pool. Wrappers cloned out of the client and
    /// open paginators fail with `SparkError::Closed` afterwards.
    pub fn close(self) {
        debug!("Closing Spark API client for {}", self.transport.base_url());
        self.transport.close();
    }
}
