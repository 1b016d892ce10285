//! The SDK handle a host app creates once at startup.

use crate::client::AdServingClient;
use crate::config::Config;
use crate::error::Result;
use crate::facade::MediationFacade;
use crate::transport::{HttpTransport, ReqwestTransport};
use peerads_adapter::{key_fingerprint, AdapterEvent, AdapterEvents, AdapterRegistry};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

/// Owns the mediation facade and the receiving end of adapter events.
/// Create it once and share [`PeerAds::facade`]; there is no global instance.
pub struct PeerAds<T = ReqwestTransport> {
    config: Arc<Config>,
    facade: Arc<MediationFacade<T>>,
    events: Option<UnboundedReceiver<AdapterEvent>>,
}

impl PeerAds<ReqwestTransport> {
    pub fn initialize(config: Config) -> Result<Self> {
        Self::with_transport(config, ReqwestTransport::new()?)
    }
}

impl<T: HttpTransport> PeerAds<T> {
    /// Validates `config`, builds the client and registry, and eagerly
    /// initializes every configured network.
    pub fn with_transport(config: Config, transport: T) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);

        let (events, rx) = AdapterEvents::channel();
        let registry = AdapterRegistry::new(config.networks.clone(), events);
        registry.initialize_all();

        let client = AdServingClient::new(Arc::clone(&config), Arc::new(transport));
        let facade = MediationFacade::new(client, registry, config.reward_policy());

        info!(
            environment = %config.environment,
            key = %config.active_api_key().map(key_fingerprint).unwrap_or_default(),
            networks = ?config.networks.keys().collect::<Vec<_>>(),
            test_mode = config.test_mode,
            "PeerAds initialized"
        );

        Ok(Self {
            config,
            facade: Arc::new(facade),
            events: Some(rx),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn facade(&self) -> &Arc<MediationFacade<T>> {
        &self.facade
    }

    /// The adapter event stream. Only the first call gets it.
    ///
    /// The stream ends once the last handle to the facade is dropped, which
    /// includes clones of [`PeerAds::facade`] still held after `shutdown`.
    pub fn take_adapter_events(&mut self) -> Option<UnboundedReceiver<AdapterEvent>> {
        self.events.take()
    }

    /// Drops the SDK. Facade clones held elsewhere keep working until they
    /// are dropped too.
    pub fn shutdown(self) {
        info!(networks = ?self.facade.registry().networks(), "PeerAds shut down");
    }
}
