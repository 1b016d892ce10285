//! Lazily builds, initializes and caches one adapter per network name, and
//! forwards mediation calls to it. No business logic lives here.

use crate::adapter::{BannerContainer, NetworkAdapter, PresentationContext};
use crate::events::AdapterEvents;
use crate::networks;
use crate::types::{BannerSize, Network, NetworkConfig};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

pub struct AdapterRegistry {
    adapters: RwLock<HashMap<String, Arc<dyn NetworkAdapter>>>,
    configs: BTreeMap<String, NetworkConfig>,
    events: AdapterEvents,
}

impl AdapterRegistry {
    pub fn new(configs: BTreeMap<String, NetworkConfig>, events: AdapterEvents) -> Self {
        Self {
            adapters: RwLock::new(HashMap::new()),
            configs,
            events,
        }
    }

    /// Returns the adapter cached under `network`, creating and initializing
    /// it on first use. Unknown names get a [`Network::FALLBACK`] adapter,
    /// cached under the requested name. Entries are never replaced or removed.
    pub fn get_or_create(&self, network: &str) -> Arc<dyn NetworkAdapter> {
        if let Some(existing) = self
            .adapters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(network)
        {
            return Arc::clone(existing);
        }

        let mut adapters = self.adapters.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = adapters.get(network) {
            return Arc::clone(existing);
        }
        let kind = Network::resolve(network);
        if kind.as_str() != network {
            info!(
                requested = %network,
                fallback = %kind,
                "unknown network; using fallback adapter"
            );
        }
        let adapter = networks::build(kind, self.events.clone());
        let empty = NetworkConfig::new();
        adapter.initialize(self.configs.get(network).unwrap_or(&empty));
        adapters.insert(network.to_string(), Arc::clone(&adapter));
        debug!(network = %network, "adapter created");
        adapter
    }

    /// Eagerly creates every network named in the configuration.
    pub fn initialize_all(&self) {
        for name in self.configs.keys() {
            self.get_or_create(name);
        }
    }

    /// Names with a cached adapter, sorted.
    pub fn networks(&self) -> Vec<String> {
        let adapters = self.adapters.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = adapters.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn load_banner(
        &self,
        network: &str,
        ad_unit_id: &str,
        size: BannerSize,
        container: &mut dyn BannerContainer,
    ) {
        self.get_or_create(network).load_banner(ad_unit_id, size, container);
    }

    pub fn load_interstitial(&self, network: &str, ad_unit_id: &str) {
        self.get_or_create(network).load_interstitial(ad_unit_id);
    }

    pub fn show_interstitial(&self, network: &str, ctx: &dyn PresentationContext) {
        self.get_or_create(network).show_interstitial(ctx);
    }

    pub fn load_rewarded(&self, network: &str, ad_unit_id: &str) {
        self.get_or_create(network).load_rewarded(ad_unit_id);
    }

    pub fn show_rewarded(&self, network: &str, ctx: &dyn PresentationContext) {
        self.get_or_create(network).show_rewarded(ctx);
    }

    pub fn is_interstitial_ready(&self, network: &str) -> bool {
        self.get_or_create(network).is_interstitial_ready()
    }

    pub fn is_rewarded_ready(&self, network: &str) -> bool {
        self.get_or_create(network).is_rewarded_ready()
    }
}
