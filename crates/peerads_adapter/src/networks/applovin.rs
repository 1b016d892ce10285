//! AppLovin MAX. Reads `sdkKey`.

use crate::adapter::{unit_or, AdapterCore, BannerContainer, NetworkAdapter, PresentationContext};
use crate::events::AdapterEvents;
use crate::fingerprint::key_fingerprint;
use crate::types::{BannerSize, Network, NetworkConfig, Reward};
use std::sync::OnceLock;
use tracing::{info, warn};

pub struct AppLovinAdapter {
    core: AdapterCore,
    sdk_key: OnceLock<String>,
}

impl AppLovinAdapter {
    pub fn new(events: AdapterEvents) -> Self {
        Self {
            core: AdapterCore::new(Network::AppLovin, events),
            sdk_key: OnceLock::new(),
        }
    }

    pub fn sdk_key(&self) -> Option<&str> {
        self.sdk_key.get().map(String::as_str)
    }
}

impl NetworkAdapter for AppLovinAdapter {
    fn network(&self) -> Network {
        Network::AppLovin
    }

    fn initialize(&self, config: &NetworkConfig) {
        if !self.core.mark_initialized() {
            return;
        }
        let key = config.get("sdkKey").cloned().unwrap_or_default();
        if key.is_empty() {
            warn!(network = "applovin", "initialized without sdkKey");
        } else {
            info!(network = "applovin", sdk_key = %key_fingerprint(&key), "adapter initialized");
        }
        let _ = self.sdk_key.set(key);
    }

    fn load_banner(&self, ad_unit_id: &str, size: BannerSize, container: &mut dyn BannerContainer) {
        self.core.render_banner(unit_or(ad_unit_id, ""), size, container);
    }

    fn load_interstitial(&self, ad_unit_id: &str) {
        self.core.complete_interstitial_load(unit_or(ad_unit_id, ""));
    }

    fn show_interstitial(&self, ctx: &dyn PresentationContext) {
        self.core.present_interstitial(ctx);
    }

    fn load_rewarded(&self, ad_unit_id: &str) {
        self.core.complete_rewarded_load(unit_or(ad_unit_id, ""));
    }

    fn show_rewarded(&self, ctx: &dyn PresentationContext) {
        self.core.present_rewarded(ctx, Reward::new("coins", 10));
    }

    fn is_interstitial_ready(&self) -> bool {
        self.core.interstitial_ready()
    }

    fn is_rewarded_ready(&self) -> bool {
        self.core.rewarded_ready()
    }
}
