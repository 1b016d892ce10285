//! Meta Audience Network. `placementId` is used when the ad carries no unit.

use crate::adapter::{unit_or, AdapterCore, BannerContainer, NetworkAdapter, PresentationContext};
use crate::events::AdapterEvents;
use crate::types::{BannerSize, Network, NetworkConfig, Reward};
use std::sync::OnceLock;
use tracing::info;

pub struct MetaAdapter {
    core: AdapterCore,
    placement_id: OnceLock<String>,
}

impl MetaAdapter {
    pub fn new(events: AdapterEvents) -> Self {
        Self {
            core: AdapterCore::new(Network::Meta, events),
            placement_id: OnceLock::new(),
        }
    }

    fn placement(&self, ad_unit_id: &str) -> String {
        unit_or(ad_unit_id, self.placement_id.get().map_or("", String::as_str))
    }
}

impl NetworkAdapter for MetaAdapter {
    fn network(&self) -> Network {
        Network::Meta
    }

    fn initialize(&self, config: &NetworkConfig) {
        if !self.core.mark_initialized() {
            return;
        }
        let placement_id = config.get("placementId").cloned().unwrap_or_default();
        info!(network = "meta", placement_id = %placement_id, "adapter initialized");
        let _ = self.placement_id.set(placement_id);
    }

    fn load_banner(&self, ad_unit_id: &str, size: BannerSize, container: &mut dyn BannerContainer) {
        self.core.render_banner(self.placement(ad_unit_id), size, container);
    }

    fn load_interstitial(&self, ad_unit_id: &str) {
        self.core.complete_interstitial_load(self.placement(ad_unit_id));
    }

    fn show_interstitial(&self, ctx: &dyn PresentationContext) {
        self.core.present_interstitial(ctx);
    }

    fn load_rewarded(&self, ad_unit_id: &str) {
        self.core.complete_rewarded_load(self.placement(ad_unit_id));
    }

    fn show_rewarded(&self, ctx: &dyn PresentationContext) {
        self.core.present_rewarded(ctx, Reward::new("meta_reward", 1));
    }

    fn is_interstitial_ready(&self) -> bool {
        self.core.interstitial_ready()
    }

    fn is_rewarded_ready(&self) -> bool {
        self.core.rewarded_ready()
    }
}
