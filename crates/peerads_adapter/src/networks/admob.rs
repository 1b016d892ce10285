//! Google AdMob. Also the fallback for network names the registry does not know.

use crate::adapter::{unit_or, AdapterCore, BannerContainer, NetworkAdapter, PresentationContext};
use crate::events::AdapterEvents;
use crate::types::{BannerSize, Network, NetworkConfig, Reward};
use tracing::info;

pub struct AdMobAdapter {
    core: AdapterCore,
}

impl AdMobAdapter {
    pub fn new(events: AdapterEvents) -> Self {
        Self {
            core: AdapterCore::new(Network::AdMob, events),
        }
    }
}

impl NetworkAdapter for AdMobAdapter {
    fn network(&self) -> Network {
        Network::AdMob
    }

    fn initialize(&self, _config: &NetworkConfig) {
        if self.core.mark_initialized() {
            // App id comes from the host's bundle metadata, not from config.
            info!(network = "admob", "adapter initialized");
        }
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
