//! ironSource LevelPlay. Reads `appKey`; placements are the LevelPlay defaults
//! unless the ad names one.

use crate::adapter::{unit_or, AdapterCore, BannerContainer, NetworkAdapter, PresentationContext};
use crate::events::AdapterEvents;
use crate::fingerprint::key_fingerprint;
use crate::types::{BannerSize, Network, NetworkConfig, Reward};
use std::sync::OnceLock;
use tracing::info;

const DEFAULT_BANNER: &str = "DefaultBanner";
const DEFAULT_INTERSTITIAL: &str = "DefaultInterstitial";
const DEFAULT_REWARDED: &str = "DefaultRewardedVideo";

pub struct IronSourceAdapter {
    core: AdapterCore,
    app_key: OnceLock<String>,
}

impl IronSourceAdapter {
    pub fn new(events: AdapterEvents) -> Self {
        Self {
            core: AdapterCore::new(Network::IronSource, events),
            app_key: OnceLock::new(),
        }
    }

    pub fn app_key(&self) -> Option<&str> {
        self.app_key.get().map(String::as_str)
    }
}

impl NetworkAdapter for IronSourceAdapter {
    fn network(&self) -> Network {
        Network::IronSource
    }

    fn initialize(&self, config: &NetworkConfig) {
        if !self.core.mark_initialized() {
            return;
        }
        let app_key = config.get("appKey").cloned().unwrap_or_default();
        info!(network = "ironsource", app_key = %key_fingerprint(&app_key), "adapter initialized");
        let _ = self.app_key.set(app_key);
    }

    fn load_banner(&self, ad_unit_id: &str, size: BannerSize, container: &mut dyn BannerContainer) {
        self.core.render_banner(unit_or(ad_unit_id, DEFAULT_BANNER), size, container);
    }

    fn load_interstitial(&self, ad_unit_id: &str) {
        self.core.complete_interstitial_load(unit_or(ad_unit_id, DEFAULT_INTERSTITIAL));
    }

    fn show_interstitial(&self, ctx: &dyn PresentationContext) {
        self.core.present_interstitial(ctx);
    }

    fn load_rewarded(&self, ad_unit_id: &str) {
        self.core.complete_rewarded_load(unit_or(ad_unit_id, DEFAULT_REWARDED));
    }

    fn show_rewarded(&self, ctx: &dyn PresentationContext) {
        // Amount is server-side configured in LevelPlay; the SDK reports 0.
        self.core.present_rewarded(ctx, Reward::new("coins", 0));
    }

    fn is_interstitial_ready(&self) -> bool {
        self.core.interstitial_ready()
    }

    fn is_rewarded_ready(&self) -> bool {
        self.core.rewarded_ready()
    }
}
