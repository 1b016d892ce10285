//! Unity Ads. Placements default per format and can be overridden in config.

use crate::adapter::{unit_or, AdapterCore, BannerContainer, NetworkAdapter, PresentationContext};
use crate::events::AdapterEvents;
use crate::types::{BannerSize, Network, NetworkConfig, Reward};
use std::sync::OnceLock;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnityPlacements {
    pub game_id: String,
    pub banner: String,
    pub interstitial: String,
    pub rewarded: String,
}

impl Default for UnityPlacements {
    fn default() -> Self {
        Self {
            game_id: String::new(),
            banner: "Banner_iOS".into(),
            interstitial: "Interstitial_iOS".into(),
            rewarded: "Rewarded_iOS".into(),
        }
    }
}

impl UnityPlacements {
    fn from_config(config: &NetworkConfig) -> Self {
        let defaults = Self::default();
        let pick = |key: &str, default: String| config.get(key).cloned().unwrap_or(default);
        Self {
            game_id: pick("gameId", defaults.game_id),
            banner: pick("bannerPlacement", defaults.banner),
            interstitial: pick("interstitialPlacement", defaults.interstitial),
            rewarded: pick("rewardedPlacement", defaults.rewarded),
        }
    }
}

pub struct UnityAdapter {
    core: AdapterCore,
    placements: OnceLock<UnityPlacements>,
}

impl UnityAdapter {
    pub fn new(events: AdapterEvents) -> Self {
        Self {
            core: AdapterCore::new(Network::Unity, events),
            placements: OnceLock::new(),
        }
    }

    pub fn placements(&self) -> UnityPlacements {
        self.placements.get().cloned().unwrap_or_default()
    }
}

impl NetworkAdapter for UnityAdapter {
    fn network(&self) -> Network {
        Network::Unity
    }

    fn initialize(&self, config: &NetworkConfig) {
        if !self.core.mark_initialized() {
            return;
        }
        let placements = UnityPlacements::from_config(config);
        info!(network = "unity", game_id = %placements.game_id, "adapter initialized");
        let _ = self.placements.set(placements);
    }

    fn load_banner(&self, ad_unit_id: &str, size: BannerSize, container: &mut dyn BannerContainer) {
        let p = self.placements();
        self.core.render_banner(unit_or(ad_unit_id, &p.banner), size, container);
    }

    fn load_interstitial(&self, ad_unit_id: &str) {
        let p = self.placements();
        self.core.complete_interstitial_load(unit_or(ad_unit_id, &p.interstitial));
    }

    fn show_interstitial(&self, ctx: &dyn PresentationContext) {
        self.core.present_interstitial(ctx);
    }

    fn load_rewarded(&self, ad_unit_id: &str) {
        let p = self.placements();
        self.core.complete_rewarded_load(unit_or(ad_unit_id, &p.rewarded));
    }

    fn show_rewarded(&self, ctx: &dyn PresentationContext) {
        self.core.present_rewarded(ctx, Reward::new("unity_reward", 1));
    }

    fn is_interstitial_ready(&self) -> bool {
        self.core.interstitial_ready()
    }

    fn is_rewarded_ready(&self) -> bool {
        self.core.rewarded_ready()
    }
}
