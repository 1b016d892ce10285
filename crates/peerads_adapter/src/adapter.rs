//! The capability every network adapter implements, and the shared
//! readiness/event plumbing the concrete adapters are built on.

use crate::error::AdapterError;
use crate::events::{AdapterEvent, AdapterEvents};
use crate::types::{
    AdFormat, BannerSize, BannerView, Network, NetworkConfig, Presentation, PresentationSource,
    Reward,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Where full-screen ads are presented from (the host's top-most screen).
pub trait PresentationContext: Send + Sync {
    fn present(&self, presentation: Presentation);
}

/// Where banners are rendered into.
pub trait BannerContainer {
    fn attach(&mut self, view: BannerView);
}

impl BannerContainer for Vec<BannerView> {
    fn attach(&mut self, view: BannerView) {
        self.push(view);
    }
}

/// Uniform contract over one third-party network's native integration.
///
/// `show_*` is a no-op unless the matching `load_*` completed since the last
/// show: readiness is single-use and is cleared before presenting.
pub trait NetworkAdapter: Send + Sync {
    fn network(&self) -> Network;

    /// Idempotent; the registry calls it once, right after creation.
    fn initialize(&self, config: &NetworkConfig);

    fn load_banner(&self, ad_unit_id: &str, size: BannerSize, container: &mut dyn BannerContainer);

    fn load_interstitial(&self, ad_unit_id: &str);

    fn show_interstitial(&self, ctx: &dyn PresentationContext);

    fn load_rewarded(&self, ad_unit_id: &str);

    fn show_rewarded(&self, ctx: &dyn PresentationContext);

    fn is_interstitial_ready(&self) -> bool;

    fn is_rewarded_ready(&self) -> bool;
}

/// Readiness flag that remembers the placement it was loaded for.
#[derive(Debug, Default)]
struct ReadySlot(Mutex<Option<String>>);

impl ReadySlot {
    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set(&self, placement: String) {
        *self.lock() = Some(placement);
    }

    /// Read-and-clear in one step.
    fn take(&self) -> Option<String> {
        self.lock().take()
    }

    fn is_set(&self) -> bool {
        self.lock().is_some()
    }
}

/// State shared by all concrete adapters: identity, event sink, and the two
/// readiness flags.
#[derive(Debug)]
pub struct AdapterCore {
    network: Network,
    events: AdapterEvents,
    initialized: AtomicBool,
    interstitial: ReadySlot,
    rewarded: ReadySlot,
}

impl AdapterCore {
    pub fn new(network: Network, events: AdapterEvents) -> Self {
        Self {
            network,
            events,
            initialized: AtomicBool::new(false),
            interstitial: ReadySlot::default(),
            rewarded: ReadySlot::default(),
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Returns `true` for the first caller only.
    pub fn mark_initialized(&self) -> bool {
        let first = !self.initialized.swap(true, Ordering::AcqRel);
        if !first {
            debug!(network = %self.network, "initialize called again; ignored");
        }
        first
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn render_banner(
        &self,
        placement: String,
        size: BannerSize,
        container: &mut dyn BannerContainer,
    ) {
        let view = BannerView {
            network: Some(self.network),
            size,
            label: format!("{} Banner ({placement})", self.network.display_name()),
            click_url: None,
        };
        container.attach(view.clone());
        self.events.emit(AdapterEvent::BannerLoaded { network: self.network, view });
    }

    /// Loads complete immediately. An empty placement is handed to the
    /// network as is.
    pub fn complete_interstitial_load(&self, placement: String) {
        debug!(network = %self.network, placement = %placement, "interstitial ready");
        self.interstitial.set(placement);
        self.events.emit(AdapterEvent::InterstitialLoaded { network: self.network });
    }

    pub fn complete_rewarded_load(&self, placement: String) {
        debug!(network = %self.network, placement = %placement, "rewarded ready");
        self.rewarded.set(placement);
        self.events.emit(AdapterEvent::RewardedLoaded { network: self.network });
    }

    /// Reports a load the network SDK rejected. The readiness flag for
    /// `format` is cleared.
    pub fn fail_load(&self, format: AdFormat, reason: impl Into<String>) {
        let network = self.network;
        let error = AdapterError::LoadFailed { network, reason: reason.into() };
        warn!(network = %network, format = %format, "{error}");
        let event = match format {
            AdFormat::Banner => AdapterEvent::BannerFailed { network, error },
            AdFormat::Interstitial => {
                self.interstitial.take();
                AdapterEvent::InterstitialFailed { network, error }
            }
            AdFormat::Rewarded => {
                self.rewarded.take();
                AdapterEvent::RewardedFailed { network, error }
            }
        };
        self.events.emit(event);
    }

    /// Presents the loaded interstitial, if any. Returns whether it did.
    pub fn present_interstitial(&self, ctx: &dyn PresentationContext) -> bool {
        let Some(placement) = self.interstitial.take() else {
            debug!(network = %self.network, "show interstitial: not ready");
            return false;
        };
        ctx.present(self.presentation(AdFormat::Interstitial, placement));
        true
    }

    /// Presents the loaded rewarded ad, if any, then reports `reward` as earned.
    pub fn present_rewarded(&self, ctx: &dyn PresentationContext, reward: Reward) -> bool {
        let Some(placement) = self.rewarded.take() else {
            debug!(network = %self.network, "show rewarded: not ready");
            return false;
        };
        ctx.present(self.presentation(AdFormat::Rewarded, placement));
        self.events.emit(AdapterEvent::RewardEarned { network: self.network, reward });
        true
    }

    pub fn interstitial_ready(&self) -> bool {
        self.interstitial.is_set()
    }

    pub fn rewarded_ready(&self) -> bool {
        self.rewarded.is_set()
    }

    fn presentation(&self, format: AdFormat, placement: String) -> Presentation {
        Presentation {
            format,
            source: PresentationSource::Network { network: self.network, placement },
        }
    }
}

/// Picks the explicit ad unit, else the configured fallback (possibly empty).
pub(crate) fn unit_or(ad_unit_id: &str, fallback: &str) -> String {
    if ad_unit_id.is_empty() { fallback } else { ad_unit_id }.to_string()
}
