//! Mediation facade: one entry point that routes every load/show call either
//! to a network adapter or to the SDK's own renderer, depending on the ad the
//! server returned.

use crate::client::AdServingClient;
use crate::error::Result;
use crate::models::{AdResponse, Route};
use crate::transport::HttpTransport;
use peerads_adapter::{
    AdFormat, AdapterRegistry, BannerContainer, BannerSize, BannerView, Presentation,
    PresentationContext, PresentationSource,
};
use peerads_runtime::{
    RewardPolicy, RewardedListener, RewardedPresentation, RewardedRenderer, TrackEvent, Tracker,
};
use std::sync::Arc;
use tracing::debug;

pub struct MediationFacade<T> {
    client: AdServingClient<T>,
    registry: AdapterRegistry,
    rewarded: RewardPolicy,
}

impl<T: HttpTransport> MediationFacade<T> {
    pub fn new(
        client: AdServingClient<T>,
        registry: AdapterRegistry,
        rewarded: RewardPolicy,
    ) -> Self {
        Self { client, registry, rewarded }
    }

    pub fn client(&self) -> &AdServingClient<T> {
        &self.client
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    pub fn reward_policy(&self) -> &RewardPolicy {
        &self.rewarded
    }

    pub async fn request_ad(&self, format: AdFormat, slot_id: &str) -> Result<AdResponse> {
        self.client.request_ad(format, slot_id).await
    }

    pub fn track(&self, ad_id: &str, event: TrackEvent) {
        self.client.track(ad_id, event);
    }

    pub async fn report_dau(&self, dau: u64) -> Result<()> {
        self.client.report_dau(dau).await
    }

    /// Network ads are loaded by their adapter, which attaches the banner
    /// itself. Self-rendered creatives are attached here and counted as an
    /// impression.
    pub fn load_banner(
        &self,
        ad: &AdResponse,
        size: BannerSize,
        container: &mut dyn BannerContainer,
    ) {
        match ad.route() {
            Route::Network { network, ad_unit_id } => {
                self.registry.load_banner(network, ad_unit_id, size, container)
            }
            Route::SelfRendered => {
                container.attach(BannerView {
                    network: None,
                    size,
                    label: ad.creative.title.clone(),
                    click_url: Some(ad.creative.click_url.clone()),
                });
                self.client.track(&ad.id, TrackEvent::Impression);
            }
        }
    }

    /// Tracks a click on a self-rendered ad and returns where to send the
    /// user. Network ads handle their own clicks.
    pub fn click<'a>(&self, ad: &'a AdResponse) -> Option<&'a str> {
        match ad.route() {
            Route::SelfRendered => {
                self.client.track(&ad.id, TrackEvent::Click);
                Some(ad.creative.click_url.as_str())
            }
            Route::Network { .. } => None,
        }
    }

    pub fn load_interstitial(&self, ad: &AdResponse) {
        match ad.route() {
            Route::Network { network, ad_unit_id } => {
                self.registry.load_interstitial(network, ad_unit_id)
            }
            Route::SelfRendered => {
                debug!(ad_id = %ad.id, "self-rendered interstitial needs no preload")
            }
        }
    }

    pub fn show_interstitial(&self, ad: &AdResponse, ctx: &dyn PresentationContext) {
        match ad.route() {
            Route::Network { network, .. } => self.registry.show_interstitial(network, ctx),
            Route::SelfRendered => {
                ctx.present(Presentation {
                    format: AdFormat::Interstitial,
                    source: PresentationSource::SelfRendered {
                        ad_id: ad.id.clone(),
                        title: ad.creative.title.clone(),
                    },
                });
                self.client.track(&ad.id, TrackEvent::Impression);
            }
        }
    }

    /// Self-rendered interstitials are always ready.
    pub fn is_interstitial_ready(&self, ad: &AdResponse) -> bool {
        match ad.route() {
            Route::Network { network, .. } => self.registry.is_interstitial_ready(network),
            Route::SelfRendered => true,
        }
    }

    pub fn load_rewarded(&self, ad: &AdResponse) {
        match ad.route() {
            Route::Network { network, ad_unit_id } => {
                self.registry.load_rewarded(network, ad_unit_id)
            }
            Route::SelfRendered => {
                debug!(ad_id = %ad.id, "self-rendered rewarded needs no preload")
            }
        }
    }

    /// Shows a network rewarded ad. Self-rendered rewarded ads go through
    /// [`MediationFacade::present_rewarded`] instead, since they need a
    /// renderer and a listener.
    pub fn show_rewarded(&self, ad: &AdResponse, ctx: &dyn PresentationContext) {
        match ad.route() {
            Route::Network { network, .. } => self.registry.show_rewarded(network, ctx),
            Route::SelfRendered => {
                debug!(ad_id = %ad.id, "self-rendered rewarded ad; use present_rewarded")
            }
        }
    }

    /// Whether [`MediationFacade::show_rewarded`] would present. Always
    /// `false` for self-rendered ads, which `show_rewarded` does not handle.
    pub fn is_rewarded_ready(&self, ad: &AdResponse) -> bool {
        match ad.route() {
            Route::Network { network, .. } => self.registry.is_rewarded_ready(network),
            Route::SelfRendered => false,
        }
    }

    /// Starts a self-rendered rewarded presentation: hands the renderer its
    /// request and bridge, and returns the presentation to drive with
    /// [`RewardedPresentation::run`].
    pub fn present_rewarded<L: RewardedListener>(
        &self,
        ad: &AdResponse,
        renderer: &dyn RewardedRenderer,
        listener: L,
    ) -> RewardedPresentation<L> {
        let tracker: Arc<dyn Tracker> = Arc::new(self.client.clone());
        let (presentation, bridge) =
            RewardedPresentation::new(ad.id.clone(), self.rewarded.clone(), tracker, listener);
        let request = presentation.render_request(
            &ad.creative.title,
            ad.creative.description.as_deref().unwrap_or_default(),
            ad.creative.image_url.as_deref().unwrap_or_default(),
        );
        renderer.render(request, bridge);
        presentation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::Creative;
    use crate::transport::mock::MockTransport;
    use peerads_adapter::{AdapterEvent, AdapterEvents, Network, Reward};
    use peerads_runtime::{BridgeEvent, BridgeSender, RenderRequest, RewardedCallbacks};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Screen(Mutex<Vec<Presentation>>);

    impl PresentationContext for Screen {
        fn present(&self, presentation: Presentation) {
            self.0.lock().unwrap().push(presentation);
        }
    }

    /// Plays a full rewarded view as soon as it is asked to render.
    #[derive(Default)]
    struct AutoPlayer(Mutex<Option<RenderRequest>>);

    impl RewardedRenderer for AutoPlayer {
        fn render(&self, request: RenderRequest, bridge: BridgeSender) {
            *self.0.lock().unwrap() = Some(request);
            bridge.send(BridgeEvent::Impression);
            bridge.post_message(&json!({
                "event": "rewardAvailable",
                "data": {"type": "gems", "amount": 2}
            }));
            bridge.post_message(&json!({"event": "rewardEarned"}));
            bridge.send(BridgeEvent::Closed);
        }
    }

    fn ad(id: &str, source: &str, network: Option<&str>) -> AdResponse {
        AdResponse {
            id: id.into(),
            ad_type: "interstitial".into(),
            source: source.into(),
            network: network.map(str::to_string),
            ad_unit_id: Some("unit-9".into()),
            creative: Creative {
                title: "House Ad".into(),
                description: Some("Play now".into()),
                image_url: Some("https://img".into()),
                cta_text: "Install".into(),
                click_url: "https://click".into(),
            },
            tracking_url: "https://t".into(),
            environment: None,
        }
    }

    fn facade() -> (
        MediationFacade<MockTransport>,
        Arc<MockTransport>,
        tokio::sync::mpsc::UnboundedReceiver<AdapterEvent>,
    ) {
        let mock = Arc::new(MockTransport::answering(json!({"ok": true})));
        let client = AdServingClient::new(Arc::new(Config::new("pk")), Arc::clone(&mock));
        let (events, rx) = AdapterEvents::channel();
        let registry = AdapterRegistry::new(Default::default(), events);
        (MediationFacade::new(client, registry, RewardPolicy::default()), mock, rx)
    }

    #[tokio::test]
    async fn network_interstitial_goes_through_adapter() {
        let (facade, mock, mut rx) = facade();
        let ad = ad("a1", "self", Some("meta"));
        let screen = Screen::default();

        assert!(!facade.is_interstitial_ready(&ad));
        facade.load_interstitial(&ad);
        assert!(facade.is_interstitial_ready(&ad));
        facade.show_interstitial(&ad, &screen);
        facade.show_interstitial(&ad, &screen);
        assert_eq!(screen.0.lock().unwrap().len(), 1);
        assert!(!facade.is_interstitial_ready(&ad));
        assert_eq!(
            rx.try_recv().unwrap(),
            AdapterEvent::InterstitialLoaded { network: Network::Meta }
        );
        assert_eq!(facade.registry().networks(), vec!["meta"]);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn self_rendered_interstitial_presents_and_tracks() {
        let (facade, mock, _rx) = facade();
        let ad = ad("a2", "network", None);
        let screen = Screen::default();
        assert!(facade.is_interstitial_ready(&ad));
        facade.show_interstitial(&ad, &screen);
        assert_eq!(
            screen.0.lock().unwrap()[0].source,
            PresentationSource::SelfRendered { ad_id: "a2".into(), title: "House Ad".into() }
        );
        mock.wait_for_calls(1).await;
        assert_eq!(mock.calls()[0].body, json!({"adId": "a2", "event": "impression"}));
        assert!(facade.registry().networks().is_empty());
    }

    #[tokio::test]
    async fn self_rendered_banner_and_click() {
        let (facade, mock, _rx) = facade();
        let ad = ad("a3", "self", None);
        let mut banners: Vec<BannerView> = Vec::new();
        facade.load_banner(&ad, BannerSize::MediumRect, &mut banners);
        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].network, None);
        assert_eq!(banners[0].click_url.as_deref(), Some("https://click"));

        assert_eq!(facade.click(&ad), Some("https://click"));
        mock.wait_for_calls(2).await;
        let mut events: Vec<String> = mock
            .calls()
            .iter()
            .filter_map(|c| c.body["event"].as_str().map(str::to_string))
            .collect();
        events.sort();
        assert_eq!(events, vec!["click", "impression"]);
    }

    #[tokio::test]
    async fn network_banner_and_click() {
        let (facade, mock, mut rx) = facade();
        let ad = ad("a4", "self", Some("admob"));
        let mut banners: Vec<BannerView> = Vec::new();
        facade.load_banner(&ad, BannerSize::Standard, &mut banners);
        assert_eq!(banners[0].network, Some(Network::AdMob));
        assert!(matches!(rx.try_recv().unwrap(), AdapterEvent::BannerLoaded { .. }));
        assert_eq!(facade.click(&ad), None);
        tokio::task::yield_now().await;
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn network_rewarded_pays_once() {
        let (facade, _mock, mut rx) = facade();
        let ad = ad("a5", "self", Some("applovin"));
        let screen = Screen::default();
        facade.load_rewarded(&ad);
        assert!(facade.is_rewarded_ready(&ad));
        facade.show_rewarded(&ad, &screen);
        facade.show_rewarded(&ad, &screen);
        assert!(!facade.is_rewarded_ready(&ad));

        let mut earned = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let AdapterEvent::RewardEarned { reward, .. } = event {
                earned.push(reward);
            }
        }
        assert_eq!(earned, vec![Reward::new("coins", 10)]);
    }

    #[tokio::test]
    async fn network_loads_without_ad_unit_still_present() {
        let (facade, _mock, mut rx) = facade();
        let screen = Screen::default();

        let mut rewarded = ad("a8", "self", Some("applovin"));
        rewarded.ad_unit_id = None;
        facade.load_rewarded(&rewarded);
        assert!(facade.is_rewarded_ready(&rewarded));
        facade.show_rewarded(&rewarded, &screen);

        let mut interstitial = ad("a9", "self", Some("admob"));
        interstitial.ad_unit_id = None;
        facade.load_interstitial(&interstitial);
        assert!(facade.is_interstitial_ready(&interstitial));
        facade.show_interstitial(&interstitial, &screen);

        assert_eq!(screen.0.lock().unwrap().len(), 2);
        let earned: Vec<Reward> = std::iter::from_fn(|| rx.try_recv().ok())
            .filter_map(|event| match event {
                AdapterEvent::RewardEarned { reward, .. } => Some(reward),
                _ => None,
            })
            .collect();
        assert_eq!(earned, vec![Reward::new("coins", 10)]);
    }

    #[tokio::test]
    async fn present_rewarded_runs_session() {
        let (facade, mock, _rx) = facade();
        let ad = ad("a6", "self", None);
        let renderer = AutoPlayer::default();
        let earned = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&earned);
        let presentation = facade.present_rewarded(
            &ad,
            &renderer,
            RewardedCallbacks::new()
                .on_reward_earned(move |r| *sink.lock().unwrap() = Some(r.clone())),
        );

        let request = renderer.0.lock().unwrap().clone().unwrap();
        assert_eq!(request.description, "Play now");
        assert_eq!(request.watch_duration, facade.reward_policy().watch_duration);

        let report = presentation.run().await;
        assert_eq!(report.reward, Some(Reward::new("gems", 2)));
        assert_eq!(*earned.lock().unwrap(), Some(Reward::new("gems", 2)));

        mock.wait_for_calls(2).await;
        let mut events: Vec<String> = mock
            .calls()
            .iter()
            .filter_map(|c| c.body["event"].as_str().map(str::to_string))
            .collect();
        events.sort();
        assert_eq!(events, vec!["complete", "impression"]);
    }

    #[tokio::test]
    async fn self_rendered_rewarded_is_never_show_ready() {
        let (facade, mock, _rx) = facade();
        let ad = ad("a7", "network", None);
        let screen = Screen::default();
        facade.load_rewarded(&ad);
        assert!(!facade.is_rewarded_ready(&ad));
        facade.show_rewarded(&ad, &screen);
        assert!(screen.0.lock().unwrap().is_empty());
        tokio::task::yield_now().await;
        assert_eq!(mock.call_count(), 0);
    }
}
