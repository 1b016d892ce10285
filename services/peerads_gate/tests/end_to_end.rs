use peerads::{
    AdFormat, AdapterEvent, BannerSize, BannerView, Config, Environment, Network, PeerAds,
    PeerAdsError, Reward,
};
use peerads_adapter::{Presentation, PresentationContext};
use peerads_gate::AppState;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
struct Screen(Mutex<Vec<Presentation>>);

impl PresentationContext for Screen {
    fn present(&self, presentation: Presentation) {
        self.0.lock().unwrap().push(presentation);
    }
}

fn live_config(addr: SocketAddr) -> Config {
    Config::new("pk_live_demo")
        .with_secret_key("sk_live_demo")
        .with_api_url(format!("http://{addr}/api/v1"))
}

async fn wait_for_tracked(state: &AppState, n: usize) -> Vec<(String, String)> {
    for _ in 0..200 {
        {
            let tracked = state.tracked.read().unwrap();
            if tracked.len() >= n {
                return tracked.iter().map(|t| (t.ad_id.clone(), t.event.clone())).collect();
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("gate never received {n} tracking events");
}

#[tokio::test]
async fn applovin_rewarded_end_to_end() {
    let (addr, _h) = peerads_gate::test::spawn().await;
    let mut sdk = PeerAds::initialize(live_config(addr)).unwrap();
    let mut events = sdk.take_adapter_events().unwrap();
    let facade = sdk.facade();

    let ad = facade.request_ad(AdFormat::Rewarded, "slot-002").await.unwrap();
    assert_eq!(ad.source, "self");
    assert_eq!(ad.network.as_deref(), Some("applovin"));
    assert_eq!(ad.environment.as_deref(), Some("production"));

    assert!(!facade.is_rewarded_ready(&ad));
    facade.load_rewarded(&ad);
    assert!(facade.is_rewarded_ready(&ad));

    let screen = Screen::default();
    facade.show_rewarded(&ad, &screen);
    assert!(!facade.is_rewarded_ready(&ad));
    facade.show_rewarded(&ad, &screen);
    assert_eq!(screen.0.lock().unwrap().len(), 1, "second show must be a no-op");

    assert_eq!(
        events.recv().await,
        Some(AdapterEvent::RewardedLoaded { network: Network::AppLovin })
    );
    assert_eq!(
        events.recv().await,
        Some(AdapterEvent::RewardEarned {
            network: Network::AppLovin,
            reward: Reward::new("coins", 10),
        })
    );
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn admob_interstitial_end_to_end() {
    let (addr, _h) = peerads_gate::test::spawn().await;
    let sdk = PeerAds::initialize(live_config(addr)).unwrap();
    let facade = sdk.facade();

    let ad = facade.request_ad(AdFormat::Interstitial, "slot-001").await.unwrap();
    assert_eq!(ad.network.as_deref(), Some("admob"));
    facade.load_interstitial(&ad);
    let screen = Screen::default();
    facade.show_interstitial(&ad, &screen);
    assert_eq!(screen.0.lock().unwrap().len(), 1);
    assert_eq!(facade.registry().networks(), vec!["admob"]);
}

#[tokio::test]
async fn concurrent_requests_get_distinct_ads() {
    let (addr, _h) = peerads_gate::test::spawn().await;
    let sdk = PeerAds::initialize(live_config(addr)).unwrap();
    let facade = sdk.facade();

    let (a, b, c) = tokio::join!(
        facade.request_ad(AdFormat::Banner, "top"),
        facade.request_ad(AdFormat::Banner, "bottom"),
        facade.request_ad(AdFormat::Rewarded, "reward")
    );
    let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());
    assert_ne!(a.id, b.id);
    assert_eq!(a.ad_type, "banner");
    assert_eq!(c.ad_type, "rewarded");
}

#[tokio::test]
async fn self_rendered_banner_tracks_impression_and_click() {
    let (addr, _h, state) = peerads_gate::test::spawn_with_state().await;
    let sdk = PeerAds::initialize(live_config(addr)).unwrap();
    let facade = sdk.facade();

    let ad = facade.request_ad(AdFormat::Banner, "footer").await.unwrap();
    let mut banners: Vec<BannerView> = Vec::new();
    facade.load_banner(&ad, BannerSize::Standard, &mut banners);
    assert_eq!(banners.len(), 1);
    assert_eq!(banners[0].network, None);

    assert_eq!(facade.click(&ad), Some("https://peerads.io"));
    let mut tracked = wait_for_tracked(&state, 2).await;
    tracked.sort();
    assert_eq!(
        tracked,
        vec![(ad.id.clone(), "click".to_string()), (ad.id.clone(), "impression".to_string())]
    );
}

#[tokio::test]
async fn dau_reporting() {
    let (addr, _h, state) = peerads_gate::test::spawn_with_state().await;

    let sdk = PeerAds::initialize(live_config(addr)).unwrap();
    sdk.facade().report_dau(1234).await.unwrap();
    assert_eq!(state.dau.read().unwrap()[0].dau, 1234);

    let no_secret = Config::new("pk_live_demo").with_api_url(format!("http://{addr}/api/v1"));
    let sdk = PeerAds::initialize(no_secret).unwrap();
    let err = sdk.facade().report_dau(5).await.unwrap_err();
    assert!(matches!(
        err,
        PeerAdsError::MissingCredential { environment: Environment::Production }
    ));
    assert_eq!(state.dau.read().unwrap().len(), 1, "nothing sent without a secret");
}

#[tokio::test]
async fn rejected_secret_surfaces_status() {
    let (addr, _h) = peerads_gate::test::spawn().await;
    let config = Config::new("pk_live_demo")
        .with_secret_key("not-a-secret")
        .with_api_url(format!("http://{addr}/api/v1"));
    let sdk = PeerAds::initialize(config).unwrap();
    let err = sdk.facade().report_dau(1).await.unwrap_err();
    assert!(matches!(err, PeerAdsError::Transport { status: Some(401), .. }), "{err}");
}

#[tokio::test]
async fn test_environment_uses_test_keys() {
    let (addr, _h) = peerads_gate::test::spawn().await;
    let config = live_config(addr)
        .with_test_keys("pk_test_demo", None)
        .with_environment(Environment::Test);
    let sdk = PeerAds::initialize(config).unwrap();

    let ad = sdk.facade().request_ad(AdFormat::Interstitial, "slot").await.unwrap();
    assert_eq!(ad.environment.as_deref(), Some("test"));

    let err = sdk.facade().report_dau(10).await.unwrap_err();
    assert!(matches!(err, PeerAdsError::MissingCredential { environment: Environment::Test }));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let config = Config::new("pk_live_demo").with_api_url("http://127.0.0.1:9/api/v1");
    let sdk = PeerAds::initialize(config).unwrap();
    let err = sdk.facade().request_ad(AdFormat::Banner, "slot").await.unwrap_err();
    assert!(matches!(err, PeerAdsError::Transport { status: None, .. }), "{err}");
}
