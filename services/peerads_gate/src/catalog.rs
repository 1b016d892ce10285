//! Fixed demo inventory: one ad shape per format.

use peerads::{AdResponse, Creative};
use peerads_adapter::AdFormat;

pub const TEST_KEY_PREFIX: &str = "pk_test_";

/// `"test"` for test publishable keys, `"production"` otherwise.
pub fn environment_for(api_key: &str) -> &'static str {
    if api_key.starts_with(TEST_KEY_PREFIX) {
        "test"
    } else {
        "production"
    }
}

pub fn ad_for(format: AdFormat, id: String, environment: &str) -> AdResponse {
    let (source, network, ad_unit_id, creative) = match format {
        AdFormat::Banner => (
            AdResponse::SOURCE_NETWORK,
            None,
            None,
            Creative {
                title: "PeerAds House Banner".into(),
                description: Some("Discover apps from the PeerAds network".into()),
                image_url: Some("https://cdn.peerads.io/creatives/banner.png".into()),
                cta_text: "Learn more".into(),
                click_url: "https://peerads.io".into(),
            },
        ),
        AdFormat::Interstitial => (
            AdResponse::SOURCE_SELF,
            Some("admob"),
            Some("ca-app-pub-3940256099942544/4411468910"),
            Creative {
                title: "Interstitial".into(),
                description: None,
                image_url: None,
                cta_text: "Continue".into(),
                click_url: "https://peerads.io".into(),
            },
        ),
        AdFormat::Rewarded => (
            AdResponse::SOURCE_SELF,
            Some("applovin"),
            Some("peerads-rewarded-ios"),
            Creative {
                title: "Watch to earn".into(),
                description: Some("Watch a short video for 10 coins".into()),
                image_url: Some("https://cdn.peerads.io/creatives/rewarded.png".into()),
                cta_text: "Watch".into(),
                click_url: "https://peerads.io".into(),
            },
        ),
    };
    AdResponse {
        tracking_url: format!("https://api.peerads.io/api/v1/ads/track?adId={id}"),
        id,
        ad_type: format.as_str().into(),
        source: source.into(),
        network: network.map(str::to_string),
        ad_unit_id: ad_unit_id.map(str::to_string),
        creative,
        environment: Some(environment.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerads::Route;

    #[test]
    fn test_keys_map_to_test_environment() {
        assert_eq!(environment_for("pk_test_abc"), "test");
        assert_eq!(environment_for("pk_live_abc"), "production");
        assert_eq!(environment_for("pk_testabc"), "production");
    }

    #[test]
    fn inventory_routes() {
        let banner = ad_for(AdFormat::Banner, "b".into(), "test");
        assert_eq!(banner.route(), Route::SelfRendered);
        let inter = ad_for(AdFormat::Interstitial, "i".into(), "test");
        assert!(matches!(inter.route(), Route::Network { network: "admob", .. }));
        let rewarded = ad_for(AdFormat::Rewarded, "r".into(), "production");
        assert!(matches!(rewarded.route(), Route::Network { network: "applovin", .. }));
        assert_eq!(rewarded.format(), Some(AdFormat::Rewarded));
    }
}
