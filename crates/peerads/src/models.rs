//! Ad server wire types.

use peerads_adapter::AdFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creative {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub cta_text: String,
    pub click_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub ad_type: String,
    /// `"self"` when a third-party network should serve the ad.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_unit_id: Option<String>,
    pub creative: Creative,
    pub tracking_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

/// `{ad, environment?}` as returned by `POST /ads/serve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdEnvelope {
    pub ad: AdResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

/// Who renders an ad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// Delegated to the adapter registered under `network`.
    Network { network: &'a str, ad_unit_id: &'a str },
    /// Rendered by the SDK from the creative.
    SelfRendered,
}

impl AdResponse {
    pub const SOURCE_SELF: &'static str = "self";
    pub const SOURCE_NETWORK: &'static str = "network";

    pub fn format(&self) -> Option<AdFormat> {
        self.ad_type.parse().ok()
    }

    /// `source == "self"` with a non-empty network delegates; everything
    /// else, including `"self"` without a network, is rendered in-SDK.
    pub fn route(&self) -> Route<'_> {
        match self.network.as_deref() {
            Some(network) if self.source == Self::SOURCE_SELF && !network.is_empty() => {
                Route::Network {
                    network,
                    ad_unit_id: self.ad_unit_id.as_deref().unwrap_or(""),
                }
            }
            _ => Route::SelfRendered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ad(source: &str, network: Option<&str>) -> AdResponse {
        AdResponse {
            id: "ad-1".into(),
            ad_type: "rewarded".into(),
            source: source.into(),
            network: network.map(str::to_string),
            ad_unit_id: Some("unit-1".into()),
            creative: Creative {
                title: "T".into(),
                description: None,
                image_url: None,
                cta_text: "Go".into(),
                click_url: "https://example.com".into(),
            },
            tracking_url: "https://t".into(),
            environment: None,
        }
    }

    #[test]
    fn routing() {
        assert_eq!(
            ad("self", Some("applovin")).route(),
            Route::Network { network: "applovin", ad_unit_id: "unit-1" }
        );
        assert_eq!(ad("self", None).route(), Route::SelfRendered);
        assert_eq!(ad("self", Some("")).route(), Route::SelfRendered);
        assert_eq!(ad("network", Some("admob")).route(), Route::SelfRendered);
    }

    #[test]
    fn decodes_server_envelope() {
        let raw = json!({
            "ad": {
                "id": "a1",
                "type": "interstitial",
                "source": "self",
                "network": "admob",
                "adUnitId": "ca-app-pub-1",
                "creative": {"title": "Hi", "ctaText": "Open", "clickUrl": "https://c"},
                "trackingUrl": "https://t",
                "environment": "test"
            },
            "environment": "test"
        });
        let env: AdEnvelope = serde_json::from_value(raw).unwrap();
        assert_eq!(env.ad.format(), Some(AdFormat::Interstitial));
        assert_eq!(env.ad.ad_unit_id.as_deref(), Some("ca-app-pub-1"));
        assert_eq!(env.ad.creative.image_url, None);
        assert_eq!(env.environment.as_deref(), Some("test"));
    }

    #[test]
    fn missing_required_field_fails() {
        let raw = json!({"ad": {"id": "a1", "type": "banner", "source": "network"}});
        assert!(serde_json::from_value::<AdEnvelope>(raw).is_err());
    }
}
