use crate::error::AdapterError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Per-network settings handed to an adapter once, at creation time.
pub type NetworkConfig = BTreeMap<String, String>;

/// Third-party networks the registry knows how to build an adapter for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    AdMob,
    Meta,
    AppLovin,
    Unity,
    IronSource,
}

impl Network {
    pub const ALL: [Network; 5] = [
        Network::AdMob,
        Network::Meta,
        Network::AppLovin,
        Network::Unity,
        Network::IronSource,
    ];

    /// Adapter used for network names the resolution table does not know.
    pub const FALLBACK: Network = Network::AdMob;

    /// Wire name, as sent by the ad server in `AdResponse.network`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::AdMob => "admob",
            Network::Meta => "meta",
            Network::AppLovin => "applovin",
            Network::Unity => "unity",
            Network::IronSource => "ironsource",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Network::AdMob => "AdMob",
            Network::Meta => "Meta",
            Network::AppLovin => "AppLovin",
            Network::Unity => "Unity",
            Network::IronSource => "IronSource",
        }
    }

    /// Lenient lookup: unknown names resolve to [`Network::FALLBACK`].
    pub fn resolve(name: &str) -> Network {
        name.parse().unwrap_or(Self::FALLBACK)
    }
}

impl FromStr for Network {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| AdapterError::UnknownNetwork(s.to_string()))
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ad format, also the `slotType` of an ad request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdFormat {
    Banner,
    Interstitial,
    Rewarded,
}

impl AdFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdFormat::Banner => "banner",
            AdFormat::Interstitial => "interstitial",
            AdFormat::Rewarded => "rewarded",
        }
    }
}

impl FromStr for AdFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "banner" => Ok(AdFormat::Banner),
            "interstitial" => Ok(AdFormat::Interstitial),
            "rewarded" => Ok(AdFormat::Rewarded),
            other => Err(format!("unknown ad format: {other}")),
        }
    }
}

impl fmt::Display for AdFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard banner slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BannerSize {
    /// 320x50
    #[default]
    Standard,
    /// 320x100
    LargeBanner,
    /// 300x250
    MediumRect,
}

impl BannerSize {
    /// (width, height) in points.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            BannerSize::Standard => (320, 50),
            BannerSize::LargeBanner => (320, 100),
            BannerSize::MediumRect => (300, 250),
        }
    }
}

/// What a rewarded view pays out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: u32,
}

impl Reward {
    pub fn new(kind: impl Into<String>, amount: u32) -> Self {
        Self {
            kind: kind.into(),
            amount,
        }
    }
}

/// Description of a rendered banner, handed to a [`crate::BannerContainer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerView {
    /// `None` for self-rendered creatives.
    pub network: Option<Network>,
    pub size: BannerSize,
    pub label: String,
    /// Click-through target, present only for self-rendered creatives.
    pub click_url: Option<String>,
}

/// Who renders a full-screen presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationSource {
    Network { network: Network, placement: String },
    SelfRendered { ad_id: String, title: String },
}

/// A full-screen ad handed to a [`crate::PresentationContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub format: AdFormat,
    pub source: PresentationSource,
}
