//! PeerAds SDK core.
//!
//! [`PeerAds`] is created once per app. Its [`MediationFacade`] asks the ad
//! server for an ad with [`AdServingClient`], then either hands the ad to a
//! network adapter or renders it itself; self-rendered rewarded ads run a
//! [`peerads_runtime::RewardedSession`].
//!
//! ```no_run
//! # async fn demo() -> peerads::Result<()> {
//! use peerads::{AdFormat, Config, PeerAds};
//!
//! let sdk = PeerAds::initialize(Config::new("pk_live_..."))?;
//! let ad = sdk.facade().request_ad(AdFormat::Rewarded, "slot-002").await?;
//! sdk.facade().load_rewarded(&ad);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod facade;
pub mod models;
pub mod transport;

pub use client::AdServingClient;
pub use config::{Config, Environment, RewardedConfig, DEFAULT_API_URL};
pub use context::PeerAds;
pub use error::{PeerAdsError, Result};
pub use facade::MediationFacade;
pub use models::{AdEnvelope, AdResponse, Creative, Route};
pub use transport::{HttpTransport, ReqwestTransport};

pub use peerads_adapter::{AdFormat, AdapterEvent, BannerSize, BannerView, Network, Reward};
pub use peerads_runtime::TrackEvent;
