//! PeerAds network adapters: the uniform capability over third-party ad SDKs.
//!
//! When the ad server answers with a network name, every load/show call for
//! that ad is routed through the [`AdapterRegistry`] to the adapter for that
//! network.
//!
//! # Architecture
//!
//! ```text
//! MediationFacade
//!   │  network name ("applovin", "meta", ... or anything else)
//!   ▼
//! AdapterRegistry::get_or_create()     one cached adapter per name
//!   │                                  unknown names → AdMob fallback
//!   ▼
//! dyn NetworkAdapter                   load_* sets readiness, show_* takes it
//!   │
//!   ▼
//! AdapterEvents ─────────────────────► host app (single receiver)
//! ```

pub mod adapter;
pub mod error;
pub mod events;
pub mod fingerprint;
pub mod networks;
pub mod registry;
pub mod types;

pub use adapter::{AdapterCore, BannerContainer, NetworkAdapter, PresentationContext};
pub use error::AdapterError;
pub use events::{AdapterEvent, AdapterEvents};
pub use fingerprint::key_fingerprint;
pub use registry::AdapterRegistry;
pub use types::{
    AdFormat, BannerSize, BannerView, Network, NetworkConfig, Presentation, PresentationSource,
    Reward,
};
