//! Concrete adapters, one per [`Network`], and the table that builds them.

mod admob;
mod applovin;
mod ironsource;
mod meta;
mod unity;

pub use admob::AdMobAdapter;
pub use applovin::AppLovinAdapter;
pub use ironsource::IronSourceAdapter;
pub use meta::MetaAdapter;
pub use unity::{UnityAdapter, UnityPlacements};

use crate::adapter::NetworkAdapter;
use crate::events::AdapterEvents;
use crate::types::Network;
use std::sync::Arc;

/// Resolution table. Adding a network means adding a variant and a line here.
pub fn build(network: Network, events: AdapterEvents) -> Arc<dyn NetworkAdapter> {
    match network {
        Network::AdMob => Arc::new(AdMobAdapter::new(events)),
        Network::Meta => Arc::new(MetaAdapter::new(events)),
        Network::AppLovin => Arc::new(AppLovinAdapter::new(events)),
        Network::Unity => Arc::new(UnityAdapter::new(events)),
        Network::IronSource => Arc::new(IronSourceAdapter::new(events)),
    }
}
