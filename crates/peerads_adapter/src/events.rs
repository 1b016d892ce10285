//! Delegate-style notifications raised by adapters.
//!
//! Every adapter created by one registry shares the same sending half; the
//! host app holds the single receiver. Emitting never blocks and never fails:
//! with nobody listening the event is dropped.

use crate::error::AdapterError;
use crate::types::{BannerView, Network, Reward};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterEvent {
    BannerLoaded { network: Network, view: BannerView },
    BannerFailed { network: Network, error: AdapterError },
    InterstitialLoaded { network: Network },
    InterstitialFailed { network: Network, error: AdapterError },
    RewardedLoaded { network: Network },
    RewardedFailed { network: Network, error: AdapterError },
    /// Raised only after the network's presentation completed.
    RewardEarned { network: Network, reward: Reward },
}

impl AdapterEvent {
    pub fn network(&self) -> Network {
        match self {
            AdapterEvent::BannerLoaded { network, .. }
            | AdapterEvent::BannerFailed { network, .. }
            | AdapterEvent::InterstitialLoaded { network }
            | AdapterEvent::InterstitialFailed { network, .. }
            | AdapterEvent::RewardedLoaded { network }
            | AdapterEvent::RewardedFailed { network, .. }
            | AdapterEvent::RewardEarned { network, .. } => *network,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdapterEvents {
    tx: Option<UnboundedSender<AdapterEvent>>,
}

impl AdapterEvents {
    pub fn channel() -> (Self, UnboundedReceiver<AdapterEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A sink that discards everything.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, event: AdapterEvent) {
        let Some(tx) = &self.tx else { return };
        if let Err(e) = tx.send(event) {
            tracing::trace!(network = %e.0.network(), "adapter event dropped: no listener");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_reaches_receiver_in_order() {
        let (events, mut rx) = AdapterEvents::channel();
        events.emit(AdapterEvent::InterstitialLoaded { network: Network::Meta });
        events.emit(AdapterEvent::RewardedLoaded { network: Network::Unity });
        assert_eq!(rx.try_recv().unwrap().network(), Network::Meta);
        assert_eq!(rx.try_recv().unwrap().network(), Network::Unity);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn emit_without_listener_is_silent() {
        let (events, rx) = AdapterEvents::channel();
        drop(rx);
        events.emit(AdapterEvent::InterstitialLoaded { network: Network::AdMob });
        AdapterEvents::disabled()
            .emit(AdapterEvent::InterstitialLoaded { network: Network::AdMob });
    }
}
