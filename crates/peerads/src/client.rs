//! Talks to the PeerAds ad server: ad requests, event tracking and daily
//! active user reports.

use crate::config::Config;
use crate::error::{PeerAdsError, Result};
use crate::models::{AdEnvelope, AdResponse};
use crate::transport::HttpTransport;
use peerads_adapter::{key_fingerprint, AdFormat};
use peerads_runtime::{TrackEvent, Tracker};
use reqwest::Url;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const SERVE_PATH: &str = "ads/serve";
pub const TRACK_PATH: &str = "ads/track";
pub const DAU_PATH: &str = "apps/dau";
pub const SECRET_KEY_HEADER: &str = "X-PeerAds-Secret-Key";

/// Stateless apart from its configuration; safe to share and call
/// concurrently.
pub struct AdServingClient<T> {
    config: Arc<Config>,
    transport: Arc<T>,
}

impl<T> Clone for AdServingClient<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: HttpTransport> AdServingClient<T> {
    pub fn new(config: Arc<Config>, transport: Arc<T>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.config.api_url.trim_end_matches('/');
        Url::parse(&format!("{base}/{path}"))
            .map_err(|e| PeerAdsError::Config(format!("invalid api url {base:?}: {e}")))
    }

    /// Asks the server which ad to show in `slot_id`. The slot is only used
    /// for diagnostics; the server picks by format.
    #[instrument(skip(self))]
    pub async fn request_ad(&self, format: AdFormat, slot_id: &str) -> Result<AdResponse> {
        let api_key = self.config.active_api_key()?;
        let url = self.endpoint(SERVE_PATH)?;
        let body = json!({
            "apiKey": api_key,
            "slotType": format,
            "platform": self.config.platform,
        });
        debug!(
            key = %key_fingerprint(api_key),
            environment = %self.config.environment,
            "requesting ad"
        );

        let bytes = self.transport.post_json(&url, &[], &body).await?;
        let envelope: AdEnvelope = serde_json::from_slice(&bytes)
            .map_err(|e| PeerAdsError::Decode(format!("ad response: {e}")))?;
        let ad = envelope.ad;
        info!(ad_id = %ad.id, source = %ad.source, network = ?ad.network, "ad served");
        Ok(ad)
    }

    /// Sends one tracking event and waits for the answer.
    pub async fn send_tracking(&self, ad_id: &str, event: TrackEvent) -> Result<()> {
        let url = self.endpoint(TRACK_PATH)?;
        let body = json!({ "adId": ad_id, "event": event });
        self.transport.post_json(&url, &[], &body).await?;
        Ok(())
    }

    /// Fire-and-forget tracking. Runs on the ambient tokio runtime; failures
    /// are logged at debug and never reach the caller.
    pub fn track(&self, ad_id: &str, event: TrackEvent) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!(ad_id, %event, "no async runtime; tracking event dropped");
            return;
        };
        let client = self.clone();
        let ad_id = ad_id.to_string();
        handle.spawn(async move {
            if let Err(e) = client.send_tracking(&ad_id, event).await {
                debug!(ad_id = %ad_id, %event, error = %e, "tracking failed");
            }
        });
    }

    /// Reports daily active users. Needs the secret key of the active
    /// environment; without one nothing is sent.
    pub async fn report_dau(&self, dau: u64) -> Result<()> {
        let secret = self.config.active_secret_key().ok_or(PeerAdsError::MissingCredential {
            environment: self.config.environment,
        })?;
        let url = self.endpoint(DAU_PATH)?;
        let body = json!({ "dau": dau });
        let bytes = self
            .transport
            .post_json(&url, &[(SECRET_KEY_HEADER, secret)], &body)
            .await?;
        if !bytes.is_empty() {
            serde_json::from_slice::<Value>(&bytes)
                .map_err(|e| PeerAdsError::Decode(format!("dau response: {e}")))?;
        }
        debug!(dau, secret = %key_fingerprint(secret), "dau reported");
        Ok(())
    }
}

impl<T: HttpTransport> Tracker for AdServingClient<T> {
    fn track(&self, ad_id: &str, event: TrackEvent) {
        AdServingClient::track(self, ad_id, event)
    }
}
