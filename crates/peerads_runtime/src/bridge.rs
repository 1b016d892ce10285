//! Renderer bridge: the `{event, data}` messages a rewarded-ad renderer posts
//! while it plays, decoded into typed events and queued for one consumer.

use crate::error::{Result, RuntimeError};
use peerads_adapter::Reward;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

/// Reward fields as sent by the renderer. Missing or invalid fields are
/// filled in from the session's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardPayload {
    pub kind: Option<String>,
    pub amount: Option<u32>,
}

impl RewardPayload {
    fn from_data(data: &Value) -> Self {
        Self {
            kind: data.get("type").and_then(Value::as_str).map(str::to_string),
            amount: data
                .get("amount")
                .and_then(Value::as_u64)
                .and_then(|a| u32::try_from(a).ok()),
        }
    }

    pub fn resolve(&self, default: &Reward) -> Reward {
        Reward {
            kind: self.kind.clone().unwrap_or_else(|| default.kind.clone()),
            amount: self.amount.unwrap_or(default.amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    Impression,
    RewardAvailable(RewardPayload),
    RewardEarned(RewardPayload),
    Closed,
}

impl BridgeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            BridgeEvent::Impression => "impression",
            BridgeEvent::RewardAvailable(_) => "rewardAvailable",
            BridgeEvent::RewardEarned(_) => "rewardEarned",
            BridgeEvent::Closed => "closed",
        }
    }

    /// Decodes `{event: string, data?: object}`. A non-object `data` counts as `{}`.
    pub fn from_message(message: &Value) -> Result<Self> {
        let event = message
            .get("event")
            .and_then(Value::as_str)
            .ok_or_else(|| RuntimeError::Bridge("message has no string 'event'".into()))?;
        let empty = Value::Object(Default::default());
        let data = message.get("data").filter(|d| d.is_object()).unwrap_or(&empty);
        match event {
            "impression" => Ok(BridgeEvent::Impression),
            "rewardAvailable" => Ok(BridgeEvent::RewardAvailable(RewardPayload::from_data(data))),
            "rewardEarned" => Ok(BridgeEvent::RewardEarned(RewardPayload::from_data(data))),
            "closed" => Ok(BridgeEvent::Closed),
            other => Err(RuntimeError::Bridge(format!("unknown event: {other}"))),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let message: Value = serde_json::from_str(raw)?;
        Self::from_message(&message)
    }
}

/// Handle the renderer uses to post events into a presentation's queue.
///
/// Events are delivered in the order they are posted and consumed by exactly
/// one presentation. Posting after the presentation has finished is a no-op.
#[derive(Debug, Clone)]
pub struct BridgeSender {
    tx: UnboundedSender<BridgeEvent>,
}

impl BridgeSender {
    pub(crate) fn new(tx: UnboundedSender<BridgeEvent>) -> Self {
        Self { tx }
    }

    /// Returns `false` when the presentation is no longer listening.
    pub fn send(&self, event: BridgeEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Decodes and enqueues a raw bridge message. Malformed messages and
    /// unknown event names are dropped.
    pub fn post_message(&self, message: &Value) -> bool {
        match BridgeEvent::from_message(message) {
            Ok(event) => self.send(event),
            Err(e) => {
                debug!("bridge message dropped: {e}");
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
