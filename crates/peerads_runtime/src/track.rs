use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle events reported to `POST /ads/track`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackEvent {
    Impression,
    Click,
    Complete,
}

impl TrackEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackEvent::Impression => "impression",
            TrackEvent::Click => "click",
            TrackEvent::Complete => "complete",
        }
    }
}

impl FromStr for TrackEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "impression" => Ok(TrackEvent::Impression),
            "click" => Ok(TrackEvent::Click),
            "complete" => Ok(TrackEvent::Complete),
            other => Err(format!("unknown track event: {other}")),
        }
    }
}

impl fmt::Display for TrackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fire-and-forget telemetry sink. Implementations must neither block the
/// caller nor report failure.
pub trait Tracker: Send + Sync {
    fn track(&self, ad_id: &str, event: TrackEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        for e in [TrackEvent::Impression, TrackEvent::Click, TrackEvent::Complete] {
            assert_eq!(serde_json::to_value(e).unwrap(), e.as_str());
            assert_eq!(e.as_str().parse::<TrackEvent>().unwrap(), e);
        }
        assert!("view".parse::<TrackEvent>().is_err());
    }
}
