//! PeerAds rewarded-ad runtime.
//!
//! A rewarded presentation is supervised by a [`RewardedSession`]: the
//! renderer posts bridge events, the session decides when the viewer is
//! eligible and guarantees the reward is granted at most once.

pub mod bridge;
pub mod error;
pub mod presentation;
pub mod session;
pub mod track;

pub use bridge::{BridgeEvent, BridgeSender, RewardPayload};
pub use error::RuntimeError;
pub use presentation::{
    RenderRequest, RewardedCallbacks, RewardedListener, RewardedPresentation, RewardedRenderer,
    SessionReport,
};
pub use session::{Effect, Ignored, RewardPolicy, RewardedSession, SessionState, Step};
pub use track::{TrackEvent, Tracker};
