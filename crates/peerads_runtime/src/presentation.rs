//! Drives a [`RewardedSession`] from the renderer's event queue.
//!
//! One presentation owns one session and the only receiver of its bridge
//! queue, so events are applied strictly one at a time in arrival order.

use crate::bridge::{BridgeEvent, BridgeSender};
use crate::session::{Effect, RewardPolicy, RewardedSession, SessionState, Step};
use crate::track::Tracker;
use peerads_adapter::Reward;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, warn};

/// What a renderer needs to draw a rewarded ad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub ad_id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    /// How long the viewer must watch before the renderer posts `rewardAvailable`.
    pub watch_duration: Duration,
}

/// The full-screen renderer (web view, video player, ...). It posts bridge
/// events through the sender until the viewer closes the ad.
pub trait RewardedRenderer {
    fn render(&self, request: RenderRequest, bridge: BridgeSender);
}

/// Host callbacks. Each fires at most once per presentation.
pub trait RewardedListener: Send {
    /// The viewer has watched long enough to claim.
    fn on_reward_available(&mut self, _reward: &Reward) {}

    /// The viewer claimed; credit the reward.
    fn on_reward_earned(&mut self, _reward: &Reward) {}

    fn on_closed(&mut self, _reward_granted: bool) {}
}

type RewardFn = Box<dyn FnMut(&Reward) + Send>;
type ClosedFn = Box<dyn FnMut(bool) + Send>;

/// Closure-based [`RewardedListener`].
#[derive(Default)]
pub struct RewardedCallbacks {
    on_reward_available: Option<RewardFn>,
    on_reward_earned: Option<RewardFn>,
    on_closed: Option<ClosedFn>,
}

impl RewardedCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_reward_available(mut self, f: impl FnMut(&Reward) + Send + 'static) -> Self {
        self.on_reward_available = Some(Box::new(f));
        self
    }

    pub fn on_reward_earned(mut self, f: impl FnMut(&Reward) + Send + 'static) -> Self {
        self.on_reward_earned = Some(Box::new(f));
        self
    }

    pub fn on_closed(mut self, f: impl FnMut(bool) + Send + 'static) -> Self {
        self.on_closed = Some(Box::new(f));
        self
    }
}

impl RewardedListener for RewardedCallbacks {
    fn on_reward_available(&mut self, reward: &Reward) {
        if let Some(f) = self.on_reward_available.as_mut() {
            f(reward);
        }
    }

    fn on_reward_earned(&mut self, reward: &Reward) {
        if let Some(f) = self.on_reward_earned.as_mut() {
            f(reward);
        }
    }

    fn on_closed(&mut self, reward_granted: bool) {
        if let Some(f) = self.on_closed.as_mut() {
            f(reward_granted);
        }
    }
}

/// How a presentation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub ad_id: String,
    pub state: SessionState,
    pub reward: Option<Reward>,
}

impl SessionReport {
    pub fn reward_granted(&self) -> bool {
        self.reward.is_some()
    }
}

pub struct RewardedPresentation<L> {
    session: RewardedSession,
    events: UnboundedReceiver<BridgeEvent>,
    tracker: Arc<dyn Tracker>,
    listener: L,
}

impl<L: RewardedListener> RewardedPresentation<L> {
    /// Creates the presentation and the sender its renderer posts into.
    pub fn new(
        ad_id: impl Into<String>,
        policy: RewardPolicy,
        tracker: Arc<dyn Tracker>,
        listener: L,
    ) -> (Self, BridgeSender) {
        let (tx, rx) = mpsc::unbounded_channel();
        let presentation = Self {
            session: RewardedSession::new(ad_id, policy),
            events: rx,
            tracker,
            listener,
        };
        (presentation, BridgeSender::new(tx))
    }

    pub fn session(&self) -> &RewardedSession {
        &self.session
    }

    pub fn render_request(&self, title: &str, description: &str, image_url: &str) -> RenderRequest {
        RenderRequest {
            ad_id: self.session.ad_id().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            image_url: image_url.to_string(),
            watch_duration: self.session.watch_duration(),
        }
    }

    /// Applies one event and performs its effects.
    pub fn dispatch(&mut self, event: BridgeEvent) -> Step {
        let name = event.name();
        let step = self.session.apply(event);
        match &step {
            Step::Applied { from, to, effects } => {
                debug!(
                    ad_id = %self.session.ad_id(),
                    event = name,
                    ?from,
                    ?to,
                    "rewarded transition"
                );
                for effect in effects {
                    self.perform(effect);
                }
            }
            Step::Ignored { state, reason } if reason.is_protocol_violation() => {
                warn!(
                    ad_id = %self.session.ad_id(),
                    event = name,
                    ?state,
                    ?reason,
                    "bridge protocol violation ignored"
                );
            }
            Step::Ignored { state, reason } => {
                debug!(
                    ad_id = %self.session.ad_id(),
                    event = name,
                    ?state,
                    ?reason,
                    "bridge event ignored"
                );
            }
        }
        step
    }

    /// Consumes bridge events until the session closes. If every sender is
    /// dropped first, the presentation is closed as if the renderer had
    /// posted `closed`.
    pub async fn run(mut self) -> SessionReport {
        while !self.session.is_terminal() {
            match self.events.recv().await {
                Some(event) => {
                    self.dispatch(event);
                }
                None => {
                    debug!(ad_id = %self.session.ad_id(), "renderer hung up; closing session");
                    self.dispatch(BridgeEvent::Closed);
                }
            }
        }
        self.events.close();
        SessionReport {
            ad_id: self.session.ad_id().to_string(),
            state: self.session.state(),
            reward: self.session.granted_reward().cloned(),
        }
    }

    fn perform(&mut self, effect: &Effect) {
        match effect {
            Effect::Track(event) => self.tracker.track(self.session.ad_id(), *event),
            Effect::RewardAvailable(reward) => self.listener.on_reward_available(reward),
            Effect::RewardEarned(reward) => self.listener.on_reward_earned(reward),
            Effect::Closed { reward_granted } => self.listener.on_closed(*reward_granted),
        }
    }
}
