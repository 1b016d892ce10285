//! Rewarded session: the eligibility state machine behind one rewarded-ad
//! presentation.
//!
//! ```text
//! Presenting ──rewardAvailable──► Eligible ──rewardEarned──► Claimed
//!     │                              │                          │
//!     └──────────closed──────────────┴─────────closed───────────┴──► Closed
//! ```
//!
//! The machine is pure: [`RewardedSession::apply`] takes one event and
//! returns the transition with the side effects the caller must perform. It
//! never clocks the watch duration itself; `rewardAvailable` is the only
//! eligibility signal, and `rewardEarned` is refused until it has arrived.

use crate::bridge::BridgeEvent;
use crate::track::TrackEvent;
use peerads_adapter::Reward;
use std::time::Duration;

pub const DEFAULT_WATCH_DURATION: Duration = Duration::from_secs(30);

/// Session settings shared by every rewarded presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardPolicy {
    /// Passed to the renderer; the session does not time anything.
    pub watch_duration: Duration,
    /// Used for fields the renderer's reward payload omits.
    pub default_reward: Reward,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self {
            watch_duration: DEFAULT_WATCH_DURATION,
            default_reward: Reward::new("coins", 10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Presenting,
    Eligible,
    Claimed,
    Closed,
}

/// Work the caller performs after a transition, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Track(TrackEvent),
    RewardAvailable(Reward),
    RewardEarned(Reward),
    Closed { reward_granted: bool },
}

/// Why an event was dropped without a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    /// `rewardEarned` before `rewardAvailable`. Never credited.
    EarnedBeforeEligible,
    /// A repeated `rewardAvailable`.
    AlreadyEligible,
    /// A repeated `rewardEarned`.
    AlreadyClaimed,
    /// Anything after `closed`.
    SessionClosed,
}

impl Ignored {
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Ignored::EarnedBeforeEligible)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Applied {
        from: SessionState,
        to: SessionState,
        effects: Vec<Effect>,
    },
    Ignored {
        state: SessionState,
        reason: Ignored,
    },
}

impl Step {
    pub fn effects(&self) -> &[Effect] {
        match self {
            Step::Applied { effects, .. } => effects,
            Step::Ignored { .. } => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub struct RewardedSession {
    ad_id: String,
    policy: RewardPolicy,
    state: SessionState,
    offered: Option<Reward>,
    granted: Option<Reward>,
}

impl RewardedSession {
    pub fn new(ad_id: impl Into<String>, policy: RewardPolicy) -> Self {
        Self {
            ad_id: ad_id.into(),
            policy,
            state: SessionState::Presenting,
            offered: None,
            granted: None,
        }
    }

    pub fn ad_id(&self) -> &str {
        &self.ad_id
    }

    pub fn watch_duration(&self) -> Duration {
        self.policy.watch_duration
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state == SessionState::Closed
    }

    /// Set once by `rewardEarned`; never cleared.
    pub fn reward_granted(&self) -> bool {
        self.granted.is_some()
    }

    pub fn offered_reward(&self) -> Option<&Reward> {
        self.offered.as_ref()
    }

    pub fn granted_reward(&self) -> Option<&Reward> {
        self.granted.as_ref()
    }

    pub fn apply(&mut self, event: BridgeEvent) -> Step {
        use SessionState::*;

        let from = self.state;
        let (to, effects) = match (from, event) {
            (Closed, _) => return self.ignore(Ignored::SessionClosed),

            (_, BridgeEvent::Impression) => (from, vec![Effect::Track(TrackEvent::Impression)]),

            (Presenting, BridgeEvent::RewardAvailable(payload)) => {
                let reward = payload.resolve(&self.policy.default_reward);
                self.offered = Some(reward.clone());
                (Eligible, vec![Effect::RewardAvailable(reward)])
            }
            (Eligible | Claimed, BridgeEvent::RewardAvailable(_)) => {
                return self.ignore(Ignored::AlreadyEligible)
            }

            (Presenting, BridgeEvent::RewardEarned(_)) => {
                return self.ignore(Ignored::EarnedBeforeEligible)
            }
            (Eligible, BridgeEvent::RewardEarned(payload)) => {
                let base = self.offered.as_ref().unwrap_or(&self.policy.default_reward);
                let reward = payload.resolve(base);
                self.granted = Some(reward.clone());
                (
                    Claimed,
                    vec![Effect::Track(TrackEvent::Complete), Effect::RewardEarned(reward)],
                )
            }
            (Claimed, BridgeEvent::RewardEarned(_)) => return self.ignore(Ignored::AlreadyClaimed),

            (Presenting | Eligible | Claimed, BridgeEvent::Closed) => (
                Closed,
                vec![Effect::Closed { reward_granted: self.reward_granted() }],
            ),
        };
        self.state = to;
        Step::Applied { from, to, effects }
    }

    fn ignore(&self, reason: Ignored) -> Step {
        Step::Ignored { state: self.state, reason }
    }
}
