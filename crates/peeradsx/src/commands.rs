use colored::Colorize;
use peerads::{AdFormat, AdResponse, Config, PeerAds, PeerAdsError, Route};
use peerads_adapter::{AdapterEvent, Presentation, PresentationContext, PresentationSource};
use peerads_runtime::{
    BridgeSender, RenderRequest, RewardedCallbacks, RewardedRenderer, TrackEvent,
};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// Time given to fire-and-forget tracking before the process exits.
const TRACKING_GRACE: Duration = Duration::from_millis(300);

pub struct Sdk {
    ads: PeerAds,
    events: Option<UnboundedReceiver<AdapterEvent>>,
}

impl Sdk {
    pub fn start(config: Config) -> Result<Self, PeerAdsError> {
        let mut ads = PeerAds::initialize(config)?;
        let events = ads.take_adapter_events();
        Ok(Self { ads, events })
    }

    fn print_events(&mut self) {
        let Some(rx) = self.events.as_mut() else { return };
        while let Ok(event) = rx.try_recv() {
            let line = match &event {
                AdapterEvent::BannerLoaded { network, view } => {
                    format!("{network}: banner loaded ({})", view.label)
                }
                AdapterEvent::InterstitialLoaded { network } => {
                    format!("{network}: interstitial loaded")
                }
                AdapterEvent::RewardedLoaded { network } => format!("{network}: rewarded loaded"),
                AdapterEvent::RewardEarned { network, reward } => {
                    format!("{network}: reward earned {} {}", reward.amount, reward.kind)
                }
                AdapterEvent::BannerFailed { error, .. }
                | AdapterEvent::InterstitialFailed { error, .. }
                | AdapterEvent::RewardedFailed { error, .. } => {
                    println!("{} {}", "event:".dimmed(), error.to_string().red());
                    continue;
                }
            };
            println!("{} {}", "event:".dimmed(), line.cyan());
        }
    }

    pub async fn finish(self) {
        tokio::time::sleep(TRACKING_GRACE).await;
        self.ads.shutdown();
    }
}

/// Prints full-screen presentations instead of drawing them.
struct Terminal;

impl PresentationContext for Terminal {
    fn present(&self, presentation: Presentation) {
        let who = match presentation.source {
            PresentationSource::Network { network, placement } => {
                format!("{network} [{placement}]")
            }
            PresentationSource::SelfRendered { ad_id, title } => format!("\"{title}\" ({ad_id})"),
        };
        println!("{} {} {}", "present:".dimmed(), presentation.format.as_str().bold(), who);
    }
}

/// Plays a self-rendered rewarded ad by posting bridge messages on a timer.
struct SimulatedViewer {
    watch: Option<Duration>,
    claim: bool,
}

impl RewardedRenderer for SimulatedViewer {
    fn render(&self, request: RenderRequest, bridge: BridgeSender) {
        println!("{} \"{}\" {}", "render:".dimmed(), request.title, request.description.dimmed());
        let required = request.watch_duration;
        let watch = self.watch.unwrap_or(required);
        let claim = self.claim;
        tokio::spawn(async move {
            bridge.post_message(&json!({"event": "impression"}));
            if watch >= required {
                tokio::time::sleep(required).await;
                bridge.post_message(&json!({"event": "rewardAvailable"}));
                if claim {
                    bridge.post_message(&json!({"event": "rewardEarned"}));
                }
                tokio::time::sleep(watch - required).await;
            } else {
                tokio::time::sleep(watch).await;
            }
            bridge.post_message(&json!({"event": "closed"}));
        });
    }
}

fn print_ad(ad: &AdResponse) {
    println!("{} {}", "Ad:     ".dimmed(), ad.id.cyan());
    println!("{} {}", "Type:   ".dimmed(), ad.ad_type);
    let route = match ad.route() {
        Route::Network { network, ad_unit_id } => format!("{network} [{ad_unit_id}]").yellow(),
        Route::SelfRendered => "self-rendered".green(),
    };
    println!("{} {}", "Route:  ".dimmed(), route);
    println!("{} {}", "Title:  ".dimmed(), ad.creative.title);
    println!("{} {}", "CTA:    ".dimmed(), ad.creative.cta_text);
    if let Some(env) = &ad.environment {
        println!("{} {}", "Env:    ".dimmed(), env.dimmed());
    }
}

// ── request ─────────────────────────────────────────────────────

pub async fn request(sdk: &Sdk, format: AdFormat, slot: &str) -> Result<(), PeerAdsError> {
    let ad = sdk.ads.facade().request_ad(format, slot).await?;
    print_ad(&ad);
    Ok(())
}

// ── track / dau ─────────────────────────────────────────────────

pub async fn track(sdk: &Sdk, ad_id: &str, event: TrackEvent) -> Result<(), PeerAdsError> {
    sdk.ads.facade().client().send_tracking(ad_id, event).await?;
    println!("{} {} {}", "tracked".green(), event, ad_id.cyan());
    Ok(())
}

pub async fn dau(sdk: &Sdk, count: u64) -> Result<(), PeerAdsError> {
    sdk.ads.facade().report_dau(count).await?;
    println!("{} {}", "DAU reported:".green(), count);
    Ok(())
}

// ── interstitial ────────────────────────────────────────────────

pub async fn interstitial(sdk: &mut Sdk, slot: &str) -> Result<(), PeerAdsError> {
    let facade = sdk.ads.facade().clone();
    let ad = facade.request_ad(AdFormat::Interstitial, slot).await?;
    print_ad(&ad);
    facade.load_interstitial(&ad);
    if !facade.is_interstitial_ready(&ad) {
        sdk.print_events();
        println!("{}", "not ready".yellow());
        return Ok(());
    }
    facade.show_interstitial(&ad, &Terminal);
    sdk.print_events();
    Ok(())
}

// ── rewarded ────────────────────────────────────────────────────

pub async fn rewarded(
    sdk: &mut Sdk,
    slot: &str,
    watch_secs: Option<u64>,
    close_early: bool,
) -> Result<(), PeerAdsError> {
    let facade = sdk.ads.facade().clone();
    let ad = facade.request_ad(AdFormat::Rewarded, slot).await?;
    print_ad(&ad);

    if let Route::Network { .. } = ad.route() {
        facade.load_rewarded(&ad);
        if facade.is_rewarded_ready(&ad) {
            facade.show_rewarded(&ad, &Terminal);
        } else {
            println!("{}", "not ready".yellow());
        }
        sdk.print_events();
        return Ok(());
    }

    let viewer = SimulatedViewer {
        watch: watch_secs.map(Duration::from_secs),
        claim: !close_early,
    };
    let callbacks = RewardedCallbacks::new()
        .on_reward_available(|r| {
            println!("{} {} {}", "reward available:".dimmed(), r.amount, r.kind)
        })
        .on_reward_earned(|r| {
            println!("{} {} {}", "reward earned:".green().bold(), r.amount, r.kind)
        })
        .on_closed(|granted| println!("{} reward_granted={granted}", "closed:".dimmed()));
    let report = facade.present_rewarded(&ad, &viewer, callbacks).run().await;

    let summary: Value = json!({
        "adId": report.ad_id,
        "state": format!("{:?}", report.state),
        "reward": report.reward,
    });
    println!("{}", serde_json::to_string_pretty(&summary).unwrap_or_default());
    Ok(())
}

// ── health ──────────────────────────────────────────────────────

pub async fn health(gate: &str) -> Result<(), PeerAdsError> {
    let url = format!("{}/healthz", gate.trim_end_matches('/'));
    let resp = reqwest::get(&url)
        .await
        .map_err(|e| PeerAdsError::transport(format!("request failed: {e}")))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(PeerAdsError::status(status.as_u16(), format!("HTTP {status} from {url}")));
    }
    let body: Value = resp
        .json()
        .await
        .map_err(|e| PeerAdsError::Decode(format!("parse response: {e}")))?;
    if body.get("ok").and_then(Value::as_bool) == Some(true) {
        println!("{} {}", "healthy".green().bold(), gate.dimmed());
        Ok(())
    } else {
        Err(PeerAdsError::Decode(format!("unexpected health body: {body}")))
    }
}
