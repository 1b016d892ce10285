use clap::{Parser, Subcommand};
use colored::Colorize;
use peerads::{AdFormat, Config, Environment, PeerAdsError, DEFAULT_API_URL};
use peerads_runtime::TrackEvent;
use std::process;
use tracing::Level;

mod commands;

/// Exit codes: 0 = OK, 2 = input/config error, 4 = auth (401/403 or missing
/// secret), 5 = rate limit (429), 1 = other.
const EXIT_OTHER: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_AUTH: i32 = 4;
const EXIT_RATE: i32 = 5;

#[derive(Parser)]
#[command(name = "peeradsx", version, about = "PeerAds CLI: request, mediate, track")]
struct Cli {
    /// Ad server API base URL
    #[arg(long, env = "PEERADS_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Production publishable key
    #[arg(long, env = "PEERADS_API_KEY", default_value = "")]
    api_key: String,

    /// Production secret key (DAU reporting)
    #[arg(long, env = "PEERADS_SECRET_KEY")]
    secret_key: Option<String>,

    #[arg(long, env = "PEERADS_TEST_API_KEY")]
    test_api_key: Option<String>,

    #[arg(long, env = "PEERADS_TEST_SECRET_KEY")]
    test_secret_key: Option<String>,

    /// production | test
    #[arg(long = "env", env = "PEERADS_ENV", default_value = "production")]
    environment: Environment,

    #[arg(long, env = "PEERADS_TEST_MODE")]
    test_mode: bool,

    /// JSON file mapping network name to its settings
    #[arg(long)]
    networks: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the server for an ad and print it
    Request {
        /// banner | interstitial | rewarded
        format: AdFormat,
        #[arg(default_value = "default")]
        slot: String,
    },
    /// Send one tracking event
    Track {
        ad_id: String,
        /// impression | click | complete
        event: TrackEvent,
    },
    /// Report daily active users
    Dau { count: u64 },
    /// Request, load and show an interstitial
    Interstitial {
        #[arg(default_value = "default")]
        slot: String,
    },
    /// Request, load and show a rewarded ad, simulating the viewer
    Rewarded {
        #[arg(default_value = "default")]
        slot: String,
        /// Seconds the simulated viewer watches before closing
        /// (default: the configured watch duration)
        #[arg(long)]
        watch_secs: Option<u64>,
        /// Close without claiming the reward
        #[arg(long)]
        close_early: bool,
    },
    /// Check gate server health
    Health {
        /// Gate base URL
        #[arg(long, env = "PEERADS_GATE_URL", default_value = "http://localhost:3000")]
        gate: String,
    },
}

impl Cli {
    fn config(&self) -> Result<Config, PeerAdsError> {
        let mut config = Config::new(self.api_key.clone())
            .with_api_url(self.api_url.clone())
            .with_environment(self.environment)
            .with_test_mode(self.test_mode);
        config.secret_key = self.secret_key.clone();
        config.test_api_key = self.test_api_key.clone();
        config.test_secret_key = self.test_secret_key.clone();
        if let Some(path) = &self.networks {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| PeerAdsError::Config(format!("read {path}: {e}")))?;
            config.networks = serde_json::from_str(&raw)
                .map_err(|e| PeerAdsError::Config(format!("parse {path}: {e}")))?;
        }
        Ok(config)
    }
}

fn exit_code_for(err: &PeerAdsError) -> i32 {
    match err {
        PeerAdsError::Config(_) => EXIT_INPUT,
        PeerAdsError::MissingCredential { .. } => EXIT_AUTH,
        PeerAdsError::Transport { status: Some(401 | 403), .. } => EXIT_AUTH,
        PeerAdsError::Transport { status: Some(429), .. } => EXIT_RATE,
        _ => EXIT_OTHER,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let result = run(&cli).await;
    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(exit_code_for(&e));
    }
}

async fn run(cli: &Cli) -> Result<(), PeerAdsError> {
    if let Commands::Health { gate } = &cli.command {
        return commands::health(gate).await;
    }
    let mut sdk = commands::Sdk::start(cli.config()?)?;
    let result = match &cli.command {
        Commands::Request { format, slot } => commands::request(&sdk, *format, slot).await,
        Commands::Track { ad_id, event } => commands::track(&sdk, ad_id, *event).await,
        Commands::Dau { count } => commands::dau(&sdk, *count).await,
        Commands::Interstitial { slot } => commands::interstitial(&mut sdk, slot).await,
        Commands::Rewarded { slot, watch_secs, close_early } => {
            commands::rewarded(&mut sdk, slot, *watch_secs, *close_early).await
        }
        Commands::Health { .. } => Ok(()),
    };
    sdk.finish().await;
    result
}
