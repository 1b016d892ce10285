use tokio::net::TcpListener;
use tracing::{info, Level};

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();
    let addr = std::env::var("PEERADS_GATE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let app = peerads_gate::app();
    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
