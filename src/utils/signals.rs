//! Signal handling for graceful shutdown

use futures::stream::StreamExt;
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::info;

/// Wait for the first shutdown signal (SIGTERM, SIGINT, SIGHUP) and return it
pub async fn shutdown_signal() -> std::io::Result<i32> {
    let mut signals = Signals::new([SIGTERM, SIGINT, SIGHUP])?;
    let handle = signals.handle();

    let signal = signals.next().await.unwrap_or(SIGTERM);
    handle.close();

    info!("Received signal: {}", signal);
    Ok(signal)
}
