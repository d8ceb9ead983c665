use std::sync::Arc;
use std::time::Duration;

use crate::ws::manager::WsManager;

/// Spawn a background task that sends periodic Ping frames to every
/// connected mood-sync client.
///
/// The interval comes from `ServerConfig::ws_heartbeat_secs`; idle ticks
/// (no sockets connected) skip the ping entirely. The task runs until the
/// returned `JoinHandle` is aborted during shutdown.
pub fn start_heartbeat(
    ws_manager: Arc<WsManager>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        loop {
            ticker.tick().await;
            let count = ws_manager.connection_count().await;
            if count == 0 {
                continue;
            }
            tracing::debug!(count, "Pinging mood-sync connections");
            ws_manager.ping_all().await;
        }
    })
}
