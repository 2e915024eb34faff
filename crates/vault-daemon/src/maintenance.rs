//! Periodic maintenance task.
//!
//! One interval drives everything time-based: pairing-code expiry,
//! session pruning, and the snapshot flush. A failed flush is logged
//! and swallowed; the in-memory state stays authoritative.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::{time, DaemonState};

/// Run until shutdown, ticking every `snapshot_interval_secs`.
pub async fn run(state: Arc<DaemonState>, snapshot_path: PathBuf) {
    let interval_secs = state.config.server.snapshot_interval_secs.max(1);
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut shutdown_rx = state.shutdown_tx.subscribe();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = time::unix_now();
                let mut guard = state.core.lock().await;
                let core = &mut *guard;
                let swept = core.pairing.sweep(now);
                let pruned = core.sessions.prune(now);
                if swept > 0 || pruned > 0 {
                    debug!(
                        swept,
                        pruned,
                        sessions = core.sessions.live_sessions(),
                        "maintenance sweep"
                    );
                }
                if let Err(e) = core.store.save(&snapshot_path) {
                    warn!("snapshot flush failed: {e}");
                }
            }
            _ = shutdown_rx.recv() => break,
        }
    }
}
