//! vault-daemon: the marketplace core daemon.
//!
//! Single OS process running a Tokio async runtime. Clients talk
//! JSON-RPC over a Unix socket; the messaging-bot and payment-gateway
//! transports call back in through the same surface. All mutable state
//! sits behind one lock, so every command runs read-modify-write
//! without interleaving.

mod commands;
mod config;
mod events;
mod maintenance;
mod rpc;
mod sessions;
mod time;

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::{error, info};
use vault_auth::flow::AuthConfig;
use vault_auth::pairing::PairingRegistry;
use vault_gateway::{ChannelNotifier, Notifier, OutboundMessage};
use vault_store::Store;

use crate::config::DaemonConfig;
use crate::events::EventBus;
use crate::rpc::RpcServer;
use crate::sessions::SessionStore;

/// Everything the one lock guards: commands serialize here.
pub struct CoreState {
    /// The marketplace state.
    pub store: Store,
    /// Live pairing codes and pending registrations.
    pub pairing: PairingRegistry,
    /// Live session tokens.
    pub sessions: SessionStore,
}

/// Daemon-wide shared state.
pub struct DaemonState {
    /// Mutable core behind the single writer lock.
    pub core: Mutex<CoreState>,
    /// Configuration.
    pub config: DaemonConfig,
    /// Auth knobs derived from the configuration.
    pub auth_config: AuthConfig,
    /// Event bus for pushing events to subscribers.
    pub event_bus: EventBus,
    /// Outbound messaging gateway.
    pub notifier: Arc<dyn Notifier>,
    /// Shutdown signal sender.
    pub shutdown_tx: broadcast::Sender<()>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vault=info".parse()?),
        )
        .init();

    info!("Vault daemon starting");

    // 1. Load config
    let config = DaemonConfig::load()?;
    let data_dir = config.data_dir();

    // Ensure data directory exists
    std::fs::create_dir_all(&data_dir)?;

    // 2. Load the snapshot (missing file = fresh start)
    let snapshot_path = data_dir.join("vault.json");
    let store = Store::load(&snapshot_path)?;

    // 3. Outbound gateway channel + event bus
    let (notifier, outbound_rx) = ChannelNotifier::channel(config.gateway.outbound_queue);
    let event_bus = EventBus::new(1000);

    // 4. Create shutdown channel
    let (shutdown_tx, _shutdown_rx) = broadcast::channel(1);

    // 5. Build daemon state
    let auth_config = AuthConfig {
        bot_username: config.gateway.bot_username.clone(),
        starting_bonus: config.registration.starting_bonus,
    };
    let state = Arc::new(DaemonState {
        core: Mutex::new(CoreState {
            store,
            pairing: PairingRegistry::new(),
            sessions: SessionStore::new(),
        }),
        config,
        auth_config,
        event_bus,
        notifier: Arc::new(notifier),
        shutdown_tx: shutdown_tx.clone(),
    });

    // 6. Background tasks: outbound drain + event log + maintenance
    tokio::spawn(drain_outbound(outbound_rx));
    let event_state = state.clone();
    tokio::spawn(async move {
        let mut rx = event_state.event_bus.subscribe();
        while let Ok(event) = rx.recv().await {
            tracing::debug!(
                seq = event_state.event_bus.sequence(),
                event_type = %event.event_type,
                "event emitted"
            );
        }
    });
    tokio::spawn(maintenance::run(state.clone(), snapshot_path.clone()));

    // 7. Start IPC server
    let socket_path = data_dir.join("daemon.sock");
    let rpc_server = RpcServer::new(state.clone(), socket_path.clone());

    info!("Starting JSON-RPC server on {:?}", socket_path);

    state.event_bus.emit(events::Event::new(
        "DaemonStarted",
        time::unix_now(),
        serde_json::json!({"version": env!("CARGO_PKG_VERSION")}),
    ));

    // 8. Run the RPC server until shutdown
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::select! {
        result = rpc_server.run() => {
            if let Err(e) = result {
                error!("RPC server error: {}", e);
            }
        }
        _ = shutdown_rx.recv() => {
            info!("Shutdown signal received");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
        }
    }

    // Graceful shutdown: one final snapshot flush
    info!("Daemon shutting down gracefully");
    {
        let guard = state.core.lock().await;
        if let Err(e) = guard.store.save(&snapshot_path) {
            error!("final snapshot flush failed: {e}");
        }
    }

    // Clean up socket file
    let _ = std::fs::remove_file(&socket_path);

    info!("Daemon stopped");
    Ok(())
}

/// Drain outbound gateway messages.
///
/// The production transport posts these to the bot API; delivery
/// failures are logged and never propagate back into the core.
async fn drain_outbound(mut rx: mpsc::Receiver<OutboundMessage>) {
    while let Some(message) = rx.recv().await {
        info!(chat_id = message.chat_id, text = %message.text, "outbound notification");
    }
}
