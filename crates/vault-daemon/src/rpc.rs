//! JSON-RPC server over Unix socket.
//!
//! Listens on a Unix domain socket, accepts connections, and dispatches
//! JSON-RPC method calls to the appropriate command handlers. Every
//! domain error is recovered here and surfaced as a coded RPC error;
//! none are fatal to the process.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;
use tracing::{debug, error, info, warn};

use crate::commands;
use crate::DaemonState;

/// JSON-RPC request.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    /// JSON-RPC version (must be "2.0").
    pub jsonrpc: String,
    /// Request ID.
    pub id: serde_json::Value,
    /// Method name.
    pub method: String,
    /// Parameters.
    #[serde(default)]
    pub params: serde_json::Value,
}

/// JSON-RPC response.
#[derive(Debug, Serialize)]
pub struct RpcResponse {
    /// JSON-RPC version.
    pub jsonrpc: String,
    /// Request ID.
    pub id: serde_json::Value,
    /// Result or error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RpcError {
    /// Stable numeric code.
    pub code: i32,
    /// Error name.
    pub message: String,
    /// Optional structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcResponse {
    /// Create a success response.
    pub fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: serde_json::Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

impl RpcError {
    // Standard JSON-RPC errors

    /// Parse error (-32700).
    pub fn parse_error() -> Self {
        Self {
            code: -32700,
            message: "PARSE_ERROR".to_string(),
            data: None,
        }
    }

    /// Method not found (-32601).
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "METHOD_NOT_FOUND".to_string(),
            data: Some(serde_json::json!({"method": method})),
        }
    }

    /// Invalid params (-32602).
    pub fn invalid_params(detail: &str) -> Self {
        Self {
            code: -32602,
            message: "INVALID_PARAMS".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    /// Internal error (-32603).
    pub fn internal_error(detail: &str) -> Self {
        Self {
            code: -32603,
            message: "INTERNAL_ERROR".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    // Domain errors

    /// Missing or stale session token (-32001).
    pub fn unauthorized() -> Self {
        Self {
            code: -32001,
            message: "UNAUTHORIZED".to_string(),
            data: None,
        }
    }

    /// Input validation failed (-32020).
    pub fn validation_failed(detail: &str) -> Self {
        Self {
            code: -32020,
            message: "VALIDATION_FAILED".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    /// Username uniqueness violation (-32021).
    pub fn username_taken(username: &str) -> Self {
        Self {
            code: -32021,
            message: "USERNAME_TAKEN".to_string(),
            data: Some(serde_json::json!({"username": username})),
        }
    }

    /// Chat identity uniqueness violation (-32022).
    pub fn chat_already_linked() -> Self {
        Self {
            code: -32022,
            message: "CHAT_ALREADY_LINKED".to_string(),
            data: None,
        }
    }

    /// Unknown, consumed, or expired code (-32023).
    pub fn invalid_code() -> Self {
        Self {
            code: -32023,
            message: "INVALID_CODE".to_string(),
            data: None,
        }
    }

    /// Gateway-only account with no password (-32024).
    pub fn no_password() -> Self {
        Self {
            code: -32024,
            message: "NO_PASSWORD".to_string(),
            data: None,
        }
    }

    /// Password mismatch (-32025).
    pub fn invalid_credentials() -> Self {
        Self {
            code: -32025,
            message: "INVALID_CREDENTIALS".to_string(),
            data: None,
        }
    }

    /// Missing user/product/registration (-32030).
    pub fn not_found(detail: &str) -> Self {
        Self {
            code: -32030,
            message: "NOT_FOUND".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    /// Balance below the required amount (-32040).
    pub fn insufficient_balance(required: u64, available: u64) -> Self {
        Self {
            code: -32040,
            message: "INSUFFICIENT_BALANCE".to_string(),
            data: Some(serde_json::json!({"required": required, "available": available})),
        }
    }

    /// Product already in the buyer's inventory (-32041).
    pub fn already_owned() -> Self {
        Self {
            code: -32041,
            message: "ALREADY_OWNED".to_string(),
            data: None,
        }
    }

    /// Buying one's own product (-32042).
    pub fn self_purchase() -> Self {
        Self {
            code: -32042,
            message: "SELF_PURCHASE".to_string(),
            data: None,
        }
    }

    /// Download denied (-32043).
    pub fn access_denied() -> Self {
        Self {
            code: -32043,
            message: "ACCESS_DENIED".to_string(),
            data: None,
        }
    }
}

/// The RPC server.
pub struct RpcServer {
    state: Arc<DaemonState>,
    socket_path: PathBuf,
}

impl RpcServer {
    /// Create a new RPC server.
    pub fn new(state: Arc<DaemonState>, socket_path: PathBuf) -> Self {
        Self { state, socket_path }
    }

    /// Run the server, accepting connections.
    pub async fn run(&self) -> anyhow::Result<()> {
        // Remove stale socket file
        let _ = std::fs::remove_file(&self.socket_path);

        let listener = UnixListener::bind(&self.socket_path)?;
        info!("IPC server listening on {:?}", self.socket_path);

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let state = self.state.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(state, stream).await {
                            warn!("Connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            }
        }
    }
}

/// Handle a single client connection.
async fn handle_connection(
    state: Arc<DaemonState>,
    stream: tokio::net::UnixStream,
) -> anyhow::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break; // EOF
        }

        let response = match serde_json::from_str::<RpcRequest>(&line) {
            Ok(request) => dispatch_request(state.clone(), request).await,
            Err(_) => RpcResponse::error(serde_json::Value::Null, RpcError::parse_error()),
        };

        let mut response_json = serde_json::to_string(&response)?;
        response_json.push('\n');
        writer.write_all(response_json.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Dispatch a JSON-RPC request to the appropriate command handler.
pub async fn dispatch_request(state: Arc<DaemonState>, request: RpcRequest) -> RpcResponse {
    let id = request.id.clone();
    let method = request.method.as_str();

    debug!("Dispatching RPC method: {}", method);

    let result = match method {
        // Registration & login
        "register_start" => commands::auth::register_start(&state, &request.params).await,
        "auth_confirm_code" => commands::auth::auth_confirm_code(&state, &request.params).await,
        "auth_login" => commands::auth::auth_login(&state, &request.params).await,
        "auth_login_code" => commands::auth::auth_login_code(&state, &request.params).await,

        // Messaging gateway callbacks
        "bot_update" => commands::bot::bot_update(&state, &request.params).await,

        // Catalog & purchases
        "get_products" => commands::market::get_products(&state, &request.params).await,
        "publish_product" => commands::market::publish_product(&state, &request.params).await,
        "buy_product" => commands::market::buy_product(&state, &request.params).await,
        "toggle_favorite" => commands::market::toggle_favorite(&state, &request.params).await,
        "get_favorites" => commands::market::get_favorites(&state, &request.params).await,
        "download_product" => commands::market::download_product(&state, &request.params).await,

        // Wallet & payments
        "get_wallet" => commands::wallet::get_wallet(&state, &request.params).await,
        "topup" => commands::wallet::topup(&state, &request.params).await,
        "create_payment_link" => {
            commands::wallet::create_payment_link(&state, &request.params).await
        }
        "payment_webhook" => commands::wallet::payment_webhook(&state, &request.params).await,

        // Profiles
        "get_user" => commands::profile::get_user(&state, &request.params).await,
        "update_profile" => commands::profile::update_profile(&state, &request.params).await,

        _ => Err(RpcError::method_not_found(method)),
    };

    match result {
        Ok(value) => RpcResponse::success(id, value),
        Err(err) => RpcResponse::error(id, err),
    }
}
