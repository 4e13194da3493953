//! Server state and connection query types.

use serde::Deserialize;
use tokio::sync::Mutex;

use crate::relay::ChatRoom;

/// Query parameters for the WebSocket upgrade.
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Optional initial display name; overridable later by an in-band
    /// `username` message.
    pub username: Option<String>,
}

/// Shared application state.
///
/// The room (registry + history + broadcast engine) sits behind a single
/// mutex; that lock is the one critical section protecting membership,
/// history and fan-out consistency.
pub struct AppState {
    pub room: Mutex<ChatRoom>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            room: Mutex::new(ChatRoom::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
