//! Connection model: one live client session.

use tokio::sync::mpsc;
use uuid::Uuid;

/// Opaque identity of a connection. Display names are not identities:
/// duplicates are allowed and never deduplicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Delivery failure on a connection's outbound channel.
#[derive(Debug, thiserror::Error)]
#[error("connection {0} is gone")]
pub struct DeliveryError(pub ConnectionId);

/// One live client session: transport write path plus display name.
///
/// The registry owns each `Connection` from registration until removal.
/// Dropping it closes the outbound channel, which ends the per-connection
/// writer task and with it the socket; removal hands the connection to
/// exactly one caller, so the transport is closed exactly once.
pub struct Connection {
    id: ConnectionId,
    display_name: String,
    sender: mpsc::UnboundedSender<String>,
}

impl Connection {
    /// Create a connection around an outbound channel. `display_name` may be
    /// empty; it stays empty until the client announces a name.
    pub fn new(sender: mpsc::UnboundedSender<String>, display_name: String) -> Self {
        Self {
            id: ConnectionId::new(),
            display_name,
            sender,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn set_display_name(&mut self, name: String) {
        self.display_name = name;
    }

    /// Queue a frame on the outbound channel. The send never blocks; it
    /// fails only once the writer task has dropped the receiving end, which
    /// is the per-write delivery failure signal.
    pub fn send(&self, frame: &str) -> Result<(), DeliveryError> {
        self.sender
            .send(frame.to_string())
            .map_err(|_| DeliveryError(self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_queues_frame() {
        // given:
        let (tx, mut rx) = mpsc::unbounded_channel();
        let conn = Connection::new(tx, String::new());

        // when:
        conn.send("hello").unwrap();

        // then:
        assert_eq!(rx.try_recv().unwrap(), "hello");
    }

    #[test]
    fn test_send_fails_after_receiver_dropped() {
        // given: the writer task is gone
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = Connection::new(tx, String::new());
        drop(rx);

        // when:
        let result = conn.send("hello");

        // then:
        assert!(result.is_err());
    }

    #[test]
    fn test_display_name_starts_empty_and_is_mutable() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut conn = Connection::new(tx, String::new());
        assert_eq!(conn.display_name(), "");

        conn.set_display_name("Ann".to_string());
        assert_eq!(conn.display_name(), "Ann");
    }

    #[test]
    fn test_connection_ids_are_unique() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let a = Connection::new(tx.clone(), String::new());
        let b = Connection::new(tx, String::new());
        assert_ne!(a.id(), b.id());
    }
}
