//! The chat room: registry + history behind one consistency domain, and the
//! broadcast engine that fans messages out to every member.

use tokio::sync::mpsc;

use crate::wire::Envelope;

use super::connection::{Connection, ConnectionId};
use super::history::History;
use super::registry::Registry;

/// Registry and history under a single critical section.
///
/// The server holds a `ChatRoom` behind one `tokio::sync::Mutex`; every
/// membership change, history append and fan-out is serialized through that
/// lock. This is deliberate: a broadcast always observes one consistent
/// membership snapshot, and a connection registered-then-replayed can miss
/// no message appended after its registration.
///
/// Delivery goes through each connection's unbounded channel, so a slow
/// peer delays only its own writer task. A failed send is terminal for that
/// connection: it is removed from the registry and its transport closed, and
/// the fan-out continues to the remaining members.
pub struct ChatRoom {
    registry: Registry,
    history: History,
}

impl ChatRoom {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            history: History::new(),
        }
    }

    /// A room with a non-default history capacity.
    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            registry: Registry::new(),
            history: History::with_capacity(capacity),
        }
    }

    /// Register a new connection and replay the buffered history to it.
    ///
    /// Both steps happen inside the caller's single lock acquisition, so the
    /// newcomer receives exactly the history present at registration time and
    /// then every later broadcast, with no gap and no duplicate. When the
    /// client supplied an initial display name (upgrade query parameter), it
    /// is announced immediately, as if a `username` frame had arrived.
    pub fn connect(
        &mut self,
        sender: mpsc::UnboundedSender<String>,
        initial_name: String,
    ) -> ConnectionId {
        let announced = !initial_name.is_empty();
        let connection = Connection::new(sender, initial_name);
        let id = connection.id();
        self.registry.register(connection);
        self.replay_to(id);
        if announced {
            self.broadcast_roster();
        }
        id
    }

    /// Remove a connection and, if it was still present, broadcast the new
    /// roster. Idempotent: racing removals (read-loop exit vs. broadcast
    /// failure) close the transport exactly once, and only the winning call
    /// triggers a roster broadcast.
    pub fn disconnect(&mut self, id: ConnectionId) -> bool {
        let removed = self.registry.remove(id).is_some();
        if removed {
            self.broadcast_roster();
        }
        removed
    }

    /// Set a connection's display name and broadcast the updated roster.
    pub fn announce(&mut self, id: ConnectionId, name: String) {
        tracing::debug!("Connection '{}' announced name '{}'", id, name);
        self.registry.set_display_name(id, name);
        self.broadcast_roster();
    }

    /// Persist and fan out a payload from the given connection.
    ///
    /// The author field is overwritten with the sender's registered display
    /// name; whatever the client put there is ignored. Unannounced senders
    /// publish with an empty author.
    pub fn publish(&mut self, from: ConnectionId, mut envelope: Envelope) {
        envelope.username = self
            .registry
            .get(from)
            .map(|c| c.display_name().to_string())
            .unwrap_or_default();

        if envelope.kind.is_persistable() {
            self.history.append(envelope.clone());
        }
        self.broadcast(&envelope);
    }

    /// Deliver one envelope to every registered connection.
    ///
    /// The envelope is serialized once. A failed delivery does not abort the
    /// sweep; failing connections are collected and removed afterwards, so
    /// the next broadcast's snapshot no longer contains them. No retry. Any
    /// removal changes the roster, so the survivors are then sent a fresh
    /// roster broadcast (which may in turn shed more dead members; the
    /// recursion is bounded by the shrinking membership).
    pub fn broadcast(&mut self, envelope: &Envelope) {
        let frame = match serde_json::to_string(envelope) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to serialize envelope: {}", e);
                return;
            }
        };

        let mut failed = Vec::new();
        for connection in self.registry.iter() {
            if let Err(e) = connection.send(&frame) {
                tracing::warn!("Failed to deliver to '{}': {}", connection.id(), e);
                failed.push(connection.id());
            }
        }
        if !failed.is_empty() {
            for id in failed {
                self.registry.remove(id);
            }
            self.broadcast_roster();
        }
    }

    /// Broadcast the current roster as a `userlist` envelope.
    ///
    /// Roster messages are synthesized by the server and never appended to
    /// history.
    pub fn broadcast_roster(&mut self) {
        let envelope = Envelope::userlist(self.registry.roster());
        self.broadcast(&envelope);
    }

    /// Replay the buffered history, in order, to one connection via the same
    /// send path broadcasts use. A mid-replay failure removes the connection
    /// exactly as a broadcast failure would.
    fn replay_to(&mut self, id: ConnectionId) {
        let mut failed = false;
        if let Some(connection) = self.registry.get(id) {
            for envelope in self.history.iter() {
                let frame = match serde_json::to_string(envelope) {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::error!("Failed to serialize history entry: {}", e);
                        continue;
                    }
                };
                if let Err(e) = connection.send(&frame) {
                    tracing::warn!("Failed to replay history to '{}': {}", id, e);
                    failed = true;
                    break;
                }
            }
        }
        if failed {
            self.registry.remove(id);
        }
    }

    pub fn roster(&self) -> Vec<String> {
        self.registry.roster()
    }

    pub fn member_count(&self) -> usize {
        self.registry.len()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl Default for ChatRoom {
    fn default() -> Self {
        Self::new()
    }
}
