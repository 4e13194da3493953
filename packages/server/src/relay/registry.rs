//! Registry: the authoritative set of currently connected clients.

use super::connection::{Connection, ConnectionId};

/// Ordered set of live connections, keyed by connection identity.
///
/// Iteration order is registration order, which is also the snapshot order
/// used by broadcasts and rosters. The registry is not internally
/// synchronized; callers hold it inside the room's single critical section.
#[derive(Default)]
pub struct Registry {
    connections: Vec<Connection>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            connections: Vec::new(),
        }
    }

    /// Add a connection. Never fails; the connection is visible to every
    /// subsequent broadcast from this point on.
    pub fn register(&mut self, connection: Connection) {
        tracing::info!("Connection '{}' registered", connection.id());
        self.connections.push(connection);
    }

    /// Remove a connection, handing it back to the caller.
    ///
    /// Idempotent: the first caller receives the connection (and closes the
    /// transport by dropping it); a later caller observes absence and gets
    /// `None`.
    pub fn remove(&mut self, id: ConnectionId) -> Option<Connection> {
        let index = self.connections.iter().position(|c| c.id() == id)?;
        let connection = self.connections.remove(index);
        tracing::info!("Connection '{}' removed from registry", id);
        Some(connection)
    }

    /// Update a connection's display name in place. No validation: empty and
    /// duplicate names are permitted. A no-op for unknown ids.
    pub fn set_display_name(&mut self, id: ConnectionId, name: String) {
        if let Some(connection) = self.connections.iter_mut().find(|c| c.id() == id) {
            connection.set_display_name(name);
        }
    }

    /// Look up a connection by id.
    pub fn get(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id() == id)
    }

    /// Iterate members in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Current roster: the display names announced so far, in registration
    /// order. Unannounced (empty-name) connections are excluded; duplicate
    /// names are retained.
    pub fn roster(&self) -> Vec<String> {
        self.connections
            .iter()
            .filter(|c| !c.display_name().is_empty())
            .map(|c| c.display_name().to_string())
            .collect()
    }
}
