//! Core of the chat relay: connection model, registry, history buffer and
//! the broadcast engine.

mod connection;
mod history;
mod registry;
mod room;

pub use connection::{Connection, ConnectionId, DeliveryError};
pub use history::{HISTORY_CAPACITY, History};
pub use registry::Registry;
pub use room::ChatRoom;
