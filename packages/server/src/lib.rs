//! Group chat relay server.
//!
//! Clients connect over WebSocket, send chat/image/file payloads, and the
//! server fans each payload out to all connected clients while retaining a
//! bounded history buffer replayed to newcomers.

pub mod relay;
pub mod server;
pub mod wire;
