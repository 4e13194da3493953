//! WebSocket chat relay server implementation.

mod handler;
mod runner;
mod signal;
mod state;

pub use runner::{app, app_with_state, run_server};
pub use state::{AppState, ConnectQuery};
