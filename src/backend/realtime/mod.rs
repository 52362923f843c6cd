//! Real-time Update Module
//!
//! Pushes the visible entry list to browsers whenever the store is written.
//!
//! - **`broadcast`** - the snapshot channel and the publish helper
//! - **`socket`** - the `GET /ws` WebSocket handler
//!
//! The store repository publishes after each successful save; every open
//! socket forwards what it receives. See `shared::RealtimeEvent` for the
//! message shape.

/// Event broadcasting utilities
pub mod broadcast;

/// WebSocket push handler
pub mod socket;

pub use broadcast::{broadcast_event, new_broadcast, RealtimeEventBroadcast};
pub use socket::handle_socket_upgrade;
