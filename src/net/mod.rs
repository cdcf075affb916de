//! Network layer: HTTP login, the WebSocket transport, and their wire types.

pub mod api;
pub mod socket;
pub mod types;
