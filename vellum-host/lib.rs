//! Host side of the editing bridge.
//!
//! The bridge owns the embedding surface: it serializes commands into
//! injected script calls, holds them back until the embedded editor
//! reports ready, and decodes incoming event envelopes into typed
//! callbacks. Delivery is best-effort by design; nothing here ever
//! propagates an error across the embedding boundary.

mod bridge;
mod config;
mod handlers;

pub use bridge::{
  HostBridge,
  READY_RETRY_INTERVAL,
  ScriptSink,
};
pub use config::BridgeConfig;
pub use handlers::BridgeHandlers;
