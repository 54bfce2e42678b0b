//! Domain types for iqnotify
//!
//! This crate defines the vocabulary shared by the config loader, the
//! presence snapshot reader, the evaluation engine and the dispatchers:
//! - Modes (the notification policies) and their string forms
//! - Lookback windows
//! - Presence facts, pairs and decisions
//! - Per-call options and outbound payloads

mod mode;
mod options;
mod types;
mod window;

pub use mode::*;
pub use options::*;
pub use types::*;
pub use window::*;

/// Raw presence values that count as "present"
pub const PRESENT_STATES: &[&str] = &["on", "home"];
