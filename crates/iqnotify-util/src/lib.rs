//! Shared utilities for iqnotify
//!
//! This crate provides:
//! - ID types (EntityId, ChannelId, EvaluationId)
//! - Time utilities (UTC clock with debug mock time, age formatting)
//! - Error types
//! - Default paths for config and data directories

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
