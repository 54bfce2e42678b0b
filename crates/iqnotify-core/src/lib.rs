//! Mode evaluation engine and notification service for iqnotify
//!
//! This crate is the heart of iqnotify, containing:
//! - Aggregate computation (anyone present, anyone recently left)
//! - Per-pair mode rules
//! - The notification service: read a snapshot, evaluate, dispatch

mod engine;
mod report;
mod service;

pub use engine::*;
pub use report::*;
pub use service::*;
