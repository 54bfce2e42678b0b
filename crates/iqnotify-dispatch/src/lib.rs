//! Delivery dispatcher interface for iqnotify
//!
//! The evaluation engine decides who gets a notification; a dispatcher
//! carries it there. This crate defines that seam and ships two
//! dispatchers that contain no transport code: a recording mock and a
//! line-oriented JSON writer.

mod log;
mod mock;
mod traits;

pub use log::*;
pub use mock::*;
pub use traits::*;
