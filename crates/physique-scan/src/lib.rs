//! # Physique-Scan
//!
//! Capture-level orchestration on top of the per-frame analytics.
//!
//! - [`LiveScanner`]: scores video frames against a pose template, smooths
//!   them and decides when a capture is ready
//! - [`PhotoScanner`]: analyzes a single photo with an optional person mask
//! - [`CheckinGateValidator`]: the four check-in gates (joints, standing,
//!   consistency, time) against the previous check-in
//! - [`classify_photo`]: sorts a photo into full check-in, selfie or gallery
//! - [`SessionRegistry`]: per-session smoothing state for hosted use
//! - [`summarize_progress`]: numeric comparison across stored scans

pub mod classifier;
pub mod gates;
pub mod live;
pub mod photo;
pub mod progress;
pub mod session;

pub use classifier::*;
pub use gates::*;
pub use live::*;
pub use photo::*;
pub use progress::*;
pub use session::*;

#[cfg(test)]
pub(crate) mod fixtures;
