//! # Physique-Core
//!
//! Core types and utilities for turning per-frame pose estimates into
//! comparable physique metrics.
//!
//! Three coordinate systems are kept apart at the type level:
//!
//! - [`Landmark`]: image-normalized `[0, 1]` coordinates from the pose model
//! - [`PixelPoint`]: frame pixels, produced by [`Landmark::to_pixel`]
//! - [`WorldLandmark`]: meters, origin at the hip midpoint
//!
//! Body-normalized template coordinates use a fourth type, [`NormalizedPoint`].

pub mod config;
pub mod error;
pub mod geometry;
pub mod tuning;
pub mod types;

pub use config::*;
pub use error::{Error, Result};
pub use geometry::*;
pub use types::*;
