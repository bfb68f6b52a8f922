//! # Physique-Metrics
//!
//! Per-frame body analytics computed from pose landmarks.
//!
//! ## Pipeline
//!
//! 1. **Body geometry**: center and estimated body height from whichever
//!    joints are visible, via a fallback chain
//! 2. **Alignment**: weighted distance to a pose template's target layout
//! 3. **Measurements**: pixel, world and calibrated widths plus the shoulder,
//!    hip and V-taper indices
//! 4. **Symmetry**: left/right comparison over world landmarks
//! 5. **Confidence**: visibility, lighting, distance, pose match and (for
//!    photos) segmentation quality combined into one 0-100 score
//!
//! Partial visibility is the common case, so every analysis returns `None`
//! rather than an error when its joints are missing.

pub mod alignment;
pub mod benchmarks;
pub mod body_geometry;
pub mod confidence;
pub mod measurements;
pub mod posture;
pub mod symmetry;
pub mod templates;

pub use alignment::*;
pub use benchmarks::*;
pub use body_geometry::*;
pub use confidence::*;
pub use measurements::*;
pub use posture::*;
pub use symmetry::*;
pub use templates::*;

#[cfg(test)]
pub(crate) mod fixtures;
