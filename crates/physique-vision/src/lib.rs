//! # Physique-Vision
//!
//! Image-derived signals that sit between the external pose/segmentation
//! model and the body analytics.
//!
//! ## Stages
//!
//! 1. **Brightness**: average luma over a 32x18 sampling grid, mapped to a
//!    lighting sub-score
//! 2. **Segmentation**: binarize the person mask, score its quality and
//!    measure silhouette widths at anatomical slice heights
//! 3. **Filtering**: EMA and median buffering that stabilize per-frame
//!    metrics across a capture session

pub mod brightness;
pub mod filtering;
pub mod segmentation;

pub use brightness::*;
pub use filtering::*;
pub use segmentation::*;
