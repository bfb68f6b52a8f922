//! Geometric utilities for planar joint computations.

use crate::tuning::MIN_WORLD_BODY_HEIGHT_M;
use crate::types::PixelPoint;

/// Interior angle at `vertex` formed by `a` and `c`, in degrees
///
/// Returns 180 (a straight limb) when either arm has zero length.
pub fn joint_angle_deg(a: &PixelPoint, vertex: &PixelPoint, c: &PixelPoint) -> f64 {
    let ba = a.to_nalgebra() - vertex.to_nalgebra();
    let bc = c.to_nalgebra() - vertex.to_nalgebra();
    let norms = ba.norm() * bc.norm();
    if norms == 0.0 {
        return 180.0;
    }
    let cos = (ba.dot(&bc) / norms).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Absolute deviation from vertical of the segment `bottom -> top`, in degrees
///
/// `None` when `top` is not above `bottom` in image space.
pub fn lean_from_vertical_deg(top: &PixelPoint, bottom: &PixelPoint) -> Option<f64> {
    let height = bottom.y - top.y;
    if height <= 0.0 {
        return None;
    }
    Some((top.x - bottom.x).atan2(height).to_degrees().abs())
}

/// Tilt of the line through two points relative to horizontal, in degrees
///
/// The pair is ordered left to right first so the result lies in (-90, 90]
/// regardless of which side the caller passes first. Positive means the
/// right-hand point sits lower in the image.
pub fn line_tilt_deg(a: &PixelPoint, b: &PixelPoint) -> f64 {
    let (left, right) = if a.x <= b.x { (a, b) } else { (b, a) };
    let deg = (right.y - left.y).atan2(right.x - left.x).to_degrees();
    if deg <= -90.0 {
        deg + 180.0
    } else {
        deg
    }
}

/// Upper median: the element at `len / 2` after sorting
pub fn upper_median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Some(sorted[sorted.len() / 2])
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Clamp a score into 0..=100
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Scale from model meters to the user's real height
///
/// `None` without a positive user height or when the world body height is
/// too small to trust.
pub fn calibration_factor(user_height_cm: Option<f64>, body_height_m: f64) -> Option<f64> {
    let height_cm = user_height_cm.filter(|h| *h > 0.0)?;
    if body_height_m <= MIN_WORLD_BODY_HEIGHT_M {
        return None;
    }
    Some((height_cm / 100.0) / body_height_m)
}
