//! Body center and scale estimation under partial visibility.
//!
//! ## Scale fallback chain
//!
//! Scale is the estimated full body height in pixels. The best available
//! joint subset wins:
//!
//! | Visible              | Estimate                                 | Tier  |
//! |----------------------|------------------------------------------|-------|
//! | nose + ankles        | nose to ankle midpoint                   | full  |
//! | ankles               | shoulder mid to ankle mid x 1.2          | full  |
//! | nose + hips          | nose to hip midpoint x 2.1               | upper |
//! | hips                 | shoulder mid to hip mid x 3.2            | torso |
//! | nose                 | nose to shoulder midpoint x 5.5          | head  |
//! | shoulders only       | shoulder width x 4.0                     | head  |

use physique_core::tuning::*;
use physique_core::{FrameSize, Joint, PixelPoint, PoseLandmarks};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Which branch of the fallback chain produced the scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Full,
    Upper,
    Torso,
    Head,
}

/// Per-frame body reference frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyGeometry {
    /// Hip midpoint, or shoulder midpoint when hips are hidden
    pub center: PixelPoint,
    /// Estimated full body height in pixels (always > 10)
    pub scale: f64,
    pub tier: QualityTier,
}

/// Estimate body center and height from the visible joints
///
/// Requires both shoulders; returns `None` when they are hidden or the
/// estimate is degenerate.
pub fn estimate_body_geometry(landmarks: &PoseLandmarks, frame: FrameSize) -> Option<BodyGeometry> {
    let l_shoulder = landmarks.pixel(Joint::LeftShoulder, frame)?;
    let r_shoulder = landmarks.pixel(Joint::RightShoulder, frame)?;
    let shoulder_mid = l_shoulder.midpoint(&r_shoulder);

    let nose = landmarks.pixel(Joint::Nose, frame);
    let hip_mid = landmarks.pixel_midpoint(Joint::LeftHip, Joint::RightHip, frame);
    let ankle_mid = landmarks.pixel_midpoint(Joint::LeftAnkle, Joint::RightAnkle, frame);

    let center = hip_mid.unwrap_or(shoulder_mid);

    let (scale, tier) = match (ankle_mid, hip_mid, nose) {
        (Some(ankle), _, Some(nose)) => (nose.distance_to(&ankle), QualityTier::Full),
        (Some(ankle), _, None) => (
            shoulder_mid.distance_to(&ankle) * SHOULDER_ANKLE_MULTIPLIER,
            QualityTier::Full,
        ),
        (None, Some(hip), Some(nose)) => (nose.distance_to(&hip) * NOSE_HIP_MULTIPLIER, QualityTier::Upper),
        (None, Some(hip), None) => (
            shoulder_mid.distance_to(&hip) * SHOULDER_HIP_MULTIPLIER,
            QualityTier::Torso,
        ),
        (None, None, Some(nose)) => (
            nose.distance_to(&shoulder_mid) * NOSE_SHOULDER_MULTIPLIER,
            QualityTier::Head,
        ),
        (None, None, None) => (
            l_shoulder.distance_to(&r_shoulder) * SHOULDER_WIDTH_MULTIPLIER,
            QualityTier::Head,
        ),
    };

    if scale <= MIN_BODY_SCALE_PX {
        debug!(scale, ?tier, "body scale below minimum, discarding geometry");
        return None;
    }

    trace!(scale, ?tier, "estimated body geometry");
    Some(BodyGeometry { center, scale, tier })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{frame, hide, pose_from, standing_pose};
    use approx::assert_relative_eq;

    #[test]
    fn test_full_body_uses_nose_to_ankles() {
        let geo = estimate_body_geometry(&standing_pose(), frame()).unwrap();
        assert_eq!(geo.tier, QualityTier::Full);
        assert_relative_eq!(geo.scale, 820.0, epsilon = 1e-9);
        assert_relative_eq!(geo.center.x, 500.0, epsilon = 1e-9);
        assert_relative_eq!(geo.center.y, 520.0, epsilon = 1e-9);
    }

    #[test]
    fn test_full_body_height_is_analytic_distance() {
        // Offset nose so the distance is not purely vertical
        let mut pose = standing_pose();
        pose.set(Joint::Nose, physique_core::Landmark::new(0.53, 0.12, 0.9));
        let geo = estimate_body_geometry(&pose, frame()).unwrap();
        let expected = (30.0_f64.powi(2) + 800.0_f64.powi(2)).sqrt();
        assert_relative_eq!(geo.scale, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_fallback_chain() {
        let mut pose = standing_pose();
        hide(&mut pose, &[Joint::Nose]);
        let geo = estimate_body_geometry(&pose, frame()).unwrap();
        assert_eq!(geo.tier, QualityTier::Full);
        assert_relative_eq!(geo.scale, 700.0 * 1.2, epsilon = 1e-9);

        let mut pose = standing_pose();
        hide(&mut pose, &[Joint::LeftAnkle]);
        let geo = estimate_body_geometry(&pose, frame()).unwrap();
        assert_eq!(geo.tier, QualityTier::Upper);
        assert_relative_eq!(geo.scale, 420.0 * 2.1, epsilon = 1e-9);

        hide(&mut pose, &[Joint::Nose]);
        let geo = estimate_body_geometry(&pose, frame()).unwrap();
        assert_eq!(geo.tier, QualityTier::Torso);
        assert_relative_eq!(geo.scale, 300.0 * 3.2, epsilon = 1e-9);

        let mut pose = standing_pose();
        hide(&mut pose, &[Joint::LeftHip, Joint::LeftAnkle]);
        let geo = estimate_body_geometry(&pose, frame()).unwrap();
        assert_eq!(geo.tier, QualityTier::Head);
        assert_relative_eq!(geo.scale, 120.0 * 5.5, epsilon = 1e-9);
        // Center falls back to the shoulder midpoint
        assert_relative_eq!(geo.center.y, 220.0, epsilon = 1e-9);

        hide(&mut pose, &[Joint::Nose]);
        let geo = estimate_body_geometry(&pose, frame()).unwrap();
        assert_relative_eq!(geo.scale, 140.0 * 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_requires_shoulders() {
        let mut pose = standing_pose();
        hide(&mut pose, &[Joint::RightShoulder]);
        assert!(estimate_body_geometry(&pose, frame()).is_none());
    }

    #[test]
    fn test_degenerate_scale() {
        let pose = pose_from(&[
            (Joint::LeftShoulder, 0.500, 0.2),
            (Joint::RightShoulder, 0.502, 0.2),
        ]);
        assert!(estimate_body_geometry(&pose, frame()).is_none());
    }
}
