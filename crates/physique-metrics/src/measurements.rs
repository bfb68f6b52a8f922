//! Body measurements in pixels, meters and calibrated centimeters.
//!
//! Pixel indices are always computed. World-space indices are independent of
//! camera distance, so they replace the pixel ones whenever the world pose
//! supports them.

use physique_core::tuning::*;
use physique_core::{calibration_factor, FrameSize, Joint, PoseLandmarks, WorldPose};
use physique_vision::MeasurementSample;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::body_geometry::estimate_body_geometry;

/// Measurements for one frame or photo
///
/// Centimeter fields are 0 when uncalibrated; check `calibration_factor`
/// rather than comparing against zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurements {
    pub shoulder_width_px: f64,
    /// 0 when hips are hidden
    pub hip_width_px: f64,
    pub body_height_px: f64,

    pub shoulder_index: f64,
    pub hip_index: f64,
    pub v_taper_index: f64,

    pub shoulder_width_m: f64,
    pub hip_width_m: f64,
    pub body_height_m: f64,

    pub calibration_factor: Option<f64>,
    pub shoulder_width_cm: f64,
    pub hip_width_cm: f64,
    pub body_height_cm: f64,
}

impl Measurements {
    /// Fields tracked by live smoothing
    pub fn to_sample(&self) -> MeasurementSample {
        MeasurementSample {
            shoulder_index: self.shoulder_index,
            hip_index: self.hip_index,
            v_taper_index: self.v_taper_index,
            shoulder_width_m: self.shoulder_width_m,
            hip_width_m: self.hip_width_m,
            body_height_m: self.body_height_m,
        }
    }
}

/// World-space widths and height in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldMeasurements {
    pub shoulder_width_m: f64,
    /// 0 when hips are hidden
    pub hip_width_m: f64,
    pub body_height_m: f64,
}

/// Widths and height from world landmarks
///
/// Height is the vertical nose-to-ankle span, falling back to nose-to-hip
/// x 2.1 and then shoulder width x 4.0.
pub fn world_measurements(world: &WorldPose) -> Option<WorldMeasurements> {
    if !world.is_complete() {
        return None;
    }
    let l_shoulder = world.visible(Joint::LeftShoulder)?;
    let r_shoulder = world.visible(Joint::RightShoulder)?;
    let shoulder_width_m = l_shoulder.distance_to(r_shoulder);

    let hips = world.visible(Joint::LeftHip).zip(world.visible(Joint::RightHip));
    let ankles = world.visible(Joint::LeftAnkle).zip(world.visible(Joint::RightAnkle));
    let nose = world.visible(Joint::Nose);

    let hip_width_m = hips.map_or(0.0, |(l, r)| l.distance_to(r));

    let body_height_m = match (nose, ankles, hips) {
        (Some(nose), Some((la, ra)), _) => (nose.y - (la.y + ra.y) / 2.0).abs(),
        (Some(nose), None, Some((lh, rh))) => (nose.y - (lh.y + rh.y) / 2.0).abs() * NOSE_HIP_MULTIPLIER,
        _ => shoulder_width_m * SHOULDER_WIDTH_MULTIPLIER,
    };

    Some(WorldMeasurements {
        shoulder_width_m,
        hip_width_m,
        body_height_m,
    })
}

/// Derive measurements from landmarks, optional world pose and user height
///
/// Requires both shoulders and a usable body geometry.
pub fn compute_measurements(
    landmarks: &PoseLandmarks,
    frame: FrameSize,
    world: Option<&WorldPose>,
    user_height_cm: Option<f64>,
) -> Option<Measurements> {
    let l_shoulder = landmarks.pixel(Joint::LeftShoulder, frame)?;
    let r_shoulder = landmarks.pixel(Joint::RightShoulder, frame)?;
    let geo = estimate_body_geometry(landmarks, frame)?;

    let shoulder_width_px = l_shoulder.distance_to(&r_shoulder);
    let hip_width_px = match (
        landmarks.pixel(Joint::LeftHip, frame),
        landmarks.pixel(Joint::RightHip, frame),
    ) {
        (Some(l), Some(r)) => l.distance_to(&r),
        _ => 0.0,
    };
    let body_height_px = geo.scale;

    let mut m = Measurements {
        shoulder_width_px,
        hip_width_px,
        body_height_px,
        shoulder_index: ratio(shoulder_width_px, body_height_px, 0.0),
        hip_index: ratio(hip_width_px, body_height_px, 0.0),
        v_taper_index: ratio(shoulder_width_px, hip_width_px, 0.0),
        ..Measurements::default()
    };

    let Some(wm) = world.and_then(world_measurements) else {
        return Some(m);
    };

    m.shoulder_width_m = wm.shoulder_width_m;
    m.hip_width_m = wm.hip_width_m;
    m.body_height_m = wm.body_height_m;

    if wm.shoulder_width_m > 0.0 && wm.body_height_m > MIN_WORLD_BODY_HEIGHT_M {
        m.shoulder_index = wm.shoulder_width_m / wm.body_height_m;
    }
    if wm.hip_width_m > 0.0 && wm.body_height_m > MIN_WORLD_BODY_HEIGHT_M {
        m.hip_index = wm.hip_width_m / wm.body_height_m;
    }
    if wm.shoulder_width_m > 0.0 && wm.hip_width_m > 0.0 {
        m.v_taper_index = wm.shoulder_width_m / wm.hip_width_m;
    }

    // A world height at or below MIN_WORLD_BODY_HEIGHT_M leaves centimeters at 0
    // even with a user height, rather than assuming a factor of 1.
    m.calibration_factor = calibration_factor(user_height_cm, wm.body_height_m);
    if let Some(factor) = m.calibration_factor {
        m.shoulder_width_cm = wm.shoulder_width_m * factor * 100.0;
        m.hip_width_cm = wm.hip_width_m * factor * 100.0;
        m.body_height_cm = wm.body_height_m * factor * 100.0;
    }

    trace!(
        shoulder_index = m.shoulder_index,
        v_taper = m.v_taper_index,
        calibrated = m.calibration_factor.is_some(),
        "computed measurements"
    );
    Some(m)
}

/// `num / den` when `den` exceeds `min_den`, else 0
fn ratio(num: f64, den: f64, min_den: f64) -> f64 {
    if den > min_den {
        num / den
    } else {
        0.0
    }
}
