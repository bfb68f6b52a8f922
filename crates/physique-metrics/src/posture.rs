//! Standing posture, tilt, stance and visibility helpers.

use std::fmt;

use physique_core::tuning::*;
use physique_core::{
    joint_angle_deg, lean_from_vertical_deg, line_tilt_deg, FrameSize, GateConfig, Joint,
    PoseLandmarks,
};
use serde::{Deserialize, Serialize};

/// Why a pose does not count as standing upright
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StandingFault {
    MissingLowerBody,
    NotUpright,
    BentLegs,
    Leaning,
}

impl StandingFault {
    pub fn reason(&self) -> &'static str {
        match self {
            StandingFault::MissingLowerBody => "Missing lower-body joints",
            StandingFault::NotUpright => {
                "Not standing upright: ankles should be below knees and hips"
            }
            StandingFault::BentLegs => "Legs not straight: stand upright with straight legs",
            StandingFault::Leaning => "Leaning too much: stand straight",
        }
    }
}

impl fmt::Display for StandingFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Thresholds for the standing detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostureLimits {
    /// Slack allowed in the ankle-below-knee-below-hip ordering (pixels)
    pub order_tolerance_px: f64,
    pub min_leg_angle_deg: f64,
    pub max_torso_lean_deg: f64,
}

impl Default for PostureLimits {
    fn default() -> Self {
        Self {
            order_tolerance_px: STANDING_ORDER_TOLERANCE_PX,
            min_leg_angle_deg: MIN_LEG_ANGLE_DEG,
            max_torso_lean_deg: MAX_TORSO_LEAN_DEG,
        }
    }
}

impl From<&GateConfig> for PostureLimits {
    fn from(config: &GateConfig) -> Self {
        Self {
            order_tolerance_px: STANDING_ORDER_TOLERANCE_PX,
            min_leg_angle_deg: config.min_leg_angle_deg,
            max_torso_lean_deg: config.max_torso_lean_deg,
        }
    }
}

/// Check vertical joint ordering, leg straightness and torso lean
///
/// The lean check is skipped when shoulders are hidden or sit below the hips.
pub fn check_standing(
    landmarks: &PoseLandmarks,
    frame: FrameSize,
    limits: &PostureLimits,
) -> Result<(), StandingFault> {
    let px = |j| landmarks.pixel(j, frame);
    let (Some(lh), Some(rh), Some(lk), Some(rk), Some(la), Some(ra)) = (
        px(Joint::LeftHip),
        px(Joint::RightHip),
        px(Joint::LeftKnee),
        px(Joint::RightKnee),
        px(Joint::LeftAnkle),
        px(Joint::RightAnkle),
    ) else {
        return Err(StandingFault::MissingLowerBody);
    };

    let hip = lh.midpoint(&rh);
    let knee = lk.midpoint(&rk);
    let ankle = la.midpoint(&ra);

    let tol = limits.order_tolerance_px;
    if ankle.y - knee.y <= -tol || knee.y - hip.y <= -tol {
        return Err(StandingFault::NotUpright);
    }

    let leg_angle = (joint_angle_deg(&lh, &lk, &la) + joint_angle_deg(&rh, &rk, &ra)) / 2.0;
    if leg_angle < limits.min_leg_angle_deg {
        return Err(StandingFault::BentLegs);
    }

    if let Some(shoulder) = landmarks.pixel_midpoint(Joint::LeftShoulder, Joint::RightShoulder, frame) {
        if let Some(lean) = lean_from_vertical_deg(&shoulder, &hip) {
            if lean > limits.max_torso_lean_deg {
                return Err(StandingFault::Leaning);
            }
        }
    }

    Ok(())
}

pub fn is_standing(landmarks: &PoseLandmarks, frame: FrameSize) -> bool {
    check_standing(landmarks, frame, &PostureLimits::default()).is_ok()
}

/// Tilt of a left/right pair from horizontal in (-90, 90] degrees
pub fn pair_tilt_deg(landmarks: &PoseLandmarks, left: Joint, right: Joint, frame: FrameSize) -> Option<f64> {
    let l = landmarks.pixel(left, frame)?;
    let r = landmarks.pixel(right, frame)?;
    Some(line_tilt_deg(&l, &r))
}

pub fn shoulder_tilt_deg(landmarks: &PoseLandmarks, frame: FrameSize) -> Option<f64> {
    pair_tilt_deg(landmarks, Joint::LeftShoulder, Joint::RightShoulder, frame)
}

pub fn hip_tilt_deg(landmarks: &PoseLandmarks, frame: FrameSize) -> Option<f64> {
    pair_tilt_deg(landmarks, Joint::LeftHip, Joint::RightHip, frame)
}

/// Distance between the ankles in pixels
pub fn stance_width_px(landmarks: &PoseLandmarks, frame: FrameSize) -> Option<f64> {
    let l = landmarks.pixel(Joint::LeftAnkle, frame)?;
    let r = landmarks.pixel(Joint::RightAnkle, frame)?;
    Some(l.distance_to(&r))
}

/// Stance width as a fraction of body height
pub fn stance_width_index(landmarks: &PoseLandmarks, frame: FrameSize, body_height_px: f64) -> Option<f64> {
    if body_height_px <= 0.0 {
        return None;
    }
    Some(stance_width_px(landmarks, frame)? / body_height_px)
}

/// How much of the body is in frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyVisibility {
    /// Shoulders and ankles
    Full,
    /// Shoulders and hips
    Upper,
    /// Shoulders only
    Partial,
    /// No shoulders
    None,
}

pub fn body_visibility(landmarks: &PoseLandmarks) -> BodyVisibility {
    let pair = |l, r| landmarks.is_visible(l) && landmarks.is_visible(r);
    if !pair(Joint::LeftShoulder, Joint::RightShoulder) {
        BodyVisibility::None
    } else if pair(Joint::LeftAnkle, Joint::RightAnkle) {
        BodyVisibility::Full
    } else if pair(Joint::LeftHip, Joint::RightHip) {
        BodyVisibility::Upper
    } else {
        BodyVisibility::Partial
    }
}
