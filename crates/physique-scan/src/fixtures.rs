//! Shared fixtures for unit tests.

use physique_core::{
    FrameSize, Joint, Landmark, PoseDetectionResult, PoseLandmarks, ScanRecord, Timestamp,
    WorldLandmark, WorldPose,
};
use physique_vision::MaskData;

pub const DAY_MS: i64 = 86_400_000;

pub fn frame() -> FrameSize {
    FrameSize::new(1000, 1000)
}

/// Upright subject facing the camera, body height 820 px
pub fn standing_pose() -> PoseLandmarks {
    let mut pose = PoseLandmarks::empty();
    for (joint, x, y) in [
        (Joint::Nose, 0.50, 0.10),
        (Joint::LeftShoulder, 0.43, 0.22),
        (Joint::RightShoulder, 0.57, 0.22),
        (Joint::LeftElbow, 0.41, 0.37),
        (Joint::RightElbow, 0.59, 0.37),
        (Joint::LeftWrist, 0.40, 0.50),
        (Joint::RightWrist, 0.60, 0.50),
        (Joint::LeftHip, 0.46, 0.52),
        (Joint::RightHip, 0.54, 0.52),
        (Joint::LeftKnee, 0.46, 0.72),
        (Joint::RightKnee, 0.54, 0.72),
        (Joint::LeftAnkle, 0.46, 0.92),
        (Joint::RightAnkle, 0.54, 0.92),
    ] {
        pose.set(joint, Landmark::new(x, y, 0.95));
    }
    pose
}

pub fn hide(pose: &mut PoseLandmarks, joints: &[Joint]) {
    for &joint in joints {
        if let Some(lm) = pose.get(joint).copied() {
            pose.set(joint, Landmark { visibility: 0.0, ..lm });
        }
    }
}

/// Every landmark moved right by `dx` (normalized)
pub fn shifted(pose: &PoseLandmarks, dx: f64) -> PoseLandmarks {
    PoseLandmarks::new(
        pose.points
            .iter()
            .map(|lm| Landmark { x: lm.x + dx, ..*lm })
            .collect(),
    )
}

/// Left/right mirrored world pose, 1.8 m tall
pub fn mirrored_world() -> WorldPose {
    let mut world = WorldPose::empty();
    for (left, right, x, y) in [
        (Joint::LeftShoulder, Joint::RightShoulder, 0.20, -0.50),
        (Joint::LeftElbow, Joint::RightElbow, 0.25, -0.25),
        (Joint::LeftHip, Joint::RightHip, 0.10, 0.0),
        (Joint::LeftKnee, Joint::RightKnee, 0.11, 0.45),
        (Joint::LeftAnkle, Joint::RightAnkle, 0.11, 0.85),
    ] {
        world.set(left, WorldLandmark::new(-x, y, 0.0, 0.9));
        world.set(right, WorldLandmark::new(x, y, 0.0, 0.9));
    }
    world.set(Joint::Nose, WorldLandmark::new(0.0, -0.95, -0.1, 0.9));
    world
}

pub fn detection() -> PoseDetectionResult {
    PoseDetectionResult {
        landmarks: standing_pose(),
        world_landmarks: mirrored_world(),
    }
}

/// Confidence mask with columns `x0..=x1` set on every row
pub fn rect_mask(width: usize, height: usize, x0: usize, x1: usize) -> MaskData {
    let values = (0..height)
        .flat_map(|_| (0..width).map(move |x| if x >= x0 && x <= x1 { 0.9 } else { 0.1 }))
        .collect();
    MaskData::new(values, width, height).expect("mask dimensions match")
}

/// Prior scan matching [`standing_pose`] captured at `timestamp_ms`
pub fn record(timestamp_ms: i64) -> ScanRecord {
    ScanRecord {
        timestamp: Timestamp::from_millis(timestamp_ms),
        pose_id: "front-checkin".to_string(),
        body_height_px: 820.0,
        stance_width_index: Some(80.0 / 820.0),
        hip_tilt_deg: Some(0.0),
        avg_brightness: Some(120.0),
        v_taper_index: 1.75,
        shoulder_width_cm: 0.0,
        symmetry_score: None,
    }
}
