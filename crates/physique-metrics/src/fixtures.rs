//! Shared landmark fixtures for unit tests.

use physique_core::{FrameSize, Joint, Landmark, PoseLandmarks, WorldLandmark, WorldPose};

pub fn frame() -> FrameSize {
    FrameSize::new(1000, 1000)
}

/// Upright subject facing the camera, arms relaxed, feet under hips
pub fn standing_pose() -> PoseLandmarks {
    pose_from(&[
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
    ])
}

pub fn pose_from(points: &[(Joint, f64, f64)]) -> PoseLandmarks {
    let mut pose = PoseLandmarks::empty();
    for &(joint, x, y) in points {
        pose.set(joint, Landmark::new(x, y, 0.95));
    }
    pose
}

/// Hide joints by dropping their visibility to zero
pub fn hide(pose: &mut PoseLandmarks, joints: &[Joint]) {
    for &joint in joints {
        if let Some(lm) = pose.get(joint).copied() {
            pose.set(joint, Landmark { visibility: 0.0, ..lm });
        }
    }
}

/// World pose mirrored about x = 0 with equal heights per pair
pub fn mirrored_world() -> WorldPose {
    let mut world = WorldPose::empty();
    let rows = [
        (Joint::LeftShoulder, Joint::RightShoulder, 0.20, -0.50),
        (Joint::LeftElbow, Joint::RightElbow, 0.25, -0.25),
        (Joint::LeftHip, Joint::RightHip, 0.10, 0.0),
        (Joint::LeftKnee, Joint::RightKnee, 0.11, 0.45),
        (Joint::LeftAnkle, Joint::RightAnkle, 0.11, 0.85),
    ];
    for (left, right, x, y) in rows {
        world.set(left, WorldLandmark::new(-x, y, 0.0, 0.9));
        world.set(right, WorldLandmark::new(x, y, 0.0, 0.9));
    }
    world.set(Joint::Nose, WorldLandmark::new(0.0, -0.95, -0.1, 0.9));
    world
}
