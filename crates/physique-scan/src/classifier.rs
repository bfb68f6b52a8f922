//! Photo classification into check-in categories.
//!
//! ## Quality
//!
//! quality = 0.25 x lighting + 0.35 x framing + 0.25 x pose match + bonus
//!
//! The bonus is 15 with the full body visible, 8 with hips but no legs.

use physique_core::tuning::*;
use physique_core::{FrameSize, Joint, PoseLandmarks};
use physique_metrics::{check_standing, PostureLimits};
use physique_vision::lighting_score;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanCategory {
    CheckinFull,
    CheckinSelfie,
    Gallery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoseDirection {
    Front,
    Back,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisScores {
    pub quality: f64,
    pub lighting: f64,
    pub framing: f64,
    pub pose_match: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: ScanCategory,
    pub pose_direction: PoseDirection,
    pub tracked_regions: Vec<String>,
    /// At most two
    pub tips: Vec<String>,
    pub scores: AnalysisScores,
}

const TIP_STEP_BACK: &str = "Step back until your feet are visible for a full check-in.";
const TIP_STAND_UPRIGHT: &str = "Stand upright with straight legs for best tracking.";
const TIP_LIGHTING: &str = "Move to brighter light or face the light source.";
const TIP_FRAMING: &str = "Center yourself in the frame with some margin around your body.";

/// Joint groups present at the classifier's visibility threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Presence {
    nose: bool,
    shoulders: bool,
    hips: bool,
    knees: bool,
    ankles: bool,
}

impl Presence {
    fn of(landmarks: &PoseLandmarks) -> Self {
        let t = CLASSIFIER_VISIBILITY_THRESHOLD;
        let pair = |l, r| landmarks.pair_visible_at(l, r, t);
        Self {
            nose: landmarks.visible_at(Joint::Nose, t).is_some(),
            shoulders: pair(Joint::LeftShoulder, Joint::RightShoulder),
            hips: pair(Joint::LeftHip, Joint::RightHip),
            knees: pair(Joint::LeftKnee, Joint::RightKnee),
            ankles: pair(Joint::LeftAnkle, Joint::RightAnkle),
        }
    }

    fn full_body(&self) -> bool {
        self.shoulders && self.hips && self.knees && self.ankles
    }
}

/// Classify a photo from its landmarks, average luma and alignment score
pub fn classify_photo(
    landmarks: &PoseLandmarks,
    frame: FrameSize,
    luma: f64,
    alignment: f64,
) -> ClassificationResult {
    let body = Presence::of(landmarks);
    let standing = body.full_body() && check_standing(landmarks, frame, &PostureLimits::default()).is_ok();

    let lighting = lighting_score(luma).round();
    let framing = framing_score(landmarks, &body).round();
    let pose_match = alignment.clamp(0.0, 100.0).round();

    let bonus = if body.full_body() {
        15.0
    } else if body.hips {
        8.0
    } else {
        0.0
    };
    let quality = (lighting * 0.25 + framing * 0.35 + pose_match * 0.25 + bonus).round();

    let category = if body.full_body()
        && standing
        && lighting >= CLASSIFY_FULL_MIN_LIGHTING
        && pose_match >= CLASSIFY_FULL_MIN_POSE_MATCH
    {
        ScanCategory::CheckinFull
    } else if body.shoulders && body.hips && lighting >= CLASSIFY_SELFIE_MIN_LIGHTING {
        ScanCategory::CheckinSelfie
    } else {
        ScanCategory::Gallery
    };

    let tracked_regions: &[&str] = match category {
        ScanCategory::CheckinFull => &["Full body", "Shoulders", "Torso", "Legs"],
        ScanCategory::CheckinSelfie => &["Upper body", "Shoulders", "Torso proportions"],
        ScanCategory::Gallery => &[],
    };

    let mut tips: Vec<&str> = Vec::with_capacity(CLASSIFY_MAX_TIPS);
    if category != ScanCategory::CheckinFull {
        if !body.ankles || !body.knees {
            tips.push(TIP_STEP_BACK);
        }
        if body.full_body() && !standing {
            tips.push(TIP_STAND_UPRIGHT);
        }
    }
    if lighting < CLASSIFY_TIP_MIN_LIGHTING && tips.len() < CLASSIFY_MAX_TIPS {
        tips.push(TIP_LIGHTING);
    }
    if framing < CLASSIFY_TIP_MIN_FRAMING && tips.len() < CLASSIFY_MAX_TIPS {
        tips.push(TIP_FRAMING);
    }

    ClassificationResult {
        category,
        pose_direction: pose_direction(landmarks, &body),
        tracked_regions: tracked_regions.iter().map(|s| s.to_string()).collect(),
        tips: tips.into_iter().map(String::from).collect(),
        scores: AnalysisScores {
            quality,
            lighting,
            framing,
            pose_match,
        },
    }
}

/// Facing direction from nose visibility, given both shoulders
fn pose_direction(landmarks: &PoseLandmarks, body: &Presence) -> PoseDirection {
    if !body.shoulders {
        return PoseDirection::Unknown;
    }
    let nose = landmarks.get(Joint::Nose).map_or(0.0, |lm| lm.visibility);
    if nose > FACING_FRONT_NOSE_VISIBILITY {
        PoseDirection::Front
    } else if nose < FACING_BACK_NOSE_VISIBILITY {
        PoseDirection::Back
    } else {
        PoseDirection::Unknown
    }
}

/// Framing score (0..100) from centering, head room, edge margin and coverage
fn framing_score(landmarks: &PoseLandmarks, body: &Presence) -> f64 {
    let shoulders = landmarks
        .get(Joint::LeftShoulder)
        .zip(landmarks.get(Joint::RightShoulder))
        .filter(|_| body.shoulders);
    let Some((ls, rs)) = shoulders else {
        return 20.0;
    };

    let mut score: f64 = 50.0;

    let hips = landmarks
        .get(Joint::LeftHip)
        .zip(landmarks.get(Joint::RightHip))
        .filter(|_| body.hips);
    let center_x = match hips {
        Some((lh, rh)) => (lh.x + rh.x) / 2.0,
        None => (ls.x + rs.x) / 2.0,
    };
    // Offset from the frame center as a fraction of half the width
    let offset = (center_x - 0.5).abs() / 0.5;
    score += if offset < 0.2 {
        25.0
    } else if offset < 0.35 {
        15.0
    } else {
        -10.0
    };

    match landmarks.get(Joint::Nose).filter(|_| body.nose) {
        None => score -= 10.0,
        Some(nose) if nose.y < 0.03 => score -= 15.0,
        Some(_) => {}
    }

    if ls.x.min(rs.x) > 0.05 && ls.x.max(rs.x) < 0.95 {
        score += 10.0;
    } else {
        score -= 10.0;
    }

    if body.full_body() {
        score += 15.0;
    } else if body.hips {
        score += 5.0;
    }

    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{frame, hide, standing_pose};
    use physique_core::Landmark;

    const LEGS: [Joint; 4] = [Joint::LeftKnee, Joint::RightKnee, Joint::LeftAnkle, Joint::RightAnkle];

    #[test]
    fn test_full_checkin() {
        let result = classify_photo(&standing_pose(), frame(), 180.0, 80.0);
        assert_eq!(result.category, ScanCategory::CheckinFull);
        assert_eq!(result.pose_direction, PoseDirection::Front);
        assert_eq!(result.scores.lighting, 100.0);
        // 50 + 25 centered + 10 margin + 15 full body
        assert_eq!(result.scores.framing, 100.0);
        // 25 + 35 + 20 + 15
        assert_eq!(result.scores.quality, 95.0);
        assert_eq!(result.tracked_regions[0], "Full body");
        assert!(result.tips.is_empty());
    }

    #[test]
    fn test_selfie_without_legs() {
        let mut pose = standing_pose();
        hide(&mut pose, &LEGS);
        let result = classify_photo(&pose, frame(), 100.0, 80.0);
        assert_eq!(result.category, ScanCategory::CheckinSelfie);
        assert_eq!(result.tips, vec![TIP_STEP_BACK]);
        assert_eq!(result.tracked_regions, vec!["Upper body", "Shoulders", "Torso proportions"]);
    }

    #[test]
    fn test_gallery_shoulders_only_dark() {
        let mut pose = standing_pose();
        hide(&mut pose, &LEGS);
        hide(&mut pose, &[Joint::LeftHip, Joint::RightHip]);
        let result = classify_photo(&pose, frame(), 20.0, 30.0);
        assert_eq!(result.category, ScanCategory::Gallery);
        assert_eq!(result.scores.lighting, 20.0);
        assert_eq!(result.tips, vec![TIP_STEP_BACK, TIP_LIGHTING]);
        assert!(result.tracked_regions.is_empty());
    }

    #[test]
    fn test_bent_legs_get_stand_upright_tip() {
        let mut pose = standing_pose();
        pose.set(Joint::LeftKnee, Landmark::new(0.56, 0.72, 0.9));
        pose.set(Joint::RightKnee, Landmark::new(0.64, 0.72, 0.9));
        let result = classify_photo(&pose, frame(), 120.0, 90.0);
        assert_eq!(result.category, ScanCategory::CheckinSelfie);
        assert_eq!(result.tips, vec![TIP_STAND_UPRIGHT]);
    }

    #[test]
    fn test_pose_direction() {
        let mut pose = standing_pose();
        let nose = *pose.get(Joint::Nose).unwrap();
        pose.set(Joint::Nose, Landmark { visibility: 0.05, ..nose });
        assert_eq!(classify_photo(&pose, frame(), 120.0, 80.0).pose_direction, PoseDirection::Back);
        pose.set(Joint::Nose, Landmark { visibility: 0.3, ..nose });
        assert_eq!(classify_photo(&pose, frame(), 120.0, 80.0).pose_direction, PoseDirection::Unknown);

        hide(&mut pose, &[Joint::LeftShoulder]);
        assert_eq!(classify_photo(&pose, frame(), 120.0, 80.0).pose_direction, PoseDirection::Unknown);
    }

    #[test]
    fn test_off_center_framing() {
        let pose = crate::fixtures::shifted(&standing_pose(), 0.3);
        let result = classify_photo(&pose, frame(), 120.0, 80.0);
        // Hip midpoint at x = 0.8: 50 - 10 + 10 + 15
        assert_eq!(result.scores.framing, 65.0);
    }

    #[test]
    fn test_tip_limit() {
        let mut pose = standing_pose();
        hide(&mut pose, &LEGS);
        hide(&mut pose, &[Joint::Nose]);
        let pose = crate::fixtures::shifted(&pose, 0.42);
        let result = classify_photo(&pose, frame(), 10.0, 0.0);
        assert_eq!(result.tips.len(), 2);
    }

    #[test]
    fn test_serialized_labels() {
        let result = classify_photo(&standing_pose(), frame(), 180.0, 80.0);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["category"], "CHECKIN_FULL");
        assert_eq!(json["pose_direction"], "FRONT");
    }
}
