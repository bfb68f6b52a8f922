//! Capture confidence scoring.
//!
//! ## Components
//!
//! | Component | Live | Photo |
//! |---|---|---|
//! | Landmarks visible | 30 | 30 |
//! | Brightness | 20 | 20 |
//! | Distance | 20 | 20 |
//! | Pose match | 30 | 20 |
//! | Segmentation | - | 10 |
//!
//! Breakdown values are rounded to 0.1; the total is computed from the
//! unrounded components and clamped to 0..=100.

use physique_core::tuning::*;
use physique_core::{clamp_score, round_to, FrameSize, Joint, PoseLandmarks};
use physique_vision::brightness_score;
use serde::{Deserialize, Serialize};

use crate::body_geometry::estimate_body_geometry;
use crate::templates::PoseTemplate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceMode {
    Live,
    Photo,
}

impl ConfidenceMode {
    pub fn pose_match_max(self) -> f64 {
        match self {
            ConfidenceMode::Live => CONFIDENCE_LIVE_POSE_MAX,
            ConfidenceMode::Photo => CONFIDENCE_PHOTO_POSE_MAX,
        }
    }
}

/// Dimensions a user can act on to raise confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceDimension {
    Brightness,
    Distance,
    LandmarksVisible,
    PoseMatch,
}

impl ConfidenceDimension {
    pub fn tip(self) -> &'static str {
        match self {
            ConfidenceDimension::Brightness => "Improve lighting: move to a brighter area",
            ConfidenceDimension::Distance => "Step back: show your full body in frame",
            ConfidenceDimension::LandmarksVisible => {
                "Show your full body: some joints aren't visible"
            }
            ConfidenceDimension::PoseMatch => "Align to the outline: match the pose template",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub landmarks_visible: f64,
    pub brightness: f64,
    pub distance: f64,
    pub pose_match: f64,
    /// Photo mode only
    pub segmentation: Option<f64>,
    pub total: f64,
    pub mode: ConfidenceMode,
}

impl ConfidenceBreakdown {
    /// Dimension with the lowest share of its maximum
    ///
    /// Ties resolve in the order brightness, distance, landmarks, pose match.
    pub fn weakest(&self) -> ConfidenceDimension {
        let ratios = [
            (ConfidenceDimension::Brightness, self.brightness / CONFIDENCE_BRIGHTNESS_MAX),
            (ConfidenceDimension::Distance, self.distance / CONFIDENCE_DISTANCE_MAX),
            (
                ConfidenceDimension::LandmarksVisible,
                self.landmarks_visible / CONFIDENCE_LANDMARKS_MAX,
            ),
            (ConfidenceDimension::PoseMatch, self.pose_match / self.mode.pose_match_max()),
        ];
        ratios
            .iter()
            .fold(ratios[0], |best, &cur| if cur.1 < best.1 { cur } else { best })
            .0
    }

    pub fn tip(&self) -> &'static str {
        self.weakest().tip()
    }
}

/// Share of required joints that are visible, scaled to 30
pub fn landmarks_visible_score(landmarks: &PoseLandmarks, required: &[Joint]) -> f64 {
    if required.is_empty() {
        return 0.0;
    }
    let visible = required.iter().filter(|&&j| landmarks.is_visible(j)).count();
    visible as f64 / required.len() as f64 * CONFIDENCE_LANDMARKS_MAX
}

/// Distance-from-camera score (0..20)
///
/// Full marks when the body spans 40-90% of the frame height. Without a body
/// height, shoulder width relative to frame width earns up to 18.
pub fn distance_score(body_height_px: Option<f64>, shoulder_width_px: Option<f64>, frame: FrameSize) -> f64 {
    if let Some(height) = body_height_px.filter(|h| *h > 0.0 && frame.height > 0) {
        let ratio = height / frame.height_f64();
        return if (DISTANCE_RATIO_MIN..=DISTANCE_RATIO_MAX).contains(&ratio) {
            CONFIDENCE_DISTANCE_MAX
        } else if ratio < DISTANCE_RATIO_MIN {
            (ratio / DISTANCE_RATIO_MIN * CONFIDENCE_DISTANCE_MAX).clamp(0.0, CONFIDENCE_DISTANCE_MAX)
        } else {
            ((1.0 - ratio) / (1.0 - DISTANCE_RATIO_MAX) * CONFIDENCE_DISTANCE_MAX)
                .clamp(0.0, CONFIDENCE_DISTANCE_MAX)
        };
    }

    match shoulder_width_px.filter(|w| *w > 0.0 && frame.width > 0) {
        Some(width) => {
            let ratio = width / frame.width_f64();
            if (SHOULDER_RATIO_MIN..=SHOULDER_RATIO_MAX).contains(&ratio) {
                SHOULDER_FALLBACK_MAX
            } else {
                (ratio / SHOULDER_RATIO_REFERENCE * SHOULDER_FALLBACK_MAX).clamp(0.0, SHOULDER_FALLBACK_MAX)
            }
        }
        None => 0.0,
    }
}

fn shoulder_width_px(landmarks: &PoseLandmarks, frame: FrameSize) -> Option<f64> {
    let l = landmarks.pixel(Joint::LeftShoulder, frame)?;
    let r = landmarks.pixel(Joint::RightShoulder, frame)?;
    Some(l.distance_to(&r))
}

/// Confidence for a live video frame
pub fn live_confidence(
    landmarks: &PoseLandmarks,
    template: &PoseTemplate,
    alignment: f64,
    luma: f64,
    frame: FrameSize,
) -> ConfidenceBreakdown {
    let body_height = estimate_body_geometry(landmarks, frame).map(|g| g.scale);
    let landmarks_visible = landmarks_visible_score(landmarks, template.required());
    let brightness = brightness_score(luma);
    let distance = distance_score(body_height, shoulder_width_px(landmarks, frame), frame);
    let pose_match = clamp_score(alignment) / 100.0 * CONFIDENCE_LIVE_POSE_MAX;

    ConfidenceBreakdown {
        landmarks_visible: round_to(landmarks_visible, 1),
        brightness: round_to(brightness, 1),
        distance: round_to(distance, 1),
        pose_match: round_to(pose_match, 1),
        segmentation: None,
        total: clamp_score(landmarks_visible + brightness + distance + pose_match),
        mode: ConfidenceMode::Live,
    }
}

/// Confidence for a still photo
///
/// `segmentation_quality` is the mask quality score (0..100), 0 when no mask
/// was produced.
pub fn photo_confidence(
    landmarks: &PoseLandmarks,
    required: &[Joint],
    alignment: f64,
    luma: f64,
    body_height_px: f64,
    frame: FrameSize,
    segmentation_quality: f64,
) -> ConfidenceBreakdown {
    let landmarks_visible = landmarks_visible_score(landmarks, required);
    let brightness = brightness_score(luma);
    let distance = distance_score(Some(body_height_px), None, frame);
    let pose_match = clamp_score(alignment) / 100.0 * CONFIDENCE_PHOTO_POSE_MAX;
    let segmentation = clamp_score(segmentation_quality) / 100.0 * CONFIDENCE_SEGMENTATION_MAX;

    ConfidenceBreakdown {
        landmarks_visible: round_to(landmarks_visible, 1),
        brightness: round_to(brightness, 1),
        distance: round_to(distance, 1),
        pose_match: round_to(pose_match, 1),
        segmentation: Some(round_to(segmentation, 1)),
        total: clamp_score(landmarks_visible + brightness + distance + pose_match + segmentation),
        mode: ConfidenceMode::Photo,
    }
}
