//! Template alignment scoring.
//!
//! ## Score
//!
//! score = clamp(100 - e * K, 0, 100)
//!
//! Where `e` is the weighted mean distance between each visible required
//! joint (normalized by [`BodyGeometry`]) and its template target. Weights are
//! capped at 1.0 so no single joint dominates.

use physique_core::tuning::*;
use physique_core::{AlignmentConfig, FrameSize, NormalizedPoint, PoseLandmarks};
use serde::{Deserialize, Serialize};

use crate::body_geometry::{estimate_body_geometry, BodyGeometry};
use crate::templates::PoseTemplate;

/// Weighted normalized error against a template
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentError {
    pub average: f64,
    pub matched: usize,
    /// Sum of the capped weights of matched joints
    pub total_weight: f64,
}

/// Scores how closely detected joints match a template
#[derive(Debug, Clone)]
pub struct AlignmentScorer {
    k: f64,
}

impl AlignmentScorer {
    pub fn new(config: &AlignmentConfig) -> Self {
        Self { k: config.k }
    }

    /// Weighted average normalized error over matched joints
    ///
    /// `None` when no body geometry is available.
    pub fn weighted_error(
        &self,
        landmarks: &PoseLandmarks,
        template: &PoseTemplate,
        frame: FrameSize,
    ) -> Option<AlignmentError> {
        let geo = estimate_body_geometry(landmarks, frame)?;
        Some(weighted_error_with(landmarks, template, frame, &geo))
    }

    /// Alignment score in 0..=100
    pub fn score(&self, landmarks: &PoseLandmarks, template: &PoseTemplate, frame: FrameSize) -> f64 {
        match self.weighted_error(landmarks, template, frame) {
            Some(err) => self.score_error(&err),
            None => 0.0,
        }
    }

    /// Map a weighted error to a score
    ///
    /// Fewer than two matched joints earn partial credit only, and matches
    /// carrying no weight score nothing.
    pub fn score_error(&self, err: &AlignmentError) -> f64 {
        match err.matched {
            0 => 0.0,
            1 => ALIGNMENT_SINGLE_JOINT_SCORE,
            _ if err.total_weight.is_nan() || err.total_weight <= 0.0 => 0.0,
            _ => (100.0 - err.average * self.k).clamp(0.0, 100.0),
        }
    }
}

impl Default for AlignmentScorer {
    fn default() -> Self {
        Self { k: ALIGNMENT_K }
    }
}

fn weighted_error_with(
    landmarks: &PoseLandmarks,
    template: &PoseTemplate,
    frame: FrameSize,
    geo: &BodyGeometry,
) -> AlignmentError {
    let mut total_error = 0.0;
    let mut total_weight = 0.0;
    let mut matched = 0;

    for &joint in template.required() {
        let (Some(px), Some(target)) = (landmarks.pixel(joint, frame), template.target(joint)) else {
            continue;
        };
        let weight = template
            .weight(joint)
            .unwrap_or(ALIGNMENT_MAX_JOINT_WEIGHT)
            .min(ALIGNMENT_MAX_JOINT_WEIGHT);

        let normalized = NormalizedPoint::new(
            (px.x - geo.center.x) / geo.scale,
            (px.y - geo.center.y) / geo.scale,
        );
        total_error += normalized.distance_to(&target) * weight;
        total_weight += weight;
        matched += 1;
    }

    let average = if total_weight > 0.0 {
        total_error / total_weight
    } else {
        0.0
    };
    AlignmentError {
        average,
        matched,
        total_weight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{frame, hide, pose_from, standing_pose};
    use crate::templates::template_by_id;
    use physique_core::{Joint, Landmark};
    use std::collections::BTreeMap;

    /// Template whose nose-to-ankle span is exactly one body height
    fn unit_template() -> PoseTemplate {
        let targets = BTreeMap::from([
            (Joint::Nose, NormalizedPoint::new(0.0, -0.5)),
            (Joint::LeftShoulder, NormalizedPoint::new(-0.12, -0.35)),
            (Joint::RightShoulder, NormalizedPoint::new(0.12, -0.35)),
            (Joint::LeftHip, NormalizedPoint::new(-0.08, 0.0)),
            (Joint::RightHip, NormalizedPoint::new(0.08, 0.0)),
            (Joint::LeftAnkle, NormalizedPoint::new(-0.1, 0.5)),
            (Joint::RightAnkle, NormalizedPoint::new(0.1, 0.5)),
        ]);
        let weights = targets.keys().map(|&j| (j, 1.0)).collect();
        PoseTemplate::new("unit", "Unit", targets.keys().copied().collect(), weights, targets).unwrap()
    }

    fn error(average: f64, matched: usize) -> AlignmentError {
        AlignmentError {
            average,
            matched,
            total_weight: matched as f64,
        }
    }

    /// Landmarks placed on a template's targets around (500, 500) at `scale` px
    fn pose_on_template(template: &PoseTemplate, scale: f64) -> PoseLandmarks {
        let points: Vec<_> = template
            .required()
            .iter()
            .map(|&j| {
                let t = template.target(j).unwrap();
                (j, (500.0 + t.x * scale) / 1000.0, (500.0 + t.y * scale) / 1000.0)
            })
            .collect();
        pose_from(&points)
    }

    #[test]
    fn test_exact_match_scores_100() {
        let template = unit_template();
        let scorer = AlignmentScorer::default();
        let pose = pose_on_template(&template, 800.0);
        let err = scorer.weighted_error(&pose, &template, frame()).unwrap();
        assert_eq!(err.matched, 7);
        assert!(err.average < 1e-9);
        assert!((scorer.score(&pose, &template, frame()) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_displaced_joint_lowers_score() {
        let template = unit_template();
        let scorer = AlignmentScorer::default();
        let mut pose = pose_on_template(&template, 800.0);
        let base = scorer.score(&pose, &template, frame());
        pose.set(Joint::LeftHip, Landmark::new(0.40, 0.55, 0.95));
        let displaced = scorer.score(&pose, &template, frame());
        assert!(displaced < base);
    }

    #[test]
    fn test_partial_credit() {
        let template = template_by_id("front-biceps").unwrap();
        let scorer = AlignmentScorer::default();
        let mut pose = standing_pose();
        hide(
            &mut pose,
            &[
                Joint::Nose,
                Joint::LeftElbow,
                Joint::RightElbow,
                Joint::LeftWrist,
                Joint::RightWrist,
                Joint::LeftHip,
                Joint::RightHip,
                Joint::LeftKnee,
                Joint::RightKnee,
                Joint::LeftAnkle,
                Joint::RightAnkle,
            ],
        );
        let err = scorer.weighted_error(&pose, template, frame()).unwrap();
        assert_eq!(err.matched, 2);

        assert_eq!(scorer.score_error(&error(0.0, 1)), 10.0);
        assert_eq!(scorer.score_error(&error(0.0, 0)), 0.0);
    }

    #[test]
    fn test_no_geometry_scores_zero() {
        let template = template_by_id("back-lats").unwrap();
        let mut pose = standing_pose();
        hide(&mut pose, &[Joint::LeftShoulder]);
        assert_eq!(AlignmentScorer::default().score(&pose, template, frame()), 0.0);
    }

    #[test]
    fn test_score_is_monotonic_in_error() {
        let scorer = AlignmentScorer::default();
        let errors = [0.0, 0.02, 0.05, 0.12, 0.25, 0.5];
        let scores: Vec<f64> = errors
            .iter()
            .map(|&e| scorer.score_error(&error(e, 5)))
            .collect();
        assert!((scores[1] - 97.6).abs() < 1e-9);
        assert!((scores[3] - 85.6).abs() < 1e-9);
        for pair in scores.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
        // Strict while unclamped
        assert!(scores[0] > scores[1] && scores[3] > scores[4]);
    }

    #[test]
    fn test_weightless_match_scores_zero() {
        let scorer = AlignmentScorer::default();
        let weightless = AlignmentError {
            average: 0.0,
            matched: 2,
            total_weight: 0.0,
        };
        assert_eq!(scorer.score_error(&weightless), 0.0);
        assert_eq!(scorer.score_error(&AlignmentError { total_weight: f64::NAN, ..weightless }), 0.0);

        let template = unit_template();
        let pose = pose_on_template(&template, 800.0);
        let err = scorer.weighted_error(&pose, &template, frame()).unwrap();
        assert!((err.total_weight - 7.0).abs() < 1e-12);
    }
}
