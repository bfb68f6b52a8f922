//! Live video scan pipeline.
//!
//! Each frame is scored, blended into the session's [`SmoothingState`] and
//! reported back. The state is passed in and returned so the caller owns it
//! between frames.

use physique_core::{
    AnalysisConfig, FrameSize, PoseDetectionResult, ReadinessConfig, Result, SmoothingConfig,
    Timestamp,
};
use physique_metrics::{
    body_visibility, compute_measurements, compute_symmetry, live_confidence, template_by_id,
    AlignmentScorer, BodyVisibility, ConfidenceBreakdown, Measurements, PoseTemplate, SymmetryData,
};
use physique_vision::{CommittedMeasurements, MeasurementSample, SmoothingState};
use serde::{Deserialize, Serialize};
use tracing::trace;

pub const NO_POSE_TIP: &str = "No pose detected: stand in frame";

/// One captured video frame
#[derive(Debug, Clone, Copy)]
pub struct LiveFrame<'a> {
    /// `None` when the pose model found nobody
    pub detection: Option<&'a PoseDetectionResult>,
    pub frame: FrameSize,
    /// Average luma of the frame
    pub luma: f64,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveFrameReport {
    /// Smoothed alignment score
    pub alignment: f64,
    /// Smoothed confidence score
    pub confidence: f64,
    /// Raw per-frame breakdown, absent without a detection
    pub breakdown: Option<ConfidenceBreakdown>,
    pub tip: String,
    pub body_visibility: BodyVisibility,
    pub measurements: Option<Measurements>,
    /// EMA-smoothed measurement tuple
    pub smoothed: Option<MeasurementSample>,
    pub symmetry: Option<SymmetryData>,
    /// Thresholds held long enough to capture
    pub ready: bool,
}

/// Per-frame scorer bound to one pose template
#[derive(Debug, Clone)]
pub struct LiveScanner {
    template: &'static PoseTemplate,
    scorer: AlignmentScorer,
    smoothing: SmoothingConfig,
    readiness: ReadinessConfig,
    user_height_cm: Option<f64>,
}

impl LiveScanner {
    pub fn new(config: &AnalysisConfig, pose_id: &str, user_height_cm: Option<f64>) -> Result<Self> {
        Ok(Self {
            template: template_by_id(pose_id)?,
            scorer: AlignmentScorer::new(&config.alignment),
            smoothing: config.smoothing.clone(),
            readiness: config.readiness.clone(),
            user_height_cm,
        })
    }

    pub fn template(&self) -> &'static PoseTemplate {
        self.template
    }

    /// Fresh accumulators for a new capture session
    pub fn new_state(&self) -> SmoothingState {
        SmoothingState::new(self.smoothing.clone())
    }

    /// Score one frame and advance the smoothing state
    pub fn step(&self, mut state: SmoothingState, input: &LiveFrame<'_>) -> (SmoothingState, LiveFrameReport) {
        let Some(detection) = input.detection else {
            let alignment = state.update_alignment(0.0);
            let confidence = state.update_confidence(0.0);
            state.track_readiness(false, input.timestamp, self.readiness.hold_ms);
            let report = LiveFrameReport {
                alignment,
                confidence,
                breakdown: None,
                tip: NO_POSE_TIP.to_string(),
                body_visibility: BodyVisibility::None,
                measurements: None,
                smoothed: state.measurements(),
                symmetry: None,
                ready: false,
            };
            return (state, report);
        };

        let landmarks = &detection.landmarks;
        let raw_alignment = self.scorer.score(landmarks, self.template, input.frame);
        let breakdown = live_confidence(landmarks, self.template, raw_alignment, input.luma, input.frame);

        let alignment = state.update_alignment(raw_alignment);
        let confidence = state.update_confidence(breakdown.total);

        let measurements = compute_measurements(
            landmarks,
            input.frame,
            Some(&detection.world_landmarks),
            self.user_height_cm,
        );
        let smoothed = match &measurements {
            Some(m) => Some(state.update_measurements(m.to_sample())),
            None => state.measurements(),
        };

        let ready = state.track_readiness(
            alignment >= self.readiness.min_alignment && confidence >= self.readiness.min_confidence,
            input.timestamp,
            self.readiness.hold_ms,
        );
        trace!(alignment, confidence, ready, "live frame scored");

        let report = LiveFrameReport {
            alignment,
            confidence,
            tip: breakdown.tip().to_string(),
            breakdown: Some(breakdown),
            body_visibility: body_visibility(landmarks),
            measurements,
            smoothed,
            symmetry: compute_symmetry(&detection.world_landmarks),
            ready,
        };
        (state, report)
    }

    /// Measurements to store for a capture
    pub fn capture(&self, state: &SmoothingState) -> Option<CommittedMeasurements> {
        state.commit(self.user_height_cm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{detection, frame};
    use approx::assert_relative_eq;
    use physique_core::Error;

    fn scanner() -> LiveScanner {
        LiveScanner::new(&AnalysisConfig::default(), "front-checkin", Some(180.0)).unwrap()
    }

    fn at(det: Option<&PoseDetectionResult>, ms: i64) -> LiveFrame<'_> {
        LiveFrame {
            detection: det,
            frame: frame(),
            luma: 120.0,
            timestamp: Timestamp::from_millis(ms),
        }
    }

    #[test]
    fn test_unknown_template() {
        let err = LiveScanner::new(&AnalysisConfig::default(), "plank", None).unwrap_err();
        assert!(matches!(err, Error::UnknownTemplate(_)));
    }

    #[test]
    fn test_ready_after_hold() {
        let scanner = scanner();
        let det = detection();
        let mut state = scanner.new_state();

        let mut readiness = Vec::new();
        for ms in [0, 500, 1000] {
            let (next, report) = scanner.step(state, &at(Some(&det), ms));
            state = next;
            assert!(report.alignment > 80.0);
            assert!(report.confidence > 70.0);
            readiness.push(report.ready);
        }
        assert_eq!(readiness, vec![false, false, true]);
        assert_eq!(state.buffered(), 3);
    }

    #[test]
    fn test_missing_pose_decays_and_resets_hold() {
        let scanner = scanner();
        let det = detection();
        let (state, first) = scanner.step(scanner.new_state(), &at(Some(&det), 0));

        let (state, report) = scanner.step(state, &at(None, 80));
        assert_eq!(report.tip, NO_POSE_TIP);
        assert!(!report.ready);
        assert_relative_eq!(report.alignment, first.alignment * 0.88, epsilon = 1e-9);
        assert_relative_eq!(report.confidence, first.confidence * 0.88, epsilon = 1e-9);

        // Hold restarts after the gap
        let (state, report) = scanner.step(state, &at(Some(&det), 1200));
        assert!(!report.ready);
        let (_, report) = scanner.step(state, &at(Some(&det), 2300));
        assert!(report.ready);
    }

    #[test]
    fn test_capture_uses_median_after_enough_frames() {
        let scanner = scanner();
        let det = detection();
        let mut state = scanner.new_state();
        for i in 0..6 {
            state = scanner.step(state, &at(Some(&det), i * 80)).0;
        }
        let committed = scanner.capture(&state).unwrap();
        assert!(committed.from_median);
        assert_relative_eq!(committed.sample.body_height_m, 1.8, epsilon = 1e-12);
        assert_relative_eq!(committed.body_height_cm, 180.0, epsilon = 1e-9);
        assert_relative_eq!(committed.shoulder_width_cm, 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_report_contents() {
        let scanner = scanner();
        let det = detection();
        let (_, report) = scanner.step(scanner.new_state(), &at(Some(&det), 0));
        assert_eq!(report.body_visibility, BodyVisibility::Full);
        assert!(report.breakdown.is_some());
        assert_eq!(report.symmetry.map(|s| s.overall_score), Some(100.0));
        assert_relative_eq!(report.smoothed.unwrap().v_taper_index, 2.0, epsilon = 1e-12);
    }
}
