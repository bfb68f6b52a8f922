//! Still-photo scan pipeline.

use physique_core::tuning::MASK_THRESHOLD;
use physique_core::{
    AnalysisConfig, CheckinPose, Error, FrameSize, PoseDetectionResult, Result, ScanRecord,
    Timestamp,
};
use physique_metrics::{
    body_visibility, compute_measurements, compute_symmetry, hip_tilt_deg, photo_confidence,
    shoulder_tilt_deg, stance_width_px, template_by_id, AlignmentScorer, BodyVisibility,
    ConfidenceBreakdown, Measurements, SymmetryData,
};
use physique_vision::{compute_slice_indices, Exposure, MaskData, SliceIndices, SlicePositions};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classifier::{classify_photo, ClassificationResult};
use crate::gates::{required_joints, CheckinGateResult, CheckinGateValidator, ConsistencyGate, GateInput};

/// How the caller intends to store the scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanType {
    #[default]
    Gallery,
    Checkin,
}

/// Everything needed to analyze one photo
#[derive(Debug, Clone)]
pub struct PhotoScanInput<'a> {
    /// `None` when the pose model found nobody
    pub detection: Option<&'a PoseDetectionResult>,
    pub mask: Option<&'a MaskData>,
    pub frame: FrameSize,
    /// Average luma of the photo, see [`physique_vision::sample_average_luma`]
    pub avg_brightness: f64,
    pub pose_id: &'a str,
    pub scan_type: ScanType,
    pub user_height_cm: Option<f64>,
    /// Most recent scan of the same pose
    pub previous_scan: Option<&'a ScanRecord>,
    /// Most recent check-in of the same pose
    pub previous_checkin: Option<&'a ScanRecord>,
    pub now: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoScanResult {
    pub body_visibility: BodyVisibility,
    pub alignment_score: f64,
    pub measurements: Measurements,
    pub symmetry: Option<SymmetryData>,
    pub slice_indices: Option<SliceIndices>,
    pub slice_positions: Option<SlicePositions>,
    pub confidence: ConfidenceBreakdown,
    pub segmentation_quality: f64,
    pub consistency: ConsistencyGate,
    pub avg_brightness: f64,
    pub exposure: Exposure,
    pub stance_width_px: Option<f64>,
    pub hip_tilt_deg: Option<f64>,
    pub shoulder_tilt_deg: Option<f64>,
    /// Present for check-in scans only
    pub checkin_gates: Option<CheckinGateResult>,
    pub classification: ClassificationResult,
    pub warnings: Vec<String>,
}

impl PhotoScanResult {
    /// Summary to hand to the external store
    pub fn to_record(&self, pose_id: &str, timestamp: Timestamp) -> ScanRecord {
        let m = &self.measurements;
        ScanRecord {
            timestamp,
            pose_id: pose_id.to_string(),
            body_height_px: m.body_height_px,
            stance_width_index: self
                .stance_width_px
                .filter(|_| m.body_height_px > 0.0)
                .map(|px| px / m.body_height_px),
            hip_tilt_deg: self.hip_tilt_deg,
            avg_brightness: Some(self.avg_brightness),
            v_taper_index: m.v_taper_index,
            shoulder_width_cm: m.shoulder_width_cm,
            symmetry_score: self.symmetry.as_ref().map(|s| s.overall_score),
        }
    }
}

/// Runs the full analysis for a single photo
#[derive(Debug, Clone, Default)]
pub struct PhotoScanner {
    scorer: AlignmentScorer,
    gates: CheckinGateValidator,
}

impl PhotoScanner {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            scorer: AlignmentScorer::new(&config.alignment),
            gates: CheckinGateValidator::new(config.gates.clone()),
        }
    }

    /// Analyze a photo
    ///
    /// Fails only when nobody was detected or the shoulders are hidden;
    /// everything else degrades into a warning.
    pub fn analyze(&self, input: &PhotoScanInput<'_>) -> Result<PhotoScanResult> {
        let detection = input.detection.ok_or(Error::NoPoseDetected)?;
        let landmarks = &detection.landmarks;
        let frame = input.frame;
        let mut warnings = Vec::new();

        let visibility = body_visibility(landmarks);
        if matches!(visibility, BodyVisibility::None | BodyVisibility::Partial) {
            warnings.push("Full body not visible: show your entire body for best results".to_string());
        }

        let template = template_by_id(input.pose_id).ok();
        let alignment_score = template.map_or(0.0, |t| self.scorer.score(landmarks, t, frame));

        let measurements = compute_measurements(
            landmarks,
            frame,
            Some(&detection.world_landmarks),
            input.user_height_cm,
        )
        .ok_or_else(|| {
            Error::InsufficientLandmarks("could not compute body measurements, ensure shoulders are visible".into())
        })?;

        let symmetry = compute_symmetry(&detection.world_landmarks);

        let exposure = Exposure::from_luma(input.avg_brightness);
        match exposure {
            Exposure::TooDark => {
                warnings.push("Photo is too dark: use better lighting for accurate analysis".to_string())
            }
            Exposure::Overexposed => {
                warnings.push("Photo is overexposed: reduce brightness for better results".to_string())
            }
            Exposure::Normal => {}
        }

        let shoulder_tilt = shoulder_tilt_deg(landmarks, frame);
        let hip_tilt = hip_tilt_deg(landmarks, frame);

        let mut segmentation_quality = 0.0;
        let mut slice_indices = None;
        match input.mask.filter(|m| !m.is_empty()) {
            Some(mask) => {
                let binary = mask.binarize(MASK_THRESHOLD);
                segmentation_quality = binary.quality_score();
                if visibility == BodyVisibility::Full {
                    slice_indices = compute_slice_indices(&binary, landmarks, frame, measurements.body_height_px);
                    if slice_indices.is_none() {
                        warnings.push(
                            "Could not compute lower body widths: ensure legs are fully visible".to_string(),
                        );
                    }
                }
            }
            None => warnings.push("Segmentation not available: body shape analysis limited".to_string()),
        }

        let required = template.map_or(required_joints(CheckinPose::Front), |t| t.required());
        let confidence = photo_confidence(
            landmarks,
            required,
            alignment_score,
            input.avg_brightness,
            measurements.body_height_px,
            frame,
            segmentation_quality,
        );

        let stance = stance_width_px(landmarks, frame);
        let gate_input = GateInput {
            landmarks,
            frame,
            pose: CheckinPose::from_pose_id(input.pose_id),
            body_height_px: measurements.body_height_px,
            stance_width_px: stance,
            hip_tilt_deg: hip_tilt,
            avg_brightness: Some(input.avg_brightness),
        };

        let consistency = self.gates.check_consistency(&gate_input, input.previous_scan);
        if !consistency.passed {
            let adjust = consistency.details.adjustments();
            if !adjust.is_empty() {
                warnings.push(format!("Inconsistent with previous scan: adjust {}", adjust.join(", ")));
            }
        }

        let checkin_gates = (input.scan_type == ScanType::Checkin)
            .then(|| self.gates.evaluate(&gate_input, input.previous_checkin, input.now));
        if let Some(gates) = &checkin_gates {
            push_gate_warnings(gates, &mut warnings);
        }

        let classification = classify_photo(landmarks, frame, input.avg_brightness, alignment_score);

        if !warnings.is_empty() {
            warn!(pose = input.pose_id, count = warnings.len(), "photo scan completed with warnings");
        }
        debug!(
            pose = input.pose_id,
            confidence = confidence.total,
            category = ?classification.category,
            "photo scan analyzed"
        );

        Ok(PhotoScanResult {
            body_visibility: visibility,
            alignment_score,
            measurements,
            symmetry,
            slice_indices,
            slice_positions: SlicePositions::from_landmarks(landmarks, frame),
            confidence,
            segmentation_quality,
            consistency,
            avg_brightness: input.avg_brightness,
            exposure,
            stance_width_px: stance,
            hip_tilt_deg: hip_tilt,
            shoulder_tilt_deg: shoulder_tilt,
            checkin_gates,
            classification,
            warnings,
        })
    }
}

fn push_gate_warnings(gates: &CheckinGateResult, warnings: &mut Vec<String>) {
    if !gates.joints.passed {
        warnings.push(format!("Missing joints: {}", gates.joints.missing_joints.join(", ")));
    }
    if !gates.standing.passed {
        warnings.push(gates.standing.reason.clone());
    }
    if !gates.consistency.passed {
        let adjust = gates.consistency.details.adjustments();
        if !adjust.is_empty() {
            warnings.push(format!("Check-in inconsistent: adjust {}", adjust.join(", ")));
        }
    }
    if gates.time.same_day_block {
        warnings.push("Already checked in today: save as Gallery or wait until tomorrow".to_string());
    } else if let (true, Some(days)) = (gates.time.warning, gates.time.days_since_last) {
        warnings.push(format!(
            "Only {days}d since last check-in: wait 7 days for best comparison"
        ));
    }
}
