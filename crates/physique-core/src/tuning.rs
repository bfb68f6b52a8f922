//! Calibration constants.
//!
//! Every empirically tuned value lives here. They were fitted against real
//! capture sessions with a phone camera and a lite pose model; a different
//! camera/model pairing is expected to need retuning. Values that hosts may
//! override at runtime are mirrored in [`crate::config::AnalysisConfig`].

// Visibility

/// Landmark counts as visible for geometry/scoring above this visibility.
pub const VISIBILITY_THRESHOLD: f64 = 0.2;

/// Stricter visibility used by the photo classifier.
pub const CLASSIFIER_VISIBILITY_THRESHOLD: f64 = 0.3;

/// Gate A requires every check-in joint at or above this visibility.
pub const GATE_JOINT_VISIBILITY: f64 = 0.5;

/// Number of landmarks emitted by the pose model.
pub const LANDMARK_COUNT: usize = 33;

// Body geometry fallback chain
//
// Each multiplier approximates full body height from the span a joint
// subset covers.

/// shoulder-midpoint → ankle-midpoint spans ~83% of body height.
pub const SHOULDER_ANKLE_MULTIPLIER: f64 = 1.2;
/// nose → hip-midpoint spans ~48% of body height.
pub const NOSE_HIP_MULTIPLIER: f64 = 2.1;
/// shoulder-midpoint → hip-midpoint spans ~31% of body height.
pub const SHOULDER_HIP_MULTIPLIER: f64 = 3.2;
/// nose → shoulder-midpoint spans ~18% of body height.
pub const NOSE_SHOULDER_MULTIPLIER: f64 = 5.5;
/// Shoulder width is ~25% of body height.
pub const SHOULDER_WIDTH_MULTIPLIER: f64 = 4.0;
/// Detections with an estimated body height at or below this are degenerate.
pub const MIN_BODY_SCALE_PX: f64 = 10.0;

// Alignment

/// Error-to-score slope. ~0.02 normalized error scores ~95, ~0.25 scores ~38
/// (after clamping), ~0.12 casual standing scores ~85.
pub const ALIGNMENT_K: f64 = 120.0;
/// Upper bound on any single joint's template weight.
pub const ALIGNMENT_MAX_JOINT_WEIGHT: f64 = 1.0;
/// Score returned when exactly one joint matched.
pub const ALIGNMENT_SINGLE_JOINT_SCORE: f64 = 10.0;

// Measurements

/// World body height must exceed this (meters) to calibrate or form indices.
pub const MIN_WORLD_BODY_HEIGHT_M: f64 = 0.1;

// Symmetry

pub const SYMMETRY_BALANCED_PCT: f64 = 5.0;
pub const SYMMETRY_MODERATE_PCT: f64 = 15.0;
/// Per-pair difference cap when averaging into the overall score.
pub const SYMMETRY_PAIR_CAP_PCT: f64 = 30.0;
/// Denominator guard for percentage differences (meters).
pub const SYMMETRY_MIN_DENOMINATOR: f64 = 0.001;

// Brightness / lighting

/// Brightness is sampled on a grid of this size.
pub const BRIGHTNESS_SAMPLE_WIDTH: u32 = 32;
pub const BRIGHTNESS_SAMPLE_HEIGHT: u32 = 18;
/// Luma reported when a source has no pixels.
pub const FALLBACK_LUMA: f64 = 128.0;

pub const LUMA_IDEAL_MIN: f64 = 60.0;
pub const LUMA_IDEAL_MAX: f64 = 200.0;
/// Below this luma the frame is severely underexposed.
pub const LUMA_SEVERE_DARK: f64 = 30.0;
/// Above this luma the frame is severely overexposed.
pub const LUMA_SEVERE_BRIGHT: f64 = 240.0;

/// Photo warnings fire outside this luma window.
pub const LUMA_WARN_DARK: f64 = 40.0;
pub const LUMA_WARN_BRIGHT: f64 = 230.0;

// Confidence weights

pub const CONFIDENCE_LANDMARKS_MAX: f64 = 30.0;
pub const CONFIDENCE_BRIGHTNESS_MAX: f64 = 20.0;
pub const CONFIDENCE_DISTANCE_MAX: f64 = 20.0;
pub const CONFIDENCE_LIVE_POSE_MAX: f64 = 30.0;
pub const CONFIDENCE_PHOTO_POSE_MAX: f64 = 20.0;
pub const CONFIDENCE_SEGMENTATION_MAX: f64 = 10.0;

/// Body height as a fraction of frame height earning full distance marks.
pub const DISTANCE_RATIO_MIN: f64 = 0.40;
pub const DISTANCE_RATIO_MAX: f64 = 0.90;
/// Shoulder width as a fraction of frame width (fallback distance signal).
pub const SHOULDER_RATIO_MIN: f64 = 0.15;
pub const SHOULDER_RATIO_MAX: f64 = 0.55;
pub const SHOULDER_RATIO_REFERENCE: f64 = 0.35;
pub const SHOULDER_FALLBACK_MAX: f64 = 18.0;

// Segmentation

pub const MASK_THRESHOLD: f32 = 0.5;
pub const MASK_AREA_SCORE_MAX: f64 = 60.0;
pub const MASK_COHERENCE_SCORE_MAX: f64 = 40.0;
pub const MASK_AREA_IDEAL_MIN: f64 = 0.15;
pub const MASK_AREA_IDEAL_MAX: f64 = 0.60;
pub const MASK_AREA_FLOOR: f64 = 0.05;
pub const MASK_AREA_CEILING: f64 = 0.80;
/// Rows sampled for coherence: roughly every 1/20th of the height.
pub const MASK_COHERENCE_ROW_DIVISOR: usize = 20;
/// One contiguous span per row yields at most this many transitions.
pub const MASK_MAX_ROW_TRANSITIONS: usize = 2;
/// Rows sampled on each side of a slice height.
pub const SLICE_SAMPLE_RADIUS: i64 = 3;

/// Fraction of hip→knee for the upper-thigh slice.
pub const UPPER_THIGH_FRACTION: f64 = 0.20;
/// Fraction of hip→knee for the mid-thigh slice.
pub const MID_THIGH_FRACTION: f64 = 0.55;
/// Fraction of knee→ankle for the calf slice.
pub const CALF_FRACTION: f64 = 0.55;

// Posture

/// Vertical ordering tolerance for ankle/knee/hip (pixels).
pub const STANDING_ORDER_TOLERANCE_PX: f64 = 10.0;
/// Minimum average hip-knee-ankle angle for straight legs (degrees).
pub const MIN_LEG_ANGLE_DEG: f64 = 155.0;
/// Maximum torso lean from vertical (degrees).
pub const MAX_TORSO_LEAN_DEG: f64 = 12.0;

// Check-in gates

pub const GATE_SCALE_TOLERANCE: f64 = 0.07;
pub const GATE_STANCE_TOLERANCE: f64 = 0.08;
pub const GATE_HIP_TILT_TOLERANCE_DEG: f64 = 6.0;
pub const GATE_BRIGHTNESS_TOLERANCE: f64 = 25.0;
/// Each agreeing consistency signal contributes this many points.
pub const GATE_SIGNAL_POINTS: f64 = 25.0;
pub const GATE_CONSISTENCY_PASS_SCORE: f64 = 65.0;
/// A prior check-in younger than this blocks a new one.
pub const GATE_SAME_DAY_DAYS: f64 = 1.0;
/// A prior check-in younger than this (and past the block) warns.
pub const GATE_WARNING_DAYS: f64 = 7.0;

// Classifier

pub const CLASSIFY_FULL_MIN_LIGHTING: f64 = 50.0;
pub const CLASSIFY_FULL_MIN_POSE_MATCH: f64 = 60.0;
pub const CLASSIFY_SELFIE_MIN_LIGHTING: f64 = 40.0;
pub const CLASSIFY_TIP_MIN_LIGHTING: f64 = 50.0;
pub const CLASSIFY_TIP_MIN_FRAMING: f64 = 40.0;
pub const CLASSIFY_MAX_TIPS: usize = 2;
/// Nose visibility above this implies the subject faces the camera.
pub const FACING_FRONT_NOSE_VISIBILITY: f64 = 0.4;
/// Nose visibility below this implies the subject faces away.
pub const FACING_BACK_NOSE_VISIBILITY: f64 = 0.15;

// Temporal smoothing

pub const EMA_ALPHA: f64 = 0.12;
/// ~2 seconds at 12 fps.
pub const CAPTURE_BUFFER_CAPACITY: usize = 25;
pub const MIN_MEDIAN_SAMPLES: usize = 5;

// Live readiness

pub const READY_MIN_ALIGNMENT: f64 = 80.0;
pub const READY_MIN_CONFIDENCE: f64 = 70.0;
pub const READY_HOLD_MS: i64 = 1000;
