//! Check-in validation gates.
//!
//! ## Gates
//!
//! - **A**: every required joint visible at or above the gate threshold
//! - **B**: standing upright with straight legs and a vertical torso
//! - **C**: capture conditions consistent with the prior check-in
//! - **D**: enough time elapsed since the prior check-in
//!
//! A capture passes when A, B and C pass and D does not block. D's
//! warning alone never blocks.

use physique_core::tuning::GATE_SIGNAL_POINTS;
use physique_core::{CheckinPose, FrameSize, GateConfig, Joint, PoseLandmarks, ScanRecord, Timestamp};
use physique_metrics::{check_standing, PostureLimits};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Joints that must be clearly visible in a check-in capture
const CHECKIN_JOINTS: [Joint; 9] = [
    Joint::Nose,
    Joint::LeftShoulder,
    Joint::RightShoulder,
    Joint::LeftHip,
    Joint::RightHip,
    Joint::LeftKnee,
    Joint::RightKnee,
    Joint::LeftAnkle,
    Joint::RightAnkle,
];

/// Required joints for a check-in pose
///
/// Front and back share a set; the back view still exposes the head.
pub fn required_joints(pose: CheckinPose) -> &'static [Joint] {
    match pose {
        CheckinPose::Front | CheckinPose::Back => &CHECKIN_JOINTS,
    }
}

/// Current-capture signals evaluated by the gates
#[derive(Debug, Clone)]
pub struct GateInput<'a> {
    pub landmarks: &'a PoseLandmarks,
    pub frame: FrameSize,
    pub pose: CheckinPose,
    pub body_height_px: f64,
    pub stance_width_px: Option<f64>,
    pub hip_tilt_deg: Option<f64>,
    pub avg_brightness: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointGate {
    pub passed: bool,
    pub missing_joints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingGate {
    pub passed: bool,
    /// Empty when passed
    pub reason: String,
}

/// Outcome of one consistency signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalCheck {
    Matched,
    Mismatched,
    /// One side lacks the signal; scored as agreeing
    Unavailable,
}

impl SignalCheck {
    fn compare(current: Option<f64>, prior: Option<f64>, within: impl Fn(f64, f64) -> bool) -> Self {
        match (current, prior) {
            (Some(c), Some(p)) if within(c, p) => SignalCheck::Matched,
            (Some(_), Some(_)) => SignalCheck::Mismatched,
            _ => SignalCheck::Unavailable,
        }
    }

    pub fn agrees(self) -> bool {
        self != SignalCheck::Mismatched
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyDetails {
    pub scale: SignalCheck,
    pub stance: SignalCheck,
    pub hip_tilt: SignalCheck,
    pub brightness: SignalCheck,
}

impl ConsistencyDetails {
    const UNAVAILABLE: Self = Self {
        scale: SignalCheck::Unavailable,
        stance: SignalCheck::Unavailable,
        hip_tilt: SignalCheck::Unavailable,
        brightness: SignalCheck::Unavailable,
    };

    fn signals(&self) -> [SignalCheck; 4] {
        [self.scale, self.stance, self.hip_tilt, self.brightness]
    }

    /// User-facing adjustments for each mismatched signal
    pub fn adjustments(&self) -> Vec<&'static str> {
        [
            (self.scale, "distance from camera"),
            (self.stance, "foot placement"),
            (self.hip_tilt, "hip alignment"),
            (self.brightness, "lighting"),
        ]
        .into_iter()
        .filter(|(check, _)| *check == SignalCheck::Mismatched)
        .map(|(_, label)| label)
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyGate {
    pub passed: bool,
    /// 0..=100 in steps of 25
    pub score: f64,
    pub details: ConsistencyDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeGate {
    pub warning: bool,
    pub same_day_block: bool,
    /// Whole days since the prior check-in
    pub days_since_last: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckinGateResult {
    pub joints: JointGate,
    pub standing: StandingGate,
    pub consistency: ConsistencyGate,
    pub time: TimeGate,
    pub all_passed: bool,
}

/// Evaluates the four check-in gates
#[derive(Debug, Clone, Default)]
pub struct CheckinGateValidator {
    config: GateConfig,
}

impl CheckinGateValidator {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Run every gate against the most recent prior check-in, if any
    pub fn evaluate(&self, input: &GateInput<'_>, prior: Option<&ScanRecord>, now: Timestamp) -> CheckinGateResult {
        let joints = self.check_joints(input.landmarks, input.pose);
        let standing = self.check_standing(input.landmarks, input.frame);
        let consistency = self.check_consistency(input, prior);
        let time = self.check_time(prior, now);

        let all_passed = joints.passed && standing.passed && consistency.passed && !time.same_day_block;
        if !all_passed {
            debug!(
                joints = joints.passed,
                standing = standing.passed,
                consistency = consistency.score,
                same_day = time.same_day_block,
                "check-in gates failed"
            );
        }

        CheckinGateResult {
            joints,
            standing,
            consistency,
            time,
            all_passed,
        }
    }

    /// Gate A
    pub fn check_joints(&self, landmarks: &PoseLandmarks, pose: CheckinPose) -> JointGate {
        let missing_joints: Vec<String> = required_joints(pose)
            .iter()
            .filter(|&&joint| {
                landmarks
                    .get(joint)
                    .map_or(true, |lm| lm.visibility < self.config.joint_visibility)
            })
            .map(|joint| joint.display_name().to_string())
            .collect();

        JointGate {
            passed: missing_joints.is_empty(),
            missing_joints,
        }
    }

    /// Gate B
    pub fn check_standing(&self, landmarks: &PoseLandmarks, frame: FrameSize) -> StandingGate {
        match check_standing(landmarks, frame, &PostureLimits::from(&self.config)) {
            Ok(()) => StandingGate {
                passed: true,
                reason: String::new(),
            },
            Err(fault) => StandingGate {
                passed: false,
                reason: fault.reason().to_string(),
            },
        }
    }

    /// Gate C
    ///
    /// Stance is compared as an index of body height so a small change in
    /// camera distance does not register as a different foot placement.
    pub fn check_consistency(&self, input: &GateInput<'_>, prior: Option<&ScanRecord>) -> ConsistencyGate {
        let Some(prior) = prior else {
            return ConsistencyGate {
                passed: true,
                score: 100.0,
                details: ConsistencyDetails::UNAVAILABLE,
            };
        };
        let cfg = &self.config;
        let positive = |v: Option<f64>| v.filter(|x| *x > 0.0);

        let stance_index = input
            .stance_width_px
            .filter(|_| input.body_height_px > 0.0)
            .map(|px| px / input.body_height_px);

        let details = ConsistencyDetails {
            scale: SignalCheck::compare(
                positive(Some(input.body_height_px)),
                positive(Some(prior.body_height_px)),
                |c, p| (c - p).abs() / p <= cfg.scale_tolerance,
            ),
            stance: SignalCheck::compare(
                positive(stance_index),
                positive(prior.stance_width_index),
                |c, p| (c - p).abs() / p <= cfg.stance_tolerance,
            ),
            // A prior record without tilt is unavailable, not level
            hip_tilt: SignalCheck::compare(input.hip_tilt_deg, prior.hip_tilt_deg, |c, p| {
                (c - p).abs() <= cfg.hip_tilt_tolerance_deg
            }),
            brightness: SignalCheck::compare(
                positive(input.avg_brightness),
                positive(prior.avg_brightness),
                |c, p| (c - p).abs() <= cfg.brightness_tolerance,
            ),
        };

        let agreeing = details.signals().iter().filter(|s| s.agrees()).count();
        let score = agreeing as f64 * GATE_SIGNAL_POINTS;

        ConsistencyGate {
            passed: score >= cfg.consistency_pass_score,
            score,
            details,
        }
    }

    /// Gate D
    pub fn check_time(&self, prior: Option<&ScanRecord>, now: Timestamp) -> TimeGate {
        let Some(prior) = prior else {
            return TimeGate {
                warning: false,
                same_day_block: false,
                days_since_last: None,
            };
        };
        let days = now.days_since(prior.timestamp);
        TimeGate {
            warning: days >= self.config.same_day_days && days < self.config.warning_days,
            same_day_block: days < self.config.same_day_days,
            days_since_last: Some(days.floor() as i64),
        }
    }
}
