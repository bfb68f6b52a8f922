//! Pose template catalog.
//!
//! Targets are body-normalized: origin at the hip midpoint, unit equal to the
//! estimated body height, Y negative above the hips. X is negative toward the
//! image's left edge.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use physique_core::{CheckinPose, Error, Joint, NormalizedPoint, Result};
use serde::{Deserialize, Serialize};

/// Target joint layout for one pose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PoseTemplateDef")]
pub struct PoseTemplate {
    pub id: String,
    pub name: String,
    required: Vec<Joint>,
    weights: BTreeMap<Joint, f64>,
    targets: BTreeMap<Joint, NormalizedPoint>,
}

/// Unvalidated wire form, checked through [`PoseTemplate::new`]
#[derive(Deserialize)]
struct PoseTemplateDef {
    id: String,
    name: String,
    required: Vec<Joint>,
    weights: BTreeMap<Joint, f64>,
    targets: BTreeMap<Joint, NormalizedPoint>,
}

impl TryFrom<PoseTemplateDef> for PoseTemplate {
    type Error = Error;

    fn try_from(def: PoseTemplateDef) -> Result<Self> {
        PoseTemplate::new(def.id, def.name, def.required, def.weights, def.targets)
    }
}

impl PoseTemplate {
    /// Build a template
    ///
    /// Every weight must be finite and positive, and every required joint
    /// needs both a weight and a target.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        required: Vec<Joint>,
        weights: BTreeMap<Joint, f64>,
        targets: BTreeMap<Joint, NormalizedPoint>,
    ) -> Result<Self> {
        let id = id.into();
        if let Some((joint, _)) = weights.iter().find(|(_, w)| !(w.is_finite() && **w > 0.0)) {
            return Err(Error::InvalidTemplate {
                id,
                joint: joint.display_name().to_string(),
                missing: "positive finite weight",
            });
        }
        for joint in &required {
            let missing = if !weights.contains_key(joint) {
                Some("weight")
            } else if !targets.contains_key(joint) {
                Some("target position")
            } else {
                None
            };
            if let Some(missing) = missing {
                return Err(Error::InvalidTemplate {
                    id,
                    joint: joint.display_name().to_string(),
                    missing,
                });
            }
        }
        Ok(Self {
            id,
            name: name.into(),
            required,
            weights,
            targets,
        })
    }

    pub fn required(&self) -> &[Joint] {
        &self.required
    }

    pub fn weight(&self, joint: Joint) -> Option<f64> {
        self.weights.get(&joint).copied()
    }

    pub fn target(&self, joint: Joint) -> Option<NormalizedPoint> {
        self.targets.get(&joint).copied()
    }

    /// Which check-in pose this template captures, if any
    pub fn checkin_pose(&self) -> Option<CheckinPose> {
        match self.id.as_str() {
            FRONT_CHECKIN => Some(CheckinPose::Front),
            BACK_CHECKIN => Some(CheckinPose::Back),
            _ => None,
        }
    }

    pub fn is_checkin(&self) -> bool {
        self.checkin_pose().is_some()
    }
}

pub const FRONT_CHECKIN: &str = "front-checkin";
pub const BACK_CHECKIN: &str = "back-checkin";

const DEFAULT_WEIGHTS: [(Joint, f64); 13] = [
    (Joint::Nose, 0.5),
    (Joint::LeftShoulder, 1.0),
    (Joint::RightShoulder, 1.0),
    (Joint::LeftElbow, 1.2),
    (Joint::RightElbow, 1.2),
    (Joint::LeftWrist, 1.0),
    (Joint::RightWrist, 1.0),
    (Joint::LeftHip, 0.8),
    (Joint::RightHip, 0.8),
    (Joint::LeftKnee, 0.5),
    (Joint::RightKnee, 0.5),
    (Joint::LeftAnkle, 0.3),
    (Joint::RightAnkle, 0.3),
];

type Layout = [(Joint, f64, f64); 13];

const FRONT_BICEPS: Layout = [
    (Joint::Nose, 0.0, -0.47),
    (Joint::LeftShoulder, -0.13, -0.33),
    (Joint::RightShoulder, 0.13, -0.33),
    (Joint::LeftElbow, -0.25, -0.33),
    (Joint::RightElbow, 0.25, -0.33),
    (Joint::LeftWrist, -0.22, -0.46),
    (Joint::RightWrist, 0.22, -0.46),
    (Joint::LeftHip, -0.08, 0.0),
    (Joint::RightHip, 0.08, 0.0),
    (Joint::LeftKnee, -0.09, 0.22),
    (Joint::RightKnee, 0.09, 0.22),
    (Joint::LeftAnkle, -0.09, 0.45),
    (Joint::RightAnkle, 0.09, 0.45),
];

const BACK_LATS: Layout = [
    (Joint::Nose, 0.0, -0.47),
    (Joint::LeftShoulder, -0.15, -0.33),
    (Joint::RightShoulder, 0.15, -0.33),
    (Joint::LeftElbow, -0.26, -0.22),
    (Joint::RightElbow, 0.26, -0.22),
    (Joint::LeftWrist, -0.20, -0.10),
    (Joint::RightWrist, 0.20, -0.10),
    (Joint::LeftHip, -0.08, 0.0),
    (Joint::RightHip, 0.08, 0.0),
    (Joint::LeftKnee, -0.09, 0.22),
    (Joint::RightKnee, 0.09, 0.22),
    (Joint::LeftAnkle, -0.10, 0.45),
    (Joint::RightAnkle, 0.10, 0.45),
];

const SIDE_GLUTE: Layout = [
    (Joint::Nose, 0.02, -0.47),
    (Joint::LeftShoulder, -0.04, -0.33),
    (Joint::RightShoulder, 0.06, -0.34),
    (Joint::LeftElbow, -0.06, -0.18),
    (Joint::RightElbow, 0.10, -0.20),
    (Joint::LeftWrist, -0.02, -0.08),
    (Joint::RightWrist, 0.06, -0.06),
    (Joint::LeftHip, -0.03, 0.0),
    (Joint::RightHip, 0.05, 0.0),
    (Joint::LeftKnee, -0.04, 0.22),
    (Joint::RightKnee, 0.06, 0.22),
    (Joint::LeftAnkle, -0.04, 0.45),
    (Joint::RightAnkle, 0.06, 0.45),
];

const BACK_GLUTE: Layout = [
    (Joint::Nose, 0.0, -0.47),
    (Joint::LeftShoulder, -0.13, -0.33),
    (Joint::RightShoulder, 0.13, -0.33),
    (Joint::LeftElbow, -0.18, -0.18),
    (Joint::RightElbow, 0.18, -0.18),
    (Joint::LeftWrist, -0.10, -0.05),
    (Joint::RightWrist, 0.10, -0.05),
    (Joint::LeftHip, -0.09, 0.0),
    (Joint::RightHip, 0.09, 0.0),
    (Joint::LeftKnee, -0.10, 0.22),
    (Joint::RightKnee, 0.10, 0.22),
    (Joint::LeftAnkle, -0.12, 0.45),
    (Joint::RightAnkle, 0.08, 0.45),
];

/// Relaxed standing, arms by the sides
const NEUTRAL_STANDING: Layout = [
    (Joint::Nose, 0.0, -0.47),
    (Joint::LeftShoulder, -0.13, -0.33),
    (Joint::RightShoulder, 0.13, -0.33),
    (Joint::LeftElbow, -0.15, -0.17),
    (Joint::RightElbow, 0.15, -0.17),
    (Joint::LeftWrist, -0.14, 0.0),
    (Joint::RightWrist, 0.14, 0.0),
    (Joint::LeftHip, -0.08, 0.0),
    (Joint::RightHip, 0.08, 0.0),
    (Joint::LeftKnee, -0.09, 0.22),
    (Joint::RightKnee, 0.09, 0.22),
    (Joint::LeftAnkle, -0.09, 0.45),
    (Joint::RightAnkle, 0.09, 0.45),
];

fn build(id: &str, name: &str, layout: &Layout, overrides: &[(Joint, f64)]) -> PoseTemplate {
    let mut weights: BTreeMap<Joint, f64> = DEFAULT_WEIGHTS.into_iter().collect();
    weights.extend(overrides.iter().copied());
    let targets = layout
        .iter()
        .map(|&(joint, x, y)| (joint, NormalizedPoint::new(x, y)))
        .collect();
    PoseTemplate {
        id: id.to_string(),
        name: name.to_string(),
        required: Joint::TRACKED.to_vec(),
        weights,
        targets,
    }
}

/// Built-in pose catalog
pub fn builtin_templates() -> &'static [PoseTemplate] {
    static CATALOG: OnceLock<Vec<PoseTemplate>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        vec![
            build(
                "front-biceps",
                "Front Biceps",
                &FRONT_BICEPS,
                &[
                    (Joint::LeftElbow, 1.5),
                    (Joint::RightElbow, 1.5),
                    (Joint::LeftWrist, 1.3),
                    (Joint::RightWrist, 1.3),
                ],
            ),
            build(
                "back-lats",
                "Back Lats",
                &BACK_LATS,
                &[(Joint::LeftShoulder, 1.5), (Joint::RightShoulder, 1.5)],
            ),
            build(
                "side-glute",
                "Side Glute",
                &SIDE_GLUTE,
                &[
                    (Joint::LeftHip, 1.3),
                    (Joint::RightHip, 1.3),
                    (Joint::LeftKnee, 0.8),
                    (Joint::RightKnee, 0.8),
                ],
            ),
            build(
                "back-glute",
                "Back Glute",
                &BACK_GLUTE,
                &[
                    (Joint::LeftHip, 1.4),
                    (Joint::RightHip, 1.4),
                    (Joint::LeftKnee, 0.9),
                    (Joint::RightKnee, 0.9),
                ],
            ),
            build(FRONT_CHECKIN, "Front Check-in", &NEUTRAL_STANDING, &[]),
            build(BACK_CHECKIN, "Back Check-in", &NEUTRAL_STANDING, &[]),
        ]
    })
}

pub fn template_by_id(id: &str) -> Result<&'static PoseTemplate> {
    builtin_templates()
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| Error::UnknownTemplate(id.to_string()))
}
