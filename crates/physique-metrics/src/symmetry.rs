//! Left/right symmetry over world landmarks.
//!
//! ## Per-pair differences
//!
//! - height: |yL - yR| / mean(|yL|, |yR|) x 100
//! - lateral: ||xL| - |xR|| / mean(|xL|, |xR|) x 100
//!
//! World landmarks are hip-centered, so |x| is the distance from the midline.

use physique_core::tuning::*;
use physique_core::{clamp_score, round_to, Joint, WorldPose};
use serde::{Deserialize, Serialize};

/// Joint pairs compared for symmetry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyPair {
    Shoulder,
    Elbow,
    Hip,
    Knee,
}

impl BodyPair {
    pub const ALL: [BodyPair; 4] = [BodyPair::Shoulder, BodyPair::Elbow, BodyPair::Hip, BodyPair::Knee];

    pub fn joints(self) -> (Joint, Joint) {
        match self {
            BodyPair::Shoulder => (Joint::LeftShoulder, Joint::RightShoulder),
            BodyPair::Elbow => (Joint::LeftElbow, Joint::RightElbow),
            BodyPair::Hip => (Joint::LeftHip, Joint::RightHip),
            BodyPair::Knee => (Joint::LeftKnee, Joint::RightKnee),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BodyPair::Shoulder => "shoulder",
            BodyPair::Elbow => "elbow",
            BodyPair::Hip => "hip",
            BodyPair::Knee => "knee",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymmetryStatus {
    Balanced,
    Moderate,
    Imbalanced,
}

impl SymmetryStatus {
    pub fn from_diff_pct(pct: f64) -> Self {
        if pct < SYMMETRY_BALANCED_PCT {
            SymmetryStatus::Balanced
        } else if pct < SYMMETRY_MODERATE_PCT {
            SymmetryStatus::Moderate
        } else {
            SymmetryStatus::Imbalanced
        }
    }
}

/// Percentages are rounded to 0.1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymmetryPair {
    pub pair: BodyPair,
    pub height_diff_pct: f64,
    pub distance_diff_pct: f64,
    pub overall_diff_pct: f64,
    pub status: SymmetryStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymmetryData {
    pub pairs: Vec<SymmetryPair>,
    /// Integer score in 0..=100
    pub overall_score: f64,
}

/// Compare left/right pairs; `None` when no pair is visible on both sides
pub fn compute_symmetry(world: &WorldPose) -> Option<SymmetryData> {
    if !world.is_complete() {
        return None;
    }

    let pairs: Vec<SymmetryPair> = BodyPair::ALL
        .iter()
        .filter_map(|&pair| {
            let (lj, rj) = pair.joints();
            let left = world.visible(lj)?;
            let right = world.visible(rj)?;

            let height = pct_diff(left.y - right.y, left.y.abs(), right.y.abs());
            let (ld, rd) = (left.x.abs(), right.x.abs());
            let distance = pct_diff(ld - rd, ld, rd);
            let overall = height.max(distance);

            Some(SymmetryPair {
                pair,
                height_diff_pct: round_to(height, 1),
                distance_diff_pct: round_to(distance, 1),
                overall_diff_pct: round_to(overall, 1),
                status: SymmetryStatus::from_diff_pct(overall),
            })
        })
        .collect();

    if pairs.is_empty() {
        return None;
    }

    let mean_diff = pairs
        .iter()
        .map(|p| p.overall_diff_pct.min(SYMMETRY_PAIR_CAP_PCT))
        .sum::<f64>()
        / pairs.len() as f64;

    Some(SymmetryData {
        pairs,
        overall_score: clamp_score((100.0 - mean_diff).round()),
    })
}

fn pct_diff(diff: f64, a: f64, b: f64) -> f64 {
    let mean = (a + b) / 2.0;
    if mean > SYMMETRY_MIN_DENOMINATOR {
        diff.abs() / mean * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::mirrored_world;
    use physique_core::WorldLandmark;

    #[test]
    fn test_mirrored_pose_is_balanced() {
        let data = compute_symmetry(&mirrored_world()).unwrap();
        assert_eq!(data.pairs.len(), 4);
        assert_eq!(data.overall_score, 100.0);
        assert!(data.pairs.iter().all(|p| p.status == SymmetryStatus::Balanced));
    }

    #[test]
    fn test_raised_shoulder() {
        let mut world = mirrored_world();
        // 10% higher on the left
        world.set(Joint::LeftShoulder, WorldLandmark::new(-0.2, -0.55, 0.0, 0.9));
        let data = compute_symmetry(&world).unwrap();
        let shoulder = data.pairs.iter().find(|p| p.pair == BodyPair::Shoulder).unwrap();
        assert!((shoulder.height_diff_pct - 9.5).abs() < 1e-9);
        assert_eq!(shoulder.status, SymmetryStatus::Moderate);
        // (100 - 9.5 / 4) rounded
        assert_eq!(data.overall_score, 98.0);
    }

    #[test]
    fn test_pair_difference_is_capped() {
        let mut world = mirrored_world();
        world.set(Joint::LeftKnee, WorldLandmark::new(-0.5, 0.45, 0.0, 0.9));
        let data = compute_symmetry(&world).unwrap();
        let knee = data.pairs.iter().find(|p| p.pair == BodyPair::Knee).unwrap();
        assert_eq!(knee.status, SymmetryStatus::Imbalanced);
        assert!(knee.overall_diff_pct > 30.0);
        // Cap limits the knee's contribution to 30 / 4
        assert_eq!(data.overall_score, 93.0);
    }

    #[test]
    fn test_hidden_pairs_are_skipped() {
        let mut world = mirrored_world();
        for joint in [Joint::LeftElbow, Joint::LeftHip, Joint::LeftKnee] {
            world.set(joint, WorldLandmark::new(0.0, 0.0, 0.0, 0.2));
        }
        let data = compute_symmetry(&world).unwrap();
        assert_eq!(data.pairs.len(), 1);

        world.set(Joint::LeftShoulder, WorldLandmark::default());
        assert!(compute_symmetry(&world).is_none());
    }

    #[test]
    fn test_truncated_world() {
        assert!(compute_symmetry(&WorldPose::new(vec![WorldLandmark::default(); 12])).is_none());
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(SymmetryStatus::from_diff_pct(4.99), SymmetryStatus::Balanced);
        assert_eq!(SymmetryStatus::from_diff_pct(5.0), SymmetryStatus::Moderate);
        assert_eq!(SymmetryStatus::from_diff_pct(15.0), SymmetryStatus::Imbalanced);
    }
}
