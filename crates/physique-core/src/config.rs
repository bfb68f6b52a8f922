//! Runtime-tunable analysis configuration.
//!
//! Defaults come from [`crate::tuning`]. Hosts may override any field from a
//! config file or from `PHYSIQUE_*` environment variables, e.g.
//! `PHYSIQUE_SMOOTHING__EMA_ALPHA=0.2`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tuning::*;

/// Complete analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Template alignment scoring
    pub alignment: AlignmentConfig,

    /// Temporal smoothing of live metrics
    pub smoothing: SmoothingConfig,

    /// Live readiness detection
    pub readiness: ReadinessConfig,

    /// Check-in gate tolerances
    pub gates: GateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Error-to-score slope
    pub k: f64,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self { k: ALIGNMENT_K }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// EMA weight of the newest sample
    pub ema_alpha: f64,

    /// Capture buffer capacity (samples)
    pub buffer_capacity: usize,

    /// Samples needed before the median is preferred over the EMA
    pub min_median_samples: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            ema_alpha: EMA_ALPHA,
            buffer_capacity: CAPTURE_BUFFER_CAPACITY,
            min_median_samples: MIN_MEDIAN_SAMPLES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    pub min_alignment: f64,
    pub min_confidence: f64,

    /// How long both thresholds must hold (milliseconds)
    pub hold_ms: i64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            min_alignment: READY_MIN_ALIGNMENT,
            min_confidence: READY_MIN_CONFIDENCE,
            hold_ms: READY_HOLD_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Minimum visibility for required check-in joints
    pub joint_visibility: f64,

    /// Minimum average hip-knee-ankle angle (degrees)
    pub min_leg_angle_deg: f64,

    /// Maximum torso lean from vertical (degrees)
    pub max_torso_lean_deg: f64,

    /// Relative body-height tolerance against the prior capture
    pub scale_tolerance: f64,

    /// Relative stance-index tolerance
    pub stance_tolerance: f64,

    /// Absolute hip-tilt tolerance (degrees)
    pub hip_tilt_tolerance_deg: f64,

    /// Absolute average-luma tolerance
    pub brightness_tolerance: f64,

    /// Consistency score needed to pass
    pub consistency_pass_score: f64,

    /// Prior check-ins younger than this block (days)
    pub same_day_days: f64,

    /// Prior check-ins younger than this warn (days)
    pub warning_days: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            joint_visibility: GATE_JOINT_VISIBILITY,
            min_leg_angle_deg: MIN_LEG_ANGLE_DEG,
            max_torso_lean_deg: MAX_TORSO_LEAN_DEG,
            scale_tolerance: GATE_SCALE_TOLERANCE,
            stance_tolerance: GATE_STANCE_TOLERANCE,
            hip_tilt_tolerance_deg: GATE_HIP_TILT_TOLERANCE_DEG,
            brightness_tolerance: GATE_BRIGHTNESS_TOLERANCE,
            consistency_pass_score: GATE_CONSISTENCY_PASS_SCORE,
            same_day_days: GATE_SAME_DAY_DAYS,
            warning_days: GATE_WARNING_DAYS,
        }
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix("PHYSIQUE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl AnalysisConfig {
    /// Load configuration from file, with environment overrides
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(env_source())
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(env_source())
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.alignment.k > 0.0) {
            return Err(Error::Config(format!(
                "alignment.k must be positive, got {}",
                self.alignment.k
            )));
        }
        if !(self.smoothing.ema_alpha > 0.0 && self.smoothing.ema_alpha <= 1.0) {
            return Err(Error::Config(format!(
                "smoothing.ema_alpha must be in (0, 1], got {}",
                self.smoothing.ema_alpha
            )));
        }
        if self.smoothing.buffer_capacity == 0 {
            return Err(Error::Config("smoothing.buffer_capacity must be non-zero".into()));
        }
        if self.readiness.hold_ms < 0 {
            return Err(Error::Config("readiness.hold_ms must be non-negative".into()));
        }
        if self.gates.warning_days < self.gates.same_day_days {
            return Err(Error::Config(
                "gates.warning_days must not be shorter than gates.same_day_days".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.alignment.k, 120.0);
        assert_eq!(config.smoothing.buffer_capacity, 25);
        assert_eq!(config.readiness.hold_ms, 1000);
        assert_eq!(config.gates.consistency_pass_score, 65.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let cfg: AnalysisConfig =
            serde_json::from_str(r#"{"smoothing":{"ema_alpha":0.3}}"#).unwrap();
        assert_eq!(cfg.smoothing.ema_alpha, 0.3);
        assert_eq!(cfg.smoothing.min_median_samples, 5);
        assert_eq!(cfg.gates, GateConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_alpha() {
        let mut cfg = AnalysisConfig::default();
        cfg.smoothing.ema_alpha = 0.0;
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
        cfg.smoothing.ema_alpha = 1.5;
        assert!(cfg.validate().is_err());
    }
}
