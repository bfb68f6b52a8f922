//! Temporal smoothing for live capture metrics.
//!
//! All state lives in [`SmoothingState`], a plain value owned by one capture
//! session. Callers thread it through each frame and discard it on reset.

use std::collections::VecDeque;

use physique_core::{calibration_factor, upper_median, SmoothingConfig, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// One exponential smoothing step: `prev * (1 - alpha) + curr * alpha`
pub fn ema(prev: f64, curr: f64, alpha: f64) -> f64 {
    prev * (1.0 - alpha) + curr * alpha
}

/// Exponential moving average (EMA) filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExponentialFilter {
    alpha: f64,
    state: Option<f64>,
}

impl ExponentialFilter {
    /// Create new EMA filter
    ///
    /// # Arguments
    /// * `alpha` - Smoothing factor (0-1). Higher = less smoothing
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            state: None,
        }
    }

    /// Start from a known value instead of the first sample
    pub fn seeded(alpha: f64, initial: f64) -> Self {
        Self {
            state: Some(initial),
            ..Self::new(alpha)
        }
    }

    pub fn filter(&mut self, x: f64) -> f64 {
        let y = match self.state {
            Some(prev) => ema(prev, x, self.alpha),
            None => x,
        };
        self.state = Some(y);
        y
    }

    pub fn value(&self) -> Option<f64> {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = None;
    }
}

/// Post-EMA measurement tuple held in the capture buffer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasurementSample {
    pub shoulder_index: f64,
    pub hip_index: f64,
    pub v_taper_index: f64,
    pub shoulder_width_m: f64,
    pub hip_width_m: f64,
    pub body_height_m: f64,
}

impl MeasurementSample {
    fn fields(&self) -> [f64; 6] {
        [
            self.shoulder_index,
            self.hip_index,
            self.v_taper_index,
            self.shoulder_width_m,
            self.hip_width_m,
            self.body_height_m,
        ]
    }

    fn from_fields(f: [f64; 6]) -> Self {
        Self {
            shoulder_index: f[0],
            hip_index: f[1],
            v_taper_index: f[2],
            shoulder_width_m: f[3],
            hip_width_m: f[4],
            body_height_m: f[5],
        }
    }

    fn blend(&self, curr: &Self, alpha: f64) -> Self {
        let (p, c) = (self.fields(), curr.fields());
        Self::from_fields(std::array::from_fn(|i| ema(p[i], c[i], alpha)))
    }
}

/// Fixed-capacity rolling buffer of measurement samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureBuffer {
    capacity: usize,
    samples: VecDeque<MeasurementSample>,
}

impl CaptureBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            samples: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    /// Append, evicting the oldest sample when full
    pub fn push(&mut self, sample: MeasurementSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Per-field upper median
    pub fn median(&self) -> Option<MeasurementSample> {
        if self.samples.is_empty() {
            return None;
        }
        let columns: [Vec<f64>; 6] =
            std::array::from_fn(|i| self.samples.iter().map(|s| s.fields()[i]).collect());
        let mut out = [0.0; 6];
        for (slot, column) in out.iter_mut().zip(columns.iter()) {
            *slot = upper_median(column)?;
        }
        Some(MeasurementSample::from_fields(out))
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Measurements captured at commit time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommittedMeasurements {
    pub sample: MeasurementSample,
    /// True when the buffer median was used rather than the live EMA
    pub from_median: bool,
    pub calibration_factor: Option<f64>,
    /// Calibrated widths; 0 when uncalibrated
    pub shoulder_width_cm: f64,
    pub hip_width_cm: f64,
    pub body_height_cm: f64,
}

/// Per-session smoothing accumulators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothingState {
    config: SmoothingConfig,
    alignment: ExponentialFilter,
    confidence: ExponentialFilter,
    measurements: Option<MeasurementSample>,
    buffer: CaptureBuffer,
    ready_since: Option<Timestamp>,
}

impl SmoothingState {
    pub fn new(config: SmoothingConfig) -> Self {
        Self {
            alignment: ExponentialFilter::new(config.ema_alpha),
            confidence: ExponentialFilter::new(config.ema_alpha),
            measurements: None,
            buffer: CaptureBuffer::new(config.buffer_capacity),
            ready_since: None,
            config,
        }
    }

    pub fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    pub fn update_alignment(&mut self, score: f64) -> f64 {
        self.alignment.filter(score)
    }

    pub fn update_confidence(&mut self, score: f64) -> f64 {
        self.confidence.filter(score)
    }

    pub fn alignment(&self) -> Option<f64> {
        self.alignment.value()
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence.value()
    }

    /// Blend a raw sample into the EMA chain and buffer the smoothed result
    pub fn update_measurements(&mut self, raw: MeasurementSample) -> MeasurementSample {
        let smoothed = match &self.measurements {
            Some(prev) => prev.blend(&raw, self.config.ema_alpha),
            None => raw,
        };
        self.measurements = Some(smoothed);
        self.buffer.push(smoothed);
        smoothed
    }

    pub fn measurements(&self) -> Option<MeasurementSample> {
        self.measurements
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Track how long the readiness condition has held
    ///
    /// Returns true once `condition` has been continuously true for at least
    /// `hold_ms`. Any false frame restarts the hold.
    pub fn track_readiness(&mut self, condition: bool, now: Timestamp, hold_ms: i64) -> bool {
        if !condition {
            self.ready_since = None;
            return false;
        }
        let since = *self.ready_since.get_or_insert(now);
        now.as_millis() - since.as_millis() >= hold_ms
    }

    /// Final measurement values for a capture
    ///
    /// Uses the per-field buffer median when enough samples are buffered,
    /// otherwise the current EMA values. Centimeters are derived from the
    /// committed meter values.
    pub fn commit(&self, user_height_cm: Option<f64>) -> Option<CommittedMeasurements> {
        let (sample, from_median) = if self.buffer.len() >= self.config.min_median_samples {
            (self.buffer.median()?, true)
        } else {
            (self.measurements?, false)
        };
        trace!(from_median, buffered = self.buffer.len(), "committing measurements");

        let factor = calibration_factor(user_height_cm, sample.body_height_m);
        let to_cm = |m: f64| factor.map_or(0.0, |f| m * f * 100.0);

        Some(CommittedMeasurements {
            sample,
            from_median,
            calibration_factor: factor,
            shoulder_width_cm: to_cm(sample.shoulder_width_m),
            hip_width_cm: to_cm(sample.hip_width_m),
            body_height_cm: to_cm(sample.body_height_m),
        })
    }

    /// Drop every accumulator, keeping the configuration
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }
}

impl Default for SmoothingState {
    fn default() -> Self {
        Self::new(SmoothingConfig::default())
    }
}
