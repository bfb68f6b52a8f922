//! Progress across stored scans of one pose.

use chrono::{DateTime, Utc};
use physique_core::ScanRecord;
use physique_metrics::{grade, Grade, SYMMETRY_GRADES, V_TAPER_GRADES};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub scan_count: usize,
    /// Whole days between the earliest and latest scan
    pub days: i64,
    /// At least one
    pub weeks: i64,
    pub v_taper_change_pct: f64,
    pub v_taper_grade_before: Option<&'static str>,
    pub v_taper_grade_after: Option<&'static str>,
    pub symmetry_grade: Option<&'static str>,
    /// Present when both ends carry a symmetry score
    pub symmetry_delta: Option<f64>,
    /// Present when both ends are calibrated
    pub shoulder_delta_cm: Option<f64>,
}

impl ProgressSummary {
    pub fn grade_changed(&self) -> bool {
        self.v_taper_grade_before != self.v_taper_grade_after
    }
}

/// Summarize scans ordered newest first; `None` with fewer than two
pub fn summarize_progress(scans: &[ScanRecord]) -> Option<ProgressSummary> {
    let [latest, .., earliest] = scans else {
        return None;
    };

    let days = match (latest.timestamp.to_datetime(), earliest.timestamp.to_datetime()) {
        (Some(a), Some(b)) => whole_days(a, b),
        _ => 0,
    };
    let weeks = ((days as f64 / 7.0).round() as i64).max(1);

    let v_taper_change_pct = if earliest.v_taper_index > 0.0 {
        (latest.v_taper_index - earliest.v_taper_index) / earliest.v_taper_index * 100.0
    } else {
        0.0
    };

    let positive = |v: Option<f64>| v.filter(|x| *x > 0.0);
    let latest_symmetry = positive(latest.symmetry_score);
    let symmetry_delta = latest_symmetry
        .zip(positive(earliest.symmetry_score))
        .map(|(a, b)| a - b);

    let shoulder_delta_cm = (latest.shoulder_width_cm > 0.0 && earliest.shoulder_width_cm > 0.0)
        .then(|| latest.shoulder_width_cm - earliest.shoulder_width_cm);

    Some(ProgressSummary {
        scan_count: scans.len(),
        days,
        weeks,
        v_taper_change_pct,
        v_taper_grade_before: label(earliest.v_taper_index, &V_TAPER_GRADES),
        v_taper_grade_after: label(latest.v_taper_index, &V_TAPER_GRADES),
        symmetry_grade: latest_symmetry.and_then(|s| label(s, &SYMMETRY_GRADES)),
        symmetry_delta,
        shoulder_delta_cm,
    })
}

fn label(value: f64, table: &[Grade]) -> Option<&'static str> {
    grade(value, table).map(|g| g.label)
}

fn whole_days(later: DateTime<Utc>, earlier: DateTime<Utc>) -> i64 {
    let hours = (later - earlier).num_hours() as f64;
    (hours / 24.0).round() as i64
}
