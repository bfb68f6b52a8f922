//! Reference grade bands for physique indices.

use serde::Serialize;

/// Half-open band `[min, max)` with its label
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Grade {
    pub min: f64,
    pub max: f64,
    pub label: &'static str,
}

impl Grade {
    const fn new(min: f64, max: f64, label: &'static str) -> Self {
        Self { min, max, label }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }
}

/// Shoulder width over hip width
pub const V_TAPER_GRADES: [Grade; 5] = [
    Grade::new(0.0, 1.2, "Developing"),
    Grade::new(1.2, 1.4, "Average"),
    Grade::new(1.4, 1.6, "Good"),
    Grade::new(1.6, 1.8, "Great"),
    Grade::new(1.8, 9.0, "Elite"),
];

/// Shoulder width over body height
pub const SHOULDER_RATIO_GRADES: [Grade; 5] = [
    Grade::new(0.0, 0.24, "Narrow"),
    Grade::new(0.24, 0.27, "Average"),
    Grade::new(0.27, 0.30, "Broad"),
    Grade::new(0.30, 0.34, "Wide"),
    Grade::new(0.34, 9.0, "Elite"),
];

/// Overall symmetry score
pub const SYMMETRY_GRADES: [Grade; 3] = [
    Grade::new(90.0, 101.0, "Balanced"),
    Grade::new(75.0, 90.0, "Moderate"),
    Grade::new(0.0, 75.0, "Imbalanced"),
];

/// Band containing `value`, or the table's first band when none does
///
/// `None` only for an empty table.
pub fn grade(value: f64, table: &[Grade]) -> Option<Grade> {
    table
        .iter()
        .find(|g| g.contains(value))
        .or_else(|| table.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(value: f64, table: &[Grade]) -> &'static str {
        grade(value, table).unwrap().label
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(label(1.19, &V_TAPER_GRADES), "Developing");
        assert_eq!(label(1.2, &V_TAPER_GRADES), "Average");
        assert_eq!(label(1.75, &V_TAPER_GRADES), "Great");
        assert_eq!(label(0.35, &SHOULDER_RATIO_GRADES), "Elite");
        assert_eq!(label(100.0, &SYMMETRY_GRADES), "Balanced");
        assert_eq!(label(74.9, &SYMMETRY_GRADES), "Imbalanced");
    }

    #[test]
    fn test_out_of_range_falls_back_to_first_band() {
        assert_eq!(label(12.0, &V_TAPER_GRADES), "Developing");
        assert_eq!(label(-1.0, &SYMMETRY_GRADES), "Balanced");
        assert_eq!(label(f64::NAN, &SHOULDER_RATIO_GRADES), "Narrow");
    }

    #[test]
    fn test_empty_table_has_no_grade() {
        assert_eq!(grade(1.5, &[]), None);
    }
}
