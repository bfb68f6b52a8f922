//! Person-mask processing: binarization, quality scoring and slice widths.

use ndarray::{Array2, ArrayView1};
use physique_core::tuning::*;
use physique_core::{upper_median, Error, FrameSize, Joint, PoseLandmarks, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-pixel person confidence (0..1), stored as `height x width`
#[derive(Debug, Clone, PartialEq)]
pub struct MaskData {
    data: Array2<f32>,
}

impl MaskData {
    /// Wrap a row-major confidence buffer
    pub fn new(values: Vec<f32>, width: usize, height: usize) -> Result<Self> {
        let expected = width * height;
        if values.len() != expected {
            return Err(Error::MaskShape {
                expected,
                actual: values.len(),
            });
        }
        let data = Array2::from_shape_vec((height, width), values)
            .map_err(|e| Error::InvalidInput(e.to_string()))?;
        Ok(Self { data })
    }

    pub fn from_array(data: Array2<f32>) -> Self {
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pixels at or above `threshold` become 1
    pub fn binarize(&self, threshold: f32) -> BinaryMask {
        BinaryMask {
            data: self.data.mapv(|v| u8::from(v >= threshold)),
        }
    }

    /// Mask quality (0..100) after binarizing at the default threshold
    pub fn quality_score(&self) -> f64 {
        self.binarize(MASK_THRESHOLD).quality_score()
    }
}

/// Binary person mask (1 = person)
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMask {
    data: Array2<u8>,
}

/// Silhouette width measured at one image row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliceWidth {
    /// Median total width across the sampled rows
    pub total_px: f64,
    /// Center to left edge
    pub left_px: f64,
    /// Center to right edge
    pub right_px: f64,
    pub center_x: f64,
}

impl BinaryMask {
    pub fn new(data: Array2<u8>) -> Self {
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn filled_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == 1).count()
    }

    /// Area term (0..60) plus row-coherence term (0..40), rounded
    pub fn quality_score(&self) -> f64 {
        let total = self.data.len();
        if total == 0 {
            return 0.0;
        }

        let area_ratio = self.filled_count() as f64 / total as f64;
        let area_score = if (MASK_AREA_IDEAL_MIN..=MASK_AREA_IDEAL_MAX).contains(&area_ratio) {
            MASK_AREA_SCORE_MAX
        } else if area_ratio < MASK_AREA_FLOOR {
            0.0
        } else if area_ratio < MASK_AREA_IDEAL_MIN {
            (area_ratio - MASK_AREA_FLOOR) / (MASK_AREA_IDEAL_MIN - MASK_AREA_FLOOR)
                * MASK_AREA_SCORE_MAX
        } else {
            let over = (area_ratio - MASK_AREA_IDEAL_MAX) / (MASK_AREA_CEILING - MASK_AREA_IDEAL_MAX);
            (MASK_AREA_SCORE_MAX - over * MASK_AREA_SCORE_MAX).max(0.0)
        };

        let step = (self.height() / MASK_COHERENCE_ROW_DIVISOR).max(1);
        let mut sampled = 0usize;
        let mut coherent = 0usize;
        for row in self.data.rows().into_iter().step_by(step) {
            sampled += 1;
            if row_transitions(row) <= MASK_MAX_ROW_TRANSITIONS {
                coherent += 1;
            }
        }
        let coherence_score = if sampled > 0 {
            coherent as f64 / sampled as f64 * MASK_COHERENCE_SCORE_MAX
        } else {
            0.0
        };

        (area_score + coherence_score).min(100.0).round()
    }

    /// Leftmost and rightmost person pixel in a row
    pub fn row_edges(&self, row: usize) -> Option<(usize, usize)> {
        if row >= self.height() {
            return None;
        }
        let r = self.data.row(row);
        let left = r.iter().position(|&v| v == 1)?;
        let right = r.iter().rposition(|&v| v == 1)?;
        Some((left, right))
    }

    /// Silhouette width around image row `y`
    ///
    /// Rows `y - 3 ..= y + 3` are sampled; a row counts when it has a span
    /// wider than one pixel. The width is the upper median over counted rows.
    /// The left/right split uses the edges at row `round(y)` when present,
    /// otherwise the median center.
    pub fn slice_width(&self, y: f64) -> Option<SliceWidth> {
        let height = self.height() as i64;
        let mut widths = Vec::new();
        let mut centers = Vec::new();

        for dy in -SLICE_SAMPLE_RADIUS..=SLICE_SAMPLE_RADIUS {
            let row = (y + dy as f64).round() as i64;
            if row < 0 || row >= height {
                continue;
            }
            if let Some((left, right)) = self.row_edges(row as usize) {
                if right > left {
                    widths.push((right - left + 1) as f64);
                    centers.push((left + right) as f64 / 2.0);
                }
            }
        }

        let total = upper_median(&widths)?;
        let median_center = upper_median(&centers)?;

        let best_row = y.round();
        let edges = if best_row >= 0.0 {
            self.row_edges(best_row as usize)
        } else {
            None
        };

        let (center, left_edge, right_edge) = match edges {
            Some((l, r)) => {
                let (l, r) = (l as f64, r as f64);
                ((l + r) / 2.0, l, r)
            }
            None => (
                median_center,
                median_center - total / 2.0,
                median_center + total / 2.0,
            ),
        };

        Some(SliceWidth {
            total_px: total,
            left_px: (center - left_edge).round(),
            right_px: (right_edge - center).round(),
            center_x: center.round(),
        })
    }
}

fn row_transitions(row: ArrayView1<'_, u8>) -> usize {
    row.windows(2)
        .into_iter()
        .filter(|w| w[0] != w[1])
        .count()
}

/// Anatomical slice heights in image pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlicePositions {
    pub hip_band_y: f64,
    pub upper_thigh_y: f64,
    pub mid_thigh_y: f64,
    pub calf_y: f64,
}

impl SlicePositions {
    /// Requires both hips, knees and ankles visible
    pub fn from_landmarks(landmarks: &PoseLandmarks, frame: FrameSize) -> Option<Self> {
        let hip = landmarks.pixel_midpoint(Joint::LeftHip, Joint::RightHip, frame)?;
        let knee = landmarks.pixel_midpoint(Joint::LeftKnee, Joint::RightKnee, frame)?;
        let ankle = landmarks.pixel_midpoint(Joint::LeftAnkle, Joint::RightAnkle, frame)?;

        Some(Self {
            hip_band_y: hip.y,
            upper_thigh_y: hip.y + UPPER_THIGH_FRACTION * (knee.y - hip.y),
            mid_thigh_y: hip.y + MID_THIGH_FRACTION * (knee.y - hip.y),
            calf_y: knee.y + CALF_FRACTION * (ankle.y - knee.y),
        })
    }

    /// Rescale every height by `factor`, e.g. image to mask rows
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            hip_band_y: self.hip_band_y * factor,
            upper_thigh_y: self.upper_thigh_y * factor,
            mid_thigh_y: self.mid_thigh_y * factor,
            calf_y: self.calf_y * factor,
        }
    }
}

/// Silhouette widths at the four slice heights, normalized by body height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliceIndices {
    pub hip_band_index: f64,
    pub upper_thigh_index: f64,
    pub mid_thigh_index: f64,
    pub calf_index: f64,
    pub hip_band: SliceWidth,
    pub upper_thigh: SliceWidth,
    pub mid_thigh: SliceWidth,
    pub calf: SliceWidth,
}

/// Slice width indices for a mask paired with image-space landmarks
///
/// Landmark heights and `body_height_px` are rescaled into mask rows before
/// measuring, so the mask may have a different resolution than the image.
pub fn compute_slice_indices(
    mask: &BinaryMask,
    landmarks: &PoseLandmarks,
    frame: FrameSize,
    body_height_px: f64,
) -> Option<SliceIndices> {
    if body_height_px <= 0.0 || frame.height == 0 || mask.height() == 0 {
        return None;
    }

    let scale_y = mask.height() as f64 / frame.height_f64();
    let positions = SlicePositions::from_landmarks(landmarks, frame)?.scaled(scale_y);
    let body_height = body_height_px * scale_y;

    let slices = (
        mask.slice_width(positions.hip_band_y),
        mask.slice_width(positions.upper_thigh_y),
        mask.slice_width(positions.mid_thigh_y),
        mask.slice_width(positions.calf_y),
    );
    let (Some(hip_band), Some(upper_thigh), Some(mid_thigh), Some(calf)) = slices else {
        debug!(?positions, "silhouette slice missing from mask");
        return None;
    };

    Some(SliceIndices {
        hip_band_index: hip_band.total_px / body_height,
        upper_thigh_index: upper_thigh.total_px / body_height,
        mid_thigh_index: mid_thigh.total_px / body_height,
        calf_index: calf.total_px / body_height,
        hip_band,
        upper_thigh,
        mid_thigh,
        calf,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use physique_core::Landmark;

    /// Mask with a filled rectangle spanning columns `x0..=x1` on every row
    fn band_mask(width: usize, height: usize, x0: usize, x1: usize) -> BinaryMask {
        BinaryMask::new(Array2::from_shape_fn((height, width), |(_, x)| {
            u8::from(x >= x0 && x <= x1)
        }))
    }

    #[test]
    fn test_mask_shape_validation() {
        let err = MaskData::new(vec![0.0; 10], 4, 3).unwrap_err();
        assert!(matches!(err, Error::MaskShape { expected: 12, actual: 10 }));
        assert!(MaskData::new(vec![0.0; 12], 4, 3).is_ok());
    }

    #[test]
    fn test_binarize_threshold_inclusive() {
        let mask = MaskData::new(vec![0.49, 0.5, 0.51, 0.0], 2, 2).unwrap();
        let bin = mask.binarize(MASK_THRESHOLD);
        assert_eq!(bin.filled_count(), 2);
        assert_eq!(bin.row_edges(0), Some((1, 1)));
    }

    #[test]
    fn test_quality_ideal_silhouette() {
        // 30% area, one span per row
        let mask = band_mask(100, 100, 35, 64);
        assert_eq!(mask.quality_score(), 100.0);
    }

    #[test]
    fn test_quality_empty_and_noisy() {
        let empty = band_mask(100, 100, 200, 200);
        // No area credit, every row trivially coherent
        assert_eq!(empty.quality_score(), 40.0);

        let stripes = BinaryMask::new(Array2::from_shape_fn((40, 40), |(_, x)| u8::from(x % 4 < 2)));
        // 50% area, no coherent rows
        assert_eq!(stripes.quality_score(), 60.0);
    }

    #[test]
    fn test_slice_width_band() {
        let mask = band_mask(200, 100, 50, 149);
        let slice = mask.slice_width(40.0).unwrap();
        assert_eq!(slice.total_px, 100.0);
        assert_eq!(slice.center_x, 100.0);
        assert_eq!(slice.left_px, 50.0);
        assert_eq!(slice.right_px, 50.0);
    }

    #[test]
    fn test_slice_width_is_pure() {
        let mask = band_mask(120, 80, 10, 70);
        assert_eq!(mask.slice_width(33.3), mask.slice_width(33.3));
    }

    #[test]
    fn test_slice_width_outside_mask() {
        let mask = band_mask(50, 20, 10, 20);
        assert!(mask.slice_width(-10.0).is_none());
        assert!(mask.slice_width(40.0).is_none());
        // Edge row partially inside the sampling window
        assert!(mask.slice_width(21.0).is_some());

        let single_pixel = band_mask(50, 20, 10, 10);
        assert!(single_pixel.slice_width(5.0).is_none());
    }

    #[test]
    fn test_slice_indices_scale_to_mask() {
        let frame = FrameSize::new(400, 800);
        let mut pose = PoseLandmarks::empty();
        pose.set(Joint::LeftHip, Landmark::new(0.45, 0.5, 0.9));
        pose.set(Joint::RightHip, Landmark::new(0.55, 0.5, 0.9));
        pose.set(Joint::LeftKnee, Landmark::new(0.45, 0.7, 0.9));
        pose.set(Joint::RightKnee, Landmark::new(0.55, 0.7, 0.9));
        pose.set(Joint::LeftAnkle, Landmark::new(0.45, 0.9, 0.9));
        pose.set(Joint::RightAnkle, Landmark::new(0.55, 0.9, 0.9));

        // Half-resolution mask, 40 px wide silhouette everywhere
        let mask = band_mask(200, 400, 80, 119);
        let indices = compute_slice_indices(&mask, &pose, frame, 600.0).unwrap();
        assert_relative_eq!(indices.hip_band_index, 40.0 / 300.0, epsilon = 1e-12);
        assert_relative_eq!(indices.calf_index, 40.0 / 300.0, epsilon = 1e-12);

        assert!(compute_slice_indices(&mask, &pose, frame, 0.0).is_none());

        pose.set(Joint::LeftAnkle, Landmark::new(0.45, 0.9, 0.1));
        assert!(compute_slice_indices(&mask, &pose, frame, 600.0).is_none());
    }

    #[test]
    fn test_slice_positions() {
        let frame = FrameSize::new(100, 1000);
        let mut pose = PoseLandmarks::empty();
        for (l, r, y) in [
            (Joint::LeftHip, Joint::RightHip, 0.5),
            (Joint::LeftKnee, Joint::RightKnee, 0.7),
            (Joint::LeftAnkle, Joint::RightAnkle, 0.9),
        ] {
            pose.set(l, Landmark::new(0.4, y, 1.0));
            pose.set(r, Landmark::new(0.6, y, 1.0));
        }
        let pos = SlicePositions::from_landmarks(&pose, frame).unwrap();
        assert_relative_eq!(pos.hip_band_y, 500.0, epsilon = 1e-9);
        assert_relative_eq!(pos.upper_thigh_y, 540.0, epsilon = 1e-9);
        assert_relative_eq!(pos.mid_thigh_y, 610.0, epsilon = 1e-9);
        assert_relative_eq!(pos.calf_y, 810.0, epsilon = 1e-9);
    }
}
