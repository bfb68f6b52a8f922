//! Fundamental types for physique scan analysis.

use chrono::{DateTime, Utc};
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::tuning::{LANDMARK_COUNT, VISIBILITY_THRESHOLD};

/// Capture session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Timestamp wrapper with millisecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Fractional days elapsed from `earlier` to `self` (negative if `earlier` is later)
    pub fn days_since(&self, earlier: Timestamp) -> f64 {
        (self.0 - earlier.0) as f64 / 86_400_000.0
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

/// Pose model landmark indices used by the analysis (MediaPipe 33-point layout)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum Joint {
    Nose = 0,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
}

impl Joint {
    /// Every joint the analysis reads, head to feet
    pub const TRACKED: [Joint; 13] = [
        Joint::Nose,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::TRACKED.iter().copied().find(|j| j.index() == index)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Joint::Nose => "Head",
            Joint::LeftShoulder => "Left Shoulder",
            Joint::RightShoulder => "Right Shoulder",
            Joint::LeftElbow => "Left Elbow",
            Joint::RightElbow => "Right Elbow",
            Joint::LeftWrist => "Left Wrist",
            Joint::RightWrist => "Right Wrist",
            Joint::LeftHip => "Left Hip",
            Joint::RightHip => "Right Hip",
            Joint::LeftKnee => "Left Knee",
            Joint::RightKnee => "Right Knee",
            Joint::LeftAnkle => "Left Ankle",
            Joint::RightAnkle => "Right Ankle",
        }
    }
}

/// Frame (or image) dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width_f64(&self) -> f64 {
        self.width as f64
    }

    pub fn height_f64(&self) -> f64 {
        self.height as f64
    }
}

/// 2D position in frame pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        nalgebra::distance(&self.to_nalgebra(), &other.to_nalgebra())
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

/// 2D position relative to the body: origin at the hip midpoint, unit = body height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Detected joint in image-normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized X (0.0 to 1.0)
    pub x: f64,
    /// Normalized Y (0.0 to 1.0, downward)
    pub y: f64,
    /// Relative depth, model-specific scale
    pub z: f64,
    /// Detector confidence for this joint (0.0 to 1.0)
    pub visibility: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility,
        }
    }

    pub fn is_visible(&self, threshold: f64) -> bool {
        self.visibility > threshold
    }

    pub fn to_pixel(&self, frame: FrameSize) -> PixelPoint {
        PixelPoint::new(self.x * frame.width_f64(), self.y * frame.height_f64())
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            visibility: 0.0,
        }
    }
}

/// Joint position in meters, origin at the hip midpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldLandmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub visibility: f64,
}

impl WorldLandmark {
    pub fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self { x, y, z, visibility }
    }

    pub fn is_visible(&self, threshold: f64) -> bool {
        self.visibility > threshold
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        nalgebra::distance(&self.to_nalgebra(), &other.to_nalgebra())
    }

    pub fn to_nalgebra(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }
}

impl Default for WorldLandmark {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

/// Image-space landmarks for one detected person
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseLandmarks {
    pub points: Vec<Landmark>,
}

impl PoseLandmarks {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// All 33 slots present but invisible
    pub fn empty() -> Self {
        Self::new(vec![Landmark::default(); LANDMARK_COUNT])
    }

    pub fn get(&self, joint: Joint) -> Option<&Landmark> {
        self.points.get(joint.index())
    }

    pub fn set(&mut self, joint: Joint, landmark: Landmark) {
        let idx = joint.index();
        if self.points.len() <= idx {
            self.points.resize(LANDMARK_COUNT.max(idx + 1), Landmark::default());
        }
        self.points[idx] = landmark;
    }

    /// The landmark if its visibility exceeds `threshold`
    pub fn visible_at(&self, joint: Joint, threshold: f64) -> Option<&Landmark> {
        self.get(joint).filter(|lm| lm.is_visible(threshold))
    }

    /// The landmark if visible at the default analysis threshold
    pub fn visible(&self, joint: Joint) -> Option<&Landmark> {
        self.visible_at(joint, VISIBILITY_THRESHOLD)
    }

    pub fn is_visible(&self, joint: Joint) -> bool {
        self.visible(joint).is_some()
    }

    /// Both joints visible at `threshold`
    pub fn pair_visible_at(&self, left: Joint, right: Joint, threshold: f64) -> bool {
        self.visible_at(left, threshold).is_some() && self.visible_at(right, threshold).is_some()
    }

    /// Pixel position of a visible joint
    pub fn pixel(&self, joint: Joint, frame: FrameSize) -> Option<PixelPoint> {
        self.visible(joint).map(|lm| lm.to_pixel(frame))
    }

    /// Pixel midpoint of two visible joints
    pub fn pixel_midpoint(&self, left: Joint, right: Joint, frame: FrameSize) -> Option<PixelPoint> {
        let l = self.pixel(left, frame)?;
        let r = self.pixel(right, frame)?;
        Some(l.midpoint(&r))
    }
}

/// World-space landmarks for one detected person
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPose {
    pub points: Vec<WorldLandmark>,
}

impl WorldPose {
    pub fn new(points: Vec<WorldLandmark>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self::new(vec![WorldLandmark::default(); LANDMARK_COUNT])
    }

    /// Truncated arrays are treated as "world data unavailable"
    pub fn is_complete(&self) -> bool {
        self.points.len() >= LANDMARK_COUNT
    }

    pub fn get(&self, joint: Joint) -> Option<&WorldLandmark> {
        self.points.get(joint.index())
    }

    pub fn set(&mut self, joint: Joint, landmark: WorldLandmark) {
        let idx = joint.index();
        if self.points.len() <= idx {
            self.points.resize(LANDMARK_COUNT.max(idx + 1), WorldLandmark::default());
        }
        self.points[idx] = landmark;
    }

    pub fn visible(&self, joint: Joint) -> Option<&WorldLandmark> {
        self.get(joint).filter(|wl| wl.is_visible(VISIBILITY_THRESHOLD))
    }
}

/// Output of the external pose-estimation collaborator for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseDetectionResult {
    pub landmarks: PoseLandmarks,
    pub world_landmarks: WorldPose,
}

/// Which check-in pose a capture claims to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckinPose {
    Front,
    Back,
}

impl CheckinPose {
    pub fn from_pose_id(pose_id: &str) -> Self {
        if pose_id == "back-checkin" {
            CheckinPose::Back
        } else {
            CheckinPose::Front
        }
    }
}

/// Summary of a previously stored capture, supplied by the external store
///
/// Read-only baseline for gating and progress. Optional fields are absent
/// for records written before the signal was stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub timestamp: Timestamp,
    pub pose_id: String,
    pub body_height_px: f64,
    #[serde(default)]
    pub stance_width_index: Option<f64>,
    #[serde(default)]
    pub hip_tilt_deg: Option<f64>,
    /// Average frame luma at capture time
    #[serde(default)]
    pub avg_brightness: Option<f64>,
    #[serde(default)]
    pub v_taper_index: f64,
    /// Calibrated shoulder width, 0 when uncalibrated
    #[serde(default)]
    pub shoulder_width_cm: f64,
    #[serde(default)]
    pub symmetry_score: Option<f64>,
}

impl ScanRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
