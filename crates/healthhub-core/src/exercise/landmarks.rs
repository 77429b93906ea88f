//! Landmark frame input types.
//!
//! A landmark frame is the per-frame output of an external pose-estimation
//! model: named body joints mapped to normalized image coordinates. The
//! detector treats frames as read-only input and does no confidence or
//! visibility filtering of its own.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DetectError;

/// Named body joints the detectors care about.
///
/// Left-side joints drive the push-up and squat angle computations;
/// both sides are accepted so a full frame can be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    /// Stable snake_case name, matching the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            Joint::LeftShoulder => "left_shoulder",
            Joint::RightShoulder => "right_shoulder",
            Joint::LeftElbow => "left_elbow",
            Joint::RightElbow => "right_elbow",
            Joint::LeftWrist => "left_wrist",
            Joint::RightWrist => "right_wrist",
            Joint::LeftHip => "left_hip",
            Joint::RightHip => "right_hip",
            Joint::LeftKnee => "left_knee",
            Joint::RightKnee => "right_knee",
            Joint::LeftAnkle => "left_ankle",
            Joint::RightAnkle => "right_ankle",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A normalized 2-D image coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One frame of pose landmarks: joint -> normalized coordinate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkFrame {
    joints: HashMap<Joint, Point>,
}

impl LandmarkFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, joint: Joint, point: Point) {
        self.joints.insert(joint, point);
    }

    pub fn get(&self, joint: Joint) -> Option<Point> {
        self.joints.get(&joint).copied()
    }

    pub fn contains(&self, joint: Joint) -> bool {
        self.joints.contains_key(&joint)
    }

    /// Look up a joint the active exercise requires.
    pub fn require(&self, joint: Joint) -> Result<Point, DetectError> {
        self.get(joint).ok_or(DetectError::MissingLandmark(joint))
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

impl From<HashMap<Joint, Point>> for LandmarkFrame {
    fn from(joints: HashMap<Joint, Point>) -> Self {
        Self { joints }
    }
}

impl FromIterator<(Joint, Point)> for LandmarkFrame {
    fn from_iter<T: IntoIterator<Item = (Joint, Point)>>(iter: T) -> Self {
        Self {
            joints: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_names_match_serde_form() {
        let json = serde_json::to_string(&Joint::LeftShoulder).unwrap();
        assert_eq!(json, "\"left_shoulder\"");
        assert_eq!(Joint::LeftShoulder.name(), "left_shoulder");
    }

    #[test]
    fn frame_deserializes_from_plain_map() {
        let json = r#"{"left_shoulder":{"x":0.4,"y":0.3},"left_hip":{"x":0.4,"y":0.6}}"#;
        let frame: LandmarkFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.get(Joint::LeftShoulder).unwrap().y, 0.3);
        assert!(!frame.contains(Joint::LeftKnee));
    }

    #[test]
    fn require_reports_the_missing_joint() {
        let frame = LandmarkFrame::new();
        let err = frame.require(Joint::LeftElbow).unwrap_err();
        assert_eq!(err.to_string(), "landmark 'left_elbow' missing from frame");
    }
}
