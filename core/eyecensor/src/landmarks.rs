use serde::{Deserialize, Serialize};

/// Number of keypoints in the MediaPipe FaceMesh topology with iris
/// refinement. Detectors following that topology produce exactly this many
/// points; the censoring engine only requires the eye-contour indices to be
/// present.
pub const FACE_MESH_POINTS: usize = 478;

/// A 2D keypoint in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position in pixels.
    pub x: f32,
    /// Vertical position in pixels.
    pub y: f32,
}

impl Point {
    /// Create a point from pixel coordinates.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Ordered landmark array for one detected face.
///
/// Serializes as a plain array of points, matching the keypoint dumps
/// produced by FaceMesh-style detectors (extra per-point fields such as `z`
/// are ignored on deserialization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceLandmarks {
    points: Vec<Point>,
}

impl FaceLandmarks {
    /// Wrap an ordered keypoint array.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Number of keypoints.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the array holds no keypoints.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The keypoint at `index`, or `None` when the detector returned fewer
    /// points than the topology promises.
    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }
}

impl From<Vec<Point>> for FaceLandmarks {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

/// Pluggable face-landmark detection backend.
///
/// Implement this trait to drive the censoring pipeline from an in-process
/// detector (ONNX, tflite, etc.) instead of precomputed keypoints, and pass
/// it to [`crate::EyeCensor::detector`]. The contract is zero or one face:
/// detectors configured for multiple faces should return their best match.
pub trait LandmarkDetector: Send + Sync {
    /// Detect face landmarks in a row-major RGBA buffer of
    /// `width` × `height` pixels. Returns `None` when no face is found.
    fn detect(&self, rgba: &[u8], width: u32, height: u32) -> Option<FaceLandmarks>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_point_in_range() {
        let landmarks = FaceLandmarks::new(vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
        assert_eq!(landmarks.get(1), Some(Point::new(3.0, 4.0)));
        assert_eq!(landmarks.get(2), None);
    }

    #[test]
    fn deserializes_plain_point_array() {
        let json = r#"[{"x": 10.5, "y": 20.0}, {"x": 1.0, "y": 2.0}]"#;
        let landmarks: FaceLandmarks = serde_json::from_str(json).unwrap();
        assert_eq!(landmarks.len(), 2);
        assert_eq!(landmarks.get(0), Some(Point::new(10.5, 20.0)));
    }

    #[test]
    fn deserializes_facemesh_dump_with_z() {
        // FaceMesh dumps carry a z coordinate; it is ignored.
        let json = r#"[{"x": 1.0, "y": 2.0, "z": -0.03}]"#;
        let landmarks: FaceLandmarks = serde_json::from_str(json).unwrap();
        assert_eq!(landmarks.get(0), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn serializes_as_array() {
        let landmarks = FaceLandmarks::new(vec![Point::new(1.0, 2.0)]);
        let json = serde_json::to_string(&landmarks).unwrap();
        assert_eq!(json, r#"[{"x":1.0,"y":2.0}]"#);
    }
}
