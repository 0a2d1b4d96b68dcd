use image::Rgba;

use crate::error::EyeCensorError;
use crate::landmarks::{FaceLandmarks, Point};
use crate::surface::Surface;

/// Keypoint indices outlining the right eye contour in the FaceMesh topology.
pub const RIGHT_EYE_CONTOUR: [usize; 9] = [33, 7, 163, 144, 145, 153, 154, 155, 133];

/// Keypoint indices outlining the left eye contour in the FaceMesh topology.
pub const LEFT_EYE_CONTOUR: [usize; 9] = [263, 249, 390, 373, 374, 380, 381, 382, 362];

/// Horizontal padding added to the combined eye span, in pixels.
const WIDTH_PADDING: f32 = 40.0;

/// Vertical padding added to the taller eye's extent, in pixels.
const HEIGHT_PADDING: f32 = 20.0;

/// Fill color of the bar. Fully opaque so nothing of the eye region survives
/// re-encoding.
const BAR_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Axis-aligned bounds of a point set.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    fn of(points: &[Point]) -> Self {
        debug_assert!(!points.is_empty());
        let mut bounds = Self {
            min_x: f32::INFINITY,
            min_y: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            max_y: f32::NEG_INFINITY,
        };
        for p in points {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        bounds
    }

    fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Midpoint of the bounds. Eye centers use this rather than the centroid
    /// of the contour points, which would drift toward the denser eyelid
    /// samples on asymmetric eye shapes.
    fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// The rotated, padded rectangle drawn over both eyes.
///
/// Computed fresh for every pass from one face's keypoints; never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CensorBar {
    /// Midpoint of the combined eye bounding box.
    pub center: Point,
    /// Combined eye span plus horizontal padding.
    pub width: f32,
    /// Taller per-eye extent plus vertical padding.
    pub height: f32,
    /// Inclination of the right-eye-to-left-eye axis, in radians.
    pub angle: f32,
}

impl CensorBar {
    /// Compute the bar covering both eyes of `landmarks`.
    ///
    /// `right_eye` and `left_eye` index into the keypoint array; the library
    /// constants [`RIGHT_EYE_CONTOUR`] and [`LEFT_EYE_CONTOUR`] match the
    /// FaceMesh topology. Fails with
    /// [`EyeCensorError::IndexOutOfRange`] when the detector returned fewer
    /// keypoints than an index set references.
    pub fn from_landmarks(
        landmarks: &FaceLandmarks,
        right_eye: &[usize],
        left_eye: &[usize],
    ) -> Result<Self, EyeCensorError> {
        let right_points = select(landmarks, right_eye)?;
        let left_points = select(landmarks, left_eye)?;

        let right_bounds = Bounds::of(&right_points);
        let left_bounds = Bounds::of(&left_points);

        let right_center = right_bounds.center();
        let left_center = left_bounds.center();

        // Inclination of the inter-eye axis, right eye toward left eye, so
        // the bar follows head tilt.
        let angle = (left_center.y - right_center.y).atan2(left_center.x - right_center.x);

        let combined = right_bounds.union(&left_bounds);

        // Height padding is taken from the taller eye so a tilted face or a
        // more open eye does not starve the shorter one's coverage.
        let width = combined.width() + WIDTH_PADDING;
        let height = right_bounds.height().max(left_bounds.height()) + HEIGHT_PADDING;

        Ok(Self {
            center: combined.center(),
            width,
            height,
            angle,
        })
    }

    /// Corner points of the rotated rectangle in image coordinates, starting
    /// at the top-left of the local frame and winding clockwise.
    pub fn corners(&self) -> [Point; 4] {
        let (sin, cos) = self.angle.sin_cos();
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        let rotate = |x: f32, y: f32| {
            Point::new(
                self.center.x + x * cos - y * sin,
                self.center.y + x * sin + y * cos,
            )
        };
        [
            rotate(-hw, -hh),
            rotate(hw, -hh),
            rotate(hw, hh),
            rotate(-hw, hh),
        ]
    }

    /// Map an image-space point into the bar's local frame, where the bar
    /// spans `[-width/2, width/2] × [-height/2, height/2]`.
    pub fn to_local(&self, p: Point) -> Point {
        let (sin, cos) = self.angle.sin_cos();
        let dx = p.x - self.center.x;
        let dy = p.y - self.center.y;
        Point::new(dx * cos + dy * sin, -dx * sin + dy * cos)
    }

    /// Whether the bar covers an image-space point.
    pub fn contains(&self, p: Point) -> bool {
        let local = self.to_local(p);
        local.x.abs() <= self.width / 2.0 && local.y.abs() <= self.height / 2.0
    }
}

fn select(landmarks: &FaceLandmarks, indices: &[usize]) -> Result<Vec<Point>, EyeCensorError> {
    indices
        .iter()
        .map(|&index| {
            landmarks.get(index).ok_or(EyeCensorError::IndexOutOfRange {
                index,
                len: landmarks.len(),
            })
        })
        .collect()
}

/// Fill the bar onto the surface: translate to its center, rotate into its
/// frame, and fill the centered rectangle. The transform scope restores the
/// surface's previous frame when it drops, on every exit path.
pub fn draw_censor_bar(surface: &mut Surface, bar: &CensorBar) {
    let mut scope = surface.scope();
    scope.translate(bar.center.x, bar.center.y);
    scope.rotate(bar.angle);
    scope.fill_rect(
        -bar.width / 2.0,
        -bar.height / 2.0,
        bar.width,
        bar.height,
        BAR_COLOR,
    );
}
