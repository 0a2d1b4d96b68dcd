//! Eye-region privacy redaction: draw one opaque rotated bar over both eyes
//! of a photo, using face-mesh landmarks from an external detector.
//!
//! # Example
//!
//! ```no_run
//! use eyecensor::{EyeCensor, FaceLandmarks};
//!
//! let photo = std::fs::read("photo.png").unwrap();
//! let landmarks: FaceLandmarks =
//!     serde_json::from_slice(&std::fs::read("landmarks.json").unwrap()).unwrap();
//!
//! let result = EyeCensor::new(photo)
//!     .unwrap()
//!     .landmarks(landmarks)
//!     .censor()
//!     .unwrap();
//! std::fs::write("censored.png", &result.data).unwrap();
//! ```
#![warn(missing_docs)]

mod censor;
mod error;
mod landmarks;
mod pipeline;
mod surface;

/// Error type returned by eyecensor operations.
pub use error::EyeCensorError;
/// Censor bar geometry and the FaceMesh eye contour index sets.
pub use censor::{draw_censor_bar, CensorBar, LEFT_EYE_CONTOUR, RIGHT_EYE_CONTOUR};
/// Landmark types and the pluggable detector trait.
pub use landmarks::{FaceLandmarks, LandmarkDetector, Point, FACE_MESH_POINTS};
/// Raster surface with scoped affine transform state.
pub use surface::{Surface, Transform, TransformScope};

/// Output image format.
#[derive(Debug, Clone, Default)]
pub enum OutputFormat {
    /// PNG encoding, preserving the alpha channel. The download format of
    /// the original capture.
    #[default]
    Png,

    /// JPEG encoding; alpha is flattened over white.
    Jpeg,
}

/// Result of a single censoring pass.
#[derive(Debug, Clone)]
pub struct CensoredPhoto {
    /// The encoded output image bytes.
    pub data: Vec<u8>,

    /// The output format used.
    pub format: OutputFormat,

    /// Width of the output image in pixels (always the input width).
    pub width: u32,

    /// Height of the output image in pixels (always the input height).
    pub height: u32,

    /// Size of the original input in bytes.
    pub original_size: usize,

    /// The bar that was drawn, or `None` when no face landmarks were
    /// supplied ("no censoring applied").
    pub censor: Option<CensorBar>,
}

/// Builder for one censoring pass over one photo.
///
/// Decodes and validates the input on construction, carries the landmark
/// source and output settings, and is consumed by [`censor`](Self::censor):
/// a pass cannot be rerun or raced against itself, so each upload gets a
/// fresh builder.
pub struct EyeCensor {
    input: Vec<u8>,
    format: OutputFormat,
    quality: f32,
    landmarks: Option<FaceLandmarks>,
    detector: Option<Box<dyn LandmarkDetector>>,
}

impl EyeCensor {
    /// Create a censoring pass from raw image bytes (PNG, JPEG, or WebP).
    pub fn new(input: Vec<u8>) -> Result<Self, EyeCensorError> {
        // Validate that the input can be decoded
        pipeline::detect_format(&input)?;

        Ok(Self {
            input,
            format: OutputFormat::default(),
            quality: 0.9,
            landmarks: None,
            detector: None,
        })
    }

    /// Supply precomputed face landmarks from the external detector.
    ///
    /// This is the primary path for browser hosts: the page runs FaceMesh
    /// and hands the keypoints in. Takes precedence over
    /// [`detector`](Self::detector).
    pub fn landmarks(mut self, landmarks: FaceLandmarks) -> Self {
        self.landmarks = Some(landmarks);
        self
    }

    /// Provide an in-process landmark detector backend.
    ///
    /// Used when no precomputed landmarks are supplied. This allows
    /// integrating ONNX, tflite, or any other FaceMesh-topology engine.
    ///
    /// ```no_run
    /// use eyecensor::{EyeCensor, FaceLandmarks, LandmarkDetector};
    ///
    /// struct MyDetector;
    /// impl LandmarkDetector for MyDetector {
    ///     fn detect(&self, rgba: &[u8], width: u32, height: u32) -> Option<FaceLandmarks> {
    ///         // Your detection logic here
    ///         None
    ///     }
    /// }
    ///
    /// let bytes = std::fs::read("photo.png").unwrap();
    /// let result = EyeCensor::new(bytes)
    ///     .unwrap()
    ///     .detector(Box::new(MyDetector))
    ///     .censor()
    ///     .unwrap();
    /// ```
    pub fn detector(mut self, detector: Box<dyn LandmarkDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Set the output format (default: `OutputFormat::Png`).
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the JPEG quality from 0.0 (lowest) to 1.0 (highest).
    /// Default: 0.9. Ignored for PNG output.
    pub fn quality(mut self, quality: f32) -> Self {
        self.quality = quality;
        self
    }

    /// Run the pass: decode, obtain landmarks, compute the bar, render it,
    /// and encode the result.
    ///
    /// Succeeds with `censor: None` when no landmarks are available; an
    /// uncensored photo is a normal outcome, not an error.
    pub fn censor(self) -> Result<CensoredPhoto, EyeCensorError> {
        if self.quality < 0.0 || self.quality > 1.0 {
            return Err(EyeCensorError::InvalidQuality(self.quality));
        }

        pipeline::censor_pipeline(
            &self.input,
            &self.format,
            self.quality,
            self.landmarks,
            self.detector.as_deref(),
        )
    }
}
