use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageEncoder, ImageFormat, RgbImage, RgbaImage};
use log::debug;

use crate::censor::{draw_censor_bar, CensorBar, LEFT_EYE_CONTOUR, RIGHT_EYE_CONTOUR};
use crate::error::EyeCensorError;
use crate::landmarks::{FaceLandmarks, LandmarkDetector};
use crate::surface::Surface;
use crate::{CensoredPhoto, OutputFormat};

/// Decode input bytes into a `DynamicImage`.
pub(crate) fn decode_image(input: &[u8]) -> Result<DynamicImage, EyeCensorError> {
    image::load_from_memory(input).map_err(|e| EyeCensorError::DecodeError(e.to_string()))
}

/// Detect the input image format from the raw bytes.
pub(crate) fn detect_format(input: &[u8]) -> Result<ImageFormat, EyeCensorError> {
    image::guess_format(input).map_err(|_| EyeCensorError::UnsupportedFormat)
}

/// Flatten the alpha channel by compositing onto a white background, for
/// encoders without alpha support.
pub(crate) fn flatten_alpha(rgba: &RgbaImage) -> RgbImage {
    let (width, height) = (rgba.width(), rgba.height());
    let mut rgb = RgbImage::new(width, height);

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        let inv_alpha = 1.0 - alpha;
        // Composite over white (255, 255, 255)
        let out_r = (r as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        let out_g = (g as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        let out_b = (b as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        rgb.put_pixel(x, y, image::Rgb([out_r, out_g, out_b]));
    }

    rgb
}

/// Encode the censored raster to the requested format.
///
/// PNG keeps the RGBA pixels as-is; JPEG has no alpha channel, so the image
/// is flattened over white first and `quality` maps to the encoder's
/// percentage scale.
pub(crate) fn encode_image(
    image: &RgbaImage,
    format: &OutputFormat,
    quality: f32,
) -> Result<Vec<u8>, EyeCensorError> {
    let mut buffer = Vec::new();

    match format {
        OutputFormat::Png => {
            let encoder = PngEncoder::new(&mut buffer);
            encoder
                .write_image(
                    image.as_raw(),
                    image.width(),
                    image.height(),
                    image::ExtendedColorType::Rgba8,
                )
                .map_err(|e| EyeCensorError::EncodeError(e.to_string()))?;
        }
        OutputFormat::Jpeg => {
            let rgb = flatten_alpha(image);
            let quality_percent = (quality * 100.0).round() as u8;
            let encoder = JpegEncoder::new_with_quality(&mut buffer, quality_percent);
            encoder
                .write_image(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    image::ExtendedColorType::Rgb8,
                )
                .map_err(|e| EyeCensorError::EncodeError(e.to_string()))?;
        }
    }

    Ok(buffer)
}

/// Full censoring pipeline: decode → landmarks → geometry → render → encode.
///
/// Precomputed landmarks win over the detector; with neither, the image
/// passes through unchanged and `censor` is `None`.
pub(crate) fn censor_pipeline(
    input: &[u8],
    format: &OutputFormat,
    quality: f32,
    landmarks: Option<FaceLandmarks>,
    detector: Option<&dyn LandmarkDetector>,
) -> Result<CensoredPhoto, EyeCensorError> {
    let decoded = decode_image(input)?;

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(EyeCensorError::ZeroDimensions);
    }

    let rgba = decoded.to_rgba8();
    debug!(
        "decoded {}x{} image from {} input bytes",
        rgba.width(),
        rgba.height(),
        input.len()
    );

    let landmarks = landmarks.or_else(|| {
        detector.and_then(|d| d.detect(rgba.as_raw(), rgba.width(), rgba.height()))
    });

    // Geometry first: a malformed keypoint array fails the pass before any
    // pixel is touched.
    let bar = match &landmarks {
        Some(landmarks) => Some(CensorBar::from_landmarks(
            landmarks,
            &RIGHT_EYE_CONTOUR,
            &LEFT_EYE_CONTOUR,
        )?),
        None => {
            debug!("no face landmarks, leaving image uncensored");
            None
        }
    };

    let mut surface = Surface::new(rgba);
    if let Some(bar) = &bar {
        debug!(
            "censor bar {:.1}x{:.1} at ({:.1}, {:.1}), angle {:.3} rad",
            bar.width, bar.height, bar.center.x, bar.center.y, bar.angle
        );
        draw_censor_bar(&mut surface, bar);
    }

    let rgba = surface.into_image();
    let data = encode_image(&rgba, format, quality)?;

    Ok(CensoredPhoto {
        data,
        format: format.clone(),
        width: rgba.width(),
        height: rgba.height(),
        original_size: input.len(),
        censor: bar,
    })
}
