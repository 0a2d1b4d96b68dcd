use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// Options for a censoring pass, passed as a JavaScript object.
///
/// All fields are optional.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CensorOptions {
    pub format: Option<String>,
    pub quality: Option<f32>,
}

fn format_to_str(format: &eyecensor::OutputFormat) -> &'static str {
    match format {
        eyecensor::OutputFormat::Png => "png",
        eyecensor::OutputFormat::Jpeg => "jpeg",
    }
}

fn string_to_format(format: &str) -> Result<eyecensor::OutputFormat, JsValue> {
    match format {
        "png" => Ok(eyecensor::OutputFormat::Png),
        "jpeg" => Ok(eyecensor::OutputFormat::Jpeg),
        _ => Err(make_error(
            "INVALID_OPTIONS",
            &format!("unknown format: {format}"),
        )),
    }
}

/// Create a JS `Error` with a `code` property.
fn make_error(code: &str, message: &str) -> JsValue {
    let err = js_sys::Error::new(message);
    let _ = js_sys::Reflect::set(&err, &"code".into(), &JsValue::from_str(code));
    JsValue::from(err)
}

/// Convert an `EyeCensorError` into a JS `Error` with a machine-readable
/// `code` property.
fn to_js_error(e: eyecensor::EyeCensorError) -> JsValue {
    let code = match &e {
        eyecensor::EyeCensorError::DecodeError(_) => "DECODE_ERROR",
        eyecensor::EyeCensorError::UnsupportedFormat => "UNSUPPORTED_FORMAT",
        eyecensor::EyeCensorError::ZeroDimensions => "ZERO_DIMENSIONS",
        eyecensor::EyeCensorError::EncodeError(_) => "ENCODE_ERROR",
        eyecensor::EyeCensorError::InvalidQuality(_) => "INVALID_QUALITY",
        eyecensor::EyeCensorError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
    };
    make_error(code, &e.to_string())
}

fn parse_options(options: JsValue) -> Result<CensorOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(CensorOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| make_error("INVALID_OPTIONS", &format!("invalid options: {e}")))
    }
}

/// Parse the keypoint array handed over from the page's FaceMesh run.
/// `null`/`undefined` means no face was detected.
fn parse_landmarks(landmarks: JsValue) -> Result<Option<eyecensor::FaceLandmarks>, JsValue> {
    if landmarks.is_undefined() || landmarks.is_null() {
        Ok(None)
    } else {
        serde_wasm_bindgen::from_value(landmarks)
            .map(Some)
            .map_err(|e| make_error("INVALID_LANDMARKS", &format!("invalid landmarks: {e}")))
    }
}

/// Build a plain JS object from a `CensorBar`.
fn build_bar_object(bar: &eyecensor::CensorBar) -> Result<JsValue, JsValue> {
    let obj = js_sys::Object::new();
    js_sys::Reflect::set(&obj, &"centerX".into(), &JsValue::from(bar.center.x))?;
    js_sys::Reflect::set(&obj, &"centerY".into(), &JsValue::from(bar.center.y))?;
    js_sys::Reflect::set(&obj, &"width".into(), &JsValue::from(bar.width))?;
    js_sys::Reflect::set(&obj, &"height".into(), &JsValue::from(bar.height))?;
    js_sys::Reflect::set(&obj, &"angle".into(), &JsValue::from(bar.angle))?;
    Ok(JsValue::from(obj))
}

/// Build a plain JS object from a `CensoredPhoto`.
fn build_photo_object(photo: &eyecensor::CensoredPhoto) -> Result<JsValue, JsValue> {
    let obj = js_sys::Object::new();
    let data = js_sys::Uint8Array::from(&photo.data[..]);
    js_sys::Reflect::set(&obj, &"data".into(), &data)?;
    js_sys::Reflect::set(
        &obj,
        &"format".into(),
        &JsValue::from_str(format_to_str(&photo.format)),
    )?;
    js_sys::Reflect::set(&obj, &"width".into(), &JsValue::from(photo.width))?;
    js_sys::Reflect::set(&obj, &"height".into(), &JsValue::from(photo.height))?;
    js_sys::Reflect::set(
        &obj,
        &"originalSize".into(),
        &JsValue::from(photo.original_size as u32),
    )?;

    let bar = match photo.censor.as_ref() {
        Some(bar) => build_bar_object(bar)?,
        None => JsValue::NULL,
    };
    js_sys::Reflect::set(&obj, &"censor".into(), &bar)?;

    Ok(JsValue::from(obj))
}

/// Censor the eye region of a photo.
///
/// @param input - Raw image bytes (PNG, JPEG, or WebP)
/// @param landmarks - Array of `{x, y}` keypoints from the page's FaceMesh
///   run, or null when no face was detected (the photo passes through)
/// @param options - Optional object with fields: format ("png" | "jpeg"),
///   quality (0.0–1.0, JPEG only)
#[wasm_bindgen]
pub fn censor(input: Vec<u8>, landmarks: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    let opts = parse_options(options)?;
    let landmarks = parse_landmarks(landmarks)?;

    let mut pass = eyecensor::EyeCensor::new(input).map_err(to_js_error)?;
    if let Some(landmarks) = landmarks {
        pass = pass.landmarks(landmarks);
    }
    if let Some(ref format) = opts.format {
        pass = pass.format(string_to_format(format)?);
    }
    if let Some(quality) = opts.quality {
        pass = pass.quality(quality);
    }

    let result = pass.censor().map_err(to_js_error)?;

    build_photo_object(&result)
}

/// Compute the censor bar for a keypoint array without rendering, for
/// drawing a live overlay preview on the page's canvas.
///
/// @param landmarks - Array of `{x, y}` keypoints from a FaceMesh run
#[wasm_bindgen(js_name = "censorBar")]
pub fn censor_bar(landmarks: JsValue) -> Result<JsValue, JsValue> {
    let landmarks = parse_landmarks(landmarks)?
        .ok_or_else(|| make_error("INVALID_LANDMARKS", "landmarks are required"))?;

    let bar = eyecensor::CensorBar::from_landmarks(
        &landmarks,
        &eyecensor::RIGHT_EYE_CONTOUR,
        &eyecensor::LEFT_EYE_CONTOUR,
    )
    .map_err(to_js_error)?;

    build_bar_object(&bar)
}
