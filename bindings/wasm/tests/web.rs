use eyecensor_wasm::{censor, censor_bar};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

fn make_test_png(width: u32, height: u32) -> Vec<u8> {
    let mut img = RgbImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ]);
    }

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buffer
}

/// A full FaceMesh-length keypoint array with level eyes.
fn make_landmarks() -> JsValue {
    let mut points = vec![eyecensor::Point::new(150.0, 150.0); eyecensor::FACE_MESH_POINTS];
    for (i, slot) in eyecensor::RIGHT_EYE_CONTOUR.iter().enumerate() {
        points[*slot] = eyecensor::Point::new(90.0 + i as f32 * 2.5, 98.0 + (i % 2) as f32 * 4.0);
    }
    for (i, slot) in eyecensor::LEFT_EYE_CONTOUR.iter().enumerate() {
        points[*slot] = eyecensor::Point::new(190.0 + i as f32 * 2.5, 98.0 + (i % 2) as f32 * 4.0);
    }
    serde_wasm_bindgen::to_value(&eyecensor::FaceLandmarks::new(points)).unwrap()
}

fn get_f64(obj: &JsValue, key: &str) -> f64 {
    js_sys::Reflect::get(obj, &JsValue::from_str(key))
        .unwrap()
        .as_f64()
        .unwrap()
}

#[wasm_bindgen_test]
fn censor_with_landmarks_draws_bar() {
    let png = make_test_png(300, 200);
    let result = censor(png.clone(), make_landmarks(), JsValue::NULL).unwrap();

    assert_eq!(get_f64(&result, "width") as u32, 300);
    assert_eq!(get_f64(&result, "height") as u32, 200);
    assert_eq!(get_f64(&result, "originalSize") as usize, png.len());

    let bar = js_sys::Reflect::get(&result, &JsValue::from_str("censor")).unwrap();
    assert!(!bar.is_null());
    assert_eq!(get_f64(&bar, "angle"), 0.0);
    assert!(get_f64(&bar, "width") > 0.0);
}

#[wasm_bindgen_test]
fn censor_without_landmarks_passes_through() {
    let png = make_test_png(120, 80);
    let result = censor(png, JsValue::NULL, JsValue::NULL).unwrap();

    let bar = js_sys::Reflect::get(&result, &JsValue::from_str("censor")).unwrap();
    assert!(bar.is_null());

    let data = js_sys::Reflect::get(&result, &JsValue::from_str("data")).unwrap();
    let data: js_sys::Uint8Array = data.dyn_into().unwrap();
    let data = data.to_vec();
    assert!(!data.is_empty());
    // PNG magic
    assert_eq!(&data[0..4], &[0x89, b'P', b'N', b'G']);
}

#[wasm_bindgen_test]
fn jpeg_format_option_is_applied() {
    let png = make_test_png(120, 80);
    let options = js_sys::Object::new();
    js_sys::Reflect::set(
        &options,
        &JsValue::from_str("format"),
        &JsValue::from_str("jpeg"),
    )
    .unwrap();
    let result = censor(png, JsValue::NULL, options.into()).unwrap();

    let data = js_sys::Reflect::get(&result, &JsValue::from_str("data")).unwrap();
    let data: js_sys::Uint8Array = data.dyn_into().unwrap();
    let data = data.to_vec();
    assert_eq!(data[0], 0xFF);
    assert_eq!(data[1], 0xD8);
}

#[wasm_bindgen_test]
fn unknown_format_is_rejected() {
    let png = make_test_png(32, 32);
    let options = js_sys::Object::new();
    js_sys::Reflect::set(
        &options,
        &JsValue::from_str("format"),
        &JsValue::from_str("gif"),
    )
    .unwrap();
    assert!(censor(png, JsValue::NULL, options.into()).is_err());
}

#[wasm_bindgen_test]
fn invalid_input_returns_error() {
    let result = censor(b"not an image".to_vec(), JsValue::NULL, JsValue::NULL);
    assert!(result.is_err());
}

#[wasm_bindgen_test]
fn censor_bar_computes_geometry_only() {
    let bar = censor_bar(make_landmarks()).unwrap();
    assert_eq!(get_f64(&bar, "angle"), 0.0);
    assert_eq!(get_f64(&bar, "width") as u32, 160);
    assert_eq!(get_f64(&bar, "centerX") as u32, 150);
}

#[wasm_bindgen_test]
fn censor_bar_requires_landmarks() {
    assert!(censor_bar(JsValue::NULL).is_err());
}

#[wasm_bindgen_test]
fn short_landmark_array_is_rejected() {
    let points = vec![eyecensor::Point::new(0.0, 0.0); 10];
    let landmarks =
        serde_wasm_bindgen::to_value(&eyecensor::FaceLandmarks::new(points)).unwrap();
    let png = make_test_png(64, 64);
    assert!(censor(png, landmarks, JsValue::NULL).is_err());
}
