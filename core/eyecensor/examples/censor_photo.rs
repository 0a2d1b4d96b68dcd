//! Censor the eyes in a photo using a landmarks dump.
//!
//! Usage:
//!   cargo run --example censor_photo -- photo.png landmarks.json censored.png
//!
//! `landmarks.json` is an array of `{x, y}` keypoints in pixel coordinates,
//! as dumped from a FaceMesh-topology detector.

use eyecensor::{EyeCensor, FaceLandmarks, OutputFormat};

fn main() {
    let mut args = std::env::args().skip(1);
    let (photo_path, landmarks_path, output_path) = match (args.next(), args.next(), args.next()) {
        (Some(a), Some(b), Some(c)) => (a, b, c),
        _ => {
            eprintln!("usage: censor_photo <photo> <landmarks.json> <output>");
            std::process::exit(2);
        }
    };

    let photo = std::fs::read(&photo_path)
        .unwrap_or_else(|e| panic!("failed to read {photo_path}: {e}"));
    let landmarks_bytes = std::fs::read(&landmarks_path)
        .unwrap_or_else(|e| panic!("failed to read {landmarks_path}: {e}"));
    let landmarks: FaceLandmarks = serde_json::from_slice(&landmarks_bytes)
        .unwrap_or_else(|e| panic!("failed to parse {landmarks_path}: {e}"));

    let format = if output_path.ends_with(".jpg") || output_path.ends_with(".jpeg") {
        OutputFormat::Jpeg
    } else {
        OutputFormat::Png
    };

    let result = EyeCensor::new(photo)
        .unwrap()
        .landmarks(landmarks)
        .format(format)
        .censor()
        .expect("censoring failed");

    std::fs::write(&output_path, &result.data).unwrap();

    match result.censor {
        Some(bar) => println!(
            "{output_path}: {width}x{height}, bar {bw:.0}x{bh:.0} at ({cx:.0}, {cy:.0}), \
             angle {angle:.3} rad, {size} bytes",
            width = result.width,
            height = result.height,
            bw = bar.width,
            bh = bar.height,
            cx = bar.center.x,
            cy = bar.center.y,
            angle = bar.angle,
            size = result.data.len(),
        ),
        None => println!(
            "{output_path}: {width}x{height}, no censoring applied, {size} bytes",
            width = result.width,
            height = result.height,
            size = result.data.len(),
        ),
    }
}
