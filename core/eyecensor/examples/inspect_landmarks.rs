//! Print the eye geometry a landmarks dump would produce.
//!
//! Usage:
//!   cargo run --example inspect_landmarks -- landmarks.json

use eyecensor::{CensorBar, FaceLandmarks, LEFT_EYE_CONTOUR, RIGHT_EYE_CONTOUR};

fn print_eye(name: &str, landmarks: &FaceLandmarks, indices: &[usize]) {
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for &index in indices {
        let p = landmarks
            .get(index)
            .unwrap_or_else(|| panic!("landmark {index} missing from dump"));
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    println!(
        "  {name}: bbox [{min_x:.1}, {max_x:.1}] x [{min_y:.1}, {max_y:.1}], \
         center ({:.1}, {:.1})",
        (min_x + max_x) / 2.0,
        (min_y + max_y) / 2.0,
    );
}

fn main() {
    let path = std::env::args().nth(1).unwrap_or_else(|| {
        eprintln!("usage: inspect_landmarks <landmarks.json>");
        std::process::exit(2);
    });

    let bytes = std::fs::read(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"));
    let landmarks: FaceLandmarks =
        serde_json::from_slice(&bytes).unwrap_or_else(|e| panic!("failed to parse {path}: {e}"));

    println!("=== {path} ({} keypoints) ===", landmarks.len());
    print_eye("right eye", &landmarks, &RIGHT_EYE_CONTOUR);
    print_eye("left eye", &landmarks, &LEFT_EYE_CONTOUR);

    match CensorBar::from_landmarks(&landmarks, &RIGHT_EYE_CONTOUR, &LEFT_EYE_CONTOUR) {
        Ok(bar) => {
            println!(
                "  bar: {:.1}x{:.1} at ({:.1}, {:.1}), angle {:.3} rad ({:.1} deg)",
                bar.width,
                bar.height,
                bar.center.x,
                bar.center.y,
                bar.angle,
                bar.angle.to_degrees(),
            );
            let corners = bar.corners();
            for (i, c) in corners.iter().enumerate() {
                println!("    corner {i}: ({:.1}, {:.1})", c.x, c.y);
            }
        }
        Err(e) => println!("  bar: {e}"),
    }
}
