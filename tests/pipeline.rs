use approx::assert_relative_eq;
use face_orient::fake::FixedEyeDetector;
use face_orient::{
    rotate_quarter, BlobEyeDetector, FaceDetection, FaceDetector, FineAngle,
    OrientationPipeline, QuarterTurn, Rect,
};
use image::{DynamicImage, GrayImage, Rgb, RgbImage};

/// Sees a full-frame face only when the top-left corner carries the bright marker
struct MarkerFaceDetector;

impl FaceDetector for MarkerFaceDetector {
    fn detect_faces(&self, gray: &GrayImage) -> Vec<FaceDetection> {
        let (width, height) = gray.dimensions();
        let marked = (0..4).all(|y| (0..4).all(|x| gray.get_pixel(x, y)[0] >= 250));
        if marked {
            vec![FaceDetection::new(Rect::new(0, 0, width, height), 12.0)]
        } else {
            Vec::new()
        }
    }
}

fn fill(img: &mut RgbImage, rect: Rect, color: Rgb<u8>) {
    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            img.put_pixel(x, y, color);
        }
    }
}

/// Upright synthetic face: grey skin, marker in the top-left, two dark eyes
fn upright_face(left_eye: Rect, right_eye: Rect) -> RgbImage {
    let mut img = RgbImage::from_pixel(100, 100, Rgb([200, 200, 200]));
    fill(&mut img, Rect::new(0, 0, 4, 4), Rgb([255, 255, 255]));
    fill(&mut img, left_eye, Rgb([20, 20, 20]));
    fill(&mut img, right_eye, Rgb([20, 20, 20]));
    img
}

#[test]
fn upright_face_with_level_eyes_needs_no_correction() {
    let img = DynamicImage::ImageRgb8(upright_face(
        Rect::new(20, 30, 16, 12),
        Rect::new(62, 30, 16, 12),
    ));
    let pipeline = OrientationPipeline::new(MarkerFaceDetector, BlobEyeDetector::default());
    let result = pipeline.run(&img);

    assert_eq!(result.coarse, QuarterTurn::R0);
    assert_relative_eq!(result.fine.angle().unwrap(), 0.0, epsilon = 0.5);
    assert_relative_eq!(result.final_angle.unwrap(), 0.0, epsilon = 0.5);
    assert_eq!(result.corrected.unwrap().dimensions(), (100, 100));
}

#[test]
fn tilted_eyes_give_clockwise_fine_angle() {
    // Centers (28, 36) and (70, 42)
    let img = DynamicImage::ImageRgb8(upright_face(
        Rect::new(20, 30, 16, 12),
        Rect::new(62, 36, 16, 12),
    ));
    let pipeline = OrientationPipeline::new(MarkerFaceDetector, BlobEyeDetector::default());
    let result = pipeline.run(&img);

    let expected = 6.0f64.atan2(42.0).to_degrees();
    assert_eq!(result.coarse, QuarterTurn::R0);
    assert_relative_eq!(result.fine.angle().unwrap(), expected, epsilon = 1e-9);
    assert_relative_eq!(result.final_angle.unwrap(), expected, epsilon = 1e-9);
}

#[test]
fn sideways_photo_is_found_by_counter_rotation() {
    let upright = DynamicImage::ImageRgb8(upright_face(
        Rect::new(20, 30, 16, 12),
        Rect::new(62, 30, 16, 12),
    ));
    let sideways = rotate_quarter(&upright, QuarterTurn::R90);

    let eyes = FixedEyeDetector::new(vec![Rect::new(20, 30, 16, 12), Rect::new(62, 30, 16, 12)]);
    let pipeline = OrientationPipeline::new(MarkerFaceDetector, eyes);
    let result = pipeline.run(&sideways);

    let best: Vec<_> = result.scores.iter().filter(|(_, s)| s.is_some()).collect();
    assert_eq!(best.len(), 1);
    assert_eq!(result.coarse, QuarterTurn::R270);
    assert_relative_eq!(result.final_angle.unwrap(), -90.0);
    assert!(result.corrected.is_some());
}

#[test]
fn faceless_photo_reports_upright_without_correction() {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 48, Rgb([90, 90, 90])));
    let pipeline = OrientationPipeline::new(MarkerFaceDetector, BlobEyeDetector::default());
    let result = pipeline.run(&img);

    assert_eq!(result.coarse, QuarterTurn::R0);
    assert!(result.scores.iter().all(|(_, s)| s.is_none()));
    assert_eq!(result.fine, FineAngle::NoFace);
    assert!(result.final_angle.is_none());
    assert!(result.corrected.is_none());
}
