use std::path::Path;

use image::{DynamicImage, ImageReader, RgbImage};

use crate::detection::{EyeDetector, FaceDetector};
use crate::error::{OrientationError, Result};
use crate::eye_angle::{EyeAngleEstimator, FineAngle};
use crate::geometry::compose_angles;
use crate::orientation::{OrientationSearch, QuarterTurn};
use crate::transform::apply_rotation;

/// Everything the two stages found out about one image
#[derive(Debug, Clone)]
pub struct OrientationResult {
    /// Quarter turn that best exposes the face
    pub coarse: QuarterTurn,
    /// Face score of every quarter turn, in search order; `None` where no face was found
    pub scores: Vec<(QuarterTurn, Option<f64>)>,
    pub fine: FineAngle,
    /// Clockwise correction in (-180, 180], present when the fine stage succeeded
    pub final_angle: Option<f64>,
    pub corrected: Option<RgbImage>,
}

/// Owns the detectors for the lifetime of the program
pub struct OrientationPipeline<F: FaceDetector, E: EyeDetector> {
    face_detector: F,
    eye_detector: E,
}

impl<F: FaceDetector, E: EyeDetector> OrientationPipeline<F, E> {
    pub fn new(face_detector: F, eye_detector: E) -> Self {
        Self {
            face_detector,
            eye_detector,
        }
    }

    /// Coarse search, fine estimate on the best view, then one resample of `original`
    pub fn run(&self, original: &DynamicImage) -> OrientationResult {
        let outcome = OrientationSearch::new(&self.face_detector).search(original);
        let coarse = outcome.best.turn;

        let fine = self.tilt(&outcome.best.image);
        let final_angle = fine
            .angle()
            .map(|angle| compose_angles(coarse.degrees() as f64, angle));

        let corrected = final_angle.map(|angle| {
            log::debug!("Resampling {}x{} image by {:.2}°", original.width(), original.height(), angle);
            apply_rotation(original, angle)
        });

        OrientationResult {
            coarse,
            scores: outcome.scores,
            fine,
            final_angle,
            corrected,
        }
    }

    /// Fine stage only, on `image` as given
    pub fn tilt(&self, image: &DynamicImage) -> FineAngle {
        EyeAngleEstimator::new(&self.face_detector, &self.eye_detector).estimate(image)
    }
}

pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let load_failure = |source| OrientationError::LoadFailure {
        path: path.to_path_buf(),
        source,
    };
    ImageReader::open(path)
        .map_err(|e| load_failure(image::ImageError::IoError(e)))?
        .decode()
        .map_err(load_failure)
}

pub fn save_image(image: &RgbImage, path: &Path) -> Result<()> {
    image.save(path).map_err(|source| OrientationError::Save {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::FaceDetection;
    use crate::fake::{FixedEyeDetector, FixedFaceDetector};
    use crate::geometry::Rect;
    use approx::assert_relative_eq;
    use image::Rgb;

    fn photo() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(120, 80, Rgb([90, 120, 150])))
    }

    #[test]
    fn test_level_eyes_keep_coarse_angle() {
        let faces = FixedFaceDetector::new(vec![FaceDetection::new(Rect::new(10, 10, 60, 60), 4.0)]);
        let eyes = FixedEyeDetector::new(vec![Rect::new(8, 15, 12, 10), Rect::new(38, 15, 12, 10)]);
        let result = OrientationPipeline::new(faces, eyes).run(&photo());

        assert_eq!(result.coarse, QuarterTurn::R0);
        assert_relative_eq!(result.fine.angle().unwrap(), 0.0);
        assert_relative_eq!(result.final_angle.unwrap(), 0.0);
        let corrected = result.corrected.unwrap();
        assert_eq!(corrected.dimensions(), (120, 80));
        assert_eq!(corrected, photo().to_rgb8());
    }

    #[test]
    fn test_missing_eyes_skip_correction() {
        let faces = FixedFaceDetector::new(vec![FaceDetection::new(Rect::new(10, 10, 60, 60), 4.0)]);
        let eyes = FixedEyeDetector::new(vec![Rect::new(8, 15, 12, 10)]);
        let result = OrientationPipeline::new(faces, eyes).run(&photo());

        assert_eq!(result.fine, FineAngle::InsufficientEyes { found: 1 });
        assert!(result.final_angle.is_none());
        assert!(result.corrected.is_none());
    }

    #[test]
    fn test_load_failure_names_path() {
        let err = load_image(Path::new("/nonexistent/photo.jpg")).unwrap_err();
        match err {
            OrientationError::LoadFailure { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/photo.jpg"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrected.png");
        let img = photo().to_rgb8();

        save_image(&img, &path).unwrap();
        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.to_rgb8(), img);
    }
}
