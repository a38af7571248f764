use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::GrayImage;

use crate::detection::{FaceDetection, FaceDetector};
use crate::error::{OrientationError, Result};
use crate::geometry::Rect;

/// Tuning knobs of [`RustfaceDetector`]
#[derive(Debug, Clone, Copy)]
pub struct FaceDetectorConfig {
    /// Smallest face side in pixels (SeetaFace requires at least 20)
    pub min_face_size: u32,
    /// Ratio between consecutive pyramid levels, greater than 1
    pub scale_factor: f32,
    /// Minimum classifier score for a window to count as a face
    pub score_threshold: f64,
    /// Sliding window step in pixels, both axes
    pub window_step: u32,
}

impl Default for FaceDetectorConfig {
    fn default() -> Self {
        Self {
            min_face_size: 30,
            scale_factor: 1.1,
            score_threshold: 2.0,
            window_step: 4,
        }
    }
}

impl FaceDetectorConfig {
    /// Pyramid factor in the form SeetaFace expects (shrink per level, in 0.01..=0.99)
    pub fn pyramid_scale_factor(&self) -> f32 {
        (1.0 / self.scale_factor).clamp(0.01, 0.99)
    }
}

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// The model is read once; each call builds a detector from a clone of it.
pub struct RustfaceDetector {
    model: rustface::Model,
    config: FaceDetectorConfig,
}

impl RustfaceDetector {
    pub fn from_path(path: &Path, config: FaceDetectorConfig) -> Result<Self> {
        let file = File::open(path).map_err(|source| OrientationError::ModelLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let model =
            rustface::read_model(BufReader::new(file)).map_err(|source| OrientationError::ModelLoad {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!("Loaded SeetaFace model from {:?}", path);
        Ok(Self { model, config })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect_faces(&self, gray: &GrayImage) -> Vec<FaceDetection> {
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(self.config.min_face_size.max(20));
        detector.set_score_thresh(self.config.score_threshold);
        detector.set_pyramid_scale_factor(self.config.pyramid_scale_factor());
        detector.set_slide_window_step(self.config.window_step, self.config.window_step);

        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));

        faces
            .iter()
            .filter_map(|face| {
                let bbox = face.bbox();
                let bounds = Rect::clamped(
                    bbox.x() as i64,
                    bbox.y() as i64,
                    bbox.width() as i64,
                    bbox.height() as i64,
                    (width, height),
                )?;
                Some(FaceDetection::new(bounds, face.score()))
            })
            .collect()
    }
}
