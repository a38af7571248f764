use std::collections::BTreeMap;

use image::{imageops, GrayImage, Luma, RgbImage};
use imageproc::contrast::otsu_level;
use imageproc::region_labelling::{connected_components, Connectivity};

use crate::geometry::Rect;

/// A detected face with the detector's confidence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceDetection {
    pub bounds: Rect,
    pub score: f64,
}

impl FaceDetection {
    pub fn new(bounds: Rect, score: f64) -> Self {
        Self { bounds, score }
    }
}

/// Face detection capability.
///
/// Implementations return faces in their own native order and clamp every
/// box to the image. Tuning knobs live on the implementing type.
pub trait FaceDetector {
    fn detect_faces(&self, gray: &GrayImage) -> Vec<FaceDetection>;
}

/// Eye detection inside a face crop. Rectangles are relative to the crop.
pub trait EyeDetector {
    fn detect_eyes(&self, face: &GrayImage) -> Vec<Rect>;
}

/// Convert an RGB image to grayscale with the 0.299/0.587/0.114 weights
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut gray = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let pixel = img.get_pixel(x, y);
            let luma = (0.299 * pixel[0] as f64 + 0.587 * pixel[1] as f64 + 0.114 * pixel[2] as f64)
                .round()
                .clamp(0.0, 255.0) as u8;
            gray.put_pixel(x, y, Luma([luma]));
        }
    }

    gray
}

/// Copy the region `rect` out of `gray`
pub fn crop_region(gray: &GrayImage, rect: &Rect) -> GrayImage {
    imageops::crop_imm(gray, rect.x, rect.y, rect.width, rect.height).to_image()
}

/// Highest confidence among `faces`, `None` when there are none.
///
/// `None` orders below every confidence, negative ones included.
pub fn best_score(faces: &[FaceDetection]) -> Option<f64> {
    faces.iter().map(|f| f.score).reduce(f64::max)
}

/// Sensitivity of [`BlobEyeDetector`]
#[derive(Debug, Clone, Copy)]
pub struct EyeDetectorConfig {
    /// Minimum eye width and height in pixels
    pub min_eye_size: u32,
    /// Maximum eye width (height) as a fraction of the face width (height)
    pub max_eye_fraction: f64,
    /// Top of the searched band as a fraction of the face height
    pub search_top: f64,
    /// Bottom of the searched band as a fraction of the face height
    pub search_bottom: f64,
}

impl Default for EyeDetectorConfig {
    fn default() -> Self {
        Self {
            min_eye_size: 10,
            max_eye_fraction: 0.4,
            search_top: 0.15,
            search_bottom: 0.6,
        }
    }
}

/// Finds eyes as dark blobs in the upper part of a face crop.
///
/// The band is binarized at its Otsu level, dark pixels are grouped into
/// 8-connected components and each component's bounding box is kept if its
/// size is plausible for an eye.
#[derive(Debug, Clone, Default)]
pub struct BlobEyeDetector {
    config: EyeDetectorConfig,
}

impl BlobEyeDetector {
    pub fn new(config: EyeDetectorConfig) -> Self {
        Self { config }
    }
}

impl EyeDetector for BlobEyeDetector {
    fn detect_eyes(&self, face: &GrayImage) -> Vec<Rect> {
        let (width, height) = face.dimensions();
        let top = (height as f64 * self.config.search_top) as u32;
        let bottom = ((height as f64 * self.config.search_bottom) as u32).min(height);
        if width == 0 || bottom <= top {
            return Vec::new();
        }

        let band = imageops::crop_imm(face, 0, top, width, bottom - top).to_image();
        let level = otsu_level(&band);
        let mut dark = GrayImage::new(band.width(), band.height());
        for (x, y, pixel) in band.enumerate_pixels() {
            if pixel[0] <= level {
                dark.put_pixel(x, y, Luma([255]));
            }
        }

        let labels = connected_components(&dark, Connectivity::Eight, Luma([0u8]));

        // label -> (min_x, min_y, max_x, max_y)
        let mut boxes: BTreeMap<u32, (u32, u32, u32, u32)> = BTreeMap::new();
        for (x, y, label) in labels.enumerate_pixels() {
            if label[0] == 0 {
                continue;
            }
            let entry = boxes.entry(label[0]).or_insert((x, y, x, y));
            entry.0 = entry.0.min(x);
            entry.1 = entry.1.min(y);
            entry.2 = entry.2.max(x);
            entry.3 = entry.3.max(y);
        }

        let max_w = width as f64 * self.config.max_eye_fraction;
        let max_h = height as f64 * self.config.max_eye_fraction;

        boxes
            .values()
            .map(|&(min_x, min_y, max_x, max_y)| {
                Rect::new(min_x, top + min_y, max_x - min_x + 1, max_y - min_y + 1)
            })
            .filter(|r| {
                r.width >= self.config.min_eye_size
                    && r.height >= self.config.min_eye_size
                    && r.width as f64 <= max_w
                    && r.height as f64 <= max_h
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn face_with_blobs(blobs: &[Rect]) -> GrayImage {
        let mut img = GrayImage::from_pixel(100, 100, Luma([230]));
        for blob in blobs {
            for y in blob.y..blob.y + blob.height {
                for x in blob.x..blob.x + blob.width {
                    img.put_pixel(x, y, Luma([20]));
                }
            }
        }
        img
    }

    #[test]
    fn test_grayscale_weights() {
        let img = RgbImage::from_pixel(2, 2, Rgb([255, 0, 0]));
        let gray = to_grayscale(&img);
        assert_eq!(gray.get_pixel(1, 1)[0], 76);

        let white = to_grayscale(&RgbImage::from_pixel(1, 1, Rgb([255, 255, 255])));
        assert_eq!(white.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn test_best_score_without_faces_is_none() {
        assert_eq!(best_score(&[]), None);
        let faces = [
            FaceDetection::new(Rect::new(0, 0, 10, 10), 3.5),
            FaceDetection::new(Rect::new(5, 5, 10, 10), 7.25),
        ];
        assert_eq!(best_score(&faces), Some(7.25));
    }

    #[test]
    fn test_best_score_keeps_negative_confidence() {
        let faces = [
            FaceDetection::new(Rect::new(0, 0, 10, 10), -2.0),
            FaceDetection::new(Rect::new(5, 5, 10, 10), -0.5),
        ];
        assert_eq!(best_score(&faces), Some(-0.5));
        assert!(best_score(&faces) > best_score(&[]));
    }

    #[test]
    fn test_crop_region() {
        let mut img = GrayImage::new(20, 20);
        img.put_pixel(12, 7, Luma([99]));
        let crop = crop_region(&img, &Rect::new(10, 5, 6, 4));
        assert_eq!(crop.dimensions(), (6, 4));
        assert_eq!(crop.get_pixel(2, 2)[0], 99);
    }

    #[test]
    fn test_blob_detector_finds_two_eyes() {
        let left = Rect::new(20, 30, 16, 11);
        let right = Rect::new(62, 34, 14, 10);
        let speck = Rect::new(48, 40, 3, 3);
        let face = face_with_blobs(&[left, right, speck]);

        let mut eyes = BlobEyeDetector::default().detect_eyes(&face);
        eyes.sort_by_key(|r| r.x);
        assert_eq!(eyes, vec![left, right]);
    }

    #[test]
    fn test_blob_detector_ignores_blobs_outside_band() {
        // Mouth-like blob in the lower part of the face
        let mouth = Rect::new(35, 75, 30, 12);
        let face = face_with_blobs(&[mouth]);
        assert!(BlobEyeDetector::default().detect_eyes(&face).is_empty());
    }

    #[test]
    fn test_blob_detector_on_tiny_crop() {
        let face = GrayImage::from_pixel(2, 1, Luma([128]));
        assert!(BlobEyeDetector::default().detect_eyes(&face).is_empty());
    }
}
