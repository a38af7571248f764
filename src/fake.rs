//! Deterministic detectors for tests and dry runs.

use std::cell::Cell;

use image::GrayImage;

use crate::detection::{EyeDetector, FaceDetection, FaceDetector};
use crate::geometry::Rect;

/// Returns the same faces for every image
#[derive(Debug, Clone, Default)]
pub struct FixedFaceDetector {
    faces: Vec<FaceDetection>,
}

impl FixedFaceDetector {
    pub fn new(faces: Vec<FaceDetection>) -> Self {
        Self { faces }
    }
}

impl FaceDetector for FixedFaceDetector {
    fn detect_faces(&self, _gray: &GrayImage) -> Vec<FaceDetection> {
        self.faces.clone()
    }
}

/// Replays one scripted answer per call, then reports no faces
#[derive(Debug, Default)]
pub struct SequenceFaceDetector {
    answers: Vec<Vec<FaceDetection>>,
    calls: Cell<usize>,
}

impl SequenceFaceDetector {
    pub fn new(answers: Vec<Vec<FaceDetection>>) -> Self {
        Self {
            answers,
            calls: Cell::new(0),
        }
    }

    /// One full-frame face per call with the given score; `None` means no face
    pub fn from_scores(scores: &[Option<f64>]) -> Self {
        let answers = scores
            .iter()
            .map(|score| match score {
                Some(score) => vec![FaceDetection::new(Rect::new(0, 0, 1, 1), *score)],
                None => Vec::new(),
            })
            .collect();
        Self::new(answers)
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl FaceDetector for SequenceFaceDetector {
    fn detect_faces(&self, _gray: &GrayImage) -> Vec<FaceDetection> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        self.answers.get(call).cloned().unwrap_or_default()
    }
}

/// Returns the same eye rectangles for every face crop
#[derive(Debug, Clone, Default)]
pub struct FixedEyeDetector {
    eyes: Vec<Rect>,
}

impl FixedEyeDetector {
    pub fn new(eyes: Vec<Rect>) -> Self {
        Self { eyes }
    }
}

impl EyeDetector for FixedEyeDetector {
    fn detect_eyes(&self, _face: &GrayImage) -> Vec<Rect> {
        self.eyes.clone()
    }
}
