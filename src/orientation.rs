use std::fmt;

use image::DynamicImage;

use crate::detection::{best_score, to_grayscale, FaceDetector};
use crate::error::{OrientationError, Result};
use crate::transform::rotate_quarter;

/// Clockwise rotation by a multiple of 90 degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuarterTurn {
    R0,
    R90,
    R180,
    R270,
}

impl QuarterTurn {
    /// Search order; earlier entries win ties
    pub const ALL: [QuarterTurn; 4] = [
        QuarterTurn::R0,
        QuarterTurn::R90,
        QuarterTurn::R180,
        QuarterTurn::R270,
    ];

    pub fn from_degrees(degrees: i32) -> Result<Self> {
        match degrees {
            0 => Ok(QuarterTurn::R0),
            90 => Ok(QuarterTurn::R90),
            180 => Ok(QuarterTurn::R180),
            270 => Ok(QuarterTurn::R270),
            other => Err(OrientationError::InvalidRotationAngle(other)),
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            QuarterTurn::R0 => 0,
            QuarterTurn::R90 => 90,
            QuarterTurn::R180 => 180,
            QuarterTurn::R270 => 270,
        }
    }

    /// The turn that undoes this one
    pub fn inverse(self) -> Self {
        match self {
            QuarterTurn::R0 => QuarterTurn::R0,
            QuarterTurn::R90 => QuarterTurn::R270,
            QuarterTurn::R180 => QuarterTurn::R180,
            QuarterTurn::R270 => QuarterTurn::R90,
        }
    }
}

impl fmt::Display for QuarterTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// One rotated view of the source image and how strongly it shows a face
#[derive(Debug, Clone)]
pub struct CandidateRotation {
    pub turn: QuarterTurn,
    pub image: DynamicImage,
    /// Best face confidence, `None` when no face was found
    pub score: Option<f64>,
}

/// Result of the coarse search
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: CandidateRotation,
    /// Score of every candidate, in search order
    pub scores: Vec<(QuarterTurn, Option<f64>)>,
}

/// Coarse stage: tries the four quarter turns and keeps the one the face detector likes most
pub struct OrientationSearch<'a, F: FaceDetector> {
    detector: &'a F,
}

impl<'a, F: FaceDetector> OrientationSearch<'a, F> {
    pub fn new(detector: &'a F) -> Self {
        Self { detector }
    }

    /// Score of one view: highest face confidence, `None` without faces
    pub fn score(&self, image: &DynamicImage) -> Option<f64> {
        let gray = to_grayscale(&image.to_rgb8());
        best_score(&self.detector.detect_faces(&gray))
    }

    fn evaluate(&self, image: &DynamicImage, turn: QuarterTurn) -> CandidateRotation {
        let rotated = rotate_quarter(image, turn);
        let score = self.score(&rotated);
        log::debug!("Face score for {} degree rotation: {:?}", turn, score);
        CandidateRotation {
            turn,
            image: rotated,
            score,
        }
    }

    /// Evaluate every quarter turn in order and keep the first one with the highest score
    pub fn search(&self, image: &DynamicImage) -> SearchOutcome {
        let mut best = self.evaluate(image, QuarterTurn::R0);
        let mut scores = vec![(best.turn, best.score)];

        for &turn in &QuarterTurn::ALL[1..] {
            let candidate = self.evaluate(image, turn);
            scores.push((candidate.turn, candidate.score));
            // Strictly greater keeps the earlier candidate on ties; None is below any score
            if candidate.score > best.score {
                best = candidate;
            }
        }

        log::debug!("Best coarse rotation: {} degrees (score {:?})", best.turn, best.score);
        SearchOutcome { best, scores }
    }
}
