use std::fmt;

use image::DynamicImage;

use crate::detection::{crop_region, to_grayscale, EyeDetector, FaceDetector};
use crate::geometry::EyeCenter;

/// Outcome of the fine stage. Missing a face or an eye is a value, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FineAngle {
    /// Eye-line tilt in degrees; positive when the right eye is lower
    Estimated(f64),
    NoFace,
    InsufficientEyes { found: usize },
}

impl FineAngle {
    pub fn angle(&self) -> Option<f64> {
        match self {
            FineAngle::Estimated(angle) => Some(*angle),
            _ => None,
        }
    }
}

impl fmt::Display for FineAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FineAngle::Estimated(angle) => write!(f, "{:.2}°", angle),
            FineAngle::NoFace => write!(f, "no face found"),
            FineAngle::InsufficientEyes { found } => {
                write!(f, "cannot find two eyes (found {})", found)
            }
        }
    }
}

/// Which way a face leans, going by its eye line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltDirection {
    Level,
    Clockwise,
    CounterClockwise,
}

impl TiltDirection {
    pub const DEFAULT_TOLERANCE: f64 = 5.0;

    pub fn classify(angle: f64, tolerance: f64) -> Self {
        if angle.abs() < tolerance {
            TiltDirection::Level
        } else if angle > 0.0 {
            TiltDirection::Clockwise
        } else {
            TiltDirection::CounterClockwise
        }
    }
}

impl fmt::Display for TiltDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TiltDirection::Level => "Face is almost horizontal.",
            TiltDirection::Clockwise => "Face is tilted clockwise.",
            TiltDirection::CounterClockwise => "Face is tilted counterclockwise.",
        };
        f.write_str(text)
    }
}

/// Choose the two largest eyes and order them as (left, right).
///
/// Ranking is a stable sort on area, so equal areas keep detection order.
/// Left is the one with the smaller x.
pub fn select_eye_pair(mut centers: Vec<EyeCenter>) -> Option<(EyeCenter, EyeCenter)> {
    centers.sort_by(|a, b| b.area.cmp(&a.area));
    let (mut left, mut right) = match centers.as_slice() {
        [first, second, ..] => (*first, *second),
        _ => return None,
    };
    if left.x > right.x {
        std::mem::swap(&mut left, &mut right);
    }
    Some((left, right))
}

/// Angle of the line from `left` to `right` in degrees
pub fn eye_line_angle(left: &EyeCenter, right: &EyeCenter) -> f64 {
    let delta_x = (right.x - left.x) as f64;
    let delta_y = (right.y - left.y) as f64;
    delta_y.atan2(delta_x).to_degrees()
}

/// Fine stage: tilt of the first detected face, measured from its two largest eyes
pub struct EyeAngleEstimator<'a, F: FaceDetector, E: EyeDetector> {
    faces: &'a F,
    eyes: &'a E,
}

impl<'a, F: FaceDetector, E: EyeDetector> EyeAngleEstimator<'a, F, E> {
    pub fn new(faces: &'a F, eyes: &'a E) -> Self {
        Self { faces, eyes }
    }

    pub fn estimate(&self, image: &DynamicImage) -> FineAngle {
        let gray = to_grayscale(&image.to_rgb8());

        // Detector order is kept; with several faces the first one is used
        let faces = self.faces.detect_faces(&gray);
        let face = match faces.first() {
            Some(face) => face.bounds,
            None => {
                log::info!("No face found.");
                return FineAngle::NoFace;
            }
        };

        let roi = crop_region(&gray, &face);
        let eyes = self.eyes.detect_eyes(&roi);
        let centers: Vec<EyeCenter> = eyes
            .iter()
            .map(|eye| EyeCenter::from_regions(&face, eye))
            .collect();

        let Some((left, right)) = select_eye_pair(centers) else {
            log::info!("Cannot find two eyes (found {}).", eyes.len());
            return FineAngle::InsufficientEyes { found: eyes.len() };
        };

        let angle = eye_line_angle(&left, &right);
        log::debug!(
            "Eyes at ({}, {}) and ({}, {}): {:.2}°",
            left.x,
            left.y,
            right.x,
            right.y,
            angle
        );
        FineAngle::Estimated(angle)
    }
}
