pub mod cli;
pub mod detection;
pub mod error;
pub mod eye_angle;
pub mod fake;
pub mod geometry;
pub mod orientation;
pub mod pipeline;
pub mod rustface_backend;
pub mod transform;

pub use cli::Cli;
pub use detection::{BlobEyeDetector, EyeDetector, EyeDetectorConfig, FaceDetection, FaceDetector};
pub use error::{OrientationError, Result};
pub use eye_angle::{EyeAngleEstimator, FineAngle, TiltDirection};
pub use geometry::{compose_angles, normalize_angle, EyeCenter, Rect};
pub use orientation::{CandidateRotation, OrientationSearch, QuarterTurn, SearchOutcome};
pub use pipeline::{load_image, save_image, OrientationPipeline, OrientationResult};
pub use rustface_backend::{FaceDetectorConfig, RustfaceDetector};
pub use transform::{apply_rotation, rotate_by_degrees, rotate_quarter};
