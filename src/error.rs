use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures of the orientation pipeline.
///
/// A missing face or a missing eye pair is not an error; see
/// [`crate::eye_angle::FineAngle`].
#[derive(Debug, Error)]
pub enum OrientationError {
    #[error("cannot load image {path:?}: {source}")]
    LoadFailure {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("rotation must be one of 0, 90, 180, 270 degrees, got {0}")]
    InvalidRotationAngle(i32),

    #[error("cannot read face model {path:?}: {source}")]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot save image {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, OrientationError>;
