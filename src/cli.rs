use clap::Parser;
use std::path::PathBuf;

use crate::detection::EyeDetectorConfig;
use crate::rustface_backend::FaceDetectorConfig;

pub const DEFAULT_OUTPUT: &str = "final_corrected_image.jpg";

#[derive(Parser, Debug)]
#[command(name = "face-orient")]
#[command(version, about = "Estimate and correct the rotation of a face photo")]
pub struct Cli {
    /// Input image path
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output path [default: final_corrected_image.jpg]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// SeetaFace frontal face model
    #[arg(short, long, default_value = "model/seeta_fd_frontal_v1.0.bin")]
    pub model: PathBuf,

    /// Only measure the eye-line tilt of the input as given
    #[arg(long)]
    pub tilt_only: bool,

    /// Tilt below this many degrees counts as level
    #[arg(long, default_value = "5.0")]
    pub tolerance: f64,

    /// Smallest face side in pixels
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u32).range(20..))]
    pub min_face: u32,

    /// Smallest eye side in pixels
    #[arg(long, default_value = "10")]
    pub min_eye: u32,

    /// Show detection details
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }

    pub fn face_config(&self) -> FaceDetectorConfig {
        FaceDetectorConfig {
            min_face_size: self.min_face,
            ..FaceDetectorConfig::default()
        }
    }

    pub fn eye_config(&self) -> EyeDetectorConfig {
        EyeDetectorConfig {
            min_eye_size: self.min_eye,
            ..EyeDetectorConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["face-orient", "photo.jpg"]).unwrap();
        assert_eq!(cli.output_path(), PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(cli.face_config().min_face_size, 30);
        assert_eq!(cli.eye_config().min_eye_size, 10);
        assert!(!cli.tilt_only);
    }

    #[test]
    fn test_rejects_face_size_below_model_window() {
        assert!(Cli::try_parse_from(["face-orient", "photo.jpg", "--min-face", "12"]).is_err());
    }
}
