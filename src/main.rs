use anyhow::{Context, Result};
use clap::Parser;

use face_orient::{
    load_image, save_image, BlobEyeDetector, Cli, FineAngle, OrientationPipeline,
    RustfaceDetector, TiltDirection,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(default_filter));

    // Detectors are built once and reused for every candidate
    let face_detector = RustfaceDetector::from_path(&cli.model, cli.face_config())
        .context("Failed to load face detector")?;
    let pipeline = OrientationPipeline::new(face_detector, BlobEyeDetector::new(cli.eye_config()));

    let img = load_image(&cli.input).context("Failed to load input image")?;
    log::debug!("Loaded image: {:?} ({}x{})", cli.input, img.width(), img.height());

    if cli.tilt_only {
        match pipeline.tilt(&img) {
            FineAngle::Estimated(angle) => {
                println!("Face rotation angle: {:.2} degrees", angle);
                println!("{}", TiltDirection::classify(angle, cli.tolerance));
            }
            miss => println!("No tilt estimate: {}", miss),
        }
        return Ok(());
    }

    let result = pipeline.run(&img);

    for (turn, score) in &result.scores {
        match score {
            Some(score) => println!("Face detection score for {} degree rotation: {}", turn, score),
            None => println!("Face detection score for {} degree rotation: no face", turn),
        }
    }
    let best_score = result
        .scores
        .iter()
        .find(|(turn, _)| *turn == result.coarse)
        .and_then(|(_, score)| *score);
    if let Some(best_score) = best_score {
        println!();
        println!("Highest score: {}", best_score);
    }
    println!("Rotate {} degrees to face forward", result.coarse);

    let (final_angle, corrected) = match (result.final_angle, &result.corrected) {
        (Some(angle), Some(corrected)) => (angle, corrected),
        _ => {
            println!("No fine adjustment: {}", result.fine);
            println!("Are you perhaps wearing a mask?");
            return Ok(());
        }
    };

    if let FineAngle::Estimated(fine) = result.fine {
        println!();
        println!("=== Final Result ===");
        println!("Stage 1 rotation (rough front): {} degrees", result.coarse);
        println!("Stage 2 rotation (fine adjustment): {:.2} degrees", fine);
    }
    println!("Final rotation angle: {:.2} degrees", final_angle);
    println!(
        "Rotate the original image clockwise by {:.2} degrees to get a frontal face.",
        final_angle
    );

    let output_path = cli.output_path();
    save_image(corrected, &output_path).context("Failed to save corrected image")?;
    println!("Final corrected image saved as {:?}.", output_path);

    Ok(())
}
