use image::{DynamicImage, Rgb, RgbImage};
use nalgebra::Matrix3;

use crate::error::Result;
use crate::geometry::{rotation_matrix, transform_point};
use crate::orientation::QuarterTurn;

/// Rotate by an exact multiple of 90 degrees clockwise. No resampling, 90 and 270 swap axes.
pub fn rotate_quarter(img: &DynamicImage, turn: QuarterTurn) -> DynamicImage {
    match turn {
        QuarterTurn::R0 => img.clone(),
        QuarterTurn::R90 => img.rotate90(),
        QuarterTurn::R180 => img.rotate180(),
        QuarterTurn::R270 => img.rotate270(),
    }
}

/// Like [`rotate_quarter`] but takes degrees; anything outside {0, 90, 180, 270} is rejected
pub fn rotate_by_degrees(img: &DynamicImage, degrees: i32) -> Result<DynamicImage> {
    let turn = QuarterTurn::from_degrees(degrees)?;
    Ok(rotate_quarter(img, turn))
}

/// Bilinear interpolation with a constant border: taps outside the source read `fill`
fn bilinear_interpolate(img: &RgbImage, x: f64, y: f64, fill: [f64; 3]) -> [f64; 3] {
    let (width, height) = img.dimensions();
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let x1 = x0 + 1;
    let y1 = y0 + 1;

    let x_frac = x - x.floor();
    let y_frac = y - y.floor();

    let get_pixel = |px: i64, py: i64| -> [f64; 3] {
        if px < 0 || py < 0 || px >= width as i64 || py >= height as i64 {
            return fill;
        }
        let p = img.get_pixel(px as u32, py as u32);
        [p[0] as f64, p[1] as f64, p[2] as f64]
    };

    let p00 = get_pixel(x0, y0);
    let p10 = get_pixel(x1, y0);
    let p01 = get_pixel(x0, y1);
    let p11 = get_pixel(x1, y1);

    let mut result = [0.0; 3];
    for c in 0..3 {
        let top = p00[c] * (1.0 - x_frac) + p10[c] * x_frac;
        let bottom = p01[c] * (1.0 - x_frac) + p11[c] * x_frac;
        result[c] = top * (1.0 - y_frac) + bottom * y_frac;
    }

    result
}

/// Apply a forward affine matrix by inverse mapping into an output of the same size.
///
/// Destination pixels whose source falls outside the image are set to `fill`.
fn warp_affine(img: &RgbImage, forward_matrix: &Matrix3<f64>, fill: Rgb<u8>) -> RgbImage {
    let (width, height) = img.dimensions();

    let inverse_matrix = match forward_matrix.try_inverse() {
        Some(inv) => inv,
        None => {
            log::warn!("Could not invert transform matrix, returning original image");
            return img.clone();
        }
    };

    let fill_f = [fill[0] as f64, fill[1] as f64, fill[2] as f64];
    let mut output = RgbImage::from_pixel(width, height, fill);

    for out_y in 0..height {
        for out_x in 0..width {
            let (src_x, src_y) = transform_point(&inverse_matrix, out_x as f64, out_y as f64);

            // Beyond one pixel outside, every tap is border
            if src_x <= -1.0 || src_y <= -1.0 || src_x >= width as f64 || src_y >= height as f64 {
                continue;
            }

            let value = bilinear_interpolate(img, src_x, src_y, fill_f);
            output.put_pixel(
                out_x,
                out_y,
                Rgb([
                    value[0].round().clamp(0.0, 255.0) as u8,
                    value[1].round().clamp(0.0, 255.0) as u8,
                    value[2].round().clamp(0.0, 255.0) as u8,
                ]),
            );
        }
    }

    output
}

/// Rotate `original` clockwise by `final_angle` degrees about its center.
///
/// Output keeps the input dimensions; uncovered corners are black.
pub fn apply_rotation(original: &DynamicImage, final_angle: f64) -> RgbImage {
    let rgb = original.to_rgb8();
    let (width, height) = rgb.dimensions();
    let center = ((width / 2) as f64, (height / 2) as f64);

    // Clockwise on screen is a negative angle for the matrix
    let matrix = rotation_matrix(center, -final_angle, 1.0);
    warp_affine(&rgb, &matrix, Rgb([0, 0, 0]))
}
