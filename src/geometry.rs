use nalgebra::Matrix3;

/// Axis-aligned region in pixel coordinates of the image it was detected in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Clamp a signed detector box to `bounds` (width, height).
    /// Returns `None` when nothing of the box is left inside the image.
    pub fn clamped(x: i64, y: i64, width: i64, height: i64, bounds: (u32, u32)) -> Option<Self> {
        let (max_w, max_h) = (bounds.0 as i64, bounds.1 as i64);
        let x0 = x.clamp(0, max_w);
        let y0 = y.clamp(0, max_h);
        let x1 = (x + width).clamp(0, max_w);
        let y1 = (y + height).clamp(0, max_h);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(Self::new(x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
    }
}

/// Center of an eye region in global image coordinates, weighted by area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeCenter {
    pub x: i64,
    pub y: i64,
    pub area: u64,
}

impl EyeCenter {
    /// Center of `eye` (relative to `face`) in the coordinates of the image `face` came from.
    /// Half extents use integer division.
    pub fn from_regions(face: &Rect, eye: &Rect) -> Self {
        Self {
            x: face.x as i64 + eye.x as i64 + (eye.width / 2) as i64,
            y: face.y as i64 + eye.y as i64 + (eye.height / 2) as i64,
            area: eye.area(),
        }
    }
}

/// Normalize an angle in degrees into (-180, 180].
///
/// -180 maps to 180.
pub fn normalize_angle(degrees: f64) -> f64 {
    let mut angle = degrees;
    while angle > 180.0 {
        angle -= 360.0;
    }
    while angle <= -180.0 {
        angle += 360.0;
    }
    angle
}

/// Combine the coarse quarter-turn and the fine eye-line angle into one correction
pub fn compose_angles(coarse_degrees: f64, fine_degrees: f64) -> f64 {
    normalize_angle(coarse_degrees + fine_degrees)
}

/// Forward affine matrix rotating about `center` by `angle_degrees`.
///
/// Positive angles rotate counter-clockwise as seen on screen (y axis pointing down).
pub fn rotation_matrix(center: (f64, f64), angle_degrees: f64, scale: f64) -> Matrix3<f64> {
    let theta = angle_degrees.to_radians();
    let alpha = scale * theta.cos();
    let beta = scale * theta.sin();
    let (cx, cy) = center;

    Matrix3::new(
        alpha, beta, (1.0 - alpha) * cx - beta * cy,
        -beta, alpha, beta * cx + (1.0 - alpha) * cy,
        0.0, 0.0, 1.0,
    )
}

/// Transform a point using the affine matrix
pub fn transform_point(matrix: &Matrix3<f64>, x: f64, y: f64) -> (f64, f64) {
    let p = nalgebra::Vector3::new(x, y, 1.0);
    let result = matrix * p;
    (result.x / result.z, result.y / result.z)
}
