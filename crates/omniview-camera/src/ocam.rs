use std::{path::Path, str::FromStr};

use glam::{DVec2, DVec3};

use crate::projection::{CameraToWorld, LoadCalibration, WorldToCamera};

/// Error types for the omnidirectional calibration reader.
#[derive(Debug, thiserror::Error)]
pub enum CalibrationError {
    /// Error reading the calibration file
    #[error("error reading calibration file: {0}")]
    IoError(#[from] std::io::Error),

    /// A value could not be parsed
    #[error("Parse error {0}")]
    ParseError(String),

    /// The file ended before the named section
    #[error("Missing calibration section: {0}")]
    MissingSection(&'static str),

    /// A polynomial line declares a different number of coefficients than it holds
    #[error("Invalid polynomial: declared {declared} coefficients, found {found}")]
    InvalidPolynomial {
        /// The declared number of coefficients.
        declared: usize,
        /// The number of coefficients on the line.
        found: usize,
    },

    /// The affine parameters are not invertible
    #[error("Singular affine parameters c={0} d={1} e={2}")]
    SingularAffine(f64, f64, f64),
}

/// Omnidirectional camera model with polynomial projection (Scaramuzza's OCamCalib).
///
/// The sensor plane point at distance `r` from the distortion center lifts to
/// the ray `(x, y, pol(r))`; the inverse polynomial `invpol` maps the
/// elevation angle of a ray to its distance `rho` from the center. The sensor
/// plane is related to pixels by the affine matrix `[c d; e 1]`.
///
/// Internally the model keeps OCamCalib's axes (x along rows, y along columns,
/// z pointing away from the scene). The public API uses z-forward rays and
/// `(u, v) = (column, row)` pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct OcamModel {
    /// Coefficients of the direct mapping, lowest degree first.
    pub pol: Vec<f64>,
    /// Coefficients of the inverse mapping, lowest degree first.
    pub invpol: Vec<f64>,
    /// Row of the distortion center in pixels.
    pub center_row: f64,
    /// Column of the distortion center in pixels.
    pub center_col: f64,
    /// Affine parameter `c`.
    pub c: f64,
    /// Affine parameter `d`.
    pub d: f64,
    /// Affine parameter `e`.
    pub e: f64,
    /// Image height in pixels.
    pub height: usize,
    /// Image width in pixels.
    pub width: usize,
}

impl OcamModel {
    /// Parse the contents of an OCamCalib `calib.txt` file.
    ///
    /// Lines starting with `#` and blank lines are skipped. The remaining lines
    /// hold, in order: the direct polynomial (`n a0 .. an-1`), the inverse
    /// polynomial (`n b0 .. bn-1`), the center (`row col`), the affine
    /// parameters (`c d e`) and the image size (`height width`).
    pub fn parse(contents: &str) -> Result<Self, CalibrationError> {
        let mut lines = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));

        let mut section = |name: &'static str| {
            lines
                .next()
                .map(|line| line.split_whitespace().collect::<Vec<_>>())
                .ok_or(CalibrationError::MissingSection(name))
        };

        let pol = parse_polynomial(&section("direct polynomial")?)?;
        let invpol = parse_polynomial(&section("inverse polynomial")?)?;
        let [center_row, center_col] = parse_values::<f64, 2>(&section("center")?)?;
        let [c, d, e] = parse_values::<f64, 3>(&section("affine parameters")?)?;
        let [height, width] = parse_values::<usize, 2>(&section("image size")?)?;

        if (c - d * e).abs() < f64::EPSILON {
            return Err(CalibrationError::SingularAffine(c, d, e));
        }

        Ok(Self {
            pol,
            invpol,
            center_row,
            center_col,
            c,
            d,
            e,
            height,
            width,
        })
    }

    /// The calibrated image size as `(width, height)`.
    pub fn image_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Project a ray given in OCamCalib axes, returning `(row, col)`.
    fn world2cam(&self, p: DVec3) -> DVec2 {
        let norm = (p.x * p.x + p.y * p.y).sqrt();
        if norm == 0.0 {
            return DVec2::new(self.center_row, self.center_col);
        }

        let theta = (p.z / norm).atan();
        let rho = horner(&self.invpol, theta);

        let x = p.x / norm * rho;
        let y = p.y / norm * rho;

        DVec2::new(
            x * self.c + y * self.d + self.center_row,
            x * self.e + y + self.center_col,
        )
    }

    /// Lift a `(row, col)` pixel to a unit ray in OCamCalib axes.
    fn cam2world(&self, p: DVec2) -> DVec3 {
        let invdet = 1.0 / (self.c - self.d * self.e);
        let (dr, dc) = (p.x - self.center_row, p.y - self.center_col);

        let xp = invdet * (dr - self.d * dc);
        let yp = invdet * (-self.e * dr + self.c * dc);

        let r = (xp * xp + yp * yp).sqrt();
        let zp = horner(&self.pol, r);

        DVec3::new(xp, yp, zp).normalize_or_zero()
    }
}

impl WorldToCamera for OcamModel {
    fn world_to_camera(&self, ray: DVec3) -> Option<DVec2> {
        if !ray.is_finite() {
            return None;
        }
        let rc = self.world2cam(DVec3::new(ray.y, ray.x, -ray.z));
        Some(DVec2::new(rc.y, rc.x))
    }
}

impl CameraToWorld for OcamModel {
    fn camera_to_world(&self, pixel: DVec2) -> DVec3 {
        let p = self.cam2world(DVec2::new(pixel.y, pixel.x));
        DVec3::new(p.y, p.x, -p.z)
    }
}

impl LoadCalibration for OcamModel {
    type Error = CalibrationError;

    fn load(path: impl AsRef<Path>) -> Result<Self, Self::Error> {
        let path = path.as_ref();
        let model = Self::parse(&std::fs::read_to_string(path)?)?;

        log::debug!(
            "loaded omnidirectional model from {} ({}x{}, {} + {} coefficients)",
            path.display(),
            model.width,
            model.height,
            model.pol.len(),
            model.invpol.len()
        );

        Ok(model)
    }
}

impl FromStr for OcamModel {
    type Err = CalibrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Evaluate the polynomial with coefficients `coeffs` (lowest degree first) at `x`.
fn horner(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &a| acc * x + a)
}

fn parse_part<T: FromStr>(s: &str) -> Result<T, CalibrationError>
where
    T::Err: std::fmt::Display,
{
    s.parse::<T>()
        .map_err(|e| CalibrationError::ParseError(format!("{}: {}", s, e)))
}

fn parse_values<T: FromStr + Copy + Default, const N: usize>(
    parts: &[&str],
) -> Result<[T; N], CalibrationError>
where
    T::Err: std::fmt::Display,
{
    if parts.len() < N {
        return Err(CalibrationError::ParseError(format!(
            "expected {} values, found {}",
            N,
            parts.len()
        )));
    }

    let mut values = [T::default(); N];
    for (value, part) in values.iter_mut().zip(parts) {
        *value = parse_part(part)?;
    }
    Ok(values)
}

fn parse_polynomial(parts: &[&str]) -> Result<Vec<f64>, CalibrationError> {
    let (count, coeffs) = parts
        .split_first()
        .ok_or_else(|| CalibrationError::ParseError("empty polynomial line".to_string()))?;

    let declared = parse_part::<usize>(count)?;
    if declared == 0 || declared != coeffs.len() {
        return Err(CalibrationError::InvalidPolynomial {
            declared,
            found: coeffs.len(),
        });
    }

    coeffs.iter().map(|c| parse_part::<f64>(c)).collect()
}
