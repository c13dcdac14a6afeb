use std::path::Path;

use crate::rigid::RigidTransform;

/// Error types for the extrinsic reader.
#[derive(Debug, thiserror::Error)]
pub enum ExtrinsicError {
    /// Error reading the file
    #[error("error reading extrinsic file: {0}")]
    IoError(#[from] std::io::Error),

    /// A token is not a real number
    #[error("Parse error {0}")]
    ParseError(String),

    /// The file does not hold exactly 16 values
    #[error("Invalid number of matrix values: expected 16, got {0}")]
    InvalidNumValues(usize),
}

/// Read a rigid transform stored as a row-major 4x4 matrix.
///
/// The file holds 16 whitespace separated real numbers. Line breaks are not
/// significant.
///
/// # Arguments
///
/// * `path` - The path to the text file.
///
/// # Returns
///
/// The rigid transform made of the top-left 3x3 block and the last column.
pub fn read_extrinsic_txt(path: impl AsRef<Path>) -> Result<RigidTransform, ExtrinsicError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let transform = parse_extrinsic(&contents)?;

    log::debug!("loaded extrinsic from {}", path.display());

    Ok(transform)
}

/// Parse a rigid transform from the contents of an extrinsic file.
pub fn parse_extrinsic(contents: &str) -> Result<RigidTransform, ExtrinsicError> {
    let values = contents
        .split_whitespace()
        .map(parse_part)
        .collect::<Result<Vec<f64>, _>>()?;

    let matrix: [f64; 16] = values
        .as_slice()
        .try_into()
        .map_err(|_| ExtrinsicError::InvalidNumValues(values.len()))?;

    Ok(RigidTransform::from_row_major(&matrix))
}

fn parse_part(s: &str) -> Result<f64, ExtrinsicError> {
    let value = s
        .parse::<f64>()
        .map_err(|e| ExtrinsicError::ParseError(format!("{}: {}", s, e)))?;

    if !value.is_finite() {
        return Err(ExtrinsicError::ParseError(format!("{}: not finite", s)));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DMat3, DVec3};
    use std::io::Write;

    #[test]
    fn parse_identity() -> Result<(), ExtrinsicError> {
        let transform = parse_extrinsic("1 0 0 0\n0 1 0 0\n0 0 1 0\n0 0 0 1\n")?;
        assert_eq!(transform, RigidTransform::IDENTITY);
        Ok(())
    }

    #[test]
    fn parse_translation_and_layout() -> Result<(), ExtrinsicError> {
        let transform = parse_extrinsic(
            "0.0 0.0 1.0 -0.12\n 0.0 1.0 0.0 0.003\n-1.0 0.0 0.0 0.04\n0 0 0 1",
        )?;
        assert_eq!(transform.translation, DVec3::new(-0.12, 0.003, 0.04));
        assert!(transform
            .rotation
            .abs_diff_eq(DMat3::from_rotation_y(std::f64::consts::FRAC_PI_2), 1e-12));
        Ok(())
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            parse_extrinsic("1 0 0 0 0 1 0 0"),
            Err(ExtrinsicError::InvalidNumValues(8))
        ));
        assert!(matches!(
            parse_extrinsic(&"0 ".repeat(17)),
            Err(ExtrinsicError::InvalidNumValues(17))
        ));
        assert!(matches!(
            parse_extrinsic("1 0 0 0 0 1 0 0 0 0 one 0 0 0 0 1"),
            Err(ExtrinsicError::ParseError(_))
        ));
        assert!(matches!(
            parse_extrinsic("1 0 0 0 0 1 0 0 0 0 1 NaN 0 0 0 1"),
            Err(ExtrinsicError::ParseError(_))
        ));
    }

    #[test]
    fn read_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "1 0 0 0.5")?;
        writeln!(file, "0 1 0 0")?;
        writeln!(file, "0 0 1 0")?;
        writeln!(file, "0 0 0 1")?;

        let transform = read_extrinsic_txt(file.path())?;
        assert_eq!(transform.rotation, DMat3::IDENTITY);
        assert_eq!(transform.translation, DVec3::new(0.5, 0.0, 0.0));
        Ok(())
    }

    #[test]
    fn six_decimal_file_averages() -> Result<(), Box<dyn std::error::Error>> {
        let rotation = DMat3::from_rotation_y(0.3);
        let translation = DVec3::new(-0.25, 0.01, 0.03);

        let mut file = tempfile::NamedTempFile::new()?;
        for row in 0..3 {
            let r = rotation.row(row);
            writeln!(
                file,
                "{:.6} {:.6} {:.6} {:.6}",
                r.x, r.y, r.z, translation[row]
            )?;
        }
        writeln!(file, "0 0 0 1")?;

        let transform = read_extrinsic_txt(file.path())?;
        let rotations = crate::average_rotations(&transform)?;
        let reference = crate::average_rotations(&RigidTransform::new(rotation, translation))?;

        assert!(rotations.first.abs_diff_eq(reference.first, 1e-5));
        assert!(rotations.second.abs_diff_eq(reference.second, 1e-5));
        Ok(())
    }

    #[test]
    fn read_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let res = read_extrinsic_txt(dir.path().join("missing.txt"));
        assert!(matches!(res, Err(ExtrinsicError::IoError(_))));
    }
}
