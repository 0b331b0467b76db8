//! Plain-text matrix format used by the `lloyd` binary.
//!
//! One point per line, coordinates separated by whitespace. Blank lines and lines starting with `#`
//! are skipped. Centroids are written with fixed-point formatting (5 decimals by default).

use crate::{PointSet, Primitive};
use rand::Rng;
use std::{fs, io, path::Path, str::FromStr};
use thiserror::Error;

pub const DEFAULT_PRECISION: usize = 5;

#[derive(Error, Debug)]
pub enum TextMatrixError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: '{token}' is not a number")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: expected {expected} columns, found {found}")]
    RaggedRow { line: usize, expected: usize, found: usize },

    #[error("input contains no points")]
    Empty,

    #[error("can not generate points: {0}")]
    InvalidGenerator(String),
}

/// Parse a whitespace separated text matrix into a [`PointSet`].
pub fn parse_points<T: Primitive + FromStr>(text: &str) -> Result<PointSet<T>, TextMatrixError> {
    let mut dims = None;
    let mut values = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let before = values.len();
        for token in line.split_whitespace() {
            // "nan" and "inf" parse fine, but can never be clustered
            let v = token.parse::<T>().ok().filter(|v| v.is_finite())
                .ok_or_else(|| TextMatrixError::InvalidNumber { line: idx + 1, token: token.to_string() })?;
            values.push(v);
        }
        let found = values.len() - before;
        match dims {
            None => dims = Some(found),
            Some(expected) if expected != found => {
                return Err(TextMatrixError::RaggedRow { line: idx + 1, expected, found });
            }
            Some(_) => {}
        }
    }
    let dims = dims.ok_or(TextMatrixError::Empty)?;
    PointSet::new(values, dims).map_err(|_| TextMatrixError::Empty)
}

pub fn read_points<T: Primitive + FromStr, P: AsRef<Path>>(path: P) -> Result<PointSet<T>, TextMatrixError> {
    parse_points(&fs::read_to_string(path)?)
}

/// Format points one per line, coordinates separated by a single space.
pub fn format_points<T: Primitive>(points: &PointSet<T>, precision: usize) -> String {
    let mut out = String::new();
    for p in points.iter() {
        let row: Vec<String> = p.iter().map(|v| format!("{:.*}", precision, v)).collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    out
}

pub fn write_points<T: Primitive, P: AsRef<Path>>(path: P, points: &PointSet<T>, precision: usize) -> Result<(), TextMatrixError> {
    fs::write(path, format_points(points, precision))?;
    Ok(())
}

/// Sample **sample_cnt** points with **sample_dims** coordinates, each uniform in `[low, high)`.
///
/// ## Errors
/// [`TextMatrixError::InvalidGenerator`] if `sample_dims == 0` or the range is empty or not finite.
pub fn generate_uniform<T: Primitive, R: Rng>(
    rnd: &mut R, sample_cnt: usize, sample_dims: usize, low: T, high: T,
) -> Result<PointSet<T>, TextMatrixError> {
    if sample_dims == 0 {
        return Err(TextMatrixError::InvalidGenerator("points need at least one dimension".into()));
    }
    if !(low.is_finite() && high.is_finite() && low < high) {
        return Err(TextMatrixError::InvalidGenerator(format!("empty range [{}, {})", low, high)));
    }
    let values = (0..sample_cnt * sample_dims).map(|_| rnd.gen_range(low, high)).collect();
    PointSet::new(values, sample_dims).map_err(|e| TextMatrixError::InvalidGenerator(e.to_string()))
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    #[test]
    fn parse_matrix() {
        let text = "# x y\n1.5 2\n\n  -3e1\t4.25  \n";
        let set: PointSet<f64> = parse_points(text).unwrap();
        assert_eq!(set.dims(), 2);
        assert_eq!(set.to_rows(), vec![vec![1.5, 2.0], vec![-30.0, 4.25]]);
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(parse_points::<f64>("1 2\n3\n"), Err(TextMatrixError::RaggedRow { line: 2, expected: 2, found: 1 })));
        assert!(matches!(parse_points::<f64>("1 x\n"), Err(TextMatrixError::InvalidNumber { line: 1, .. })));
        assert!(matches!(parse_points::<f32>("\n# only a comment\n"), Err(TextMatrixError::Empty)));
    }

    #[test]
    fn non_finite_tokens_are_rejected() {
        let res = parse_points::<f64>("0 0\n0 1\nnan 5\n10 0\n");
        assert!(matches!(res, Err(TextMatrixError::InvalidNumber { line: 3, ref token }) if token == "nan"));
        assert!(matches!(parse_points::<f32>("1 inf\n"), Err(TextMatrixError::InvalidNumber { line: 1, .. })));
        assert!(matches!(parse_points::<f64>("-infinity 2\n"), Err(TextMatrixError::InvalidNumber { line: 1, .. })));
    }

    #[test]
    fn fixed_point_output() {
        let set = PointSet::from_rows(&[[0.0f64, 0.5], [10.0, 1.0 / 3.0]]).unwrap();
        assert_eq!(format_points(&set, DEFAULT_PRECISION), "0.00000 0.50000\n10.00000 0.33333\n");
    }

    #[test]
    fn file_round_trip() {
        let path = std::env::temp_dir().join(format!("lloyd-kmeans-textio-{}.txt", std::process::id()));
        let set = PointSet::from_rows(&[[1.25f64, -2.5, 3.0]]).unwrap();
        write_points(&path, &set, DEFAULT_PRECISION).unwrap();
        let read: PointSet<f64> = read_points(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(read, set);
    }

    #[test]
    fn uniform_samples_stay_in_box() {
        let mut rnd = StdRng::seed_from_u64(0);
        let set: PointSet<f64> = generate_uniform(&mut rnd, 500, 3, 0.0, 50.0).unwrap();
        assert_eq!((set.len(), set.dims()), (500, 3));
        assert!(set.as_slice().iter().all(|&v| (0.0..50.0).contains(&v)));
    }

    #[test]
    fn generator_rejects_bad_input() {
        let mut rnd = StdRng::seed_from_u64(0);
        assert!(matches!(generate_uniform(&mut rnd, 10, 0, 0.0f64, 50.0), Err(TextMatrixError::InvalidGenerator(_))));
        assert!(matches!(generate_uniform(&mut rnd, 10, 2, 5.0f64, 5.0), Err(TextMatrixError::InvalidGenerator(_))));
        assert!(matches!(generate_uniform(&mut rnd, 10, 2, 50.0f32, 0.0), Err(TextMatrixError::InvalidGenerator(_))));
        assert!(matches!(generate_uniform(&mut rnd, 10, 2, 0.0f64, f64::INFINITY), Err(TextMatrixError::InvalidGenerator(_))));
        assert!(generate_uniform(&mut rnd, 0, 2, 0.0f64, 1.0).unwrap().is_empty());
    }
}
