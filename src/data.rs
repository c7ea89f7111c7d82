//! # `data` – Row-major datasets and CSV loading
//!
//! The engine consumes `rows x num_x_vars` inputs and `rows x num_y_vars`
//! targets as contiguous `Array2<f64>`. The CSV loader backs the CLI
//! driver: plain numeric rows, the trailing columns being the targets.

use std::path::Path;

use ndarray::Array2;

use crate::error::XcsfError;

#[derive(Debug, Clone)]
pub struct Dataset {
    pub x: Array2<f64>,
    pub y: Array2<f64>,
}

impl Dataset {
    pub fn new(x: Array2<f64>, y: Array2<f64>) -> Result<Self, XcsfError> {
        if x.nrows() != y.nrows() {
            return Err(XcsfError::Shape(format!(
                "X has {} rows but Y has {}",
                x.nrows(),
                y.nrows()
            )));
        }
        Ok(Self { x, y })
    }

    pub fn rows(&self) -> usize {
        self.x.nrows()
    }

    /// Reads a headerless numeric CSV whose last `num_y_vars` columns are
    /// the targets.
    pub fn from_csv<P: AsRef<Path>>(path: P, num_y_vars: usize) -> Result<Self, XcsfError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut flat: Vec<f64> = Vec::new();
        let mut num_cols = 0;
        let mut rows = 0;
        for (lineno, record) in reader.records().enumerate() {
            let record = record?;
            if num_cols == 0 {
                num_cols = record.len();
            } else if record.len() != num_cols {
                return Err(XcsfError::Shape(format!(
                    "row {}: expected {} columns, got {}",
                    lineno + 1,
                    num_cols,
                    record.len()
                )));
            }
            for field in record.iter() {
                let value: f64 = field.parse().map_err(|_| {
                    XcsfError::Config(format!("row {}: not a number: {field}", lineno + 1))
                })?;
                flat.push(value);
            }
            rows += 1;
        }
        if rows == 0 || num_cols <= num_y_vars {
            return Err(XcsfError::Shape(format!(
                "need at least one row and more than {num_y_vars} columns"
            )));
        }

        let all = Array2::from_shape_vec((rows, num_cols), flat)
            .expect("row-major data matches the counted shape");
        let x_cols = num_cols - num_y_vars;
        let x = all.slice(ndarray::s![.., ..x_cols]).to_owned();
        let y = all.slice(ndarray::s![.., x_cols..]).to_owned();
        Self::new(x, y)
    }

    /// First half for training, second half for testing.
    pub fn split_half(&self) -> (Dataset, Dataset) {
        let mid = self.rows() / 2;
        let train = Dataset {
            x: self.x.slice(ndarray::s![..mid, ..]).to_owned(),
            y: self.y.slice(ndarray::s![..mid, ..]).to_owned(),
        };
        let test = Dataset {
            x: self.x.slice(ndarray::s![mid.., ..]).to_owned(),
            y: self.y.slice(ndarray::s![mid.., ..]).to_owned(),
        };
        (train, test)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_new_rejects_row_mismatch() {
        let x = array![[0.0], [1.0]];
        let y = array![[0.0]];
        assert!(matches!(Dataset::new(x, y), Err(XcsfError::Shape(_))));
    }

    #[test]
    fn test_from_csv_splits_targets() {
        let dir = std::env::temp_dir();
        let path = dir.join("xcsf_test_data.csv");
        std::fs::write(&path, "0.1, 0.2, 1.0\n0.3, 0.4, 2.0\n0.5, 0.6, 3.0\n").unwrap();

        let data = Dataset::from_csv(&path, 1).unwrap();
        assert_eq!(data.x, array![[0.1, 0.2], [0.3, 0.4], [0.5, 0.6]]);
        assert_eq!(data.y, array![[1.0], [2.0], [3.0]]);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_from_csv_rejects_garbage() {
        let dir = std::env::temp_dir();
        let path = dir.join("xcsf_test_data_bad.csv");
        std::fs::write(&path, "0.1, abc\n").unwrap();
        assert!(Dataset::from_csv(&path, 1).is_err());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_split_half() {
        let data = Dataset::new(
            array![[0.0], [1.0], [2.0], [3.0]],
            array![[0.0], [1.0], [2.0], [3.0]],
        )
        .unwrap();
        let (train, test) = data.split_half();
        assert_eq!(train.rows(), 2);
        assert_eq!(test.rows(), 2);
        assert_eq!(test.x[[0, 0]], 2.0);
    }
}
