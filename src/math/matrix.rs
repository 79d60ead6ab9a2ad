use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::NetworkError;

/// Dense row-major matrix.  For layer weights, `rows` is the layer's output
/// width and `cols` its input width, so `data[i][j]` connects input `j` to
/// output unit `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Uniform initialization in [-1, 1].
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = rng.gen::<f64>() * 2.0 - 1.0;
            }
        }

        res
    }

    /// Builds a matrix from nested rows.  Every row must have the same length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        let cols = data.first().map_or(0, |row| row.len());
        assert!(
            data.iter().all(|row| row.len() == cols),
            "Matrix rows must all have the same length"
        );
        Matrix {
            rows: data.len(),
            cols,
            data
        }
    }

    /// Builds a `rows` x `cols` matrix from row-major values.
    pub fn from_flat(rows: usize, cols: usize, values: &[f64]) -> Result<Matrix, NetworkError> {
        if values.len() != rows * cols {
            return Err(NetworkError::ParameterLength {
                expected: rows * cols,
                actual: values.len(),
            });
        }
        let data = if cols == 0 {
            vec![Vec::new(); rows]
        } else {
            values.chunks(cols).map(|row| row.to_vec()).collect()
        };
        Ok(Matrix { rows, cols, data })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    /// Matrix-vector product `self · x`.
    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        assert_eq!(self.cols, x.len(), "Matrix and vector are of incorrect sizes");
        self.data
            .iter()
            .map(|row| row.iter().zip(x).map(|(w, v)| w * v).sum())
            .collect()
    }

    /// Transposed product `selfᵀ · x`, i.e. `out[i] = Σ_j x[j] * self[j][i]`.
    pub fn transpose_mul_vec(&self, x: &[f64]) -> Vec<f64> {
        assert_eq!(self.rows, x.len(), "Matrix and vector are of incorrect sizes");
        let mut res = vec![0.0; self.cols];
        for (row, &xj) in self.data.iter().zip(x) {
            for (out, w) in res.iter_mut().zip(row) {
                *out += xj * w;
            }
        }
        res
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}
