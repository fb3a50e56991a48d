//! Sweep configuration for verification runs.
//!
//! The values a caller loops over when generating argument sets. The
//! defaults are the conventional quick-test dimensions; `full_test`
//! widens offsets and coefficient sets the way an exhaustive run does.

use serde::{Deserialize, Serialize};

use veriblas_common::{BlasLevel, Scalar};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Problem sizes for vector routines.
    pub vector_dims: Vec<usize>,
    /// Problem sizes for matrix routines.
    pub matrix_dims: Vec<usize>,
    /// Vector increments to sweep.
    pub increments: Vec<usize>,
    /// Batch counts for the batched variants.
    pub batch_counts: Vec<usize>,
    /// Exhaustive mode: more offsets and coefficients per routine.
    pub full_test: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            vector_dims: vec![7, 93, 4096],
            matrix_dims: vec![7, 64],
            increments: vec![1, 2, 7],
            batch_counts: vec![1, 3],
            full_test: false,
        }
    }
}

impl SweepConfig {
    /// Buffer base offsets to sweep.
    pub fn offsets(&self) -> Vec<usize> {
        if self.full_test {
            vec![0, 10]
        } else {
            vec![0]
        }
    }

    /// Problem sizes appropriate for a routine's level: vector
    /// dimensions for level 1, matrix dimensions above.
    pub fn dims_for(&self, level: BlasLevel) -> &[usize] {
        match level {
            BlasLevel::Level1 => &self.vector_dims,
            BlasLevel::Level2 | BlasLevel::Level3 => &self.matrix_dims,
        }
    }
}

/// Example coefficient values for alpha/beta sweeps: zero, one, and a
/// representative irrational-looking value, with nonzero imaginary
/// parts for complex element types. The quick profile keeps only the
/// last (most general) value.
pub fn example_coefficients<U: Scalar>(full_test: bool) -> Vec<U> {
    let values: Vec<U> = if U::is_complex() {
        [(0.0f32, 0.0f32), (1.0, 1.3), (2.42, 3.14)]
            .iter()
            .map(|&(re, im)| U::from_parts(re.into(), im.into()))
            .collect()
    } else {
        [0.0f32, 1.0, 3.14].iter().map(|&v| U::from_f32(v)).collect()
    };
    if full_test {
        values
    } else {
        vec![values[2]]
    }
}
