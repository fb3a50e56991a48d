//! The argument record shared by the driver and the descriptors.

use crate::scalar::Scalar;
use crate::types::{Diagonal, Layout, Side, Transpose, Triangle};

/// All parameters a routine may consume, with their default values.
///
/// The driver sets the fields named by a descriptor's `options()`,
/// applies the descriptor's leading-dimension defaults, and then calls
/// `set_sizes`, which writes the derived `*_size` fields back. That
/// write-back is the only place a descriptor mutates shared state, and
/// it must happen before any buffer is allocated: buffers are allocated
/// to exactly these sizes, never to a size the driver computed itself.
///
/// The coefficient type `U` is the element type for most routines and
/// its real projection for Hermitian updates.
#[derive(Debug, Clone, PartialEq)]
pub struct Arguments<U: Scalar> {
    // Problem extents.
    pub m: usize,
    pub n: usize,
    pub k: usize,
    // Layout and shape selectors.
    pub layout: Layout,
    pub a_transpose: Transpose,
    pub b_transpose: Transpose,
    pub side: Side,
    pub triangle: Triangle,
    pub diagonal: Diagonal,
    // Vector strides and bases.
    pub x_inc: usize,
    pub y_inc: usize,
    pub x_offset: usize,
    pub y_offset: usize,
    // Matrix strides and bases. A leading dimension of 0 means "not yet
    // defaulted"; the driver resolves it through the descriptor.
    pub a_ld: usize,
    pub b_ld: usize,
    pub c_ld: usize,
    pub a_offset: usize,
    pub b_offset: usize,
    pub c_offset: usize,
    // Scalar coefficients.
    pub alpha: U,
    pub beta: U,
    // Derived buffer sizes, written by `set_sizes`.
    pub x_size: usize,
    pub y_size: usize,
    pub a_size: usize,
    pub b_size: usize,
    pub c_size: usize,
    // Batch count for the batched routine variants.
    pub batch_count: usize,
}

impl<U: Scalar> Default for Arguments<U> {
    fn default() -> Self {
        Arguments {
            m: 0,
            n: 0,
            k: 0,
            layout: Layout::RowMajor,
            a_transpose: Transpose::No,
            b_transpose: Transpose::No,
            side: Side::Left,
            triangle: Triangle::Upper,
            diagonal: Diagonal::Unit,
            x_inc: 1,
            y_inc: 1,
            x_offset: 0,
            y_offset: 0,
            a_ld: 0,
            b_ld: 0,
            c_ld: 0,
            a_offset: 0,
            b_offset: 0,
            c_offset: 0,
            alpha: U::one(),
            beta: U::one(),
            x_size: 1,
            y_size: 1,
            a_size: 1,
            b_size: 1,
            c_size: 1,
            batch_count: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_unspecified_state() {
        let args = Arguments::<f32>::default();
        assert_eq!(args.x_inc, 1);
        assert_eq!(args.a_ld, 0, "leading dimensions start undefaulted");
        assert_eq!(args.alpha, 1.0);
        assert_eq!(args.a_size, 1, "unused buffers keep a one-element allocation");
        assert_eq!(args.batch_count, 1);
    }

    #[test]
    fn complex_coefficient_defaults_to_one() {
        use num_complex::Complex64;
        let args = Arguments::<Complex64>::default();
        assert_eq!(args.alpha, Complex64::new(1.0, 0.0));
    }
}
