//! ndarray-based reference backend.
//!
//! A second, independently-coded implementation of every operation,
//! compiled in behind the `ref-ndarray` feature. Strided device data is
//! gathered into dense `ndarray` views, the arithmetic runs through
//! ndarray's linear algebra where it exists, and results are scattered
//! back through the same transfer interface. Deliberately a different
//! code path from `HostBackend` so cross-validation compares two
//! genuinely distinct implementations.

use ndarray::{Array1, Array2, Axis};
use num_traits::identities::Zero;
use veriblas_common::{Diagonal, DispatchError, DispatchResult, Layout, Scalar, Transpose, Triangle};

use crate::checks::{mat_at, require_matrix, require_vector};
use crate::memory::{Buffer, Queue};
use crate::{BlasBackend, VectorPair};

pub struct NdarrayBackend;

fn gather_vector<T: Scalar>(buf: &Buffer<T>, extent: usize, inc: usize, offset: usize) -> Array1<T> {
    let slice = buf.as_slice();
    Array1::from_iter((0..extent).map(|i| slice[offset + i * inc]))
}

fn scatter_vector<T: Scalar>(buf: &mut Buffer<T>, data: &Array1<T>, inc: usize, offset: usize) {
    let slice = buf.as_mut_slice();
    for (i, &value) in data.iter().enumerate() {
        slice[offset + i * inc] = value;
    }
}

fn gather_matrix<T: Scalar>(
    buf: &Buffer<T>,
    layout: Layout,
    rows: usize,
    cols: usize,
    ld: usize,
    offset: usize,
) -> Array2<T> {
    let slice = buf.as_slice();
    Array2::from_shape_fn((rows, cols), |(i, j)| slice[mat_at(layout, offset, ld, i, j)])
}

#[allow(clippy::too_many_arguments)]
impl<T: Scalar> BlasBackend<T> for NdarrayBackend {
    fn name(&self) -> &'static str {
        "ndarray"
    }

    fn axpy(
        &self,
        queue: &Queue,
        n: usize,
        alpha: T,
        x: &Buffer<T>,
        x_offset: usize,
        x_inc: usize,
        y: &mut Buffer<T>,
        y_offset: usize,
        y_inc: usize,
    ) -> DispatchResult {
        require_vector(x, "x", n, x_inc, x_offset)?;
        require_vector(y, "y", n, y_inc, y_offset)?;

        let xs = gather_vector(x, n, x_inc, x_offset);
        let ys = gather_vector(y, n, y_inc, y_offset);
        let result = xs.mapv(|v| alpha * v) + ys;
        scatter_vector(y, &result, y_inc, y_offset);
        queue.finish();
        Ok(())
    }

    fn gemv(
        &self,
        queue: &Queue,
        layout: Layout,
        a_transpose: Transpose,
        m: usize,
        n: usize,
        alpha: T,
        a: &Buffer<T>,
        a_offset: usize,
        a_ld: usize,
        x: &Buffer<T>,
        x_offset: usize,
        x_inc: usize,
        beta: T,
        y: &mut Buffer<T>,
        y_offset: usize,
        y_inc: usize,
    ) -> DispatchResult {
        let transposed = a_transpose.is_transposed();
        let (out_len, in_len) = if transposed { (n, m) } else { (m, n) };

        require_matrix(a, "a", layout, m, n, a_ld, a_offset)?;
        require_vector(x, "x", in_len, x_inc, x_offset)?;
        require_vector(y, "y", out_len, y_inc, y_offset)?;

        let mut op_a = gather_matrix(a, layout, m, n, a_ld, a_offset);
        if a_transpose == Transpose::Conjugate {
            op_a.mapv_inplace(|v| v.conj());
        }
        let op_a = if transposed { op_a.reversed_axes() } else { op_a };
        let xs = gather_vector(x, in_len, x_inc, x_offset);
        let ys = gather_vector(y, out_len, y_inc, y_offset);
        let result = op_a.dot(&xs).mapv(|v| alpha * v) + ys.mapv(|v| beta * v);
        scatter_vector(y, &result, y_inc, y_offset);
        queue.finish();
        Ok(())
    }

    fn her(
        &self,
        queue: &Queue,
        layout: Layout,
        triangle: Triangle,
        n: usize,
        alpha: T::Real,
        x: &Buffer<T>,
        x_offset: usize,
        x_inc: usize,
        a: &mut Buffer<T>,
        a_offset: usize,
        a_ld: usize,
    ) -> DispatchResult {
        require_vector(x, "x", n, x_inc, x_offset)?;
        require_matrix(a, "a", layout, n, n, a_ld, a_offset)?;

        if n == 0 || alpha == T::Real::zero() {
            queue.finish();
            return Ok(());
        }

        let alpha_t = T::from_real(alpha);
        let xs = gather_vector(x, n, x_inc, x_offset);
        let col = xs.clone().insert_axis(Axis(1));
        let row = xs.mapv(|v| v.conj()).insert_axis(Axis(0));
        let outer = col.dot(&row);

        let a_slice = a.as_mut_slice();
        for j in 0..n {
            let (lo, hi) = match triangle {
                Triangle::Upper => (0, j + 1),
                Triangle::Lower => (j, n),
            };
            for i in lo..hi {
                a_slice[mat_at(layout, a_offset, a_ld, i, j)] += alpha_t * outer[(i, j)];
            }
        }
        for i in 0..n {
            let idx = mat_at(layout, a_offset, a_ld, i, i);
            a_slice[idx] = T::from_real(a_slice[idx].re());
        }
        queue.finish();
        Ok(())
    }

    fn syrk(
        &self,
        queue: &Queue,
        layout: Layout,
        triangle: Triangle,
        a_transpose: Transpose,
        n: usize,
        k: usize,
        alpha: T,
        a: &Buffer<T>,
        a_offset: usize,
        a_ld: usize,
        beta: T,
        c: &mut Buffer<T>,
        c_offset: usize,
        c_ld: usize,
    ) -> DispatchResult {
        if a_transpose == Transpose::Conjugate {
            return Err(DispatchError::backend(
                "conjugate transpose is not defined for the symmetric rank-k update",
            ));
        }
        let transposed = a_transpose.is_transposed();
        let (a_rows, a_cols) = if transposed { (k, n) } else { (n, k) };

        require_matrix(a, "a", layout, a_rows, a_cols, a_ld, a_offset)?;
        require_matrix(c, "c", layout, n, n, c_ld, c_offset)?;

        let stored = gather_matrix(a, layout, a_rows, a_cols, a_ld, a_offset);
        let op_a = if transposed { stored.reversed_axes() } else { stored };
        let product = op_a.dot(&op_a.t());

        let c_slice = c.as_mut_slice();
        for j in 0..n {
            let (lo, hi) = match triangle {
                Triangle::Upper => (0, j + 1),
                Triangle::Lower => (j, n),
            };
            for i in lo..hi {
                let out = &mut c_slice[mat_at(layout, c_offset, c_ld, i, j)];
                *out = alpha * product[(i, j)] + beta * *out;
            }
        }
        queue.finish();
        Ok(())
    }

    fn trsv(
        &self,
        queue: &Queue,
        layout: Layout,
        triangle: Triangle,
        a_transpose: Transpose,
        diagonal: Diagonal,
        n: usize,
        a: &Buffer<T>,
        a_offset: usize,
        a_ld: usize,
        x: &mut Buffer<T>,
        x_offset: usize,
        x_inc: usize,
    ) -> DispatchResult {
        require_matrix(a, "a", layout, n, n, a_ld, a_offset)?;
        require_vector(x, "x", n, x_inc, x_offset)?;

        let mut op_a = gather_matrix(a, layout, n, n, a_ld, a_offset);
        if a_transpose == Transpose::Conjugate {
            op_a.mapv_inplace(|v| v.conj());
        }
        let op_a = if a_transpose.is_transposed() { op_a.reversed_axes() } else { op_a };
        let forward = matches!(
            (triangle, a_transpose.is_transposed()),
            (Triangle::Lower, false) | (Triangle::Upper, true)
        );

        let mut xs = gather_vector(x, n, x_inc, x_offset);
        if forward {
            for i in 0..n {
                let mut acc = xs[i];
                for j in 0..i {
                    acc -= op_a[(i, j)] * xs[j];
                }
                if diagonal == Diagonal::NonUnit {
                    acc /= op_a[(i, i)];
                }
                xs[i] = acc;
            }
        } else {
            for i in (0..n).rev() {
                let mut acc = xs[i];
                for j in i + 1..n {
                    acc -= op_a[(i, j)] * xs[j];
                }
                if diagonal == Diagonal::NonUnit {
                    acc /= op_a[(i, i)];
                }
                xs[i] = acc;
            }
        }
        scatter_vector(x, &xs, x_inc, x_offset);
        queue.finish();
        Ok(())
    }

    fn axpy_batched(
        &self,
        queue: &Queue,
        n: usize,
        alphas: &[T],
        x_inc: usize,
        y_inc: usize,
        batches: &mut [VectorPair<'_, T>],
    ) -> DispatchResult {
        if alphas.len() != batches.len() {
            return Err(DispatchError::backend(format!(
                "batched call has {} coefficients for {} batches",
                alphas.len(),
                batches.len()
            )));
        }
        for (&alpha, pair) in alphas.iter().zip(batches.iter_mut()) {
            require_vector(pair.x, "x", n, x_inc, 0)?;
            require_vector(pair.y, "y", n, y_inc, 0)?;
            let xs = gather_vector(pair.x, n, x_inc, 0);
            let ys = gather_vector(pair.y, n, y_inc, 0);
            let result = xs.mapv(|v| alpha * v) + ys;
            scatter_vector(pair.y, &result, y_inc, 0);
        }
        queue.finish();
        Ok(())
    }
}
