//! Naive single-threaded host backend.
//!
//! Correctness over speed: plain loops with no blocking or
//! vectorization, always available, usable both as the device under
//! test in self-checks and as the baseline reference implementation.
//! Every operation validates the capacities it is about to touch and
//! reports problems as dispatch errors.

use num_traits::identities::Zero;
use veriblas_common::{Diagonal, DispatchError, DispatchResult, Layout, Scalar, Transpose, Triangle};

use crate::checks::{mat_at, require_matrix, require_vector};
use crate::memory::{Buffer, Queue};
use crate::{BlasBackend, VectorPair};

pub struct HostBackend;

fn axpy_kernel<T: Scalar>(
    n: usize,
    alpha: T,
    x: &[T],
    x_offset: usize,
    x_inc: usize,
    y: &mut [T],
    y_offset: usize,
    y_inc: usize,
) {
    for i in 0..n {
        y[y_offset + i * y_inc] += alpha * x[x_offset + i * x_inc];
    }
}

#[allow(clippy::too_many_arguments)]
impl<T: Scalar> BlasBackend<T> for HostBackend {
    fn name(&self) -> &'static str {
        "host"
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

        axpy_kernel(n, alpha, x.as_slice(), x_offset, x_inc, y.as_mut_slice(), y_offset, y_inc);
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

        let a_slice = a.as_slice();
        let x_slice = x.as_slice();
        let y_slice = y.as_mut_slice();
        for r in 0..out_len {
            let mut acc = T::zero();
            for c in 0..in_len {
                let (i, j) = if transposed { (c, r) } else { (r, c) };
                let mut element = a_slice[mat_at(layout, a_offset, a_ld, i, j)];
                if a_transpose == Transpose::Conjugate {
                    element = element.conj();
                }
                acc += element * x_slice[x_offset + c * x_inc];
            }
            let out = &mut y_slice[y_offset + r * y_inc];
            *out = alpha * acc + beta * *out;
        }
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

        // Quick return, leaving A bit-identical.
        if n == 0 || alpha == T::Real::zero() {
            queue.finish();
            return Ok(());
        }

        let alpha_t = T::from_real(alpha);
        let x_slice = x.as_slice();
        let a_slice = a.as_mut_slice();
        for j in 0..n {
            let (lo, hi) = match triangle {
                Triangle::Upper => (0, j + 1),
                Triangle::Lower => (j, n),
            };
            let xj_conj = x_slice[x_offset + j * x_inc].conj();
            for i in lo..hi {
                let xi = x_slice[x_offset + i * x_inc];
                a_slice[mat_at(layout, a_offset, a_ld, i, j)] += alpha_t * xi * xj_conj;
            }
        }
        // The updated diagonal is real by construction; pin it down.
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

        let a_slice = a.as_slice();
        let c_slice = c.as_mut_slice();
        let op_a = |i: usize, l: usize| -> T {
            if transposed {
                a_slice[mat_at(layout, a_offset, a_ld, l, i)]
            } else {
                a_slice[mat_at(layout, a_offset, a_ld, i, l)]
            }
        };
        for j in 0..n {
            let (lo, hi) = match triangle {
                Triangle::Upper => (0, j + 1),
                Triangle::Lower => (j, n),
            };
            for i in lo..hi {
                let mut acc = T::zero();
                for l in 0..k {
                    acc += op_a(i, l) * op_a(j, l);
                }
                let out = &mut c_slice[mat_at(layout, c_offset, c_ld, i, j)];
                *out = alpha * acc + beta * *out;
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

        let transposed = a_transpose.is_transposed();
        let conjugated = a_transpose == Transpose::Conjugate;
        let a_slice = a.as_slice();
        let x_slice = x.as_mut_slice();
        let op_a = |i: usize, j: usize| -> T {
            let element = if transposed {
                a_slice[mat_at(layout, a_offset, a_ld, j, i)]
            } else {
                a_slice[mat_at(layout, a_offset, a_ld, i, j)]
            };
            if conjugated {
                element.conj()
            } else {
                element
            }
        };
        // Transposing flips which triangle of op(A) is populated.
        let forward = matches!(
            (triangle, transposed),
            (Triangle::Lower, false) | (Triangle::Upper, true)
        );
        let at_x = |i: usize| x_offset + i * x_inc;
        if forward {
            for i in 0..n {
                let mut acc = x_slice[at_x(i)];
                for j in 0..i {
                    acc -= op_a(i, j) * x_slice[at_x(j)];
                }
                if diagonal == Diagonal::NonUnit {
                    acc /= op_a(i, i);
                }
                x_slice[at_x(i)] = acc;
            }
        } else {
            for i in (0..n).rev() {
                let mut acc = x_slice[at_x(i)];
                for j in i + 1..n {
                    acc -= op_a(i, j) * x_slice[at_x(j)];
                }
                if diagonal == Diagonal::NonUnit {
                    acc /= op_a(i, i);
                }
                x_slice[at_x(i)] = acc;
            }
        }
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
        for (alpha, pair) in alphas.iter().zip(batches.iter_mut()) {
            require_vector(pair.x, "x", n, x_inc, 0)?;
            require_vector(pair.y, "y", n, y_inc, 0)?;
            axpy_kernel(n, *alpha, pair.x.as_slice(), 0, x_inc, pair.y.as_mut_slice(), 0, y_inc);
        }
        queue.finish();
        Ok(())
    }
}
