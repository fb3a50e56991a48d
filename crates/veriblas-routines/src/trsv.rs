//! Descriptor for the triangular solve op(A) * x = b, solved in place.

use std::marker::PhantomData;

use veriblas_backend::{BlasBackend, Buffers, Queue};
use veriblas_common::{
    ArgKey, Arguments, BlasLevel, BufferKind, DispatchError, DispatchResult, ErrorMargin, Scalar,
    Transpose,
};

use crate::{download_buffer, elem_bytes, matrix_size, vector_size, Routine};

pub struct Trsv<T: Scalar>(PhantomData<T>);

impl<T: Scalar> Routine for Trsv<T> {
    type Elem = T;
    type Coef = T;

    const NAME: &'static str = "trsv";

    fn blas_level() -> BlasLevel {
        BlasLevel::Level2
    }

    fn options() -> Vec<ArgKey> {
        vec![
            ArgKey::N,
            ArgKey::Layout,
            ArgKey::Triangle,
            ArgKey::ATranspose,
            ArgKey::Diagonal,
            ArgKey::ALeadDim,
            ArgKey::XInc,
            ArgKey::AOffset,
            ArgKey::XOffset,
        ]
    }

    fn buffers_in() -> Vec<BufferKind> {
        vec![BufferKind::MatA, BufferKind::VecX]
    }

    fn buffers_out() -> Vec<BufferKind> {
        vec![BufferKind::VecX]
    }

    fn size_x(args: &Arguments<T>) -> usize {
        vector_size(args.n, args.x_inc, args.x_offset)
    }

    fn size_a(args: &Arguments<T>) -> usize {
        matrix_size(args.n, args.a_ld, args.a_offset)
    }

    fn set_sizes(args: &mut Arguments<T>) {
        args.a_size = Self::size_a(args);
        args.x_size = Self::size_x(args);
    }

    fn default_ld_a(args: &Arguments<T>) -> Option<usize> {
        Some(args.n)
    }

    fn a_transposes(candidates: &[Transpose]) -> Vec<Transpose> {
        candidates.to_vec()
    }

    /// Conditions the random system into a solvable one: off-diagonal
    /// mass halved, diagonal replaced by its modulus plus n/4, right
    /// hand side halved to match.
    fn prepare_data(
        args: &Arguments<T>,
        queue: &Queue,
        _seed: u64,
        buffers: &mut Buffers<T>,
    ) -> DispatchResult {
        if args.a_ld < args.n {
            return Ok(());
        }

        let mut a_host = vec![T::zero(); args.a_size];
        let mut x_host = vec![T::zero(); args.x_size];
        buffers.a_mat.read(queue, args.a_size, &mut a_host)?;
        buffers.x_vec.read(queue, args.x_size, &mut x_host)?;

        let shift: T::Real = ((args.n / 4) as f32).into();
        let half = T::from_f32(2.0);
        for i in 0..args.n {
            let diag_idx = i * args.a_ld + i + args.a_offset;
            let diagonal = a_host[diag_idx].modulus() + shift;
            for j in 0..args.n {
                a_host[j * args.a_ld + i + args.a_offset] /= half;
            }
            a_host[diag_idx] = T::from_real(diagonal);
            x_host[i * args.x_inc + args.x_offset] /= half;
        }

        buffers.a_mat.write(queue, args.a_size, &a_host)?;
        buffers.x_vec.write(queue, args.x_size, &x_host)?;
        Ok(())
    }

    fn run_routine(
        backend: &dyn BlasBackend<T>,
        args: &Arguments<T>,
        buffers: &mut Buffers<T>,
        queue: &Queue,
    ) -> DispatchResult {
        let Buffers { x_vec, a_mat, .. } = buffers;
        backend.trsv(
            queue,
            args.layout,
            args.triangle,
            args.a_transpose,
            args.diagonal,
            args.n,
            a_mat,
            args.a_offset,
            args.a_ld,
            x_vec,
            args.x_offset,
            args.x_inc,
        )
    }

    fn download_result(
        args: &Arguments<T>,
        buffers: &Buffers<T>,
        queue: &Queue,
    ) -> Result<Vec<T>, DispatchError> {
        download_buffer(&buffers.x_vec, args.x_size, queue)
    }

    fn result_id1(args: &Arguments<T>) -> usize {
        args.n
    }

    fn result_index(args: &Arguments<T>, id1: usize, _id2: usize) -> usize {
        id1 * args.x_inc + args.x_offset
    }

    fn flops(args: &Arguments<T>) -> u64 {
        2 * args.n as u64 * args.n as u64
    }

    fn bytes(args: &Arguments<T>) -> u64 {
        let n = args.n as u64;
        (n * n + 3 * n) * elem_bytes::<T>()
    }

    // Substitution compounds rounding, so agreement gets more room than
    // the element-wise routines.
    fn error_margin() -> ErrorMargin {
        ErrorMargin { relative: 0.05, absolute: 1.0e-3 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veriblas_backend::HostBackend;

    #[test]
    fn conditioning_builds_a_dominant_diagonal() {
        let queue = Queue::new();
        let mut args = Arguments::<f32>::default();
        args.n = 4;
        args.a_ld = 4;
        Trsv::<f32>::set_sizes(&mut args);

        let mut buffers = Buffers::allocate(&queue, &args);
        let a_src: Vec<f32> = (0..args.a_size).map(|i| 1.0 + i as f32 * 0.1).collect();
        let x_src: Vec<f32> = (0..args.x_size).map(|i| i as f32).collect();
        buffers.a_mat.write(&queue, args.a_size, &a_src).unwrap();
        buffers.x_vec.write(&queue, args.x_size, &x_src).unwrap();

        Trsv::<f32>::prepare_data(&args, &queue, 0, &mut buffers).unwrap();

        let mut a_got = vec![0.0f32; args.a_size];
        buffers.a_mat.read(&queue, args.a_size, &mut a_got).unwrap();

        for i in 0..4 {
            let diag = a_got[i * 4 + i];
            let expected = a_src[i * 4 + i].abs() + 1.0; // n/4 = 1
            assert!((diag - expected).abs() < 1e-6, "diag {i}: {diag} vs {expected}");
        }
        // Off-diagonal entries are halved.
        assert_eq!(a_got[1], a_src[1] / 2.0);
        // The right hand side is halved to match.
        let mut x_got = vec![0.0f32; args.x_size];
        buffers.x_vec.read(&queue, args.x_size, &mut x_got).unwrap();
        assert_eq!(x_got[2], 1.0);
    }

    #[test]
    fn conditioning_skips_degenerate_leading_dimensions() {
        let queue = Queue::new();
        let mut args = Arguments::<f32>::default();
        args.n = 4;
        args.a_ld = 2; // below n: leave the buffers alone
        Trsv::<f32>::set_sizes(&mut args);
        let mut buffers = Buffers::allocate(&queue, &args);
        buffers.x_vec.write(&queue, 1, &[7.0]).unwrap();
        Trsv::<f32>::prepare_data(&args, &queue, 0, &mut buffers).unwrap();
        let mut x_got = vec![0.0f32; 1];
        buffers.x_vec.read(&queue, 1, &mut x_got).unwrap();
        assert_eq!(x_got[0], 7.0);
    }

    #[test]
    fn solve_round_trips_after_conditioning() {
        let queue = Queue::new();
        let mut args = Arguments::<f32>::default();
        args.n = 8;
        args.a_ld = 8;
        args.triangle = veriblas_common::Triangle::Lower;
        args.diagonal = veriblas_common::Diagonal::NonUnit;
        Trsv::<f32>::set_sizes(&mut args);

        let mut buffers = Buffers::allocate(&queue, &args);
        let a_src: Vec<f32> = (0..args.a_size).map(|i| ((i * 7 % 13) as f32 - 6.0) / 3.0).collect();
        let b_src: Vec<f32> = (0..args.x_size).map(|i| (i as f32 - 3.0) / 2.0).collect();
        buffers.a_mat.write(&queue, args.a_size, &a_src).unwrap();
        buffers.x_vec.write(&queue, args.x_size, &b_src).unwrap();
        Trsv::<f32>::prepare_data(&args, &queue, 0, &mut buffers).unwrap();

        // Capture the conditioned system, solve, then multiply back.
        let mut a_cond = vec![0.0f32; args.a_size];
        buffers.a_mat.read(&queue, args.a_size, &mut a_cond).unwrap();
        let mut b_cond = vec![0.0f32; args.x_size];
        buffers.x_vec.read(&queue, args.x_size, &mut b_cond).unwrap();

        Trsv::<f32>::run_routine(&HostBackend, &args, &mut buffers, &queue).unwrap();
        let x = Trsv::<f32>::download_result(&args, &buffers, &queue).unwrap();

        // b ?= L x for the lower triangle actually used by the solve.
        for i in 0..args.n {
            let mut acc = 0.0f32;
            for j in 0..=i {
                acc += a_cond[i * args.a_ld + j] * x[j];
            }
            assert!((acc - b_cond[i]).abs() < 1e-3, "row {}: {} vs {}", i, acc, b_cond[i]);
        }
    }
}
