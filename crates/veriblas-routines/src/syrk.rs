//! Descriptor for the symmetric rank-k update C := alpha * op(A) * op(A)^T + beta * C.

use std::marker::PhantomData;

use veriblas_backend::{BlasBackend, Buffers, Queue};
use veriblas_common::{
    ArgKey, Arguments, BlasLevel, BufferKind, DispatchError, DispatchResult, Layout, Scalar,
    Transpose,
};

use crate::{download_buffer, elem_bytes, matrix_size, Routine};

pub struct Syrk<T: Scalar>(PhantomData<T>);

impl<T: Scalar> Routine for Syrk<T> {
    type Elem = T;
    type Coef = T;

    const NAME: &'static str = "syrk";

    fn blas_level() -> BlasLevel {
        BlasLevel::Level3
    }

    fn options() -> Vec<ArgKey> {
        vec![
            ArgKey::N,
            ArgKey::K,
            ArgKey::Layout,
            ArgKey::Triangle,
            ArgKey::ATranspose,
            ArgKey::ALeadDim,
            ArgKey::CLeadDim,
            ArgKey::AOffset,
            ArgKey::COffset,
            ArgKey::Alpha,
            ArgKey::Beta,
        ]
    }

    fn buffers_in() -> Vec<BufferKind> {
        vec![BufferKind::MatA, BufferKind::MatC]
    }

    fn buffers_out() -> Vec<BufferKind> {
        vec![BufferKind::MatC]
    }

    fn size_a(args: &Arguments<T>) -> usize {
        // The number of major slices depends on both the storage order
        // and whether A arrives transposed.
        let rotated = match args.layout {
            Layout::ColMajor => args.a_transpose.is_transposed(),
            Layout::RowMajor => !args.a_transpose.is_transposed(),
        };
        let a_two = if rotated { args.n } else { args.k };
        matrix_size(a_two, args.a_ld, args.a_offset)
    }

    fn size_c(args: &Arguments<T>) -> usize {
        matrix_size(args.n, args.c_ld, args.c_offset)
    }

    fn set_sizes(args: &mut Arguments<T>) {
        args.a_size = Self::size_a(args);
        args.c_size = Self::size_c(args);
    }

    fn default_ld_a(args: &Arguments<T>) -> Option<usize> {
        Some(args.k)
    }

    fn default_ld_c(args: &Arguments<T>) -> Option<usize> {
        Some(args.n)
    }

    /// Conjugate transposition belongs to the Hermitian variant, not
    /// this routine.
    fn a_transposes(candidates: &[Transpose]) -> Vec<Transpose> {
        candidates.iter().copied().filter(|t| *t != Transpose::Conjugate).collect()
    }

    fn run_routine(
        backend: &dyn BlasBackend<T>,
        args: &Arguments<T>,
        buffers: &mut Buffers<T>,
        queue: &Queue,
    ) -> DispatchResult {
        let Buffers { a_mat, c_mat, .. } = buffers;
        backend.syrk(
            queue,
            args.layout,
            args.triangle,
            args.a_transpose,
            args.n,
            args.k,
            args.alpha,
            a_mat,
            args.a_offset,
            args.a_ld,
            args.beta,
            c_mat,
            args.c_offset,
            args.c_ld,
        )
    }

    fn download_result(
        args: &Arguments<T>,
        buffers: &Buffers<T>,
        queue: &Queue,
    ) -> Result<Vec<T>, DispatchError> {
        download_buffer(&buffers.c_mat, args.c_size, queue)
    }

    fn result_id1(args: &Arguments<T>) -> usize {
        args.n
    }

    fn result_id2(args: &Arguments<T>) -> usize {
        args.n
    }

    fn result_index(args: &Arguments<T>, id1: usize, id2: usize) -> usize {
        id1 * args.c_ld + id2 + args.c_offset
    }

    fn flops(args: &Arguments<T>) -> u64 {
        let (n, k) = (args.n as u64, args.k as u64);
        n * (n + 1) * k
    }

    fn bytes(args: &Arguments<T>) -> u64 {
        let (n, k) = (args.n as u64, args.k as u64);
        (n * k + n * (n + 1)) * elem_bytes::<T>()
    }
}
