//! Descriptor for the matrix-vector product y := alpha * op(A) * x + beta * y.

use std::marker::PhantomData;

use veriblas_backend::{BlasBackend, Buffers, Queue};
use veriblas_common::{
    ArgKey, Arguments, BlasLevel, BufferKind, DispatchError, DispatchResult, Layout, Scalar,
    Transpose,
};

use crate::{download_buffer, elem_bytes, matrix_size, vector_size, Routine};

pub struct Gemv<T: Scalar>(PhantomData<T>);

impl<T: Scalar> Routine for Gemv<T> {
    type Elem = T;
    type Coef = T;

    const NAME: &'static str = "gemv";

    fn blas_level() -> BlasLevel {
        BlasLevel::Level2
    }

    fn options() -> Vec<ArgKey> {
        vec![
            ArgKey::M,
            ArgKey::N,
            ArgKey::Layout,
            ArgKey::ATranspose,
            ArgKey::ALeadDim,
            ArgKey::XInc,
            ArgKey::YInc,
            ArgKey::AOffset,
            ArgKey::XOffset,
            ArgKey::YOffset,
            ArgKey::Alpha,
            ArgKey::Beta,
        ]
    }

    fn buffers_in() -> Vec<BufferKind> {
        vec![BufferKind::MatA, BufferKind::VecX, BufferKind::VecY]
    }

    fn buffers_out() -> Vec<BufferKind> {
        vec![BufferKind::VecY]
    }

    fn size_a(args: &Arguments<T>) -> usize {
        // Row-major storage holds m slices of lda elements, column-major n.
        let a_two = match args.layout {
            Layout::RowMajor => args.m,
            Layout::ColMajor => args.n,
        };
        matrix_size(a_two, args.a_ld, args.a_offset)
    }

    fn size_x(args: &Arguments<T>) -> usize {
        let extent = if args.a_transpose.is_transposed() { args.m } else { args.n };
        vector_size(extent, args.x_inc, args.x_offset)
    }

    fn size_y(args: &Arguments<T>) -> usize {
        let extent = if args.a_transpose.is_transposed() { args.n } else { args.m };
        vector_size(extent, args.y_inc, args.y_offset)
    }

    fn set_sizes(args: &mut Arguments<T>) {
        args.a_size = Self::size_a(args);
        args.x_size = Self::size_x(args);
        args.y_size = Self::size_y(args);
    }

    fn default_ld_a(args: &Arguments<T>) -> Option<usize> {
        Some(args.n)
    }

    fn a_transposes(candidates: &[Transpose]) -> Vec<Transpose> {
        candidates.to_vec()
    }

    fn run_routine(
        backend: &dyn BlasBackend<T>,
        args: &Arguments<T>,
        buffers: &mut Buffers<T>,
        queue: &Queue,
    ) -> DispatchResult {
        let Buffers { x_vec, y_vec, a_mat, .. } = buffers;
        backend.gemv(
            queue,
            args.layout,
            args.a_transpose,
            args.m,
            args.n,
            args.alpha,
            a_mat,
            args.a_offset,
            args.a_ld,
            x_vec,
            args.x_offset,
            args.x_inc,
            args.beta,
            y_vec,
            args.y_offset,
            args.y_inc,
        )
    }

    fn download_result(
        args: &Arguments<T>,
        buffers: &Buffers<T>,
        queue: &Queue,
    ) -> Result<Vec<T>, DispatchError> {
        download_buffer(&buffers.y_vec, args.y_size, queue)
    }

    fn result_id1(args: &Arguments<T>) -> usize {
        if args.a_transpose.is_transposed() {
            args.n
        } else {
            args.m
        }
    }

    fn result_index(args: &Arguments<T>, id1: usize, _id2: usize) -> usize {
        id1 * args.y_inc + args.y_offset
    }

    fn flops(args: &Arguments<T>) -> u64 {
        2 * args.m as u64 * args.n as u64
    }

    fn bytes(args: &Arguments<T>) -> u64 {
        let (m, n) = (args.m as u64, args.n as u64);
        (m * n + n + 2 * m) * elem_bytes::<T>()
    }
}
