//! Descriptor for the batched scaled vector addition.
//!
//! One backend call updates `batch_count` independent vector pairs,
//! each with its own coefficient derived from the base alpha. Sizing,
//! result addressing, and metrics are all per batch item; batch items
//! carry no base offsets.

use std::marker::PhantomData;

use veriblas_backend::{BlasBackend, Buffers, Queue, VectorPair};
use veriblas_common::{
    ArgKey, Arguments, BlasLevel, BufferKind, DispatchError, DispatchResult, Scalar,
};

use crate::{download_buffer, elem_bytes, vector_size, BatchedRoutine};

pub struct AxpyBatched<T: Scalar>(PhantomData<T>);

impl<T: Scalar> BatchedRoutine for AxpyBatched<T> {
    type Elem = T;
    type Coef = T;

    const NAME: &'static str = "axpy-batched";

    // Not a BLAS routine proper, but it sweeps like the level-1 ones.
    fn blas_level() -> BlasLevel {
        BlasLevel::Level1
    }

    fn options() -> Vec<ArgKey> {
        vec![ArgKey::N, ArgKey::XInc, ArgKey::YInc, ArgKey::Alpha, ArgKey::BatchCount]
    }

    fn buffers_in() -> Vec<BufferKind> {
        vec![BufferKind::VecX, BufferKind::VecY]
    }

    fn buffers_out() -> Vec<BufferKind> {
        vec![BufferKind::VecY]
    }

    fn size_x(args: &Arguments<T>) -> usize {
        vector_size(args.n, args.x_inc, 0)
    }

    fn size_y(args: &Arguments<T>) -> usize {
        vector_size(args.n, args.y_inc, 0)
    }

    fn set_sizes(args: &mut Arguments<T>) {
        args.x_size = Self::size_x(args);
        args.y_size = Self::size_y(args);
    }

    fn alpha_for_batch(alpha: T, batch_id: usize) -> T {
        alpha + T::from_f32(batch_id as f32)
    }

    fn run_routine(
        backend: &dyn BlasBackend<T>,
        args: &Arguments<T>,
        batches: &mut [Buffers<T>],
        queue: &Queue,
    ) -> DispatchResult {
        let alphas: Vec<T> =
            (0..args.batch_count).map(|b| Self::alpha_for_batch(args.alpha, b)).collect();
        let mut pairs: Vec<VectorPair<'_, T>> = batches
            .iter_mut()
            .map(|item| {
                let Buffers { x_vec, y_vec, .. } = item;
                VectorPair { x: &*x_vec, y: y_vec }
            })
            .collect();
        backend.axpy_batched(queue, args.n, &alphas, args.x_inc, args.y_inc, &mut pairs)
    }

    fn download_result(
        args: &Arguments<T>,
        buffers: &Buffers<T>,
        queue: &Queue,
    ) -> Result<Vec<T>, DispatchError> {
        download_buffer(&buffers.y_vec, args.y_size, queue)
    }

    fn result_id1(args: &Arguments<T>) -> usize {
        args.n
    }

    fn result_index(args: &Arguments<T>, id1: usize, _id2: usize) -> usize {
        id1 * args.y_inc
    }

    fn flops(args: &Arguments<T>) -> u64 {
        2 * args.n as u64
    }

    fn bytes(args: &Arguments<T>) -> u64 {
        3 * args.n as u64 * elem_bytes::<T>()
    }
}
