//! Descriptor for the scaled vector addition y := alpha * x + y.

use std::marker::PhantomData;

use veriblas_backend::{BlasBackend, Buffers, Queue};
use veriblas_common::{
    ArgKey, Arguments, BlasLevel, BufferKind, DispatchError, DispatchResult, Scalar,
};

use crate::{download_buffer, elem_bytes, vector_size, Routine};

pub struct Axpy<T: Scalar>(PhantomData<T>);

impl<T: Scalar> Routine for Axpy<T> {
    type Elem = T;
    type Coef = T;

    const NAME: &'static str = "axpy";

    fn blas_level() -> BlasLevel {
        BlasLevel::Level1
    }

    fn options() -> Vec<ArgKey> {
        vec![
            ArgKey::N,
            ArgKey::XInc,
            ArgKey::YInc,
            ArgKey::XOffset,
            ArgKey::YOffset,
            ArgKey::Alpha,
        ]
    }

    fn buffers_in() -> Vec<BufferKind> {
        vec![BufferKind::VecX, BufferKind::VecY]
    }

    fn buffers_out() -> Vec<BufferKind> {
        vec![BufferKind::VecY]
    }

    fn size_x(args: &Arguments<T>) -> usize {
        vector_size(args.n, args.x_inc, args.x_offset)
    }

    fn size_y(args: &Arguments<T>) -> usize {
        vector_size(args.n, args.y_inc, args.y_offset)
    }

    fn set_sizes(args: &mut Arguments<T>) {
        args.x_size = Self::size_x(args);
        args.y_size = Self::size_y(args);
    }

    fn run_routine(
        backend: &dyn BlasBackend<T>,
        args: &Arguments<T>,
        buffers: &mut Buffers<T>,
        queue: &Queue,
    ) -> DispatchResult {
        let Buffers { x_vec, y_vec, .. } = buffers;
        backend.axpy(
            queue,
            args.n,
            args.alpha,
            x_vec,
            args.x_offset,
            args.x_inc,
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
        args.n
    }

    fn result_index(args: &Arguments<T>, id1: usize, _id2: usize) -> usize {
        id1 * args.y_inc + args.y_offset
    }

    fn flops(args: &Arguments<T>) -> u64 {
        2 * args.n as u64
    }

    fn bytes(args: &Arguments<T>) -> u64 {
        3 * args.n as u64 * elem_bytes::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_are_exact_for_strided_vectors() {
        let mut args = Arguments::<f32>::default();
        args.n = 4;
        args.x_inc = 2;
        args.y_inc = 3;
        args.y_offset = 5;
        assert_eq!(Axpy::<f32>::size_x(&args), 7);
        assert_eq!(Axpy::<f32>::size_y(&args), 15);
    }

    #[test]
    fn set_sizes_writes_both_vectors_back() {
        let mut args = Arguments::<f32>::default();
        args.n = 7;
        Axpy::<f32>::set_sizes(&mut args);
        assert_eq!(args.x_size, 7);
        assert_eq!(args.y_size, 7);
        assert_eq!(args.a_size, 1, "matrix buffers stay untouched");
    }

    #[test]
    fn options_cover_every_sizing_input() {
        let options = Axpy::<f32>::options();
        for key in [ArgKey::N, ArgKey::XInc, ArgKey::YInc, ArgKey::XOffset, ArgKey::YOffset] {
            assert!(options.contains(&key), "missing {key}");
        }
    }

    #[test]
    fn no_leading_dimension_applies() {
        let args = Arguments::<f32>::default();
        assert_eq!(Axpy::<f32>::default_ld_a(&args), None);
        assert!(Axpy::<f32>::a_transposes(&veriblas_common::Transpose::ALL).is_empty());
    }

    #[test]
    fn metrics_scale_linearly() {
        let mut args = Arguments::<f64>::default();
        args.n = 100;
        assert_eq!(Axpy::<f64>::flops(&args), 200);
        assert_eq!(Axpy::<f64>::bytes(&args), 300 * 8);
    }
}
