//! Descriptor for the Hermitian rank-1 update A := alpha * x * x^H + A.
//!
//! The coefficient is real even over complex elements; for real element
//! types the operation degenerates to the symmetric rank-1 update.

use std::marker::PhantomData;

use veriblas_backend::{BlasBackend, Buffers, Queue};
use veriblas_common::{
    ArgKey, Arguments, BlasLevel, BufferKind, DispatchError, DispatchResult, Scalar,
};

use crate::{download_buffer, elem_bytes, matrix_size, vector_size, Routine};

pub struct Her<T: Scalar>(PhantomData<T>);

impl<T: Scalar> Routine for Her<T> {
    type Elem = T;
    type Coef = T::Real;

    const NAME: &'static str = "her";

    fn blas_level() -> BlasLevel {
        BlasLevel::Level2
    }

    fn options() -> Vec<ArgKey> {
        vec![
            ArgKey::N,
            ArgKey::Layout,
            ArgKey::Triangle,
            ArgKey::ALeadDim,
            ArgKey::XInc,
            ArgKey::AOffset,
            ArgKey::XOffset,
            ArgKey::Alpha,
        ]
    }

    fn buffers_in() -> Vec<BufferKind> {
        vec![BufferKind::MatA, BufferKind::VecX]
    }

    fn buffers_out() -> Vec<BufferKind> {
        vec![BufferKind::MatA]
    }

    fn size_x(args: &Arguments<T::Real>) -> usize {
        vector_size(args.n, args.x_inc, args.x_offset)
    }

    fn size_a(args: &Arguments<T::Real>) -> usize {
        matrix_size(args.n, args.a_ld, args.a_offset)
    }

    fn set_sizes(args: &mut Arguments<T::Real>) {
        args.a_size = Self::size_a(args);
        args.x_size = Self::size_x(args);
    }

    fn default_ld_a(args: &Arguments<T::Real>) -> Option<usize> {
        Some(args.n)
    }

    fn run_routine(
        backend: &dyn BlasBackend<T>,
        args: &Arguments<T::Real>,
        buffers: &mut Buffers<T>,
        queue: &Queue,
    ) -> DispatchResult {
        let Buffers { x_vec, a_mat, .. } = buffers;
        backend.her(
            queue,
            args.layout,
            args.triangle,
            args.n,
            args.alpha,
            x_vec,
            args.x_offset,
            args.x_inc,
            a_mat,
            args.a_offset,
            args.a_ld,
        )
    }

    fn download_result(
        args: &Arguments<T::Real>,
        buffers: &Buffers<T>,
        queue: &Queue,
    ) -> Result<Vec<T>, DispatchError> {
        download_buffer(&buffers.a_mat, args.a_size, queue)
    }

    fn result_id1(args: &Arguments<T::Real>) -> usize {
        args.n
    }

    fn result_id2(args: &Arguments<T::Real>) -> usize {
        args.n
    }

    fn result_index(args: &Arguments<T::Real>, id1: usize, id2: usize) -> usize {
        id2 * args.a_ld + id1 + args.a_offset
    }

    fn flops(args: &Arguments<T::Real>) -> u64 {
        3 * args.n as u64 * args.n as u64
    }

    fn bytes(args: &Arguments<T::Real>) -> u64 {
        let n = args.n as u64;
        (n * n + n) * elem_bytes::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex32;

    // The worked reference scenario: n=4, default leading dimension,
    // unit increment, no offsets.
    fn reference_args() -> Arguments<f32> {
        let mut args = Arguments::<f32>::default();
        args.n = 4;
        args.a_ld = Her::<Complex32>::default_ld_a(&args).unwrap();
        args.alpha = 1.0;
        args
    }

    #[test]
    fn reference_scenario_sizes() {
        let mut args = reference_args();
        assert_eq!(args.a_ld, 4);
        Her::<Complex32>::set_sizes(&mut args);
        assert_eq!(args.x_size, 4);
        assert_eq!(args.a_size, 16);
    }

    #[test]
    fn reference_scenario_metrics() {
        let args = reference_args();
        assert_eq!(Her::<Complex32>::flops(&args), 48);
        assert_eq!(Her::<Complex32>::bytes(&args), 20 * std::mem::size_of::<Complex32>() as u64);
    }

    #[test]
    fn reference_scenario_result_addressing() {
        let args = reference_args();
        assert_eq!(Her::<Complex32>::result_id1(&args), 4);
        assert_eq!(Her::<Complex32>::result_id2(&args), 4);
        assert_eq!(Her::<Complex32>::result_index(&args, 2, 3), 14);
    }

    #[test]
    fn set_sizes_is_idempotent() {
        let mut args = reference_args();
        args.x_inc = 2;
        args.a_offset = 10;
        Her::<Complex32>::set_sizes(&mut args);
        let first = args.clone();
        Her::<Complex32>::set_sizes(&mut args);
        assert_eq!(args, first);
    }

    #[test]
    fn coefficient_type_is_real() {
        // Compile-time check: the argument record of a complex her
        // carries a real alpha.
        let args = Arguments::<f64>::default();
        let _: f64 = args.alpha;
        assert_eq!(Her::<num_complex::Complex64>::options().last(), Some(&ArgKey::Alpha));
    }

    #[test]
    fn transposition_is_not_a_concept() {
        assert!(Her::<Complex32>::a_transposes(&veriblas_common::Transpose::ALL).is_empty());
        let args = Arguments::<f32>::default();
        assert_eq!(Her::<Complex32>::default_ld_b(&args), None);
        assert_eq!(Her::<Complex32>::default_ld_c(&args), None);
    }
}
