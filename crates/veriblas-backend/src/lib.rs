//! Backend dispatch layer for the veriblas verification contract.
//!
//! The device under test and every reference implementation all
//! implement [`BlasBackend`]; each impl owns the translation of the
//! shared layout/triangle/transpose semantics into its own calling
//! convention. A mismatch in that translation is a silent correctness
//! bug, which is why the semantics are pinned down here (see the
//! `Layout` docs in `veriblas-common`) and cross-checked by the
//! `crossval` tests.

use veriblas_common::{Diagonal, DispatchResult, Layout, Scalar, Transpose, Triangle};

mod checks;
pub mod host;
pub mod memory;
#[cfg(feature = "ref-ndarray")]
pub mod ndarray_ref;
pub mod registry;

pub use host::HostBackend;
pub use memory::{Buffer, Buffers, Queue};
#[cfg(feature = "ref-ndarray")]
pub use ndarray_ref::NdarrayBackend;
pub use registry::ReferenceRegistry;

/// One batch item of a batched vector routine: the input vector and the
/// updated vector, borrowed from that item's buffer set.
pub struct VectorPair<'a, T: Scalar> {
    pub x: &'a Buffer<T>,
    pub y: &'a mut Buffer<T>,
}

/// The dispatch seam between descriptors and compute backends.
///
/// Contract for every method: the call is synchronous. A method must
/// not return `Ok` unless the operation has been submitted and the
/// queue synchronized, so the caller can download results immediately.
/// Failures come back as `DispatchError`, translated from the backend's
/// native reporting; implementations validate buffer capacities against
/// the extents they are asked to touch rather than indexing out of
/// bounds.
#[allow(clippy::too_many_arguments)]
pub trait BlasBackend<T: Scalar>: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the backend can execute in the current environment.
    fn is_available(&self) -> bool {
        true
    }

    /// y := alpha * x + y
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
    ) -> DispatchResult;

    /// y := alpha * op(A) * x + beta * y
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
    ) -> DispatchResult;

    /// A := alpha * x * x^H + A, touching only the stored triangle.
    /// The coefficient is real; for real element types this is the
    /// symmetric rank-1 update.
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
    ) -> DispatchResult;

    /// C := alpha * op(A) * op(A)^T + beta * C, touching only the
    /// stored triangle. Conjugate transposition is not part of this
    /// operation's domain and is reported as a backend failure.
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
    ) -> DispatchResult;

    /// Solves op(A) * x = b in place, where b arrives in the x buffer.
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
    ) -> DispatchResult;

    /// One axpy per batch item, submitted as a single batched call with
    /// a per-item coefficient.
    fn axpy_batched(
        &self,
        queue: &Queue,
        n: usize,
        alphas: &[T],
        x_inc: usize,
        y_inc: usize,
        batches: &mut [VectorPair<'_, T>],
    ) -> DispatchResult;
}
