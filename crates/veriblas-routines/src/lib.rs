//! Routine descriptors for the veriblas verification harness.
//!
//! Each supported kernel contributes one descriptor: a marker type
//! implementing [`Routine`] (or [`BatchedRoutine`] for batched
//! variants). A descriptor is a stateless bundle of pure functions
//! answering the fixed set of questions a generic driver asks: how
//! large every buffer must be, which parameters apply, how to dispatch
//! the kernel through a backend, how to download and address results,
//! and what the operation's FLOP and byte counts are. The driver is
//! generic over the trait and never names a concrete routine.

use veriblas_backend::{BlasBackend, Buffer, Buffers, Queue};
use veriblas_common::{
    ArgKey, Arguments, BlasLevel, BufferKind, DispatchError, DispatchResult, ErrorMargin, Scalar,
    Transpose,
};

pub mod axpy;
pub mod axpy_batched;
pub mod gemv;
pub mod her;
pub mod syrk;
pub mod trsv;

pub use axpy::Axpy;
pub use axpy_batched::AxpyBatched;
pub use gemv::Gemv;
pub use her::Her;
pub use syrk::Syrk;
pub use trsv::Trsv;

/// Minimum element count of a strided vector: every touched index
/// (`offset + i*inc` for `i < extent`) is in bounds, and not one
/// element more, so undersizing *and* oversizing bugs stay visible.
/// Zero extents are valid degenerate cases.
pub(crate) fn vector_size(extent: usize, inc: usize, offset: usize) -> usize {
    if extent == 0 {
        offset + 1
    } else {
        (extent - 1) * inc + 1 + offset
    }
}

/// Minimum element count of a matrix stored with `extent2` major slices
/// of `ld` elements each.
pub(crate) fn matrix_size(extent2: usize, ld: usize, offset: usize) -> usize {
    extent2 * ld + offset
}

/// Reads `size` elements of `buf` into a zero-initialized host vector,
/// so untouched regions are distinguishable from zero-valued results.
pub(crate) fn download_buffer<T: Scalar>(
    buf: &Buffer<T>,
    size: usize,
    queue: &Queue,
) -> Result<Vec<T>, DispatchError> {
    let mut host = vec![T::zero(); size];
    buf.read(queue, size, &mut host)?;
    Ok(host)
}

pub(crate) fn elem_bytes<T: Scalar>() -> u64 {
    std::mem::size_of::<T>() as u64
}

/// The per-routine descriptor contract.
///
/// Implementations are stateless: every operation is a pure function of
/// the argument record except the dispatch calls, which execute through
/// the passed backend, and `set_sizes`, which writes the derived sizes
/// back into the shared record. `set_sizes` must run after all
/// sizing-relevant fields are final and before any buffer allocation.
pub trait Routine {
    /// Element type of the buffers.
    type Elem: Scalar;
    /// Type of the scalar coefficients; equals `Elem` except where a
    /// routine takes a real coefficient over complex elements.
    type Coef: Scalar;

    const NAME: &'static str;

    /// Static classification deciding which parameter combinations are
    /// meaningful at all.
    fn blas_level() -> BlasLevel;

    /// Exactly the argument fields this routine consumes; the driver
    /// derives its sweep axes from this list. A parameter referenced by
    /// a sizing formula but missing here is a contract violation.
    fn options() -> Vec<ArgKey>;

    /// Buffers the routine reads; the driver pre-populates these with
    /// reproducible random data.
    fn buffers_in() -> Vec<BufferKind>;

    /// Buffers the routine writes; the authoritative output is
    /// downloaded after execution. A buffer may appear in both lists
    /// (in-place update).
    fn buffers_out() -> Vec<BufferKind>;

    fn size_x(_args: &Arguments<Self::Coef>) -> usize {
        1
    }

    fn size_y(_args: &Arguments<Self::Coef>) -> usize {
        1
    }

    fn size_a(_args: &Arguments<Self::Coef>) -> usize {
        1
    }

    fn size_b(_args: &Arguments<Self::Coef>) -> usize {
        1
    }

    fn size_c(_args: &Arguments<Self::Coef>) -> usize {
        1
    }

    /// Writes every size the routine uses back into `args`. Idempotent
    /// while the sizing-relevant fields are unchanged.
    fn set_sizes(args: &mut Arguments<Self::Coef>);

    /// Routine-appropriate leading-dimension default; `None` when the
    /// routine has no use for the parameter.
    fn default_ld_a(_args: &Arguments<Self::Coef>) -> Option<usize> {
        None
    }

    fn default_ld_b(_args: &Arguments<Self::Coef>) -> Option<usize> {
        None
    }

    fn default_ld_c(_args: &Arguments<Self::Coef>) -> Option<usize> {
        None
    }

    /// Narrows the generic transpose candidates to the modes meaningful
    /// for this routine; empty means transpose is not a concept here.
    fn a_transposes(_candidates: &[Transpose]) -> Vec<Transpose> {
        Vec::new()
    }

    fn b_transposes(_candidates: &[Transpose]) -> Vec<Transpose> {
        Vec::new()
    }

    /// Hook for routines needing auxiliary input conditioning beyond
    /// random-filled buffers. May rewrite buffer contents in place;
    /// never resizes.
    fn prepare_data(
        _args: &Arguments<Self::Coef>,
        _queue: &Queue,
        _seed: u64,
        _buffers: &mut Buffers<Self::Elem>,
    ) -> DispatchResult {
        Ok(())
    }

    /// Dispatches the operation through `backend`. Synchronous: on
    /// `Ok`, results are immediately downloadable. The same entry point
    /// serves the device under test and every registered reference.
    fn run_routine(
        backend: &dyn BlasBackend<Self::Elem>,
        args: &Arguments<Self::Coef>,
        buffers: &mut Buffers<Self::Elem>,
        queue: &Queue,
    ) -> DispatchResult;

    /// Downloads the authoritative output buffer.
    fn download_result(
        args: &Arguments<Self::Coef>,
        buffers: &Buffers<Self::Elem>,
        queue: &Queue,
    ) -> Result<Vec<Self::Elem>, DispatchError>;

    /// Iteration bounds for enumerating logical result coordinates.
    fn result_id1(args: &Arguments<Self::Coef>) -> usize;

    fn result_id2(_args: &Arguments<Self::Coef>) -> usize {
        1
    }

    /// Maps a logical coordinate to the flat index in the downloaded
    /// sequence, honoring leading dimension and base offset.
    fn result_index(args: &Arguments<Self::Coef>, id1: usize, id2: usize) -> usize;

    /// Defined floating-point operation count; reporting only.
    fn flops(args: &Arguments<Self::Coef>) -> u64;

    /// Elements read plus elements written, in bytes.
    fn bytes(args: &Arguments<Self::Coef>) -> u64;

    /// Per-element agreement margin for cross-implementation checks.
    fn error_margin() -> ErrorMargin {
        ErrorMargin::default()
    }
}

/// Descriptor contract for batched routine variants.
///
/// Sizes, result addressing, and metrics are all per batch item; the
/// dispatch runs once over the whole batch with a per-item coefficient.
pub trait BatchedRoutine {
    type Elem: Scalar;
    type Coef: Scalar;

    const NAME: &'static str;

    fn blas_level() -> BlasLevel;
    fn options() -> Vec<ArgKey>;
    fn buffers_in() -> Vec<BufferKind>;
    fn buffers_out() -> Vec<BufferKind>;

    fn size_x(_args: &Arguments<Self::Coef>) -> usize {
        1
    }

    fn size_y(_args: &Arguments<Self::Coef>) -> usize {
        1
    }

    fn set_sizes(args: &mut Arguments<Self::Coef>);

    fn default_ld_a(_args: &Arguments<Self::Coef>) -> Option<usize> {
        None
    }

    fn default_ld_b(_args: &Arguments<Self::Coef>) -> Option<usize> {
        None
    }

    fn default_ld_c(_args: &Arguments<Self::Coef>) -> Option<usize> {
        None
    }

    fn a_transposes(_candidates: &[Transpose]) -> Vec<Transpose> {
        Vec::new()
    }

    fn b_transposes(_candidates: &[Transpose]) -> Vec<Transpose> {
        Vec::new()
    }

    /// Per-item conditioning hook; a no-op for routines without special
    /// input requirements.
    fn prepare_data(
        _args: &Arguments<Self::Coef>,
        _queue: &Queue,
        _seed: u64,
        _buffers: &mut Buffers<Self::Elem>,
    ) -> DispatchResult {
        Ok(())
    }

    /// The coefficient applied to batch item `batch_id`.
    fn alpha_for_batch(alpha: Self::Coef, batch_id: usize) -> Self::Coef;

    fn run_routine(
        backend: &dyn BlasBackend<Self::Elem>,
        args: &Arguments<Self::Coef>,
        batches: &mut [Buffers<Self::Elem>],
        queue: &Queue,
    ) -> DispatchResult;

    /// Downloads one batch item's output buffer.
    fn download_result(
        args: &Arguments<Self::Coef>,
        buffers: &Buffers<Self::Elem>,
        queue: &Queue,
    ) -> Result<Vec<Self::Elem>, DispatchError>;

    fn result_id1(args: &Arguments<Self::Coef>) -> usize;

    fn result_id2(_args: &Arguments<Self::Coef>) -> usize {
        1
    }

    fn result_index(args: &Arguments<Self::Coef>, id1: usize, id2: usize) -> usize;

    fn flops(args: &Arguments<Self::Coef>) -> u64;
    fn bytes(args: &Arguments<Self::Coef>) -> u64;

    fn error_margin() -> ErrorMargin {
        ErrorMargin::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_size_is_exact() {
        assert_eq!(vector_size(4, 1, 0), 4);
        assert_eq!(vector_size(4, 2, 0), 7, "last touched index is 6");
        assert_eq!(vector_size(4, 2, 3), 10);
        assert_eq!(vector_size(0, 7, 5), 6, "zero extent degenerates to offset + 1");
    }

    #[test]
    fn matrix_size_covers_all_slices() {
        assert_eq!(matrix_size(4, 4, 0), 16);
        assert_eq!(matrix_size(4, 5, 2), 22);
    }
}
