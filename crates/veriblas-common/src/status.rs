//! Dispatch status taxonomy.
//!
//! Every execution entry point returns a status synchronously; no panic
//! crosses the descriptor boundary. `Ok(())` is the success state, the
//! two error variants complete the taxonomy: a backend call that failed
//! with a translatable reason, and a reference implementation that
//! signaled failure without one.

use thiserror::Error;

/// Failure of a dispatch call, carried back to the driver untouched:
/// dispatch never retries or suppresses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The underlying compute call failed; the reason is the backend's
    /// native error translated to text.
    #[error("backend execution failed: {reason}")]
    BackendExecution { reason: String },

    /// A reference implementation failed without a translatable code.
    #[error("reference implementation failed without a translatable error")]
    Unknown,
}

impl DispatchError {
    /// Shorthand for a reasoned backend failure.
    pub fn backend(reason: impl Into<String>) -> Self {
        DispatchError::BackendExecution { reason: reason.into() }
    }
}

pub type DispatchResult = Result<(), DispatchError>;

/// Host/device transfer failure: the requested element count does not
/// fit the buffer. Sizing is exact by contract, so hitting this means a
/// descriptor and its sizing formulas disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("transfer of {requested} elements exceeds buffer capacity {capacity}")]
pub struct MemoryError {
    pub requested: usize,
    pub capacity: usize,
}

impl From<MemoryError> for DispatchError {
    fn from(err: MemoryError) -> Self {
        DispatchError::backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_carries_reason() {
        let err = DispatchError::backend("lda too small");
        assert_eq!(err.to_string(), "backend execution failed: lda too small");
    }

    #[test]
    fn memory_error_translates_to_backend_execution() {
        let err: DispatchError = MemoryError { requested: 8, capacity: 4 }.into();
        match err {
            DispatchError::BackendExecution { reason } => {
                assert!(reason.contains("8"), "reason: {reason}");
                assert!(reason.contains("4"), "reason: {reason}");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
