//! Common types for the veriblas verification contract
//!
//! This crate provides the leaf types shared between the routine
//! descriptors, the backend dispatch layer, and the cross-validation
//! driver: the argument record, the layout/triangle/transpose
//! enumerations, the scalar abstraction over real and complex element
//! types, and the dispatch status taxonomy.

pub mod args;
pub mod scalar;
pub mod status;
pub mod types;

pub use args::Arguments;
pub use scalar::Scalar;
pub use status::{DispatchError, DispatchResult, MemoryError};
pub use types::{
    ArgKey, BlasLevel, BufferKind, Diagonal, ErrorMargin, Layout, Side, Transpose, Triangle,
};
