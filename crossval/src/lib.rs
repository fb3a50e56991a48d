//! Cross-implementation verification for veriblas routines.
//!
//! The driver here is the minimal harness the descriptor contract
//! assumes: it takes any routine descriptor, runs one argument set
//! through the fixed linear sequence (size, allocate, fill, prepare,
//! dispatch, download), repeats the execution on every registered
//! reference implementation, and compares results element by element
//! through the descriptor's logical-to-flat index mapping.
//!
//! Sweeping over argument combinations, statistics, and reporting
//! beyond the per-case record belong to the caller.

pub mod compare;
pub mod config;
pub mod driver;

pub use compare::{similar, Comparison};
pub use config::{example_coefficients, SweepConfig};
pub use driver::{run_batched_case, run_case, CaseReport, ReferenceOutcome};
