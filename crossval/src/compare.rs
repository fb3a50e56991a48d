//! Element-wise agreement checks between two downloaded result buffers.
//!
//! Comparisons walk the descriptor's logical coordinate space and map
//! each coordinate to a flat index, so they are independent of the
//! physical layout a backend chose. Complex values are compared per
//! component.

use num_traits::Float;
use serde::Serialize;

use veriblas_common::{Arguments, ErrorMargin, Scalar};
use veriblas_routines::{BatchedRoutine, Routine};

/// Aggregate of one element-wise comparison.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Comparison {
    /// Logical coordinates enumerated.
    pub checked: usize,
    /// Elements outside the agreement margin.
    pub mismatches: usize,
    /// Largest per-component absolute difference seen.
    pub max_deviation: f64,
}

impl Comparison {
    pub fn agreeing(&self) -> bool {
        self.mismatches == 0
    }

    /// Folds another comparison in (used for batched results).
    pub fn merge(&mut self, other: Comparison) {
        self.checked += other.checked;
        self.mismatches += other.mismatches;
        self.max_deviation = self.max_deviation.max(other.max_deviation);
    }
}

fn to_f64<F: Float>(value: F) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Per-component similarity: exact matches (covering infinities) pass,
/// tiny or zero-involved values are held to the absolute margin, and
/// everything else to the relative one.
pub fn similar_values(val1: f64, val2: f64, margin: ErrorMargin) -> bool {
    let difference = (val1 - val2).abs();
    if val1 == val2 {
        return true;
    }
    if val1 == 0.0 || val2 == 0.0 || difference < margin.absolute {
        return difference < margin.absolute;
    }
    let relative = difference / (val1.abs() + val2.abs());
    relative < margin.relative
}

/// Scalar similarity, component-wise for complex element types.
pub fn similar<T: Scalar>(a: T, b: T, margin: ErrorMargin) -> bool {
    similar_values(to_f64(a.re()), to_f64(b.re()), margin)
        && similar_values(to_f64(a.im()), to_f64(b.im()), margin)
}

fn deviation<T: Scalar>(a: T, b: T) -> f64 {
    let re = (to_f64(a.re()) - to_f64(b.re())).abs();
    let im = (to_f64(a.im()) - to_f64(b.im())).abs();
    re.max(im)
}

fn compare_indexed<T: Scalar>(
    id1_extent: usize,
    id2_extent: usize,
    index: impl Fn(usize, usize) -> usize,
    device: &[T],
    reference: &[T],
    margin: ErrorMargin,
) -> Comparison {
    let mut outcome = Comparison::default();
    for id2 in 0..id2_extent {
        for id1 in 0..id1_extent {
            let flat = index(id1, id2);
            let (a, b) = (device[flat], reference[flat]);
            outcome.checked += 1;
            outcome.max_deviation = outcome.max_deviation.max(deviation(a, b));
            if !similar(a, b, margin) {
                outcome.mismatches += 1;
            }
        }
    }
    outcome
}

/// Compares two downloads of a routine's output buffer.
pub fn compare_results<R: Routine>(
    args: &Arguments<R::Coef>,
    device: &[R::Elem],
    reference: &[R::Elem],
    margin: ErrorMargin,
) -> Comparison {
    compare_indexed(
        R::result_id1(args),
        R::result_id2(args),
        |id1, id2| R::result_index(args, id1, id2),
        device,
        reference,
        margin,
    )
}

/// Compares one batch item of a batched routine's output.
pub fn compare_batched_results<R: BatchedRoutine>(
    args: &Arguments<R::Coef>,
    device: &[R::Elem],
    reference: &[R::Elem],
    margin: ErrorMargin,
) -> Comparison {
    compare_indexed(
        R::result_id1(args),
        R::result_id2(args),
        |id1, id2| R::result_index(args, id1, id2),
        device,
        reference,
        margin,
    )
}
