//! Property tests over the descriptor contract.
//!
//! The invariants every descriptor must hold: computed sizes cover
//! every index the routine touches and nothing less, size write-back is
//! idempotent, and result addressing never aliases two logical
//! coordinates onto one flat index.

use std::collections::HashSet;

use num_complex::{Complex32, Complex64};
use proptest::prelude::*;
use veriblas_common::{Arguments, Layout, Transpose};
use veriblas_routines::{Axpy, Gemv, Her, Routine, Syrk, Trsv};

proptest! {
    /// Every x index her touches (offset + i*inc) lies inside size_x,
    /// and the last touched index is the last allocated element.
    #[test]
    fn her_vector_size_is_exact(
        n in 1usize..24,
        inc in 1usize..5,
        offset in 0usize..12,
    ) {
        let mut args = Arguments::<f32>::default();
        args.n = n;
        args.x_inc = inc;
        args.x_offset = offset;
        args.a_ld = n;
        let size = Her::<Complex32>::size_x(&args);
        let last_touched = offset + (n - 1) * inc;
        prop_assert!(last_touched < size);
        prop_assert_eq!(last_touched, size - 1, "oversizing would hide bounds bugs");
    }

    /// Every a index her touches lies inside size_a.
    #[test]
    fn her_matrix_size_covers_the_update(
        n in 1usize..24,
        ld_extra in 0usize..5,
        offset in 0usize..12,
    ) {
        let mut args = Arguments::<f32>::default();
        args.n = n;
        args.a_ld = n + ld_extra;
        args.a_offset = offset;
        let size = Her::<Complex32>::size_a(&args);
        let last_touched = offset + (n - 1) * args.a_ld + (n - 1);
        prop_assert!(last_touched < size);
    }

    /// gemv's buffer sizes cover the extents under every layout and
    /// transpose combination.
    #[test]
    fn gemv_sizes_cover_all_forms(
        m in 1usize..16,
        n in 1usize..16,
        ld_extra in 0usize..4,
        inc in 1usize..4,
        layout_row in any::<bool>(),
        transposed in any::<bool>(),
    ) {
        let mut args = Arguments::<f32>::default();
        args.m = m;
        args.n = n;
        args.layout = if layout_row { Layout::RowMajor } else { Layout::ColMajor };
        args.a_transpose = if transposed { Transpose::Yes } else { Transpose::No };
        args.x_inc = inc;
        args.y_inc = inc;
        args.a_ld = match args.layout {
            Layout::RowMajor => n + ld_extra,
            Layout::ColMajor => m + ld_extra,
        };
        let a_size = Gemv::<f32>::size_a(&args);
        let last_a = match args.layout {
            Layout::RowMajor => (m - 1) * args.a_ld + (n - 1),
            Layout::ColMajor => (n - 1) * args.a_ld + (m - 1),
        };
        prop_assert!(last_a < a_size);

        let x_extent = if transposed { m } else { n };
        let y_extent = if transposed { n } else { m };
        prop_assert!((x_extent - 1) * inc < Gemv::<f32>::size_x(&args));
        prop_assert!((y_extent - 1) * inc < Gemv::<f32>::size_y(&args));
    }

    /// set_sizes writes the same values no matter how often it runs.
    #[test]
    fn set_sizes_is_idempotent_for_every_routine(
        n in 1usize..24,
        k in 1usize..12,
        inc in 1usize..4,
        offset in 0usize..8,
    ) {
        macro_rules! check {
            ($routine:ty, $coef:ty) => {{
                let mut args = Arguments::<$coef>::default();
                args.m = n;
                args.n = n;
                args.k = k;
                args.x_inc = inc;
                args.y_inc = inc;
                args.x_offset = offset;
                args.a_offset = offset;
                args.a_ld = n + k;
                args.c_ld = n;
                <$routine>::set_sizes(&mut args);
                let first = args.clone();
                <$routine>::set_sizes(&mut args);
                prop_assert_eq!(&args, &first);
            }};
        }
        check!(Axpy<f32>, f32);
        check!(Gemv<f64>, f64);
        check!(Her<Complex32>, f32);
        check!(Trsv<Complex64>, Complex64);
        check!(Syrk<f32>, f32);
    }

    /// With a consistent leading dimension, her's result addressing is
    /// injective over the full id1 x id2 range.
    #[test]
    fn her_result_index_is_injective(
        n in 1usize..16,
        ld_extra in 0usize..4,
        offset in 0usize..8,
    ) {
        let mut args = Arguments::<f32>::default();
        args.n = n;
        args.a_ld = n + ld_extra;
        args.a_offset = offset;
        let mut seen = HashSet::new();
        for id2 in 0..Her::<Complex32>::result_id2(&args) {
            for id1 in 0..Her::<Complex32>::result_id1(&args) {
                prop_assert!(
                    seen.insert(Her::<Complex32>::result_index(&args, id1, id2)),
                    "coordinates ({}, {}) alias another index", id1, id2
                );
            }
        }
        prop_assert_eq!(seen.len(), n * n);
    }

    /// Same for syrk over the C matrix.
    #[test]
    fn syrk_result_index_is_injective(
        n in 1usize..16,
        ld_extra in 0usize..4,
    ) {
        let mut args = Arguments::<f32>::default();
        args.n = n;
        args.c_ld = n + ld_extra;
        let mut seen = HashSet::new();
        for id2 in 0..Syrk::<f32>::result_id2(&args) {
            for id1 in 0..Syrk::<f32>::result_id1(&args) {
                prop_assert!(seen.insert(Syrk::<f32>::result_index(&args, id1, id2)));
            }
        }
        prop_assert_eq!(seen.len(), n * n);
    }

    /// Vector-result routines enumerate id2 = 1 and stay injective in
    /// id1 through the increment.
    #[test]
    fn axpy_result_index_is_injective(n in 1usize..64, inc in 1usize..5) {
        let mut args = Arguments::<f32>::default();
        args.n = n;
        args.y_inc = inc;
        let mut seen = HashSet::new();
        prop_assert_eq!(Axpy::<f32>::result_id2(&args), 1);
        for id1 in 0..Axpy::<f32>::result_id1(&args) {
            prop_assert!(seen.insert(Axpy::<f32>::result_index(&args, id1, 0)));
        }
    }
}

/// The options list names every field the sizing formulas consume, per
/// routine. A formula reading an undeclared field would silently skip
/// sweep coverage.
#[test]
fn options_declare_every_sizing_input() {
    use veriblas_common::ArgKey;

    let axpy = Axpy::<f32>::options();
    for key in [ArgKey::N, ArgKey::XInc, ArgKey::YInc, ArgKey::XOffset, ArgKey::YOffset] {
        assert!(axpy.contains(&key), "axpy misses {key}");
    }

    let gemv = Gemv::<f32>::options();
    for key in [
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
    ] {
        assert!(gemv.contains(&key), "gemv misses {key}");
    }

    let her = Her::<Complex32>::options();
    for key in [
        ArgKey::N,
        ArgKey::Layout,
        ArgKey::Triangle,
        ArgKey::ALeadDim,
        ArgKey::XInc,
        ArgKey::AOffset,
        ArgKey::XOffset,
    ] {
        assert!(her.contains(&key), "her misses {key}");
    }

    let syrk = Syrk::<f32>::options();
    for key in [
        ArgKey::N,
        ArgKey::K,
        ArgKey::Layout,
        ArgKey::ATranspose,
        ArgKey::ALeadDim,
        ArgKey::CLeadDim,
        ArgKey::AOffset,
        ArgKey::COffset,
    ] {
        assert!(syrk.contains(&key), "syrk misses {key}");
    }

    let trsv = Trsv::<f32>::options();
    for key in [ArgKey::N, ArgKey::Diagonal, ArgKey::ALeadDim, ArgKey::XInc] {
        assert!(trsv.contains(&key), "trsv misses {key}");
    }
}

/// Output buffers are always a subset of the pre-populated inputs: the
/// supported routines all read what they update.
#[test]
fn output_buffers_are_also_inputs() {
    fn check(ins: &[veriblas_common::BufferKind], outs: &[veriblas_common::BufferKind]) {
        for out in outs {
            assert!(ins.contains(out), "{out} is written but never pre-populated");
        }
        assert_eq!(outs.len(), 1, "each routine has one authoritative output");
    }
    check(&Axpy::<f32>::buffers_in(), &Axpy::<f32>::buffers_out());
    check(&Gemv::<f32>::buffers_in(), &Gemv::<f32>::buffers_out());
    check(&Her::<Complex32>::buffers_in(), &Her::<Complex32>::buffers_out());
    check(&Trsv::<f32>::buffers_in(), &Trsv::<f32>::buffers_out());
    check(&Syrk::<f32>::buffers_in(), &Syrk::<f32>::buffers_out());
}

/// Levels drive which sweep axes the harness generates at all.
#[test]
fn blas_levels_are_stable() {
    use veriblas_common::BlasLevel;
    use veriblas_routines::BatchedRoutine;

    assert_eq!(Axpy::<f32>::blas_level(), BlasLevel::Level1);
    assert_eq!(Gemv::<f32>::blas_level(), BlasLevel::Level2);
    assert_eq!(Her::<Complex32>::blas_level(), BlasLevel::Level2);
    assert_eq!(Trsv::<f32>::blas_level(), BlasLevel::Level2);
    assert_eq!(Syrk::<f32>::blas_level(), BlasLevel::Level3);
    assert_eq!(veriblas_routines::AxpyBatched::<f32>::blas_level(), BlasLevel::Level1);
}
