//! Scalar abstraction over the supported element types.
//!
//! Routines are generic over `f32`, `f64`, `Complex<f32>`, and
//! `Complex<f64>`. The trait carries exactly what the descriptors and
//! backends need: the underlying real type, conjugation, modulus, and
//! reproducible sampling for input data.

use std::fmt;
use std::ops::Neg;

use num_complex::Complex;
use num_traits::{Float, NumAssign};
use rand::Rng;

/// Element type of a routine's buffers or coefficients.
pub trait Scalar:
    Copy
    + PartialEq
    + fmt::Debug
    + fmt::Display
    + NumAssign
    + Neg<Output = Self>
    + Send
    + Sync
    + 'static
{
    /// The real scalar type underlying this element type; `Self` for
    /// real types, the component type for complex types.
    type Real: Scalar + Float + From<f32>;

    /// Embeds a real value (imaginary part zero for complex types).
    fn from_real(re: Self::Real) -> Self;

    /// Builds a value from components; real types drop the imaginary
    /// part, matching how shared coefficient tables are specialised.
    fn from_parts(re: Self::Real, im: Self::Real) -> Self;

    /// Convenience embedding of an `f32` constant.
    fn from_f32(value: f32) -> Self {
        Self::from_real(value.into())
    }

    /// Real part.
    fn re(self) -> Self::Real;

    /// Imaginary part; zero for real types.
    fn im(self) -> Self::Real;

    /// Complex conjugate; the identity for real types.
    fn conj(self) -> Self;

    /// Absolute value (modulus for complex types).
    fn modulus(self) -> Self::Real;

    /// Whether the element type carries an imaginary component.
    fn is_complex() -> bool;

    /// Draws a value with every component uniform in [-2, 2), the range
    /// the verification driver fills input buffers from.
    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

macro_rules! impl_real_scalar {
    ($t:ty) => {
        impl Scalar for $t {
            type Real = $t;

            fn from_real(re: $t) -> Self {
                re
            }

            fn from_parts(re: $t, _im: $t) -> Self {
                re
            }

            fn re(self) -> $t {
                self
            }

            fn im(self) -> $t {
                0.0
            }

            fn conj(self) -> Self {
                self
            }

            fn modulus(self) -> $t {
                self.abs()
            }

            fn is_complex() -> bool {
                false
            }

            fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
                rng.gen_range(-2.0..2.0)
            }
        }
    };
}

impl_real_scalar!(f32);
impl_real_scalar!(f64);

impl<F> Scalar for Complex<F>
where
    F: Scalar<Real = F> + Float + From<f32>,
{
    type Real = F;

    fn from_real(re: F) -> Self {
        Complex::new(re, F::zero())
    }

    fn from_parts(re: F, im: F) -> Self {
        Complex::new(re, im)
    }

    fn re(self) -> F {
        self.re
    }

    fn im(self) -> F {
        self.im
    }

    fn conj(self) -> Self {
        Complex::new(self.re, -self.im)
    }

    fn modulus(self) -> F {
        self.norm()
    }

    fn is_complex() -> bool {
        true
    }

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Complex::new(F::sample(rng), F::sample(rng))
    }
}
