//! Enumerations shared by the descriptors, the backends, and the driver.
//!
//! Every backend translates these into its own calling convention; the
//! meaning is always relative to the *logical* matrix, never the storage
//! order (see `Layout` for how storage is derived).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage order of matrix buffers.
///
/// Element (i, j) of a logical matrix with leading dimension `ld` and
/// base `offset` lives at `offset + i*ld + j` (row-major) or
/// `offset + j*ld + i` (column-major).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layout {
    RowMajor,
    ColMajor,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::RowMajor => write!(f, "row-major"),
            Layout::ColMajor => write!(f, "col-major"),
        }
    }
}

/// Which triangle of a symmetric/Hermitian/triangular matrix is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Triangle {
    Upper,
    Lower,
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Triangle::Upper => write!(f, "upper"),
            Triangle::Lower => write!(f, "lower"),
        }
    }
}

/// Transpose mode applied to a matrix operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transpose {
    No,
    Yes,
    /// Conjugate transpose; identical to `Yes` for real element types.
    Conjugate,
}

impl Transpose {
    /// All transpose modes, the candidate set descriptors filter.
    pub const ALL: [Transpose; 3] = [Transpose::No, Transpose::Yes, Transpose::Conjugate];

    /// Returns true when the operand is transposed in any form.
    pub fn is_transposed(self) -> bool {
        !matches!(self, Transpose::No)
    }
}

impl fmt::Display for Transpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transpose::No => write!(f, "no"),
            Transpose::Yes => write!(f, "yes"),
            Transpose::Conjugate => write!(f, "conjugate"),
        }
    }
}

/// Side of a matrix product (kept for level-3 argument records).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Whether a triangular matrix has an implicit unit diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Diagonal {
    Unit,
    NonUnit,
}

impl fmt::Display for Diagonal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagonal::Unit => write!(f, "unit"),
            Diagonal::NonUnit => write!(f, "non-unit"),
        }
    }
}

/// BLAS level of a routine; the driver uses this to decide which
/// parameter combinations are meaningful at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BlasLevel {
    Level1,
    Level2,
    Level3,
}

impl BlasLevel {
    pub fn as_number(self) -> u8 {
        match self {
            BlasLevel::Level1 => 1,
            BlasLevel::Level2 => 2,
            BlasLevel::Level3 => 3,
        }
    }
}

impl fmt::Display for BlasLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level-{}", self.as_number())
    }
}

/// Logical buffer roles of an argument set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BufferKind {
    VecX,
    VecY,
    MatA,
    MatB,
    MatC,
}

impl BufferKind {
    pub const ALL: [BufferKind; 5] = [
        BufferKind::VecX,
        BufferKind::VecY,
        BufferKind::MatA,
        BufferKind::MatB,
        BufferKind::MatC,
    ];
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferKind::VecX => write!(f, "x"),
            BufferKind::VecY => write!(f, "y"),
            BufferKind::MatA => write!(f, "a"),
            BufferKind::MatB => write!(f, "b"),
            BufferKind::MatC => write!(f, "c"),
        }
    }
}

/// Keys naming the `Arguments` fields a routine consumes.
///
/// A descriptor's `options()` list is the contract for which sweep axes
/// the harness generates; the `Display` forms match the conventional
/// BLAS test-client flag names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ArgKey {
    M,
    N,
    K,
    Layout,
    ATranspose,
    BTranspose,
    Side,
    Triangle,
    Diagonal,
    XInc,
    YInc,
    XOffset,
    YOffset,
    ALeadDim,
    BLeadDim,
    CLeadDim,
    AOffset,
    BOffset,
    COffset,
    Alpha,
    Beta,
    BatchCount,
}

impl fmt::Display for ArgKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgKey::M => "m",
            ArgKey::N => "n",
            ArgKey::K => "k",
            ArgKey::Layout => "layout",
            ArgKey::ATranspose => "transA",
            ArgKey::BTranspose => "transB",
            ArgKey::Side => "side",
            ArgKey::Triangle => "triangle",
            ArgKey::Diagonal => "diagonal",
            ArgKey::XInc => "incx",
            ArgKey::YInc => "incy",
            ArgKey::XOffset => "offx",
            ArgKey::YOffset => "offy",
            ArgKey::ALeadDim => "lda",
            ArgKey::BLeadDim => "ldb",
            ArgKey::CLeadDim => "ldc",
            ArgKey::AOffset => "offa",
            ArgKey::BOffset => "offb",
            ArgKey::COffset => "offc",
            ArgKey::Alpha => "alpha",
            ArgKey::Beta => "beta",
            ArgKey::BatchCount => "batch_num",
        };
        write!(f, "{name}")
    }
}

/// Per-element comparison margin used when checking cross-implementation
/// agreement. Relative error applies once values are large enough for it
/// to be meaningful; below `absolute` the difference itself decides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorMargin {
    pub relative: f64,
    pub absolute: f64,
}

impl Default for ErrorMargin {
    fn default() -> Self {
        ErrorMargin { relative: 0.025, absolute: 1.0e-4 }
    }
}
