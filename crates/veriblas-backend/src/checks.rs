//! Capacity and argument validation shared by the built-in backends.
//!
//! Undersized buffers and zero strides come back as reasoned dispatch
//! errors, never as a panic or an out-of-bounds access.

use veriblas_common::{DispatchError, DispatchResult, Layout, Scalar};

use crate::memory::Buffer;

/// Element index of logical matrix entry (row, col).
pub(crate) fn mat_at(layout: Layout, offset: usize, ld: usize, row: usize, col: usize) -> usize {
    match layout {
        Layout::RowMajor => offset + row * ld + col,
        Layout::ColMajor => offset + col * ld + row,
    }
}

/// A vector stride of zero would alias every element.
pub(crate) fn require_inc(what: &str, inc: usize) -> DispatchResult {
    if inc == 0 {
        return Err(DispatchError::backend(format!("{what} increment must be nonzero")));
    }
    Ok(())
}

/// Ensures `extent` strided elements starting at `offset` fit in `buf`.
pub(crate) fn require_vector<T: Scalar>(
    buf: &Buffer<T>,
    what: &str,
    extent: usize,
    inc: usize,
    offset: usize,
) -> DispatchResult {
    require_inc(what, inc)?;
    if extent == 0 {
        return Ok(());
    }
    let needed = offset + (extent - 1) * inc + 1;
    if buf.len() < needed {
        return Err(DispatchError::backend(format!(
            "{what} vector too small: needs {needed} elements, buffer holds {}",
            buf.len()
        )));
    }
    Ok(())
}

/// Ensures a logical `rows` x `cols` matrix at `offset` with leading
/// dimension `ld` fits in `buf` under `layout`.
pub(crate) fn require_matrix<T: Scalar>(
    buf: &Buffer<T>,
    what: &str,
    layout: Layout,
    rows: usize,
    cols: usize,
    ld: usize,
    offset: usize,
) -> DispatchResult {
    if rows == 0 || cols == 0 {
        return Ok(());
    }
    let min_ld = match layout {
        Layout::RowMajor => cols,
        Layout::ColMajor => rows,
    };
    if ld < min_ld {
        return Err(DispatchError::backend(format!(
            "{what} leading dimension {ld} below minimum {min_ld}"
        )));
    }
    let needed = mat_at(layout, offset, ld, rows - 1, cols - 1) + 1;
    if buf.len() < needed {
        return Err(DispatchError::backend(format!(
            "{what} matrix too small: needs {needed} elements, buffer holds {}",
            buf.len()
        )));
    }
    Ok(())
}
