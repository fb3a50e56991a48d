//! Host-emulated queue and buffer model.
//!
//! The verification contract treats device, queue, and transfer
//! mechanics as external collaborators; this module provides the
//! narrow interface the descriptors program against. `Buffer` emulates
//! device-resident memory: descriptors and the driver never touch its
//! storage directly, they move data through explicit `read`/`write`
//! transfers on a `Queue`. Backend implementations get device-side
//! access through `as_slice`/`as_mut_slice`.

use veriblas_common::{Arguments, BufferKind, MemoryError, Scalar};

/// Execution context handle, the synchronization point of every
/// dispatch. The host-emulated queue executes synchronously; `finish`
/// exists so dispatch implementations state the contract explicitly:
/// when a dispatch call returns success, results are downloadable.
#[derive(Debug, Clone)]
pub struct Queue {
    device_name: String,
}

impl Queue {
    pub fn new() -> Self {
        Queue { device_name: "host-emulated".to_string() }
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Blocks until all work submitted to this queue has completed.
    pub fn finish(&self) {}
}

impl Default for Queue {
    fn default() -> Self {
        Queue::new()
    }
}

/// A device-resident buffer of `len` elements, zero-filled at
/// allocation time.
#[derive(Debug, Clone)]
pub struct Buffer<T: Scalar> {
    mem: Vec<T>,
}

impl<T: Scalar> Buffer<T> {
    /// Allocates `len` elements on the device behind `queue`.
    pub fn alloc(_queue: &Queue, len: usize) -> Self {
        Buffer { mem: vec![T::zero(); len] }
    }

    pub fn len(&self) -> usize {
        self.mem.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mem.is_empty()
    }

    /// Copies the first `n` elements from `host` into the buffer.
    pub fn write(&mut self, queue: &Queue, n: usize, host: &[T]) -> Result<(), MemoryError> {
        if n > self.mem.len() {
            return Err(MemoryError { requested: n, capacity: self.mem.len() });
        }
        if n > host.len() {
            return Err(MemoryError { requested: n, capacity: host.len() });
        }
        self.mem[..n].copy_from_slice(&host[..n]);
        queue.finish();
        Ok(())
    }

    /// Copies the first `n` elements of the buffer into `host`.
    pub fn read(&self, queue: &Queue, n: usize, host: &mut [T]) -> Result<(), MemoryError> {
        if n > self.mem.len() {
            return Err(MemoryError { requested: n, capacity: self.mem.len() });
        }
        if n > host.len() {
            return Err(MemoryError { requested: n, capacity: host.len() });
        }
        host[..n].copy_from_slice(&self.mem[..n]);
        queue.finish();
        Ok(())
    }

    /// Device-side view, for backend implementations only.
    pub fn as_slice(&self) -> &[T] {
        &self.mem
    }

    /// Mutable device-side view, for backend implementations only.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.mem
    }
}

/// One buffer per logical role of an argument set. Owned by the
/// harness; descriptors borrow it for the duration of a single call.
#[derive(Debug, Clone)]
pub struct Buffers<T: Scalar> {
    pub x_vec: Buffer<T>,
    pub y_vec: Buffer<T>,
    pub a_mat: Buffer<T>,
    pub b_mat: Buffer<T>,
    pub c_mat: Buffer<T>,
}

impl<T: Scalar> Buffers<T> {
    /// Allocates every buffer to exactly the size recorded in `args`.
    /// `set_sizes` must have run first; the harness never computes a
    /// buffer size on its own.
    pub fn allocate<U: Scalar>(queue: &Queue, args: &Arguments<U>) -> Self {
        Buffers {
            x_vec: Buffer::alloc(queue, args.x_size),
            y_vec: Buffer::alloc(queue, args.y_size),
            a_mat: Buffer::alloc(queue, args.a_size),
            b_mat: Buffer::alloc(queue, args.b_size),
            c_mat: Buffer::alloc(queue, args.c_size),
        }
    }

    pub fn get(&self, kind: BufferKind) -> &Buffer<T> {
        match kind {
            BufferKind::VecX => &self.x_vec,
            BufferKind::VecY => &self.y_vec,
            BufferKind::MatA => &self.a_mat,
            BufferKind::MatB => &self.b_mat,
            BufferKind::MatC => &self.c_mat,
        }
    }

    pub fn get_mut(&mut self, kind: BufferKind) -> &mut Buffer<T> {
        match kind {
            BufferKind::VecX => &mut self.x_vec,
            BufferKind::VecY => &mut self.y_vec,
            BufferKind::MatA => &mut self.a_mat,
            BufferKind::MatB => &mut self.b_mat,
            BufferKind::MatC => &mut self.c_mat,
        }
    }
}
