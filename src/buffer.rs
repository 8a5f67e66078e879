//! Anonymous shared memory allocation
//!
//! Creates memfd-backed buffers sized to a caller's request. The descriptor
//! never appears in the filesystem namespace and carries close-on-exec, so
//! it cannot leak across an exec boundary.

use std::ffi::CStr;
use std::os::fd::{AsFd, BorrowedFd, OwnedFd};

use rustix::fs::{MemfdFlags, ftruncate, memfd_create};
use rustix::io::Errno;
use thiserror::Error;

/// Debug label for descriptors created by [`ShmBuffer::allocate`].
///
/// Visible in `/proc/self/fd`; not a filesystem path.
const DEFAULT_NAME: &CStr = c"shmbuf-surface";

/// Failure from [`ShmBuffer::allocate`].
#[derive(Debug, Error)]
pub enum AllocateError {
    /// The anonymous memory object could not be created at all.
    #[error("failed to create anonymous memory object: {0}")]
    CreationFailed(#[source] Errno),
    /// The object was created but could not be sized to the request. The
    /// descriptor is already closed when this is returned.
    #[error("failed to resize shared memory to {size} bytes: {errno}")]
    ResizeFailed {
        size: u64,
        #[source]
        errno: Errno,
    },
}

/// An anonymous, memory-mappable buffer of a fixed byte length.
///
/// Owns the underlying descriptor. Borrow it via [`AsFd`] to map it or pass
/// it to a compositor, or take ownership out with `OwnedFd::from`.
#[derive(Debug)]
pub struct ShmBuffer {
    fd: OwnedFd,
    size: u64,
}

impl ShmBuffer {
    /// Allocate an anonymous shared memory object of exactly `size` bytes.
    ///
    /// The object has no name in any filesystem and the descriptor is
    /// close-on-exec. Sizes beyond the platform's file-offset range are
    /// rejected by the kernel and surface as
    /// [`AllocateError::ResizeFailed`]; `size == 0` is platform-defined
    /// (a zero-length object on Linux).
    pub fn allocate(size: u64) -> Result<Self, AllocateError> {
        Self::allocate_named(DEFAULT_NAME, size)
    }

    /// Like [`allocate`](Self::allocate), with a caller-chosen debug label.
    pub fn allocate_named(name: &CStr, size: u64) -> Result<Self, AllocateError> {
        // TODO: BSD support using shm_open
        let fd = memfd_create(name, MemfdFlags::CLOEXEC).map_err(AllocateError::CreationFailed)?;
        // On the error branch `fd` drops here, closing the descriptor
        // before the failure is reported.
        retry_intr(|| ftruncate(&fd, size))
            .map_err(|errno| AllocateError::ResizeFailed { size, errno })?;
        Ok(Self { fd, size })
    }

    /// Byte length the buffer was created with.
    pub fn size(&self) -> u64 {
        self.size
    }
}

impl AsFd for ShmBuffer {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl From<ShmBuffer> for OwnedFd {
    fn from(buffer: ShmBuffer) -> OwnedFd {
        buffer.fd
    }
}

/// Run `op` until it returns anything other than `EINTR`.
///
/// `ftruncate` blocks and can be interrupted by an asynchronous signal
/// before completing; interruption is transient and the call must simply be
/// issued again. Every other outcome passes through untouched.
fn retry_intr<T>(mut op: impl FnMut() -> rustix::io::Result<T>) -> rustix::io::Result<T> {
    loop {
        match op() {
            Err(errno) if errno == Errno::INTR => continue,
            other => return other,
        }
    }
}
