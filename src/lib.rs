//! Anonymous shared memory buffers for Wayland clients
//!
//! A compositor and its client share pixel data through a file descriptor
//! that both sides map into their address spaces. This crate provides the
//! client's half of that arrangement: [`ShmBuffer::allocate`] creates an
//! anonymous, correctly-sized memory object and hands back an owned
//! descriptor ready to be mapped (e.g. with `memmap2`) or sent to the
//! compositor over the wire.
//!
//! Mapping and descriptor transfer are deliberately left to the caller.

mod buffer;

pub use buffer::{AllocateError, ShmBuffer};
