//! Allocate a pixel buffer, map it, and fill it with a test pattern.
//!
//! Shows the caller's side of the contract: the buffer is allocated here,
//! mapped with memmap2, and its descriptor would then be handed to a
//! compositor over the wire.

use std::os::fd::AsFd;

use anyhow::{Context, Result};
use shmbuf::ShmBuffer;

const WIDTH: u32 = 256;
const HEIGHT: u32 = 256;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let size = u64::from(WIDTH * HEIGHT * 4);
    let buffer = ShmBuffer::allocate(size).context("Failed to allocate shared buffer")?;
    log::info!("Allocated {} byte shared buffer", buffer.size());

    let mut map = unsafe { memmap2::MmapMut::map_mut(&buffer.as_fd()) }
        .context("Failed to map shared buffer")?;
    for (i, pixel) in map.chunks_exact_mut(4).enumerate() {
        let (x, y) = (i as u32 % WIDTH, i as u32 / WIDTH);
        pixel.copy_from_slice(&[(x ^ y) as u8, x as u8, y as u8, 0xff]);
    }
    log::info!(
        "Filled {}x{} XOR pattern; descriptor ready to hand off",
        WIDTH,
        HEIGHT
    );
    Ok(())
}
