//! Frame-to-feature-vector encoding
//!
//! A feature vector is the frame flattened row-major, channel-minor, either
//! at full resolution (`pool_size == 1`) or after non-overlapping block-mean
//! pooling per channel. Means are accumulated exactly and truncated (not
//! rounded) back to u8; remainder rows/columns that do not fill a whole
//! block are discarded.

use tracing::debug;

use crate::error::{Error, Result};
use crate::frame::Frame;

/// Pooled output dimensions for a `width x height` frame: (width, height).
///
/// A zero pool size has no valid grid; it yields (0, 0) here and is rejected
/// outright by [`encode`] and by config validation.
pub fn pooled_dims(width: u32, height: u32, pool_size: u32) -> (u32, u32) {
    if pool_size == 0 {
        return (0, 0);
    }
    (width / pool_size, height / pool_size)
}

/// Feature vector length for a `width x height` RGB frame at `pool_size`
pub fn feature_len(width: u32, height: u32, pool_size: u32) -> usize {
    let (pw, ph) = pooled_dims(width, height, pool_size);
    pw as usize * ph as usize * Frame::CHANNELS
}

/// Encode a frame into a fixed-length feature vector.
///
/// Deterministic: the same frame and `pool_size` always produce the same
/// vector. `pool_size == 0` is rejected; a pool larger than the frame yields
/// an empty vector (every block is a remainder).
pub fn encode(frame: &Frame, pool_size: u32) -> Result<Vec<u8>> {
    if pool_size == 0 {
        return Err(Error::Config("pool size must be at least 1".to_string()));
    }
    if pool_size == 1 {
        return Ok(frame.data().to_vec());
    }

    let (out_w, out_h) = pooled_dims(frame.width(), frame.height(), pool_size);
    debug!(out_w, out_h, pool_size, "block-mean pooling frame");

    let src = frame.data();
    let row_stride = frame.width() as usize * Frame::CHANNELS;
    let block_area = (pool_size * pool_size) as u64;

    let mut out = Vec::with_capacity(out_w as usize * out_h as usize * Frame::CHANNELS);
    for by in 0..out_h as usize {
        for bx in 0..out_w as usize {
            for channel in 0..Frame::CHANNELS {
                let mut sum: u64 = 0;
                for dy in 0..pool_size as usize {
                    let y = by * pool_size as usize + dy;
                    let row = &src[y * row_stride..(y + 1) * row_stride];
                    for dx in 0..pool_size as usize {
                        let x = bx * pool_size as usize + dx;
                        sum += row[x * Frame::CHANNELS + channel] as u64;
                    }
                }
                // Integer division of a non-negative sum truncates the mean
                out.push((sum / block_area) as u8);
            }
        }
    }

    Ok(out)
}
