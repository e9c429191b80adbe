//! Conversion between interleaved and planar sample blocks.
//!
//! An interleaved block of `frames * channels` samples stores frame `i`,
//! channel `c` at index `i * channels + c`. A planar block holds one
//! channel's samples in frame order.
//!
//! ```text
//! interleaved: [L0 R0 L1 R1 L2 R2]
//! planar:      [L0 L1 L2] [R0 R1 R2]
//! ```
//!
//! The `*_channel` functions move one channel at a time into caller-owned
//! storage and never allocate, so the stream engine can use them inside the
//! audio callback. [`deinterleave`] and [`interleave`] are the allocating
//! whole-block forms for offline use.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::ConfigError;

/// Number of whole frames in an interleaved block.
///
/// # Errors
///
/// [`ConfigError::ZeroChannels`] for `channels == 0`,
/// [`ConfigError::BlockMismatch`] when `len` is not a multiple of `channels`.
pub fn frame_count(len: usize, channels: usize) -> Result<usize, ConfigError> {
    if channels == 0 {
        return Err(ConfigError::ZeroChannels);
    }
    if len % channels != 0 {
        return Err(ConfigError::BlockMismatch { len, channels });
    }
    Ok(len / channels)
}

/// Splits an interleaved block into one planar block per channel.
///
/// # Example
///
/// ```rust
/// use vocl_core::deinterleave;
///
/// let planar = deinterleave(&[1.0, 10.0, 2.0, 20.0, 3.0, 30.0], 2).unwrap();
/// assert_eq!(planar, vec![vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 30.0]]);
/// ```
pub fn deinterleave(block: &[f32], channels: usize) -> Result<Vec<Vec<f32>>, ConfigError> {
    let frames = frame_count(block.len(), channels)?;
    let mut planar = vec![vec![0.0; frames]; channels];
    for (channel, out) in planar.iter_mut().enumerate() {
        deinterleave_channel(block, channels, channel, out);
    }
    Ok(planar)
}

/// Merges planar blocks back into one interleaved block.
///
/// # Errors
///
/// [`ConfigError::PlanarMismatch`] if the number of planar blocks differs
/// from `channels` or their lengths differ.
pub fn interleave<P: AsRef<[f32]>>(planar: &[P], channels: usize) -> Result<Vec<f32>, ConfigError> {
    if channels == 0 {
        return Err(ConfigError::ZeroChannels);
    }
    if planar.len() != channels {
        return Err(ConfigError::PlanarMismatch("block count differs from channel count"));
    }
    let frames = planar[0].as_ref().len();
    if planar.iter().any(|p| p.as_ref().len() != frames) {
        return Err(ConfigError::PlanarMismatch("blocks have unequal lengths"));
    }

    let mut block = vec![0.0; frames * channels];
    for (channel, samples) in planar.iter().enumerate() {
        interleave_channel(samples.as_ref(), channels, channel, &mut block);
    }
    Ok(block)
}

/// Copies channel `channel` of an interleaved block into `out`.
///
/// Copies `min(out.len(), block.len() / channels)` frames. Never allocates.
#[inline]
pub fn deinterleave_channel(block: &[f32], channels: usize, channel: usize, out: &mut [f32]) {
    debug_assert!(channel < channels);
    for (dst, frame) in out.iter_mut().zip(block.chunks_exact(channels)) {
        *dst = frame[channel];
    }
}

/// Writes a planar block into channel `channel` of an interleaved block.
///
/// Writes `min(planar.len(), block.len() / channels)` frames and leaves the
/// other channels untouched. Never allocates.
#[inline]
pub fn interleave_channel(planar: &[f32], channels: usize, channel: usize, block: &mut [f32]) {
    debug_assert!(channel < channels);
    for (frame, &src) in block.chunks_exact_mut(channels).zip(planar.iter()) {
        frame[channel] = src;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count() {
        assert_eq!(frame_count(12, 3), Ok(4));
        assert_eq!(frame_count(0, 2), Ok(0));
        assert_eq!(frame_count(4, 0), Err(ConfigError::ZeroChannels));
        assert_eq!(
            frame_count(7, 2),
            Err(ConfigError::BlockMismatch {
                len: 7,
                channels: 2
            })
        );
    }

    #[test]
    fn test_deinterleave_three_channels() {
        let block = [0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
        let planar = deinterleave(&block, 3).unwrap();
        assert_eq!(planar, vec![vec![0.0, 10.0], vec![1.0, 11.0], vec![2.0, 12.0]]);
    }

    #[test]
    fn test_deinterleave_mono_is_identity() {
        let block = [0.5, -0.5, 0.25];
        assert_eq!(deinterleave(&block, 1).unwrap(), vec![block.to_vec()]);
    }

    #[test]
    fn test_deinterleave_rejects_partial_frame() {
        let err = deinterleave(&[1.0, 2.0, 3.0], 2).unwrap_err();
        assert_eq!(
            err,
            ConfigError::BlockMismatch {
                len: 3,
                channels: 2
            }
        );
    }

    #[test]
    fn test_interleave_two_channels() {
        let left = [1.0, 2.0];
        let right = [-1.0, -2.0];
        let block = interleave(&[&left[..], &right[..]], 2).unwrap();
        assert_eq!(block, vec![1.0, -1.0, 2.0, -2.0]);
    }

    #[test]
    fn test_interleave_rejects_unequal_lengths() {
        let planar = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            interleave(&planar, 2),
            Err(ConfigError::PlanarMismatch(_))
        ));
    }

    #[test]
    fn test_interleave_rejects_wrong_block_count() {
        let planar = vec![vec![1.0, 2.0]];
        assert!(matches!(
            interleave(&planar, 2),
            Err(ConfigError::PlanarMismatch(_))
        ));
        assert_eq!(interleave(&planar, 0), Err(ConfigError::ZeroChannels));
    }

    #[test]
    fn test_channel_functions_touch_only_their_channel() {
        let mut block = [9.0; 6];
        interleave_channel(&[1.0, 2.0, 3.0], 2, 1, &mut block);
        assert_eq!(block, [9.0, 1.0, 9.0, 2.0, 9.0, 3.0]);

        let mut out = [0.0; 3];
        deinterleave_channel(&block, 2, 0, &mut out);
        assert_eq!(out, [9.0; 3]);
    }

    #[test]
    fn test_round_trip() {
        let block: Vec<f32> = (0..64).map(|i| i as f32 * 0.5).collect();
        for channels in [1, 2, 4, 8] {
            let planar = deinterleave(&block, channels).unwrap();
            assert_eq!(interleave(&planar, channels).unwrap(), block);
        }
    }
}
