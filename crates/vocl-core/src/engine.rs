//! Per-buffer stream engine.
//!
//! The engine is what the audio transport calls once per buffer period. It
//! owns one [`ChannelProcessor`] per channel and two planar scratch buffers,
//! all allocated in [`StreamEngine::new`]. [`StreamEngine::process`] then
//! runs entirely in that pre-allocated memory:
//!
//! ```text
//! interleaved in ──► deinterleave ch c ──► effect c ──► interleave ch c ──► interleaved out
//!                    (for c in 0..channels, reusing the same scratch pair)
//! ```
//!
//! Channels are independent. Each channel's effect sees only its own samples
//! in frame order, so the order in which channels are visited within one
//! call does not change any output.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use crate::channel::ChannelProcessor;
use crate::effect::Effect;
use crate::error::ConfigError;
use crate::interleave::{deinterleave_channel, frame_count, interleave_channel};

/// Multi-channel engine with one effect per channel.
///
/// Construction validates everything; processing is total and real-time safe
/// (no allocation, no locks, no I/O).
///
/// # Example
///
/// ```rust
/// use vocl_core::{EchoEffect, EchoParams, Effect, StreamEngine};
///
/// let params = EchoParams::default();
/// let effects: Vec<Box<dyn Effect + Send>> = vec![
///     Box::new(EchoEffect::new(48000.0, params).unwrap()),
///     Box::new(EchoEffect::new(48000.0, params).unwrap()),
/// ];
/// let mut engine = StreamEngine::new(2, 64, effects).unwrap();
///
/// let input = vec![0.0f32; 64 * 2];
/// let mut output = vec![0.0f32; 64 * 2];
/// engine.process(&input, &mut output);
/// ```
pub struct StreamEngine {
    channels: Vec<ChannelProcessor>,
    planar_in: Vec<f32>,
    planar_out: Vec<f32>,
    max_block_frames: usize,
}

impl StreamEngine {
    /// Binds `effects[c]` to channel `c` and pre-allocates scratch space for
    /// blocks of up to `max_block_frames` frames.
    ///
    /// Longer blocks are still accepted by [`process`](Self::process); they
    /// are handled in consecutive chunks.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ZeroChannels`] if `channels` is 0.
    /// - [`ConfigError::InvalidBufferSize`] if `max_block_frames` is 0.
    /// - [`ConfigError::EffectCountMismatch`] if `effects.len() != channels`.
    pub fn new(
        channels: usize,
        max_block_frames: usize,
        effects: Vec<Box<dyn Effect + Send>>,
    ) -> Result<Self, ConfigError> {
        if channels == 0 {
            return Err(ConfigError::ZeroChannels);
        }
        if max_block_frames == 0 {
            return Err(ConfigError::InvalidBufferSize(max_block_frames));
        }
        if effects.len() != channels {
            return Err(ConfigError::EffectCountMismatch {
                effects: effects.len(),
                channels,
            });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(channels, max_block_frames, "stream engine ready");

        Ok(Self {
            channels: effects.into_iter().map(ChannelProcessor::new).collect(),
            planar_in: vec![0.0; max_block_frames],
            planar_out: vec![0.0; max_block_frames],
            max_block_frames,
        })
    }

    /// Number of channels (and effect instances).
    pub fn channels(&self) -> usize {
        self.channels.len()
    }

    /// Largest block, in frames, processed in one pass.
    pub fn max_block_frames(&self) -> usize {
        self.max_block_frames
    }

    /// Worst-case latency across channels.
    pub fn latency_samples(&self) -> usize {
        self.channels
            .iter()
            .map(ChannelProcessor::latency_samples)
            .max()
            .unwrap_or(0)
    }

    /// Clears every channel's effect state.
    pub fn reset(&mut self) {
        for channel in &mut self.channels {
            channel.reset();
        }
    }

    /// Processes one interleaved buffer. Real-time entry point.
    ///
    /// Expects `input` and `output` of equal length, a multiple of
    /// [`channels`](Self::channels). This is never checked with a panic:
    /// the largest whole-frame prefix common to both buffers is processed
    /// and any remaining output samples are set to silence.
    pub fn process(&mut self, input: &[f32], output: &mut [f32]) {
        let channels = self.channels.len();
        let usable = (input.len().min(output.len()) / channels) * channels;
        let (head, tail) = output.split_at_mut(usable);
        tail.fill(0.0);
        self.process_frames(&input[..usable], head);
    }

    /// Checked variant of [`process`](Self::process) for offline callers.
    ///
    /// # Errors
    ///
    /// [`ConfigError::LengthMismatch`] if the buffers differ in length,
    /// [`ConfigError::BlockMismatch`] if they do not hold whole frames.
    pub fn try_process(&mut self, input: &[f32], output: &mut [f32]) -> Result<(), ConfigError> {
        if input.len() != output.len() {
            return Err(ConfigError::LengthMismatch {
                input: input.len(),
                output: output.len(),
            });
        }
        frame_count(input.len(), self.channels.len())?;
        self.process_frames(input, output);
        Ok(())
    }

    fn process_frames(&mut self, input: &[f32], output: &mut [f32]) {
        let Self {
            channels,
            planar_in,
            planar_out,
            max_block_frames,
        } = self;
        let width = channels.len();
        let chunk = *max_block_frames * width;

        for (in_block, out_block) in input.chunks(chunk).zip(output.chunks_mut(chunk)) {
            let frames = in_block.len() / width;
            let scratch_in = &mut planar_in[..frames];
            let scratch_out = &mut planar_out[..frames];

            for (index, channel) in channels.iter_mut().enumerate() {
                deinterleave_channel(in_block, width, index, scratch_in);
                channel.process(scratch_in, scratch_out);
                interleave_channel(scratch_out, width, index, out_block);
            }
        }
    }
}

impl core::fmt::Debug for StreamEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StreamEngine")
            .field("channels", &self.channels.len())
            .field("max_block_frames", &self.max_block_frames)
            .finish_non_exhaustive()
    }
}
