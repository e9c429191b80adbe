//! One channel's processing path.

use alloc::boxed::Box;

use crate::effect::Effect;

/// Runs a single effect instance over planar blocks of one channel.
///
/// The processor owns its effect exclusively; effect state therefore only
/// ever sees this channel's samples, in frame order.
pub struct ChannelProcessor {
    effect: Box<dyn Effect + Send>,
}

impl ChannelProcessor {
    /// Wraps an effect for exclusive use by one channel.
    pub fn new(effect: Box<dyn Effect + Send>) -> Self {
        Self { effect }
    }

    /// Processes `input` into `output`, one sample per frame, in order.
    ///
    /// Both slices must have the same length.
    #[inline]
    pub fn process(&mut self, input: &[f32], output: &mut [f32]) {
        self.effect.process_block(input, output);
    }

    /// Clears the effect's internal state.
    pub fn reset(&mut self) {
        self.effect.reset();
    }

    /// Latency reported by the effect.
    pub fn latency_samples(&self) -> usize {
        self.effect.latency_samples()
    }
}

impl core::fmt::Debug for ChannelProcessor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChannelProcessor").finish_non_exhaustive()
    }
}
