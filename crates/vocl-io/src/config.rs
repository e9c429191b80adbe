//! Immutable stream configuration.

use crate::AudioDevice;
use std::time::Duration;
use vocl_core::ConfigError;

/// Devices and format of one duplex stream.
///
/// Built once on the control thread, validated by [`StreamConfig::validate`]
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
    /// Capture device.
    pub input_device: AudioDevice,
    /// Playback device.
    pub output_device: AudioDevice,
    /// Sample rate in Hz, shared by both devices.
    pub sample_rate: u32,
    /// Channels processed; the same count is captured and played.
    pub channels: u16,
    /// Frames per buffer period.
    pub buffer_frames: u32,
}

/// Largest channel count both devices can carry.
pub fn max_shared_channels(input: &AudioDevice, output: &AudioDevice) -> u16 {
    input.max_input_channels.min(output.max_output_channels)
}

impl StreamConfig {
    /// Configuration using every channel the two devices share, at the input
    /// device's default sample rate.
    pub fn for_devices(input: AudioDevice, output: AudioDevice, buffer_frames: u32) -> Self {
        let channels = max_shared_channels(&input, &output);
        let sample_rate = input.default_sample_rate;
        Self {
            input_device: input,
            output_device: output,
            sample_rate,
            channels,
            buffer_frames,
        }
    }

    /// Check channel bounds, sample rate and buffer size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channels == 0 {
            return Err(ConfigError::ZeroChannels);
        }
        if self.channels > max_shared_channels(&self.input_device, &self.output_device) {
            return Err(ConfigError::ChannelLimit {
                requested: usize::from(self.channels),
                input_max: usize::from(self.input_device.max_input_channels),
                output_max: usize::from(self.output_device.max_output_channels),
            });
        }
        if self.sample_rate == 0 {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        if self.buffer_frames == 0 {
            return Err(ConfigError::InvalidBufferSize(0));
        }
        Ok(())
    }

    /// Wall-clock duration of one buffer period, the real-time budget.
    pub fn buffer_period(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(f64::from(self.buffer_frames) / f64::from(self.sample_rate))
    }

    /// Samples in one interleaved buffer.
    pub fn block_len(&self) -> usize {
        self.buffer_frames as usize * usize::from(self.channels)
    }
}
