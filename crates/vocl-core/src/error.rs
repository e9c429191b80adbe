//! Configuration errors raised before any audio flows.
//!
//! Every check that can fail happens at construction time, on the control
//! thread. Once an engine exists, its per-buffer path is total and has no
//! error states of its own.

/// Errors detected while building effects, engines or streams.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Delay time or sample rate is not a positive, finite number, or the
    /// delay needs more than [`MAX_DELAY_SAMPLES`](crate::echo::MAX_DELAY_SAMPLES) samples.
    InvalidDelayTime {
        /// Requested delay in milliseconds.
        delay_ms: f32,
        /// Sample rate the delay was computed against.
        sample_rate: f32,
    },
    /// The delay time rounds to zero samples at this sample rate.
    EmptyDelayLine {
        /// Requested delay in milliseconds.
        delay_ms: f32,
        /// Sample rate the delay was computed against.
        sample_rate: f32,
    },
    /// An effect parameter is NaN or infinite.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f32,
    },
    /// A channel count of zero was supplied.
    ZeroChannels,
    /// Number of effects does not match the channel count.
    EffectCountMismatch {
        /// Effects supplied.
        effects: usize,
        /// Channels configured.
        channels: usize,
    },
    /// Requested channels exceed what one of the devices supports.
    ChannelLimit {
        /// Requested channel count.
        requested: usize,
        /// Maximum input channels of the input device.
        input_max: usize,
        /// Maximum output channels of the output device.
        output_max: usize,
    },
    /// Interleaved block length is not a multiple of the channel count.
    BlockMismatch {
        /// Block length in samples.
        len: usize,
        /// Channel count.
        channels: usize,
    },
    /// Planar blocks are missing or have unequal lengths.
    PlanarMismatch(&'static str),
    /// Input and output blocks differ in length.
    LengthMismatch {
        /// Input block length in samples.
        input: usize,
        /// Output block length in samples.
        output: usize,
    },
    /// Sample rate is zero.
    InvalidSampleRate(u32),
    /// Buffer size is zero.
    InvalidBufferSize(usize),
}

#[cfg(feature = "std")]
impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidDelayTime {
                delay_ms,
                sample_rate,
            } => write!(
                f,
                "delay time {delay_ms} ms at {sample_rate} Hz must be positive, finite and at most {} samples long",
                crate::echo::MAX_DELAY_SAMPLES
            ),
            Self::EmptyDelayLine {
                delay_ms,
                sample_rate,
            } => write!(
                f,
                "delay time {delay_ms} ms is shorter than one sample at {sample_rate} Hz"
            ),
            Self::InvalidParameter { name, value } => {
                write!(f, "parameter '{name}' must be finite, got {value}")
            }
            Self::ZeroChannels => write!(f, "channel count must be at least 1"),
            Self::EffectCountMismatch { effects, channels } => write!(
                f,
                "number of effects ({effects}) must match number of channels ({channels})"
            ),
            Self::ChannelLimit {
                requested,
                input_max,
                output_max,
            } => write!(
                f,
                "{requested} channels requested, devices support {input_max} in / {output_max} out"
            ),
            Self::BlockMismatch { len, channels } => write!(
                f,
                "block of {len} samples is not a multiple of {channels} channels"
            ),
            Self::PlanarMismatch(msg) => write!(f, "planar blocks mismatch: {msg}"),
            Self::LengthMismatch { input, output } => write!(
                f,
                "input block has {input} samples but output block has {output}"
            ),
            Self::InvalidSampleRate(rate) => write!(f, "invalid sample rate: {rate} Hz"),
            Self::InvalidBufferSize(frames) => write!(f, "invalid buffer size: {frames} frames"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn effect_count_mismatch_display() {
        let err = ConfigError::EffectCountMismatch {
            effects: 1,
            channels: 2,
        };
        assert_eq!(
            err.to_string(),
            "number of effects (1) must match number of channels (2)"
        );
    }

    #[test]
    fn empty_delay_line_display_mentions_rate() {
        let err = ConfigError::EmptyDelayLine {
            delay_ms: 0.001,
            sample_rate: 44100.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("44100"), "got: {msg}");
        assert!(msg.contains("shorter than one sample"), "got: {msg}");
    }

    #[test]
    fn block_mismatch_display() {
        let err = ConfigError::BlockMismatch {
            len: 7,
            channels: 2,
        };
        assert_eq!(
            err.to_string(),
            "block of 7 samples is not a multiple of 2 channels"
        );
    }
}
