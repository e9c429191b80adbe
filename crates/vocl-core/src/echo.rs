//! Echo: a single delay line with feedback.
//!
//! Per sample:
//!
//! ```text
//! delayed = line[pos]
//! output  = input + delayed * mix
//! line[pos] = input + delayed * feedback
//! pos = (pos + 1) % len
//! ```
//!
//! The feedback path stores the dry input plus the scaled echo, not the
//! mixed output. `mix` only affects what is heard; `feedback` only affects
//! what is re-injected. The two are independent.

use crate::delay::DelayLine;
use crate::effect::Effect;
use crate::error::ConfigError;

/// Echo parameters, fixed for the lifetime of an [`EchoEffect`].
///
/// | Field | Unit | Recommended | Default |
/// |-------|------|-------------|---------|
/// | `delay_ms` | milliseconds | > 0 | 100.0 |
/// | `feedback` | linear gain | 0.0–1.0 | 0.2 |
/// | `mix` | linear gain | 0.0–1.0 | 0.6 |
///
/// `feedback` and `mix` are not clamped. A feedback of 1.0 or more makes
/// the echo train grow instead of decay; that is the caller's choice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EchoParams {
    /// Delay time in milliseconds.
    pub delay_ms: f32,
    /// Fraction of the delayed signal re-injected into the line.
    pub feedback: f32,
    /// Fraction of the delayed signal added to the output.
    pub mix: f32,
}

impl Default for EchoParams {
    fn default() -> Self {
        Self {
            delay_ms: 100.0,
            feedback: 0.2,
            mix: 0.6,
        }
    }
}

/// Longest delay line an [`EchoEffect`] will allocate: 2^27 samples
/// (512 MiB), a little under 47 minutes at 48 kHz.
pub const MAX_DELAY_SAMPLES: usize = 1 << 27;

/// Converts a delay time to a whole number of samples.
///
/// Rounds half away from zero. Returns 0 when the delay is shorter than half
/// a sample and saturates at `usize::MAX` when the product overflows.
pub fn delay_samples(sample_rate: f32, delay_ms: f32) -> usize {
    libm::roundf(sample_rate * delay_ms / 1000.0) as usize
}

/// Delay-line echo with feedback.
///
/// # Example
///
/// ```rust
/// use vocl_core::{EchoEffect, EchoParams, Effect};
///
/// let params = EchoParams { delay_ms: 100.0, feedback: 0.0, mix: 1.0 };
/// let mut echo = EchoEffect::new(44100.0, params).unwrap();
/// assert_eq!(echo.delay_samples(), 4410);
///
/// assert_eq!(echo.process(1.0), 1.0);
/// for _ in 1..4410 {
///     assert_eq!(echo.process(0.0), 0.0);
/// }
/// assert_eq!(echo.process(0.0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct EchoEffect {
    line: DelayLine,
    params: EchoParams,
    sample_rate: f32,
}

impl EchoEffect {
    /// Creates an echo with a silent delay line.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidDelayTime`] if `sample_rate` or `delay_ms` is
    ///   not positive and finite, or the delay exceeds [`MAX_DELAY_SAMPLES`].
    /// - [`ConfigError::EmptyDelayLine`] if the delay rounds to zero samples.
    /// - [`ConfigError::InvalidParameter`] if `feedback` or `mix` is NaN or
    ///   infinite.
    pub fn new(sample_rate: f32, params: EchoParams) -> Result<Self, ConfigError> {
        let EchoParams {
            delay_ms,
            feedback,
            mix,
        } = params;

        if !(sample_rate.is_finite() && sample_rate > 0.0 && delay_ms.is_finite() && delay_ms > 0.0)
        {
            return Err(ConfigError::InvalidDelayTime {
                delay_ms,
                sample_rate,
            });
        }
        if !feedback.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "feedback",
                value: feedback,
            });
        }
        if !mix.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "mix",
                value: mix,
            });
        }

        let len = delay_samples(sample_rate, delay_ms);
        if len > MAX_DELAY_SAMPLES {
            return Err(ConfigError::InvalidDelayTime {
                delay_ms,
                sample_rate,
            });
        }
        let line = DelayLine::new(len).ok_or(
            ConfigError::EmptyDelayLine {
                delay_ms,
                sample_rate,
            },
        )?;

        Ok(Self {
            line,
            params,
            sample_rate,
        })
    }

    /// Length of the delay line in samples.
    pub fn delay_samples(&self) -> usize {
        self.line.len()
    }

    /// Parameters this echo was built with.
    pub fn params(&self) -> EchoParams {
        self.params
    }

    /// Sample rate the delay length was computed for.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Current cursor into the delay line.
    pub fn position(&self) -> usize {
        self.line.position()
    }
}

impl Effect for EchoEffect {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let delayed = self.line.current();
        let output = input + delayed * self.params.mix;
        self.line.push(input + delayed * self.params.feedback);
        output
    }

    fn reset(&mut self) {
        self.line.clear();
    }
}
