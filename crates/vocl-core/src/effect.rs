//! Core Effect trait.
//!
//! The [`Effect`] trait is the seam between the stream engine and any
//! concrete per-sample transform. The engine owns one boxed instance per
//! channel and never looks past this interface.
//!
//! ## Design Decisions
//!
//! - **Mono processing**: one `f32` in, one `f32` out. Multi-channel audio is
//!   handled by giving every channel its own instance.
//!
//! - **Object-safe**: the engine stores `Box<dyn Effect + Send>` so effect
//!   types can be chosen at runtime.
//!
//! - **No allocations**: all methods may be called from the audio callback.

/// A stateful per-sample audio transform.
///
/// Calls to [`process`](Effect::process) must arrive in strict temporal
/// order from a single execution context; the output of each call may depend
/// on every sample previously passed to the same instance.
///
/// # Example
///
/// ```rust
/// use vocl_core::Effect;
///
/// struct Gain(f32);
///
/// impl Effect for Gain {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.0
///     }
///
///     fn reset(&mut self) {}
/// }
///
/// let mut gain = Gain(0.5);
/// assert_eq!(gain.process(1.0), 0.5);
/// ```
pub trait Effect {
    /// Process a single sample and advance internal state by one step.
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples in order.
    ///
    /// Default implementation calls [`process`](Effect::process) for each
    /// sample. `input` and `output` must have the same length.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            input.len(),
            output.len(),
            "Input and output buffers must have same length"
        );
        for (inp, out) in input.iter().zip(output.iter_mut()) {
            *out = self.process(*inp);
        }
    }

    /// Process a block of samples in-place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Clear internal state (delay lines, history) without touching parameters.
    fn reset(&mut self);

    /// Processing latency in samples. Default is 0.
    fn latency_samples(&self) -> usize {
        0
    }
}

impl<E: Effect + ?Sized> Effect for alloc::boxed::Box<E> {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        (**self).process(input)
    }

    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        (**self).process_block(input, output);
    }

    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        (**self).process_block_inplace(buffer);
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn latency_samples(&self) -> usize {
        (**self).latency_samples()
    }
}
