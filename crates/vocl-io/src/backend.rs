//! Pluggable audio transport abstraction.
//!
//! [`AudioBackend`] decouples the stream lifecycle from any specific platform
//! audio API. The default implementation wraps
//! [cpal](https://crates.io/crates/cpal) (feature `"cpal-backend"`); the
//! [`MockBackend`](crate::MockBackend) drives the same interface
//! deterministically for tests.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │     AudioStream (lifecycle)      │
//! └──────────────┬───────────────────┘
//!                │ open_duplex(params, callback)
//!                ▼
//! ┌──────────────────────────────────┐
//! │        AudioBackend trait        │
//! └──────────────┬───────────────────┘
//!        ┌───────┴────────┐
//!        ▼                ▼
//! ┌─────────────┐  ┌─────────────┐
//! │ CpalBackend │  │ MockBackend │
//! └─────────────┘  └─────────────┘
//! ```
//!
//! Callbacks are boxed closures so the trait stays object-safe and backends
//! can be picked at runtime. The opened stream comes back as a
//! `Box<dyn TransportStream>`; dropping it releases the transport.

use crate::{AudioDevice, Result};
use std::time::Duration;

/// Everything a transport needs to open one duplex stream.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplexParams {
    /// Capture device.
    pub input_device: AudioDevice,
    /// Channels captured from the input device.
    pub input_channels: u16,
    /// Suggested input latency.
    pub input_latency: Duration,
    /// Playback device.
    pub output_device: AudioDevice,
    /// Channels played on the output device.
    pub output_channels: u16,
    /// Suggested output latency.
    pub output_latency: Duration,
    /// Sample rate in Hz, shared by both sides.
    pub sample_rate: u32,
    /// Frames delivered per callback invocation.
    pub frames_per_buffer: u32,
}

/// Duplex callback signature.
///
/// Called once per buffer period on the transport's real-time thread with an
/// interleaved input block and an output block of the same length to fill.
///
/// ## Real-Time Safety
///
/// Implementations must not allocate, lock mutexes, or perform I/O.
pub type DuplexCallback = Box<dyn FnMut(&[f32], &mut [f32]) + Send>;

/// Error callback signature.
///
/// Called when the transport reports an error while streaming. Receives a
/// human-readable message.
pub type ErrorCallback = Box<dyn FnMut(&str) + Send>;

/// An opened duplex stream.
///
/// Starting begins periodic callback invocation; stopping halts it without
/// releasing the device. Dropping the value closes the stream.
pub trait TransportStream: Send {
    /// Begin invoking the duplex callback.
    fn start(&mut self) -> Result<()>;

    /// Halt callback invocation. An in-flight invocation completes normally.
    fn stop(&mut self) -> Result<()>;

    /// Buffer periods in which input was not available in time.
    fn underruns(&self) -> u64 {
        0
    }
}

/// Pluggable audio backend trait.
///
/// Abstracts device enumeration and duplex stream construction over platform
/// audio APIs.
pub trait AudioBackend: Send {
    /// Human-readable name of this backend (e.g. "cpal", "mock").
    fn name(&self) -> &str;

    /// List all available audio devices.
    fn list_devices(&self) -> Result<Vec<AudioDevice>>;

    /// Get the default input device, if any.
    fn default_input_device(&self) -> Result<Option<AudioDevice>>;

    /// Get the default output device, if any.
    fn default_output_device(&self) -> Result<Option<AudioDevice>>;

    /// Open a duplex stream.
    ///
    /// The stream is returned stopped. `callback` is moved into the transport
    /// and runs on its audio thread once started; `error_callback` receives
    /// asynchronous transport errors.
    ///
    /// Rejections (unsupported rate or channel combination, device busy)
    /// are returned as [`Error::Transport`](crate::Error::Transport).
    fn open_duplex(
        &self,
        params: &DuplexParams,
        callback: DuplexCallback,
        error_callback: ErrorCallback,
    ) -> Result<Box<dyn TransportStream>>;
}

/// The platform backend.
#[cfg(feature = "cpal-backend")]
pub fn default_backend() -> Box<dyn AudioBackend> {
    Box::new(crate::CpalBackend::new())
}

/// Without a platform backend, fall back to an empty mock.
#[cfg(not(feature = "cpal-backend"))]
pub fn default_backend() -> Box<dyn AudioBackend> {
    Box::new(crate::MockBackend::new(Vec::new()))
}
