//! Audio device and duplex stream layer for vocl.
//!
//! This crate provides:
//!
//! - **Device model**: [`AudioDevice`] plus [`select_device`] for resolving a
//!   user query (index, exact name or substring) against the device list
//! - **Transport abstraction**: the [`AudioBackend`] trait with a cpal
//!   implementation ([`CpalBackend`], feature `cpal-backend`) and a
//!   deterministic [`MockBackend`] for tests
//! - **Stream lifecycle**: [`AudioStream`], which validates a [`StreamConfig`],
//!   moves a [`vocl_core::StreamEngine`] into the transport callback and drives
//!   it through `Configured -> Open -> Started -> Stopped -> Closed`
//! - **Shutdown**: [`ShutdownSignal`] for blocking the control thread until
//!   the user asks to stop
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vocl_core::{EchoEffect, EchoParams, Effect};
//! use vocl_io::{AudioStream, ShutdownSignal, StreamConfig, default_backend};
//!
//! let backend = default_backend();
//! let input = backend.default_input_device()?.ok_or(vocl_io::Error::NoDevice)?;
//! let output = backend.default_output_device()?.ok_or(vocl_io::Error::NoDevice)?;
//! let config = StreamConfig::for_devices(input, output, 64);
//!
//! let effects: Vec<Box<dyn Effect + Send>> = (0..config.channels)
//!     .map(|_| Box::new(EchoEffect::new(config.sample_rate as f32, EchoParams::default())?) as _)
//!     .collect::<Result<_, _>>()?;
//!
//! let mut stream = AudioStream::open_with(backend.as_ref(), config, effects)?;
//! stream.start()?;
//! ShutdownSignal::new().wait();
//! stream.close()?;
//! ```

pub mod backend;
#[cfg_attr(not(feature = "cpal-backend"), allow(dead_code))]
mod bridge;
#[cfg(feature = "cpal-backend")]
pub mod cpal_backend;
mod config;
mod device;
pub mod mock;
mod shutdown;
mod stream;

pub use backend::{
    AudioBackend, DuplexCallback, DuplexParams, ErrorCallback, TransportStream, default_backend,
};
pub use config::{StreamConfig, max_shared_channels};
#[cfg(feature = "cpal-backend")]
pub use cpal_backend::CpalBackend;
pub use device::{AudioDevice, Direction, filter_devices, format_device, select_device};
pub use mock::MockBackend;
pub use shutdown::ShutdownSignal;
pub use stream::{AudioStream, StreamState};

use vocl_core::ConfigError;

/// Error types for device and stream operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration rejected before any transport resources were acquired.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The audio transport rejected an open, start or stop request.
    #[error("Audio transport error: {0}")]
    Transport(String),

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// A lifecycle operation was requested from a state that does not allow it.
    #[error("Cannot {operation} a stream in state {state}")]
    InvalidState {
        /// State the stream was in.
        state: StreamState,
        /// Operation that was refused.
        operation: &'static str,
    },
}

/// Convenience result type for device and stream operations.
pub type Result<T> = std::result::Result<T, Error>;
