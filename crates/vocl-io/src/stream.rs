//! Duplex stream lifecycle.
//!
//! ```text
//! Configured ──open──► Open ──start──► Started ◄──start── Stopped
//!      │                │                 │                  ▲
//!      │ transport      │                 └──────stop────────┘
//!      │ rejects        │
//!      ▼                ▼
//!    Failed          (any) ──close──► Closed
//! ```
//!
//! [`AudioStream`] runs on the control thread. Once opened, the
//! [`StreamEngine`] and its effects belong to the transport callback; the
//! control side only holds the transport handle and talks to the audio
//! thread through the transport's own start and stop primitives.

use crate::backend::{AudioBackend, DuplexParams, TransportStream};
use crate::{Error, Result, StreamConfig};
use std::fmt;
use vocl_core::{Effect, StreamEngine};

/// Lifecycle state of an [`AudioStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Validated, no transport resources held.
    Configured,
    /// Transport opened, callback not yet running.
    Open,
    /// Callback invoked once per buffer period.
    Started,
    /// Callback halted, transport still held.
    Stopped,
    /// Transport released. Terminal.
    Closed,
    /// The transport rejected the stream. Only `close` is accepted.
    Failed,
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Configured => "Configured",
            Self::Open => "Open",
            Self::Started => "Started",
            Self::Stopped => "Stopped",
            Self::Closed => "Closed",
            Self::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// A duplex audio stream that runs one effect per channel.
pub struct AudioStream {
    config: StreamConfig,
    state: StreamState,
    engine: Option<StreamEngine>,
    transport: Option<Box<dyn TransportStream>>,
    underruns: u64,
}

impl AudioStream {
    /// Validate `config` and bind `effects` to channels in order.
    ///
    /// Fails with [`Error::Config`] when the channel count is out of the
    /// devices' range, the effect count differs from the channel count, or the
    /// rate or buffer size is zero. No transport resources are touched.
    pub fn new(config: StreamConfig, effects: Vec<Box<dyn Effect + Send>>) -> Result<Self> {
        config.validate()?;
        let engine = StreamEngine::new(
            usize::from(config.channels),
            config.buffer_frames as usize,
            effects,
        )?;

        tracing::debug!(
            channels = config.channels,
            sample_rate = config.sample_rate,
            buffer_frames = config.buffer_frames,
            "stream configured"
        );

        Ok(Self {
            config,
            state: StreamState::Configured,
            engine: Some(engine),
            transport: None,
            underruns: 0,
        })
    }

    /// [`new`](Self::new) followed by [`open`](Self::open).
    pub fn open_with(
        backend: &dyn AudioBackend,
        config: StreamConfig,
        effects: Vec<Box<dyn Effect + Send>>,
    ) -> Result<Self> {
        let mut stream = Self::new(config, effects)?;
        stream.open(backend)?;
        Ok(stream)
    }

    /// Open the duplex transport and hand it the engine.
    ///
    /// On a transport rejection the stream moves to [`StreamState::Failed`].
    pub fn open(&mut self, backend: &dyn AudioBackend) -> Result<()> {
        if self.state != StreamState::Configured {
            return Err(self.invalid("open"));
        }
        let Some(mut engine) = self.engine.take() else {
            return Err(self.invalid("open"));
        };

        let params = DuplexParams {
            input_device: self.config.input_device.clone(),
            input_channels: self.config.channels,
            input_latency: self.config.input_device.default_low_input_latency,
            output_device: self.config.output_device.clone(),
            output_channels: self.config.channels,
            output_latency: self.config.output_device.default_low_output_latency,
            sample_rate: self.config.sample_rate,
            frames_per_buffer: self.config.buffer_frames,
        };

        let result = backend.open_duplex(
            &params,
            Box::new(move |input: &[f32], output: &mut [f32]| {
                engine.process(input, output);
            }),
            Box::new(|message: &str| tracing::error!(error = message, "audio transport error")),
        );

        match result {
            Ok(transport) => {
                self.transport = Some(transport);
                self.state = StreamState::Open;
                tracing::info!(
                    backend = backend.name(),
                    input = self.config.input_device.name.as_str(),
                    output = self.config.output_device.name.as_str(),
                    "stream opened"
                );
                Ok(())
            }
            Err(err) => {
                self.state = StreamState::Failed;
                tracing::warn!(error = %err, "transport rejected stream");
                Err(err)
            }
        }
    }

    /// Begin processing. Accepted from `Open` and `Stopped`; a no-op when
    /// already started.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            StreamState::Started => Ok(()),
            StreamState::Open | StreamState::Stopped => {
                let Some(transport) = self.transport.as_mut() else {
                    return Err(self.invalid("start"));
                };
                if let Err(err) = transport.start() {
                    self.state = StreamState::Failed;
                    tracing::warn!(error = %err, "transport failed to start");
                    return Err(err);
                }
                self.state = StreamState::Started;
                tracing::info!(
                    buffer_period_ms = self.config.buffer_period().as_secs_f64() * 1000.0,
                    "stream started"
                );
                Ok(())
            }
            _ => Err(self.invalid("start")),
        }
    }

    /// Halt processing without releasing the transport.
    ///
    /// A no-op on streams that are open but not running. A transport that
    /// refuses to stop leaves the stream [`StreamState::Failed`].
    pub fn stop(&mut self) -> Result<()> {
        match self.state {
            StreamState::Open | StreamState::Stopped => Ok(()),
            StreamState::Started => {
                if let Some(transport) = self.transport.as_mut()
                    && let Err(err) = transport.stop()
                {
                    self.state = StreamState::Failed;
                    tracing::warn!(error = %err, "transport failed to stop");
                    return Err(err);
                }
                self.state = StreamState::Stopped;
                tracing::info!("stream stopped");
                Ok(())
            }
            _ => Err(self.invalid("stop")),
        }
    }

    /// Release the transport. Idempotent; always ends in [`StreamState::Closed`].
    pub fn close(&mut self) -> Result<()> {
        if self.state == StreamState::Closed {
            return Ok(());
        }
        if let Some(mut transport) = self.transport.take() {
            if self.state == StreamState::Started
                && let Err(err) = transport.stop()
            {
                tracing::warn!(error = %err, "transport failed to stop during close");
            }
            self.underruns = transport.underruns();
        }
        self.engine = None;
        self.state = StreamState::Closed;
        tracing::info!(underruns = self.underruns, "stream closed");
        Ok(())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// The validated configuration.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Underruns reported by the transport so far (final count once closed).
    pub fn underruns(&self) -> u64 {
        self.transport
            .as_ref()
            .map_or(self.underruns, |t| t.underruns())
    }

    fn invalid(&self, operation: &'static str) -> Error {
        Error::InvalidState {
            state: self.state,
            operation,
        }
    }
}

impl Drop for AudioStream {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl fmt::Debug for AudioStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioStream")
            .field("state", &self.state)
            .field("channels", &self.config.channels)
            .field("sample_rate", &self.config.sample_rate)
            .field("buffer_frames", &self.config.buffer_frames)
            .finish_non_exhaustive()
    }
}
