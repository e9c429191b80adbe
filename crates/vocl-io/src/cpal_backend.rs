//! cpal-based audio backend implementation.
//!
//! [`CpalBackend`] is the default [`AudioBackend`]. It supports ALSA (Linux),
//! CoreAudio (macOS), WASAPI (Windows) and the other hosts cpal wraps.
//!
//! ## Duplex bridge
//!
//! cpal has no native duplex stream, so one is assembled from an input and an
//! output stream:
//!
//! ```text
//! ┌──────────────┐  frames   ┌──────────────────┐  blocks  ┌──────────────────┐
//! │ input stream │──────────►│ rtrb ring buffer │─────────►│  output stream   │
//! └──────────────┘           │ (pre-allocated)  │          │ scratch→callback │
//!                            └──────────────────┘          └──────────────────┘
//! ```
//!
//! Neither side allocates or locks once the streams exist. Samples cross the
//! ring in whole frames, so channel order survives drops and underruns. If the
//! ring cannot supply a full block, that block's input is silence and an
//! underrun is counted.

use crate::backend::{AudioBackend, DuplexCallback, DuplexParams, ErrorCallback, TransportStream};
use crate::bridge::duplex_bridge;
use crate::{AudioDevice, Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Host, Stream, SupportedBufferSize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Buffer periods of input the ring can hold before the input side drops frames.
const RING_PERIODS: usize = 4;

/// Extract device name via `description()` (cpal 0.17+).
fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

fn transport(err: impl std::fmt::Display) -> Error {
    Error::Transport(err.to_string())
}

/// Smallest buffer the device supports, expressed as a latency.
fn low_latency(buffer_size: &SupportedBufferSize, sample_rate: u32) -> Duration {
    match buffer_size {
        SupportedBufferSize::Range { min, .. } if sample_rate > 0 => {
            Duration::from_secs_f64(f64::from(*min) / f64::from(sample_rate))
        }
        _ => Duration::ZERO,
    }
}

/// Describe one cpal device. Returns `None` for devices without a readable name.
fn describe(index: usize, device: &Device) -> Option<AudioDevice> {
    let name = device_name(device).ok()?;

    let max_input_channels = device
        .supported_input_configs()
        .map(|configs| configs.map(|c| c.channels()).max().unwrap_or(0))
        .unwrap_or(0);
    let max_output_channels = device
        .supported_output_configs()
        .map(|configs| configs.map(|c| c.channels()).max().unwrap_or(0))
        .unwrap_or(0);

    let input_default = device.default_input_config().ok();
    let output_default = device.default_output_config().ok();

    let default_sample_rate = input_default
        .as_ref()
        .or(output_default.as_ref())
        .map_or(48000, |c| c.sample_rate());

    Some(AudioDevice {
        index,
        name,
        max_input_channels,
        max_output_channels,
        default_sample_rate,
        default_low_input_latency: input_default
            .as_ref()
            .map_or(Duration::ZERO, |c| low_latency(c.buffer_size(), c.sample_rate())),
        default_low_output_latency: output_default
            .as_ref()
            .map_or(Duration::ZERO, |c| low_latency(c.buffer_size(), c.sample_rate())),
    })
}

/// cpal-based audio backend.
///
/// Holds a cpal [`Host`], the connection to the platform's audio system.
pub struct CpalBackend {
    host: Host,
}

impl CpalBackend {
    /// Create a new cpal backend using the platform's default audio host.
    pub fn new() -> Self {
        let host = cpal::default_host();
        tracing::info!(host = host.id().name(), "cpal backend initialized");
        Self { host }
    }

    /// Look up the cpal device behind an [`AudioDevice`] from [`list_devices`].
    ///
    /// [`list_devices`]: AudioBackend::list_devices
    fn resolve(&self, device: &AudioDevice) -> Result<Device> {
        let found = self
            .host
            .devices()
            .map_err(transport)?
            .nth(device.index)
            .filter(|d| device_name(d).is_ok_and(|n| n == device.name));

        match found {
            Some(d) => Ok(d),
            // Device list changed since enumeration; fall back to name lookup.
            None => self
                .host
                .devices()
                .map_err(transport)?
                .find(|d| device_name(d).is_ok_and(|n| n == device.name))
                .ok_or_else(|| Error::DeviceNotFound(device.name.clone())),
        }
    }

    fn default_device(&self, device: Option<Device>) -> Result<Option<AudioDevice>> {
        let Some(device) = device else {
            return Ok(None);
        };
        let Ok(name) = device_name(&device) else {
            return Ok(None);
        };
        let index = self
            .host
            .devices()
            .map_err(transport)?
            .position(|d| device_name(&d).is_ok_and(|n| n == name))
            .unwrap_or(0);
        Ok(describe(index, &device))
    }
}

impl Default for CpalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for CpalBackend {
    fn name(&self) -> &'static str {
        "cpal"
    }

    fn list_devices(&self) -> Result<Vec<AudioDevice>> {
        let devices = self.host.devices().map_err(transport)?;
        Ok(devices
            .enumerate()
            .filter_map(|(index, device)| describe(index, &device))
            .collect())
    }

    fn default_input_device(&self) -> Result<Option<AudioDevice>> {
        let device = self
            .default_device(self.host.default_input_device())?
            .filter(AudioDevice::is_input);
        Ok(device)
    }

    fn default_output_device(&self) -> Result<Option<AudioDevice>> {
        let device = self
            .default_device(self.host.default_output_device())?
            .filter(AudioDevice::is_output);
        Ok(device)
    }

    fn open_duplex(
        &self,
        params: &DuplexParams,
        mut callback: DuplexCallback,
        error_callback: ErrorCallback,
    ) -> Result<Box<dyn TransportStream>> {
        if params.input_channels != params.output_channels {
            return Err(Error::Transport(format!(
                "duplex needs matching channel counts, got {} in / {} out",
                params.input_channels, params.output_channels
            )));
        }

        let block_len = params.frames_per_buffer as usize * usize::from(params.output_channels);
        if block_len == 0 {
            return Err(Error::Transport(
                "duplex needs at least one channel and one frame per buffer".to_string(),
            ));
        }

        let input_device = self.resolve(&params.input_device)?;
        let output_device = self.resolve(&params.output_device)?;

        let input_config = cpal::StreamConfig {
            channels: params.input_channels,
            sample_rate: params.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(params.frames_per_buffer),
        };
        let output_config = cpal::StreamConfig {
            channels: params.output_channels,
            sample_rate: params.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(params.frames_per_buffer),
        };

        let running = Arc::new(AtomicBool::new(false));
        let underruns = Arc::new(AtomicU64::new(0));
        let error_callback = Arc::new(Mutex::new(error_callback));
        let (mut input_bridge, mut output_bridge) = duplex_bridge(
            usize::from(params.output_channels),
            params.frames_per_buffer as usize,
            RING_PERIODS,
            Arc::clone(&underruns),
        );

        let input_running = Arc::clone(&running);
        let input_errors = Arc::clone(&error_callback);
        let input_stream = input_device
            .build_input_stream(
                &input_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !input_running.load(Ordering::Acquire) {
                        return;
                    }
                    input_bridge.push(data);
                },
                move |err| {
                    if let Ok(mut cb) = input_errors.lock() {
                        cb(&err.to_string());
                    }
                },
                None,
            )
            .map_err(transport)?;

        let output_running = Arc::clone(&running);
        let output_errors = Arc::clone(&error_callback);
        let output_stream = output_device
            .build_output_stream(
                &output_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !output_running.load(Ordering::Acquire) {
                        data.fill(0.0);
                        return;
                    }
                    output_bridge.pull(data, &mut callback);
                },
                move |err| {
                    if let Ok(mut cb) = output_errors.lock() {
                        cb(&err.to_string());
                    }
                },
                None,
            )
            .map_err(transport)?;

        tracing::info!(
            input = params.input_device.name.as_str(),
            output = params.output_device.name.as_str(),
            channels = params.output_channels,
            sample_rate = params.sample_rate,
            frames_per_buffer = params.frames_per_buffer,
            "cpal duplex stream opened"
        );

        Ok(Box::new(CpalDuplex {
            input: input_stream,
            output: output_stream,
            running,
            underruns,
        }))
    }
}

/// Input and output cpal streams driven as one duplex stream.
struct CpalDuplex {
    input: Stream,
    output: Stream,
    running: Arc<AtomicBool>,
    underruns: Arc<AtomicU64>,
}

impl TransportStream for CpalDuplex {
    fn start(&mut self) -> Result<()> {
        self.input.play().map_err(transport)?;
        self.output.play().map_err(transport)?;
        self.running.store(true, Ordering::Release);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.input.pause().map_err(transport)?;
        self.output.pause().map_err(transport)?;
        self.running.store(false, Ordering::Release);
        Ok(())
    }

    fn underruns(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }
}
