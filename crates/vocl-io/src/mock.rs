//! Deterministic in-process transport.
//!
//! [`MockBackend`] implements [`AudioBackend`] without touching audio hardware.
//! The duplex callback it captures is driven by hand through
//! [`MockBackend::pump`], one buffer period per call, so stream behaviour can
//! be tested exactly and on machines with no sound card.
//!
//! ```rust
//! use vocl_io::{AudioBackend, MockBackend};
//!
//! let backend = MockBackend::with_default_devices();
//! assert_eq!(backend.name(), "mock");
//! assert_eq!(backend.list_devices().unwrap().len(), 3);
//! ```

use crate::backend::{AudioBackend, DuplexCallback, DuplexParams, ErrorCallback, TransportStream};
use crate::{AudioDevice, Error, Result};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Default)]
struct Shared {
    callback: Option<DuplexCallback>,
    error_callback: Option<ErrorCallback>,
    started: bool,
    opens: usize,
    fail_next_open: Option<String>,
    fail_next_start: Option<String>,
    fail_next_stop: Option<String>,
    last_params: Option<DuplexParams>,
    underruns: u64,
}

/// Test transport with a fixed device list.
#[derive(Clone)]
pub struct MockBackend {
    devices: Vec<AudioDevice>,
    default_input: Option<usize>,
    default_output: Option<usize>,
    shared: Arc<Mutex<Shared>>,
}

impl MockBackend {
    /// Backend exposing `devices`. The first input-capable and first
    /// output-capable devices are the defaults.
    pub fn new(devices: Vec<AudioDevice>) -> Self {
        let default_input = devices.iter().position(AudioDevice::is_input);
        let default_output = devices.iter().position(AudioDevice::is_output);
        Self {
            devices,
            default_input,
            default_output,
            shared: Arc::default(),
        }
    }

    /// Backend with a stereo microphone, a stereo speaker and a 4-in/4-out
    /// interface, all at 48 kHz.
    pub fn with_default_devices() -> Self {
        Self::new(vec![
            mock_device(0, "Mock Microphone", 2, 0),
            mock_device(1, "Mock Speakers", 0, 2),
            mock_device(2, "Mock Interface", 4, 4),
        ])
    }

    /// Override which devices are reported as defaults (positions in the list).
    #[must_use]
    pub fn with_defaults(mut self, input: Option<usize>, output: Option<usize>) -> Self {
        self.default_input = input;
        self.default_output = output;
        self
    }

    fn shared(&self) -> MutexGuard<'_, Shared> {
        // A panic inside a test callback poisons the lock; the state is still usable.
        self.shared
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Make the next `open_duplex` call fail with a transport error.
    pub fn fail_next_open(&self, reason: impl Into<String>) {
        self.shared().fail_next_open = Some(reason.into());
    }

    /// Make the next `start` on an open stream fail with a transport error.
    pub fn fail_next_start(&self, reason: impl Into<String>) {
        self.shared().fail_next_start = Some(reason.into());
    }

    /// Make the next `stop` on a started stream fail with a transport error.
    /// The stream keeps running.
    pub fn fail_next_stop(&self, reason: impl Into<String>) {
        self.shared().fail_next_stop = Some(reason.into());
    }

    /// Run one buffer period through the captured callback.
    ///
    /// Returns `None` when no stream is open or the stream is not started.
    pub fn pump(&self, input: &[f32]) -> Option<Vec<f32>> {
        let mut shared = self.shared();
        if !shared.started {
            return None;
        }
        let callback = shared.callback.as_mut()?;
        let mut output = vec![0.0; input.len()];
        callback(input, &mut output);
        Some(output)
    }

    /// Deliver an asynchronous transport error to the stream's error callback.
    pub fn report_error(&self, message: &str) {
        if let Some(cb) = self.shared().error_callback.as_mut() {
            cb(message);
        }
    }

    /// Set the underrun count reported by the open stream.
    pub fn set_underruns(&self, count: u64) {
        self.shared().underruns = count;
    }

    /// Number of successful `open_duplex` calls.
    pub fn open_count(&self) -> usize {
        self.shared().opens
    }

    /// Whether a stream is open and has not been dropped.
    pub fn is_stream_alive(&self) -> bool {
        self.shared().callback.is_some()
    }

    /// Whether the open stream is currently started.
    pub fn is_started(&self) -> bool {
        self.shared().started
    }

    /// Parameters of the most recent successful open.
    pub fn last_params(&self) -> Option<DuplexParams> {
        self.shared().last_params.clone()
    }
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBackend")
            .field("devices", &self.devices.len())
            .field("open_count", &self.open_count())
            .field("alive", &self.is_stream_alive())
            .finish()
    }
}

impl AudioBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn list_devices(&self) -> Result<Vec<AudioDevice>> {
        Ok(self.devices.clone())
    }

    fn default_input_device(&self) -> Result<Option<AudioDevice>> {
        Ok(self.default_input.and_then(|i| self.devices.get(i).cloned()))
    }

    fn default_output_device(&self) -> Result<Option<AudioDevice>> {
        Ok(self.default_output.and_then(|i| self.devices.get(i).cloned()))
    }

    fn open_duplex(
        &self,
        params: &DuplexParams,
        callback: DuplexCallback,
        error_callback: ErrorCallback,
    ) -> Result<Box<dyn TransportStream>> {
        let mut shared = self.shared();
        if let Some(reason) = shared.fail_next_open.take() {
            return Err(Error::Transport(reason));
        }
        if shared.callback.is_some() {
            return Err(Error::Transport("mock device busy".to_string()));
        }
        shared.callback = Some(callback);
        shared.error_callback = Some(error_callback);
        shared.started = false;
        shared.underruns = 0;
        shared.opens += 1;
        shared.last_params = Some(params.clone());
        drop(shared);

        Ok(Box::new(MockStream {
            shared: Arc::clone(&self.shared),
        }))
    }
}

struct MockStream {
    shared: Arc<Mutex<Shared>>,
}

impl MockStream {
    fn shared(&self) -> MutexGuard<'_, Shared> {
        self.shared
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl TransportStream for MockStream {
    fn start(&mut self) -> Result<()> {
        let mut shared = self.shared();
        if let Some(reason) = shared.fail_next_start.take() {
            return Err(Error::Transport(reason));
        }
        shared.started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let mut shared = self.shared();
        if let Some(reason) = shared.fail_next_stop.take() {
            return Err(Error::Transport(reason));
        }
        shared.started = false;
        Ok(())
    }

    fn underruns(&self) -> u64 {
        self.shared().underruns
    }
}

impl Drop for MockStream {
    fn drop(&mut self) {
        let mut shared = self.shared();
        shared.started = false;
        shared.callback = None;
        shared.error_callback = None;
    }
}

fn mock_device(index: usize, name: &str, inputs: u16, outputs: u16) -> AudioDevice {
    AudioDevice {
        index,
        name: name.to_string(),
        max_input_channels: inputs,
        max_output_channels: outputs,
        default_sample_rate: 48000,
        default_low_input_latency: Duration::from_micros(2_900),
        default_low_output_latency: Duration::from_micros(2_900),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent() -> DuplexCallback {
        Box::new(|_: &[f32], _: &mut [f32]| {})
    }

    fn ignore_errors() -> ErrorCallback {
        Box::new(|_: &str| {})
    }

    fn params(backend: &MockBackend) -> DuplexParams {
        let devices = backend.list_devices().unwrap();
        DuplexParams {
            input_device: devices[2].clone(),
            input_channels: 2,
            input_latency: Duration::ZERO,
            output_device: devices[2].clone(),
            output_channels: 2,
            output_latency: Duration::ZERO,
            sample_rate: 48000,
            frames_per_buffer: 4,
        }
    }

    #[test]
    fn test_defaults_are_first_capable_devices() {
        let backend = MockBackend::with_default_devices();
        let input = backend.default_input_device().unwrap().unwrap();
        let output = backend.default_output_device().unwrap().unwrap();
        assert_eq!(input.name, "Mock Microphone");
        assert_eq!(output.name, "Mock Speakers");
    }

    #[test]
    fn test_no_defaults() {
        let backend = MockBackend::with_default_devices().with_defaults(None, None);
        assert!(backend.default_input_device().unwrap().is_none());
        assert!(backend.default_output_device().unwrap().is_none());
    }

    #[test]
    fn test_pump_requires_started_stream() {
        let backend = MockBackend::with_default_devices();
        assert!(backend.pump(&[1.0, 2.0]).is_none());

        let mut stream = backend
            .open_duplex(
                &params(&backend),
                Box::new(|input: &[f32], output: &mut [f32]| {
                    for (o, i) in output.iter_mut().zip(input) {
                        *o = i * 2.0;
                    }
                }),
                ignore_errors(),
            )
            .unwrap();
        assert!(backend.pump(&[1.0, 2.0]).is_none());

        stream.start().unwrap();
        assert_eq!(backend.pump(&[1.0, 2.0]), Some(vec![2.0, 4.0]));

        stream.stop().unwrap();
        assert!(backend.pump(&[1.0, 2.0]).is_none());
    }

    #[test]
    fn test_drop_releases_stream() {
        let backend = MockBackend::with_default_devices();
        let stream = backend
            .open_duplex(&params(&backend), silent(), ignore_errors())
            .unwrap();
        assert!(backend.is_stream_alive());
        assert_eq!(backend.open_count(), 1);

        drop(stream);
        assert!(!backend.is_stream_alive());
    }

    #[test]
    fn test_busy_while_open() {
        let backend = MockBackend::with_default_devices();
        let _stream = backend
            .open_duplex(&params(&backend), silent(), ignore_errors())
            .unwrap();
        let second = backend.open_duplex(&params(&backend), silent(), ignore_errors());
        assert!(matches!(second, Err(Error::Transport(_))));
    }

    #[test]
    fn test_fail_next_open_is_one_shot() {
        let backend = MockBackend::with_default_devices();
        backend.fail_next_open("device busy");

        let first = backend.open_duplex(&params(&backend), silent(), ignore_errors());
        match first {
            Err(Error::Transport(msg)) => assert_eq!(msg, "device busy"),
            _ => panic!("expected transport error"),
        }
        assert_eq!(backend.open_count(), 0);

        let second = backend.open_duplex(&params(&backend), silent(), ignore_errors());
        assert!(second.is_ok());
    }

    #[test]
    fn test_fail_next_stop_keeps_stream_running() {
        let backend = MockBackend::with_default_devices();
        let mut stream = backend
            .open_duplex(&params(&backend), silent(), ignore_errors())
            .unwrap();
        stream.start().unwrap();
        backend.fail_next_stop("pause rejected");

        assert!(matches!(stream.stop(), Err(Error::Transport(_))));
        assert!(backend.is_started());

        stream.stop().unwrap();
        assert!(!backend.is_started());
    }

    #[test]
    fn test_report_error_reaches_callback() {
        let backend = MockBackend::with_default_devices();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _stream = backend
            .open_duplex(
                &params(&backend),
                silent(),
                Box::new(move |msg: &str| sink.lock().unwrap().push(msg.to_string())),
            )
            .unwrap();

        backend.report_error("xrun");
        assert_eq!(*seen.lock().unwrap(), ["xrun"]);
    }
}
