//! Audio device description and user-facing device selection.

use crate::{Error, Result};
use std::fmt;
use std::time::Duration;

/// Audio device information as reported by a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioDevice {
    /// Position of the device in the backend's full device list.
    pub index: usize,
    /// Human-readable device name.
    pub name: String,
    /// Maximum number of capture channels (0 for output-only devices).
    pub max_input_channels: u16,
    /// Maximum number of playback channels (0 for input-only devices).
    pub max_output_channels: u16,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
    /// Lowest input latency the device advertises.
    pub default_low_input_latency: Duration,
    /// Lowest output latency the device advertises.
    pub default_low_output_latency: Duration,
}

impl AudioDevice {
    /// Whether the device can capture audio.
    pub fn is_input(&self) -> bool {
        self.max_input_channels > 0
    }

    /// Whether the device can play audio.
    pub fn is_output(&self) -> bool {
        self.max_output_channels > 0
    }

    /// Whether the device supports the given direction.
    pub fn supports(&self, direction: Direction) -> bool {
        match direction {
            Direction::Input => self.is_input(),
            Direction::Output => self.is_output(),
        }
    }
}

/// Which side of a duplex stream a device is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Capture side.
    Input,
    /// Playback side.
    Output,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// Devices usable in `direction`, in backend order.
pub fn filter_devices(devices: &[AudioDevice], direction: Direction) -> Vec<AudioDevice> {
    devices
        .iter()
        .filter(|d| d.supports(direction))
        .cloned()
        .collect()
}

/// Resolve a user query to a device.
///
/// The query can be:
/// - A numeric index into the devices filtered by `direction` (e.g. "0", "1")
/// - An exact device name
/// - A partial device name (case-insensitive; the first match wins)
pub fn select_device(
    devices: &[AudioDevice],
    query: &str,
    direction: Direction,
) -> Result<AudioDevice> {
    let candidates = filter_devices(devices, direction);

    if let Ok(index) = query.trim().parse::<usize>() {
        return candidates.get(index).cloned().ok_or_else(|| {
            Error::DeviceNotFound(format!(
                "{direction} device index {index} (only {} devices available)",
                candidates.len()
            ))
        });
    }

    if let Some(device) = candidates.iter().find(|d| d.name == query) {
        return Ok(device.clone());
    }

    let search = query.to_lowercase();
    let matches: Vec<&AudioDevice> = candidates
        .iter()
        .filter(|d| d.name.to_lowercase().contains(&search))
        .collect();

    match matches.as_slice() {
        [] => Err(Error::DeviceNotFound(format!(
            "no {direction} device matching '{query}'"
        ))),
        [only] => Ok((*only).clone()),
        [first, ..] => {
            let names: Vec<&str> = matches.iter().map(|d| d.name.as_str()).collect();
            tracing::warn!(
                query,
                %direction,
                ?names,
                chosen = first.name.as_str(),
                "device query is ambiguous, using first match"
            );
            Ok((*first).clone())
        }
    }
}

/// Multi-line description of a device, as shown by `vocl info`.
pub fn format_device(index: usize, device: &AudioDevice) -> String {
    format!(
        "[{index}] {}\n  Max input channels:  {}\n  Max output channels: {}\n  Default sample rate: {} Hz\n  Default low input latency:  {:.3} sec\n  Default low output latency: {:.3} sec",
        device.name,
        device.max_input_channels,
        device.max_output_channels,
        device.default_sample_rate,
        device.default_low_input_latency.as_secs_f64(),
        device.default_low_output_latency.as_secs_f64(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(index: usize, name: &str, inputs: u16, outputs: u16) -> AudioDevice {
        AudioDevice {
            index,
            name: name.to_string(),
            max_input_channels: inputs,
            max_output_channels: outputs,
            default_sample_rate: 48000,
            default_low_input_latency: Duration::from_millis(5),
            default_low_output_latency: Duration::from_millis(10),
        }
    }

    fn devices() -> Vec<AudioDevice> {
        vec![
            device(0, "Built-in Microphone", 2, 0),
            device(1, "Built-in Output", 0, 2),
            device(2, "USB Audio Interface", 4, 4),
            device(3, "USB Headset", 1, 2),
        ]
    }

    #[test]
    fn test_filter_by_direction() {
        let inputs = filter_devices(&devices(), Direction::Input);
        let names: Vec<_> = inputs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            ["Built-in Microphone", "USB Audio Interface", "USB Headset"]
        );

        let outputs = filter_devices(&devices(), Direction::Output);
        assert_eq!(outputs.len(), 3);
        assert_eq!(outputs[0].name, "Built-in Output");
    }

    #[test]
    fn test_select_by_filtered_index() {
        // Index 1 among outputs is the USB interface, not the global index 1.
        let dev = select_device(&devices(), "1", Direction::Output).unwrap();
        assert_eq!(dev.name, "USB Audio Interface");
        assert_eq!(dev.index, 2);
    }

    #[test]
    fn test_select_index_out_of_range() {
        let err = select_device(&devices(), "7", Direction::Input).unwrap_err();
        assert!(matches!(err, Error::DeviceNotFound(_)));
        assert!(err.to_string().contains("only 3 devices"));
    }

    #[test]
    fn test_select_exact_name() {
        let dev = select_device(&devices(), "USB Headset", Direction::Input).unwrap();
        assert_eq!(dev.index, 3);
    }

    #[test]
    fn test_select_substring_case_insensitive() {
        let dev = select_device(&devices(), "microphone", Direction::Input).unwrap();
        assert_eq!(dev.name, "Built-in Microphone");
    }

    #[test]
    fn test_select_ambiguous_takes_first() {
        let dev = select_device(&devices(), "usb", Direction::Output).unwrap();
        assert_eq!(dev.name, "USB Audio Interface");
    }

    #[test]
    fn test_select_wrong_direction() {
        let err = select_device(&devices(), "Built-in Output", Direction::Input).unwrap_err();
        assert!(matches!(err, Error::DeviceNotFound(_)));
    }

    #[test]
    fn test_format_device() {
        let text = format_device(0, &device(4, "Loopback", 2, 2));
        assert!(text.starts_with("[0] Loopback\n"));
        assert!(text.contains("Max input channels:  2"));
        assert!(text.contains("Default sample rate: 48000 Hz"));
        assert!(text.contains("Default low input latency:  0.005 sec"));
        assert!(text.contains("Default low output latency: 0.010 sec"));
    }
}
