//! Settings file for `vocl run`.
//!
//! Every key is optional. Values given on the command line win over the file,
//! and the file wins over built-in defaults.
//!
//! ```toml
//! [echo]
//! delay_ms = 250.0
//! feedback = 0.35
//! mix = 0.5
//!
//! [stream]
//! input = "USB"
//! output = "1"
//! sample_rate = 48000
//! channels = 2
//! buffer_size = 128
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Parsed settings file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Echo parameters.
    #[serde(default)]
    pub echo: EchoSettings,

    /// Device and stream format.
    #[serde(default)]
    pub stream: StreamSettings,
}

/// `[echo]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EchoSettings {
    /// Delay time in milliseconds.
    pub delay_ms: Option<f32>,
    /// Fraction of the echo fed back into the delay line.
    pub feedback: Option<f32>,
    /// Fraction of the echo added to the output.
    pub mix: Option<f32>,
}

/// `[stream]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StreamSettings {
    /// Input device index or name.
    pub input: Option<String>,
    /// Output device index or name.
    pub output: Option<String>,
    /// Sample rate in Hz.
    pub sample_rate: Option<u32>,
    /// Channels to process.
    pub channels: Option<u16>,
    /// Frames per buffer.
    pub buffer_size: Option<u32>,
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a settings file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("invalid settings file {}", path.display()))
    }
}
