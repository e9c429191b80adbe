//! Live echo command.

use crate::prompt;
use crate::settings::Settings;
use anyhow::{Context, bail};
use clap::Args;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use vocl_core::{EchoEffect, EchoParams, Effect};
use vocl_io::{
    AudioBackend, AudioDevice, AudioStream, Direction, ShutdownSignal, StreamConfig,
    default_backend, max_shared_channels, select_device,
};

const DEFAULT_BUFFER_SIZE: u32 = 64;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Input device: index among input devices, or (partial) name [default: system input]
    #[arg(short, long)]
    input: Option<String>,

    /// Output device: index among output devices, or (partial) name [default: system output]
    #[arg(short, long)]
    output: Option<String>,

    /// Echo delay time in milliseconds [default: 100]
    #[arg(short, long)]
    delay: Option<f32>,

    /// Echo feedback, usually 0-1 [default: 0.2]
    #[arg(short, long, allow_negative_numbers = true)]
    feedback: Option<f32>,

    /// Echo mix level, usually 0-1 [default: 0.6]
    #[arg(short, long, allow_negative_numbers = true)]
    mix: Option<f32>,

    /// Channels to process [default: most both devices support]
    #[arg(long)]
    channels: Option<u16>,

    /// Sample rate in Hz [default: input device's default rate]
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Frames per buffer [default: 64]
    #[arg(long)]
    buffer_size: Option<u32>,

    /// Settings file (TOML) with [echo] and [stream] tables
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Choose devices and echo parameters interactively
    #[arg(short = 't', long)]
    interactive: bool,
}

/// Run settings after merging flags, settings file and defaults.
#[derive(Debug, Clone, PartialEq)]
struct Resolved {
    input: Option<String>,
    output: Option<String>,
    echo: EchoParams,
    channels: Option<u16>,
    sample_rate: Option<u32>,
    buffer_size: u32,
}

fn resolve(args: &RunArgs, settings: &Settings) -> Resolved {
    let defaults = EchoParams::default();
    Resolved {
        input: args.input.clone().or_else(|| settings.stream.input.clone()),
        output: args.output.clone().or_else(|| settings.stream.output.clone()),
        echo: EchoParams {
            delay_ms: args
                .delay
                .or(settings.echo.delay_ms)
                .unwrap_or(defaults.delay_ms),
            feedback: args
                .feedback
                .or(settings.echo.feedback)
                .unwrap_or(defaults.feedback),
            mix: args.mix.or(settings.echo.mix).unwrap_or(defaults.mix),
        },
        channels: args.channels.or(settings.stream.channels),
        sample_rate: args.sample_rate.or(settings.stream.sample_rate),
        buffer_size: args
            .buffer_size
            .or(settings.stream.buffer_size)
            .unwrap_or(DEFAULT_BUFFER_SIZE),
    }
}

/// Reject values that can never produce a stream, before touching devices.
fn check(resolved: &Resolved) -> anyhow::Result<()> {
    let echo = &resolved.echo;
    if !(echo.delay_ms.is_finite() && echo.delay_ms > 0.0) {
        bail!("delay must be a positive number of milliseconds, got {}", echo.delay_ms);
    }
    if !echo.feedback.is_finite() {
        bail!("feedback must be a finite number, got {}", echo.feedback);
    }
    if !echo.mix.is_finite() {
        bail!("mix must be a finite number, got {}", echo.mix);
    }
    if resolved.buffer_size == 0 {
        bail!("buffer size must be at least one frame");
    }
    if resolved.sample_rate == Some(0) {
        bail!("sample rate must be positive");
    }
    Ok(())
}

fn pick_device(
    backend: &dyn AudioBackend,
    devices: &[AudioDevice],
    query: Option<&str>,
    direction: Direction,
) -> anyhow::Result<AudioDevice> {
    if let Some(query) = query {
        return Ok(select_device(devices, query, direction)?);
    }
    let default = match direction {
        Direction::Input => backend.default_input_device()?,
        Direction::Output => backend.default_output_device()?,
    };
    default.with_context(|| format!("no default {direction} device available"))
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let backend = default_backend();
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_with(
        &args,
        backend.as_ref(),
        &mut stdin.lock(),
        &mut stdout.lock(),
        wait_for_ctrl_c,
    )
}

/// Block until Ctrl+C.
///
/// The handler is only installed once the stream is running, so Ctrl+C during
/// device listing or prompts still terminates the process.
fn wait_for_ctrl_c() -> anyhow::Result<()> {
    let shutdown = ShutdownSignal::new();
    let trigger = shutdown.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nStopping...");
        trigger.trigger();
    })?;
    shutdown.wait();
    Ok(())
}

/// Body of `vocl run` against any backend and terminal.
///
/// Calls `wait_for_stop` once the stream has started and stops the stream
/// when it returns.
pub fn run_with(
    args: &RunArgs,
    backend: &dyn AudioBackend,
    input: &mut impl BufRead,
    out: &mut impl Write,
    wait_for_stop: impl FnOnce() -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let mut resolved = resolve(args, &settings);
    check(&resolved)?;

    let devices = backend.list_devices()?;
    let (input_device, output_device) = if args.interactive {
        let input_device = prompt::select_device(&devices, Direction::Input, input, out)?;
        let output_device = prompt::select_device(&devices, Direction::Output, input, out)?;
        resolved.echo = prompt::echo_params(resolved.echo, input, out)?;
        (input_device, output_device)
    } else {
        (
            pick_device(backend, &devices, resolved.input.as_deref(), Direction::Input)?,
            pick_device(backend, &devices, resolved.output.as_deref(), Direction::Output)?,
        )
    };

    let channels = resolved
        .channels
        .unwrap_or_else(|| max_shared_channels(&input_device, &output_device));
    let sample_rate = resolved
        .sample_rate
        .unwrap_or(input_device.default_sample_rate);
    let echo = resolved.echo;

    writeln!(out, "\nSelected input device: {}", input_device.name)?;
    writeln!(out, "Selected output device: {}", output_device.name)?;
    writeln!(out, "Using sample rate: {sample_rate} Hz")?;
    writeln!(out, "Using channels: {channels}")?;
    writeln!(
        out,
        "Echo settings - Delay: {:.0}ms, Feedback: {:.2}, Mix: {:.2}",
        echo.delay_ms, echo.feedback, echo.mix
    )?;

    let config = StreamConfig {
        input_device,
        output_device,
        sample_rate,
        channels,
        buffer_frames: resolved.buffer_size,
    };

    let effects = (0..channels)
        .map(|_| {
            EchoEffect::new(sample_rate as f32, echo).map(|e| Box::new(e) as Box<dyn Effect + Send>)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut stream = AudioStream::open_with(backend, config, effects)?;
    stream.start()?;

    writeln!(
        out,
        "Streaming input to output with echo effect. Press Ctrl+C to stop."
    )?;
    out.flush()?;
    wait_for_stop()?;

    stream.stop()?;
    stream.close()?;
    let underruns = stream.underruns();
    if underruns > 0 {
        tracing::warn!(underruns, "input was late during streaming");
    }
    writeln!(out, "Stopped. Buffer underruns: {underruns}")?;
    Ok(())
}
