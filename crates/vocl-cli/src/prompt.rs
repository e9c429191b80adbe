//! Interactive device and echo parameter prompts.
//!
//! Prompts read from any `BufRead` and write to any `Write` so they can be
//! driven from tests. Invalid answers re-prompt; end of input is an error.

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use vocl_core::EchoParams;
use vocl_io::{AudioDevice, Direction, filter_devices, format_device};

/// Read one trimmed line. End of input is reported as `UnexpectedEof`.
fn read_answer(input: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed while waiting for an answer",
        ));
    }
    Ok(line.trim().to_string())
}

/// List devices usable in `direction` and ask for one by index.
pub fn select_device(
    devices: &[AudioDevice],
    direction: Direction,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<AudioDevice> {
    let candidates = filter_devices(devices, direction);
    if candidates.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no {direction} devices found"),
        ));
    }

    writeln!(out, "\nAvailable {direction} devices:")?;
    writeln!(out, "{}", "-".repeat(direction.to_string().len() + 20))?;
    for (index, device) in candidates.iter().enumerate() {
        writeln!(out, "{}", format_device(index, device))?;
    }

    loop {
        write!(out, "Select {direction} device (enter number): ")?;
        out.flush()?;
        let answer = read_answer(input)?;
        match answer.parse::<usize>().ok().and_then(|i| candidates.get(i)) {
            Some(device) => return Ok(device.clone()),
            None => writeln!(out, "Invalid selection. Please try again.")?,
        }
    }
}

/// Ask for a value until `accept` passes. An empty answer keeps `default`.
fn ask<T: FromStr + Copy>(
    question: &str,
    default: T,
    accept: impl Fn(T) -> bool,
    complaint: &str,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<T> {
    loop {
        write!(out, "{question}")?;
        out.flush()?;
        let answer = read_answer(input)?;
        if answer.is_empty() {
            return Ok(default);
        }
        match answer.parse::<T>() {
            Ok(value) if accept(value) => return Ok(value),
            _ => writeln!(out, "{complaint}")?,
        }
    }
}

/// Ask for delay, feedback and mix, starting from `defaults`.
///
/// The prompt keeps feedback and mix within 0..=1 even though the effect
/// itself accepts any finite value.
pub fn echo_params(
    defaults: EchoParams,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<EchoParams> {
    writeln!(out, "\nEcho Configuration")?;
    writeln!(out, "-----------------")?;

    let delay_ms = ask(
        &format!(
            "Enter delay time in milliseconds (default: {:.0}): ",
            defaults.delay_ms
        ),
        defaults.delay_ms,
        |v: f32| v.is_finite() && v > 0.0,
        "Invalid input. Please enter a positive number.",
        input,
        out,
    )?;
    let feedback = ask(
        &format!("Enter feedback (0-1, default: {:.2}): ", defaults.feedback),
        defaults.feedback,
        |v: f32| (0.0..=1.0).contains(&v),
        "Invalid input. Please enter a number between 0 and 1.",
        input,
        out,
    )?;
    let mix = ask(
        &format!("Enter mix (0-1, default: {:.2}): ", defaults.mix),
        defaults.mix,
        |v: f32| (0.0..=1.0).contains(&v),
        "Invalid input. Please enter a number between 0 and 1.",
        input,
        out,
    )?;

    Ok(EchoParams {
        delay_ms,
        feedback,
        mix,
    })
}
