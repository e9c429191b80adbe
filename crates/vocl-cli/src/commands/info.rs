//! Audio device information command.

use clap::{Args, ValueEnum};
use std::io::Write;
use vocl_io::{AudioBackend, Direction, default_backend, filter_devices, format_device};

/// Device direction for CLI
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliDirection {
    Input,
    Output,
}

impl From<CliDirection> for Direction {
    fn from(direction: CliDirection) -> Self {
        match direction {
            CliDirection::Input => Direction::Input,
            CliDirection::Output => Direction::Output,
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    /// Only list devices of one direction
    #[arg(long, value_enum)]
    only: Option<CliDirection>,
}

pub fn run(args: &InfoArgs) -> anyhow::Result<()> {
    let backend = default_backend();
    let stdout = std::io::stdout();
    print_devices(backend.as_ref(), args, &mut stdout.lock())
}

/// Print input devices, then output devices, each indexed the way `run --input`
/// and `run --output` expect.
pub fn print_devices(
    backend: &dyn AudioBackend,
    args: &InfoArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let devices = backend.list_devices()?;

    if devices.is_empty() {
        writeln!(out, "No audio devices found.")?;
        return Ok(());
    }

    for direction in [Direction::Input, Direction::Output] {
        if args.only.is_some_and(|only| Direction::from(only) != direction) {
            continue;
        }

        let title = match direction {
            Direction::Input => "Input Devices:",
            Direction::Output => "Output Devices:",
        };
        writeln!(out, "\n{title}")?;
        writeln!(out, "{}", "-".repeat(title.len() - 1))?;

        let filtered = filter_devices(&devices, direction);
        if filtered.is_empty() {
            writeln!(out, "  (none)")?;
        }
        for (index, device) in filtered.iter().enumerate() {
            writeln!(out, "{}\n", format_device(index, device))?;
        }
    }

    Ok(())
}
