//! Scan task: record air activity and print or dump it.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use log::info;

use aircontrol_core::dump;
use aircontrol_core::error::{Error, Result};
use aircontrol_core::gpio::GpioPort;
use aircontrol_core::params::ScanParameters;
use aircontrol_core::sampler;
use aircontrol_core::Config;

pub fn command_scan<P: GpioPort>(
    port: &mut P,
    config: &Config,
    duration_ms: i32,
    dump_file: Option<&Path>,
    gpio_override: Option<u8>,
) -> Result<()> {
    let parameters = ScanParameters::load(config, port.board_revision())?;
    let pin = gpio_override.unwrap_or_else(|| parameters.gpio_pin());

    let total = sampler::sample_count(duration_ms, parameters.sampling_rate());
    let samples = sampler::record(port, pin, parameters.sampling_rate(), total)?;

    match dump_file {
        Some(path) => {
            let bytes = dump::encode(parameters.sampling_rate(), &samples);
            fs::write(path, bytes).map_err(|source| Error::DumpFile {
                path: path.display().to_string(),
                action: "writing",
                source,
            })?;
            info!("Air scan results dumped to '{}'", path.display());
        }
        None => {
            let stdout = io::stdout();
            write_pulse_view(&mut stdout.lock(), &samples)?;
        }
    }

    Ok(())
}

/// Render the sample buffer as an ASCII pulse view, one line per sample,
/// with an edge marker wherever the level changes.
fn write_pulse_view<W: Write>(out: &mut W, samples: &[bool]) -> io::Result<()> {
    let mut previous = false;

    for &high in samples {
        if high {
            if !previous {
                writeln!(out, "+----+")?;
            }
            writeln!(out, "     |")?;
        } else {
            if previous {
                writeln!(out, "+----+")?;
            }
            writeln!(out, "|")?;
        }

        previous = high;
    }

    Ok(())
}
