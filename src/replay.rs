//! Replay task: play back a recorded air scan dump.

use std::fs;
use std::path::Path;

use aircontrol_core::dump;
use aircontrol_core::error::{Error, Result};
use aircontrol_core::gpio::GpioPort;
use aircontrol_core::params::ReplayParameters;
use aircontrol_core::player;
use aircontrol_core::Config;

pub fn command_replay<P: GpioPort>(
    port: &mut P,
    config: &Config,
    path: &Path,
    gpio_override: Option<u8>,
) -> Result<()> {
    let parameters = ReplayParameters::load(config, port.board_revision())?;
    let pin = gpio_override.unwrap_or_else(|| parameters.gpio_pin());

    let bytes = fs::read(path).map_err(|source| Error::DumpFile {
        path: path.display().to_string(),
        action: "reading",
        source,
    })?;
    let dump = dump::decode(&bytes)?;

    player::play(port, pin, dump.sampling_rate_us, &dump.samples)
}
