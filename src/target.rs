//! Target task: transmit an air command.

use aircontrol_core::air;
use aircontrol_core::error::{Error, Result};
use aircontrol_core::gpio::GpioPort;
use aircontrol_core::params::TargetParameters;
use aircontrol_core::Config;

pub fn command_target<P: GpioPort>(
    port: &mut P,
    config: &Config,
    name: &str,
    gpio_override: Option<u8>,
) -> Result<()> {
    if !config.has_section(name) {
        return Err(Error::UnknownTarget(name.to_owned()));
    }

    let parameters = TargetParameters::load(config, name, port.board_revision())?;
    let pin = gpio_override.unwrap_or_else(|| parameters.gpio_pin());

    air::transmit(port, pin, &parameters)
}
