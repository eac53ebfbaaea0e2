//! Raw replay of a recorded sample buffer.

use log::debug;

use crate::error::Result;
use crate::gpio::{GpioPort, Level, PinMode};

/// Write each sample's level to the pin at the recorded cadence.
///
/// The waveform is replayed as-is, without any interpretation. The pin is
/// returned to input mode afterwards.
pub fn play<P: GpioPort>(
    port: &mut P,
    pin: u8,
    sampling_rate_us: i32,
    samples: &[bool],
) -> Result<()> {
    debug!(
        "replaying {} samples on pin {} every {}us",
        samples.len(),
        pin,
        sampling_rate_us
    );

    port.set_mode(pin, PinMode::Output)?;

    for &high in samples {
        port.write(pin, Level::from(high))?;
        port.sleep_us(sampling_rate_us as u64);
    }

    port.set_mode(pin, PinMode::Input)?;

    Ok(())
}
