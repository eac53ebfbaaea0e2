//! Raspberry Pi GPIO backend.
//!
//! Pins are taken from rppal lazily, the first time a task touches them,
//! and stay bound for the lifetime of the invocation. Broadcom GPIO
//! numbering is used throughout, no re-mapping.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use rppal::gpio::{Gpio, IoPin, Mode};
use rppal::system::{DeviceInfo, Model};

use aircontrol_core::error::{Error, Result};
use aircontrol_core::gpio::{GpioPort, Level, PinMode};
use aircontrol_core::pins::BoardRevision;

pub struct RppalPort {
    gpio: Gpio,
    revision: BoardRevision,
    pins: HashMap<u8, IoPin>,
}

impl RppalPort {
    pub fn new() -> Result<RppalPort> {
        let gpio = Gpio::new().map_err(|err| Error::Gpio(err.to_string()))?;

        let device = DeviceInfo::new().map_err(|err| Error::Gpio(err.to_string()))?;
        let revision = match device.model() {
            Model::RaspberryPiBRev1 => BoardRevision::Rev1,
            _ => BoardRevision::Rev2,
        };

        Ok(RppalPort {
            gpio,
            revision,
            pins: HashMap::new(),
        })
    }

    fn pin(&mut self, pin: u8, mode: Mode) -> Result<&mut IoPin> {
        match self.pins.entry(pin) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let io = self
                    .gpio
                    .get(pin)
                    .map_err(|err| Error::Gpio(err.to_string()))?
                    .into_io(mode);
                Ok(entry.insert(io))
            }
        }
    }
}

impl GpioPort for RppalPort {
    fn set_mode(&mut self, pin: u8, mode: PinMode) -> Result<()> {
        let mode = match mode {
            PinMode::Input => Mode::Input,
            PinMode::Output => Mode::Output,
        };
        self.pin(pin, mode)?.set_mode(mode);
        Ok(())
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<()> {
        let io = self.pin(pin, Mode::Output)?;
        io.write(match level {
            Level::Low => rppal::gpio::Level::Low,
            Level::High => rppal::gpio::Level::High,
        });
        Ok(())
    }

    fn read(&mut self, pin: u8) -> Result<Level> {
        let io = self.pin(pin, Mode::Input)?;
        Ok(match io.read() {
            rppal::gpio::Level::Low => Level::Low,
            rppal::gpio::Level::High => Level::High,
        })
    }

    fn sleep_us(&mut self, us: u64) {
        thread::sleep(Duration::from_micros(us));
    }

    fn board_revision(&self) -> BoardRevision {
        self.revision
    }
}
