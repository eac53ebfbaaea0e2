//! Air codes, air commands and pulse-train generation.
//!
//! An [`AirCommand`] is a symbol string validated against the alphabet of
//! its [`AirCode`]. Encoding turns the command into a sequence of
//! [`Pulse`]s (level plus duration); transmission writes each level and
//! sleeps for its duration, repeating the frame as configured.

use std::convert::TryFrom;

use log::debug;

use crate::error::Result;
use crate::gpio::{GpioPort, Level, PinMode};
use crate::params::TargetParameters;

/// Supported radio frame encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirCode {
    /// Level transition in the middle of every data pulse.
    Manchester,
    /// Remote controlled outlets, falling edge at 25% or 75% of the pulse.
    RemoteControlledOutlet,
    /// Tormatic door drives, single or double pulse per symbol.
    Tormatic,
    /// Melitec light switches, data and sync pulses at one-third cadence.
    Melitec,
}

impl AirCode {
    /// The symbols legal in an air command for this code.
    pub fn alphabet(self) -> &'static str {
        match self {
            AirCode::Manchester => "01sS",
            AirCode::RemoteControlledOutlet | AirCode::Tormatic => "01",
            AirCode::Melitec => "0S",
        }
    }
}

impl TryFrom<i32> for AirCode {
    type Error = ();

    fn try_from(value: i32) -> std::result::Result<Self, ()> {
        match value {
            0 => Ok(AirCode::Manchester),
            1 => Ok(AirCode::RemoteControlledOutlet),
            2 => Ok(AirCode::Tormatic),
            3 => Ok(AirCode::Melitec),
            _ => Err(()),
        }
    }
}

/// A single timed level on the air.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub level: Level,
    pub duration_us: u32,
}

impl Pulse {
    fn high(duration_us: i32) -> Pulse {
        Pulse {
            level: Level::High,
            duration_us: duration_us as u32,
        }
    }

    fn low(duration_us: i32) -> Pulse {
        Pulse {
            level: Level::Low,
            duration_us: duration_us as u32,
        }
    }
}

/// Reason an air command string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AirCommandError {
    /// The command string contains no symbols.
    #[error("command is empty")]
    Empty,

    /// A symbol outside the air code's alphabet, with its 1-based position.
    #[error("illegal character '{symbol}' at position {position}")]
    IllegalSymbol { symbol: char, position: usize },
}

/// A validated sequence of data and sync symbols, bound to its air code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirCommand {
    code: AirCode,
    symbols: String,
}

impl AirCommand {
    /// Validate `symbols` against the alphabet of `code`.
    pub fn new(code: AirCode, symbols: &str) -> std::result::Result<Self, AirCommandError> {
        if symbols.is_empty() {
            return Err(AirCommandError::Empty);
        }

        let alphabet = code.alphabet();
        if let Some((index, symbol)) = symbols
            .chars()
            .enumerate()
            .find(|(_, symbol)| !alphabet.contains(*symbol))
        {
            return Err(AirCommandError::IllegalSymbol {
                symbol,
                position: index + 1,
            });
        }

        Ok(AirCommand {
            code,
            symbols: symbols.to_owned(),
        })
    }

    pub fn code(&self) -> AirCode {
        self.code
    }

    pub fn symbols(&self) -> &str {
        &self.symbols
    }

    /// Encode the command into its pulse train.
    ///
    /// Divisions truncate, and truncate before multiplying; existing
    /// receivers are matched against exactly these timings.
    pub fn pulses(&self, data_length_us: i32, sync_length_us: i32) -> Vec<Pulse> {
        let data = data_length_us;
        let sync = sync_length_us;
        let mut pulses = Vec::with_capacity(2 * self.symbols.len());

        for symbol in self.symbols.chars() {
            match self.code {
                AirCode::Manchester => match symbol {
                    's' => pulses.push(Pulse::low(sync)),
                    'S' => pulses.push(Pulse::high(sync)),
                    // Falling edge in the middle of the pulse
                    '0' => {
                        pulses.push(Pulse::high(data / 2));
                        pulses.push(Pulse::low(data / 2));
                    }
                    // Rising edge in the middle of the pulse
                    '1' => {
                        pulses.push(Pulse::low(data / 2));
                        pulses.push(Pulse::high(data / 2));
                    }
                    _ => unreachable!("symbol validated at construction"),
                },

                AirCode::RemoteControlledOutlet => match symbol {
                    // Falling edge after 25% of the pulse
                    '0' => {
                        pulses.push(Pulse::high(data / 4));
                        pulses.push(Pulse::low((data / 4) * 3));
                    }
                    // Falling edge after 75% of the pulse
                    '1' => {
                        pulses.push(Pulse::high((data / 4) * 3));
                        pulses.push(Pulse::low(data / 4));
                    }
                    _ => unreachable!("symbol validated at construction"),
                },

                AirCode::Tormatic => match symbol {
                    // Falling edge after 33% of the pulse
                    '0' => {
                        pulses.push(Pulse::high(data / 3));
                        pulses.push(Pulse::low((data / 3) * 2));
                    }
                    // Falling edge after 33%, another rising edge after 66%
                    '1' => {
                        pulses.push(Pulse::high(data / 3));
                        pulses.push(Pulse::low(data / 3));
                        pulses.push(Pulse::high(data / 3));
                    }
                    _ => unreachable!("symbol validated at construction"),
                },

                AirCode::Melitec => match symbol {
                    // Falling edge after 33% of the pulse
                    '0' => {
                        pulses.push(Pulse::high(data / 3));
                        pulses.push(Pulse::low((data / 3) * 2));
                    }
                    // Falling edge after 66% of the sync pulse
                    'S' => {
                        pulses.push(Pulse::high((sync / 3) * 2));
                        pulses.push(Pulse::low(sync / 3));
                    }
                    _ => unreachable!("symbol validated at construction"),
                },
            }
        }

        pulses
    }
}

/// Transmit a target's air command.
///
/// The frame is sent `sendCommand` times. Between repetitions the line is
/// forced low for the configured send delay; no delay follows the final
/// repetition. The pin is returned to input mode afterwards.
pub fn transmit<P: GpioPort>(port: &mut P, pin: u8, parameters: &TargetParameters) -> Result<()> {
    let pulses = parameters
        .air_command()
        .pulses(parameters.data_length(), parameters.sync_length());

    debug!(
        "transmitting {} symbols on pin {}, {} repetition(s)",
        parameters.air_command().symbols().len(),
        pin,
        parameters.send_command()
    );

    port.set_mode(pin, PinMode::Output)?;

    for n in 0..parameters.send_command() {
        for pulse in &pulses {
            port.write(pin, pulse.level)?;
            port.sleep_us(u64::from(pulse.duration_us));
        }

        if n != parameters.send_command() - 1 {
            port.write(pin, Level::Low)?;
            port.sleep_us(parameters.send_delay().max(0) as u64);
        }
    }

    port.set_mode(pin, PinMode::Input)?;

    Ok(())
}
