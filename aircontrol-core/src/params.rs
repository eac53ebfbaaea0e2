//! Task parameter sets.
//!
//! Each task loads its parameters from the configuration store exactly once,
//! in a fixed order, stopping at the first failure. Loading constructs the
//! parameter set, so a getter can never observe unvalidated state.
//!
//! Target parameters use a two-level lookup: the section named after the
//! target first, then the shared `target` section.

use std::convert::TryFrom;

use crate::air::{AirCode, AirCommand, AirCommandError};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::pins::{self, BoardRevision};

fn missing(task: &str, field: &'static str) -> Error {
    Error::Parameter {
        task: task.to_owned(),
        field,
        problem: "is missing".to_owned(),
    }
}

fn invalid<S: Into<String>>(task: &str, field: &'static str, problem: S) -> Error {
    Error::Parameter {
        task: task.to_owned(),
        field,
        problem: problem.into(),
    }
}

/// An ordered list of configuration sections tried in sequence.
struct SectionChain<'a> {
    config: &'a Config,
    sections: [&'a str; 2],
}

impl<'a> SectionChain<'a> {
    fn integer(&self, key: &str) -> Option<i64> {
        self.sections
            .iter()
            .find_map(|section| self.config.integer(section, key))
    }

    fn string(&self, key: &str) -> Option<String> {
        self.sections
            .iter()
            .find_map(|section| self.config.string(section, key))
    }
}

/// Narrow a raw configuration integer to the store's 32-bit value range.
fn to_i32(task: &str, field: &'static str, value: i64) -> Result<i32> {
    i32::try_from(value).map_err(|_| invalid(task, field, format!("{} is invalid", value)))
}

fn validate_pin(task: &str, revision: BoardRevision, value: i64) -> Result<u8> {
    u8::try_from(value)
        .ok()
        .filter(|&pin| pins::is_valid_gpio_pin(revision, pin))
        .ok_or_else(|| invalid(task, "gpioPin", format!("{} is invalid", value)))
}

/// Parameters of a Scan task. The scan duration is supplied by the caller
/// and not persisted.
#[derive(Debug)]
pub struct ScanParameters {
    gpio_pin: u8,
    sampling_rate_us: i32,
}

impl ScanParameters {
    /// Load and validate all scan parameters from the `scan` section.
    pub fn load(config: &Config, revision: BoardRevision) -> Result<Self> {
        let task = "scan";

        let gpio_pin = config
            .integer("scan", "gpioPin")
            .ok_or_else(|| missing(task, "gpioPin"))
            .and_then(|value| validate_pin(task, revision, value))?;

        let sampling_rate_us = config
            .integer("scan", "samplingRate")
            .ok_or_else(|| missing(task, "samplingRate"))
            .and_then(|value| to_i32(task, "samplingRate", value))?;
        if sampling_rate_us <= 0 {
            return Err(invalid(task, "samplingRate", "is invalid"));
        }

        Ok(ScanParameters {
            gpio_pin,
            sampling_rate_us,
        })
    }

    pub fn gpio_pin(&self) -> u8 {
        self.gpio_pin
    }

    /// Delay between two scan samples, in microseconds.
    pub fn sampling_rate(&self) -> i32 {
        self.sampling_rate_us
    }
}

/// Parameters of a Replay task. The sampling rate and sample data come from
/// the dump file, not the configuration.
#[derive(Debug)]
pub struct ReplayParameters {
    gpio_pin: u8,
}

impl ReplayParameters {
    /// Load and validate all replay parameters from the `replay` section.
    pub fn load(config: &Config, revision: BoardRevision) -> Result<Self> {
        let gpio_pin = config
            .integer("replay", "gpioPin")
            .ok_or_else(|| missing("replay", "gpioPin"))
            .and_then(|value| validate_pin("replay", revision, value))?;

        Ok(ReplayParameters { gpio_pin })
    }

    pub fn gpio_pin(&self) -> u8 {
        self.gpio_pin
    }
}

/// Parameters of a Target task.
#[derive(Debug)]
pub struct TargetParameters {
    gpio_pin: u8,
    data_length_us: i32,
    sync_length_us: i32,
    air_command: AirCommand,
    send_command: i32,
    send_delay_us: i32,
}

impl TargetParameters {
    /// Load and validate all target parameters.
    ///
    /// Field order is fixed and loading stops at the first failure:
    /// gpioPin, dataLength, syncLength, airCode, airCommand, sendCommand,
    /// sendDelay. Every key falls back from the section named `name` to the
    /// shared `target` section.
    pub fn load(config: &Config, name: &str, revision: BoardRevision) -> Result<Self> {
        let task = format!("target {}", name);
        let lookup = SectionChain {
            config,
            sections: [name, "target"],
        };

        let gpio_pin = lookup
            .integer("gpioPin")
            .ok_or_else(|| missing(&task, "gpioPin"))
            .and_then(|value| validate_pin(&task, revision, value))?;

        let data_length_us = lookup
            .integer("dataLength")
            .ok_or_else(|| missing(&task, "dataLength"))
            .and_then(|value| to_i32(&task, "dataLength", value))?;
        if data_length_us <= 0 {
            return Err(invalid(&task, "dataLength", "is invalid"));
        }

        let sync_length_us = lookup
            .integer("syncLength")
            .ok_or_else(|| missing(&task, "syncLength"))
            .and_then(|value| to_i32(&task, "syncLength", value))?;
        if sync_length_us < 0 {
            return Err(invalid(&task, "syncLength", "is invalid"));
        }

        let air_code = lookup
            .integer("airCode")
            .ok_or_else(|| missing(&task, "airCode"))
            .and_then(|value| to_i32(&task, "airCode", value))
            .and_then(|value| {
                AirCode::try_from(value).map_err(|_| invalid(&task, "airCode", "is invalid"))
            })?;

        let air_command = lookup
            .string("airCommand")
            .ok_or_else(|| missing(&task, "airCommand"))
            .and_then(|symbols| {
                AirCommand::new(air_code, &symbols).map_err(|err| match err {
                    AirCommandError::Empty => invalid(&task, "airCommand", "is empty"),
                    AirCommandError::IllegalSymbol { symbol, position } => invalid(
                        &task,
                        "airCommand",
                        format!(
                            "contains illegal character '{}' at position {}",
                            symbol, position
                        ),
                    ),
                })
            })?;

        let send_command = lookup
            .integer("sendCommand")
            .ok_or_else(|| missing(&task, "sendCommand"))
            .and_then(|value| to_i32(&task, "sendCommand", value))?;
        if send_command <= 0 {
            return Err(invalid(&task, "sendCommand", "is invalid"));
        }

        let send_delay_us = lookup
            .integer("sendDelay")
            .ok_or_else(|| missing(&task, "sendDelay"))
            .and_then(|value| to_i32(&task, "sendDelay", value))?;

        Ok(TargetParameters {
            gpio_pin,
            data_length_us,
            sync_length_us,
            air_command,
            send_command,
            send_delay_us,
        })
    }

    pub fn gpio_pin(&self) -> u8 {
        self.gpio_pin
    }

    /// Pulse length of a single data element, in microseconds.
    pub fn data_length(&self) -> i32 {
        self.data_length_us
    }

    /// Pulse length of a single sync element, in microseconds. Codes
    /// without sync elements ignore it.
    pub fn sync_length(&self) -> i32 {
        self.sync_length_us
    }

    pub fn air_code(&self) -> AirCode {
        self.air_command.code()
    }

    pub fn air_command(&self) -> &AirCommand {
        &self.air_command
    }

    /// Number of times the air command is transmitted.
    pub fn send_command(&self) -> i32 {
        self.send_command
    }

    /// Delay between repeated transmissions, in microseconds.
    pub fn send_delay(&self) -> i32 {
        self.send_delay_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REVISION: BoardRevision = BoardRevision::Rev2;

    fn field_of(err: Error) -> &'static str {
        match err {
            Error::Parameter { field, .. } => field,
            other => panic!("expected parameter error, got {}", other),
        }
    }

    #[test]
    fn scan_parameters_load() {
        let config = Config::from_toml_str(
            r#"
            [scan]
            gpioPin = 27
            samplingRate = 100
        "#,
        );

        let parameters = ScanParameters::load(&config, REVISION).unwrap();
        assert_eq!(parameters.gpio_pin(), 27);
        assert_eq!(parameters.sampling_rate(), 100);
    }

    #[test]
    fn scan_rejects_zero_sampling_rate() {
        let config = Config::from_toml_str("[scan]\ngpioPin = 17\nsamplingRate = 0\n");
        let err = ScanParameters::load(&config, REVISION).unwrap_err();
        assert_eq!(field_of(err), "samplingRate");
    }

    #[test]
    fn scan_reports_missing_sampling_rate() {
        let config = Config::from_toml_str("[scan]\ngpioPin = 17\n");
        let err = ScanParameters::load(&config, REVISION).unwrap_err();
        assert!(err.to_string().contains("samplingRate is missing"), "{}", err);
    }

    #[test]
    fn scan_rejects_invalid_pin() {
        let config = Config::from_toml_str("[scan]\ngpioPin = 5\nsamplingRate = 100\n");
        let err = ScanParameters::load(&config, REVISION).unwrap_err();
        assert!(err.to_string().contains("gpioPin 5 is invalid"), "{}", err);
    }

    #[test]
    fn replay_parameters_load() {
        let config = Config::from_toml_str("[replay]\ngpioPin = 17\n");
        let parameters = ReplayParameters::load(&config, REVISION).unwrap();
        assert_eq!(parameters.gpio_pin(), 17);
    }

    #[test]
    fn replay_reports_missing_pin() {
        let config = Config::from_toml_str("[replay]\n");
        let err = ReplayParameters::load(&config, REVISION).unwrap_err();
        assert_eq!(field_of(err), "gpioPin");
    }

    const FULL_TARGET: &str = r#"
        [balcony]
        gpioPin = 17
        dataLength = 1000
        syncLength = 5000
        airCode = 0
        airCommand = "S0110"
        sendCommand = 3
        sendDelay = 10000
    "#;

    #[test]
    fn target_parameters_load() {
        let config = Config::from_toml_str(FULL_TARGET);
        let parameters = TargetParameters::load(&config, "balcony", REVISION).unwrap();

        assert_eq!(parameters.gpio_pin(), 17);
        assert_eq!(parameters.data_length(), 1000);
        assert_eq!(parameters.sync_length(), 5000);
        assert_eq!(parameters.air_code(), AirCode::Manchester);
        assert_eq!(parameters.air_command().symbols(), "S0110");
        assert_eq!(parameters.send_command(), 3);
        assert_eq!(parameters.send_delay(), 10000);
    }

    #[test]
    fn target_falls_back_to_shared_section() {
        let config = Config::from_toml_str(
            r#"
            [target]
            gpioPin = 17
            dataLength = 500
            syncLength = 0
            airCode = 1
            sendCommand = 1
            sendDelay = 0

            [outlet_a]
            airCommand = "0101"
            dataLength = 1200
        "#,
        );

        let parameters = TargetParameters::load(&config, "outlet_a", REVISION).unwrap();
        // Named section wins...
        assert_eq!(parameters.data_length(), 1200);
        // ...shared section fills the rest
        assert_eq!(parameters.gpio_pin(), 17);
        assert_eq!(parameters.send_command(), 1);
        assert_eq!(parameters.air_code(), AirCode::RemoteControlledOutlet);
    }

    #[test]
    fn target_reports_key_absent_in_both_sections() {
        let config = Config::from_toml_str(
            r#"
            [target]
            gpioPin = 17

            [outlet_a]
            dataLength = 1000
        "#,
        );

        let err = TargetParameters::load(&config, "outlet_a", REVISION).unwrap_err();
        assert_eq!(field_of(err), "syncLength");
    }

    #[test]
    fn target_load_is_fail_fast_in_field_order() {
        // Both dataLength and airCode are bad; the earlier field reports.
        let config = Config::from_toml_str(
            r#"
            [balcony]
            gpioPin = 17
            dataLength = 0
            syncLength = 0
            airCode = 99
            airCommand = "0"
            sendCommand = 1
            sendDelay = 0
        "#,
        );

        let err = TargetParameters::load(&config, "balcony", REVISION).unwrap_err();
        assert_eq!(field_of(err), "dataLength");
    }

    #[test]
    fn target_rejects_air_code_beyond_enumeration() {
        let config = Config::from_toml_str(&FULL_TARGET.replace("airCode = 0", "airCode = 4"));
        let err = TargetParameters::load(&config, "balcony", REVISION).unwrap_err();
        assert_eq!(field_of(err), "airCode");
    }

    #[test]
    fn target_rejects_negative_air_code() {
        let config = Config::from_toml_str(&FULL_TARGET.replace("airCode = 0", "airCode = -1"));
        let err = TargetParameters::load(&config, "balcony", REVISION).unwrap_err();
        assert_eq!(field_of(err), "airCode");
    }

    #[test]
    fn target_reports_illegal_command_character_position() {
        let config =
            Config::from_toml_str(&FULL_TARGET.replace("airCommand = \"S0110\"", "airCommand = \"2\""));
        let err = TargetParameters::load(&config, "balcony", REVISION).unwrap_err();
        assert!(
            err.to_string()
                .contains("illegal character '2' at position 1"),
            "{}",
            err
        );
    }

    #[test]
    fn target_accepts_zero_sync_length() {
        let config = Config::from_toml_str(&FULL_TARGET.replace("syncLength = 5000", "syncLength = 0"));
        assert!(TargetParameters::load(&config, "balcony", REVISION).is_ok());
    }

    #[test]
    fn target_rejects_negative_sync_length() {
        let config =
            Config::from_toml_str(&FULL_TARGET.replace("syncLength = 5000", "syncLength = -1"));
        let err = TargetParameters::load(&config, "balcony", REVISION).unwrap_err();
        assert_eq!(field_of(err), "syncLength");
    }

    #[test]
    fn target_rejects_zero_send_command() {
        let config = Config::from_toml_str(&FULL_TARGET.replace("sendCommand = 3", "sendCommand = 0"));
        let err = TargetParameters::load(&config, "balcony", REVISION).unwrap_err();
        assert_eq!(field_of(err), "sendCommand");
    }

    #[test]
    fn target_requires_send_delay_even_for_single_send() {
        let config = Config::from_toml_str(
            &FULL_TARGET
                .replace("sendCommand = 3", "sendCommand = 1")
                .replace("sendDelay = 10000\n", ""),
        );
        let err = TargetParameters::load(&config, "balcony", REVISION).unwrap_err();
        assert_eq!(field_of(err), "sendDelay");
    }

    #[test]
    fn target_rejects_out_of_range_pin() {
        let config = Config::from_toml_str(&FULL_TARGET.replace("gpioPin = 17", "gpioPin = 300"));
        let err = TargetParameters::load(&config, "balcony", REVISION).unwrap_err();
        assert!(err.to_string().contains("gpioPin 300 is invalid"), "{}", err);
    }

    #[test]
    fn target_rejects_value_beyond_i32() {
        let config = Config::from_toml_str(
            &FULL_TARGET.replace("dataLength = 1000", "dataLength = 4294967296"),
        );
        let err = TargetParameters::load(&config, "balcony", REVISION).unwrap_err();
        assert_eq!(field_of(err), "dataLength");
    }
}
