//! The key/value configuration store.
//!
//! The configuration is a TOML file whose top-level tables are sections:
//! the fixed `scan`, `replay` and `target` sections plus one section per
//! target name. Lookups are dynamic by (section, key) so target sections
//! can be addressed by name.

use std::fs;
use std::path::PathBuf;

use toml::Value;

use crate::error::{Error, Result};

/// The program configuration, loaded once per invocation.
pub struct Config {
    location: PathBuf,
    root: Option<Value>,
}

impl Config {
    /// Default configuration file location.
    pub const DEFAULT_LOCATION: &'static str = "/etc/aircontrol.toml";

    pub fn new() -> Self {
        Config {
            location: PathBuf::from(Self::DEFAULT_LOCATION),
            root: None,
        }
    }

    /// Set the configuration file location. Only effective before `load`.
    pub fn set_location<P: Into<PathBuf>>(&mut self, location: P) {
        self.location = location.into();
    }

    /// Read and parse the configuration file. Must be called exactly once
    /// before any lookup.
    pub fn load(&mut self) -> Result<()> {
        assert!(self.root.is_none(), "configuration loaded twice");

        let path = self.location.display().to_string();
        let raw = fs::read_to_string(&self.location)
            .map_err(|source| Error::ConfigRead { path: path.clone(), source })?;
        let root = raw
            .parse::<Value>()
            .map_err(|source| Error::ConfigParse { path, source })?;

        self.root = Some(root);
        Ok(())
    }

    /// Check whether the given section exists.
    pub fn has_section(&self, section: &str) -> bool {
        self.section(section).map_or(false, Value::is_table)
    }

    /// Get an integer value, or `None` if the section or key is absent or
    /// the value has a different type.
    pub fn integer(&self, section: &str, key: &str) -> Option<i64> {
        self.section(section)?.get(key)?.as_integer()
    }

    /// Get a string value, or `None` if the section or key is absent or the
    /// value has a different type.
    pub fn string(&self, section: &str, key: &str) -> Option<String> {
        self.section(section)?
            .get(key)?
            .as_str()
            .map(str::to_owned)
    }

    fn section(&self, section: &str) -> Option<&Value> {
        let root = self
            .root
            .as_ref()
            .expect("configuration queried before load");
        root.get(section)
    }

    #[cfg(test)]
    pub(crate) fn from_toml_str(raw: &str) -> Config {
        Config {
            location: PathBuf::from("<test>"),
            root: Some(raw.parse::<Value>().expect("invalid test configuration")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = r#"
        [scan]
        gpioPin = 17
        samplingRate = 100

        [balcony]
        airCommand = "0110"
    "#;

    #[test]
    fn integer_lookup() {
        let config = Config::from_toml_str(RAW);
        assert_eq!(config.integer("scan", "gpioPin"), Some(17));
        assert_eq!(config.integer("scan", "samplingRate"), Some(100));
    }

    #[test]
    fn string_lookup() {
        let config = Config::from_toml_str(RAW);
        assert_eq!(
            config.string("balcony", "airCommand"),
            Some("0110".to_owned())
        );
    }

    #[test]
    fn absent_section_or_key_is_none() {
        let config = Config::from_toml_str(RAW);
        assert_eq!(config.integer("target", "gpioPin"), None);
        assert_eq!(config.integer("scan", "dataLength"), None);
    }

    #[test]
    fn type_mismatch_is_none() {
        let config = Config::from_toml_str(RAW);
        assert_eq!(config.integer("balcony", "airCommand"), None);
        assert_eq!(config.string("scan", "gpioPin"), None);
    }

    #[test]
    fn section_presence() {
        let config = Config::from_toml_str(RAW);
        assert!(config.has_section("scan"));
        assert!(config.has_section("balcony"));
        assert!(!config.has_section("garage"));
    }

    #[test]
    #[should_panic(expected = "queried before load")]
    fn lookup_before_load_is_a_defect() {
        let config = Config::new();
        config.integer("scan", "gpioPin");
    }
}
