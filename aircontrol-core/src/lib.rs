//! Protocol and timing engine for the aircontrol utility.
//!
//! The engine covers everything between the configuration file and the GPIO
//! pin: parameter loading and validation ([`params`]), the four air code
//! pulse encoders and the transmit loop ([`air`]), fixed-cadence sampling
//! ([`sampler`]), the binary dump codec ([`dump`]) and raw replay
//! ([`player`]). Hardware access goes through the [`gpio::GpioPort`] trait
//! so the engine can be exercised without a board.

pub mod air;
pub mod config;
pub mod dump;
pub mod error;
pub mod gpio;
pub mod params;
pub mod pins;
pub mod player;
pub mod sampler;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
