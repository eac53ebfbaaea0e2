use std::path::PathBuf;
use std::process;

use log::error;
use structopt::StructOpt;

mod gpio;
mod lock;
mod replay;
mod scan;
mod target;

use aircontrol_core::error::{Error, Result};
use aircontrol_core::gpio::GpioPort;
use aircontrol_core::pins;
use aircontrol_core::Config;

use crate::gpio::RppalPort;
use crate::lock::InstanceLock;

#[derive(Debug, StructOpt)]
#[structopt(name = "aircontrol", about = "GPIO based OOK radio control")]
struct Opt {
    /// Configuration file
    #[structopt(short = "c", long = "config", parse(from_os_str))]
    config: Option<PathBuf>,
    /// Override the GPIO pin from the configuration
    #[structopt(short = "g", long = "gpio")]
    gpio_pin: Option<u8>,
    /// Prevent multiple program instances
    #[structopt(short = "l", long = "lock")]
    lock: bool,
    #[structopt(short, long)]
    debug: bool,
    #[structopt(subcommand)]
    cmd: CliCommand,
}

#[derive(StructOpt, Debug)]
enum CliCommand {
    /// Scan air activity for the given period
    Scan {
        /// Scan duration in milliseconds
        duration_ms: i32,
        /// Dump the scan into a file instead of printing it
        #[structopt(short = "d", long = "dump", parse(from_os_str))]
        dump: Option<PathBuf>,
    },
    /// Execute a target configuration
    Target { name: String },
    /// Replay a recorded air scan dump
    Replay {
        #[structopt(parse(from_os_str))]
        path: PathBuf,
    },
}

fn main() {
    let opt = Opt::from_args();

    let loglevel = if opt.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new().filter_level(loglevel).init();

    if let Err(err) = run(opt) {
        error!("{}", err);
        process::exit(1);
    }
}

fn run(opt: Opt) -> Result<()> {
    // Held for the whole invocation; released on every exit path.
    let _lock = if opt.lock {
        Some(InstanceLock::acquire()?)
    } else {
        None
    };

    let mut config = Config::new();
    if let Some(path) = opt.config {
        config.set_location(path);
    }
    config.load()?;

    let mut port = RppalPort::new()?;

    if let Some(pin) = opt.gpio_pin {
        if !pins::is_valid_gpio_pin(port.board_revision(), pin) {
            return Err(Error::Parameter {
                task: "command line".to_owned(),
                field: "gpioPin",
                problem: format!("{} is invalid", pin),
            });
        }
    }

    match opt.cmd {
        CliCommand::Scan { duration_ms, dump } => {
            if duration_ms <= 0 {
                return Err(Error::Parameter {
                    task: "command line".to_owned(),
                    field: "duration",
                    problem: "must be greater than 0ms".to_owned(),
                });
            }
            scan::command_scan(&mut port, &config, duration_ms, dump.as_deref(), opt.gpio_pin)
        }
        CliCommand::Target { name } => {
            target::command_target(&mut port, &config, &name, opt.gpio_pin)
        }
        CliCommand::Replay { path } => {
            replay::command_replay(&mut port, &config, &path, opt.gpio_pin)
        }
    }
}
