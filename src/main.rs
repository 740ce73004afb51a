#![warn(missing_docs)]
//!
//! # Hikpause
//!
//! Hikpause is a small program that pauses and restores the detection alarms
//! (motion, intrusion, line-crossing and PIR) of Hikvision IP cameras.
//!
//! Pausing fetches each camera's detection configuration over its ISAPI
//! endpoint, stores it on disk, and writes back a disabled copy. Unpausing
//! writes the stored original configuration back to the camera.
//!
use env_logger::Env;
use log::*;
use structopt::StructOpt;
use validator::Validate;

mod client;
mod cmdline;
mod config;
mod detection;
mod errors;
mod pause;
mod reachable;
mod store;
mod xmlcfg;

use client::IsapiClient;
use cmdline::Opt;
use config::Config;
use errors::Error;
use pause::PauseController;
use reachable::PingProbe;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Hikpause {}", env!("CARGO_PKG_VERSION"));

    let opt = Opt::from_args();
    let (direction, selection) = opt.directive()?;

    let config: Config = toml::from_str(
        &std::fs::read_to_string(&opt.config)
            .map_err(|e| Error::ConfigIo(opt.config.clone(), e))?,
    )?;
    config.validate()?;

    let controller = PauseController::new(&config, IsapiClient::new()?, PingProbe);
    controller.run(direction, &selection);

    Ok(())
}
