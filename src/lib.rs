//! Common functionality for chargepark, a simulator of a solar-powered electric vehicle charging
//! park.
#![warn(missing_docs)]
use dirs::config_dir;
use std::path::PathBuf;

pub mod battery;
pub mod charging;
pub mod cli;
pub mod config;
pub mod demand;
pub mod finance;
pub mod input;
pub mod log;
pub mod output;
pub mod settings;
pub mod simulation;
pub mod solar;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the config dir for the program.
///
/// Falls back to the current directory if the platform has no config dir.
pub fn get_chargepark_config_dir() -> PathBuf {
    let Some(mut dir) = config_dir() else {
        return PathBuf::from(".");
    };

    dir.push("chargepark");
    dir
}
