//! Nav command implementation for the waymark CLI.

use std::io::Write;

use clap::{Parser, ValueEnum};
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waymark_core::{Destination, TravelMode};

use crate::{ARG_NAV_LAT, ARG_NAV_LON, CliError, ENV_NAV_LAT, ENV_NAV_LON};

/// Travel mode flag accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ModeArg {
    /// Directions by car.
    #[default]
    Driving,
    /// Directions on foot.
    Walking,
    /// Directions by public transport.
    Transit,
}

impl From<ModeArg> for TravelMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Driving => Self::Driving,
            ModeArg::Walking => Self::Walking,
            ModeArg::Transit => Self::Transit,
        }
    }
}

/// CLI arguments for the `nav` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Print the hand-off URLs that open an external navigation \
                 application with directions to the given destination. One \
                 URL is printed per supported application.",
    about = "Print navigation hand-off URLs for a destination"
)]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct NavArgs {
    /// Latitude of the destination in decimal degrees.
    #[arg(long = ARG_NAV_LAT, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the destination in decimal degrees.
    #[arg(long = ARG_NAV_LON, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Label shown by the external application.
    #[arg(long, value_name = "label")]
    #[serde(default)]
    pub(crate) label: Option<String>,
    /// Travel mode requested from the external application.
    #[arg(long, value_enum, default_value_t = ModeArg::Driving)]
    #[serde(default)]
    pub(crate) mode: ModeArg,
}

impl NavArgs {
    fn into_config(self) -> Result<NavConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        NavConfig::try_from(merged)
    }
}

/// Resolved `nav` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NavConfig {
    pub(crate) destination: Destination,
    pub(crate) mode: TravelMode,
}

impl TryFrom<NavArgs> for NavConfig {
    type Error = CliError;

    fn try_from(args: NavArgs) -> Result<Self, Self::Error> {
        let lat = args.lat.ok_or(CliError::MissingArgument {
            field: ARG_NAV_LAT,
            env: ENV_NAV_LAT,
        })?;
        let lon = args.lon.ok_or(CliError::MissingArgument {
            field: ARG_NAV_LON,
            env: ENV_NAV_LON,
        })?;
        let label = args.label.unwrap_or_else(|| "Destination".to_owned());
        Ok(Self {
            destination: Destination::new(label, Coord { x: lon, y: lat }),
            mode: args.mode.into(),
        })
    }
}

pub(super) fn run_nav(args: NavArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_nav_with(args, &mut stdout)
}

pub(super) fn run_nav_with(args: NavArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_nav(&config, writer)
}

pub(crate) fn execute_nav(config: &NavConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let destination = &config.destination;
    writeln!(
        writer,
        "google-maps-app: {url}",
        url = destination.google_maps_app_url(config.mode)
    )
    .map_err(CliError::WriteOutput)?;
    writeln!(
        writer,
        "google-maps-web: {url}",
        url = destination.google_maps_web_url(config.mode)
    )
    .map_err(CliError::WriteOutput)?;
    writeln!(
        writer,
        "apple-maps: {url}",
        url = destination.apple_maps_url(config.mode)
    )
    .map_err(CliError::WriteOutput)
}

#[cfg(test)]
pub(crate) fn config_from_args_for_test(args: NavArgs) -> Result<NavConfig, CliError> {
    NavConfig::try_from(args)
}
