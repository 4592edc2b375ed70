//! Command-line interface for waymark place searches and visit tracking.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod nav;
mod search;
mod visit;

pub use error::CliError;

const ARG_SEARCH_LAT: &str = "lat";
const ARG_SEARCH_LON: &str = "lon";
const ARG_SEARCH_RADIUS_METERS: &str = "radius-meters";
const ARG_SEARCH_QUERY: &str = "query";
const ARG_SEARCH_VISITS_DB: &str = "visits-db";
const ARG_SEARCH_BASE_URL: &str = "base-url";
const ARG_VISIT_PLACE_ID: &str = "place-id";
const ARG_VISIT_VISITS_DB: &str = "visits-db";
const ARG_NAV_LAT: &str = "lat";
const ARG_NAV_LON: &str = "lon";
const ENV_SEARCH_LAT: &str = "WAYMARK_CMDS_SEARCH_LAT";
const ENV_SEARCH_LON: &str = "WAYMARK_CMDS_SEARCH_LON";
const ENV_VISIT_PLACE_ID: &str = "WAYMARK_CMDS_VISIT_PLACE_ID";
const ENV_VISIT_VISITS_DB: &str = "WAYMARK_CMDS_VISIT_VISITS_DB";
const ENV_NAV_LAT: &str = "WAYMARK_CMDS_NAV_LAT";
const ENV_NAV_LON: &str = "WAYMARK_CMDS_NAV_LON";

/// Run the waymark CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Search(args) => search::run_search(args),
        Command::Visit(args) => visit::run_visit(args),
        Command::Nav(args) => nav::run_nav(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "waymark",
    about = "Search for nearby places and keep track of the ones you have visited",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search for places around a centre and report them with visited flags.
    Search(search::SearchArgs),
    /// Toggle or set the durable visited flag for a place.
    Visit(visit::VisitArgs),
    /// Print navigation hand-off URLs for a destination.
    Nav(nav::NavArgs),
}

#[cfg(test)]
mod tests;
