//! Search command implementation for the waymark CLI.

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waymark_core::{AnnotatedPlace, Geocoder, PlaceSearch, SqliteVisitStore, Viewport, VisitStore};
use waymark_data::search::{HttpPlaceSearch, HttpPlaceSearchConfig};
use waymark_data::{
    DEFAULT_QUERY, DEFAULT_RADIUS_METERS, SearchCoordinator, SearchCoordinatorConfig,
    SearchOutcome,
};

use crate::{
    ARG_SEARCH_BASE_URL, ARG_SEARCH_LAT, ARG_SEARCH_LON, ARG_SEARCH_QUERY,
    ARG_SEARCH_RADIUS_METERS, ARG_SEARCH_VISITS_DB, CliError, ENV_SEARCH_LAT, ENV_SEARCH_LON,
};

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Search for places around a centre given either as a \
                 latitude/longitude pair or as a free-form address. Options \
                 can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Search for nearby places"
)]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct SearchArgs {
    /// Latitude of the search centre in decimal degrees.
    #[arg(long = ARG_SEARCH_LAT, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the search centre in decimal degrees.
    #[arg(long = ARG_SEARCH_LON, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Free-form address to geocode into a search centre.
    #[arg(long, value_name = "address", conflicts_with_all = [ARG_SEARCH_LAT, ARG_SEARCH_LON])]
    #[serde(default)]
    pub(crate) address: Option<String>,
    /// Search radius around the centre in metres.
    #[arg(long = ARG_SEARCH_RADIUS_METERS, value_name = "meters")]
    #[serde(default)]
    pub(crate) radius_meters: Option<f64>,
    /// Search term sent to the place-search service.
    #[arg(long = ARG_SEARCH_QUERY, value_name = "term")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Path to the SQLite visits database seeding visited flags.
    #[arg(long = ARG_SEARCH_VISITS_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) visits_db: Option<Utf8PathBuf>,
    /// Base URL of the place-search service.
    #[arg(long = ARG_SEARCH_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Emit the report as JSON instead of text.
    #[arg(long)]
    #[serde(default)]
    pub(crate) json: bool,
}

impl SearchArgs {
    fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

/// Where the search centre comes from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CenterSource {
    /// An explicit coordinate pair.
    Coordinate(Coord<f64>),
    /// A free-form address resolved through the geocoder.
    Address(String),
}

/// Resolved `search` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchConfig {
    pub(crate) center: CenterSource,
    pub(crate) radius_meters: f64,
    pub(crate) query: String,
    pub(crate) visits_db: Option<Utf8PathBuf>,
    pub(crate) base_url: Option<String>,
    pub(crate) json: bool,
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let center = match (args.lat, args.lon, args.address) {
            (Some(lat), Some(lon), _) => CenterSource::Coordinate(Coord { x: lon, y: lat }),
            (Some(_), None, _) => {
                return Err(CliError::MissingArgument {
                    field: ARG_SEARCH_LON,
                    env: ENV_SEARCH_LON,
                });
            }
            (None, Some(_), _) => {
                return Err(CliError::MissingArgument {
                    field: ARG_SEARCH_LAT,
                    env: ENV_SEARCH_LAT,
                });
            }
            (None, None, Some(address)) => CenterSource::Address(address),
            (None, None, None) => return Err(CliError::MissingCenter),
        };
        Ok(Self {
            center,
            radius_meters: args.radius_meters.unwrap_or(DEFAULT_RADIUS_METERS),
            query: args.query.unwrap_or_else(|| DEFAULT_QUERY.to_owned()),
            visits_db: args.visits_db,
            base_url: args.base_url,
            json: args.json,
        })
    }
}

pub(super) fn run_search(args: SearchArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_search_with(args, &mut stdout)
}

pub(super) fn run_search_with(args: SearchArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = execute_search(&config)?;
    if config.json {
        write_json_report(writer, &report)
    } else {
        write_text_report(writer, &report)
    }
}

fn execute_search(config: &SearchConfig) -> Result<SearchReport, CliError> {
    let coordinator = build_coordinator(config)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    runtime.block_on(async {
        let center = resolve_center(&coordinator, &config.center).await?;
        let outcome = coordinator.search_near(center).await?;
        match outcome {
            SearchOutcome::Applied { places, viewport } => Ok(SearchReport { places, viewport }),
            // No concurrent searches exist in a one-shot CLI invocation.
            SearchOutcome::Superseded => Ok(SearchReport {
                places: Vec::new(),
                viewport: coordinator.viewport(),
            }),
        }
    })
}

fn build_coordinator(config: &SearchConfig) -> Result<SearchCoordinator, CliError> {
    let provider_config = config.base_url.as_ref().map_or_else(
        HttpPlaceSearchConfig::default,
        |base_url| HttpPlaceSearchConfig::new(base_url.clone()),
    );
    let provider = Arc::new(HttpPlaceSearch::with_config(provider_config)?);
    let geocoder: Arc<dyn Geocoder> = provider.clone();
    let search: Arc<dyn PlaceSearch> = provider;
    let coordinator_config = SearchCoordinatorConfig::default()
        .with_query(config.query.clone())
        .with_radius_meters(config.radius_meters);
    let mut coordinator = SearchCoordinator::new(search)
        .with_geocoder(geocoder)
        .with_config(coordinator_config);
    if let Some(path) = &config.visits_db {
        let store =
            SqliteVisitStore::open(path.as_std_path()).map_err(|source| {
                CliError::OpenVisitStore {
                    path: path.clone(),
                    source,
                }
            })?;
        let visits: Arc<dyn VisitStore> = Arc::new(store);
        coordinator = coordinator.with_visit_store(visits);
    }
    Ok(coordinator)
}

async fn resolve_center(
    coordinator: &SearchCoordinator,
    source: &CenterSource,
) -> Result<Coord<f64>, CliError> {
    match source {
        CenterSource::Coordinate(center) => Ok(*center),
        CenterSource::Address(address) => coordinator
            .locate(address)
            .await?
            .ok_or_else(|| CliError::AddressNotFound {
                address: address.clone(),
            }),
    }
}

/// Search results together with the viewport framing them.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct SearchReport {
    places: Vec<AnnotatedPlace>,
    viewport: Viewport,
}

fn write_json_report(writer: &mut dyn Write, report: &SearchReport) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerializeReport)?;
    writeln!(writer, "{payload}").map_err(CliError::WriteOutput)
}

fn write_text_report(writer: &mut dyn Write, report: &SearchReport) -> Result<(), CliError> {
    for entry in &report.places {
        let marker = if entry.visited { "[x]" } else { "[ ]" };
        let place = &entry.place;
        write!(
            writer,
            "{marker} {name} ({lat}, {lon})",
            name = place.name,
            lat = place.location.y,
            lon = place.location.x,
        )
        .map_err(CliError::WriteOutput)?;
        if !place.address.is_empty() {
            write!(writer, " - {address}", address = place.address).map_err(CliError::WriteOutput)?;
        }
        writeln!(writer, " [{id}]", id = place.id).map_err(CliError::WriteOutput)?;
    }
    let viewport = &report.viewport;
    writeln!(
        writer,
        "{count} place(s); viewport centre ({lat}, {lon}) span ({dlat}, {dlon})",
        count = report.places.len(),
        lat = viewport.center.y,
        lon = viewport.center.x,
        dlat = viewport.span.lat_delta,
        dlon = viewport.span.lon_delta,
    )
    .map_err(CliError::WriteOutput)
}

#[cfg(test)]
pub(crate) fn config_from_args_for_test(args: SearchArgs) -> Result<SearchConfig, CliError> {
    SearchConfig::try_from(args)
}
