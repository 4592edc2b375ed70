//! Visit command implementation for the waymark CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waymark_core::{PlaceId, SqliteVisitStore, VisitStore};

use crate::{
    ARG_VISIT_PLACE_ID, ARG_VISIT_VISITS_DB, CliError, ENV_VISIT_PLACE_ID, ENV_VISIT_VISITS_DB,
};

/// CLI arguments for the `visit` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Flip the durable visited flag for a place identified by \
                 its stable identity, or set it explicitly with --set. The \
                 flag lives in the SQLite visits database and survives \
                 across searches.",
    about = "Toggle or set the visited flag for a place"
)]
#[ortho_config(prefix = "WAYMARK")]
pub(crate) struct VisitArgs {
    /// Stable identity of the place (e.g. `node/123` or `pin:37.7,-122.4`).
    #[arg(value_name = "place-id")]
    #[serde(default)]
    pub(crate) place_id: Option<String>,
    /// Path to the SQLite visits database.
    #[arg(long = ARG_VISIT_VISITS_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) visits_db: Option<Utf8PathBuf>,
    /// Set the flag to this value instead of flipping it.
    #[arg(long, value_name = "bool")]
    #[serde(default)]
    pub(crate) set: Option<bool>,
}

impl VisitArgs {
    fn into_config(self) -> Result<VisitConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        VisitConfig::try_from(merged)
    }
}

/// Resolved `visit` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct VisitConfig {
    pub(crate) place_id: PlaceId,
    pub(crate) visits_db: Utf8PathBuf,
    pub(crate) set: Option<bool>,
}

impl TryFrom<VisitArgs> for VisitConfig {
    type Error = CliError;

    fn try_from(args: VisitArgs) -> Result<Self, Self::Error> {
        let place_id = args.place_id.ok_or(CliError::MissingArgument {
            field: ARG_VISIT_PLACE_ID,
            env: ENV_VISIT_PLACE_ID,
        })?;
        let visits_db = args.visits_db.ok_or(CliError::MissingArgument {
            field: ARG_VISIT_VISITS_DB,
            env: ENV_VISIT_VISITS_DB,
        })?;
        Ok(Self {
            place_id: PlaceId::new(place_id),
            visits_db,
            set: args.set,
        })
    }
}

pub(super) fn run_visit(args: VisitArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_visit_with(args, &mut stdout)
}

pub(super) fn run_visit_with(args: VisitArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_visit(&config, writer)
}

pub(crate) fn execute_visit(config: &VisitConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let store = SqliteVisitStore::open(config.visits_db.as_std_path()).map_err(|source| {
        CliError::OpenVisitStore {
            path: config.visits_db.clone(),
            source,
        }
    })?;
    let current = store.get(&config.place_id)?.unwrap_or(false);
    let next = config.set.unwrap_or(!current);
    store.set(&config.place_id, next)?;
    writeln!(writer, "{id}: visited={next}", id = config.place_id).map_err(CliError::WriteOutput)
}

#[cfg(test)]
pub(crate) fn config_from_args_for_test(args: VisitArgs) -> Result<VisitConfig, CliError> {
    VisitConfig::try_from(args)
}
