//! Error types emitted by the waymark CLI.
//!
//! Keep this error type reasonably small, as the CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use waymark_core::{SqliteVisitStoreError, VisitStoreError};
use waymark_data::search::ProviderBuildError;
use waymark_data::CoordinatorError;

/// Errors emitted by the waymark CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// Neither a coordinate pair nor an address was given.
    #[error("missing search centre (set --lat and --lon together, or --address)")]
    MissingCenter,
    /// Constructing the search provider failed.
    #[error("failed to build search provider: {0}")]
    BuildProvider(#[from] ProviderBuildError),
    /// Opening the visits database failed.
    #[error("failed to open visits database at {path}: {source}")]
    OpenVisitStore {
        path: Utf8PathBuf,
        #[source]
        source: SqliteVisitStoreError,
    },
    /// Building the Tokio runtime failed.
    #[error("failed to build async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The coordinator rejected or failed the request.
    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),
    /// The given address did not resolve to a coordinate.
    #[error("no coordinate found for address {address:?}")]
    AddressNotFound { address: String },
    /// Reading or writing the visits database failed.
    #[error(transparent)]
    VisitStore(#[from] VisitStoreError),
    /// Serialising the JSON report failed.
    #[error("failed to serialise report: {0}")]
    SerializeReport(#[source] serde_json::Error),
    /// Writing to standard output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
