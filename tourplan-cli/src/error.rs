//! Error types emitted by the tourplan CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use tourplan_core::{BuildError, PlanError};
use tourplan_data::{ProviderBuildError, WorkbookError};

/// Errors emitted by the tourplan CLI.
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
        /// Flag name without dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// The plan date is not a `YYYY-MM-DD` calendar date.
    #[error("invalid --date {value:?}: {source}")]
    InvalidDate {
        /// Value as supplied.
        value: String,
        /// Parser failure.
        #[source]
        source: chrono::ParseError,
    },
    /// The merged parameters fall outside the accepted ranges.
    #[error("invalid plan parameters: {0}")]
    InvalidParameters(#[source] BuildError),
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the path.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the path.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Reading the workbook failed.
    #[error(transparent)]
    Workbook(#[from] WorkbookError),
    /// Constructing an HTTP client failed.
    #[error("failed to build {service} client for {base_url:?}: {source}")]
    BuildClient {
        /// Which service the client talks to.
        service: &'static str,
        /// Configured base URL.
        base_url: String,
        /// Underlying failure.
        #[source]
        source: ProviderBuildError,
    },
    /// Building, submitting or rendering the plan failed.
    #[error(transparent)]
    Plan(#[from] PlanError),
    /// Encoding an output document failed.
    #[error("failed to encode {artefact}: {source}")]
    EncodeOutput {
        /// Output file name.
        artefact: &'static str,
        /// Encoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// Writing an output file failed.
    #[error("failed to write {path:?}: {source}")]
    WriteArtefact {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Writing the command summary failed.
    #[error("failed to write plan summary: {0}")]
    WriteSummary(#[source] std::io::Error),
}
