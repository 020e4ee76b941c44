//! Plan command implementation for the tourplan CLI.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use clap::{ArgAction, Parser};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tourplan_core::{
    DirectionsProvider, PlanError, PlanParameters, PreparedPlan, Profile, RenderedSolution,
    RoutingService, serialize_pretty, solve,
};
use tourplan_data::routing::{
    DEFAULT_DIRECTIONS_BASE_URL, DEFAULT_DIRECTIONS_PROFILE, DEFAULT_RETRIES,
    DEFAULT_ROUTING_BASE_URL, DEFAULT_TIMEOUT_SECS,
};
use tourplan_data::{
    HereTourPlanningClient, HttpClientConfig, OrsDirectionsClient, TileLayer, WorkbookData,
    feature_collection, leaflet_page, read_workbook,
};

use crate::{
    ARG_AMOUNT, ARG_CAPACITY, ARG_DATE, ARG_DIRECTIONS_API_KEY, ARG_DIRECTIONS_BASE_URL,
    ARG_DIRECTIONS_PROFILE, ARG_DISTANCE_COST, ARG_DRY_RUN, ARG_FIXED_COST, ARG_OUT_DIR,
    ARG_PROFILE, ARG_REQUEST_ID, ARG_RETRIES, ARG_ROUTING_API_KEY, ARG_ROUTING_BASE_URL,
    ARG_SHIFT_END, ARG_SHIFT_START, ARG_SHOW_JSON, ARG_TILES_API_KEY, ARG_TIME_COST,
    ARG_TIMEOUT_SECS, ARG_WORKBOOK, CliError, ENV_DIRECTIONS_API_KEY, ENV_ROUTING_API_KEY,
    ENV_WORKBOOK,
};

/// Directory the artefacts land in when `--out-dir` is not given.
pub(crate) const DEFAULT_OUT_DIR: &str = "tourplan-out";
pub(crate) const REQUEST_FILE: &str = "request.json";
pub(crate) const RESPONSE_FILE: &str = "response.json";
pub(crate) const GEOJSON_FILE: &str = "tours.geojson";
pub(crate) const MAP_FILE: &str = "map.html";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "plan",
    long_about = "Read jobs from the `plan` sheet and the depot from the \
                 `fleet` sheet of a workbook, build a tour-planning request, \
                 submit it to the routing service and render the returned \
                 tours as GeoJSON and an HTML map. Options can come from CLI \
                 flags, configuration files, or environment variables.",
    about = "Plan delivery and pickup tours from a workbook"
)]
#[ortho_config(prefix = "TOURPLAN")]
pub(crate) struct PlanArgs {
    /// Path to the workbook with `plan` and `fleet` sheets.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) workbook: Option<Utf8PathBuf>,
    /// Day to plan for; defaults to today.
    #[arg(long = ARG_DATE, value_name = "YYYY-MM-DD")]
    #[serde(default)]
    pub(crate) date: Option<String>,
    /// Fixed cost per vehicle used.
    #[arg(long = ARG_FIXED_COST, value_name = "cost")]
    #[serde(default)]
    pub(crate) fixed_cost: Option<f64>,
    /// Cost per kilometre.
    #[arg(long = ARG_DISTANCE_COST, value_name = "cost")]
    #[serde(default)]
    pub(crate) distance_cost: Option<f64>,
    /// Cost per hour.
    #[arg(long = ARG_TIME_COST, value_name = "cost")]
    #[serde(default)]
    pub(crate) time_cost: Option<f64>,
    /// Capacity per vehicle in demand units.
    #[arg(long = ARG_CAPACITY, value_name = "units")]
    #[serde(default)]
    pub(crate) capacity: Option<f64>,
    /// Number of vehicles available.
    #[arg(long = ARG_AMOUNT, value_name = "count")]
    #[serde(default)]
    pub(crate) amount: Option<f64>,
    /// Vehicle profile (`car` or `truck`).
    #[arg(long = ARG_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub(crate) profile: Option<Profile>,
    /// Hour the shift starts.
    #[arg(long = ARG_SHIFT_START, value_name = "hour")]
    #[serde(default)]
    pub(crate) shift_start: Option<u8>,
    /// Hour the shift ends.
    #[arg(long = ARG_SHIFT_END, value_name = "hour")]
    #[serde(default)]
    pub(crate) shift_end: Option<u8>,
    /// Directory receiving the request, response and map files.
    #[arg(long = ARG_OUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) out_dir: Option<Utf8PathBuf>,
    /// Override the request id sent to the routing service.
    #[arg(long = ARG_REQUEST_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) request_id: Option<String>,
    /// Base URL of the tour-planning service.
    #[arg(long = ARG_ROUTING_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) routing_base_url: Option<String>,
    /// API key for the tour-planning service.
    #[arg(long = ARG_ROUTING_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) routing_api_key: Option<String>,
    /// Base URL of the directions service.
    #[arg(long = ARG_DIRECTIONS_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) directions_base_url: Option<String>,
    /// API key for the directions service.
    #[arg(long = ARG_DIRECTIONS_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) directions_api_key: Option<String>,
    /// Directions profile, e.g. `driving-car` or `driving-hgv`.
    #[arg(long = ARG_DIRECTIONS_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub(crate) directions_profile: Option<String>,
    /// API key for HERE map tiles. OpenStreetMap tiles are used without one.
    #[arg(long = ARG_TILES_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) tiles_api_key: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Retries after a timeout or connection failure.
    #[arg(long = ARG_RETRIES, value_name = "count")]
    #[serde(default)]
    pub(crate) retries: Option<u32>,
    /// Build and write the request without contacting any service.
    #[arg(long = ARG_DRY_RUN, action = ArgAction::SetTrue)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) dry_run: bool,
    /// Print the request and response JSON.
    #[arg(long = ARG_SHOW_JSON, action = ArgAction::SetTrue)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) show_json: bool,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// API keys for the external services.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct ServiceKeys {
    pub(crate) routing: String,
    pub(crate) directions: String,
}

impl fmt::Debug for ServiceKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceKeys")
            .field("routing", &"<redacted>")
            .field("directions", &"<redacted>")
            .finish()
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanConfig {
    /// Workbook to read.
    pub(crate) workbook: Utf8PathBuf,
    /// Validated request parameters, date included.
    pub(crate) params: PlanParameters,
    /// Output directory.
    pub(crate) out_dir: Utf8PathBuf,
    /// Request id override.
    pub(crate) request_id: Option<String>,
    pub(crate) routing_base_url: String,
    pub(crate) directions_base_url: String,
    pub(crate) directions_profile: String,
    /// Service keys; absent for a dry run.
    pub(crate) keys: Option<ServiceKeys>,
    pub(crate) tiles_api_key: Option<String>,
    pub(crate) timeout: Duration,
    pub(crate) retries: u32,
    pub(crate) show_json: bool,
}

impl PlanConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.workbook, ARG_WORKBOOK)
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match tourplan_fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn http_config(&self, base_url: &str) -> HttpClientConfig {
        HttpClientConfig::new(base_url)
            .with_timeout(self.timeout)
            .with_retries(self.retries)
    }

    fn tiles(&self) -> TileLayer {
        TileLayer::for_key(self.tiles_api_key.as_deref())
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let workbook = args.workbook.ok_or(CliError::MissingArgument {
            field: ARG_WORKBOOK,
            env: ENV_WORKBOOK,
        })?;
        let date = match args.date {
            Some(value) => parse_date(&value)?,
            None => chrono::Local::now().date_naive(),
        };

        let mut params = PlanParameters::with_defaults(date);
        params.costs.fixed = args.fixed_cost.unwrap_or(params.costs.fixed);
        params.costs.distance = args.distance_cost.unwrap_or(params.costs.distance);
        params.costs.time = args.time_cost.unwrap_or(params.costs.time);
        params.capacity = args.capacity.unwrap_or(params.capacity);
        params.amount = args.amount.unwrap_or(params.amount);
        params.profile = args.profile.unwrap_or(params.profile);
        params.shift.start = args.shift_start.unwrap_or(params.shift.start);
        params.shift.end = args.shift_end.unwrap_or(params.shift.end);
        params.validate().map_err(CliError::InvalidParameters)?;

        let keys = if args.dry_run {
            None
        } else {
            Some(ServiceKeys {
                routing: args.routing_api_key.ok_or(CliError::MissingArgument {
                    field: ARG_ROUTING_API_KEY,
                    env: ENV_ROUTING_API_KEY,
                })?,
                directions: args.directions_api_key.ok_or(CliError::MissingArgument {
                    field: ARG_DIRECTIONS_API_KEY,
                    env: ENV_DIRECTIONS_API_KEY,
                })?,
            })
        };

        Ok(Self {
            workbook,
            params,
            out_dir: args
                .out_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUT_DIR)),
            request_id: args.request_id,
            routing_base_url: args
                .routing_base_url
                .unwrap_or_else(|| DEFAULT_ROUTING_BASE_URL.to_owned()),
            directions_base_url: args
                .directions_base_url
                .unwrap_or_else(|| DEFAULT_DIRECTIONS_BASE_URL.to_owned()),
            directions_profile: args
                .directions_profile
                .unwrap_or_else(|| DEFAULT_DIRECTIONS_PROFILE.to_owned()),
            keys,
            tiles_api_key: args.tiles_api_key,
            timeout: Duration::from_secs(args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            retries: args.retries.unwrap_or(DEFAULT_RETRIES),
            show_json: args.show_json,
        })
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|source| CliError::InvalidDate {
        value: value.to_owned(),
        source,
    })
}

/// Supplies the workbook rows and service clients for a plan run.
pub(super) trait PlanBackend {
    fn load_workbook(&self, path: &Utf8Path) -> Result<WorkbookData, CliError>;

    fn routing_service(
        &self,
        config: &PlanConfig,
        keys: &ServiceKeys,
    ) -> Result<Box<dyn RoutingService>, CliError>;

    fn directions_provider(
        &self,
        config: &PlanConfig,
        keys: &ServiceKeys,
    ) -> Result<Box<dyn DirectionsProvider>, CliError>;
}

pub(super) struct DefaultPlanBackend;

impl PlanBackend for DefaultPlanBackend {
    fn load_workbook(&self, path: &Utf8Path) -> Result<WorkbookData, CliError> {
        Ok(read_workbook(path.as_std_path())?)
    }

    fn routing_service(
        &self,
        config: &PlanConfig,
        keys: &ServiceKeys,
    ) -> Result<Box<dyn RoutingService>, CliError> {
        let client = HereTourPlanningClient::with_config(
            config.http_config(&config.routing_base_url),
            &keys.routing,
        )
        .map_err(|source| CliError::BuildClient {
            service: "routing",
            base_url: config.routing_base_url.clone(),
            source,
        })?;
        Ok(Box::new(client))
    }

    fn directions_provider(
        &self,
        config: &PlanConfig,
        keys: &ServiceKeys,
    ) -> Result<Box<dyn DirectionsProvider>, CliError> {
        let client = OrsDirectionsClient::with_config(
            config.http_config(&config.directions_base_url),
            &config.directions_profile,
            keys.directions.clone(),
        )
        .map_err(|source| CliError::BuildClient {
            service: "directions",
            base_url: config.directions_base_url.clone(),
            source,
        })?;
        Ok(Box::new(client))
    }
}

pub(super) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_plan_with(args, &DefaultPlanBackend, &mut stdout)
}

pub(super) fn run_plan_with(
    args: PlanArgs,
    backend: &dyn PlanBackend,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_plan_config(args)?;
    let data = backend.load_workbook(&config.workbook)?;
    let prepared = prepare_request(&config, &data)?;
    write_artefact(&config.out_dir, REQUEST_FILE, &prepared.request_json)?;
    if config.show_json {
        let pretty = serialize_pretty(&prepared.request).map_err(PlanError::from)?;
        write_section(writer, "request", &pretty)?;
    }

    let Some(keys) = config.keys.as_ref() else {
        tracing::info!(
            request = %prepared.request.id,
            out_dir = %config.out_dir,
            "dry run; request written without submission"
        );
        return writeln!(
            writer,
            "wrote {} ({} jobs); dry run, nothing submitted",
            config.out_dir.join(REQUEST_FILE),
            prepared.request.plan.jobs.len()
        )
        .map_err(CliError::WriteSummary);
    };

    let routing = backend.routing_service(&config, keys)?;
    let directions = backend.directions_provider(&config, keys)?;
    let solution = solve(prepared, routing.as_ref(), directions.as_ref())?;
    write_solution_artefacts(&config, &solution)?;
    if config.show_json {
        write_section(writer, "response", &pretty_json(&solution.response_json))?;
    }
    write_summary(writer, &config, &solution)
}

fn resolve_plan_config(args: PlanArgs) -> Result<PlanConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn prepare_request(config: &PlanConfig, data: &WorkbookData) -> Result<PreparedPlan, CliError> {
    let prepared = tourplan_core::prepare(&data.jobs, &data.fleet, &config.params)?;
    let prepared = match &config.request_id {
        Some(id) => prepared.with_request_id(id.clone())?,
        None => prepared,
    };
    Ok(prepared)
}

fn write_solution_artefacts(
    config: &PlanConfig,
    solution: &RenderedSolution,
) -> Result<(), CliError> {
    write_artefact(&config.out_dir, RESPONSE_FILE, &solution.response_json)?;
    let geojson = serde_json::to_string_pretty(&feature_collection(solution)).map_err(
        |source| CliError::EncodeOutput {
            artefact: GEOJSON_FILE,
            source,
        },
    )?;
    write_artefact(&config.out_dir, GEOJSON_FILE, &geojson)?;
    write_artefact(
        &config.out_dir,
        MAP_FILE,
        &leaflet_page(solution, &config.tiles()),
    )
}

fn write_artefact(dir: &Utf8Path, name: &str, contents: &str) -> Result<(), CliError> {
    let path = dir.join(name);
    tourplan_fs::write_utf8_file(&path, contents)
        .map_err(|source| CliError::WriteArtefact { path: path.clone(), source })?;
    tracing::debug!(%path, bytes = contents.len(), "wrote artefact");
    Ok(())
}

/// Indent a raw response body for display, leaving non-JSON text as is.
fn pretty_json(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| body.to_owned())
}

fn write_section(writer: &mut dyn Write, title: &str, body: &str) -> Result<(), CliError> {
    writeln!(writer, "--- {title} ---\n{body}").map_err(CliError::WriteSummary)
}

fn write_summary(
    writer: &mut dyn Write,
    config: &PlanConfig,
    solution: &RenderedSolution,
) -> Result<(), CliError> {
    let mut text = format!(
        "request {}: {} tours, {} routes drawn\n{}",
        solution.request.id,
        solution.response.tours.len(),
        solution.tours.polyline_count(),
        solution.stats
    );
    if !solution.response.unassigned.is_empty() {
        text.push_str("unassigned jobs:\n");
        for job in &solution.response.unassigned {
            let reasons: Vec<&str> = job
                .reasons
                .iter()
                .map(|reason| reason.description.as_str())
                .collect();
            text.push_str(&format!("  {}: {}\n", job.job_id, reasons.join("; ")));
        }
    }
    for failure in &solution.tours.failures {
        tracing::warn!(tour = failure.tour, error = %failure.error, "tour drawn without a route");
        text.push_str(&format!("{failure}\n"));
    }
    text.push_str(&format!("artefacts written to {}\n", config.out_dir));
    writer
        .write_all(text.as_bytes())
        .map_err(CliError::WriteSummary)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
