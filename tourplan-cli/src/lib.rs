//! Command-line interface for planning delivery tours from a workbook.
//!
//! The `plan` command reads the `plan` and `fleet` sheets, submits the
//! resulting request to the tour-planning service and writes the request,
//! the response and a map of the returned tours to an output directory.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod plan;

pub use error::CliError;
use plan::{PlanArgs, run_plan};

const ARG_WORKBOOK: &str = "workbook";
const ARG_DATE: &str = "date";
const ARG_FIXED_COST: &str = "fixed-cost";
const ARG_DISTANCE_COST: &str = "distance-cost";
const ARG_TIME_COST: &str = "time-cost";
const ARG_CAPACITY: &str = "capacity";
const ARG_AMOUNT: &str = "amount";
const ARG_PROFILE: &str = "profile";
const ARG_SHIFT_START: &str = "shift-start";
const ARG_SHIFT_END: &str = "shift-end";
const ARG_OUT_DIR: &str = "out-dir";
const ARG_REQUEST_ID: &str = "request-id";
const ARG_ROUTING_BASE_URL: &str = "routing-base-url";
const ARG_ROUTING_API_KEY: &str = "routing-api-key";
const ARG_DIRECTIONS_BASE_URL: &str = "directions-base-url";
const ARG_DIRECTIONS_API_KEY: &str = "directions-api-key";
const ARG_DIRECTIONS_PROFILE: &str = "directions-profile";
const ARG_TILES_API_KEY: &str = "tiles-api-key";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_RETRIES: &str = "retries";
const ARG_DRY_RUN: &str = "dry-run";
const ARG_SHOW_JSON: &str = "show-json";
const ENV_WORKBOOK: &str = "TOURPLAN_CMDS_PLAN_WORKBOOK";
const ENV_ROUTING_API_KEY: &str = "TOURPLAN_CMDS_PLAN_ROUTING_API_KEY";
const ENV_DIRECTIONS_API_KEY: &str = "TOURPLAN_CMDS_PLAN_DIRECTIONS_API_KEY";

/// Run the tourplan CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when argument parsing, configuration, the workbook,
/// the services or writing the outputs fail.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => run_plan(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "tourplan",
    about = "Build tour-planning requests from workbooks and map the answers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read a workbook, submit the plan and render the returned tours.
    Plan(PlanArgs),
}

#[cfg(test)]
mod tests;
