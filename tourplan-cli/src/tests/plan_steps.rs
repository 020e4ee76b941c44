//! Behaviour-driven step definitions driving the plan CLI scenarios.

use super::helpers::{StubPlanBackend, Workspace};
use super::*;
use clap::Parser;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tourplan_core::{PlanError, ServiceError};

#[derive(Debug)]
struct PlanWorld {
    workspace: Workspace,
    include_workbook: RefCell<bool>,
    cli_args: RefCell<Vec<String>>,
    backend: RefCell<StubPlanBackend>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl PlanWorld {
    fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            include_workbook: RefCell::new(true),
            cli_args: RefCell::new(Vec::new()),
            backend: RefCell::new(StubPlanBackend::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["tourplan".to_owned(), "plan".to_owned()];
        if *self.include_workbook.borrow() {
            argv.push(self.workspace.root.join("plan.xlsx").as_str().to_owned());
        }
        argv.extend([
            format!("--{ARG_OUT_DIR}"),
            self.workspace.out_dir().as_str().to_owned(),
            format!("--{ARG_DATE}"),
            "2024-05-01".to_owned(),
        ]);
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }

    fn stdout(&self) -> String {
        String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8")
    }
}

#[fixture]
fn world() -> PlanWorld {
    PlanWorld::new()
}

#[given("a workbook with two jobs exists on disk")]
fn workbook_exists(#[from(world)] world: &PlanWorld) {
    world.workspace.workbook();
}

#[given("I omit the workbook path")]
fn omit_workbook_path(#[from(world)] world: &PlanWorld) {
    *world.include_workbook.borrow_mut() = false;
}

#[given("service keys are supplied")]
fn service_keys_supplied(#[from(world)] world: &PlanWorld) {
    world.cli_args.borrow_mut().extend([
        format!("--{ARG_ROUTING_API_KEY}"),
        "routing-key".to_owned(),
        format!("--{ARG_DIRECTIONS_API_KEY}"),
        "directions-key".to_owned(),
    ]);
}

#[given("I request a dry run")]
fn request_dry_run(#[from(world)] world: &PlanWorld) {
    world.cli_args.borrow_mut().push(format!("--{ARG_DRY_RUN}"));
}

#[given("the routing service rejects the request")]
fn routing_service_rejects(#[from(world)] world: &PlanWorld) {
    world.backend.borrow_mut().routing = Err(ServiceError::Status {
        url: "https://tourplanning.hereapi.com/v2/problems".to_owned(),
        status: 400,
        body: r#"{"title":"Bad Request","cause":"invalid time window"}"#.to_owned(),
    });
}

#[given("the directions service is unavailable")]
fn directions_unavailable(#[from(world)] world: &PlanWorld) {
    world.backend.borrow_mut().directions_error = Some(ServiceError::Network {
        url: "https://api.openrouteservice.org/v2/directions/driving-car/geojson".to_owned(),
        message: "connection refused".to_owned(),
    });
}

#[when("I run the plan command")]
fn run_plan_command(#[from(world)] world: &PlanWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Plan(args) => {
            let backend = world.backend.borrow();
            let mut buffer = world.stdout.borrow_mut();
            run_plan_with(args, &*backend, &mut *buffer)
        }
    });

    world.result.replace(Some(outcome));
}

#[then("the command succeeds")]
fn command_succeeds(#[from(world)] world: &PlanWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    if let Err(err) = result {
        panic!("expected success, found {err:?}");
    }
}

#[then("the request, response, GeoJSON and map files are written")]
fn all_artefacts_written(#[from(world)] world: &PlanWorld) {
    for name in [REQUEST_FILE, RESPONSE_FILE, GEOJSON_FILE, MAP_FILE] {
        assert!(world.workspace.has_output(name), "{name} missing");
    }
    let geojson: serde_json::Value =
        serde_json::from_str(&world.workspace.read_output(GEOJSON_FILE)).expect("GeoJSON parses");
    let features = geojson["features"].as_array().expect("features array");
    assert_eq!(features.len(), 5, "four markers and one route");
    assert!(
        world
            .workspace
            .read_output(RESPONSE_FILE)
            .contains("vehicle_1_1")
    );
}

#[then("the summary lists the statistics and unassigned jobs")]
fn summary_lists_statistics(#[from(world)] world: &PlanWorld) {
    let summary = world.stdout();
    assert!(summary.contains("request request1: 1 tours, 1 routes drawn"));
    assert!(summary.contains("Total Distance"));
    assert!(summary.contains("3.000"), "distance in km: {summary}");
    assert!(summary.contains("job_9: cannot be assigned due to capacity"));
}

#[then("only the request file is written")]
fn only_request_written(#[from(world)] world: &PlanWorld) {
    assert!(world.workspace.has_output(REQUEST_FILE));
    for name in [RESPONSE_FILE, GEOJSON_FILE, MAP_FILE] {
        assert!(!world.workspace.has_output(name), "{name} written on a dry run");
    }
}

#[then("no service client is built")]
fn no_service_client_built(#[from(world)] world: &PlanWorld) {
    assert_eq!(world.backend.borrow().services_built.get(), 0);
}

#[then("the command fails because the workbook path is missing")]
fn fails_missing_workbook(#[from(world)] world: &PlanWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_WORKBOOK),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command fails because the routing key is missing")]
fn fails_missing_routing_key(#[from(world)] world: &PlanWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, env } => {
            assert_eq!(*field, ARG_ROUTING_API_KEY);
            assert_eq!(*env, ENV_ROUTING_API_KEY);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command fails with the routing service payload")]
fn fails_with_routing_payload(#[from(world)] world: &PlanWorld) {
    let error = world.error();
    match &*error {
        CliError::Plan(PlanError::Service(ServiceError::Status { status, body, .. })) => {
            assert_eq!(*status, 400);
            assert!(body.contains("invalid time window"));
        }
        other => panic!("expected a routing status error, found {other:?}"),
    }
    assert!(error.to_string().contains("invalid time window"));
    assert!(world.workspace.has_output(REQUEST_FILE));
}

#[then("the summary reports the tour drawn without a route")]
fn summary_reports_unrouted_tour(#[from(world)] world: &PlanWorld) {
    let summary = world.stdout();
    assert!(summary.contains("0 routes drawn"), "summary: {summary}");
    assert!(summary.contains("tour 0: directions lookup failed"));
    assert!(world.workspace.has_output(MAP_FILE));
}

macro_rules! register_plan_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/plan_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: PlanWorld) {
            let _ = world;
        }
    };
}

register_plan_scenario!(plan_end_to_end, "planning a workbook end to end");
register_plan_scenario!(plan_dry_run, "writing only the request on a dry run");
register_plan_scenario!(plan_missing_workbook, "rejecting a missing workbook path");
register_plan_scenario!(
    plan_missing_routing_key,
    "rejecting a submission without a routing key"
);
register_plan_scenario!(plan_routing_rejection, "surfacing a routing service rejection");
register_plan_scenario!(
    plan_directions_failure,
    "drawing a tour without its route when directions fail"
);
