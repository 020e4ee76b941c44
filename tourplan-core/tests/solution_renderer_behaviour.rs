#![expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]

//! Behavioural tests for solution rendering.
//!
//! The directions provider is a local stub so a failing lookup can be
//! scripted per tour.

use std::cell::RefCell;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tourplan_core::{
    DirectionsProvider, MapLayer, RenderedTours, RoutingResponse, ServiceError, SolutionStats,
    render_tours, summarize,
};

const SOLUTION: &str = r#"{
    "statistic": {
        "cost": 31.5,
        "distance": 5000,
        "times": {"driving": 7200, "serving": 1200, "waiting": 0, "break": 0}
    },
    "tours": [
        {"vehicleId": "vehicle_1_1", "stops": [
            {"location": {"lat": 52.1, "lng": 5.1}},
            {"location": {"lat": 52.0, "lng": 5.0}},
            {"location": {"lat": 52.1, "lng": 5.1}}
        ]},
        {"vehicleId": "vehicle_1_2", "stops": [
            {"location": {"lat": 52.1, "lng": 5.1}},
            {"location": {"lat": 52.2, "lng": 5.2}}
        ]}
    ]
}"#;

/// Directions stub that echoes waypoints unless told to fail a call.
#[derive(Default)]
struct ScriptedDirections {
    fail_first: bool,
    calls: RefCell<usize>,
}

impl DirectionsProvider for ScriptedDirections {
    fn directions(&self, waypoints: &[Coord<f64>]) -> Result<Vec<Coord<f64>>, ServiceError> {
        let call = *self.calls.borrow();
        *self.calls.borrow_mut() = call + 1;
        if self.fail_first && call == 0 {
            return Err(ServiceError::Status {
                url: "https://directions.test/v2/directions/driving-car/geojson".to_owned(),
                status: 429,
                body: "rate limited".to_owned(),
            });
        }
        Ok(waypoints.to_vec())
    }
}

#[fixture]
fn response() -> RefCell<Option<RoutingResponse>> {
    RefCell::new(None)
}

#[fixture]
fn directions() -> RefCell<ScriptedDirections> {
    RefCell::new(ScriptedDirections::default())
}

#[fixture]
fn rendered() -> RefCell<Option<RenderedTours>> {
    RefCell::new(None)
}

#[fixture]
fn stats() -> RefCell<Option<SolutionStats>> {
    RefCell::new(None)
}

fn rendered_tours(rendered: &RefCell<Option<RenderedTours>>) -> RenderedTours {
    rendered.borrow().clone().expect("solution must be rendered")
}

fn polyline_tours(tours: &RenderedTours) -> Vec<usize> {
    tours
        .layers
        .iter()
        .filter_map(|layer| match layer {
            MapLayer::Polyline { tour, .. } => Some(*tour),
            MapLayer::Marker { .. } => None,
        })
        .collect()
}

// --- Given steps ---

#[given("a solution with two tours")]
fn given_solution(#[from(response)] response: &RefCell<Option<RoutingResponse>>) {
    *response.borrow_mut() = Some(RoutingResponse::from_json(SOLUTION).expect("solution parses"));
}

#[given("a directions provider that always answers")]
fn given_directions(#[from(directions)] directions: &RefCell<ScriptedDirections>) {
    *directions.borrow_mut() = ScriptedDirections::default();
}

#[given("a directions provider that fails for the first tour")]
fn given_failing_directions(#[from(directions)] directions: &RefCell<ScriptedDirections>) {
    *directions.borrow_mut() = ScriptedDirections {
        fail_first: true,
        ..ScriptedDirections::default()
    };
}

// --- When steps ---

#[when("I render the solution")]
fn when_render(
    #[from(response)] response: &RefCell<Option<RoutingResponse>>,
    #[from(directions)] directions: &RefCell<ScriptedDirections>,
    #[from(rendered)] rendered: &RefCell<Option<RenderedTours>>,
) {
    let response = response.borrow();
    let solution = response.as_ref().expect("solution must be given");
    *rendered.borrow_mut() = Some(render_tours(solution, &*directions.borrow()));
}

#[when("I summarise the solution")]
fn when_summarise(
    #[from(response)] response: &RefCell<Option<RoutingResponse>>,
    #[from(stats)] stats: &RefCell<Option<SolutionStats>>,
) {
    let response = response.borrow();
    let solution = response.as_ref().expect("solution must be given");
    *stats.borrow_mut() = Some(summarize(solution).expect("statistics complete"));
}

// --- Then steps ---

#[then("every stop has a marker")]
fn then_markers(#[from(rendered)] rendered: &RefCell<Option<RenderedTours>>) {
    let tours = rendered_tours(rendered);
    let markers = tours
        .layers
        .iter()
        .filter(|layer| matches!(layer, MapLayer::Marker { .. }))
        .count();
    assert_eq!(markers, 5);
}

#[then("every tour has a polyline")]
fn then_all_polylines(#[from(rendered)] rendered: &RefCell<Option<RenderedTours>>) {
    let tours = rendered_tours(rendered);
    assert_eq!(polyline_tours(&tours), vec![0, 1]);
    assert!(tours.failures.is_empty());
}

#[then("only the second tour has a polyline")]
fn then_second_polyline(#[from(rendered)] rendered: &RefCell<Option<RenderedTours>>) {
    let tours = rendered_tours(rendered);
    assert_eq!(polyline_tours(&tours), vec![1]);
}

#[then("the first tour is reported as a render failure")]
fn then_failure(#[from(rendered)] rendered: &RefCell<Option<RenderedTours>>) {
    let tours = rendered_tours(rendered);
    assert_eq!(tours.failures.len(), 1);
    let failure = &tours.failures[0];
    assert_eq!(failure.tour, 0);
    assert!(
        matches!(failure.error, ServiceError::Status { status: 429, .. }),
        "expected a status error, got {:?}",
        failure.error
    );
}

#[then("the total distance is 5.0 kilometres")]
fn then_distance(#[from(stats)] stats: &RefCell<Option<SolutionStats>>) {
    let stats = stats.borrow().expect("solution must be summarised");
    assert_eq!(stats.total_distance_km, 5.0);
    assert_eq!(stats.total_cost, 31.5);
}

#[then("the driving time is 2.0 hours")]
fn then_driving(#[from(stats)] stats: &RefCell<Option<SolutionStats>>) {
    let stats = stats.borrow().expect("solution must be summarised");
    assert_eq!(stats.driving_hours, 2.0);
    assert!((stats.serving_hours - 1.0 / 3.0).abs() < 1e-9);
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/solution_renderer.feature", name = $title)]
        fn $fn_name(
            response: RefCell<Option<RoutingResponse>>,
            directions: RefCell<ScriptedDirections>,
            rendered: RefCell<Option<RenderedTours>>,
            stats: RefCell<Option<SolutionStats>>,
        ) {
            let _ = (response, directions, rendered, stats);
        }
    };
}

register_scenario!(drawing_every_tour, "drawing every tour");
register_scenario!(
    drawing_remaining_tours,
    "drawing the remaining tours when one lookup fails"
);
register_scenario!(summarising_statistics, "summarising solution statistics");
