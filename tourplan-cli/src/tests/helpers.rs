//! Test helpers: a scratch workspace, sample rows and a stub backend.

use super::*;
use std::cell::Cell;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use tourplan_core::{DirectionsProvider, FleetRow, JobRow, Location, RoutingService, ServiceError};
use tourplan_data::WorkbookData;
use tourplan_data::routing::test_support::{StubDirectionsProvider, StubRoutingService};

/// Solution for the two sample jobs: one tour visiting both.
pub(super) const SOLUTION: &str = r#"{
    "statistic": {"cost": 12.0, "distance": 3000, "times": {"driving": 1800, "serving": 1200, "waiting": 0, "break": 0}},
    "tours": [{"vehicleId": "vehicle_1_1", "stops": [
        {"location": {"lat": 52.1, "lng": 5.1}},
        {"location": {"lat": 52.0, "lng": 5.0}},
        {"location": {"lat": 52.05, "lng": 5.2}},
        {"location": {"lat": 52.1, "lng": 5.1}}
    ]}],
    "unassigned": [{"jobId": "job_9", "reasons": [{"code": "CAPACITY_CONSTRAINT", "description": "cannot be assigned due to capacity"}]}]
}"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write fixture file");
}

/// Scratch directory holding a placeholder workbook and the output folder.
#[derive(Debug)]
pub(super) struct Workspace {
    _tmp: TempDir,
    pub(super) root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self { _tmp: tmp, root }
    }

    /// Path of a workbook file that exists on disk.
    pub(super) fn workbook(&self) -> Utf8PathBuf {
        let path = self.root.join("plan.xlsx");
        write_utf8(&path, b"placeholder workbook");
        path
    }

    pub(super) fn out_dir(&self) -> Utf8PathBuf {
        self.root.join("out")
    }

    pub(super) fn read_output(&self, name: &str) -> String {
        std::fs::read_to_string(self.out_dir().join(name)).expect("read output file")
    }

    pub(super) fn has_output(&self, name: &str) -> bool {
        self.out_dir().join(name).is_file()
    }
}

pub(super) fn sample_data() -> WorkbookData {
    let depot = Location::new(52.1, 5.1);
    WorkbookData {
        jobs: vec![
            JobRow::delivery("job_1", Location::new(52.0, 5.0), 3)
                .with_window("08:00:00", "12:00:00")
                .with_duration(600),
            JobRow::pickup("job_2", Location::new(52.05, 5.2), 2)
                .with_window("09:00:00", "17:00:00")
                .with_duration(600),
        ],
        fleet: FleetRow {
            shift_start: depot,
            shift_end: depot,
        },
    }
}

/// Backend answering from in-memory rows and stub services.
#[derive(Debug)]
pub(super) struct StubPlanBackend {
    pub(super) data: WorkbookData,
    pub(super) routing: Result<String, ServiceError>,
    pub(super) directions_error: Option<ServiceError>,
    pub(super) services_built: Cell<usize>,
}

impl StubPlanBackend {
    pub(super) fn new() -> Self {
        Self {
            data: sample_data(),
            routing: Ok(SOLUTION.to_owned()),
            directions_error: None,
            services_built: Cell::new(0),
        }
    }
}

impl PlanBackend for StubPlanBackend {
    fn load_workbook(&self, _path: &Utf8Path) -> Result<WorkbookData, CliError> {
        Ok(self.data.clone())
    }

    fn routing_service(
        &self,
        _config: &PlanConfig,
        _keys: &ServiceKeys,
    ) -> Result<Box<dyn RoutingService>, CliError> {
        self.services_built.set(self.services_built.get() + 1);
        Ok(Box::new(match &self.routing {
            Ok(body) => StubRoutingService::with_response(body.clone()),
            Err(error) => StubRoutingService::with_error(error.clone()),
        }))
    }

    fn directions_provider(
        &self,
        _config: &PlanConfig,
        _keys: &ServiceKeys,
    ) -> Result<Box<dyn DirectionsProvider>, CliError> {
        self.services_built.set(self.services_built.get() + 1);
        Ok(Box::new(match &self.directions_error {
            Some(error) => StubDirectionsProvider::failing_first(error.clone()),
            None => StubDirectionsProvider::echo(),
        }))
    }
}
